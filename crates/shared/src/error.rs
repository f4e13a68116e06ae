use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

/// JSON error body returned by the issues service. The message travels as
/// `detail` so bodies from other implementations of the API still decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default = "unknown_code")]
    pub code: ErrorCode,
    #[serde(rename = "detail", alias = "message")]
    pub message: String,
}

fn unknown_code() -> ErrorCode {
    ErrorCode::Internal
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_detail_only_error_bodies() {
        let err: ApiError =
            serde_json::from_str(r#"{"detail":"Issue not found"}"#).expect("json");
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, "Issue not found");

        let encoded = serde_json::to_value(ApiError::not_found("Issue not found")).expect("json");
        assert_eq!(encoded["code"], "not_found");
        assert_eq!(encoded["detail"], "Issue not found");
    }
}
