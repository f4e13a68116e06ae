//! Startup configuration: which issue service the app talks to.

use clap::Parser;
use client_core::DEFAULT_API_BASE;

/// Environment variables consulted for the API base, in priority order.
pub const API_BASE_ENV_VARS: [&str; 2] = ["ISSUE_TRACKER_API_BASE", "VITE_API_BASE"];

#[derive(Parser, Debug)]
#[command(name = "desktop_gui", about = "Desktop client for the issue tracker")]
struct Cli {
    /// Base URL of the issue service, e.g. http://localhost:8000
    #[arg(long)]
    api_base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub api_base: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl StartupConfig {
    pub fn from_env_and_args() -> Self {
        let cli = Cli::parse();
        Self::resolve(cli.api_base, |name| std::env::var(name).ok())
    }

    /// `--api-base` wins, then the first non-blank environment variable, then
    /// the built-in default.
    pub fn resolve(cli_api_base: Option<String>, env: impl Fn(&str) -> Option<String>) -> Self {
        let from_env = || {
            API_BASE_ENV_VARS
                .iter()
                .filter_map(|name| env(name))
                .find(|value| !value.trim().is_empty())
        };
        let api_base = cli_api_base
            .filter(|value| !value.trim().is_empty())
            .or_else(from_env)
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self { api_base }
    }
}
