use std::{net::SocketAddr, sync::Arc};

use server::{build_router, config::load_settings, AppState};
use server_api::ApiContext;
use storage::Storage;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let storage = match &settings.data_file {
        Some(path) => Storage::open(path).await.map_err(|error| {
            error!(
                path = %path.display(),
                %error,
                "failed to open issue data file; verify the path is writable and holds valid JSON"
            );
            error
        })?,
        None => {
            info!("no data file configured; issues are kept in memory only");
            Storage::in_memory()
        }
    };

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "issue api listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
