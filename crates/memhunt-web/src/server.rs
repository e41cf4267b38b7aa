//! Server setup

use std::future::Future;

use memhunt_core::MemoryReporter;
use tokio::net::TcpListener;
use tracing::info;

use crate::{Error, ServerConfig, create_router};

/// Bind, serve, and return once `shutdown` resolves and in-flight requests finish.
///
/// # Errors
///
/// Returns an error if the config is invalid, the address cannot be bound,
/// or the server fails while running.
pub async fn run_server<F>(
    config: ServerConfig,
    reporter: MemoryReporter,
    shutdown: F,
) -> Result<(), Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;
    let addr = config.socket_addr()?;
    let app = create_router(config, reporter)?;

    let listener = TcpListener::bind(addr).await?;
    info!("memhunt web server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("memhunt web server stopped");
    Ok(())
}
