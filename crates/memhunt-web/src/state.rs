//! Shared application state handed to every handler.

use std::sync::Arc;

use memhunt_core::{Error, MemoryReporter};

use crate::config::ServerConfig;
use crate::error::AppError;

/// Service context: the reporter and the config it was built from.
#[derive(Clone, Debug)]
pub struct AppState {
    pub reporter: MemoryReporter,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build state, applying the config's record caps to the reporter.
    #[must_use]
    pub fn new(config: ServerConfig, reporter: MemoryReporter) -> Self {
        let reporter = reporter.with_limits(config.report_limits());
        Self {
            reporter,
            config: Arc::new(config),
        }
    }

    /// Run a reporter operation on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns a facade failure, surfaced as [`AppError::Internal`], if the
    /// task panicked or was cancelled.
    pub async fn report<T, F>(&self, operation: F) -> crate::error::Result<T>
    where
        F: FnOnce(&MemoryReporter) -> T + Send + 'static,
        T: Send + 'static,
    {
        let reporter = self.reporter.clone();
        tokio::task::spawn_blocking(move || operation(&reporter))
            .await
            .map_err(|e| {
                AppError::from(Error::facade_failure(format!("reporter task failed: {e}")))
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use super::*;
    use memhunt_core::HeapRegistry;

    fn state() -> AppState {
        AppState::new(
            ServerConfig::default(),
            MemoryReporter::new(HeapRegistry::new()),
        )
    }

    #[tokio::test]
    async fn test_report_runs_operation() {
        let limits = state().report(MemoryReporter::limits).await;
        assert!(matches!(limits, Ok(l) if l.summary == 20));
    }

    #[tokio::test]
    async fn test_panicking_task_is_facade_failure() {
        let result: crate::error::Result<()> =
            state().report(|_| panic!("reporter task blew up")).await;

        match result {
            Err(AppError::Internal(reason)) => {
                assert!(reason.starts_with("internal failure: reporter task failed"));
            }
            other => panic!("expected internal error, got {other:?}"),
        }
    }
}
