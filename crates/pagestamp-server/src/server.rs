//! Preview server implementation.

use std::net::SocketAddr;

use axum::Router;
use tower_http::services::ServeDir;

use pagestamp_static::{BuildConfig, BuildError, BuildResult, StaticBuilder};

use crate::watcher::{FileWatcher, WatchEvent};

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Build settings; inputs are watched and output is served
    pub build: BuildConfig,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Serves generated pages and rebuilds them when inputs change.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new preview server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Build once, then serve the output directory until the process exits.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        log_rebuild(rebuild(self.config.build.clone()).await);

        let watch_paths = vec![
            self.config.build.services_path.clone(),
            self.config.build.template_path.clone(),
        ];

        let (watcher, mut rx) =
            FileWatcher::new(&watch_paths).map_err(|e| ServerError::WatchError(e.to_string()))?;

        // Rebuilds run one at a time, in event order
        let build_config = self.config.build.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&build_config, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = Router::new().fallback_service(ServeDir::new(&self.config.build.output_dir));

        tracing::info!(
            "Serving {} at http://{}",
            self.config.build.output_dir.display(),
            addr
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Run a full build on the blocking pool.
pub async fn rebuild(config: BuildConfig) -> Result<BuildResult, BuildError> {
    match tokio::task::spawn_blocking(move || StaticBuilder::new(config).build()).await {
        Ok(result) => result,
        Err(e) => Err(BuildError::WriteError(format!("build task failed: {}", e))),
    }
}

/// Handle file watch events.
async fn handle_watch_event(config: &BuildConfig, event: WatchEvent) {
    match &event {
        WatchEvent::Changed(path) => tracing::info!("Changed: {}", path.display()),
        WatchEvent::Removed(path) => tracing::warn!("Removed: {}", path.display()),
    }

    log_rebuild(rebuild(config.clone()).await);
}

fn log_rebuild(result: Result<BuildResult, BuildError>) {
    match result {
        Ok(result) => tracing::info!(
            "Rebuilt {} pages with {} warnings in {}ms",
            result.pages,
            result.warning_count(),
            result.duration_ms
        ),
        Err(e) => tracing::error!("Build failed: {}", e),
    }
}
