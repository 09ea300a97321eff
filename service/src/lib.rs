use config::Config;
use tokio_util::sync::CancellationToken;

pub mod config;
pub mod logging;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Cancelled once the server starts shutting down. Every open event
    /// stream watches a child of this token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(app_config: Config) -> Self {
        Self {
            config: app_config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token for a single stream. Cancelling it leaves other streams alone.
    pub fn stream_shutdown(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
