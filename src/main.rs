use log::*;
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();

    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
        std::process::exit(1);
    }

    info!("Starting up datastar_stream...");
    debug!("Runtime environment: {}", config.runtime_env());
    debug!(
        "Heartbeat every {}ms, clock every {}ms",
        config.heartbeat_interval_ms, config.clock_interval_ms
    );

    let app_state = AppState::new(config);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server terminated with error: {e}");
        std::process::exit(1);
    }

    info!("Server shut down cleanly");
}
