use crate::controller::{health_check_controller, patch_controller};
use crate::AppState;
use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use log::*;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub fn define_routes(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state);

    Router::new()
        .merge(health_routes(app_state.clone()))
        .merge(fragment_routes(app_state.clone()))
        .merge(signal_routes(app_state.clone()))
        .merge(script_routes(app_state.clone()))
        .merge(timer_routes(app_state))
        .layer(cors)
}

/// Browsers only need to open event streams, so only GET is allowed.
fn cors_layer(app_state: &AppState) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET]);

    if app_state.config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

fn health_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_controller::health_check))
        .with_state(app_state)
}

fn fragment_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/merge-fragments", get(patch_controller::merge_fragments))
        .route(
            "/merge-fragments-repeating",
            get(patch_controller::merge_fragments_repeating),
        )
        .route("/remove-fragments", get(patch_controller::remove_fragments))
        .with_state(app_state)
}

fn signal_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/merge-signals", get(patch_controller::merge_signals))
        .route("/remove-signals", get(patch_controller::remove_signals))
        .with_state(app_state)
}

fn script_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/execute-script", get(patch_controller::execute_script))
        .with_state(app_state)
}

fn timer_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/heartbeat", get(patch_controller::heartbeat))
        .route("/clock", get(patch_controller::clock))
        .with_state(app_state)
}
