//! Route table.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{self, GENERATE_KEY_PATH, LIST_KEYS_PATH, VERIFY_PATH};
use super::state::AppState;
use crate::relay::Channel;

/// Create the full router with application state.
///
/// Every route answers cross-origin requests from any origin.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::status))
        .route("/health", get(handlers::health_check))
        .route(VERIFY_PATH, post(handlers::verify_key))
        .route(GENERATE_KEY_PATH, post(handlers::generate_key))
        .route(LIST_KEYS_PATH, get(handlers::list_keys));

    for channel in Channel::ALL {
        router = router.route(
            &handlers::relay_path(channel),
            post(move |State(state): State<AppState>, body: Bytes| {
                handlers::relay_notification(state, channel, body)
            }),
        );
    }

    router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
