//! Analytics routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::analytics::{
        get_offers_handler, get_segment_handler, list_events_handler, record_event_handler,
    },
    AppState,
};

/// Create analytics routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/analytics/event", post(record_event_handler))
        .route("/v1/analytics/segment", get(get_segment_handler))
        .route("/v1/analytics/crosssell", get(get_offers_handler))
        .route("/v1/analytics/events", get(list_events_handler))
}
