//! API routes

pub mod analytics;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::analytics::{
        ErrorResponse, EventResponse, EventsResponse, OfferDto, OffersResponse,
        RecordEventRequest, SegmentResponse,
    },
    handlers, AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::analytics::record_event_handler,
        handlers::analytics::get_segment_handler,
        handlers::analytics::get_offers_handler,
        handlers::analytics::list_events_handler,
        health_handler
    ),
    components(
        schemas(
            RecordEventRequest,
            EventResponse,
            EventsResponse,
            SegmentResponse,
            OfferDto,
            OffersResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "analytics", description = "Behavioral events, segmentation and cross-sell offers"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "FinSight Analytics API",
        version = "0.1.0",
        description = "Behavioral analytics service for the FinSight banking platform",
        contact(
            name = "FinSight Team"
        )
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(analytics::routes())
        .route("/health", axum::routing::get(health_handler))
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    ),
    tag = "health"
)]
async fn health_handler() -> &'static str {
    "OK"
}
