//! Analytics handlers
//!
//! The user is identified by the `X-User-ID` header, supplied out-of-band by
//! the API gateway. No authentication happens here: a missing or malformed
//! header surfaces as the domain's `Unauthorized` error and maps to 401.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use finsight_domain::analytics::AnalyticsError;
use tracing::{error, info};

use crate::{
    dto::analytics::{
        ErrorResponse, EventResponse, EventsResponse, ListEventsQuery, OfferDto, OffersResponse,
        RecordEventRequest, SegmentResponse,
    },
    AppState,
};

const USER_ID_HEADER: &str = "x-user-id";

/// Extract the caller-supplied user identifier
///
/// An absent header degrades to the empty string, which fails the domain's
/// identifier parse the same way a malformed value does.
fn user_id(headers: &HeaderMap) -> &str {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

fn error_response(err: AnalyticsError) -> Response {
    let status = match err {
        AnalyticsError::Unauthorized => StatusCode::UNAUTHORIZED,
        AnalyticsError::StoreFailure(_) | AnalyticsError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse { error: err.to_string() })).into_response()
}

/// Handle event ingestion requests
#[utoipa::path(
    post,
    path = "/v1/analytics/event",
    request_body = RecordEventRequest,
    params(
        ("X-User-ID" = String, Header, description = "Caller-supplied user identifier (UUID)")
    ),
    responses(
        (status = 201, description = "Event recorded", body = EventResponse),
        (status = 400, description = "Bad request - missing event name", body = ErrorResponse),
        (status = 401, description = "Missing or malformed user identifier", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "analytics"
)]
pub async fn record_event_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RecordEventRequest>,
) -> impl IntoResponse {
    // Boundary validation: the domain takes any non-empty name as-is
    if payload.event_name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "event_name is required".to_string(),
            }),
        )
            .into_response();
    }

    match state
        .analytics_service
        .record_event(user_id(&headers), &payload.event_name, payload.properties)
        .await
    {
        Ok(event) => {
            info!(event_id = %event.id(), event_name = %event.event_name(), "event recorded");
            (StatusCode::CREATED, Json(EventResponse::from(&event))).into_response()
        }
        Err(err) => {
            error!(error = ?err, "failed to record event");
            error_response(err)
        }
    }
}

/// Handle segment view requests
#[utoipa::path(
    get,
    path = "/v1/analytics/segment",
    params(
        ("X-User-ID" = String, Header, description = "Caller-supplied user identifier (UUID)")
    ),
    responses(
        (status = 200, description = "Resolved segment view", body = SegmentResponse),
        (status = 401, description = "Missing or malformed user identifier", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "analytics"
)]
pub async fn get_segment_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    match state.analytics_service.segment_view(user_id(&headers)).await {
        Ok(view) => (StatusCode::OK, Json(SegmentResponse::from(&view))).into_response(),
        Err(err) => {
            error!(error = ?err, "failed to resolve segment view");
            error_response(err)
        }
    }
}

/// Handle cross-sell offer requests
#[utoipa::path(
    get,
    path = "/v1/analytics/crosssell",
    params(
        ("X-User-ID" = String, Header, description = "Caller-supplied user identifier (UUID)")
    ),
    responses(
        (status = 200, description = "Resolved offers", body = OffersResponse),
        (status = 401, description = "Missing or malformed user identifier", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "analytics"
)]
pub async fn get_offers_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    match state
        .analytics_service
        .cross_sell_offers(user_id(&headers))
        .await
    {
        Ok(offers) => {
            let offers: Vec<OfferDto> = offers.iter().map(OfferDto::from).collect();
            let count = offers.len();
            (StatusCode::OK, Json(OffersResponse { offers, count })).into_response()
        }
        Err(err) => {
            error!(error = ?err, "failed to resolve offers");
            error_response(err)
        }
    }
}

/// Handle event listing requests
#[utoipa::path(
    get,
    path = "/v1/analytics/events",
    params(
        ("X-User-ID" = String, Header, description = "Caller-supplied user identifier (UUID)"),
        ("limit" = Option<i64>, Query, description = "Maximum number of events (default 50, cap 200)")
    ),
    responses(
        (status = 200, description = "Most recent events for the user", body = EventsResponse),
        (status = 401, description = "Missing or malformed user identifier", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "analytics"
)]
pub async fn list_events_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListEventsQuery>,
) -> impl IntoResponse {
    match state
        .analytics_service
        .recent_events(user_id(&headers), query.limit)
        .await
    {
        Ok(events) => {
            let events: Vec<EventResponse> = events.iter().map(EventResponse::from).collect();
            let count = events.len();
            (StatusCode::OK, Json(EventsResponse { events, count })).into_response()
        }
        Err(err) => {
            error!(error = ?err, "failed to list events");
            error_response(err)
        }
    }
}
