//! DTOs for the analytics endpoints

use chrono::{DateTime, Utc};
use finsight_domain::analytics::{CrossSellOffer, Event, SegmentView};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for the record-event endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordEventRequest {
    /// Name of the behavioral event
    #[schema(example = "fd_created")]
    pub event_name: String,
    /// Free-form key-value payload attached to the event
    #[schema(value_type = Option<Object>)]
    pub properties: Option<serde_json::Value>,
}

/// A recorded event as returned to the caller
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    /// Unique identifier of the event
    #[schema(example = "0191c2a4-77aa-7bbf-a2f1-5c1e3a9b0d42")]
    pub id: String,
    /// Identifier of the owning user
    #[schema(example = "7f2c1a90-1db8-4a4e-8f0a-1c2d3e4f5a6b")]
    pub user_id: String,
    /// Event name
    #[schema(example = "fd_created")]
    pub event_name: String,
    /// Free-form payload, if one was supplied
    #[schema(value_type = Option<Object>)]
    pub properties: Option<serde_json::Value>,
    /// Server-assigned creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id().to_string(),
            user_id: event.user_id().to_string(),
            event_name: event.event_name().to_string(),
            properties: event.properties().cloned(),
            created_at: *event.created_at(),
        }
    }
}

/// The resolved segment view for a user
#[derive(Debug, Serialize, ToSchema)]
pub struct SegmentResponse {
    /// Identifier of the user
    #[schema(example = "7f2c1a90-1db8-4a4e-8f0a-1c2d3e4f5a6b")]
    pub user_id: String,
    /// Segment labels the user currently belongs to
    #[schema(example = json!(["fd_holder", "upi_active"]))]
    pub segments: Vec<String>,
    /// True when no record is stored and the default segment was substituted
    pub is_default: bool,
    /// Last update of the stored record, absent for the default view
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&SegmentView> for SegmentResponse {
    fn from(view: &SegmentView) -> Self {
        Self {
            user_id: view.user_id().to_string(),
            segments: view.segments().to_vec(),
            is_default: view.is_default(),
            updated_at: view.updated_at().copied(),
        }
    }
}

/// A single cross-sell offer
#[derive(Debug, Serialize, ToSchema)]
pub struct OfferDto {
    #[schema(example = "FD")]
    pub product_type: String,
    #[schema(example = "Open a new FD")]
    pub title: String,
    #[schema(example = "Lock in today's rates")]
    pub description: String,
}

impl From<&CrossSellOffer> for OfferDto {
    fn from(offer: &CrossSellOffer) -> Self {
        Self {
            product_type: offer.product_type.clone(),
            title: offer.title.clone(),
            description: offer.description.clone(),
        }
    }
}

/// Response body for the cross-sell endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct OffersResponse {
    pub offers: Vec<OfferDto>,
    /// Number of offers returned
    #[schema(example = 2)]
    pub count: usize,
}

/// Response body for the event-listing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct EventsResponse {
    pub events: Vec<EventResponse>,
    /// Number of events returned
    #[schema(example = 3)]
    pub count: usize,
}

/// Query parameters for the event-listing endpoint
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub limit: Option<i64>,
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "event_name is required")]
    pub error: String,
}
