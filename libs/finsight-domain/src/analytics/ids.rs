use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a user
///
/// UserId is a wrapper around UUID to provide type safety and prevent mixing
/// up user identifiers with other UUIDs in the system. The identifier is
/// supplied by the caller out-of-band (no authentication is performed by this
/// core); parsing it is the only gate on the ingress path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a UserId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Unique identifier for an Event
///
/// EventId is a wrapper around UUID v7 so that identifiers sort by creation
/// time, matching the recency ordering used when listing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Generate a new EventId
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create an EventId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EventId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<EventId> for Uuid {
    fn from(id: EventId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parse_valid() {
        let id: UserId = "7f2c1a90-1db8-4a4e-8f0a-1c2d3e4f5a6b".parse().unwrap();
        assert_eq!(id.to_string(), "7f2c1a90-1db8-4a4e-8f0a-1c2d3e4f5a6b");
    }

    #[test]
    fn test_user_id_parse_malformed() {
        assert!("not-a-uuid".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn test_event_id_generation() {
        let id1 = EventId::new();
        let id2 = EventId::new();

        assert_ne!(id1, id2, "Each EventId should be unique");
    }

    #[test]
    fn test_event_id_display() {
        let id = EventId::new();
        let display_str = format!("{}", id);

        // Should be a valid UUID string format
        assert_eq!(display_str.len(), 36); // UUID string length with hyphens
    }
}
