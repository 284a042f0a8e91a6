//! Event-to-segment mapping rules
//!
//! The segmentation rule table is a closed, static mapping from event names to
//! segment labels. It is matched by exact string comparison only - no prefix,
//! pattern, or data-driven matching.

/// Map an event name to the segment label it qualifies the user for
///
/// Returns `None` for any event name outside the fixed table, in which case
/// the segmentation update is a no-op and no store access occurs.
pub fn label_for_event(event_name: &str) -> Option<&'static str> {
    match event_name {
        "fd_created" => Some("fd_holder"),
        "upi_payment" => Some("upi_active"),
        "high_value_transaction" => Some("high_value"),
        "loan_applied" => Some("loan_seeker"),
        "investment_viewed" => Some("investment_interested"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_event_names() {
        assert_eq!(label_for_event("fd_created"), Some("fd_holder"));
        assert_eq!(label_for_event("upi_payment"), Some("upi_active"));
        assert_eq!(label_for_event("high_value_transaction"), Some("high_value"));
        assert_eq!(label_for_event("loan_applied"), Some("loan_seeker"));
        assert_eq!(
            label_for_event("investment_viewed"),
            Some("investment_interested")
        );
    }

    #[test]
    fn test_unmapped_event_names() {
        assert_eq!(label_for_event("login"), None);
        assert_eq!(label_for_event(""), None);
    }

    #[test]
    fn test_exact_match_only() {
        // Near-misses must not match: the table is exact-match, not fuzzy
        assert_eq!(label_for_event("fd_created "), None);
        assert_eq!(label_for_event("FD_CREATED"), None);
        assert_eq!(label_for_event("fd_create"), None);
        assert_eq!(label_for_event("upi_payments"), None);
    }
}
