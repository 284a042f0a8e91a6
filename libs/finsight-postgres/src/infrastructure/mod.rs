//! Store port implementations backed by PostgreSQL

mod event_store;
mod rule_store;
mod segment_store;

pub use event_store::PgEventStore;
pub use rule_store::PgRuleStore;
pub use segment_store::PgSegmentStore;
