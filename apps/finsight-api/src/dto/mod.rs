//! Request/response DTOs

pub mod analytics;
