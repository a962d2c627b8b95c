//! Application use cases. Orchestrate domain logic via ports.

pub mod review_service;

pub use review_service::{ReviewService, Stage};
