//! HTTP API handlers.

pub mod admin;
pub mod extractors;
