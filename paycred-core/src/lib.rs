#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod entities;
pub mod framework;
pub mod importer;
pub mod store;

pub use paycred_sdk::objects::{ConfigScope, ScopeDescriptor};
