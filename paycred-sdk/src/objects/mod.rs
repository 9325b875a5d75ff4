//! Objects shared between the admin API server and its clients.

pub mod admin;
pub mod scope;

pub use admin::{ImportCredentialsRequest, ImportCredentialsResponse, ImportOutcomeKind};
pub use scope::{ConfigScope, ScopeDescriptor, UnknownScope};
