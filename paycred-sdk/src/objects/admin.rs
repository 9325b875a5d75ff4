//! Admin API request and response types.

use serde::{Deserialize, Serialize};

use super::scope::{ConfigScope, ScopeDescriptor};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /api/v1/admin/credentials/import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCredentialsRequest {
    pub scope: ConfigScope,
    pub scope_id: u32,
    /// Raw credentials JSON, plain or enveloped, exactly as pasted by the
    /// administrator.
    pub credentials_json: String,
}

impl ImportCredentialsRequest {
    pub fn scope_descriptor(&self) -> ScopeDescriptor {
        ScopeDescriptor::new(self.scope, self.scope_id)
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// How an import request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcomeKind {
    /// All mandatory fields were written.
    Applied,
    /// The payload failed validation; nothing was written.
    Rejected,
    /// The payload passed validation but could not be applied.
    Failed,
}

/// Result of an import request, including every message reported to the
/// administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCredentialsResponse {
    pub outcome: ImportOutcomeKind,
    pub fields_written: usize,
    pub enveloped: bool,
    pub messages: Vec<String>,
}
