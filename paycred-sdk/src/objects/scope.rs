//! Configuration scopes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration partition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigScope {
    /// Global configuration.
    Default,
    /// Per-website configuration.
    Websites,
    /// Per-store-view configuration.
    Stores,
}

impl ConfigScope {
    /// Storage representation of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigScope::Default => "default",
            ConfigScope::Websites => "websites",
            ConfigScope::Stores => "stores",
        }
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a scope name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown configuration scope: {0}")]
pub struct UnknownScope(pub String);

impl FromStr for ConfigScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ConfigScope::Default),
            "websites" => Ok(ConfigScope::Websites),
            "stores" => Ok(ConfigScope::Stores),
            other => Err(UnknownScope(other.to_owned())),
        }
    }
}

/// Identifies the configuration partition that receives imported values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeDescriptor {
    pub scope: ConfigScope,
    pub scope_id: u32,
}

impl ScopeDescriptor {
    pub fn new(scope: ConfigScope, scope_id: u32) -> Self {
        Self { scope, scope_id }
    }
}

impl fmt::Display for ScopeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.scope_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parsing() {
        assert_eq!("websites".parse::<ConfigScope>().unwrap(), ConfigScope::Websites);
        assert_eq!(
            "global".parse::<ConfigScope>().unwrap_err(),
            UnknownScope("global".to_string())
        );
    }

    #[test]
    fn test_scope_serializes_lowercase() {
        let scope = ScopeDescriptor::new(ConfigScope::Stores, 3);
        let json = serde_json::to_string(&scope).unwrap();
        assert_eq!(json, r#"{"scope":"stores","scope_id":3}"#);
        assert_eq!(scope.to_string(), "stores/3");
    }
}
