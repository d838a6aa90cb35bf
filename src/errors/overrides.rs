use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::kind::ErrorKind;

/// Configured replacement for an error's title and detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ErrorOverride {
    pub title: String,
    pub detail: String,
}

/// Override table keyed by error kind identifier (e.g. `invalid_json`).
///
/// Keys that name no known kind are kept but never match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ErrorOverrides(BTreeMap<String, ErrorOverride>);

impl ErrorOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, kind: ErrorKind, error_override: ErrorOverride) {
        self.0.insert(kind.identifier().to_string(), error_override);
    }

    pub fn with(mut self, kind: ErrorKind, title: &str, detail: &str) -> Self {
        self.insert(
            kind,
            ErrorOverride {
                title: title.to_string(),
                detail: detail.to_string(),
            },
        );
        self
    }

    /// A missing key means "no override"
    pub fn get(&self, kind: ErrorKind) -> Option<&ErrorOverride> {
        self.0.get(kind.identifier())
    }

    /// Keys that do not name any error kind
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .filter(|key| key.parse::<ErrorKind>().is_err())
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
