//! Registry construction options.
//!
//! # Invariants
//! - `scope` is required; `properties` defaults to empty.

use crate::provider::metadata::Scope;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryOptions {
    pub scope: Scope,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl RegistryOptions {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            properties: BTreeMap::new(),
        }
    }

    /// Parses options from a JSON document.
    ///
    /// # Errors
    /// - `OptionsError::Parse` for malformed JSON, unknown fields or a
    ///   missing/unsupported scope.
    pub fn from_json_str(value: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(value).map_err(OptionsError::Parse)
    }
}

/// Options loading errors.
#[derive(Debug)]
pub enum OptionsError {
    Parse(serde_json::Error),
}

impl Display for OptionsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid registry options: {err}"),
        }
    }
}

impl Error for OptionsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
        }
    }
}
