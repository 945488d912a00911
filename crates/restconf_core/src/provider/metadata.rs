//! Declared provider metadata.
//!
//! # Responsibility
//! - Carry the priority marker, scope constraint and media-type declarations
//!   a provider attaches to itself.
//!
//! # Invariants
//! - Empty `consumes`/`produces` mean "undeclared"; the registry substitutes
//!   the `*/*` wildcard when filing readers and writers.

use crate::media_type::{MediaType, MediaTypeError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Which side of a call a configuration serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Client,
    Server,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Declared priority marker; `None` resolves to `priority::USER`.
    pub priority: Option<i32>,
    /// Scope restriction for body readers and writers.
    pub constrained_to: Option<Scope>,
    pub consumes: Vec<MediaType>,
    pub produces: Vec<MediaType>,
}

impl ProviderMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn constrained_to(mut self, scope: Scope) -> Self {
        self.constrained_to = Some(scope);
        self
    }

    /// Declares the media types a body reader accepts.
    ///
    /// # Errors
    /// - Returns the first parse failure among `values`.
    pub fn consumes<I, S>(mut self, values: I) -> Result<Self, MediaTypeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.consumes = parse_all(values)?;
        Ok(self)
    }

    /// Declares the media types a body writer emits.
    ///
    /// # Errors
    /// - Returns the first parse failure among `values`.
    pub fn produces<I, S>(mut self, values: I) -> Result<Self, MediaTypeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.produces = parse_all(values)?;
        Ok(self)
    }

    /// Whether a scope-restricted provider may be filed in `scope`.
    pub fn allows_scope(&self, scope: Scope) -> bool {
        self.constrained_to.map_or(true, |declared| declared == scope)
    }
}

fn parse_all<I, S>(values: I) -> Result<Vec<MediaType>, MediaTypeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| MediaType::parse(value.as_ref()))
        .collect()
}
