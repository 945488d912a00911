//! Media-type declarations attached to body readers and writers.
//!
//! Only parsing and canonical rendering live here. Matching a request's
//! content type against declarations is left to the pipeline.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TYPE_SUBTYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\*|[a-z0-9][a-z0-9!#$&^_.+\-]*)/(\*|[a-z0-9][a-z0-9!#$&^_.+\-]*)$")
        .expect("valid media type regex")
});
static PARAM_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9!#$&^_.+\-]*$").expect("valid parameter regex"));

pub const WILDCARD: &str = "*";

/// Parsed `type/subtype; key=value` declaration.
///
/// Type, subtype and parameter keys are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaType {
    kind: String,
    subtype: String,
    parameters: BTreeMap<String, String>,
}

impl MediaType {
    /// `*/*`
    pub fn wildcard() -> Self {
        Self {
            kind: WILDCARD.to_string(),
            subtype: WILDCARD.to_string(),
            parameters: BTreeMap::new(),
        }
    }

    /// Parses one declaration.
    ///
    /// # Errors
    /// - `Empty` for blank input.
    /// - `Malformed` when `type/subtype` is not a valid token pair, or when
    ///   the type is `*` but the subtype is not.
    /// - `InvalidParameter` for a parameter segment without a valid `key=`.
    pub fn parse(value: &str) -> Result<Self, MediaTypeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(MediaTypeError::Empty);
        }

        let mut segments = trimmed.split(';');
        let head = segments
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let captures = TYPE_SUBTYPE_RE
            .captures(&head)
            .ok_or_else(|| MediaTypeError::Malformed(trimmed.to_string()))?;
        let kind = captures[1].to_string();
        let subtype = captures[2].to_string();
        if kind == WILDCARD && subtype != WILDCARD {
            return Err(MediaTypeError::Malformed(trimmed.to_string()));
        }

        let mut parameters = BTreeMap::new();
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let Some((key, raw_value)) = segment.split_once('=') else {
                return Err(MediaTypeError::InvalidParameter(segment.to_string()));
            };
            let key = key.trim().to_ascii_lowercase();
            if !PARAM_KEY_RE.is_match(&key) {
                return Err(MediaTypeError::InvalidParameter(segment.to_string()));
            }
            let raw_value = raw_value.trim();
            let unquoted = raw_value
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .unwrap_or(raw_value);
            parameters.insert(key, unquoted.to_string());
        }

        Ok(Self {
            kind,
            subtype,
            parameters,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_wildcard(&self) -> bool {
        self.kind == WILDCARD && self.subtype == WILDCARD
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)?;
        for (key, value) in &self.parameters {
            write!(f, ";{key}={value}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for MediaType {
    type Error = MediaTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        value.to_string()
    }
}

/// The list filed for readers/writers that declare nothing.
pub fn wildcard_list() -> Vec<MediaType> {
    vec![MediaType::wildcard()]
}

/// Media type parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    Empty,
    Malformed(String),
    InvalidParameter(String),
}

impl Display for MediaTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "media type must not be empty"),
            Self::Malformed(value) => write!(f, "media type is malformed: {value}"),
            Self::InvalidParameter(value) => {
                write!(f, "media type parameter is invalid: {value}")
            }
        }
    }
}

impl Error for MediaTypeError {}
