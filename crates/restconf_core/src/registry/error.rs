//! Registry errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Failures that abort a registration call.
///
/// Duplicate, role-less and scope-excluded registrations are not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A class reference could not produce an instance.
    Instantiation {
        type_name: &'static str,
        reason: String,
    },
    /// A feature aborted its own activation.
    FeatureActivation {
        type_name: &'static str,
        reason: String,
    },
}

impl RegistryError {
    /// Error a `Feature::configure` implementation returns to abort activation.
    pub fn feature_activation<F: ?Sized + 'static>(reason: impl Into<String>) -> Self {
        Self::FeatureActivation {
            type_name: std::any::type_name::<F>(),
            reason: reason.into(),
        }
    }
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instantiation { type_name, reason } => {
                write!(f, "failed to instantiate provider {type_name}: {reason}")
            }
            Self::FeatureActivation { type_name, reason } => {
                write!(f, "feature {type_name} failed to activate: {reason}")
            }
        }
    }
}

impl Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::RegistryError;

    struct GzipFeature;

    #[test]
    fn display_names_the_type_and_reason() {
        let err = RegistryError::feature_activation::<GzipFeature>("codec missing");
        let message = err.to_string();
        assert!(message.contains("GzipFeature"));
        assert!(message.ends_with("codec missing"));

        let err = RegistryError::Instantiation {
            type_name: "demo::Filter",
            reason: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "failed to instantiate provider demo::Filter: boom");
    }
}
