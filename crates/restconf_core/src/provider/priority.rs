//! Default priority resolution.
//!
//! Lower values run earlier on the inbound path. The reserved constants below
//! leave the range under `USER` to built-in providers.

use crate::provider::metadata::ProviderMetadata;
use crate::provider::roles::Provider;

pub const AUTHENTICATION: i32 = 1000;
pub const AUTHORIZATION: i32 = 2000;
pub const HEADER_DECORATOR: i32 = 3000;
pub const ENTITY_CODER: i32 = 4000;
/// Priority of providers that declare none.
pub const USER: i32 = 5000;

/// Returns the declared priority of `provider`, else `USER`.
pub fn resolve_priority(provider: &dyn Provider) -> i32 {
    resolve_declared_priority(&provider.metadata())
}

pub fn resolve_declared_priority(metadata: &ProviderMetadata) -> i32 {
    metadata.priority.unwrap_or(USER)
}

#[cfg(test)]
mod tests {
    use super::{resolve_priority, AUTHENTICATION, ENTITY_CODER, USER};
    use crate::provider::metadata::ProviderMetadata;
    use crate::provider::roles::Provider;

    struct Undeclared;
    impl Provider for Undeclared {}

    struct Declared;
    impl Provider for Declared {
        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata::new().with_priority(AUTHENTICATION)
        }
    }

    #[test]
    fn falls_back_to_user_priority() {
        assert_eq!(resolve_priority(&Undeclared), USER);
    }

    #[test]
    fn uses_declared_priority() {
        assert_eq!(resolve_priority(&Declared), AUTHENTICATION);
    }

    #[test]
    fn reserved_priorities_sort_before_user() {
        assert!(AUTHENTICATION < ENTITY_CODER);
        assert!(ENTITY_CODER < USER);
    }
}
