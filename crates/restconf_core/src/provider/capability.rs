//! Capability roles and the explicit capability set a provider declares.
//!
//! # Responsibility
//! - Name every role the registry knows how to file.
//! - Carry one typed handle per declared role from a provider to the registry.
//!
//! # Invariants
//! - A role is present in `Capabilities::roles()` iff its handle is set.

use crate::provider::roles::{
    same_instance, BodyReader, BodyWriter, Feature, Provider, ReactiveInvokerProvider,
    ReaderInterceptor, RequestFilter, ResponseFilter, WriterInterceptor,
};
use crate::provider::type_key::TypeKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Recognized provider role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Feature,
    RequestFilter,
    ResponseFilter,
    WriterInterceptor,
    ReaderInterceptor,
    BodyReader,
    BodyWriter,
    ReactiveInvokerProvider,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Feature,
        Role::RequestFilter,
        Role::ResponseFilter,
        Role::WriterInterceptor,
        Role::ReaderInterceptor,
        Role::BodyReader,
        Role::BodyWriter,
        Role::ReactiveInvokerProvider,
    ];

    /// Stable string id, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::RequestFilter => "request_filter",
            Self::ResponseFilter => "response_filter",
            Self::WriterInterceptor => "writer_interceptor",
            Self::ReaderInterceptor => "reader_interceptor",
            Self::BodyReader => "body_reader",
            Self::BodyWriter => "body_writer",
            Self::ReactiveInvokerProvider => "reactive_invoker_provider",
        }
    }

    /// Whether providers of this role are filed by priority.
    pub fn is_ordered(self) -> bool {
        matches!(
            self,
            Self::RequestFilter
                | Self::ResponseFilter
                | Self::WriterInterceptor
                | Self::ReaderInterceptor
        )
    }

    /// Whether providers of this role are filed by type key.
    pub fn is_typed(self) -> bool {
        matches!(
            self,
            Self::BodyReader | Self::BodyWriter | Self::ReactiveInvokerProvider
        )
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one role from its string id.
pub fn parse_role(value: &str) -> Result<Role, RoleParseError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(RoleParseError::Empty);
    }
    Role::ALL
        .into_iter()
        .find(|role| role.as_str() == normalized)
        .ok_or_else(|| RoleParseError::Unsupported(normalized.to_string()))
}

/// Role parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleParseError {
    Empty,
    Unsupported(String),
}

impl Display for RoleParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "provider role must not be empty"),
            Self::Unsupported(value) => write!(f, "provider role is unsupported: {value}"),
        }
    }
}

impl Error for RoleParseError {}

/// Typed-role handle plus the type argument the provider declared for it.
pub struct Typed<T: ?Sized> {
    pub handle: Arc<T>,
    pub type_argument: Option<TypeKey>,
}

impl<T: ?Sized> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
            type_argument: self.type_argument,
        }
    }
}

/// Explicit capability set declared by one provider instance.
///
/// Built by `Provider::capabilities`, usually by passing `self` to each role
/// setter so the same allocation is filed under every role.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub(crate) feature: Option<Arc<dyn Feature>>,
    pub(crate) request_filter: Option<Arc<dyn RequestFilter>>,
    pub(crate) response_filter: Option<Arc<dyn ResponseFilter>>,
    pub(crate) writer_interceptor: Option<Arc<dyn WriterInterceptor>>,
    pub(crate) reader_interceptor: Option<Arc<dyn ReaderInterceptor>>,
    pub(crate) body_reader: Option<Typed<dyn BodyReader>>,
    pub(crate) body_writer: Option<Typed<dyn BodyWriter>>,
    pub(crate) reactive_invoker: Option<Typed<dyn ReactiveInvokerProvider>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feature(mut self, feature: Arc<dyn Feature>) -> Self {
        self.feature = Some(feature);
        self
    }

    pub fn request_filter(mut self, filter: Arc<dyn RequestFilter>) -> Self {
        self.request_filter = Some(filter);
        self
    }

    pub fn response_filter(mut self, filter: Arc<dyn ResponseFilter>) -> Self {
        self.response_filter = Some(filter);
        self
    }

    pub fn writer_interceptor(mut self, interceptor: Arc<dyn WriterInterceptor>) -> Self {
        self.writer_interceptor = Some(interceptor);
        self
    }

    pub fn reader_interceptor(mut self, interceptor: Arc<dyn ReaderInterceptor>) -> Self {
        self.reader_interceptor = Some(interceptor);
        self
    }

    /// Declares an untyped body reader; the key comes from the resolver or
    /// falls back to the wildcard.
    pub fn body_reader(mut self, reader: Arc<dyn BodyReader>) -> Self {
        self.body_reader = Some(Typed {
            handle: reader,
            type_argument: None,
        });
        self
    }

    /// Declares a body reader for values of type `T`.
    pub fn typed_body_reader<T: ?Sized + 'static>(mut self, reader: Arc<dyn BodyReader>) -> Self {
        self.body_reader = Some(Typed {
            handle: reader,
            type_argument: Some(TypeKey::of::<T>()),
        });
        self
    }

    pub fn body_writer(mut self, writer: Arc<dyn BodyWriter>) -> Self {
        self.body_writer = Some(Typed {
            handle: writer,
            type_argument: None,
        });
        self
    }

    /// Declares a body writer for values of type `T`.
    pub fn typed_body_writer<T: ?Sized + 'static>(mut self, writer: Arc<dyn BodyWriter>) -> Self {
        self.body_writer = Some(Typed {
            handle: writer,
            type_argument: Some(TypeKey::of::<T>()),
        });
        self
    }

    pub fn reactive_invoker(mut self, provider: Arc<dyn ReactiveInvokerProvider>) -> Self {
        self.reactive_invoker = Some(Typed {
            handle: provider,
            type_argument: None,
        });
        self
    }

    /// Declares a reactive invoker provider for invoker type `T`.
    pub fn typed_reactive_invoker<T: ?Sized + 'static>(
        mut self,
        provider: Arc<dyn ReactiveInvokerProvider>,
    ) -> Self {
        self.reactive_invoker = Some(Typed {
            handle: provider,
            type_argument: Some(TypeKey::of::<T>()),
        });
        self
    }

    pub fn has(&self, role: Role) -> bool {
        match role {
            Role::Feature => self.feature.is_some(),
            Role::RequestFilter => self.request_filter.is_some(),
            Role::ResponseFilter => self.response_filter.is_some(),
            Role::WriterInterceptor => self.writer_interceptor.is_some(),
            Role::ReaderInterceptor => self.reader_interceptor.is_some(),
            Role::BodyReader => self.body_reader.is_some(),
            Role::BodyWriter => self.body_writer.is_some(),
            Role::ReactiveInvokerProvider => self.reactive_invoker.is_some(),
        }
    }

    /// Declared roles in `Role::ALL` order.
    pub fn roles(&self) -> BTreeSet<Role> {
        Role::ALL.into_iter().filter(|role| self.has(*role)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.roles().is_empty()
    }

    /// Whether every declared handle points at `provider` itself.
    pub(crate) fn handles_are(&self, provider: &dyn Provider) -> bool {
        let holds = |same: Option<bool>| same.unwrap_or(true);
        holds(self.feature.as_deref().map(|h| same_instance(h, provider)))
            && holds(self.request_filter.as_deref().map(|h| same_instance(h, provider)))
            && holds(self.response_filter.as_deref().map(|h| same_instance(h, provider)))
            && holds(
                self.writer_interceptor
                    .as_deref()
                    .map(|h| same_instance(h, provider)),
            )
            && holds(
                self.reader_interceptor
                    .as_deref()
                    .map(|h| same_instance(h, provider)),
            )
            && holds(
                self.body_reader
                    .as_ref()
                    .map(|h| same_instance(h.handle.as_ref(), provider)),
            )
            && holds(
                self.body_writer
                    .as_ref()
                    .map(|h| same_instance(h.handle.as_ref(), provider)),
            )
            && holds(
                self.reactive_invoker
                    .as_ref()
                    .map(|h| same_instance(h.handle.as_ref(), provider)),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_role, Capabilities, Role, RoleParseError};
    use crate::provider::roles::{Provider, RequestFilter, ResponseFilter};
    use std::sync::Arc;

    struct AuditFilter;

    impl Provider for AuditFilter {
        fn capabilities(self: Arc<Self>) -> Capabilities {
            Capabilities::new()
                .request_filter(self.clone())
                .response_filter(self)
        }
    }

    impl RequestFilter for AuditFilter {}
    impl ResponseFilter for AuditFilter {}

    #[test]
    fn parses_every_role_id() {
        for role in Role::ALL {
            assert_eq!(parse_role(role.as_str()).expect("role parse"), role);
        }
        assert_eq!(
            parse_role(" request_filter ").expect("trimmed role parse"),
            Role::RequestFilter
        );
    }

    #[test]
    fn rejects_empty_and_unknown_roles() {
        assert_eq!(parse_role("  "), Err(RoleParseError::Empty));
        assert_eq!(
            parse_role("container_filter"),
            Err(RoleParseError::Unsupported("container_filter".to_string()))
        );
    }

    #[test]
    fn ordered_and_typed_roles_are_disjoint() {
        for role in Role::ALL {
            assert!(!(role.is_ordered() && role.is_typed()), "{role}");
        }
        assert!(!Role::Feature.is_ordered());
        assert!(!Role::Feature.is_typed());
    }

    #[test]
    fn capability_set_reports_declared_roles() {
        let caps = Arc::new(AuditFilter).capabilities();
        let roles: Vec<Role> = caps.roles().into_iter().collect();
        assert_eq!(roles, vec![Role::RequestFilter, Role::ResponseFilter]);
        assert!(caps.has(Role::ResponseFilter));
        assert!(!caps.has(Role::Feature));
        assert!(Capabilities::new().is_empty());
    }

    #[test]
    fn handles_must_be_the_declaring_instance() {
        let audit = Arc::new(AuditFilter);
        let caps = Arc::clone(&audit).capabilities();
        assert!(caps.handles_are(audit.as_ref()));
        assert!(Capabilities::new().handles_are(audit.as_ref()));

        let stranger = Arc::new(AuditFilter);
        let mixed = Capabilities::new()
            .request_filter(audit.clone())
            .response_filter(stranger);
        assert!(!mixed.handles_are(audit.as_ref()));
    }

    #[test]
    fn role_serializes_as_snake_case() {
        let json = serde_json::to_string(&Role::ReactiveInvokerProvider).expect("serialize");
        assert_eq!(json, "\"reactive_invoker_provider\"");
    }
}
