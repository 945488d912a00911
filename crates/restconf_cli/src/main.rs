//! CLI smoke entry point.
//!
//! # Responsibility
//! - Assemble a small server registry through the public `restconf_core` API.
//! - Print the resulting chains as JSON for quick local sanity checks.

use restconf_core::{
    priorities, BodyWriter, Capabilities, Feature, FeatureContext, Provider, ProviderMetadata,
    ProviderRegistry, RegistryResult, RequestFilter, ResponseFilter, Scope,
};
use std::process::ExitCode;
use std::sync::Arc;

struct BearerAuthFilter;

impl Provider for BearerAuthFilter {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata::new().with_priority(priorities::AUTHENTICATION)
    }

    fn capabilities(self: Arc<Self>) -> Capabilities {
        Capabilities::new().request_filter(self)
    }
}

impl RequestFilter for BearerAuthFilter {}

struct ServerHeaderFilter;

impl Provider for ServerHeaderFilter {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata::new().with_priority(priorities::HEADER_DECORATOR)
    }

    fn capabilities(self: Arc<Self>) -> Capabilities {
        Capabilities::new().response_filter(self)
    }
}

impl ResponseFilter for ServerHeaderFilter {}

struct PlainTextWriter;

impl Provider for PlainTextWriter {
    fn metadata(&self) -> ProviderMetadata {
        let metadata = ProviderMetadata::new().with_priority(priorities::ENTITY_CODER);
        match metadata.clone().produces(["text/plain"]) {
            Ok(declared) => declared,
            Err(err) => {
                log::warn!("event=cli_smoke module=cli status=degraded error={err}");
                metadata
            }
        }
    }

    fn capabilities(self: Arc<Self>) -> Capabilities {
        Capabilities::new().typed_body_writer::<String>(self)
    }
}

impl BodyWriter for PlainTextWriter {}

/// Bundles the header filter and the text writer.
struct SmokeFeature;

impl Provider for SmokeFeature {
    fn capabilities(self: Arc<Self>) -> Capabilities {
        Capabilities::new().feature(self)
    }
}

impl Feature for SmokeFeature {
    fn configure(&self, context: &mut FeatureContext<'_>) -> RegistryResult<bool> {
        context
            .property("smoke.bundle", "headers+text")
            .register(Arc::new(ServerHeaderFilter))?
            .register(Arc::new(PlainTextWriter))?;
        Ok(true)
    }
}

fn build_registry() -> RegistryResult<ProviderRegistry> {
    let mut registry = ProviderRegistry::new(Scope::Server);
    registry.register(Arc::new(BearerAuthFilter))?;
    registry.register(Arc::new(SmokeFeature))?;
    Ok(registry)
}

fn main() -> ExitCode {
    if let Err(err) = restconf_core::init_logging(restconf_core::default_log_level(), None) {
        eprintln!("restconf_cli logging disabled: {err}");
    }

    println!("restconf_core version={}", restconf_core::core_version());

    let registry = match build_registry() {
        Ok(registry) => registry,
        Err(err) => {
            log::error!("event=cli_smoke module=cli status=error error={err}");
            eprintln!("restconf_cli registry assembly failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&registry.describe()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("restconf_cli failed to render registry: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{build_registry, PlainTextWriter};
    use restconf_core::{priorities, MediaType, Provider, TypeKey};

    #[test]
    fn text_writer_declares_priority_and_media_type() {
        let metadata = PlainTextWriter.metadata();
        assert_eq!(metadata.priority, Some(priorities::ENTITY_CODER));
        assert_eq!(
            metadata.produces,
            vec![MediaType::parse("text/plain").expect("media type")]
        );
    }

    #[test]
    fn smoke_registry_files_the_bundle() {
        let registry = build_registry().expect("smoke registry");
        assert_eq!(registry.request_filters().len(), 1);
        assert_eq!(registry.response_filters().len(), 1);
        assert_eq!(
            registry
                .resource_writers()
                .get(&TypeKey::of::<String>())
                .len(),
            1
        );
    }
}
