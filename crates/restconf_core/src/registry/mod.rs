//! Provider registry.
//!
//! # Responsibility
//! - Own the ordered chains and typed tables a request pipeline consumes.
//! - Provide registration, feature activation and snapshot derivation.
//!
//! # Invariants
//! - All mutation happens during assembly, from one logical call sequence.
//! - Lookups report absence as empty results, never as errors.

pub mod configuration;
pub mod description;
pub mod entry;
pub mod error;
pub mod feature_context;
pub mod provider_registry;
