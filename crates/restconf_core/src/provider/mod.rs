//! Provider contracts.
//!
//! # Responsibility
//! - Define what a registrable provider is and how it declares its roles,
//!   metadata and concrete identity.
//!
//! # Invariants
//! - Capability detection is explicit: the registry only files roles a
//!   provider returns from `Provider::capabilities`.

pub mod capability;
pub mod class;
pub mod metadata;
pub mod priority;
pub mod roles;
pub mod type_key;
