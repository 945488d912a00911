//! Ordered containers backing the registry.
//!
//! # Invariants
//! - Insertion order is preserved within a bucket / key.
//! - Neither container supports removal.

pub mod priority_map;
pub mod typed_table;
