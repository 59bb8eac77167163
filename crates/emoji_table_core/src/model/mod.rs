//! Domain model shared by every pipeline stage.
//!
//! # Responsibility
//! - Define raw and normalized emoji records.
//! - Provide the ordered group/subgroup container that carries them.
//!
//! # Invariants
//! - Group, subgroup and entry order always equals source declaration order.
//! - `Entry::canonical_name` is unique across one built table.

pub mod entry;
pub mod tree;
