//! Product catalog domain model.
//!
//! # Responsibility
//! - Define the canonical product record and its category enumeration.
//! - Own the validation and (de)serialization contract for products.
//!
//! # Invariants
//! - Validation failure messages are stable and part of the public contract.
//! - `deserialize` never assigns the surrogate `id`.

pub mod product;
