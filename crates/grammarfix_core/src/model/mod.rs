//! Persisted record shapes for grammar-fix sessions and their issues.
//!
//! # Responsibility
//! - Define the two stored entities and their one-to-many relationship.
//! - Own structural invariants shared by repository write and read paths.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil UUID.
//! - An issue always points at the session it was created under.

pub mod issue;
pub mod session;
