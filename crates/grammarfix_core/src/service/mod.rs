//! Access layer: ownership-scoped operations over sessions and issues.
//!
//! # Responsibility
//! - Run the authentication gate, input validation and ownership resolver
//!   before touching the store.
//! - Wrap results in the `{success, data}` envelope.

pub mod envelope;
pub mod error;
pub mod grammar_service;
pub mod input;
