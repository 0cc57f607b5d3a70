//! Security validation layer for identifiers, operators and operands.
//!
//! This module provides validation for:
//! - SQL identifiers (table names, column names) against the identifier
//!   syntax, the reserved keyword list and an optional allowlist
//! - Operator text, parsed into the closed [`Operator`](crate::Operator) set
//! - Operand shape per operator (present, non-null, list, range)
//!
//! All checks are pure functions; the builder calls them before touching its
//! state.

mod identifier;
mod operand;

// Re-export all public items
pub use identifier::{is_reserved_word, is_valid_sql_identifier, validate_identifier};
pub use operand::{validate_operand, validate_operator};
