//! Error types for query construction and runtime JSON parsing.

use crate::builder::{IdentifierRole, MAX_LIMIT, Operator};
use thiserror::Error;

/// Result type alias for builder operations.
pub type Result<T, E = QueryError> = std::result::Result<T, E>;

/// A rejected builder call.
///
/// Every variant is raised synchronously by the offending call. The builder is
/// left exactly as it was before that call, so the caller can retry with
/// corrected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QueryError {
    /// Identifier is empty.
    #[error("{role} identifier must not be empty")]
    EmptyIdentifier {
        /// Where the identifier was used.
        role: IdentifierRole,
    },

    /// Identifier is not a member of a non-empty allowlist.
    #[error("{role} identifier `{name}` is not allowed")]
    NotAllowlisted {
        /// Where the identifier was used.
        role: IdentifierRole,
        /// The rejected identifier.
        name: String,
    },

    /// Identifier does not match `^[A-Za-z_][A-Za-z0-9_]*$`.
    #[error(
        "{role} identifier `{name}` must start with a letter or underscore and contain only \
         ASCII letters, digits and underscores"
    )]
    InvalidIdentifierSyntax {
        /// Where the identifier was used.
        role: IdentifierRole,
        /// The rejected identifier.
        name: String,
    },

    /// One or more columns of a `select`/`group_by` batch were rejected.
    #[error("{role} columns not allowed: {}", .columns.join(", "))]
    DisallowedColumns {
        /// Where the columns were used.
        role: IdentifierRole,
        /// Every rejected column, in input order.
        columns: Vec<String>,
    },

    /// Operator text is not one of the 13 supported operators.
    #[error("unsupported operator `{operator}`")]
    UnsupportedOperator {
        /// The operator text as supplied.
        operator: String,
    },

    /// The operand is absent, null or the wrong shape for the operator.
    #[error("operator `{operator}` requires {expected}")]
    MissingValue {
        /// The operator the operand was supplied for.
        operator: Operator,
        /// Human-readable description of the required operand.
        expected: &'static str,
    },

    /// LIMIT outside `1..=10000`.
    #[error("limit must be between 1 and {max}, got {0}", max = MAX_LIMIT)]
    InvalidLimit(i64),

    /// Negative OFFSET.
    #[error("offset must not be negative, got {0}")]
    InvalidOffset(i64),

    /// Sort direction other than `ASC`/`DESC`.
    #[error("invalid sort direction `{0}`, expected ASC or DESC")]
    InvalidDirection(String),

    /// `build()`/`build_count()` called before `from()`.
    #[error("no table selected, call from() before building")]
    MissingFromTable,
}

/// Error type for the runtime JSON surfaces (builder configs and search requests).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Input is not valid JSON.
    #[error("invalid JSON")]
    InvalidJson,

    /// Top-level input is not a JSON object.
    #[error("expected a JSON object")]
    ExpectedObject,

    /// Key not understood by the reader.
    #[error("unknown key `{0}`")]
    UnknownKey(String),

    /// Key holds the wrong JSON type.
    #[error("`{key}` must be {expected}")]
    InvalidField {
        /// The offending key.
        key: String,
        /// Description of what was expected.
        expected: &'static str,
    },

    /// A required key is missing.
    #[error("missing required key `{0}`")]
    MissingKey(&'static str),

    /// Parsed content was rejected by the builder's validators.
    #[error(transparent)]
    Query(#[from] QueryError),
}
