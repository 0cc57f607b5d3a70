// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::missing_errors_doc)] // Every mutator returns QueryError; documented on the type
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self
#![allow(clippy::must_use_candidate)] // Fluent API doesn't need must_use
#![allow(clippy::match_same_arms)] // Clearer in operator tables
#![allow(clippy::format_push_string)] // String building style preference
#![allow(clippy::double_must_use)] // Functions returning must_use types can have their own docs

//! # deedkit-sql - Allowlisted, Parameterized SELECT Builder
//!
//! Builds SELECT and `COUNT(*)` statements for the back-office list pages.
//! Every identifier is checked against a per-builder allowlist and a strict
//! identifier syntax, and every value is bound as a numbered placeholder.
//! User input never reaches the SQL text.
//!
//! ## Quick Start
//!
//! ```
//! # use deedkit_sql::prelude::*;
//! let config = BuilderConfig::new()
//!     .tables(&["properties"])
//!     .select_columns(&["id", "city", "monthly_rent"])
//!     .where_columns(&["city", "monthly_rent", "archived_at"])
//!     .order_columns(&["monthly_rent"]);
//!
//! let mut query = QueryBuilder::new(config);
//! query
//!     .select(&["id", "city", "monthly_rent"])?
//!     .from("properties")?
//!     .where_in("city", ["Berlin", "Hamburg"])?
//!     .where_between("monthly_rent", 800, 1500)?
//!     .where_null("archived_at")?
//!     .order_by("monthly_rent", SortDir::Asc)?
//!     .page(2, 25)?;
//!
//! let rows = query.build()?;
//! assert_eq!(
//!     rows.sql,
//!     "SELECT id, city, monthly_rent FROM properties \
//!      WHERE city IN ($1, $2) AND monthly_rent BETWEEN $3 AND $4 AND archived_at IS NULL \
//!      ORDER BY monthly_rent ASC LIMIT 25 OFFSET 25"
//! );
//!
//! let count = query.build_count()?;
//! assert_eq!(
//!     count.sql,
//!     "SELECT COUNT(*) AS total FROM properties \
//!      WHERE city IN ($1, $2) AND monthly_rent BETWEEN $3 AND $4 AND archived_at IS NULL"
//! );
//! assert_eq!(rows.params, count.params);
//! # Ok::<(), QueryError>(())
//! ```
//!
//! ## `SQLite` Dialect
//!
//! Use `sqlite()` for `SQLite` syntax (?1, ?2 instead of $1, $2):
//!
//! ```
//! # use deedkit_sql::prelude::*;
//! let mut query = sqlite(BuilderConfig::new());
//! query.from("users")?.filter("active", Operator::Eq, true)?;
//!
//! assert_eq!(query.build()?.sql, "SELECT * FROM users WHERE active = ?1");
//! # Ok::<(), QueryError>(())
//! ```
//!
//! ## Supported Operators
//!
//! | Operator | SQL | Operand |
//! |----------|-----|---------|
//! | `Eq` | `=` | value |
//! | `Ne` | `!=` | value |
//! | `Gt` | `>` | value |
//! | `Gte` | `>=` | value |
//! | `Lt` | `<` | value |
//! | `Lte` | `<=` | value |
//! | `Like` | `LIKE` | value |
//! | `In` | `IN ($1, ...)` | non-empty list |
//! | `NotIn` | `NOT IN ($1, ...)` | non-empty list |
//! | `IsNull` | `IS NULL` | none |
//! | `IsNotNull` | `IS NOT NULL` | none |
//! | `Between` | `BETWEEN $1 AND $2` | min, max |
//! | `NotBetween` | `NOT BETWEEN $1 AND $2` | min, max |
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber. Rejected
//! identifiers and operands are logged at `warn`, rendered statements at
//! `debug` (SQL text and parameter count, never parameter values).

mod builder;
mod dialect;
mod error;
mod validate;

pub use builder::{
    Allowlist, BuilderConfig, BuilderFactory, Combinator, ConditionSpec, IdentifierRole, JoinKind,
    MAX_LIMIT, Operand, OperandShape, Operator, OrderSpec, QueryBuilder, QueryRequest,
    QueryResult, SortDir, Value, contract_query, document_query, key_handover_query,
    parse_request, user_query,
};

/// Re-export miniserde's json module for runtime request parsing.
///
/// # Example
///
/// ```
/// use deedkit_sql::{Value, json};
///
/// let raw: json::Value = json::from_str("\"active\"").unwrap();
/// assert_eq!(Value::from_json(&raw), Some(Value::from("active")));
/// ```
pub use miniserde::json;

pub use dialect::{Dialect, Postgres, Sqlite};
pub use error::{ParseError, QueryError, Result};
pub use validate::{
    is_reserved_word, is_valid_sql_identifier, validate_identifier, validate_operand,
    validate_operator,
};

/// Build a query for Postgres.
///
/// Convenience function that creates a `QueryBuilder` with Postgres dialect.
#[must_use]
pub fn postgres(config: BuilderConfig) -> QueryBuilder<Postgres> {
    QueryBuilder::with_dialect(Postgres, config)
}

/// Build a query for `SQLite`.
///
/// Convenience function that creates a `QueryBuilder` with `SQLite` dialect.
#[must_use]
pub fn sqlite(config: BuilderConfig) -> QueryBuilder<Sqlite> {
    QueryBuilder::with_dialect(Sqlite, config)
}

/// Prelude module for convenient imports.
///
/// ```
/// use deedkit_sql::prelude::*;
///
/// let mut query = user_query();
/// query.select(&["id", "email"])?.from("users")?;
/// assert_eq!(query.build()?.sql, "SELECT id, email FROM users");
/// # Ok::<(), QueryError>(())
/// ```
pub mod prelude {
    pub use crate::{
        Allowlist, BuilderConfig, BuilderFactory, Combinator, Dialect, IdentifierRole, JoinKind,
        Operand, Operator, ParseError, Postgres, QueryBuilder, QueryError, QueryRequest,
        QueryResult, SortDir, Sqlite, Value, contract_query, document_query, json,
        key_handover_query, parse_request, postgres, sqlite, user_query,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
