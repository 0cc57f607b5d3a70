//! Placeholder dialects for Postgres and `SQLite`.
//!
//! Statements are identical across dialects apart from the placeholder marker.
//! Numbering is always the 1-based position in the parameter list.

/// SQL dialect trait for placeholder syntax.
pub trait Dialect: Clone + Copy {
    /// Format a parameter placeholder (e.g., `$1` for Postgres, `?1` for `SQLite`).
    fn param(&self, idx: usize) -> String;

    /// Short dialect name, used in log events.
    fn name(&self) -> &'static str;
}

/// Postgres dialect (`$1, $2, ...`). The default.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }

    #[inline]
    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// `SQLite` dialect (`?1, ?2, ...`).
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }

    #[inline]
    fn name(&self) -> &'static str {
        "sqlite"
    }
}
