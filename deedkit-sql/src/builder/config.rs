//! Allowlist configuration fixed at builder construction.

use std::collections::BTreeSet;

use miniserde::json::{self, Value as JsonValue};

use super::parse::string_list;
use super::types::IdentifierRole;
use crate::error::{ParseError, QueryError};
use crate::validate::is_valid_sql_identifier;

/// A closed set of permitted identifiers.
///
/// An empty allowlist is unrestricted: every syntactically valid identifier
/// is permitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist(BTreeSet<String>);

impl Allowlist {
    /// Create an allowlist from names.
    #[must_use]
    pub fn new(names: &[&str]) -> Self {
        names.iter().copied().collect()
    }

    /// Whether this allowlist places no restriction.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `name` is a listed member. Always false for an empty list.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Whether `name` passes this allowlist (member, or list unrestricted).
    #[must_use]
    pub fn permits(&self, name: &str) -> bool {
        self.is_unrestricted() || self.contains(name)
    }

    /// Number of listed names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Same as [`is_unrestricted`](Self::is_unrestricted).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Listed names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Allowlist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Allowlists a [`QueryBuilder`](crate::QueryBuilder) enforces for its whole
/// lifetime.
///
/// Every allowlist defaults to unrestricted. Names in an allowlist still have
/// to pass the identifier syntax check when used.
///
/// # Example
///
/// ```
/// use deedkit_sql::BuilderConfig;
///
/// let config = BuilderConfig::new()
///     .tables(&["properties"])
///     .select_columns(&["id", "city", "monthly_rent"])
///     .where_columns(&["city", "status"])
///     .order_columns(&["monthly_rent"]);
///
/// assert!(config.tables.contains("properties"));
/// assert!(!config.where_columns.permits("owner_ssn"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct BuilderConfig {
    /// Columns allowed in the SELECT list.
    pub select_columns: Allowlist,
    /// Columns allowed in WHERE conditions.
    pub where_columns: Allowlist,
    /// Columns allowed in ORDER BY.
    pub order_columns: Allowlist,
    /// Tables allowed in FROM and JOIN.
    pub tables: Allowlist,
}

impl BuilderConfig {
    /// Create an unrestricted config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT column allowlist.
    #[must_use]
    pub fn select_columns(mut self, columns: &[&str]) -> Self {
        self.select_columns = Allowlist::new(columns);
        self
    }

    /// Set the WHERE column allowlist.
    #[must_use]
    pub fn where_columns(mut self, columns: &[&str]) -> Self {
        self.where_columns = Allowlist::new(columns);
        self
    }

    /// Set the ORDER BY column allowlist.
    #[must_use]
    pub fn order_columns(mut self, columns: &[&str]) -> Self {
        self.order_columns = Allowlist::new(columns);
        self
    }

    /// Set the table allowlist.
    #[must_use]
    pub fn tables(mut self, tables: &[&str]) -> Self {
        self.tables = Allowlist::new(tables);
        self
    }

    /// Load a config from JSON.
    ///
    /// Recognised keys are `select_columns`, `where_columns`, `order_columns`
    /// and `tables`, each an array of strings; all are optional. Every name is
    /// checked for identifier syntax so a bad config fails at load time with
    /// [`QueryError::InvalidIdentifierSyntax`] naming the first bad entry.
    ///
    /// # Example
    ///
    /// ```
    /// use deedkit_sql::BuilderConfig;
    ///
    /// let config = BuilderConfig::from_json(
    ///     r#"{"tables": ["contracts"], "where_columns": ["status", "tenant_id"]}"#,
    /// ).unwrap();
    ///
    /// assert!(config.tables.contains("contracts"));
    /// assert!(config.select_columns.is_unrestricted());
    /// ```
    pub fn from_json(input: &str) -> Result<Self, ParseError> {
        let value: JsonValue = json::from_str(input).map_err(|_| ParseError::InvalidJson)?;
        let JsonValue::Object(object) = value else {
            return Err(ParseError::ExpectedObject);
        };

        let mut config = Self::default();
        for (key, value) in object.iter() {
            let (slot, role) = match key.as_str() {
                "select_columns" => (&mut config.select_columns, IdentifierRole::Select),
                "where_columns" => (&mut config.where_columns, IdentifierRole::Where),
                "order_columns" => (&mut config.order_columns, IdentifierRole::OrderBy),
                "tables" => (&mut config.tables, IdentifierRole::Table),
                _ => return Err(ParseError::UnknownKey(key.clone())),
            };

            let names = string_list(key, value)?;
            if let Some(name) = names.iter().find(|name| !is_valid_sql_identifier(name)) {
                return Err(QueryError::InvalidIdentifierSyntax {
                    role,
                    name: name.clone(),
                }
                .into());
            }

            *slot = names.into_iter().collect();
        }

        Ok(config)
    }
}
