//! Pre-configured builders for the back-office entities.
//!
//! Presets fix the allowlists only. The FROM table is still chosen by the
//! caller, so the same preset covers joins from any of its listed tables.

use super::config::BuilderConfig;
use super::select::QueryBuilder;

/// Constructors for entity-scoped [`QueryBuilder`]s.
///
/// # Example
///
/// ```
/// use deedkit_sql::prelude::*;
///
/// let mut query = BuilderFactory::contract_query();
/// query
///     .from("contracts")?
///     .filter("status", Operator::Eq, "active")?
///     .order_by("start_date", SortDir::Desc)?;
///
/// assert_eq!(
///     query.build()?.sql,
///     "SELECT * FROM contracts WHERE status = $1 ORDER BY start_date DESC"
/// );
/// assert!(query.filter("monthly_rent", Operator::Gt, 0).is_err());
/// # Ok::<(), QueryError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct BuilderFactory;

impl BuilderFactory {
    /// Allowlists for the `users` table.
    #[must_use]
    pub fn user_config() -> BuilderConfig {
        BuilderConfig::new()
            .tables(&["users"])
            .select_columns(&["id", "email", "full_name", "role", "status", "created_at"])
            .where_columns(&["id", "email", "role", "status", "created_at"])
            .order_columns(&["full_name", "email", "created_at"])
    }

    /// Allowlists for `documents` and the tables it joins.
    #[must_use]
    pub fn document_config() -> BuilderConfig {
        BuilderConfig::new()
            .tables(&["documents", "templates", "properties"])
            .select_columns(&[
                "id",
                "title",
                "kind",
                "status",
                "property_id",
                "template_id",
                "created_at",
                "updated_at",
            ])
            .where_columns(&["id", "kind", "status", "property_id", "template_id", "created_at"])
            .order_columns(&["title", "created_at", "updated_at"])
    }

    /// Allowlists for `contracts` and the tables it joins.
    #[must_use]
    pub fn contract_config() -> BuilderConfig {
        BuilderConfig::new()
            .tables(&["contracts", "properties", "tenants"])
            .select_columns(&[
                "id",
                "contract_number",
                "property_id",
                "tenant_id",
                "status",
                "start_date",
                "end_date",
                "monthly_rent",
            ])
            .where_columns(&[
                "id",
                "contract_number",
                "property_id",
                "tenant_id",
                "status",
                "start_date",
                "end_date",
            ])
            .order_columns(&["contract_number", "start_date", "end_date", "monthly_rent"])
    }

    /// Allowlists for `key_handovers` and the tables it joins.
    #[must_use]
    pub fn key_handover_config() -> BuilderConfig {
        BuilderConfig::new()
            .tables(&["key_handovers", "properties", "contracts"])
            .select_columns(&[
                "id",
                "property_id",
                "contract_id",
                "handed_over_at",
                "key_count",
                "recipient_name",
            ])
            .where_columns(&["id", "property_id", "contract_id", "handed_over_at"])
            .order_columns(&["handed_over_at", "key_count"])
    }

    /// Builder for user listings.
    #[must_use]
    pub fn user_query() -> QueryBuilder {
        QueryBuilder::new(Self::user_config())
    }

    /// Builder for document listings.
    #[must_use]
    pub fn document_query() -> QueryBuilder {
        QueryBuilder::new(Self::document_config())
    }

    /// Builder for contract listings.
    #[must_use]
    pub fn contract_query() -> QueryBuilder {
        QueryBuilder::new(Self::contract_config())
    }

    /// Builder for key handover listings.
    #[must_use]
    pub fn key_handover_query() -> QueryBuilder {
        QueryBuilder::new(Self::key_handover_config())
    }

    /// Builder with no allowlists. Identifier syntax is still enforced.
    ///
    /// Only for queries whose identifiers are written in code.
    #[must_use]
    pub fn unrestricted() -> QueryBuilder {
        QueryBuilder::new(BuilderConfig::new())
    }
}

/// Shorthand for [`BuilderFactory::user_query`].
#[must_use]
pub fn user_query() -> QueryBuilder {
    BuilderFactory::user_query()
}

/// Shorthand for [`BuilderFactory::document_query`].
#[must_use]
pub fn document_query() -> QueryBuilder {
    BuilderFactory::document_query()
}

/// Shorthand for [`BuilderFactory::contract_query`].
#[must_use]
pub fn contract_query() -> QueryBuilder {
    BuilderFactory::contract_query()
}

/// Shorthand for [`BuilderFactory::key_handover_query`].
#[must_use]
pub fn key_handover_query() -> QueryBuilder {
    BuilderFactory::key_handover_query()
}
