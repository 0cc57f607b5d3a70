//! SELECT query builder.

use super::config::BuilderConfig;
use super::render::{Head, render};
use super::types::{
    Combinator, IdentifierRole, JoinClause, JoinKind, MAX_LIMIT, Operand, OperandShape, Operator,
    OrderClause, QueryResult, SelectList, SortDir, Value, WhereCondition,
};
use crate::dialect::{Dialect, Postgres};
use crate::error::{QueryError, Result};
use crate::validate::{is_valid_sql_identifier, validate_identifier, validate_operand};

/// Clauses accumulated by mutator calls. Cleared by [`QueryBuilder::reset`].
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BuilderState {
    pub(crate) select: SelectList,
    pub(crate) from: Option<String>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) conditions: Vec<WhereCondition>,
    pub(crate) group_by: Vec<String>,
    pub(crate) order_by: Vec<OrderClause>,
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u64>,
}

/// Stateful, allowlist-enforcing SQL query builder.
///
/// Every mutator validates its input before touching the builder. On error
/// the builder is unchanged and can be retried with corrected input. Mutators
/// return `&mut Self` so calls chain with `?`.
///
/// # Example
///
/// ```
/// use deedkit_sql::prelude::*;
///
/// let config = BuilderConfig::new()
///     .tables(&["users"])
///     .select_columns(&["id", "name"])
///     .where_columns(&["status", "role"]);
///
/// let mut query = QueryBuilder::new(config);
/// query
///     .select(&["id", "name"])?
///     .from("users")?
///     .filter("status", Operator::Eq, "active")?
///     .or_filter("role", Operator::Eq, "user")?;
///
/// let result = query.build()?;
/// assert_eq!(
///     result.sql,
///     "SELECT id, name FROM users WHERE status = $1 OR role = $2"
/// );
/// assert_eq!(result.params, vec![Value::from("active"), Value::from("user")]);
/// # Ok::<(), QueryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder<D: Dialect = Postgres> {
    dialect: D,
    config: BuilderConfig,
    state: BuilderState,
}

impl QueryBuilder<Postgres> {
    /// Create a Postgres (`$n` placeholder) builder.
    #[must_use]
    pub fn new(config: BuilderConfig) -> Self {
        Self::with_dialect(Postgres, config)
    }
}

impl<D: Dialect> QueryBuilder<D> {
    /// Create a builder for the given dialect.
    #[must_use]
    pub fn with_dialect(dialect: D, config: BuilderConfig) -> Self {
        Self {
            dialect,
            config,
            state: BuilderState::default(),
        }
    }

    /// The allowlists this builder enforces.
    #[must_use]
    pub const fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Set the SELECT list.
    ///
    /// `["*"]` or an empty slice selects every column. Otherwise every column
    /// is checked against the SELECT allowlist and the identifier syntax; if
    /// any fail, [`QueryError::DisallowedColumns`] names all of them.
    pub fn select<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<&mut Self> {
        let select = match columns {
            [] => SelectList::All,
            [only] if only.as_ref() == "*" => SelectList::All,
            _ => {
                check_batch(columns, IdentifierRole::Select, |column| {
                    validate_identifier(column, &self.config.select_columns, IdentifierRole::Select)
                        .is_ok()
                })?;
                SelectList::Columns(columns.iter().map(|c| c.as_ref().to_string()).collect())
            },
        };

        self.state.select = select;
        Ok(self)
    }

    /// Set the FROM table.
    pub fn from(&mut self, table: &str) -> Result<&mut Self> {
        let table = validate_identifier(table, &self.config.tables, IdentifierRole::Table)?;
        self.state.from = Some(table.to_string());
        Ok(self)
    }

    /// Add a JOIN.
    ///
    /// # Security
    ///
    /// `on` is inserted verbatim. Only pass expressions authored in code,
    /// never user input.
    pub fn join(&mut self, kind: JoinKind, table: &str, on: &str) -> Result<&mut Self> {
        let table = validate_identifier(table, &self.config.tables, IdentifierRole::Join)?;
        self.state.joins.push(JoinClause {
            kind,
            table: table.to_string(),
            on: on.to_string(),
        });
        Ok(self)
    }

    /// Add an `INNER JOIN`. See [`join`](Self::join).
    pub fn inner_join(&mut self, table: &str, on: &str) -> Result<&mut Self> {
        self.join(JoinKind::Inner, table, on)
    }

    /// Add a `LEFT JOIN`. See [`join`](Self::join).
    pub fn left_join(&mut self, table: &str, on: &str) -> Result<&mut Self> {
        self.join(JoinKind::Left, table, on)
    }

    /// Add a `RIGHT JOIN`. See [`join`](Self::join).
    pub fn right_join(&mut self, table: &str, on: &str) -> Result<&mut Self> {
        self.join(JoinKind::Right, table, on)
    }

    /// Add a `FULL JOIN`. See [`join`](Self::join).
    pub fn full_join(&mut self, table: &str, on: &str) -> Result<&mut Self> {
        self.join(JoinKind::Full, table, on)
    }

    /// Add a WHERE condition with an explicit combinator.
    ///
    /// The column is checked against the WHERE allowlist, and the operand
    /// against the operator's required shape. For `IS NULL`/`IS NOT NULL` the
    /// operand is discarded.
    pub fn filter_with(
        &mut self,
        column: &str,
        operator: Operator,
        operand: impl Into<Operand>,
        combinator: Combinator,
    ) -> Result<&mut Self> {
        let column = validate_identifier(column, &self.config.where_columns, IdentifierRole::Where)?;
        let operand = operand.into();
        validate_operand(operator, &operand)?;

        let operand = match operator.shape() {
            OperandShape::Absent => Operand::Absent,
            _ => operand,
        };

        self.state.conditions.push(WhereCondition {
            column: column.to_string(),
            operator,
            operand,
            combinator,
        });
        Ok(self)
    }

    /// Add a WHERE condition joined with `AND`.
    pub fn filter(
        &mut self,
        column: &str,
        operator: Operator,
        operand: impl Into<Operand>,
    ) -> Result<&mut Self> {
        self.filter_with(column, operator, operand, Combinator::And)
    }

    /// Add a WHERE condition joined with `OR`.
    pub fn or_filter(
        &mut self,
        column: &str,
        operator: Operator,
        operand: impl Into<Operand>,
    ) -> Result<&mut Self> {
        self.filter_with(column, operator, operand, Combinator::Or)
    }

    /// `column IN (...)`, joined with `AND`. The list must not be empty.
    pub fn where_in<I>(&mut self, column: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.filter_with(column, Operator::In, Operand::list(values), Combinator::And)
    }

    /// `column IN (...)`, joined with `OR`.
    pub fn or_where_in<I>(&mut self, column: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.filter_with(column, Operator::In, Operand::list(values), Combinator::Or)
    }

    /// `column NOT IN (...)`, joined with `AND`. The list must not be empty.
    pub fn where_not_in<I>(&mut self, column: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.filter_with(column, Operator::NotIn, Operand::list(values), Combinator::And)
    }

    /// `column NOT IN (...)`, joined with `OR`.
    pub fn or_where_not_in<I>(&mut self, column: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.filter_with(column, Operator::NotIn, Operand::list(values), Combinator::Or)
    }

    /// `column IS NULL`, joined with `AND`.
    pub fn where_null(&mut self, column: &str) -> Result<&mut Self> {
        self.filter_with(column, Operator::IsNull, Operand::Absent, Combinator::And)
    }

    /// `column IS NULL`, joined with `OR`.
    pub fn or_where_null(&mut self, column: &str) -> Result<&mut Self> {
        self.filter_with(column, Operator::IsNull, Operand::Absent, Combinator::Or)
    }

    /// `column IS NOT NULL`, joined with `AND`.
    pub fn where_not_null(&mut self, column: &str) -> Result<&mut Self> {
        self.filter_with(column, Operator::IsNotNull, Operand::Absent, Combinator::And)
    }

    /// `column IS NOT NULL`, joined with `OR`.
    pub fn or_where_not_null(&mut self, column: &str) -> Result<&mut Self> {
        self.filter_with(column, Operator::IsNotNull, Operand::Absent, Combinator::Or)
    }

    /// `column BETWEEN min AND max`, joined with `AND`.
    pub fn where_between(
        &mut self,
        column: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.filter_with(column, Operator::Between, Operand::range(min, max), Combinator::And)
    }

    /// `column BETWEEN min AND max`, joined with `OR`.
    pub fn or_where_between(
        &mut self,
        column: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.filter_with(column, Operator::Between, Operand::range(min, max), Combinator::Or)
    }

    /// `column NOT BETWEEN min AND max`, joined with `AND`.
    pub fn where_not_between(
        &mut self,
        column: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.filter_with(
            column,
            Operator::NotBetween,
            Operand::range(min, max),
            Combinator::And,
        )
    }

    /// `column NOT BETWEEN min AND max`, joined with `OR`.
    pub fn or_where_not_between(
        &mut self,
        column: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.filter_with(
            column,
            Operator::NotBetween,
            Operand::range(min, max),
            Combinator::Or,
        )
    }

    /// Set GROUP BY columns.
    ///
    /// A column must be in the SELECT or the WHERE allowlist (any column is
    /// accepted if either allowlist is unrestricted) and must be a valid
    /// identifier. Rejected columns are reported together.
    pub fn group_by<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<&mut Self> {
        let select = &self.config.select_columns;
        let filter = &self.config.where_columns;
        let unrestricted = select.is_unrestricted() || filter.is_unrestricted();

        check_batch(columns, IdentifierRole::GroupBy, |column| {
            (unrestricted || select.contains(column) || filter.contains(column))
                && is_valid_sql_identifier(column)
        })?;

        self.state.group_by = columns.iter().map(|c| c.as_ref().to_string()).collect();
        Ok(self)
    }

    /// Add an ORDER BY entry.
    pub fn order_by(&mut self, column: &str, dir: SortDir) -> Result<&mut Self> {
        let column = validate_identifier(column, &self.config.order_columns, IdentifierRole::OrderBy)?;
        self.state.order_by.push(OrderClause {
            column: column.to_string(),
            dir,
        });
        Ok(self)
    }

    /// Add an ORDER BY entry with the direction given as text (`asc`/`desc`).
    pub fn order_by_str(&mut self, column: &str, dir: &str) -> Result<&mut Self> {
        let dir = SortDir::parse(dir)?;
        self.order_by(column, dir)
    }

    /// Set LIMIT. Must be within `1..=10000`.
    pub fn limit(&mut self, limit: i64) -> Result<&mut Self> {
        self.state.limit = Some(checked_limit(limit)?);
        Ok(self)
    }

    /// Set OFFSET. Must not be negative.
    pub fn offset(&mut self, offset: i64) -> Result<&mut Self> {
        self.state.offset = Some(checked_offset(offset)?);
        Ok(self)
    }

    /// Set LIMIT and OFFSET from a 1-based page number.
    ///
    /// `page(3, 20)` is `LIMIT 20 OFFSET 40`. A page below 1 yields a negative
    /// offset and fails with [`QueryError::InvalidOffset`].
    pub fn page(&mut self, page: i64, per_page: i64) -> Result<&mut Self> {
        let limit = checked_limit(per_page)?;
        let offset = checked_offset(page.saturating_sub(1).saturating_mul(per_page))?;
        self.state.limit = Some(limit);
        self.state.offset = Some(offset);
        Ok(self)
    }

    /// Clear every clause. The config is kept.
    pub fn reset(&mut self) -> &mut Self {
        tracing::trace!("builder reset");
        self.state = BuilderState::default();
        self
    }

    /// Build the SELECT statement and its parameters.
    pub fn build(&self) -> Result<QueryResult> {
        render(&self.dialect, &self.state, Head::Rows)
    }

    /// Build `SELECT COUNT(*) AS total` over the same FROM/JOIN/WHERE/GROUP BY.
    ///
    /// ORDER BY, LIMIT and OFFSET are omitted. Parameters are identical to
    /// [`build`](Self::build).
    pub fn build_count(&self) -> Result<QueryResult> {
        render(&self.dialect, &self.state, Head::Count)
    }
}

fn checked_limit(limit: i64) -> Result<u32> {
    u32::try_from(limit)
        .ok()
        .filter(|l| (1..=MAX_LIMIT).contains(l))
        .ok_or(QueryError::InvalidLimit(limit))
}

fn checked_offset(offset: i64) -> Result<u64> {
    u64::try_from(offset).map_err(|_| QueryError::InvalidOffset(offset))
}

/// Collect every column failing `accept`; error if there are any.
fn check_batch<S: AsRef<str>>(
    columns: &[S],
    role: IdentifierRole,
    mut accept: impl FnMut(&str) -> bool,
) -> Result<()> {
    let mut rejected = Vec::new();
    for column in columns {
        let column: &str = column.as_ref();
        if !accept(column) {
            rejected.push(column.to_string());
        }
    }

    if rejected.is_empty() {
        Ok(())
    } else {
        tracing::warn!(%role, rejected = ?rejected, "columns rejected");
        Err(QueryError::DisallowedColumns {
            role,
            columns: rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Sqlite;

    fn users() -> QueryBuilder {
        QueryBuilder::new(
            BuilderConfig::new()
                .tables(&["users", "roles"])
                .select_columns(&["id", "name", "email"])
                .where_columns(&["status", "role", "age", "deleted_at"])
                .order_columns(&["name", "created_at"]),
        )
    }

    #[test]
    fn test_select_star_by_default() {
        let mut q = users();
        q.from("users").unwrap();
        assert_eq!(q.build().unwrap().sql, "SELECT * FROM users");
    }

    #[test]
    fn test_select_allowlisted_columns() {
        let mut q = users();
        q.select(&["id", "name"]).unwrap().from("users").unwrap();
        let result = q.build().unwrap();
        assert_eq!(result.sql, "SELECT id, name FROM users");
        assert!(result.params.is_empty());
    }

    #[test]
    fn test_select_explicit_star() {
        let mut q = users();
        q.select(&["id"]).unwrap().select(&["*"]).unwrap();
        q.from("users").unwrap();
        assert_eq!(q.build().unwrap().sql, "SELECT * FROM users");
    }

    #[test]
    fn test_select_names_only_offending_columns() {
        let mut q = users();
        let err = q
            .select(&["id", "password", "name", "ssn"])
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::DisallowedColumns {
                role: IdentifierRole::Select,
                columns: vec!["password".into(), "ssn".into()],
            }
        );
    }

    #[test]
    fn test_select_star_mixed_with_columns_is_rejected() {
        let mut q = QueryBuilder::new(BuilderConfig::new());
        assert_eq!(
            q.select(&["id", "*"]).unwrap_err(),
            QueryError::DisallowedColumns {
                role: IdentifierRole::Select,
                columns: vec!["*".into()],
            }
        );
    }

    #[test]
    fn test_failed_select_keeps_previous_list() {
        let mut q = users();
        q.select(&["id"]).unwrap().from("users").unwrap();
        assert!(q.select(&["id", "password"]).is_err());
        assert_eq!(q.build().unwrap().sql, "SELECT id FROM users");
    }

    #[test]
    fn test_from_rejects_unknown_table() {
        let mut q = users();
        assert_eq!(
            q.from("invoices").unwrap_err(),
            QueryError::NotAllowlisted {
                role: IdentifierRole::Table,
                name: "invoices".into()
            }
        );
        assert_eq!(q.build(), Err(QueryError::MissingFromTable));
    }

    #[test]
    fn test_joins_render_in_order() {
        let mut q = users();
        q.from("users")
            .unwrap()
            .inner_join("roles", "roles.id = users.role_id")
            .unwrap()
            .left_join("roles", "roles.parent_id = users.role_id")
            .unwrap();
        assert_eq!(
            q.build().unwrap().sql,
            "SELECT * FROM users INNER JOIN roles ON roles.id = users.role_id \
             LEFT JOIN roles ON roles.parent_id = users.role_id"
        );
    }

    #[test]
    fn test_right_and_full_join() {
        let mut q = QueryBuilder::new(BuilderConfig::new());
        q.from("a")
            .unwrap()
            .right_join("b", "b.a_id = a.id")
            .unwrap()
            .full_join("c", "c.a_id = a.id")
            .unwrap();
        assert_eq!(
            q.build().unwrap().sql,
            "SELECT * FROM a RIGHT JOIN b ON b.a_id = a.id FULL JOIN c ON c.a_id = a.id"
        );
    }

    #[test]
    fn test_join_table_is_validated_with_join_role() {
        let mut q = users();
        assert_eq!(
            q.inner_join("payments", "payments.user_id = users.id")
                .unwrap_err(),
            QueryError::NotAllowlisted {
                role: IdentifierRole::Join,
                name: "payments".into()
            }
        );
    }

    #[test]
    fn test_where_combinators() {
        let mut q = users();
        q.from("users")
            .unwrap()
            .filter("status", Operator::Eq, "active")
            .unwrap()
            .or_filter("role", Operator::Eq, "user")
            .unwrap();
        let result = q.build().unwrap();
        assert_eq!(
            result.sql,
            "SELECT * FROM users WHERE status = $1 OR role = $2"
        );
        assert_eq!(result.params, vec![Value::from("active"), Value::from("user")]);
    }

    #[test]
    fn test_first_condition_combinator_not_emitted() {
        let mut q = users();
        q.from("users")
            .unwrap()
            .or_filter("status", Operator::Eq, "active")
            .unwrap();
        assert_eq!(
            q.build().unwrap().sql,
            "SELECT * FROM users WHERE status = $1"
        );
    }

    #[test]
    fn test_where_in() {
        let mut q = users();
        q.from("users")
            .unwrap()
            .where_in("status", ["active", "pending"])
            .unwrap();
        let result = q.build().unwrap();
        assert_eq!(result.sql, "SELECT * FROM users WHERE status IN ($1, $2)");
        assert_eq!(
            result.params,
            vec![Value::from("active"), Value::from("pending")]
        );
    }

    #[test]
    fn test_where_in_empty_rejected_at_call() {
        let mut q = users();
        q.from("users").unwrap();
        let empty: [&str; 0] = [];
        assert!(matches!(
            q.where_in("status", empty),
            Err(QueryError::MissingValue {
                operator: Operator::In,
                ..
            })
        ));
        assert_eq!(q.build().unwrap().sql, "SELECT * FROM users");
    }

    #[test]
    fn test_every_operator_family_numbering() {
        let mut q = users();
        q.from("users")
            .unwrap()
            .filter("status", Operator::Ne, "banned")
            .unwrap()
            .where_not_in("role", ["guest", "bot"])
            .unwrap()
            .where_null("deleted_at")
            .unwrap()
            .or_where_between("age", 18, 65)
            .unwrap()
            .where_not_between("age", 30, 40)
            .unwrap()
            .filter("status", Operator::Like, "act%")
            .unwrap()
            .or_where_not_null("role")
            .unwrap();

        let result = q.build().unwrap();
        assert_eq!(
            result.sql,
            "SELECT * FROM users WHERE status != $1 AND role NOT IN ($2, $3) \
             AND deleted_at IS NULL OR age BETWEEN $4 AND $5 \
             AND age NOT BETWEEN $6 AND $7 AND status LIKE $8 OR role IS NOT NULL"
        );
        assert_eq!(
            result.params,
            vec![
                Value::from("banned"),
                Value::from("guest"),
                Value::from("bot"),
                Value::Int(18),
                Value::Int(65),
                Value::Int(30),
                Value::Int(40),
                Value::from("act%"),
            ]
        );
    }

    #[test]
    fn test_is_null_discards_supplied_value() {
        let mut q = users();
        q.from("users")
            .unwrap()
            .filter("deleted_at", Operator::IsNull, "ignored")
            .unwrap();
        let result = q.build().unwrap();
        assert_eq!(result.sql, "SELECT * FROM users WHERE deleted_at IS NULL");
        assert!(result.params.is_empty());
    }

    #[test]
    fn test_filter_rejects_null_value() {
        let mut q = users();
        assert_eq!(
            q.filter("status", Operator::Eq, Value::Null).unwrap_err(),
            QueryError::MissingValue {
                operator: Operator::Eq,
                expected: "a non-null value"
            }
        );
    }

    #[test]
    fn test_filter_column_allowlist() {
        let mut q = users();
        assert_eq!(
            q.filter("password_hash", Operator::Eq, "x").unwrap_err(),
            QueryError::NotAllowlisted {
                role: IdentifierRole::Where,
                name: "password_hash".into()
            }
        );
    }

    #[test]
    fn test_group_by_accepts_select_or_where_columns() {
        let mut q = users();
        q.from("users")
            .unwrap()
            .group_by(&["name", "status"])
            .unwrap();
        assert_eq!(
            q.build().unwrap().sql,
            "SELECT * FROM users GROUP BY name, status"
        );
    }

    #[test]
    fn test_group_by_rejects_other_columns() {
        let mut q = users();
        assert_eq!(
            q.group_by(&["status", "created_at", "salary"]).unwrap_err(),
            QueryError::DisallowedColumns {
                role: IdentifierRole::GroupBy,
                columns: vec!["created_at".into(), "salary".into()],
            }
        );
    }

    #[test]
    fn test_group_by_unrestricted_when_either_list_empty() {
        let mut q = QueryBuilder::new(BuilderConfig::new().select_columns(&["id"]));
        q.from("users").unwrap().group_by(&["anything"]).unwrap();
        assert_eq!(
            q.group_by(&["bad name"]).unwrap_err(),
            QueryError::DisallowedColumns {
                role: IdentifierRole::GroupBy,
                columns: vec!["bad name".into()],
            }
        );
    }

    #[test]
    fn test_order_by() {
        let mut q = users();
        q.from("users")
            .unwrap()
            .order_by("name", SortDir::Asc)
            .unwrap()
            .order_by_str("created_at", "desc")
            .unwrap();
        assert_eq!(
            q.build().unwrap().sql,
            "SELECT * FROM users ORDER BY name ASC, created_at DESC"
        );
    }

    #[test]
    fn test_order_by_invalid_direction() {
        let mut q = users();
        assert_eq!(
            q.order_by_str("name", "DESC; DROP TABLE users").unwrap_err(),
            QueryError::InvalidDirection("DESC; DROP TABLE users".into())
        );
        assert_eq!(
            q.order_by("email", SortDir::Asc).unwrap_err(),
            QueryError::NotAllowlisted {
                role: IdentifierRole::OrderBy,
                name: "email".into()
            }
        );
    }

    #[test]
    fn test_limit_bounds() {
        let mut q = users();
        for bad in [0, 10_001, -5, i64::MAX, i64::MIN] {
            assert_eq!(q.limit(bad).unwrap_err(), QueryError::InvalidLimit(bad));
        }
        assert!(q.limit(1).is_ok());
        assert!(q.limit(10_000).is_ok());
    }

    #[test]
    fn test_offset_bounds() {
        let mut q = users();
        assert_eq!(q.offset(-1).unwrap_err(), QueryError::InvalidOffset(-1));
        assert!(q.offset(0).is_ok());
        assert!(q.offset(1_000_000).is_ok());
    }

    #[test]
    fn test_limit_offset_render() {
        let mut q = users();
        q.from("users").unwrap().limit(10).unwrap().offset(30).unwrap();
        assert_eq!(
            q.build().unwrap().sql,
            "SELECT * FROM users LIMIT 10 OFFSET 30"
        );
    }

    #[test]
    fn test_page() {
        let mut q = users();
        q.from("users").unwrap().page(3, 20).unwrap();
        assert_eq!(
            q.build().unwrap().sql,
            "SELECT * FROM users LIMIT 20 OFFSET 40"
        );

        assert_eq!(q.page(0, 20).unwrap_err(), QueryError::InvalidOffset(-20));
        assert_eq!(q.page(1, 0).unwrap_err(), QueryError::InvalidLimit(0));
        // Failed calls leave the previous page in place
        assert_eq!(
            q.build().unwrap().sql,
            "SELECT * FROM users LIMIT 20 OFFSET 40"
        );
    }

    #[test]
    fn test_build_count() {
        let mut q = users();
        q.select(&["id", "name"])
            .unwrap()
            .from("users")
            .unwrap()
            .filter("status", Operator::Eq, "active")
            .unwrap()
            .order_by("name", SortDir::Desc)
            .unwrap()
            .limit(10)
            .unwrap()
            .offset(20)
            .unwrap();

        let rows = q.build().unwrap();
        let count = q.build_count().unwrap();
        assert_eq!(
            rows.sql,
            "SELECT id, name FROM users WHERE status = $1 ORDER BY name DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(
            count.sql,
            "SELECT COUNT(*) AS total FROM users WHERE status = $1"
        );
        assert_eq!(rows.params, count.params);
    }

    #[test]
    fn test_build_is_repeatable() {
        let mut q = users();
        q.from("users")
            .unwrap()
            .where_in("status", ["a", "b"])
            .unwrap();
        let first = q.build().unwrap();
        let _ = q.build_count().unwrap();
        let second = q.build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reset_clears_state_keeps_config() {
        let mut q = users();
        q.select(&["id"])
            .unwrap()
            .from("users")
            .unwrap()
            .filter("status", Operator::Eq, "active")
            .unwrap()
            .limit(5)
            .unwrap();

        q.reset();
        assert_eq!(q.build(), Err(QueryError::MissingFromTable));

        q.from("users").unwrap();
        let result = q.build().unwrap();
        assert_eq!(result.sql, "SELECT * FROM users");
        assert!(result.params.is_empty());

        // Config survived the reset
        assert!(q.from("invoices").is_err());
        assert!(q.config().tables.contains("users"));
        assert!(q.config().order_columns.contains("created_at"));
    }

    #[test]
    fn test_sqlite_dialect() {
        let mut q = QueryBuilder::with_dialect(Sqlite, BuilderConfig::new());
        q.from("users")
            .unwrap()
            .where_in("id", [1, 2, 3])
            .unwrap()
            .filter("name", Operator::Eq, "x")
            .unwrap();
        assert_eq!(
            q.build().unwrap().sql,
            "SELECT * FROM users WHERE id IN (?1, ?2, ?3) AND name = ?4"
        );
    }
}
