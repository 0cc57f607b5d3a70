//! Statement rendering from structured builder state.
//!
//! Rendering never mutates the builder. The parameter list is local to each
//! call and every placeholder is numbered with the position its value takes
//! in that list at the moment it is pushed.

use super::select::BuilderState;
use super::types::{Operand, QueryResult, SelectList, Value, WhereCondition};
use crate::dialect::Dialect;
use crate::error::QueryError;

/// Leading SELECT clause of a rendered statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Head {
    /// The configured SELECT list, followed by ORDER BY/LIMIT/OFFSET.
    Rows,
    /// `COUNT(*) AS total`; ORDER BY/LIMIT/OFFSET are dropped.
    Count,
}

/// Render `state` into SQL text and its parameter list.
pub(crate) fn render<D: Dialect>(
    dialect: &D,
    state: &BuilderState,
    head: Head,
) -> Result<QueryResult, QueryError> {
    let table = state
        .from
        .as_deref()
        .ok_or(QueryError::MissingFromTable)?;

    let mut sql = String::new();
    let mut params = Vec::new();

    // SELECT clause
    match head {
        Head::Rows => match &state.select {
            SelectList::All => sql.push_str("SELECT *"),
            SelectList::Columns(columns) => {
                sql.push_str(&format!("SELECT {}", columns.join(", ")));
            },
        },
        Head::Count => sql.push_str("SELECT COUNT(*) AS total"),
    }

    sql.push_str(&format!(" FROM {table}"));

    // JOIN clauses
    for join in &state.joins {
        sql.push_str(&format!(" {} JOIN {} ON {}", join.kind, join.table, join.on));
    }

    // WHERE clause
    for (i, condition) in state.conditions.iter().enumerate() {
        if i == 0 {
            sql.push_str(" WHERE ");
        } else {
            sql.push_str(&format!(" {} ", condition.combinator));
        }
        sql.push_str(&render_condition(dialect, condition, &mut params));
    }

    // GROUP BY clause
    if !state.group_by.is_empty() {
        sql.push_str(&format!(" GROUP BY {}", state.group_by.join(", ")));
    }

    if head == Head::Rows {
        // ORDER BY clause
        if !state.order_by.is_empty() {
            let sort_parts: Vec<String> = state
                .order_by
                .iter()
                .map(|o| format!("{} {}", o.column, o.dir))
                .collect();
            sql.push_str(&format!(" ORDER BY {}", sort_parts.join(", ")));
        }

        // LIMIT/OFFSET clause
        if let Some(limit) = state.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = state.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }

    tracing::debug!(
        dialect = dialect.name(),
        ?head,
        params = params.len(),
        sql = %sql,
        "rendered statement"
    );

    Ok(QueryResult { sql, params })
}

/// Render one condition, pushing its values onto `params`.
fn render_condition<D: Dialect>(
    dialect: &D,
    condition: &WhereCondition,
    params: &mut Vec<Value>,
) -> String {
    let mut bind = |value: &Value| {
        params.push(value.clone());
        dialect.param(params.len())
    };

    let column = &condition.column;
    let op = condition.operator;

    match &condition.operand {
        Operand::Absent => format!("{column} {op}"),
        Operand::Single(value) => format!("{column} {op} {}", bind(value)),
        Operand::List(values) => {
            let placeholders: Vec<String> = values.iter().map(&mut bind).collect();
            format!("{column} {op} ({})", placeholders.join(", "))
        },
        Operand::Range { min, max } => {
            let min = bind(min);
            let max = bind(max);
            format!("{column} {op} {min} AND {max}")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::types::{Combinator, JoinClause, JoinKind, Operator};
    use crate::dialect::{Postgres, Sqlite};

    fn condition(column: &str, operator: Operator, operand: Operand) -> WhereCondition {
        WhereCondition {
            column: column.to_string(),
            operator,
            operand,
            combinator: Combinator::And,
        }
    }

    fn state_for(table: &str) -> BuilderState {
        BuilderState {
            from: Some(table.to_string()),
            ..BuilderState::default()
        }
    }

    #[test]
    fn test_missing_from_table() {
        let state = BuilderState::default();
        assert_eq!(
            render(&Postgres, &state, Head::Rows),
            Err(QueryError::MissingFromTable)
        );
        assert_eq!(
            render(&Postgres, &state, Head::Count),
            Err(QueryError::MissingFromTable)
        );
    }

    #[test]
    fn test_is_null_binds_nothing() {
        let mut params = Vec::new();
        let sql = render_condition(
            &Postgres,
            &condition("archived_at", Operator::IsNull, Operand::Absent),
            &mut params,
        );
        assert_eq!(sql, "archived_at IS NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn test_in_numbers_duplicates_by_position() {
        let mut params = vec![Value::from("earlier")];
        let sql = render_condition(
            &Postgres,
            &condition("status", Operator::In, Operand::list(["a", "a", "b"])),
            &mut params,
        );
        assert_eq!(sql, "status IN ($2, $3, $4)");
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_not_between_sqlite() {
        let mut params = Vec::new();
        let sql = render_condition(
            &Sqlite,
            &condition("rent", Operator::NotBetween, Operand::range(100, 200)),
            &mut params,
        );
        assert_eq!(sql, "rent NOT BETWEEN ?1 AND ?2");
        assert_eq!(params, vec![Value::Int(100), Value::Int(200)]);
    }

    #[test]
    fn test_render_twice_is_identical() {
        let mut state = state_for("users");
        state
            .conditions
            .push(condition("status", Operator::Eq, Operand::from("active")));

        let first = render(&Postgres, &state, Head::Rows).unwrap();
        let second = render(&Postgres, &state, Head::Rows).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.sql, "SELECT * FROM users WHERE status = $1");
    }

    #[test]
    fn test_count_drops_order_limit_offset() {
        let mut state = state_for("contracts");
        state.joins.push(JoinClause {
            kind: JoinKind::Left,
            table: "tenants".into(),
            on: "tenants.id = contracts.tenant_id".into(),
        });
        state
            .conditions
            .push(condition("status", Operator::Ne, Operand::from("void")));
        state.limit = Some(10);
        state.offset = Some(20);

        let count = render(&Postgres, &state, Head::Count).unwrap();
        assert_eq!(
            count.sql,
            "SELECT COUNT(*) AS total FROM contracts \
             LEFT JOIN tenants ON tenants.id = contracts.tenant_id WHERE status != $1"
        );
        assert_eq!(count.params, vec![Value::from("void")]);
    }
}
