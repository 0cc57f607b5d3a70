//! Core types for the SQL query builder.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::QueryError;

/// Maximum accepted LIMIT.
pub const MAX_LIMIT: u32 = 10_000;

/// SQL comparison operators.
///
/// This is the complete set the builder will ever render; operator text from
/// callers is parsed into one of these or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal: `=`
    Eq,
    /// Not equal: `!=`
    Ne,
    /// Greater than: `>`
    Gt,
    /// Less than: `<`
    Lt,
    /// Greater than or equal: `>=`
    Gte,
    /// Less than or equal: `<=`
    Lte,
    /// Pattern match: `LIKE`
    Like,
    /// In list: `IN ($1, $2, ...)`
    In,
    /// Not in list: `NOT IN ($1, $2, ...)`
    NotIn,
    /// `IS NULL`, takes no value
    IsNull,
    /// `IS NOT NULL`, takes no value
    IsNotNull,
    /// Inclusive range: `BETWEEN $1 AND $2`
    Between,
    /// Outside range: `NOT BETWEEN $1 AND $2`
    NotBetween,
}

/// The operand shape an operator expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// No value (`IS NULL`, `IS NOT NULL`).
    Absent,
    /// One scalar value.
    Single,
    /// A non-empty list of values.
    List,
    /// A `min`/`max` pair.
    Range,
}

impl Operator {
    /// Every supported operator.
    pub const ALL: [Self; 13] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Lt,
        Self::Gte,
        Self::Lte,
        Self::Like,
        Self::In,
        Self::NotIn,
        Self::IsNull,
        Self::IsNotNull,
        Self::Between,
        Self::NotBetween,
    ];

    /// SQL text of the operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
        }
    }

    /// Operand shape required by this operator.
    #[must_use]
    pub const fn shape(self) -> OperandShape {
        match self {
            Self::IsNull | Self::IsNotNull => OperandShape::Absent,
            Self::In | Self::NotIn => OperandShape::List,
            Self::Between | Self::NotBetween => OperandShape::Range,
            Self::Eq | Self::Ne | Self::Gt | Self::Lt | Self::Gte | Self::Lte | Self::Like => {
                OperandShape::Single
            },
        }
    }

    /// Parse operator text.
    ///
    /// Matching is case-insensitive, and runs of whitespace, `-` or `_` between
    /// words are treated as a single space, so `not in`, `NOT-IN` and
    /// `is_not_null` are all accepted. Outer whitespace is ignored, but `-` or
    /// `_` at either end is rejected.
    ///
    /// ```
    /// use deedkit_sql::Operator;
    ///
    /// assert_eq!(Operator::parse(">=").unwrap(), Operator::Gte);
    /// assert_eq!(Operator::parse("not-in").unwrap(), Operator::NotIn);
    /// assert!(Operator::parse("= 1 OR 1").is_err());
    /// assert!(Operator::parse("-in-").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        let unsupported = || QueryError::UnsupportedOperator {
            operator: text.to_string(),
        };

        let trimmed = text.trim();
        if trimmed.starts_with(['-', '_']) || trimmed.ends_with(['-', '_']) {
            return Err(unsupported());
        }

        let normalized = trimmed
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        Self::ALL
            .into_iter()
            .find(|op| op.as_sql() == normalized)
            .ok_or_else(unsupported)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// SQL parameter values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    String(String),
    /// Calendar date.
    Date(NaiveDate),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Whether this is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => String,
    &str => String,
    NaiveDate => Date,
    DateTime<Utc> => DateTime,
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// The value side of a WHERE condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No value, for `IS NULL`/`IS NOT NULL`.
    Absent,
    /// One value.
    Single(Value),
    /// A list of values, for `IN`/`NOT IN`.
    List(Vec<Value>),
    /// A `min`/`max` pair, for `BETWEEN`/`NOT BETWEEN`.
    Range {
        /// Lower bound (rendered first).
        min: Value,
        /// Upper bound.
        max: Value,
    },
}

impl Operand {
    /// No value.
    #[must_use]
    pub const fn none() -> Self {
        Self::Absent
    }

    /// One value.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Single(value.into())
    }

    /// A list of values.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// A `min`/`max` pair.
    pub fn range(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self::Range {
            min: min.into(),
            max: max.into(),
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Self::Single(v)
    }
}

impl From<Vec<Value>> for Operand {
    fn from(values: Vec<Value>) -> Self {
        Self::List(values)
    }
}

macro_rules! operand_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Self::Single(v.into())
                }
            }
        )*
    };
}

operand_from_scalar!(
    bool,
    i32,
    i64,
    u32,
    f64,
    String,
    &str,
    NaiveDate,
    DateTime<Utc>,
);

/// How a WHERE condition joins the condition before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// `AND`
    #[default]
    And,
    /// `OR`
    Or,
}

impl Combinator {
    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// JOIN flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
    /// `FULL JOIN`
    Full,
}

impl JoinKind {
    /// SQL keyword preceding `JOIN`.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDir {
    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parse `ASC`/`DESC`, ignoring case and surrounding whitespace.
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if trimmed.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(QueryError::InvalidDirection(text.to_string()))
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortDir {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The clause an identifier is used in. Carried by identifier errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierRole {
    /// SELECT list column.
    Select,
    /// FROM table.
    Table,
    /// JOIN table.
    Join,
    /// WHERE column.
    Where,
    /// GROUP BY column.
    GroupBy,
    /// ORDER BY column.
    OrderBy,
}

impl fmt::Display for IdentifierRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Select => "SELECT",
            Self::Table => "FROM",
            Self::Join => "JOIN",
            Self::Where => "WHERE",
            Self::GroupBy => "GROUP BY",
            Self::OrderBy => "ORDER BY",
        })
    }
}

/// SELECT list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum SelectList {
    #[default]
    All,
    Columns(Vec<String>),
}

/// A validated WHERE condition.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WhereCondition {
    pub(crate) column: String,
    pub(crate) operator: Operator,
    pub(crate) operand: Operand,
    pub(crate) combinator: Combinator,
}

/// A validated JOIN. `on` is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JoinClause {
    pub(crate) kind: JoinKind,
    pub(crate) table: String,
    pub(crate) on: String,
}

/// A validated ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderClause {
    pub(crate) column: String,
    pub(crate) dir: SortDir,
}

/// Query result with SQL string and parameters.
///
/// Placeholder `$i` (or `?i`) in `sql` refers to `params[i - 1]`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "QueryResult must be used to execute the query"]
pub struct QueryResult {
    /// Statement text with numbered placeholders.
    pub sql: String,
    /// Bound values, in placeholder order.
    pub params: Vec<Value>,
}

impl QueryResult {
    /// Number of placeholders in `sql` (equal to `params.len()`).
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.params.len()
    }

    /// Split into `(sql, params)`.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}
