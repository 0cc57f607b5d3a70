//! Runtime JSON parsing for front-end search requests.
//!
//! The back-office list pages post their filter/sort state as JSON. This
//! module reads that JSON into a [`QueryRequest`] and replays it through the
//! normal validated builder calls, so a request can never do more than the
//! caller could do by hand.
//!
//! # Quick Start
//!
//! ```
//! use deedkit_sql::prelude::*;
//!
//! let request = parse_request(r#"{
//!     "select": ["id", "title"],
//!     "where": [
//!         {"column": "status", "op": "IN", "value": ["draft", "sent"]},
//!         {"column": "kind", "op": "=", "value": "notice", "combinator": "OR"}
//!     ],
//!     "order_by": [{"column": "title", "direction": "desc"}],
//!     "limit": 20
//! }"#).unwrap();
//!
//! let mut query = document_query();
//! query.from("documents").unwrap();
//! request.apply(&mut query).unwrap();
//!
//! let result = query.build().unwrap();
//! assert_eq!(
//!     result.sql,
//!     "SELECT id, title FROM documents WHERE status IN ($1, $2) OR kind = $3 \
//!      ORDER BY title DESC LIMIT 20"
//! );
//! ```
//!
//! # Request Shape
//!
//! | Key | Type | Builder call |
//! |-----|------|--------------|
//! | `select` | `[string]` | `select` |
//! | `where` | `[{column, op, value?, combinator?}]` | `filter_with` |
//! | `group_by` | `[string]` | `group_by` |
//! | `order_by` | `[{column, direction?}]` | `order_by` |
//! | `limit` | integer | `limit` |
//! | `offset` | integer | `offset` |
//!
//! `BETWEEN` values are either `[min, max]` or `{"min": .., "max": ..}`.
//! The table is never read from a request.

use miniserde::json::{self, Number, Object, Value as JsonValue};

use super::select::QueryBuilder;
use super::types::{Combinator, Operand, OperandShape, Operator, SortDir, Value};
use crate::dialect::Dialect;
use crate::error::{ParseError, QueryError};

impl Value {
    /// Convert a scalar JSON value.
    ///
    /// Arrays, objects and integers beyond `i64` return `None`.
    ///
    /// ```
    /// use deedkit_sql::Value;
    /// use miniserde::json::{Number, Value as JsonValue};
    ///
    /// let json = JsonValue::Number(Number::I64(42));
    /// assert_eq!(Value::from_json(&json), Some(Value::Int(42)));
    /// ```
    #[must_use]
    pub fn from_json(json: &JsonValue) -> Option<Self> {
        match json {
            JsonValue::Null => Some(Self::Null),
            JsonValue::Bool(b) => Some(Self::Bool(*b)),
            JsonValue::Number(n) => match n {
                Number::I64(i) => Some(Self::Int(*i)),
                Number::U64(u) => i64::try_from(*u).ok().map(Self::Int),
                Number::F64(f) => Some(Self::Float(*f)),
            },
            JsonValue::String(s) => Some(Self::String(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }
}

/// One WHERE condition from a request.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ConditionSpec {
    /// Column name (validated on apply).
    pub column: String,
    /// Parsed operator.
    pub operator: Operator,
    /// Parsed operand (shape validated on apply).
    pub operand: Operand,
    /// Join to the previous condition.
    pub combinator: Combinator,
}

/// One ORDER BY entry from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct OrderSpec {
    /// Column name (validated on apply).
    pub column: String,
    /// Parsed direction.
    pub direction: SortDir,
}

/// A parsed search request.
///
/// Operators and directions are parsed eagerly; identifiers and operands are
/// validated by [`apply`](Self::apply) against the target builder's config.
#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct QueryRequest {
    /// SELECT columns; empty keeps the builder's current list.
    pub select: Vec<String>,
    /// WHERE conditions in order.
    pub conditions: Vec<ConditionSpec>,
    /// GROUP BY columns.
    pub group_by: Vec<String>,
    /// ORDER BY entries.
    pub order_by: Vec<OrderSpec>,
    /// LIMIT, range-checked on apply.
    pub limit: Option<i64>,
    /// OFFSET, range-checked on apply.
    pub offset: Option<i64>,
}

impl QueryRequest {
    /// Parse a request from a JSON string.
    ///
    /// This is the same as [`parse_request`].
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let value: JsonValue = json::from_str(input).map_err(|_| ParseError::InvalidJson)?;
        let JsonValue::Object(object) = value else {
            return Err(ParseError::ExpectedObject);
        };

        let mut request = Self::default();
        for (key, value) in object.iter() {
            match key.as_str() {
                "select" => request.select = string_list(key, value)?,
                "where" => {
                    request.conditions = array(key, value)?
                        .iter()
                        .map(parse_condition)
                        .collect::<Result<_, _>>()?;
                },
                "group_by" => request.group_by = string_list(key, value)?,
                "order_by" => {
                    request.order_by = array(key, value)?
                        .iter()
                        .map(parse_order)
                        .collect::<Result<_, _>>()?;
                },
                "limit" => request.limit = Some(integer(key, value)?),
                "offset" => request.offset = Some(integer(key, value)?),
                _ => return Err(ParseError::UnknownKey(key.clone())),
            }
        }

        Ok(request)
    }

    /// Replay this request onto `builder`.
    ///
    /// The request is applied to a copy and committed only if every call
    /// succeeds; on error `builder` is unchanged.
    pub fn apply<D: Dialect>(&self, builder: &mut QueryBuilder<D>) -> Result<(), QueryError> {
        let mut staged = builder.clone();

        if !self.select.is_empty() {
            staged.select(&self.select)?;
        }
        for condition in &self.conditions {
            staged.filter_with(
                &condition.column,
                condition.operator,
                condition.operand.clone(),
                condition.combinator,
            )?;
        }
        if !self.group_by.is_empty() {
            staged.group_by(&self.group_by)?;
        }
        for order in &self.order_by {
            staged.order_by(&order.column, order.direction)?;
        }
        if let Some(limit) = self.limit {
            staged.limit(limit)?;
        }
        if let Some(offset) = self.offset {
            staged.offset(offset)?;
        }

        *builder = staged;
        Ok(())
    }
}

/// Parse a search request from a JSON string.
///
/// # Errors
///
/// Returns `ParseError` if the JSON is malformed, has unknown keys, or names
/// an unsupported operator or sort direction.
pub fn parse_request(input: &str) -> Result<QueryRequest, ParseError> {
    QueryRequest::parse(input)
}

fn parse_condition(value: &JsonValue) -> Result<ConditionSpec, ParseError> {
    let object = object("where", value)?;

    let mut column = None;
    let mut operator = None;
    let mut raw_value = None;
    let mut combinator = Combinator::And;

    for (key, value) in object.iter() {
        match key.as_str() {
            "column" => column = Some(string(key, value)?),
            "op" => operator = Some(Operator::parse(&string(key, value)?)?),
            "value" => raw_value = Some(value),
            "combinator" => combinator = parse_combinator(&string(key, value)?)?,
            _ => return Err(ParseError::UnknownKey(key.clone())),
        }
    }

    let column = column.ok_or(ParseError::MissingKey("column"))?;
    let operator = operator.ok_or(ParseError::MissingKey("op"))?;
    let operand = match raw_value {
        None => Operand::Absent,
        Some(raw) => parse_operand(operator, raw)?,
    };

    Ok(ConditionSpec {
        column,
        operator,
        operand,
        combinator,
    })
}

fn parse_operand(operator: Operator, raw: &JsonValue) -> Result<Operand, ParseError> {
    let scalar = |v: &JsonValue| {
        Value::from_json(v).ok_or_else(|| ParseError::InvalidField {
            key: "value".into(),
            expected: "a scalar value",
        })
    };

    match (operator.shape(), raw) {
        (OperandShape::Absent, _) => Ok(Operand::Absent),
        (OperandShape::List, JsonValue::Array(items)) => Ok(Operand::List(
            items.iter().map(scalar).collect::<Result<_, _>>()?,
        )),
        (OperandShape::Range, JsonValue::Array(items)) => match items.as_slice() {
            [min, max] => Ok(Operand::Range {
                min: scalar(min)?,
                max: scalar(max)?,
            }),
            _ => Err(ParseError::InvalidField {
                key: "value".into(),
                expected: "a [min, max] pair",
            }),
        },
        (OperandShape::Range, JsonValue::Object(bounds)) => {
            let bound = |name: &'static str| {
                bounds
                    .get(name)
                    .ok_or(ParseError::MissingKey(name))
                    .and_then(scalar)
            };
            Ok(Operand::Range {
                min: bound("min")?,
                max: bound("max")?,
            })
        },
        (OperandShape::List | OperandShape::Range, _) => Err(ParseError::InvalidField {
            key: "value".into(),
            expected: "an array",
        }),
        (OperandShape::Single, v) => Ok(Operand::Single(scalar(v)?)),
    }
}

fn parse_order(value: &JsonValue) -> Result<OrderSpec, ParseError> {
    let object = object("order_by", value)?;

    let mut column = None;
    let mut direction = SortDir::Asc;
    for (key, value) in object.iter() {
        match key.as_str() {
            "column" => column = Some(string(key, value)?),
            "direction" => direction = SortDir::parse(&string(key, value)?)?,
            _ => return Err(ParseError::UnknownKey(key.clone())),
        }
    }

    Ok(OrderSpec {
        column: column.ok_or(ParseError::MissingKey("column"))?,
        direction,
    })
}

fn parse_combinator(text: &str) -> Result<Combinator, ParseError> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("and") {
        Ok(Combinator::And)
    } else if trimmed.eq_ignore_ascii_case("or") {
        Ok(Combinator::Or)
    } else {
        Err(ParseError::InvalidField {
            key: "combinator".into(),
            expected: "AND or OR",
        })
    }
}

// ─── JSON shape helpers ─────────────────────────────────────────────────────

fn invalid(key: &str, expected: &'static str) -> ParseError {
    ParseError::InvalidField {
        key: key.to_string(),
        expected,
    }
}

fn object<'a>(key: &str, value: &'a JsonValue) -> Result<&'a Object, ParseError> {
    match value {
        JsonValue::Object(o) => Ok(o),
        _ => Err(invalid(key, "an object")),
    }
}

fn array<'a>(key: &str, value: &'a JsonValue) -> Result<&'a [JsonValue], ParseError> {
    match value {
        JsonValue::Array(a) => Ok(a.as_slice()),
        _ => Err(invalid(key, "an array")),
    }
}

fn string(key: &str, value: &JsonValue) -> Result<String, ParseError> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        _ => Err(invalid(key, "a string")),
    }
}

fn integer(key: &str, value: &JsonValue) -> Result<i64, ParseError> {
    match value {
        JsonValue::Number(Number::I64(i)) => Ok(*i),
        JsonValue::Number(Number::U64(u)) => {
            i64::try_from(*u).map_err(|_| invalid(key, "an integer"))
        },
        _ => Err(invalid(key, "an integer")),
    }
}

/// Read an array of strings.
pub(super) fn string_list(key: &str, value: &JsonValue) -> Result<Vec<String>, ParseError> {
    array(key, value)?
        .iter()
        .map(|item| string(key, item).map_err(|_| invalid(key, "an array of strings")))
        .collect()
}
