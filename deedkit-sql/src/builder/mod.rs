//! Query builder for SQL generation with parameterization.

mod config;
mod parse;
mod presets;
mod render;
mod select;
mod types;

// Re-export all public items
pub use config::{Allowlist, BuilderConfig};
pub use parse::{ConditionSpec, OrderSpec, QueryRequest, parse_request};
pub use presets::{
    BuilderFactory, contract_query, document_query, key_handover_query, user_query,
};
pub use select::QueryBuilder;
pub use types::{
    Combinator, IdentifierRole, JoinKind, MAX_LIMIT, Operand, OperandShape, Operator, QueryResult,
    SortDir, Value,
};
