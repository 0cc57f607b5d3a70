//! Column/table identifier validation for SQL injection prevention.

use crate::builder::{Allowlist, IdentifierRole};
use crate::error::QueryError;

/// Keywords that may not be used as bare identifiers.
const RESERVED_WORDS: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CREATE", "CROSS", "DELETE",
    "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXEC", "EXISTS", "FALSE", "FROM", "FULL", "GRANT",
    "GROUP", "HAVING", "IN", "INNER", "INSERT", "INTO", "IS", "JOIN", "LEFT", "LIKE", "LIMIT",
    "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER", "REVOKE", "RIGHT", "SELECT", "SET",
    "TABLE", "THEN", "TRUE", "TRUNCATE", "UNION", "UPDATE", "VALUES", "WHEN", "WHERE", "WITH",
];

/// Whether `s` is a reserved SQL keyword, ignoring case.
///
/// ```
/// use deedkit_sql::is_reserved_word;
///
/// assert!(is_reserved_word("drop"));
/// assert!(!is_reserved_word("dropped_at"));
/// ```
#[must_use]
pub fn is_reserved_word(s: &str) -> bool {
    RESERVED_WORDS.iter().any(|word| word.eq_ignore_ascii_case(s))
}

/// Check that a string is a safe SQL identifier.
///
/// A valid SQL identifier:
/// - Starts with a letter (a-z, A-Z) or underscore
/// - Contains only letters, digits (0-9), and underscores
/// - Is not empty
/// - Is not a reserved keyword (`SELECT`, `drop`, `Or`, ...)
///
/// This rejects quotes, semicolons, comment markers, whitespace, dots and any
/// non-ASCII character, so nothing but a bare name can reach the SQL text.
///
/// # Examples
///
/// ```
/// use deedkit_sql::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("users"));
/// assert!(is_valid_sql_identifier("user_id"));
/// assert!(is_valid_sql_identifier("_private"));
/// assert!(is_valid_sql_identifier("Table123"));
///
/// // Invalid identifiers
/// assert!(!is_valid_sql_identifier(""));           // empty
/// assert!(!is_valid_sql_identifier("123abc"));     // starts with digit
/// assert!(!is_valid_sql_identifier("user-name"));  // contains hyphen
/// assert!(!is_valid_sql_identifier("user.id"));    // contains dot
/// assert!(!is_valid_sql_identifier("user; DROP")); // contains special chars
/// assert!(!is_valid_sql_identifier("select"));     // keyword
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    let mut chars = s.chars();

    // First character must be letter or underscore
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    // Rest must be letters, digits, or underscores
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_reserved_word(s)
}

/// Validate an identifier against an allowlist and the identifier syntax.
///
/// Checks, in order:
/// 1. `name` is not empty ([`QueryError::EmptyIdentifier`])
/// 2. `name` is in `allowlist`, unless the allowlist is unrestricted
///    ([`QueryError::NotAllowlisted`])
/// 3. `name` is a syntactically valid identifier
///    ([`QueryError::InvalidIdentifierSyntax`])
///
/// The syntax check runs even for allowlisted names.
///
/// # Examples
///
/// ```
/// use deedkit_sql::{Allowlist, IdentifierRole, QueryError, validate_identifier};
///
/// let columns = Allowlist::from_iter(["id", "email"]);
/// assert_eq!(validate_identifier("email", &columns, IdentifierRole::Where), Ok("email"));
/// assert!(matches!(
///     validate_identifier("password", &columns, IdentifierRole::Where),
///     Err(QueryError::NotAllowlisted { .. })
/// ));
/// ```
pub fn validate_identifier<'a>(
    name: &'a str,
    allowlist: &Allowlist,
    role: IdentifierRole,
) -> Result<&'a str, QueryError> {
    if name.is_empty() {
        tracing::warn!(%role, reason = "empty", "identifier rejected");
        return Err(QueryError::EmptyIdentifier { role });
    }

    if !allowlist.permits(name) {
        tracing::warn!(%role, reason = "not allowlisted", name = ?name, "identifier rejected");
        return Err(QueryError::NotAllowlisted {
            role,
            name: name.to_string(),
        });
    }

    if !is_valid_sql_identifier(name) {
        tracing::warn!(%role, reason = "syntax", name = ?name, "identifier rejected");
        return Err(QueryError::InvalidIdentifierSyntax {
            role,
            name: name.to_string(),
        });
    }

    Ok(name)
}
