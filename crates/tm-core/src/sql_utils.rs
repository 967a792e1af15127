//! SQL identifier utilities
//!
//! View and ledger table names are interpolated into DDL, so they are
//! restricted to plain identifiers instead of being quoted. Quoting would make
//! them case-sensitive on PostgreSQL and stop matching the unquoted names the
//! view files create.

/// Check whether `ident` is a plain, unquoted SQL identifier.
///
/// # Examples
/// ```
/// use tm_core::sql_utils::is_plain_identifier;
/// assert!(is_plain_identifier("active_users"));
/// assert!(!is_plain_identifier("1users"));
/// assert!(!is_plain_identifier("users; DROP TABLE x"));
/// ```
pub fn is_plain_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check whether `name` is a plain identifier, optionally schema-qualified.
///
/// # Examples
/// ```
/// use tm_core::sql_utils::is_qualified_identifier;
/// assert!(is_qualified_identifier("reporting.active_users"));
/// assert!(!is_qualified_identifier("a.b.c"));
/// ```
pub fn is_qualified_identifier(name: &str) -> bool {
    match name.split_once('.') {
        Some((schema, table)) => is_plain_identifier(schema) && is_plain_identifier(table),
        None => is_plain_identifier(name),
    }
}

/// The name PostgreSQL stores for an unquoted identifier.
///
/// # Examples
/// ```
/// use tm_core::sql_utils::fold_identifier;
/// assert_eq!(fold_identifier("Reporting.Active_Users"), "reporting.active_users");
/// ```
pub fn fold_identifier(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Split a potentially schema-qualified name into (schema, name).
///
/// # Examples
/// ```
/// use tm_core::sql_utils::split_qualified_name;
/// assert_eq!(split_qualified_name("users"), (None, "users"));
/// assert_eq!(split_qualified_name("staging.orders"), (Some("staging"), "orders"));
/// ```
pub fn split_qualified_name(name: &str) -> (Option<&str>, &str) {
    match name.rfind('.') {
        Some(pos) => (Some(&name[..pos]), &name[pos + 1..]),
        None => (None, name),
    }
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
