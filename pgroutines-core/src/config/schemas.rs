//! Target schema list resolution.

/// Schemas exported when `PG_SCHEMAS` is unset or blank.
pub const DEFAULT_SCHEMAS: &[&str] = &["old_db", "scoring"];

/// Resolves the raw `PG_SCHEMAS` value into an ordered list of schema names.
///
/// Commas and whitespace are both delimiters and runs of them collapse, so
/// `"a, b"`, `"a b"` and `"a,,b"` all give `["a", "b"]`. Falls back to
/// [`DEFAULT_SCHEMAS`] when nothing is left; the result is never empty.
///
/// # Example
/// ```rust
/// use pgroutines_core::config::resolve_schemas;
///
/// assert_eq!(resolve_schemas(Some("finance, reporting")), ["finance", "reporting"]);
/// assert_eq!(resolve_schemas(None), ["old_db", "scoring"]);
/// ```
pub fn resolve_schemas(raw: Option<&str>) -> Vec<String> {
    let schemas: Vec<String> = raw
        .unwrap_or_default()
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();

    if schemas.is_empty() {
        return DEFAULT_SCHEMAS.iter().map(|s| (*s).to_string()).collect();
    }
    schemas
}

/// Renders a schema list the way it is reported on the console,
/// e.g. `['finance', 'reporting']`.
pub fn format_schema_list(schemas: &[String]) -> String {
    let quoted: Vec<String> = schemas.iter().map(|s| format!("'{}'", s)).collect();
    format!("[{}]", quoted.join(", "))
}
