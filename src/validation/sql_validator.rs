use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

/// Keyword every accepted completion must contain (case-insensitive).
const REQUIRED_KEYWORD: &str = "select";

/// Guards applied to model-generated SQL before it reaches the database.
pub struct SqlValidator;

impl SqlValidator {
    /// Shallow check that the completion looks like a query at all. Catches
    /// refusals and prose answers; not a safety control.
    pub fn contains_select(sql: &str) -> bool {
        sql.to_lowercase().contains(REQUIRED_KEYWORD)
    }

    /// Parse with the PostgreSQL dialect and require every statement to be a
    /// query. Returns the rejection reason on failure.
    pub fn validate_select_only(sql: &str) -> Result<(), String> {
        let dialect = PostgreSqlDialect {};
        let ast = Parser::parse_sql(&dialect, sql)
            .map_err(|e| format!("SQL parsing error: {}", e))?;

        if ast.is_empty() {
            return Err("Empty SQL query".to_string());
        }

        for stmt in &ast {
            if !matches!(stmt, Statement::Query(_)) {
                let keyword = stmt
                    .to_string()
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_uppercase();
                return Err(format!(
                    "{} statements are not allowed. Only SELECT queries are permitted.",
                    keyword
                ));
            }
        }

        Ok(())
    }
}

/// Strip surrounding whitespace and markdown code fences from a completion.
/// Nothing else in the text is touched.
pub fn strip_sql_fences(completion: &str) -> &str {
    let mut sql = completion.trim();
    if let Some(rest) = sql.strip_prefix("```sql") {
        sql = rest;
    } else if let Some(rest) = sql.strip_prefix("```") {
        sql = rest;
    }
    sql = sql.trim();
    if let Some(rest) = sql.strip_suffix("```") {
        sql = rest;
    }
    sql.trim()
}
