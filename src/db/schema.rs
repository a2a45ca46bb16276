pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Splits embedded DDL into single statements, honoring quoted strings so a
/// semicolon inside a literal never terminates a statement.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut prev = '\0';

    for ch in sql.chars() {
        match ch {
            '\'' if !in_double_quote && prev != '\\' => {
                in_single_quote = !in_single_quote;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
            }
            ';' if !in_single_quote && !in_double_quote => {
                let stmt = current.trim();
                if !stmt.is_empty() {
                    statements.push(stmt.to_string());
                }
                current.clear();
                prev = ch;
                continue;
            }
            _ => {}
        }

        current.push(ch);
        prev = ch;
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_statement_boundaries() {
        let stmts = split_sql_statements("CREATE TABLE a (x TEXT); CREATE TABLE b (y TEXT);");
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].starts_with("CREATE TABLE a"));
    }

    #[test]
    fn ignores_semicolons_inside_literals() {
        let stmts = split_sql_statements("INSERT INTO a VALUES ('x;y'); SELECT 1");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[1], "SELECT 1");
    }

    #[test]
    fn embedded_schema_is_non_empty() {
        assert!(!split_sql_statements(SCHEMA_SQL).is_empty());
    }
}
