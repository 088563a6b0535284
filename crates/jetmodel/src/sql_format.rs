//! Pretty-printing of echoed SQL.
//!
//! Only used when `show_sql_statements` and `indent_sql_statements` are both set;
//! the output is for humans reading logs and is never sent to the engine.

/// Token kinds the formatter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlToken {
    Word,
    /// `'text'` literal
    String,
    /// `#date#` literal
    Date,
    /// `[bracketed]` identifier
    Identifier,
    Whitespace,
    Punctuation,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSegment {
    pub text: String,
    pub token: SqlToken,
}

/// Split Jet SQL into segments.
pub fn tokenize(sql: &str) -> Vec<SqlSegment> {
    let mut segments = Vec::new();
    let chars: Vec<char> = sql.chars().collect();
    let mut i = 0;

    let mut push = |text: &[char], token: SqlToken| {
        segments.push(SqlSegment {
            text: text.iter().collect(),
            token,
        });
    };

    while i < chars.len() {
        let c = chars[i];
        let start = i;

        if c.is_whitespace() {
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            push(&chars[start..i], SqlToken::Whitespace);
            continue;
        }

        // Quoted runs: 'string' (with '' escapes), #date#, [identifier]
        let closing = match c {
            '\'' => Some(('\'', SqlToken::String)),
            '#' => Some(('#', SqlToken::Date)),
            '[' => Some((']', SqlToken::Identifier)),
            _ => None,
        };
        if let Some((close, token)) = closing {
            i += 1;
            while i < chars.len() {
                if chars[i] == close {
                    if close == '\'' && chars.get(i + 1) == Some(&'\'') {
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                i += 1;
            }
            push(&chars[start..i], token);
            continue;
        }

        if c.is_alphanumeric() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            push(&chars[start..i], SqlToken::Word);
            continue;
        }

        if matches!(c, '(' | ')' | ',' | ';') {
            push(&chars[start..=i], SqlToken::Punctuation);
            i += 1;
            continue;
        }

        push(&chars[start..=i], SqlToken::Other);
        i += 1;
    }

    segments
}

/// Put each major clause on its own line, indenting nested parentheses.
pub fn indent(sql: &str) -> String {
    let indent_str = "    ";
    let mut result = String::new();
    let mut depth: usize = 0;

    for seg in tokenize(sql) {
        if seg.token == SqlToken::Whitespace {
            if !result.is_empty() && !result.ends_with(' ') && !result.ends_with('\n') {
                result.push(' ');
            }
            continue;
        }

        if seg.token == SqlToken::Word && starts_clause(&seg.text) && !result.is_empty() {
            let trimmed = result.trim_end_matches(' ').len();
            result.truncate(trimmed);
            result.push('\n');
            result.push_str(&indent_str.repeat(depth));
        }

        match seg.text.as_str() {
            "(" => depth += 1,
            ")" => depth = depth.saturating_sub(1),
            _ => {}
        }

        result.push_str(&seg.text);
    }

    result.trim().to_string()
}

fn starts_clause(word: &str) -> bool {
    matches!(
        word.to_ascii_uppercase().as_str(),
        "SELECT"
            | "FROM"
            | "WHERE"
            | "GROUP"
            | "HAVING"
            | "ORDER"
            | "UNION"
            | "INNER"
            | "LEFT"
            | "RIGHT"
            | "SET"
            | "VALUES"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_jet_literals() {
        let segs = tokenize("SELECT [My Col] FROM t WHERE d = #2024-01-02# AND s = 'it''s'");
        let kinds: Vec<SqlToken> = segs
            .iter()
            .filter(|s| s.token != SqlToken::Whitespace)
            .map(|s| s.token)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SqlToken::Word,
                SqlToken::Identifier,
                SqlToken::Word,
                SqlToken::Word,
                SqlToken::Word,
                SqlToken::Word,
                SqlToken::Other,
                SqlToken::Date,
                SqlToken::Word,
                SqlToken::Word,
                SqlToken::Other,
                SqlToken::String,
            ]
        );
        assert!(segs.iter().any(|s| s.text == "'it''s'"));
        assert!(segs.iter().any(|s| s.text == "[My Col]"));
    }

    #[test]
    fn test_indent_basic() {
        let formatted = indent("SELECT a, b FROM t WHERE a = 1 ORDER BY b");
        assert_eq!(formatted, "SELECT a, b\nFROM t\nWHERE a = 1\nORDER BY b");
    }

    #[test]
    fn test_indent_nested_subquery() {
        let formatted = indent("SELECT x FROM (SELECT COUNT(*) AS x FROM MSysAccessStorage)");
        assert_eq!(
            formatted,
            "SELECT x\nFROM (\n    SELECT COUNT(*) AS x\n    FROM MSysAccessStorage)"
        );
    }

    #[test]
    fn test_indent_keeps_literals_intact() {
        let formatted = indent("SELECT 'from where' FROM [select]");
        assert_eq!(formatted, "SELECT 'from where'\nFROM [select]");
    }

    #[test]
    fn test_indent_collapses_whitespace() {
        assert_eq!(indent("  SELECT\n\t1  "), "SELECT 1");
    }
}
