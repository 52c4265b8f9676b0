//! The dialect sanitization contract and the shipped ANSI adapter.
//!
//! A [`Sanitizer`] turns a condition template plus its [`Value`]s into one
//! escaped fragment string. The template machinery (placeholder substitution,
//! pair-list rendering, ordering verification) is shared default behavior; a
//! dialect adapter only has to supply its literal string quoting via
//! [`Sanitizer::quote_str`].
//!
//! Sanitization is pure text transformation. Nothing here touches a database.

use crate::value::Value;
use thiserror::Error;

/// Errors raised while turning a template and its values into a fragment.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SanitizeError {
    /// Positional placeholder count does not match the supplied values.
    #[error("template expects {expected} positional values, {supplied} supplied")]
    PlaceholderMismatch { expected: usize, supplied: usize },

    /// A named placeholder had no matching key.
    #[error("no value supplied for placeholder :{0}")]
    MissingValue(String),

    /// A value kind the dialect cannot render as a literal.
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// An ordering expression that is not a plain "column [asc|desc]".
    #[error("invalid ordering expression: {0:?}")]
    InvalidOrder(String),
}

/// Dialect contract for escaping values and validating templates.
///
/// Injected into [`crate::QueryBuilder`] at construction so dialect adapters
/// can be swapped and tests can run against a deterministic fake.
pub trait Sanitizer {
    /// Quote and escape one string literal for the target dialect.
    fn quote_str(&self, raw: &str) -> String;

    /// Render a single [`Value`] as a literal.
    ///
    /// Strings are quoted via [`Sanitizer::quote_str`]; numbers and booleans
    /// render unquoted in canonical form; lists render as a parenthesized
    /// comma-separated sequence of literals. Lists may not nest.
    fn render(&self, value: &Value) -> Result<String, SanitizeError> {
        match value {
            Value::Null => Ok("NULL".to_string()),
            Value::Bool(true) => Ok("TRUE".to_string()),
            Value::Bool(false) => Ok("FALSE".to_string()),
            Value::Int(n) => Ok(n.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Text(s) => Ok(self.quote_str(s)),
            Value::List(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    if matches!(item, Value::List(_)) {
                        return Err(SanitizeError::UnsupportedValue(
                            "nested list".to_string(),
                        ));
                    }
                    parts.push(self.render(item)?);
                }
                Ok(format!("({})", parts.join(",")))
            }
        }
    }

    /// Substitute every positional `?` in `template` with the matching value.
    ///
    /// The placeholder count must equal the value count, in either direction.
    fn sanitize(&self, template: &str, values: &[Value]) -> Result<String, SanitizeError> {
        let expected = template.matches('?').count();
        if expected != values.len() {
            return Err(SanitizeError::PlaceholderMismatch {
                expected,
                supplied: values.len(),
            });
        }

        let mut out = String::with_capacity(template.len());
        let mut remaining = values.iter();
        for ch in template.chars() {
            if ch == '?' {
                match remaining.next() {
                    Some(value) => out.push_str(&self.render(value)?),
                    None => {
                        return Err(SanitizeError::PlaceholderMismatch {
                            expected,
                            supplied: values.len(),
                        });
                    }
                }
            } else {
                out.push(ch);
            }
        }
        Ok(out)
    }

    /// Substitute every named `:name` placeholder in `template` by key.
    ///
    /// Unknown names are an error; unused keys are ignored. A `::` sequence
    /// passes through untouched so cast syntax survives.
    fn sanitize_named(
        &self,
        template: &str,
        values: &[(&str, Value)],
    ) -> Result<String, SanitizeError> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != ':' {
                out.push(ch);
                continue;
            }
            if chars.peek() == Some(&':') {
                chars.next();
                out.push_str("::");
                continue;
            }
            match chars.peek() {
                Some(&c) if c == '_' || c.is_ascii_alphabetic() => {
                    let mut name = String::new();
                    while let Some(&c) = chars.peek() {
                        if c == '_' || c.is_ascii_alphanumeric() {
                            name.push(c);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    match values.iter().find(|(key, _)| *key == name) {
                        Some((_, value)) => out.push_str(&self.render(value)?),
                        None => return Err(SanitizeError::MissingValue(name)),
                    }
                }
                _ => out.push(ch),
            }
        }
        Ok(out)
    }

    /// Render a bare key/value pair list as an equality conjunction:
    /// `key = <literal> AND key2 = <literal>`, in the given order.
    fn sanitize_pairs(&self, pairs: &[(&str, Value)]) -> Result<String, SanitizeError> {
        let mut parts = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            parts.push(format!("{} = {}", key, self.render(value)?));
        }
        Ok(parts.join(" AND "))
    }

    /// Verify a raw "column [asc|desc]" ordering expression.
    ///
    /// The column must be identifier-shaped (dotted notation allowed) and the
    /// optional direction must be `asc` or `desc` in any case. The expression
    /// is returned structurally unchanged; anything else is rejected, which
    /// keeps quotes, semicolons, and comment tokens out of ORDER BY.
    fn sanitize_order(&self, expr: &str) -> Result<String, SanitizeError> {
        let trimmed = expr.trim();
        let mut words = trimmed.split_whitespace();

        let column = match words.next() {
            Some(column) => column,
            None => return Err(SanitizeError::InvalidOrder(expr.to_string())),
        };
        if !is_column_expr(column) {
            return Err(SanitizeError::InvalidOrder(expr.to_string()));
        }

        if let Some(direction) = words.next() {
            if !direction.eq_ignore_ascii_case("asc") && !direction.eq_ignore_ascii_case("desc") {
                return Err(SanitizeError::InvalidOrder(expr.to_string()));
            }
        }
        if words.next().is_some() {
            return Err(SanitizeError::InvalidOrder(expr.to_string()));
        }

        Ok(trimmed.to_string())
    }
}

/// Column shape check: `[A-Za-z_][A-Za-z0-9_$]*` segments joined by dots.
fn is_column_expr(s: &str) -> bool {
    s.split('.').all(|segment| {
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
    })
}

/// ANSI string quoting: single quotes, internal quotes doubled.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiQuoting;

impl Sanitizer for AnsiQuoting {
    fn quote_str(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + 2);
        out.push('\'');
        for ch in raw.chars() {
            if ch == '\'' {
                out.push('\'');
                out.push('\'');
            } else {
                out.push(ch);
            }
        }
        out.push('\'');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_plain() {
        assert_eq!(AnsiQuoting.quote_str("hello world"), "'hello world'");
    }

    #[test]
    fn quote_escapes_embedded_quote() {
        assert_eq!(AnsiQuoting.quote_str("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn sanitize_positional() {
        let frag = AnsiQuoting
            .sanitize("name = ? AND status != ?", &["hello".into(), 1i64.into()])
            .unwrap();
        assert_eq!(frag, "name = 'hello' AND status != 1");
    }

    #[test]
    fn sanitize_list() {
        let frag = AnsiQuoting
            .sanitize("dt not in ?", &[vec!["20200101", "20191201"].into()])
            .unwrap();
        assert_eq!(frag, "dt not in ('20200101','20191201')");
    }

    #[test]
    fn sanitize_bool_and_null() {
        let frag = AnsiQuoting
            .sanitize("active = ? AND deleted_at is not ?", &[true.into(), Value::Null])
            .unwrap();
        assert_eq!(frag, "active = TRUE AND deleted_at is not NULL");
    }

    #[test]
    fn sanitize_rejects_too_few_values() {
        let err = AnsiQuoting.sanitize("a = ? AND b = ?", &[1i64.into()]);
        assert_eq!(
            err,
            Err(SanitizeError::PlaceholderMismatch {
                expected: 2,
                supplied: 1
            })
        );
    }

    #[test]
    fn sanitize_rejects_extra_values() {
        let err = AnsiQuoting.sanitize("a = ?", &[1i64.into(), 2i64.into()]);
        assert_eq!(
            err,
            Err(SanitizeError::PlaceholderMismatch {
                expected: 1,
                supplied: 2
            })
        );
    }

    #[test]
    fn sanitize_rejects_nested_list() {
        let nested = Value::List(vec![Value::List(vec![Value::Int(1)])]);
        assert!(matches!(
            AnsiQuoting.sanitize("id in ?", &[nested]),
            Err(SanitizeError::UnsupportedValue(_))
        ));
    }

    #[test]
    fn sanitize_named_basic() {
        let frag = AnsiQuoting
            .sanitize_named(
                "name = :name AND age > :age",
                &[("name", "alice".into()), ("age", 18i64.into())],
            )
            .unwrap();
        assert_eq!(frag, "name = 'alice' AND age > 18");
    }

    #[test]
    fn sanitize_named_missing_key() {
        let err = AnsiQuoting.sanitize_named("name = :name", &[("other", 1i64.into())]);
        assert_eq!(err, Err(SanitizeError::MissingValue("name".to_string())));
    }

    #[test]
    fn sanitize_named_keeps_casts() {
        let frag = AnsiQuoting
            .sanitize_named("dt::date = :dt", &[("dt", "20200102".into())])
            .unwrap();
        assert_eq!(frag, "dt::date = '20200102'");
    }

    #[test]
    fn sanitize_pairs_joins_with_and() {
        let frag = AnsiQuoting
            .sanitize_pairs(&[("desc", "test".into()), ("color", "green".into())])
            .unwrap();
        assert_eq!(frag, "desc = 'test' AND color = 'green'");
    }

    #[test]
    fn order_accepts_column_and_direction() {
        assert_eq!(AnsiQuoting.sanitize_order("created_at desc").unwrap(), "created_at desc");
        assert_eq!(AnsiQuoting.sanitize_order("acc.member_id ASC").unwrap(), "acc.member_id ASC");
        assert_eq!(AnsiQuoting.sanitize_order("id").unwrap(), "id");
    }

    #[test]
    fn order_rejects_injection_shapes() {
        assert!(AnsiQuoting.sanitize_order("id; drop table users").is_err());
        assert!(AnsiQuoting.sanitize_order("name'--").is_err());
        assert!(AnsiQuoting.sanitize_order("name sideways").is_err());
        assert!(AnsiQuoting.sanitize_order("").is_err());
    }
}
