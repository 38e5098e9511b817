//! Small WHERE-clause builder with bound parameters only.

use crate::models::filters::DateRange;
use rusqlite::types::Value;

#[derive(Default)]
pub struct Where {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, clause: String, value: Value) {
        self.params.push(value);
        self.clauses
            .push(clause.replace('?', &format!("?{}", self.params.len())));
    }

    /// `column = value`, skipped when `value` is `None`.
    pub fn eq(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.push(format!("{column} = ?"), Value::Text(v.to_string()));
        }
        self
    }

    /// Case-insensitive equality (rooms, tags).
    pub fn eq_nocase(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.push(
                format!("{column} = ? COLLATE NOCASE"),
                Value::Text(v.to_string()),
            );
        }
        self
    }

    pub fn eq_int(&mut self, column: &str, value: Option<i64>) -> &mut Self {
        if let Some(v) = value {
            self.push(format!("{column} = ?"), Value::Integer(v));
        }
        self
    }

    /// Substring match; `%` and `_` in `value` match literally.
    pub fn contains(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.push(
                format!("{column} LIKE ? ESCAPE '\\'"),
                Value::Text(format!("%{}%", escape_like(v))),
            );
        }
        self
    }

    /// Inclusive day range over a `YYYY-MM-DD HH:MM:SS` column.
    pub fn date_range(&mut self, column: &str, range: &DateRange) -> &mut Self {
        if let Some(from) = range.from {
            self.push(
                format!("date({column}) >= ?"),
                Value::Text(from.format("%Y-%m-%d").to_string()),
            );
        }
        if let Some(to) = range.to {
            self.push(
                format!("date({column}) <= ?"),
                Value::Text(to.format("%Y-%m-%d").to_string()),
            );
        }
        self
    }

    /// ` WHERE a AND b` or an empty string.
    pub fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
