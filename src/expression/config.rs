//! Translator configuration.

use crate::access::Value;
use crate::sql::ast::ColName;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps a column name to its offset in the evaluated row
pub type ColumnResolver = Arc<dyn Fn(&ColName) -> Option<usize> + Send + Sync>;

/// Settings the translator consults while lowering an AST
#[derive(Clone, Default)]
pub struct Config {
    /// Column lookup; without one, column references fail to translate
    pub resolve_column: Option<ColumnResolver>,
    /// Bind variables known at compile time, used for declared lengths
    pub bind_vars: HashMap<String, Value>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&ColName) -> Option<usize> + Send + Sync + 'static,
    {
        self.resolve_column = Some(Arc::new(resolver));
        self
    }

    /// Resolve unqualified names against an ordered list of column names
    pub fn with_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.with_column_resolver(move |col| {
            columns
                .iter()
                .position(|name| name.eq_ignore_ascii_case(&col.name))
        })
    }

    pub fn with_bind_var(mut self, key: impl Into<String>, value: Value) -> Self {
        self.bind_vars.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("resolve_column", &self.resolve_column.is_some())
            .field("bind_vars", &self.bind_vars)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_columns_is_case_insensitive() {
        let config = Config::new().with_columns(["id", "Name"]);
        let resolve = config.resolve_column.as_ref().expect("resolver installed");
        assert_eq!(resolve(&ColName::new("ID")), Some(0));
        assert_eq!(resolve(&ColName::qualified("t", "name")), Some(1));
        assert_eq!(resolve(&ColName::new("missing")), None);
    }

    #[test]
    fn test_default_has_no_resolver() {
        let config = Config::default().with_bind_var("n", Value::Int64(3));
        assert!(config.resolve_column.is_none());
        assert_eq!(config.bind_vars.get("n"), Some(&Value::Int64(3)));
    }
}
