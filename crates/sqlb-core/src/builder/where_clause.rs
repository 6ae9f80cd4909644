//! WHERE clause predicates.

use std::fmt;

use crate::dialect::SqlDialect;

/// How a predicate is joined to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    /// `AND`
    #[default]
    And,
    /// `OR`
    Or,
}

impl Linkage {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single filter condition.
///
/// A predicate is one of:
///
/// - a comparison `column <op> value`, built with [`Where::new`];
/// - a raw SQL fragment emitted verbatim, built with [`Where::raw`];
/// - a parenthesized group of predicates, built with [`Where::group`].
///
/// The linkage of a predicate joins it to the *previous* one, so the linkage
/// of the first predicate in a list is never rendered. Raw fragments carry no
/// linkage at all: include `AND`/`OR` in the fragment itself.
///
/// # Example
///
/// ```
/// use sqlb_core::{Builder, Dialect, Where};
///
/// let sql = Builder::new(Dialect::Sqlite)
///     .table("users")
///     .where_clause(Where::new("status", "=", "active"))
///     .where_clause(Where::group(vec![
///         Where::new("role", "=", "admin"),
///         Where::new("role", "=", "owner").or(),
///     ]))
///     .select(&["id"])
///     .unwrap();
///
/// assert_eq!(
///     sql,
///     r#"SELECT "id" FROM "users" WHERE "status" = 'active' AND ("role" = 'admin' OR "role" = 'owner');"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Where {
    raw: Option<String>,
    column: String,
    operator: String,
    value: String,
    linkage: Linkage,
    children: Vec<Where>,
}

impl Where {
    /// Creates a comparison predicate.
    ///
    /// `==`/`===` are rendered as `=` and `!=`/`!==` as `<>`. The value
    /// `"NULL"` compared with `=` or `<>` becomes `IS NULL` / `IS NOT NULL`.
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Creates a raw SQL fragment. It is not quoted or validated.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            raw: Some(sql.into()),
            ..Self::default()
        }
    }

    /// Creates a parenthesized group of predicates.
    #[must_use]
    pub fn group(children: Vec<Self>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    /// Joins this predicate to the previous one with `OR`.
    #[must_use]
    pub const fn or(mut self) -> Self {
        self.linkage = Linkage::Or;
        self
    }

    /// Joins this predicate to the previous one with `AND` (the default).
    #[must_use]
    pub const fn and(mut self) -> Self {
        self.linkage = Linkage::And;
        self
    }

    /// Returns the linkage to the previous predicate.
    #[must_use]
    pub const fn linkage(&self) -> Linkage {
        self.linkage
    }

    fn render(&self, dialect: &dyn SqlDialect) -> Option<String> {
        if !self.column.is_empty() {
            return Some(self.render_comparison(dialect));
        }
        let inner = compile_conditions(dialect, &self.children);
        if inner.is_empty() {
            None
        } else {
            Some(format!("({inner})"))
        }
    }

    fn render_comparison(&self, dialect: &dyn SqlDialect) -> String {
        let column = dialect.quote_column(&self.column);
        let operator = normalize_operator(self.operator.trim());
        match (operator, self.value.as_str()) {
            ("=", "NULL") => format!("{column} IS NULL"),
            ("<>", "NULL") => format!("{column} IS NOT NULL"),
            (operator, value) => format!("{column} {operator} {}", dialect.quote_value(value)),
        }
    }
}

fn normalize_operator(operator: &str) -> &str {
    match operator {
        "==" | "===" => "=",
        "!=" | "!==" => "<>",
        other => other,
    }
}

/// Renders ` WHERE ...`, or an empty string when nothing renders.
pub fn compile_where(dialect: &dyn SqlDialect, wheres: &[Where]) -> String {
    let conditions = compile_conditions(dialect, wheres);
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {conditions}")
    }
}

fn compile_conditions(dialect: &dyn SqlDialect, wheres: &[Where]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(wheres.len());
    for predicate in wheres {
        if let Some(raw) = &predicate.raw {
            parts.push(raw.clone());
            continue;
        }
        let Some(condition) = predicate.render(dialect) else {
            continue;
        };
        if parts.is_empty() {
            parts.push(condition);
        } else {
            parts.push(format!("{} {condition}", predicate.linkage));
        }
    }
    parts.join(" ")
}
