//! ORDER BY, GROUP BY and LIMIT/OFFSET fragments.

use std::fmt;

use crate::dialect::SqlDialect;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending (the default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl Direction {
    /// Parses a free-form direction.
    ///
    /// `desc` and `descending` (any case) mean descending; anything else,
    /// including an empty string, means ascending.
    #[must_use]
    pub fn parse(direction: &str) -> Self {
        let direction = direction.trim();
        if direction.eq_ignore_ascii_case("desc") || direction.eq_ignore_ascii_case("descending")
        {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Direction {
    fn from(direction: &str) -> Self {
        Self::parse(direction)
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to sort by.
    pub column: String,
    /// Sort direction.
    pub direction: Direction,
}

pub fn compile_order_by(dialect: &dyn SqlDialect, order_by: &[OrderBy]) -> String {
    if order_by.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = order_by
        .iter()
        .map(|o| format!("{} {}", dialect.quote_column(&o.column), o.direction))
        .collect();
    format!(" ORDER BY {}", parts.join(","))
}

pub fn compile_group_by(dialect: &dyn SqlDialect, group_by: &[String]) -> String {
    if group_by.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = group_by.iter().map(|c| dialect.quote_column(c)).collect();
    format!(" GROUP BY {}", parts.join(","))
}

/// Renders ` LIMIT n` and ` OFFSET n`, skipping unset or zero values.
pub fn compile_limit_offset(limit: Option<u64>, offset: Option<u64>) -> String {
    let mut sql = String::new();
    if let Some(limit) = limit.filter(|n| *n > 0) {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = offset.filter(|n| *n > 0) {
        sql.push_str(&format!(" OFFSET {offset}"));
    }
    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("desc"), Direction::Desc);
        assert_eq!(Direction::parse("DESC"), Direction::Desc);
        assert_eq!(Direction::parse("Descending"), Direction::Desc);
        assert_eq!(Direction::parse("asc"), Direction::Asc);
        assert_eq!(Direction::parse(""), Direction::Asc);
        assert_eq!(Direction::parse("sideways"), Direction::Asc);
    }

    #[test]
    fn test_order_by() {
        let d = Dialect::MySql.strategy();
        assert_eq!(compile_order_by(d, &[]), "");
        let order = [
            OrderBy {
                column: "last_name".into(),
                direction: Direction::Asc,
            },
            OrderBy {
                column: "age".into(),
                direction: Direction::Desc,
            },
        ];
        assert_eq!(
            compile_order_by(d, &order),
            " ORDER BY `last_name` ASC,`age` DESC"
        );
    }

    #[test]
    fn test_group_by() {
        let d = Dialect::Postgres.strategy();
        assert_eq!(compile_group_by(d, &[]), "");
        assert_eq!(
            compile_group_by(d, &["passport".into(), "country".into()]),
            r#" GROUP BY "passport","country""#
        );
    }

    #[test]
    fn test_limit_offset() {
        assert_eq!(compile_limit_offset(None, None), "");
        assert_eq!(compile_limit_offset(Some(0), Some(0)), "");
        assert_eq!(compile_limit_offset(Some(10), None), " LIMIT 10");
        assert_eq!(compile_limit_offset(Some(10), Some(20)), " LIMIT 10 OFFSET 20");
        assert_eq!(compile_limit_offset(None, Some(5)), " OFFSET 5");
    }
}
