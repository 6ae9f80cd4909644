//! Column definitions used by DDL statements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};

/// Dialect-independent column type.
///
/// Each dialect maps these to its own native type keyword. Any other type
/// name is carried as [`ColumnType::Custom`] and rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnType {
    /// Short string with an optional length.
    String,
    /// Text of unbounded length.
    Text,
    /// Long text (same as `Text` on most dialects).
    LongText,
    /// Integer number.
    Integer,
    /// Floating point number.
    Float,
    /// Fixed precision decimal.
    Decimal,
    /// Binary large object.
    Blob,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
    /// A native type name passed through as-is.
    Custom(String),
}

impl ColumnType {
    /// Returns the canonical lowercase name of the type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::LongText => "longtext",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Blob => "blob",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(BuildError::MissingColumnType);
        }
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "text" => Self::Text,
            "longtext" => Self::LongText,
            "integer" => Self::Integer,
            "float" => Self::Float,
            "decimal" => Self::Decimal,
            "blob" => Self::Blob,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            _ => Self::Custom(trimmed.to_string()),
        })
    }
}

impl TryFrom<String> for ColumnType {
    type Error = BuildError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        match value {
            ColumnType::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

/// A column definition.
///
/// Length and decimals of `None` or `Some(0)` mean "use the dialect default".
/// The default value is carried for introspection round-trips but is not
/// rendered into DDL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Abstract column type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Length (or precision for decimals).
    #[serde(default)]
    pub length: Option<u32>,
    /// Scale for decimals.
    #[serde(default)]
    pub decimals: Option<u32>,
    /// Whether the column auto-increments.
    #[serde(default)]
    pub auto_increment: bool,
    /// Whether this is the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether NULL is allowed.
    #[serde(default)]
    pub nullable: bool,
    /// Whether values must be unique.
    #[serde(default)]
    pub unique: bool,
    /// Default value as raw text.
    #[serde(default)]
    pub default: Option<String>,
}

impl Column {
    /// Creates a NOT NULL column with no length and no modifiers.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            length: None,
            decimals: None,
            auto_increment: false,
            primary_key: false,
            nullable: false,
            unique: false,
            default: None,
        }
    }

    /// Sets the length.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the number of decimals.
    #[must_use]
    pub const fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Marks the column as auto-incrementing.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Allows NULL values.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Adds a UNIQUE constraint.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Returns the length if one is set and non-zero.
    #[must_use]
    pub fn effective_length(&self) -> Option<u32> {
        self.length.filter(|n| *n > 0)
    }

    /// Returns the decimals if set and non-zero.
    #[must_use]
    pub fn effective_decimals(&self) -> Option<u32> {
        self.decimals.filter(|n| *n > 0)
    }

    /// Checks that the column has a name and a type.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingColumnName`] for a blank name and
    /// [`BuildError::MissingColumnType`] for a blank custom type name.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BuildError::MissingColumnName);
        }
        if matches!(&self.column_type, ColumnType::Custom(name) if name.trim().is_empty()) {
            return Err(BuildError::MissingColumnType);
        }
        Ok(())
    }
}
