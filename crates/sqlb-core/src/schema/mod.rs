//! Schema vocabulary shared by the builder and the introspection helpers.

mod column;

pub use column::{Column, ColumnType};
