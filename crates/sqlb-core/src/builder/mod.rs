//! Statement building.
//!
//! [`Builder`] is the entry point. It collects the table or view, column
//! definitions, [`Where`] predicates and auxiliary clauses, then renders one
//! statement through the dialect strategy chosen at construction.

mod clauses;
mod statement;
mod where_clause;

pub use clauses::{Direction, OrderBy};
pub use statement::Builder;
pub use where_clause::{Linkage, Where};
