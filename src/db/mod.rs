//! SQLite layer for the concept snapshot: schema and row converters.

pub mod converters;
pub mod schema;
