pub mod catalog;
pub mod db;
pub mod models;
pub mod predicate_sql;
pub mod schema;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
