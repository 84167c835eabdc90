pub mod geo;
pub mod normalize;
pub mod path;
pub mod predicate;
pub mod query;
pub mod rfc3339;

mod error;

pub use error::{Error, Result};
