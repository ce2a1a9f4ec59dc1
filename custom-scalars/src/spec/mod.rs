//! GraphQL schema and query handling: parsing, and finding the scalars of a query.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

mod field_type;
mod fragments;
mod occurrence;
pub(crate) mod query;
mod schema;

use displaydoc::Display;
pub(crate) use fragments::Fragments;
pub(crate) use occurrence::Occurrence;
pub use occurrence::ScalarOccurrence;
pub use query::Query;
pub use query::QueryHash;
pub use query::scalar_paths::InterestingScalars;
pub use query::scalar_paths::resolve;
pub use query::scalar_paths::resolve_operation;
pub use schema::Schema;
use thiserror::Error;

/// GraphQL parsing errors.
#[derive(Error, Debug, Display, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpecError {
    /// parsing error: {0}
    ParsingError(String),
    /// validation error: {0}
    ValidationError(String),
    /// invalid schema: {0}
    InvalidSchema(String),
    /// invalid introspection result: {0}
    InvalidIntrospection(String),
    /// Unknown operation named "{0}"
    UnknownOperation(String),
}
