//! Rewrites the values of custom scalars in GraphQL responses.
//!
//! GraphQL responses carry custom scalars (dates, money, JSON blobs...) in their
//! wire representation. This crate finds, from the query and the schema alone,
//! every place in a response where a value of a given scalar type lands, and
//! applies a user supplied transform there.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod cache;
pub mod configuration;
mod exchange;
pub mod graphql;
mod introspection;
pub mod json_ext;
pub mod spec;
mod transforms;

pub use configuration::Configuration;
pub use exchange::ScalarExchange;
pub use exchange::ScalarExchangeService;
pub use json_ext::Path;
pub use json_ext::map_scalar;
pub use spec::Query;
pub use spec::ScalarOccurrence;
pub use spec::Schema;
pub use spec::SpecError;
pub use transforms::ScalarTransform;
pub use transforms::ScalarTransforms;
