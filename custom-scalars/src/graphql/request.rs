use std::sync::Arc;

use crate::json_ext::Object;
use crate::spec::Query;

/// A GraphQL request, with its query already parsed and validated.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Request {
    /// The query, shared with every response it produces.
    pub query: Arc<Query>,

    /// The variables of the selected operation.
    pub variables: Object,
}

impl Request {
    pub fn new(query: impl Into<Arc<Query>>, variables: Object) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }
}
