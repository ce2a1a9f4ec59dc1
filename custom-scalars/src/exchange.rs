//! Rewrites the custom scalar values of GraphQL responses.
//!
//! A [`ScalarExchange`] pairs a schema with a table of [`ScalarTransforms`]. For
//! each query it resolves where the values of transformed scalars land in a
//! response, then applies the matching transform at each of those places.
//!
//! It can be used directly ([`ScalarExchange::transform_response`]), over a
//! stream of responses ([`ScalarExchange::map_stream`]), or as a [`tower::Layer`]
//! around any service turning a [`Request`] into a [`Response`].

use std::sync::Arc;
use std::task::Context;
use std::task::Poll;

use futures::FutureExt;
use futures::Stream;
use futures::StreamExt;
use futures::TryFutureExt;
use futures::future::BoxFuture;
use tower::Layer;
use tower::Service;

use crate::cache::ScalarPathsCache;
use crate::configuration::Configuration;
use crate::graphql::Request;
use crate::graphql::Response;
use crate::graphql::ResponseStream;
use crate::json_ext::Value;
use crate::json_ext::map_scalar;
use crate::spec::Query;
use crate::spec::ScalarOccurrence;
use crate::spec::Schema;
use crate::transforms::ScalarTransforms;

/// Applies scalar transforms to the responses of queries against one schema.
///
/// Cloning is cheap and clones share the scalar paths cache.
#[derive(Clone)]
pub struct ScalarExchange {
    inner: Arc<Inner>,
}

struct Inner {
    schema: Arc<Schema>,
    transforms: ScalarTransforms,
    cache: Option<ScalarPathsCache>,
}

impl ScalarExchange {
    pub fn new(schema: impl Into<Arc<Schema>>, transforms: ScalarTransforms) -> Self {
        Self::with_configuration(schema, transforms, &Configuration::default())
    }

    pub fn with_configuration(
        schema: impl Into<Arc<Schema>>,
        transforms: ScalarTransforms,
        configuration: &Configuration,
    ) -> Self {
        let schema = schema.into();
        for name in transforms.names() {
            if !schema.is_scalar(name) {
                tracing::warn!(
                    scalar = name,
                    "transform registered for `{name}`, which is not a scalar type of the schema"
                );
            }
        }

        let cache = configuration
            .cache
            .enabled
            .then(|| ScalarPathsCache::new(configuration.cache.limit));
        Self {
            inner: Arc::new(Inner {
                schema,
                transforms,
                cache,
            }),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    pub fn transforms(&self) -> &ScalarTransforms {
        &self.inner.transforms
    }

    /// Where the values of transformed scalars appear in responses to `query`.
    pub fn scalar_paths(&self, query: &Query) -> Arc<Vec<ScalarOccurrence>> {
        let resolve = || query.scalar_paths(&self.inner.schema, &self.inner.transforms);
        match &self.inner.cache {
            Some(cache) => cache.get_or_resolve(query, resolve),
            None => Arc::new(resolve()),
        }
    }

    /// Applies the transforms to the `data` of a response to `query`.
    pub fn transform_data(&self, query: &Query, data: Value) -> Value {
        if self.inner.transforms.is_empty() {
            return data;
        }
        let occurrences = self.scalar_paths(query);
        tracing::trace!(
            query.hash = %query.hash(),
            occurrences = occurrences.len(),
            "transforming scalars"
        );
        occurrences.iter().fold(data, |data, occurrence| {
            match self.inner.transforms.get(&occurrence.name) {
                Some(transform) => map_scalar(data, &occurrence.path, transform.as_ref()),
                None => data,
            }
        })
    }

    /// Applies the transforms to a response to `query`. Errors and extensions
    /// are left as they are.
    pub fn transform_response(&self, query: &Query, mut response: Response) -> Response {
        response.data = response
            .data
            .take()
            .map(|data| self.transform_data(query, data));
        response
    }

    /// Transforms every response of `stream`, in order.
    pub fn map_stream<S>(&self, query: Arc<Query>, stream: S) -> ResponseStream
    where
        S: Stream<Item = Response> + Send + 'static,
    {
        let exchange = self.clone();
        stream
            .map(move |response| exchange.transform_response(&query, response))
            .boxed()
    }
}

impl std::fmt::Debug for ScalarExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalarExchange")
            .field("transforms", &self.inner.transforms)
            .field("cache", &self.inner.cache.is_some())
            .finish()
    }
}

impl<S> Layer<S> for ScalarExchange {
    type Service = ScalarExchangeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ScalarExchangeService {
            inner,
            exchange: self.clone(),
        }
    }
}

/// [`Service`] transforming the responses of the service it wraps.
#[derive(Clone)]
pub struct ScalarExchangeService<S> {
    inner: S,
    exchange: ScalarExchange,
}

impl<S> Service<Request> for ScalarExchangeService<S>
where
    S: Service<Request, Response = Response>,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let query = request.query.clone();
        let exchange = self.exchange.clone();
        self.inner
            .call(request)
            .map_ok(move |response| exchange.transform_response(&query, response))
            .boxed()
    }
}
