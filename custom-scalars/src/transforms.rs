//! The table of functions applied to scalar values, keyed by scalar type name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::json_ext::Value;
use crate::spec::InterestingScalars;

/// A function rewriting one scalar value of a response.
pub type ScalarTransform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Scalar type name to transform.
///
/// Scalars without an entry are left untouched, and never even looked for.
#[derive(Clone, Default)]
pub struct ScalarTransforms {
    transforms: HashMap<String, ScalarTransform>,
}

impl ScalarTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the transform of the scalar `name`.
    pub fn with<F>(mut self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.insert(name, transform);
        self
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, transform: F)
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transforms.insert(name.into(), Arc::new(transform));
    }

    pub fn get(&self, name: &str) -> Option<&ScalarTransform> {
        self.transforms.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl InterestingScalars for ScalarTransforms {
    fn contains_scalar(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }
}

impl fmt::Debug for ScalarTransforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ScalarTransforms")
            .field("scalars", &names)
            .finish()
    }
}
