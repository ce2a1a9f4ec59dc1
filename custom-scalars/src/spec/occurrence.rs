use std::fmt;

use apollo_compiler::Name;
use serde::Serialize;

use crate::json_ext::Path;

/// A value of the scalar `name` appears at `path` in responses to a query.
///
/// When the path goes through lists, the scalar appears in every element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScalarOccurrence {
    /// The name of the scalar type.
    pub name: String,
    /// Where to find it, relative to the root of the response data.
    pub path: Path,
}

impl ScalarOccurrence {
    pub fn new(name: impl Into<String>, path: impl Into<Path>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// The same occurrence, seen from a selection set that is `prefix` levels higher.
    pub(crate) fn prefixed(&self, prefix: &Path) -> Self {
        Self {
            name: self.name.clone(),
            path: prefix.join(&self.path),
        }
    }
}

impl fmt::Display for ScalarOccurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.name, self.path)
    }
}

/// Something found while walking a selection set, before fragment spreads are inlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Occurrence {
    Scalar(ScalarOccurrence),
    FragmentSpread {
        fragment_name: Name,
        /// Path of the selection set containing the spread.
        path: Path,
    },
}
