//! JSON helpers: value aliases, field paths and the structural mapper that
//! rewrites values found at a path of a response.

use std::fmt;

use serde::Serialize;
use serde_json_bytes::ByteString;
use serde_json_bytes::Map;

/// A JSON object.
pub type Object = Map<ByteString, Value>;

/// A JSON value, with string storage shared with the response bytes.
pub type Value = serde_json_bytes::Value;

/// A path to a value inside of a response, made of response keys (a field's alias
/// if it has one, its name otherwise).
///
/// Paths never contain list indices: when a key designates a list, the path
/// continues through every element of that list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Path(Vec<String>);

impl Path {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub(crate) fn push(&mut self, key: impl Into<String>) {
        self.0.push(key.into())
    }

    pub(crate) fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    /// Returns a new path made of `self` followed by `other`.
    pub fn join(&self, other: &Path) -> Path {
        let mut joined = Vec::with_capacity(self.len() + other.len());
        joined.extend(self.0.iter().cloned());
        joined.extend(other.0.iter().cloned());
        Path(joined)
    }

    pub(crate) fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<T: Into<String>> FromIterator<T> for Path {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Path(iter.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Path {
    /// Parses a `/` separated path, such as `listNested/name`.
    fn from(s: &str) -> Self {
        s.split('/').filter(|key| !key.is_empty()).collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.0 {
            write!(f, "/{key}")?;
        }
        Ok(())
    }
}

pub(crate) trait ValueExt {
    /// Replaces every value designated by `path` with the result of `transform`.
    ///
    /// Lists are traversed wherever they appear, nulls and values that do not
    /// match the shape of the path are left as they are.
    fn map_path(&mut self, path: &[String], transform: &dyn Fn(Value) -> Value);

    /// Replaces a leaf value, distributing over lists. Null is never transformed.
    fn map_leaf(&mut self, transform: &dyn Fn(Value) -> Value);
}

impl ValueExt for Value {
    fn map_path(&mut self, path: &[String], transform: &dyn Fn(Value) -> Value) {
        match self {
            Value::Array(items) => items
                .iter_mut()
                .for_each(|item| item.map_path(path, transform)),
            Value::Object(object) => {
                let Some((key, rest)) = path.split_first() else {
                    return;
                };
                let Some(child) = object.get_mut(key.as_str()) else {
                    return;
                };
                if rest.is_empty() {
                    child.map_leaf(transform)
                } else {
                    child.map_path(rest, transform)
                }
            }
            _ => {}
        }
    }

    fn map_leaf(&mut self, transform: &dyn Fn(Value) -> Value) {
        match self {
            Value::Null => {}
            Value::Array(items) => items.iter_mut().for_each(|item| item.map_leaf(transform)),
            leaf => *leaf = transform(std::mem::take(leaf)),
        }
    }
}

/// Returns `value` with `transform` applied at every position designated by `path`.
///
/// The value is taken by ownership, so callers can never observe it half rewritten.
/// Anything not on the path is moved to the result untouched. This never fails: a
/// null, a missing key or a value of an unexpected shape simply stops the descent.
pub fn map_scalar(mut value: Value, path: &Path, transform: &dyn Fn(Value) -> Value) -> Value {
    value.map_path(path.as_slice(), transform);
    value
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use pretty_assertions::assert_eq;
    use serde_json_bytes::json;

    use super::*;

    fn uppercase(value: Value) -> Value {
        match value.as_str() {
            Some(s) => Value::String(s.to_uppercase().into()),
            None => value,
        }
    }

    #[test]
    fn path_display_and_parse() {
        let path = Path::from("first/nested/name");
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some("name"));
        assert_eq!(path.to_string(), "/first/nested/name");
        assert_eq!(Path::from("/a//b/"), Path::from_iter(["a", "b"]));
    }

    #[test]
    fn join_prefixes_paths() {
        let prefix = Path::from("first/nested");
        assert_eq!(
            prefix.join(&Path::from("name")),
            Path::from("first/nested/name")
        );
        assert_eq!(Path::empty().join(&prefix), prefix);
    }

    #[test]
    fn maps_top_level_scalar() {
        let data = json!({ "simple": "a", "other": "b" });
        assert_eq!(
            map_scalar(data, &Path::from("simple"), &uppercase),
            json!({ "simple": "A", "other": "b" })
        );
    }

    #[test]
    fn maps_nested_scalar() {
        let data = json!({ "nested": { "name": "a", "id": "x" } });
        assert_eq!(
            map_scalar(data, &Path::from("nested/name"), &uppercase),
            json!({ "nested": { "name": "A", "id": "x" } })
        );
    }

    #[test]
    fn fans_out_over_lists_of_scalars() {
        let data = json!({ "list": ["a", "b"] });
        assert_eq!(
            map_scalar(data, &Path::from("list"), &uppercase),
            json!({ "list": ["A", "B"] })
        );
    }

    #[test]
    fn fans_out_over_lists_of_objects() {
        let data = json!({ "listNested": [{ "name": "a" }, { "name": "b" }] });
        assert_eq!(
            map_scalar(data, &Path::from("listNested/name"), &uppercase),
            json!({ "listNested": [{ "name": "A" }, { "name": "B" }] })
        );
    }

    #[test]
    fn fans_out_over_nested_lists() {
        let data = json!({
            "matrix": [["a", "b"], ["c"]],
            "grid": [[{ "name": "a" }], [{ "name": "b" }, null]],
        });
        let data = map_scalar(data, &Path::from("matrix"), &uppercase);
        let data = map_scalar(data, &Path::from("grid/name"), &uppercase);
        assert_eq!(
            data,
            json!({
                "matrix": [["A", "B"], ["C"]],
                "grid": [[{ "name": "A" }], [{ "name": "B" }, null]],
            })
        );
    }

    #[test]
    fn nulls_are_never_transformed() {
        let calls = AtomicUsize::new(0);
        let counting = |value: Value| {
            calls.fetch_add(1, Ordering::SeqCst);
            value
        };

        let data = json!({
            "listNestedNullable": null,
            "nullableLeaf": null,
            "list": ["a", null],
            "nested": { "inner": null },
        });
        let expected = data.clone();
        let data = map_scalar(data, &Path::from("listNestedNullable/name"), &counting);
        let data = map_scalar(data, &Path::from("nullableLeaf"), &counting);
        let data = map_scalar(data, &Path::from("nested/inner/name"), &counting);
        assert_eq!(data, expected);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let data = map_scalar(data, &Path::from("list"), &counting);
        assert_eq!(data, expected);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn mismatched_shapes_are_left_alone() {
        let data = json!({ "nested": "not an object", "list": [1, { "name": "a" }] });
        let expected = json!({ "nested": "not an object", "list": [1, { "name": "A" }] });
        let data = map_scalar(data, &Path::from("nested/name"), &uppercase);
        let data = map_scalar(data, &Path::from("missing/name"), &uppercase);
        let data = map_scalar(data, &Path::from("list/name"), &uppercase);
        assert_eq!(data, expected);
        assert_eq!(map_scalar(Value::Null, &Path::from("a"), &uppercase), Value::Null);
    }

    #[test]
    fn empty_path_is_a_no_op() {
        let data = json!({ "simple": "a" });
        assert_eq!(map_scalar(data.clone(), &Path::empty(), &uppercase), data);
    }
}
