use bytes::Bytes;
use displaydoc::Display;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::Error;
use crate::json_ext::Object;
use crate::json_ext::Value;

/// A GraphQL response: the `data` that scalar transforms rewrite, along with
/// errors and extensions which are forwarded as is.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Response {
    /// The response data.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<Value>,

    /// The optional graphql errors encountered.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<Error>,

    /// The optional graphql extensions.
    #[serde(skip_serializing_if = "Object::is_empty", default)]
    pub extensions: Object,
}

/// malformed response: {reason}
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub struct MalformedResponseError {
    pub(crate) reason: String,
}

impl MalformedResponseError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Response {
    /// A response carrying only `data`.
    pub fn from_data(data: impl Into<Value>) -> Self {
        Self {
            data: Some(data.into()),
            ..Default::default()
        }
    }

    /// Create a [`Response`] from the supplied [`Bytes`].
    ///
    /// `"data": null` and a missing `data` key both become `None`.
    pub fn from_bytes(b: Bytes) -> Result<Response, MalformedResponseError> {
        let value =
            Value::from_bytes(b).map_err(|error| MalformedResponseError::new(error.to_string()))?;
        let Value::Object(mut object) = value else {
            return Err(MalformedResponseError::new("response is not a JSON object"));
        };

        let data = object.remove("data").filter(|data| !data.is_null());
        let errors = match object.remove("errors") {
            None | Some(Value::Null) => Vec::new(),
            Some(errors @ Value::Array(_)) => serde_json_bytes::from_value(errors)
                .map_err(|err| MalformedResponseError::new(format!("invalid `errors`: {err}")))?,
            Some(_) => return Err(MalformedResponseError::new("`errors` must be an array")),
        };
        let extensions = match object.remove("extensions") {
            None | Some(Value::Null) => Object::new(),
            Some(Value::Object(extensions)) => extensions,
            Some(_) => {
                return Err(MalformedResponseError::new(
                    "`extensions` must be an object",
                ));
            }
        };

        // If the data entry in the response is not present, the errors entry in
        // the response must not be empty.
        if data.is_none() && errors.is_empty() {
            return Err(MalformedResponseError::new(
                "graphql response without data must contain at least one error",
            ));
        }

        Ok(Response {
            data,
            errors,
            extensions,
        })
    }
}
