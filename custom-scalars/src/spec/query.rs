//! A parsed and validated GraphQL query.

use std::fmt;

use apollo_compiler::ExecutableDocument;
use apollo_compiler::validation::Valid;
use sha2::Digest;
use sha2::Sha256;

use crate::spec::InterestingScalars;
use crate::spec::ScalarOccurrence;
use crate::spec::Schema;
use crate::spec::SpecError;

pub(crate) mod scalar_paths;

/// SHA-256 of the query source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryHash([u8; 32]);

impl QueryHash {
    fn of(query: &str) -> Self {
        Self(Sha256::digest(query.as_bytes()).into())
    }
}

impl fmt::Display for QueryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for QueryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryHash({self})")
    }
}

/// A GraphQL query, validated against a [`Schema`].
#[derive(Debug)]
pub struct Query {
    string: String,
    document: Valid<ExecutableDocument>,
    operation_name: Option<String>,
    hash: QueryHash,
}

impl Query {
    /// Parses and validates `query`.
    ///
    /// When an operation name is given, the document must contain that operation.
    pub fn parse(
        query: impl Into<String>,
        operation_name: Option<&str>,
        schema: &Schema,
    ) -> Result<Self, SpecError> {
        let string = query.into();
        let document =
            ExecutableDocument::parse(schema.definitions(), string.as_str(), "query.graphql")
                .map_err(|invalid| SpecError::ParsingError(invalid.errors.to_string()))?
                .validate(schema.definitions())
                .map_err(|invalid| SpecError::ValidationError(invalid.errors.to_string()))?;

        if let Some(name) = operation_name
            && !document.operations.named.contains_key(name)
        {
            return Err(SpecError::UnknownOperation(name.to_string()));
        }

        let hash = QueryHash::of(&string);
        Ok(Self {
            string,
            document,
            operation_name: operation_name.map(str::to_string),
            hash,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }

    pub fn document(&self) -> &Valid<ExecutableDocument> {
        &self.document
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    pub fn hash(&self) -> QueryHash {
        self.hash
    }

    /// Where the values of `scalars` appear in responses to this query.
    ///
    /// Only the selected operation is considered when the document says which
    /// one it is, either by name or by containing a single operation.
    pub fn scalar_paths<S>(&self, schema: &Schema, scalars: &S) -> Vec<ScalarOccurrence>
    where
        S: InterestingScalars + ?Sized,
    {
        let _span = tracing::debug_span!("scalar_paths", query.hash = %self.hash).entered();
        scalar_paths::resolve_operation(
            &self.document,
            self.operation_name(),
            schema.definitions(),
            scalars,
        )
        .unwrap_or_else(|| scalar_paths::resolve(&self.document, schema.definitions(), scalars))
    }
}
