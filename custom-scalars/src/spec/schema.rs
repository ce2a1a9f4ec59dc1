//! GraphQL schema.

use apollo_compiler::schema::ExtendedType;
use apollo_compiler::validation::Valid;

use crate::introspection;
use crate::spec::SpecError;

/// A GraphQL schema.
#[derive(Debug)]
pub struct Schema {
    definitions: Valid<apollo_compiler::Schema>,
}

impl Schema {
    /// Parses and validates a schema definition.
    pub fn parse(sdl: &str) -> Result<Self, SpecError> {
        let definitions = apollo_compiler::Schema::parse_and_validate(sdl, "schema.graphql")
            .map_err(|invalid| SpecError::InvalidSchema(invalid.errors.to_string()))?;
        Ok(Self { definitions })
    }

    /// Builds the schema from the JSON result of an introspection query.
    pub fn from_introspection(introspection: &[u8]) -> Result<Self, SpecError> {
        let sdl = introspection::to_sdl(introspection)?;
        Self::parse(&sdl)
    }

    pub fn definitions(&self) -> &Valid<apollo_compiler::Schema> {
        &self.definitions
    }

    /// Whether `name` is a scalar type of this schema, built-in or custom.
    pub fn is_scalar(&self, name: &str) -> bool {
        matches!(
            self.definitions.types.get(name),
            Some(ExtendedType::Scalar(_))
        )
    }
}

impl From<Valid<apollo_compiler::Schema>> for Schema {
    fn from(definitions: Valid<apollo_compiler::Schema>) -> Self {
        Self { definitions }
    }
}
