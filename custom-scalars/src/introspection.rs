//! Rebuilds a schema definition from the JSON result of an introspection query.
//!
//! Built-in scalars and directives, and the `__` introspection types, are left out:
//! the compiler defines them itself.

use serde::Deserialize;

use crate::spec::SpecError;

const BUILT_IN_SCALARS: &[&str] = &["String", "Int", "Float", "Boolean", "ID"];
const BUILT_IN_DIRECTIVES: &[&str] = &["skip", "include", "deprecated", "specifiedBy", "oneOf"];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope {
    Response { data: IntrospectionQuery },
    Data(IntrospectionQuery),
}

#[derive(Debug, Deserialize)]
struct IntrospectionQuery {
    #[serde(rename = "__schema")]
    schema: IntrospectionSchema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionSchema {
    query_type: NamedRef,
    mutation_type: Option<NamedRef>,
    subscription_type: Option<NamedRef>,
    types: Vec<FullType>,
    #[serde(default)]
    directives: Vec<DirectiveDefinition>,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullType {
    kind: TypeKind,
    name: String,
    description: Option<String>,
    fields: Option<Vec<FieldDefinition>>,
    input_fields: Option<Vec<InputValue>>,
    interfaces: Option<Vec<TypeRef>>,
    enum_values: Option<Vec<EnumValue>>,
    possible_types: Option<Vec<TypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldDefinition {
    name: String,
    description: Option<String>,
    #[serde(default)]
    args: Vec<InputValue>,
    #[serde(rename = "type")]
    ty: TypeRef,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputValue {
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    ty: TypeRef,
    default_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnumValue {
    name: String,
    description: Option<String>,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeRef {
    kind: TypeKind,
    name: Option<String>,
    of_type: Option<Box<TypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectiveDefinition {
    name: String,
    description: Option<String>,
    locations: Vec<String>,
    #[serde(default)]
    args: Vec<InputValue>,
    #[serde(default)]
    is_repeatable: bool,
}

fn invalid(reason: impl Into<String>) -> SpecError {
    SpecError::InvalidIntrospection(reason.into())
}

/// Converts an introspection result, with or without its `data` envelope, to SDL.
pub(crate) fn to_sdl(introspection: &[u8]) -> Result<String, SpecError> {
    let envelope: Envelope =
        serde_json::from_slice(introspection).map_err(|err| invalid(err.to_string()))?;
    let (Envelope::Response { data } | Envelope::Data(data)) = envelope;
    let schema = data.schema;

    let mut definitions = vec![schema_definition(&schema)];
    for directive in &schema.directives {
        if !BUILT_IN_DIRECTIVES.contains(&directive.name.as_str()) {
            definitions.push(directive_definition(directive)?);
        }
    }
    for ty in &schema.types {
        if let Some(definition) = type_definition(ty)? {
            definitions.push(definition);
        }
    }
    tracing::debug!(
        types = schema.types.len(),
        "rebuilt schema from introspection"
    );
    Ok(definitions.join("\n\n"))
}

fn schema_definition(schema: &IntrospectionSchema) -> String {
    let mut roots = vec![format!("  query: {}", schema.query_type.name)];
    if let Some(mutation) = &schema.mutation_type {
        roots.push(format!("  mutation: {}", mutation.name));
    }
    if let Some(subscription) = &schema.subscription_type {
        roots.push(format!("  subscription: {}", subscription.name));
    }
    format!("schema {{\n{}\n}}", roots.join("\n"))
}

fn directive_definition(directive: &DirectiveDefinition) -> Result<String, SpecError> {
    Ok(format!(
        "{}directive @{}{}{} on {}",
        description(&directive.description, ""),
        directive.name,
        arguments(&directive.args)?,
        if directive.is_repeatable {
            " repeatable"
        } else {
            ""
        },
        directive.locations.join(" | ")
    ))
}

fn type_definition(ty: &FullType) -> Result<Option<String>, SpecError> {
    let name = ty.name.as_str();
    if name.starts_with("__") || (ty.kind == TypeKind::Scalar && BUILT_IN_SCALARS.contains(&name)) {
        return Ok(None);
    }
    let type_description = description(&ty.description, "");
    let definition = match ty.kind {
        TypeKind::Scalar => format!("scalar {name}"),
        TypeKind::Object | TypeKind::Interface => {
            let keyword = if ty.kind == TypeKind::Object {
                "type"
            } else {
                "interface"
            };
            let interfaces = ty
                .interfaces
                .iter()
                .flatten()
                .map(TypeRef::render)
                .collect::<Result<Vec<_>, _>>()?;
            let implements = if interfaces.is_empty() {
                String::new()
            } else {
                format!(" implements {}", interfaces.join(" & "))
            };
            let fields = ty
                .fields
                .iter()
                .flatten()
                .map(field_definition)
                .collect::<Result<Vec<_>, _>>()?;
            format!("{keyword} {name}{implements} {}", block(fields))
        }
        TypeKind::Union => {
            let members = ty
                .possible_types
                .iter()
                .flatten()
                .map(TypeRef::render)
                .collect::<Result<Vec<_>, _>>()?;
            format!("union {name} = {}", members.join(" | "))
        }
        TypeKind::Enum => {
            let values = ty
                .enum_values
                .iter()
                .flatten()
                .map(|value| {
                    format!(
                        "{}  {}{}",
                        description(&value.description, "  "),
                        value.name,
                        deprecated(value.is_deprecated, &value.deprecation_reason)
                    )
                })
                .collect();
            format!("enum {name} {}", block(values))
        }
        TypeKind::InputObject => {
            let fields = ty
                .input_fields
                .iter()
                .flatten()
                .map(|field| Ok(format!("  {}", input_value(field)?)))
                .collect::<Result<Vec<_>, SpecError>>()?;
            format!("input {name} {}", block(fields))
        }
        TypeKind::List | TypeKind::NonNull => {
            return Err(invalid(format!("`{name}` is a wrapping type, not a named type")));
        }
    };
    Ok(Some(format!("{type_description}{definition}")))
}

fn field_definition(field: &FieldDefinition) -> Result<String, SpecError> {
    Ok(format!(
        "{}  {}{}: {}{}",
        description(&field.description, "  "),
        field.name,
        arguments(&field.args)?,
        field.ty.render()?,
        deprecated(field.is_deprecated, &field.deprecation_reason)
    ))
}

fn arguments(args: &[InputValue]) -> Result<String, SpecError> {
    if args.is_empty() {
        return Ok(String::new());
    }
    let args = args
        .iter()
        .map(input_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("({})", args.join(", ")))
}

fn input_value(value: &InputValue) -> Result<String, SpecError> {
    let default = match &value.default_value {
        Some(default) => format!(" = {default}"),
        None => String::new(),
    };
    Ok(format!(
        "{}{}: {}{default}",
        description(&value.description, ""),
        value.name,
        value.ty.render()?
    ))
}

fn block(lines: Vec<String>) -> String {
    format!("{{\n{}\n}}", lines.join("\n"))
}

/// A description as a quoted string followed by a new line, or nothing.
fn description(description: &Option<String>, indent: &str) -> String {
    match description.as_deref().filter(|text| !text.is_empty()) {
        Some(text) => format!("{}\n{indent}", quote(text)),
        None => String::new(),
    }
}

fn deprecated(is_deprecated: bool, reason: &Option<String>) -> String {
    match (is_deprecated, reason) {
        (false, _) => String::new(),
        (true, Some(reason)) => format!(" @deprecated(reason: {})", quote(reason)),
        (true, None) => " @deprecated".to_string(),
    }
}

/// JSON string escapes are valid GraphQL string escapes.
fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

impl TypeRef {
    fn render(&self) -> Result<String, SpecError> {
        match self.kind {
            TypeKind::NonNull => Ok(format!("{}!", self.inner()?.render()?)),
            TypeKind::List => Ok(format!("[{}]", self.inner()?.render()?)),
            _ => self
                .name
                .clone()
                .ok_or_else(|| invalid("named type reference without a name")),
        }
    }

    fn inner(&self) -> Result<&TypeRef, SpecError> {
        self.of_type
            .as_deref()
            .ok_or_else(|| invalid("wrapping type reference without `ofType`"))
    }
}
