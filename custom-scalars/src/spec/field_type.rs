use apollo_compiler::Schema;
use apollo_compiler::ast::NamedType;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::Type;

/// Strips list and non-null wrappers from a type.
///
/// Example: for the field `list: [[Date!]]!`, it returns `Date`.
pub(crate) fn innermost_named_type(ty: &Type) -> &NamedType {
    match ty {
        Type::Named(name) | Type::NonNullNamed(name) => name,
        Type::List(inner) | Type::NonNullList(inner) => innermost_named_type(inner),
    }
}

/// Returns the name of the scalar a field of type `ty` resolves to, if the
/// innermost named type is a scalar (built-in or custom).
pub(crate) fn scalar_type_name<'a>(ty: &'a Type, schema: &Schema) -> Option<&'a NamedType> {
    let name = innermost_named_type(ty);
    match schema.types.get(name) {
        Some(ExtendedType::Scalar(_)) => Some(name),
        _ => None,
    }
}
