//! Finds where values of interesting scalar types appear in the response to a query.
//!
//! The walk is a plain recursive descent over the validated document: every field
//! already knows its definition, so its declared type is known without tracking a
//! type context. Fragment definitions are walked once each, no matter how many
//! times they are spread, and spreads are inlined afterwards.

use std::collections::HashSet;

use apollo_compiler::ExecutableDocument;
use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::executable::Field;
use apollo_compiler::executable::Operation;
use apollo_compiler::executable::Selection;
use apollo_compiler::executable::SelectionSet;

use crate::json_ext::Path;
use crate::spec::Fragments;
use crate::spec::Occurrence;
use crate::spec::ScalarOccurrence;
use crate::spec::field_type;

/// The set of scalar type names whose values should be found.
pub trait InterestingScalars {
    fn contains_scalar(&self, name: &str) -> bool;
}

impl InterestingScalars for HashSet<String> {
    fn contains_scalar(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl InterestingScalars for [&str] {
    fn contains_scalar(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

impl<const N: usize> InterestingScalars for [&str; N] {
    fn contains_scalar(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

/// Returns every place where a value of one of the `scalars` appears in responses
/// to any operation of `document`, with fragment spreads inlined.
///
/// The order is the order of the document. Resolving the same document twice
/// gives the same result.
pub fn resolve<S>(
    document: &ExecutableDocument,
    schema: &Schema,
    scalars: &S,
) -> Vec<ScalarOccurrence>
where
    S: InterestingScalars + ?Sized,
{
    let operations = document
        .operations
        .anonymous
        .iter()
        .chain(document.operations.named.values())
        .map(|operation| &**operation);
    resolve_operations(document, operations, schema, scalars)
}

/// Same as [`resolve`], for a single operation of the document.
///
/// Returns `None` if the document has no such operation. Without a name, the
/// anonymous operation is used, or the only one when there is a single operation.
pub fn resolve_operation<S>(
    document: &ExecutableDocument,
    operation_name: Option<&str>,
    schema: &Schema,
    scalars: &S,
) -> Option<Vec<ScalarOccurrence>>
where
    S: InterestingScalars + ?Sized,
{
    let operation = select_operation(document, operation_name)?;
    Some(resolve_operations(
        document,
        std::iter::once(operation),
        schema,
        scalars,
    ))
}

pub(crate) fn select_operation<'a>(
    document: &'a ExecutableDocument,
    operation_name: Option<&str>,
) -> Option<&'a Operation> {
    match operation_name {
        Some(name) => document.operations.named.get(name).map(|op| &**op),
        None => match &document.operations.anonymous {
            Some(operation) => Some(&**operation),
            None if document.operations.named.len() == 1 => {
                document.operations.named.values().next().map(|op| &**op)
            }
            None => None,
        },
    }
}

fn resolve_operations<'a, S>(
    document: &'a ExecutableDocument,
    operations: impl Iterator<Item = &'a Operation>,
    schema: &Schema,
    scalars: &S,
) -> Vec<ScalarOccurrence>
where
    S: InterestingScalars + ?Sized,
{
    let mut collector = Collector {
        schema,
        scalars,
        in_operations: Vec::new(),
        fragments: Fragments::default(),
        path: Path::empty(),
    };
    for operation in operations {
        collector.selection_set(&operation.selection_set, None);
    }
    for fragment in document.fragments.values() {
        collector.selection_set(&fragment.selection_set, Some(&fragment.name));
    }

    let Collector {
        in_operations,
        mut fragments,
        ..
    } = collector;
    let resolved = fragments.inline(in_operations);
    tracing::debug!(occurrences = resolved.len(), "resolved scalar paths");
    resolved
}

struct Collector<'a, S: ?Sized> {
    schema: &'a Schema,
    scalars: &'a S,
    in_operations: Vec<Occurrence>,
    fragments: Fragments,
    /// Response keys from the root of the operation or fragment being walked.
    path: Path,
}

impl<S> Collector<'_, S>
where
    S: InterestingScalars + ?Sized,
{
    fn selection_set(&mut self, selection_set: &SelectionSet, fragment: Option<&Name>) {
        for selection in &selection_set.selections {
            match selection {
                Selection::Field(field) => self.field(field, fragment),
                Selection::FragmentSpread(spread) => {
                    let occurrence = Occurrence::FragmentSpread {
                        fragment_name: spread.fragment_name.clone(),
                        path: self.path.clone(),
                    };
                    self.emit(occurrence, fragment)
                }
                // Inline fragments select more fields on the same object.
                Selection::InlineFragment(inline) => {
                    self.selection_set(&inline.selection_set, fragment)
                }
            }
        }
    }

    fn field(&mut self, field: &Field, fragment: Option<&Name>) {
        let response_key = field.alias.as_ref().unwrap_or(&field.name);
        self.path.push(response_key.as_str());

        if let Some(scalar) = field_type::scalar_type_name(field.ty(), self.schema)
            && self.scalars.contains_scalar(scalar)
        {
            tracing::trace!(
                scalar = %scalar,
                path = %self.path,
                "found scalar"
            );
            let occurrence = Occurrence::Scalar(ScalarOccurrence {
                name: scalar.to_string(),
                path: self.path.clone(),
            });
            self.emit(occurrence, fragment);
        }
        self.selection_set(&field.selection_set, fragment);

        self.path.pop();
    }

    fn emit(&mut self, occurrence: Occurrence, fragment: Option<&Name>) {
        match fragment {
            Some(fragment_name) => self.fragments.push(fragment_name, occurrence),
            None => self.in_operations.push(occurrence),
        }
    }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::validation::Valid;
    use pretty_assertions::assert_eq;

    use super::*;

    const SCHEMA: &str = r#"
        scalar Date
        scalar JSON

        type Query {
            simple: String!
            date: Date
            nested: Nested!
            list: [String!]!
            dates: [[Date!]]
            listNested: [Nested!]!
            post(id: ID!): Post
            search: [SearchResult!]!
        }

        type Nested {
            name: String!
            createdAt: Date!
            child: Nested
        }

        type Post {
            id: ID!
            title: String!
            publishedAt: Date
            meta: JSON
            author: Author!
        }

        type Author {
            name: String!
            birthday: Date
            posts: [Post!]!
        }

        union SearchResult = Post | Author
    "#;

    fn schema() -> Valid<Schema> {
        Schema::parse_and_validate(SCHEMA, "schema.graphql").unwrap()
    }

    fn scalars_in(query: &str, scalars: &[&str]) -> Vec<ScalarOccurrence> {
        let schema = schema();
        let document = ExecutableDocument::parse_and_validate(&schema, query, "query.graphql")
            .unwrap();
        let mut resolved = resolve(&document, &schema, scalars);
        resolved.sort();
        resolved
    }

    #[test]
    fn finds_fields_at_every_depth() {
        assert_eq!(
            scalars_in(
                "{ simple date nested { name createdAt child { createdAt } } }",
                &["Date"]
            ),
            vec![
                ScalarOccurrence::new("Date", "date"),
                ScalarOccurrence::new("Date", "nested/child/createdAt"),
                ScalarOccurrence::new("Date", "nested/createdAt"),
            ]
        );
    }

    #[test]
    fn list_wrappers_do_not_add_path_segments() {
        assert_eq!(
            scalars_in("{ list dates listNested { name } }", &["String", "Date"]),
            vec![
                ScalarOccurrence::new("Date", "dates"),
                ScalarOccurrence::new("String", "list"),
                ScalarOccurrence::new("String", "listNested/name"),
            ]
        );
    }

    #[test]
    fn aliases_take_precedence_over_names() {
        assert_eq!(
            scalars_in(
                "{ when: date first: nested { at: createdAt } second: nested { createdAt } }",
                &["Date"]
            ),
            vec![
                ScalarOccurrence::new("Date", "first/at"),
                ScalarOccurrence::new("Date", "second/createdAt"),
                ScalarOccurrence::new("Date", "when"),
            ]
        );
    }

    #[test]
    fn untracked_scalars_are_ignored() {
        assert!(scalars_in("{ simple list nested { name } }", &["Date"]).is_empty());
        assert!(scalars_in("{ date }", &[]).is_empty());
    }

    #[test]
    fn meta_fields_are_scalars_too() {
        assert_eq!(
            scalars_in("{ __typename nested { __typename name } }", &["String"]),
            vec![
                ScalarOccurrence::new("String", "__typename"),
                ScalarOccurrence::new("String", "nested/__typename"),
                ScalarOccurrence::new("String", "nested/name"),
            ]
        );
    }

    #[test]
    fn inline_fragments_keep_the_enclosing_path() {
        assert_eq!(
            scalars_in(
                r#"{
                    search {
                        ... on Post { publishedAt }
                        ... on Author { birthday }
                        ... { __typename }
                    }
                }"#,
                &["Date"]
            ),
            vec![
                ScalarOccurrence::new("Date", "search/birthday"),
                ScalarOccurrence::new("Date", "search/publishedAt"),
            ]
        );
    }

    #[test]
    fn fragment_spreads_are_inlined_at_each_call_site() {
        assert_eq!(
            scalars_in(
                r#"
                query {
                    first: nested { ...NestedFields }
                    second: nested { child { ...NestedFields } }
                }

                fragment NestedFields on Nested {
                    createdAt
                }
                "#,
                &["Date"]
            ),
            vec![
                ScalarOccurrence::new("Date", "first/createdAt"),
                ScalarOccurrence::new("Date", "second/child/createdAt"),
            ]
        );
    }

    #[test]
    fn nested_fragments_are_inlined() {
        assert_eq!(
            scalars_in(
                r#"
                query {
                    post(id: 1) { ...PostFields }
                }

                fragment PostFields on Post {
                    publishedAt
                    meta
                    author { ...AuthorFields }
                }

                fragment AuthorFields on Author {
                    birthday
                    posts { title publishedAt }
                }
                "#,
                &["Date", "JSON"]
            ),
            vec![
                ScalarOccurrence::new("Date", "post/author/birthday"),
                ScalarOccurrence::new("Date", "post/author/posts/publishedAt"),
                ScalarOccurrence::new("Date", "post/publishedAt"),
                ScalarOccurrence::new("JSON", "post/meta"),
            ]
        );
    }

    #[test]
    fn spread_at_the_root_and_inside_inline_fragment() {
        assert_eq!(
            scalars_in(
                r#"
                query {
                    ...Root
                    search { ... on Post { ...PostDate } }
                }

                fragment Root on Query { date }
                fragment PostDate on Post { publishedAt }
                "#,
                &["Date"]
            ),
            vec![
                ScalarOccurrence::new("Date", "date"),
                ScalarOccurrence::new("Date", "search/publishedAt"),
            ]
        );
    }

    #[test]
    fn fragment_cycles_terminate() {
        let schema = schema();
        // Cycles do not pass validation, so build the document without it.
        let document = ExecutableDocument::parse(
            &schema,
            r#"
            query {
                nested { ...Recursive }
            }

            fragment Recursive on Nested {
                createdAt
                child { ...Recursive }
            }
            "#,
            "query.graphql",
        )
        .unwrap();
        assert_eq!(
            resolve(&document, &schema, &["Date"]),
            vec![ScalarOccurrence::new("Date", "nested/createdAt")]
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let query = r#"
            query {
                a: nested { ...F }
                b: nested { ...F }
                dates
            }
            fragment F on Nested { createdAt child { ...G } }
            fragment G on Nested { createdAt }
        "#;
        let first = scalars_in(query, &["Date"]);
        assert_eq!(first.len(), 5);
        assert_eq!(first, scalars_in(query, &["Date"]));
    }

    #[test]
    fn selects_a_single_operation() {
        let schema = schema();
        let document = ExecutableDocument::parse_and_validate(
            &schema,
            r#"
            query Dates { date }
            query Names { nested { name } }
            "#,
            "query.graphql",
        )
        .unwrap();
        let scalars = ["Date", "String"];

        assert_eq!(
            resolve_operation(&document, Some("Names"), &schema, &scalars),
            Some(vec![ScalarOccurrence::new("String", "nested/name")])
        );
        assert_eq!(
            resolve_operation(&document, Some("Missing"), &schema, &scalars),
            None
        );
        // Ambiguous without a name.
        assert_eq!(resolve_operation(&document, None, &schema, &scalars), None);
        assert_eq!(resolve(&document, &schema, &scalars).len(), 2);
    }
}
