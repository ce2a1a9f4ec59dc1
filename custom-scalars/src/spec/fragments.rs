use std::collections::HashMap;
use std::sync::Arc;

use apollo_compiler::Name;

use super::Occurrence;
use super::ScalarOccurrence;

/// Occurrences found in the body of each fragment definition, and the memoized
/// result of inlining their fragment spreads.
///
/// Built for a single query and dropped once its scalar paths are resolved.
#[derive(Debug, Default)]
pub(crate) struct Fragments {
    definitions: HashMap<Name, Vec<Occurrence>>,
    resolutions: HashMap<Name, Resolution>,
}

#[derive(Debug)]
enum Resolution {
    /// On the resolution stack, at this depth.
    InProgress { depth: usize },
    Resolved(Arc<Vec<ScalarOccurrence>>),
}

/// Scalars found while inlining, and the shallowest stack depth that a fragment
/// cycle led back to, if any.
struct Inlined {
    scalars: Vec<ScalarOccurrence>,
    cycle: Option<usize>,
}

impl Fragments {
    pub(crate) fn push(&mut self, fragment_name: &Name, occurrence: Occurrence) {
        self.definitions
            .entry(fragment_name.clone())
            .or_default()
            .push(occurrence)
    }

    /// Replaces every fragment spread in `occurrences` with the scalars of the
    /// spread fragment, prefixed by the path of the spread.
    pub(crate) fn inline(&mut self, occurrences: Vec<Occurrence>) -> Vec<ScalarOccurrence> {
        self.inline_at(occurrences, 0).scalars
    }

    fn inline_at(&mut self, occurrences: Vec<Occurrence>, depth: usize) -> Inlined {
        let mut scalars = Vec::with_capacity(occurrences.len());
        let mut cycle: Option<usize> = None;
        for occurrence in occurrences {
            match occurrence {
                Occurrence::Scalar(scalar) => scalars.push(scalar),
                Occurrence::FragmentSpread {
                    fragment_name,
                    path,
                } => {
                    let (resolved, inner_cycle) = self.resolve(&fragment_name, depth);
                    scalars.extend(resolved.iter().map(|scalar| scalar.prefixed(&path)));
                    cycle = match (cycle, inner_cycle) {
                        (Some(a), Some(b)) => Some(a.min(b)),
                        (a, b) => a.or(b),
                    };
                }
            }
        }
        Inlined { scalars, cycle }
    }

    fn resolve(
        &mut self,
        fragment_name: &Name,
        depth: usize,
    ) -> (Arc<Vec<ScalarOccurrence>>, Option<usize>) {
        match self.resolutions.get(fragment_name) {
            Some(Resolution::Resolved(scalars)) => return (scalars.clone(), None),
            Some(Resolution::InProgress { depth: cycle_depth }) => {
                tracing::trace!(fragment = %fragment_name, "fragment cycle, skipping spread");
                return (Arc::default(), Some(*cycle_depth));
            }
            None => {}
        }

        self.resolutions
            .insert(fragment_name.clone(), Resolution::InProgress { depth });
        let occurrences = self
            .definitions
            .get(fragment_name)
            .cloned()
            .unwrap_or_default();
        let Inlined { scalars, cycle } = self.inline_at(occurrences, depth + 1);
        let scalars = Arc::new(scalars);

        // A cycle back to this very fragment is complete once we get here. A cycle to
        // a fragment further down the stack makes the result depend on that stack.
        let cycle = cycle.filter(|cycle_depth| *cycle_depth < depth);
        if cycle.is_none() {
            self.resolutions
                .insert(fragment_name.clone(), Resolution::Resolved(scalars.clone()));
        } else {
            self.resolutions.remove(fragment_name);
        }
        (scalars, cycle)
    }
}
