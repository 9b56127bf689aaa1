//! Root correlation: matching declared dependencies to graph nodes and
//! attributing everything transitively reachable from them.
//!
//! A lockfile alone never contributes detections; attribution is anchored
//! on the companion manifest's declared names. Lockfile entries no root
//! can reach are extra baggage (stale installs, pruned branches) and are
//! discarded.

use lockgraph_core::{ComponentId, DependencyGraph};
use std::collections::{HashMap, HashSet};

/// Mapping from component identity to the set of root identities that
/// explicitly require it (directly or transitively).
pub type ExplicitReferenceSet = HashMap<ComponentId, HashSet<ComponentId>>;

/// Correlates declared dependency names against a location's graph.
///
/// Each declared name is looked up by exact name; the lockfile-pinned
/// version is authoritative, so no range evaluation happens. Unmatched
/// names are ignored without error. Every node reachable from a matched
/// root is attributed to that root; a node independently reachable from
/// several roots collects all of them. A name installed at several
/// versions anchors deterministically on the smallest, per
/// [`DependencyGraph::find_by_name`].
///
/// # Examples
///
/// ```
/// use lockgraph_core::{ComponentId, DependencyGraph};
/// use lockgraph_npm::correlator::correlate_roots;
///
/// let a = ComponentId::new("a", "1.0.0").unwrap();
/// let b = ComponentId::new("b", "1.0.0").unwrap();
/// let mut graph = DependencyGraph::new();
/// graph.add_edge(a.clone(), b.clone());
///
/// let refs = correlate_roots(&graph, ["a"].into_iter());
/// assert_eq!(refs.len(), 2);
/// assert!(refs[&b].contains(&a));
/// ```
pub fn correlate_roots<'a>(
    graph: &DependencyGraph,
    declared_names: impl Iterator<Item = &'a str>,
) -> ExplicitReferenceSet {
    let mut references: ExplicitReferenceSet = HashMap::new();

    for name in declared_names {
        let Some(root) = graph.find_by_name(name) else {
            tracing::debug!("Declared dependency '{}' not present in lockfile", name);
            continue;
        };
        for reached in graph.reachable_from(root) {
            references.entry(reached).or_default().insert(root.clone());
        }
    }

    references
}
