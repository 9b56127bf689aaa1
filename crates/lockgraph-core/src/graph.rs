//! Per-location dependency graph.
//!
//! One graph exists per lockfile location. Nodes are component identities,
//! adjacency is a set of identities, so inserting the same edge twice is a
//! no-op. Lockfile dependency sets legally contain cycles (A requires B,
//! B requires A), so reachability uses an explicit worklist and visited set
//! rather than recursion.

use crate::component::ComponentId;
use std::collections::{HashMap, HashSet};

/// Directed dependency graph keyed by component identity.
///
/// # Examples
///
/// ```
/// use lockgraph_core::component::ComponentId;
/// use lockgraph_core::graph::DependencyGraph;
///
/// let a = ComponentId::new("a", "1.0.0").unwrap();
/// let b = ComponentId::new("b", "2.0.0").unwrap();
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge(a.clone(), b.clone());
/// graph.add_edge(a.clone(), b.clone()); // duplicate, ignored
///
/// assert_eq!(graph.dependencies_of(&a).len(), 1);
/// assert!(graph.dependencies_of(&b).is_empty());
/// assert_eq!(graph.len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// Map from component identity to the set of identities it depends on.
    nodes: HashMap<ComponentId, HashSet<ComponentId>>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Registers a node. Idempotent; existing adjacency is kept.
    pub fn add_node(&mut self, id: ComponentId) {
        self.nodes.entry(id).or_default();
    }

    /// Records a dependency edge from `parent` to `child`.
    ///
    /// Both endpoints are created if absent. Recording an existing edge is
    /// a no-op, regardless of how many times the source text declared it.
    pub fn add_edge(&mut self, parent: ComponentId, child: ComponentId) {
        self.nodes.entry(child.clone()).or_default();
        self.nodes.entry(parent).or_default().insert(child);
    }

    /// Returns the direct dependencies of a component.
    ///
    /// Empty for leaves and for identities the graph has never seen.
    pub fn dependencies_of(&self, id: &ComponentId) -> HashSet<ComponentId> {
        self.nodes.get(id).cloned().unwrap_or_default()
    }

    /// Returns true if the identity is a node in this graph.
    pub fn contains(&self, id: &ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterates over all node identities.
    pub fn all_nodes(&self) -> impl Iterator<Item = &ComponentId> {
        self.nodes.keys()
    }

    /// Finds a node by bare package name.
    ///
    /// Lockfiles pin exact versions, so root correlation only needs the
    /// name; the pinned version is authoritative. When duplicate installs
    /// put the same name in the graph at several versions, identities
    /// order by (name, version) and the smallest wins, so identical
    /// inputs always anchor on the same install.
    pub fn find_by_name(&self, name: &str) -> Option<&ComponentId> {
        self.nodes.keys().filter(|id| id.name == name).min()
    }

    /// Computes every node reachable from `start`, including `start`
    /// itself when it is a node of this graph.
    ///
    /// Iterative walk with an explicit stack and visited set: cycles
    /// terminate, and every node on a cycle reachable from the start is
    /// included exactly once.
    pub fn reachable_from(&self, start: &ComponentId) -> HashSet<ComponentId> {
        let mut visited = HashSet::new();
        if !self.nodes.contains_key(start) {
            return visited;
        }

        let mut stack = vec![start.clone()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(children) = self.nodes.get(&current) {
                for child in children {
                    if !visited.contains(child) {
                        stack.push(child.clone());
                    }
                }
            }
        }
        visited
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ComponentId {
        ComponentId::new(name, "1.0.0").unwrap()
    }

    #[test]
    fn test_add_node_idempotent() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(id("a"), id("b"));
        graph.add_node(id("a"));

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.dependencies_of(&id("a")).len(), 1);
    }

    #[test]
    fn test_add_edge_idempotent() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(id("a"), id("b"));
        graph.add_edge(id("a"), id("b"));

        assert_eq!(graph.dependencies_of(&id("a")).len(), 1);
    }

    #[test]
    fn test_edge_creates_endpoints() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(id("a"), id("b"));

        assert!(graph.contains(&id("a")));
        assert!(graph.contains(&id("b")));
        assert_eq!(graph.all_nodes().count(), 2);
    }

    #[test]
    fn test_dependencies_of_unknown_id() {
        let graph = DependencyGraph::new();
        assert!(graph.dependencies_of(&id("ghost")).is_empty());
    }

    #[test]
    fn test_chain_shape() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(id("x"), id("y"));
        graph.add_edge(id("y"), id("z"));

        assert_eq!(graph.dependencies_of(&id("x")), [id("y")].into());
        assert_eq!(graph.dependencies_of(&id("y")), [id("z")].into());
        assert!(graph.dependencies_of(&id("z")).is_empty());
    }

    #[test]
    fn test_reachable_includes_start() {
        let mut graph = DependencyGraph::new();
        graph.add_node(id("solo"));

        let reached = graph.reachable_from(&id("solo"));
        assert_eq!(reached, [id("solo")].into());
    }

    #[test]
    fn test_reachable_from_unknown_is_empty() {
        let graph = DependencyGraph::new();
        assert!(graph.reachable_from(&id("missing")).is_empty());
    }

    #[test]
    fn test_reachable_terminates_on_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(id("a"), id("b"));
        graph.add_edge(id("b"), id("a"));

        let from_a = graph.reachable_from(&id("a"));
        let from_b = graph.reachable_from(&id("b"));
        assert_eq!(from_a, [id("a"), id("b")].into());
        assert_eq!(from_a, from_b);
    }

    #[test]
    fn test_self_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(id("a"), id("a"));

        assert_eq!(graph.reachable_from(&id("a")), [id("a")].into());
    }

    #[test]
    fn test_find_by_name() {
        let mut graph = DependencyGraph::new();
        graph.add_node(ComponentId::new("express", "4.18.2").unwrap());

        let found = graph.find_by_name("express").unwrap();
        assert_eq!(found.version, "4.18.2");
        assert!(graph.find_by_name("koa").is_none());
    }

    #[test]
    fn test_find_by_name_stable_across_rebuilds() {
        // Duplicate installs put the same name in the graph at several
        // versions; the chosen anchor must not depend on hash iteration
        // order, so identically built graphs agree every time.
        let versions = ["6.0.0", "2.0.0", "4.0.0", "1.0.0", "5.0.0", "3.0.0"];

        let mut seen = HashSet::new();
        for _ in 0..64 {
            let mut graph = DependencyGraph::new();
            for version in versions {
                graph.add_node(ComponentId::new("dup", version).unwrap());
            }
            seen.insert(graph.find_by_name("dup").unwrap().clone());
        }

        assert_eq!(seen.len(), 1);
        assert_eq!(seen.iter().next().unwrap().version, "1.0.0");
    }

    #[test]
    fn test_diamond_reachability() {
        // a -> b -> d, a -> c -> d
        let mut graph = DependencyGraph::new();
        graph.add_edge(id("a"), id("b"));
        graph.add_edge(id("a"), id("c"));
        graph.add_edge(id("b"), id("d"));
        graph.add_edge(id("c"), id("d"));

        let reached = graph.reachable_from(&id("a"));
        assert_eq!(reached.len(), 4);
    }
}
