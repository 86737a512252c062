use crate::error::{GraphError, Result};
use crate::types::{CodeGraph, ExternalRef, GraphEdge, GraphNode};
use context_snippet::Snippet;
use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Reference graph capability consumed by the bundle engine.
///
/// Every sequence is returned in lexicographic order so that downstream
/// output is deterministic.
pub trait DependencyGraph {
    /// Every identifier declared in the package
    fn all_identifiers(&self) -> Vec<String>;

    /// Identifiers `id` references (forward edges)
    fn identifiers_from(&self, id: &str) -> Vec<String>;

    /// Identifiers referencing `id` (backward edges)
    fn identifiers_to(&self, id: &str) -> Vec<String>;

    /// Strongly connected components, members sorted, ordered by lead id
    fn strongly_connected_components(&self) -> Vec<Vec<String>>;

    /// References from `id` to identifiers of other packages
    fn external_identifiers_from(&self, id: &str) -> Vec<ExternalRef>;

    /// Snippet for an identifier of another package
    fn resolve_external(&self, external: &ExternalRef) -> Result<Arc<Snippet>>;

    /// Copy of the graph without identifiers declared in test files
    fn without_test_identifiers(&self) -> Self
    where
        Self: Sized;
}

impl CodeGraph {
    /// Distinct neighbor names in one direction, sorted
    fn neighbor_names(&self, id: &str, direction: Direction) -> Vec<String> {
        let Some(node) = self.find_node(id) else {
            return Vec::new();
        };

        self.graph
            .neighbors_directed(node, direction)
            .filter(|&other| other != node)
            .filter_map(|other| self.get_node(other))
            .map(|n| n.symbol.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn name_of(&self, idx: NodeIndex) -> Option<&str> {
        self.get_node(idx).map(|n| n.symbol.name.as_str())
    }
}

impl DependencyGraph for CodeGraph {
    fn all_identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.nodes().map(|(_, n)| n.symbol.name.clone()).collect();
        ids.sort_unstable();
        ids
    }

    fn identifiers_from(&self, id: &str) -> Vec<String> {
        self.neighbor_names(id, Direction::Outgoing)
    }

    fn identifiers_to(&self, id: &str) -> Vec<String> {
        self.neighbor_names(id, Direction::Incoming)
    }

    fn strongly_connected_components(&self) -> Vec<Vec<String>> {
        let mut components: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .filter_map(|idx| self.name_of(idx).map(str::to_string))
                    .collect();
                names.sort_unstable();
                names
            })
            .filter(|names| !names.is_empty())
            .collect();

        components.sort_unstable();
        components
    }

    fn external_identifiers_from(&self, id: &str) -> Vec<ExternalRef> {
        self.external_refs.get(id).cloned().unwrap_or_default()
    }

    fn resolve_external(&self, external: &ExternalRef) -> Result<Arc<Snippet>> {
        match &self.resolver {
            Some(resolver) => resolver.resolve(external),
            None => Err(GraphError::ModuleUnavailable {
                import_path: external.import_path.clone(),
            }),
        }
    }

    fn without_test_identifiers(&self) -> Self {
        let mut filtered = Self::new();
        filtered.resolver = self.resolver.clone();

        let mut remap: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        for (idx, node) in self.nodes() {
            if node.symbol.is_test {
                log::trace!(
                    "Dropping test identifier {} ({})",
                    node.symbol.name,
                    node.symbol.file_path
                );
                continue;
            }
            let new_idx = filtered.add_node(GraphNode {
                symbol: node.symbol.clone(),
            });
            remap.insert(idx, new_idx);

            if let Some(refs) = self.external_refs.get(&node.symbol.name) {
                filtered
                    .external_refs
                    .insert(node.symbol.name.clone(), refs.clone());
            }
        }

        for edge in self.graph.raw_edges() {
            if let (Some(&from), Some(&to)) = (remap.get(&edge.source()), remap.get(&edge.target()))
            {
                filtered.add_edge(
                    from,
                    to,
                    GraphEdge {
                        relationship: edge.weight.relationship,
                    },
                );
            }
        }

        log::debug!(
            "Dropped {} test identifiers from graph",
            self.node_count() - filtered.node_count()
        );

        filtered
    }
}
