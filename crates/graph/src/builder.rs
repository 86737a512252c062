use crate::error::{GraphError, Result};
use crate::resolver::ExternalResolver;
use crate::types::{CodeGraph, ExternalRef, GraphEdge, GraphNode, RelationshipType, Symbol};
use context_snippet::{Package, SnippetSource};
use std::sync::Arc;

/// Build a package's reference graph from its snippets plus the references a
/// front end extracted
#[derive(Default)]
pub struct GraphBuilder {
    references: Vec<(String, String, RelationshipType)>,
    external: Vec<(String, ExternalRef)>,
    resolver: Option<Arc<dyn ExternalResolver>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `from` calls `to`
    #[must_use]
    pub fn calls(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.references
            .push((from.into(), to.into(), RelationshipType::Calls));
        self
    }

    /// `from` mentions `to` (type, variable or constant)
    #[must_use]
    pub fn uses(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.references
            .push((from.into(), to.into(), RelationshipType::Uses));
        self
    }

    /// `from` references `id` of the package at `import_path`
    #[must_use]
    pub fn external(
        mut self,
        from: impl Into<String>,
        import_path: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        self.external
            .push((from.into(), ExternalRef::new(import_path, id)));
        self
    }

    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn ExternalResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Build graph over every identifier `package` declares
    pub fn build(&self, package: &Package) -> Result<CodeGraph> {
        let mut graph = CodeGraph::new();
        graph.resolver = self.resolver.clone();

        // Phase 1: one node per declared identifier
        for id in package.identifiers() {
            let snippet = package
                .snippet_for(id)
                .ok_or_else(|| GraphError::BuildError(format!("no snippet for {id}")))?;
            graph.add_node(GraphNode {
                symbol: Symbol {
                    name: id.to_string(),
                    file_path: snippet.file_name.clone(),
                    is_test: snippet.is_test_file,
                },
            });
        }

        // Phase 2: references inside the package
        for (from, to, relationship) in &self.references {
            let from_idx = graph
                .find_node(from)
                .ok_or_else(|| GraphError::NodeNotFound(from.clone()))?;
            let to_idx = graph
                .find_node(to)
                .ok_or_else(|| GraphError::NodeNotFound(to.clone()))?;
            graph.add_edge(
                from_idx,
                to_idx,
                GraphEdge {
                    relationship: *relationship,
                },
            );
        }

        // Phase 3: references leaving the package
        for (from, external) in &self.external {
            if graph.find_node(from).is_none() {
                return Err(GraphError::NodeNotFound(from.clone()));
            }
            graph.add_external_ref(from, external.clone());
        }

        log::info!(
            "Built code graph for {}: {} nodes, {} calls, {} uses, {} external references",
            package.import_path(),
            graph.node_count(),
            graph.edge_count_of(RelationshipType::Calls),
            graph.edge_count_of(RelationshipType::Uses),
            self.external.len()
        );

        Ok(graph)
    }
}
