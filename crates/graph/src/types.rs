use crate::resolver::ExternalResolver;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Package-level declaration tracked by the graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// Identifier (e.g., "Parse", "Reader.Read")
    pub name: String,

    /// File the declaration lives in
    pub file_path: String,

    /// Declared in a test file
    pub is_test: bool,
}

/// Type of reference between two declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
    /// A calls B
    Calls,

    /// A mentions B (type, variable or constant)
    Uses,
}

/// Node in code graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub symbol: Symbol,
}

/// Edge in code graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub relationship: RelationshipType,
}

/// Reference to an identifier declared in another package
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExternalRef {
    pub import_path: String,
    pub id: String,
}

impl ExternalRef {
    pub fn new(import_path: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            id: id.into(),
        }
    }
}

/// Reference graph of one package
pub struct CodeGraph {
    /// Directed graph (referrer -> referenced)
    pub graph: DiGraph<GraphNode, GraphEdge>,

    /// Symbol name -> NodeIndex mapping for fast lookup
    pub symbol_index: HashMap<String, NodeIndex>,

    /// Symbol name -> references leaving the package, sorted
    pub external_refs: BTreeMap<String, Vec<ExternalRef>>,

    /// Resolves external references to snippets; none means nothing resolves
    pub resolver: Option<Arc<dyn ExternalResolver>>,
}

impl CodeGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            symbol_index: HashMap::new(),
            external_refs: BTreeMap::new(),
            resolver: None,
        }
    }

    /// Add node to graph
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        let symbol_name = node.symbol.name.clone();
        let idx = self.graph.add_node(node);
        self.symbol_index.insert(symbol_name, idx);
        idx
    }

    /// Add edge between nodes
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: GraphEdge) {
        self.graph.add_edge(from, to, edge);
    }

    /// Record a reference from `from` to an identifier of another package
    pub fn add_external_ref(&mut self, from: &str, external: ExternalRef) {
        let refs = self.external_refs.entry(from.to_string()).or_default();
        if let Err(pos) = refs.binary_search(&external) {
            refs.insert(pos, external);
        }
    }

    /// Find node by symbol name
    pub fn find_node(&self, symbol_name: &str) -> Option<NodeIndex> {
        self.symbol_index.get(symbol_name).copied()
    }

    /// Get node data
    pub fn get_node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode)> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx).map(|node| (idx, node)))
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of edges of one reference kind
    pub fn edge_count_of(&self, relationship: RelationshipType) -> usize {
        self.graph
            .edge_weights()
            .filter(|edge| edge.relationship == relationship)
            .count()
    }
}

impl Default for CodeGraph {
    fn default() -> Self {
        Self::new()
    }
}
