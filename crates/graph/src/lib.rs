//! # Context Graph
//!
//! Reference graph of a package's declarations, as consumed by the bundle
//! engine.
//!
//! ## Architecture
//!
//! ```text
//! Package (snippets) + extracted references
//!     │
//!     ├──> Graph Builder
//!     │      ├─ One node per declared identifier
//!     │      ├─ Edges: references inside the package (calls, uses)
//!     │      └─ External references (import path, identifier)
//!     │
//!     └──> Code Graph (petgraph)
//!            ├─ Forward / backward neighbors
//!            ├─ Strongly connected components (Tarjan)
//!            ├─ Test-identifier filtering
//!            └─ External resolution (ExternalResolver)
//! ```
//!
//! The bundle engine only sees the [`DependencyGraph`] trait; [`CodeGraph`] is
//! the in-memory implementation.

mod builder;
mod error;
mod graph;
mod resolver;
mod types;

pub use builder::GraphBuilder;
pub use error::{GraphError, Result};
pub use graph::DependencyGraph;
pub use resolver::{ExternalResolver, StaticResolver};
pub use types::{CodeGraph, ExternalRef, GraphEdge, GraphNode, RelationshipType, Symbol};
