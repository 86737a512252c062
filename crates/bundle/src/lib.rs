//! # Context Bundle
//!
//! Decides which declarations must accompany a set of requested identifiers
//! so a model can understand them, and keeps the result under a token budget.
//!
//! ## Pipeline
//!
//! ```text
//! DependencyGraph + SnippetSource
//!     │
//!     ├──> Group Builder
//!     │      ├─ Drop test identifiers (optional)
//!     │      ├─ Strongly connected components -> one group each
//!     │      ├─ Block declarations -> one group each
//!     │      ├─ Token costs, documentation, test flags
//!     │      ├─ Direct / used-by edges (acyclic)
//!     │      └─ Package group, external groups (optional)
//!     │
//!     ├──> Context
//!     │      ├─ Explicit groups + users: full text
//!     │      ├─ Dependencies: abbreviated when documented, else full
//!     │      ├─ Cost, free groups, rendering
//!     │      └─ Pruning toward a budget
//!     │
//!     └──> Partition
//!            └─ Greedy cover of target identifiers with few contexts
//! ```
//!
//! ## Example
//!
//! ```rust
//! use context_bundle::{group_identifiers, Context, GroupOptions};
//! use context_graph::GraphBuilder;
//! use context_snippet::{Package, Snippet, SnippetKind};
//! use std::sync::Arc;
//!
//! let mut pkg = Package::new("demo", "example.com/demo");
//! pkg.add_snippet(Snippet::new(
//!     "demo.go", 0, vec!["Run".to_string()],
//!     "func Run()", "func Run() { helper() }", SnippetKind::Func,
//! )).unwrap();
//! pkg.add_snippet(Snippet::new(
//!     "demo.go", 40, vec!["helper".to_string()],
//!     "// helper does the work.\nfunc helper()",
//!     "// helper does the work.\nfunc helper() {}", SnippetKind::Func,
//! ).fully_documented()).unwrap();
//!
//! let graph = GraphBuilder::new().calls("Run", "helper").build(&pkg).unwrap();
//! let groups = Arc::new(group_identifiers(&graph, &pkg, GroupOptions::default()).unwrap());
//!
//! let run = groups.group_of("Run").unwrap();
//! let context = Context::new(Arc::clone(&groups), [run]);
//! assert!(context.code().contains("func helper()\n"));
//! ```

mod builder;
mod context;
mod error;
mod group;
mod options;
mod partition;
mod prune;
mod render;

pub use builder::{group_identifiers, GroupBuilder};
pub use context::{Context, ContextSummary, TextMode};
pub use error::{BundleError, Result};
pub use group::{GroupId, GroupSet, IdentifierGroup};
pub use options::{DocumentationPolicy, GroupOptions};
pub use partition::{partition, Coverage};
pub use prune::MIN_RETAINED_USERS;
pub use render::EXTERNAL_SECTION_BANNER;
