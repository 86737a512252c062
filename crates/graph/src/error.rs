use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Graph build error: {0}")]
    BuildError(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The module providing `import_path` is not available locally
    #[error("Module for {import_path} is not available")]
    ModuleUnavailable { import_path: String },

    #[error("Identifier {id} not found in {import_path}")]
    ExternalNotFound { import_path: String, id: String },

    #[error("Failed to load {import_path}: {reason}")]
    Resolve { import_path: String, reason: String },
}

impl GraphError {
    /// True when the external module simply is not present locally
    pub const fn is_module_unavailable(&self) -> bool {
        matches!(self, Self::ModuleUnavailable { .. })
    }
}
