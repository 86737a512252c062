use context_graph::GraphError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BundleError>;

#[derive(Error, Debug)]
pub enum BundleError {
    /// The graph knows an identifier the snippet model does not
    #[error("No snippet for identifier {id}")]
    MissingSnippet { id: String },

    #[error("Failed to resolve {import_path}.{id}: {source}")]
    ExternalResolution {
        import_path: String,
        id: String,
        #[source]
        source: GraphError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
