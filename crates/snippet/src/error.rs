use thiserror::Error;

/// Result type for snippet model operations
pub type Result<T> = std::result::Result<T, SnippetError>;

/// Errors raised while assembling a package's snippets
#[derive(Error, Debug)]
pub enum SnippetError {
    /// Two snippets declare the same identifier
    #[error("Identifier {id} declared twice ({first} and {second})")]
    DuplicateIdentifier {
        id: String,
        first: String,
        second: String,
    },

    /// A snippet declares no identifiers
    #[error("Snippet at {0} declares no identifiers")]
    EmptySnippet(String),
}
