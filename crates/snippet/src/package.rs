use crate::error::{Result, SnippetError};
use crate::types::Snippet;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-identifier snippet lookup for one package
pub trait SnippetSource {
    /// Snippet declaring `id`, shared by every id of a block declaration
    fn snippet_for(&self, id: &str) -> Option<Arc<Snippet>>;

    /// Package documentation snippet, if the package has one
    fn package_doc(&self) -> Option<Arc<Snippet>>;

    /// Package name as written in the package clause
    fn package_name(&self) -> &str;

    /// Import path of the package
    fn import_path(&self) -> &str;

    /// True for an external test package (`foo_test`)
    fn is_test_package(&self) -> bool;
}

/// In-memory package: the snippets a front end produced for one package
#[derive(Debug, Clone, Default)]
pub struct Package {
    name: String,
    import_path: String,
    is_test_package: bool,
    package_doc: Option<Arc<Snippet>>,
    snippets: BTreeMap<String, Arc<Snippet>>,
}

impl Package {
    pub fn new(name: impl Into<String>, import_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            import_path: import_path.into(),
            ..Default::default()
        }
    }

    /// Builder: mark as an external test package
    #[must_use]
    pub const fn test_package(mut self, is_test_package: bool) -> Self {
        self.is_test_package = is_test_package;
        self
    }

    /// Set the package documentation snippet
    pub fn set_package_doc(&mut self, snippet: Snippet) {
        self.package_doc = Some(Arc::new(snippet));
    }

    /// Index a snippet under every identifier it declares
    pub fn add_snippet(&mut self, snippet: Snippet) -> Result<Arc<Snippet>> {
        if snippet.ids.is_empty() {
            return Err(SnippetError::EmptySnippet(format!(
                "{}:{}",
                snippet.file_name, snippet.offset
            )));
        }

        if let Some((id, existing)) = snippet
            .ids
            .iter()
            .find_map(|id| self.snippets.get(id).map(|existing| (id, existing)))
        {
            return Err(SnippetError::DuplicateIdentifier {
                id: id.clone(),
                first: format!("{}:{}", existing.file_name, existing.offset),
                second: format!("{}:{}", snippet.file_name, snippet.offset),
            });
        }

        let snippet = Arc::new(snippet);
        for id in &snippet.ids {
            self.snippets.insert(id.clone(), Arc::clone(&snippet));
        }
        log::trace!(
            "{}: indexed {} {} at {}:{}",
            self.import_path,
            snippet.kind.as_str(),
            snippet.ids.join(", "),
            snippet.file_name,
            snippet.offset
        );
        Ok(snippet)
    }

    /// All declared identifiers, sorted
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.snippets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

impl SnippetSource for Package {
    fn snippet_for(&self, id: &str) -> Option<Arc<Snippet>> {
        self.snippets.get(id).cloned()
    }

    fn package_doc(&self) -> Option<Arc<Snippet>> {
        self.package_doc.clone()
    }

    fn package_name(&self) -> &str {
        &self.name
    }

    fn import_path(&self) -> &str {
        &self.import_path
    }

    fn is_test_package(&self) -> bool {
        self.is_test_package
    }
}
