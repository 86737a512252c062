use crate::error::{GraphError, Result};
use crate::types::ExternalRef;
use context_snippet::{Package, Snippet, SnippetSource};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves identifiers of other packages to their snippets
pub trait ExternalResolver: Send + Sync {
    /// Snippet for `external`.
    ///
    /// Returns [`GraphError::ModuleUnavailable`] when the module containing
    /// the package is not available locally.
    fn resolve(&self, external: &ExternalRef) -> Result<Arc<Snippet>>;
}

/// Fixed table of already-loaded packages, keyed by import path
#[derive(Debug, Default)]
pub struct StaticResolver {
    packages: HashMap<String, Package>,
    broken: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loaded package under its import path
    pub fn add_package(&mut self, package: Package) {
        self.packages
            .insert(package.import_path().to_string(), package);
    }

    /// Register a module that exists but fails to load
    pub fn add_broken_module(&mut self, import_path: impl Into<String>, reason: impl Into<String>) {
        self.broken.insert(import_path.into(), reason.into());
    }
}

impl ExternalResolver for StaticResolver {
    fn resolve(&self, external: &ExternalRef) -> Result<Arc<Snippet>> {
        if let Some(reason) = self.broken.get(&external.import_path) {
            return Err(GraphError::Resolve {
                import_path: external.import_path.clone(),
                reason: reason.clone(),
            });
        }

        let package = self
            .packages
            .get(&external.import_path)
            .ok_or_else(|| GraphError::ModuleUnavailable {
                import_path: external.import_path.clone(),
            })?;

        package
            .snippet_for(&external.id)
            .ok_or_else(|| GraphError::ExternalNotFound {
                import_path: external.import_path.clone(),
                id: external.id.clone(),
            })
    }
}
