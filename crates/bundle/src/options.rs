use crate::error::{BundleError, Result};
use context_snippet::{is_ambiguous_identifier, is_test_function, Snippet, SnippetKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// When an identifier counts as documented
///
/// Direct documentation always counts; the flags below treat further
/// identifiers as documented even though they carry no comment of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentationPolicy {
    /// Blank and `init` declarations
    pub ambiguous_documented: bool,

    /// Test harness functions in test files
    pub test_functions_documented: bool,

    /// A `const` block's own comment documents every constant in it
    pub const_block_docs: bool,
}

impl Default for DocumentationPolicy {
    fn default() -> Self {
        Self {
            ambiguous_documented: true,
            test_functions_documented: true,
            const_block_docs: true,
        }
    }
}

impl DocumentationPolicy {
    /// Only direct documentation counts
    pub const STRICT: Self = Self {
        ambiguous_documented: false,
        test_functions_documented: false,
        const_block_docs: false,
    };

    pub fn is_documented(&self, id: &str, snippet: &Snippet) -> bool {
        if snippet.has_direct_doc(id) {
            return true;
        }
        if self.ambiguous_documented && is_ambiguous_identifier(id) {
            return true;
        }
        if self.test_functions_documented
            && snippet.is_test_file
            && snippet.kind == SnippetKind::Func
            && is_test_function(id)
        {
            return true;
        }
        self.const_block_docs && snippet.has_const_block_doc()
    }
}

/// Grouping run configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupOptions {
    /// Drop identifiers declared in test files before grouping
    pub exclude_tests: bool,

    /// Add a group for the package identifier (package docs)
    pub include_package_docs: bool,

    /// Attach groups for identifiers of other packages
    pub include_external_deps: bool,

    pub documentation: DocumentationPolicy,
}

impl GroupOptions {
    /// Parse options from JSON, falling back to TOML
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match serde_json::from_slice(bytes) {
            Ok(options) => Ok(options),
            Err(json_err) => {
                let utf8 = std::str::from_utf8(bytes)
                    .map_err(|err| BundleError::InvalidConfig(format!("{json_err}; {err}")))?;
                toml::from_str(utf8).map_err(|toml_err| {
                    BundleError::InvalidConfig(format!(
                        "options are not valid JSON ({json_err}) or TOML ({toml_err})"
                    ))
                })
            }
        }
    }

    /// Read options from a JSON or TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        log::debug!("Loading group options from {}", path.display());
        Self::from_bytes(&bytes)
    }
}
