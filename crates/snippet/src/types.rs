use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A source-backed rendering of one or more package-level declarations
///
/// A snippet offers two views: `short` (documentation plus signature) and
/// `full` (the complete declaration). Several identifiers share one snippet
/// when they are declared together, e.g. a `const ( ... )` block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snippet {
    /// File the declaration lives in (base name, used for output banners)
    pub file_name: String,

    /// Byte offset of the declaration inside `file_name`
    pub offset: usize,

    /// Identifiers declared by this snippet, in declaration order
    pub ids: Vec<String>,

    /// Documentation + signature view
    pub short: String,

    /// Complete declaration text
    pub full: String,

    /// Declaration kind
    pub kind: SnippetKind,

    /// Identifiers that carry their own documentation comment
    #[serde(default)]
    pub documented_ids: BTreeSet<String>,

    /// Declared in a test file
    #[serde(default)]
    pub is_test_file: bool,
}

impl Snippet {
    /// Create a snippet declaring `ids` with the given views
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        offset: usize,
        ids: Vec<String>,
        short: impl Into<String>,
        full: impl Into<String>,
        kind: SnippetKind,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            offset,
            ids,
            short: short.into(),
            full: full.into(),
            kind,
            documented_ids: BTreeSet::new(),
            is_test_file: false,
        }
    }

    /// Builder: mark identifiers as directly documented
    #[must_use]
    pub fn documented<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documented_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Builder: mark every declared identifier as documented
    #[must_use]
    pub fn fully_documented(mut self) -> Self {
        self.documented_ids.extend(self.ids.iter().cloned());
        self
    }

    /// Builder: mark snippet as coming from a test file
    #[must_use]
    pub const fn test_file(mut self, is_test_file: bool) -> Self {
        self.is_test_file = is_test_file;
        self
    }

    /// Position key, unique per declaration within a package
    #[must_use]
    pub fn key(&self) -> (&str, usize) {
        (self.file_name.as_str(), self.offset)
    }

    /// True when the snippet declares more than one identifier
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.ids.len() > 1
    }

    /// True when `id` has a documentation comment of its own
    #[must_use]
    pub fn has_direct_doc(&self, id: &str) -> bool {
        self.documented_ids.contains(id)
    }

    /// True for a `const` block carrying a block-level comment
    #[must_use]
    pub const fn has_const_block_doc(&self) -> bool {
        matches!(
            self.kind,
            SnippetKind::Value {
                is_const: true,
                block_doc: true
            }
        )
    }

    /// Text for the requested view
    #[must_use]
    pub fn text(&self, full: bool) -> &str {
        if full {
            &self.full
        } else {
            &self.short
        }
    }
}

/// Kind of declaration a snippet renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetKind {
    /// Function or method
    Func,
    /// Type declaration
    Type,
    /// `var` or `const` declaration, possibly a block
    Value {
        is_const: bool,
        /// The block has a comment of its own, above its opening line
        block_doc: bool,
    },
    /// Package documentation
    PackageDoc,
}

impl SnippetKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Func => "func",
            Self::Type => "type",
            Self::Value { is_const: true, .. } => "const",
            Self::Value { is_const: false, .. } => "var",
            Self::PackageDoc => "package",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn const_block(block_doc: bool) -> Snippet {
        Snippet::new(
            "consts.go",
            10,
            vec!["A".to_string(), "B".to_string()],
            "const (\n\tA = 1\n\tB = 2\n)",
            "const (\n\tA = 1\n\tB = 2\n)",
            SnippetKind::Value {
                is_const: true,
                block_doc,
            },
        )
    }

    #[test]
    fn test_block_detection() {
        assert!(const_block(false).is_block());

        let single = Snippet::new(
            "a.go",
            0,
            vec!["F".to_string()],
            "func F()",
            "func F() {}",
            SnippetKind::Func,
        );
        assert!(!single.is_block());
    }

    #[test]
    fn test_const_block_doc() {
        assert!(const_block(true).has_const_block_doc());
        assert!(!const_block(false).has_const_block_doc());

        let var_block = Snippet::new(
            "vars.go",
            0,
            vec!["x".to_string(), "y".to_string()],
            "var (x, y int)",
            "var (x, y int)",
            SnippetKind::Value {
                is_const: false,
                block_doc: true,
            },
        );
        assert!(!var_block.has_const_block_doc());
    }

    #[test]
    fn test_documentation_builders() {
        let snippet = const_block(false).documented(["A"]);
        assert!(snippet.has_direct_doc("A"));
        assert!(!snippet.has_direct_doc("B"));

        let snippet = const_block(false).fully_documented();
        assert!(snippet.has_direct_doc("A"));
        assert!(snippet.has_direct_doc("B"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SnippetKind::Func.as_str(), "func");
        assert_eq!(
            SnippetKind::Value {
                is_const: false,
                block_doc: false
            }
            .as_str(),
            "var"
        );
    }
}
