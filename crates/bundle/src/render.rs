use crate::context::{Context, TextMode};
use context_snippet::Snippet;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Banner opening the section of identifiers from other packages
pub const EXTERNAL_SECTION_BANNER: &str = "// Dependencies from other packages:";

impl Context {
    /// Render the bundle.
    ///
    /// Snippets are ordered by file name, then position; each file gets a
    /// `// <file>:` banner. Abbreviated views of the explicit groups'
    /// dependencies in other packages follow in a trailing section.
    pub fn code(&self) -> String {
        let mut snippets: BTreeMap<(&str, usize), (&Arc<Snippet>, TextMode)> = BTreeMap::new();
        for (&id, &mode) in &self.included {
            let group = self.groups.get(id);
            if group.is_external() {
                continue;
            }
            for snippet in group.distinct_snippets() {
                snippets
                    .entry(snippet.key())
                    .and_modify(|entry| entry.1 = entry.1.max(mode))
                    .or_insert((snippet, mode));
            }
        }

        let mut out = String::new();
        let mut current_file: Option<&str> = None;
        for (snippet, mode) in snippets.into_values() {
            if current_file != Some(snippet.file_name.as_str()) {
                current_file = Some(snippet.file_name.as_str());
                if !snippet.file_name.is_empty() {
                    push_section(&mut out, &format!("// {}:", snippet.file_name));
                }
            }
            push_section(&mut out, snippet.text(mode == TextMode::Full));
        }

        let external = self.external_snippets();
        if !external.is_empty() {
            push_section(&mut out, EXTERNAL_SECTION_BANNER);
            let mut current_path: Option<&str> = None;
            for ((import_path, _), snippet) in external {
                if current_path != Some(import_path) {
                    current_path = Some(import_path);
                    push_section(&mut out, &format!("// {import_path}:"));
                }
                push_section(&mut out, &snippet.short);
            }
        }

        let trimmed = out.trim_end_matches('\n').len();
        out.truncate(trimmed);
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    /// External dependencies of explicit groups, keyed by (import path, id)
    fn external_snippets(&self) -> BTreeMap<(&str, &str), &Arc<Snippet>> {
        let mut external = BTreeMap::new();
        for &group in &self.original {
            for dep in self.direct_deps(group) {
                let dep = self.groups.get(dep);
                let Some(import_path) = dep.external_import_path.as_deref() else {
                    continue;
                };
                let lead = dep.lead_id();
                external.insert((import_path, lead), dep.snippet_for(lead));
            }
        }
        external
    }
}

fn push_section(out: &mut String, text: &str) {
    out.push_str(text.trim_end_matches('\n'));
    out.push_str("\n\n");
}
