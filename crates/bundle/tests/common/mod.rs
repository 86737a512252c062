#![allow(dead_code)]

use context_snippet::{Snippet, SnippetKind};

pub fn names(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Undocumented function
pub fn func(file: &str, offset: usize, name: &str, body: &str) -> Snippet {
    Snippet::new(
        file,
        offset,
        vec![name.to_string()],
        format!("func {name}()"),
        format!("func {name}() {{{body}}}"),
        SnippetKind::Func,
    )
}

/// Function with a doc comment
pub fn doc_func(file: &str, offset: usize, name: &str, body: &str) -> Snippet {
    Snippet::new(
        file,
        offset,
        vec![name.to_string()],
        format!("// {name} is documented.\nfunc {name}()"),
        format!("// {name} is documented.\nfunc {name}() {{{body}}}"),
        SnippetKind::Func,
    )
    .fully_documented()
}

/// `const ( ... )` block declaring `ids`
pub fn const_block(file: &str, offset: usize, ids: &[&str], block_doc: bool) -> Snippet {
    let body: String = ids
        .iter()
        .enumerate()
        .map(|(i, id)| format!("\t{id} = {i}\n"))
        .collect();
    let text = format!("const (\n{body})");
    Snippet::new(
        file,
        offset,
        names(ids),
        text.clone(),
        text,
        SnippetKind::Value {
            is_const: true,
            block_doc,
        },
    )
}

/// Snippet whose views are exactly `full` and `short` bytes long, for use
/// with a byte-length token counter
pub fn sized(name: &str, offset: usize, full: usize, short: usize) -> Snippet {
    Snippet::new(
        "sized.go",
        offset,
        vec![name.to_string()],
        "s".repeat(short),
        "f".repeat(full),
        SnippetKind::Func,
    )
}

pub fn byte_len(text: &str) -> usize {
    text.len()
}
