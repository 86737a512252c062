mod common;

use anyhow::Result;
use common::{byte_len, doc_func, func, names, sized};
use context_bundle::{
    group_identifiers, Context, GroupBuilder, GroupOptions, GroupSet, TextMode,
    EXTERNAL_SECTION_BANNER,
};
use context_graph::{GraphBuilder, StaticResolver};
use context_snippet::{Package, Snippet, SnippetKind};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;

#[test]
fn documented_dependency_is_abbreviated() -> Result<()> {
    let mut pkg = Package::new("demo", "example.com/demo");
    pkg.add_snippet(func("a.go", 0, "A", "B()"))?;
    pkg.add_snippet(doc_func("a.go", 20, "B", "return 42"))?;
    let graph = GraphBuilder::new().calls("A", "B").build(&pkg)?;
    let set = Arc::new(group_identifiers(&graph, &pkg, GroupOptions::default())?);

    let a = set.group_of("A").unwrap();
    let b = set.group_of("B").unwrap();
    let context = Context::new(Arc::clone(&set), [a]);

    assert_eq!(context.text_mode(a), Some(TextMode::Full));
    assert_eq!(context.text_mode(b), Some(TextMode::Abbreviated));

    let code = context.code();
    assert!(code.contains("// B is documented.\nfunc B()\n"));
    assert!(!code.contains("return 42"));
    Ok(())
}

#[test]
fn undocumented_dependency_is_shown_in_full() -> Result<()> {
    let mut pkg = Package::new("demo", "example.com/demo");
    pkg.add_snippet(func("a.go", 0, "A", "b()"))?;
    pkg.add_snippet(func("a.go", 20, "b", "return 42"))?;
    let graph = GraphBuilder::new().calls("A", "b").build(&pkg)?;
    let set = Arc::new(group_identifiers(&graph, &pkg, GroupOptions::default())?);

    let context = Context::new(Arc::clone(&set), [set.group_of("A").unwrap()]);
    assert!(context.has_full_bytes(set.group_of("b").unwrap()));
    assert!(context.code().contains("return 42"));
    Ok(())
}

#[test]
fn user_of_variable_comes_for_free() -> Result<()> {
    let mut pkg = Package::new("demo", "example.com/demo");
    pkg.add_snippet(Snippet::new(
        "v.go",
        0,
        names(&["v"]),
        "var v int",
        "var v int",
        SnippetKind::Value {
            is_const: false,
            block_doc: false,
        },
    ))?;
    pkg.add_snippet(func("v.go", 20, "UseV", "v++"))?;
    let graph = GraphBuilder::new().uses("UseV", "v").build(&pkg)?;
    let set = Arc::new(group_identifiers(&graph, &pkg, GroupOptions::default())?);

    let v = set.group_of("v").unwrap();
    let use_v = set.group_of("UseV").unwrap();
    let mut context = Context::new(Arc::clone(&set), [v]);

    assert_eq!(context.groups_for_free(), vec![use_v]);
    assert_eq!(context.identifiers_for_free(), names(&["UseV"]));
    assert_eq!(context.additional_cost_for_group(use_v), 0);

    let before = context.cost();
    context.add_group(use_v);
    assert_eq!(context.cost(), before);
    assert_eq!(context.added_identifiers(), names(&["v", "UseV"]));
    assert!(context.groups_for_free().is_empty());
    Ok(())
}

#[test]
fn renders_files_then_external_section() -> Result<()> {
    let mut fmt = Package::new("fmt", "fmt");
    fmt.add_snippet(doc_func("print.go", 0, "Println", "..."))?;
    let mut resolver = StaticResolver::new();
    resolver.add_package(fmt);

    let mut pkg = Package::new("app", "example.com/app");
    pkg.add_snippet(func("a.go", 0, "Run", "helper()"))?;
    pkg.add_snippet(doc_func("a.go", 30, "helper", ""))?;
    pkg.add_snippet(func("b.go", 0, "caller", "Run()"))?;

    let graph = GraphBuilder::new()
        .calls("Run", "helper")
        .calls("caller", "Run")
        .external("Run", "fmt", "Println")
        .resolver(Arc::new(resolver))
        .build(&pkg)?;
    let options = GroupOptions {
        include_external_deps: true,
        ..GroupOptions::default()
    };
    let set = Arc::new(group_identifiers(&graph, &pkg, options)?);

    let context = Context::new(Arc::clone(&set), [set.group_of("Run").unwrap()]);
    let expected = format!(
        "// a.go:\n\n\
         func Run() {{helper()}}\n\n\
         // helper is documented.\nfunc helper()\n\n\
         // b.go:\n\n\
         func caller() {{Run()}}\n\n\
         {EXTERNAL_SECTION_BANNER}\n\n\
         // fmt:\n\n\
         // Println is documented.\nfunc Println()\n"
    );
    assert_eq!(context.code(), expected);
    Ok(())
}

#[test]
fn external_section_only_lists_explicit_groups_deps() -> Result<()> {
    let mut fmt = Package::new("fmt", "fmt");
    fmt.add_snippet(doc_func("print.go", 0, "Println", "..."))?;
    let mut resolver = StaticResolver::new();
    resolver.add_package(fmt);

    let mut pkg = Package::new("app", "example.com/app");
    pkg.add_snippet(func("a.go", 0, "Run", "log()"))?;
    pkg.add_snippet(doc_func("a.go", 30, "log", "fmt.Println()"))?;
    let graph = GraphBuilder::new()
        .calls("Run", "log")
        .external("log", "fmt", "Println")
        .resolver(Arc::new(resolver))
        .build(&pkg)?;
    let options = GroupOptions {
        include_external_deps: true,
        ..GroupOptions::default()
    };
    let set = Arc::new(group_identifiers(&graph, &pkg, options)?);

    let context = Context::new(Arc::clone(&set), [set.group_of("Run").unwrap()]);
    assert!(!context.code().contains(EXTERNAL_SECTION_BANNER));
    Ok(())
}

#[test]
fn empty_context_renders_nothing() -> Result<()> {
    let set = Arc::new(GroupSet::default());
    let context = Context::new(set, std::iter::empty());
    assert_eq!(context.code(), "");
    assert_eq!(context.cost(), 0);
    Ok(())
}

/// `T` (10 tokens) used by `U1`..`U4` costing 100, 50, 30 and 20 tokens
fn popular_target() -> Result<Arc<GroupSet>> {
    let mut pkg = Package::new("demo", "example.com/demo");
    pkg.add_snippet(sized("T", 0, 10, 1))?;
    let mut graph = GraphBuilder::new();
    for (i, body) in [100, 50, 30, 20].into_iter().enumerate() {
        let user = format!("U{}", i + 1);
        pkg.add_snippet(sized(&user, (i + 1) * 1000, body, 1))?;
        graph = graph.calls(user, "T");
    }
    let graph = graph.build(&pkg)?;

    let set = GroupBuilder::new(GroupOptions::default())
        .token_counter(byte_len)
        .build(&graph, &pkg)?;
    Ok(Arc::new(set))
}

#[test]
fn prune_drops_most_expensive_users_first() -> Result<()> {
    let set = popular_target()?;
    let t = set.group_of("T").unwrap();
    let mut context = Context::new(Arc::clone(&set), [t]);
    assert_eq!(context.cost(), 210);

    assert!(context.prune(100));
    assert_eq!(context.cost(), 60);
    assert_eq!(context.text_mode(set.group_of("U1").unwrap()), None);
    assert_eq!(context.text_mode(set.group_of("U2").unwrap()), None);
    assert_eq!(context.used_by_deps(t).count(), 2);
    Ok(())
}

#[test]
fn prune_keeps_minimum_users() -> Result<()> {
    let set = popular_target()?;
    let t = set.group_of("T").unwrap();
    let mut context = Context::new(Arc::clone(&set), [t]);

    assert!(!context.prune(30));
    assert_eq!(context.cost(), 60);
    assert_eq!(context.used_by_deps(t).count(), 2);
    assert!(context.has_full_bytes(set.group_of("U3").unwrap()));
    assert!(context.has_full_bytes(set.group_of("U4").unwrap()));
    Ok(())
}

#[test]
fn prune_within_budget_is_a_no_op() -> Result<()> {
    let set = popular_target()?;
    let mut context = Context::new(Arc::clone(&set), [set.group_of("T").unwrap()]);
    assert!(context.prune(500));
    assert_eq!(context.cost(), 210);
    Ok(())
}

#[test]
fn pruning_does_not_leak_between_contexts() -> Result<()> {
    let set = popular_target()?;
    let t = set.group_of("T").unwrap();
    let mut pruned = Context::new(Arc::clone(&set), [t]);
    let untouched = Context::new(Arc::clone(&set), [t]);

    assert!(pruned.prune(100));
    assert_eq!(untouched.cost(), 210);
    assert_eq!(untouched.used_by_deps(t).count(), 4);
    assert_eq!(set.get(t).used_by_deps.len(), 4);

    // Contexts created after pruning see every edge too
    let fresh = Context::new(Arc::clone(&set), [t]);
    assert_eq!(fresh.cost(), 210);
    Ok(())
}

#[test]
fn package_context_prunes_unexported_deps() -> Result<()> {
    let mut pkg = Package::new("demo", "example.com/demo");
    pkg.add_snippet(sized("Run", 0, 50, 5))?;
    pkg.add_snippet(sized("helper", 100, 60, 6))?;
    let graph = GraphBuilder::new().build(&pkg)?;

    let options = GroupOptions {
        include_package_docs: true,
        ..GroupOptions::default()
    };
    let set = Arc::new(
        GroupBuilder::new(options)
            .token_counter(byte_len)
            .build(&graph, &pkg)?,
    );
    let package = set.package_group().unwrap();
    let mut context = Context::new(Arc::clone(&set), [package]);

    // "package demo\n" plus both dependencies in full
    assert_eq!(context.cost(), 13 + 50 + 60);

    assert!(context.prune(80));
    assert_eq!(context.cost(), 13 + 50);
    assert_eq!(context.text_mode(set.group_of("helper").unwrap()), None);
    assert!(context.has_full_bytes(set.group_of("Run").unwrap()));

    // Exported dependencies stay even when the budget is missed
    let mut tight = Context::new(Arc::clone(&set), [package]);
    assert!(!tight.prune(20));
    assert_eq!(tight.cost(), 13 + 50);
    Ok(())
}

#[test]
fn package_placeholder_renders_without_banner() -> Result<()> {
    let mut pkg = Package::new("demo", "example.com/demo");
    pkg.add_snippet(func("a.go", 0, "Run", ""))?;
    let graph = GraphBuilder::new().build(&pkg)?;
    let options = GroupOptions {
        include_package_docs: true,
        ..GroupOptions::default()
    };
    let set = Arc::new(group_identifiers(&graph, &pkg, options)?);

    let context = Context::new(Arc::clone(&set), [set.package_group().unwrap()]);
    assert_eq!(context.code(), "package demo\n\n// a.go:\n\nfunc Run() {}\n");
    Ok(())
}

#[test]
fn summary_serializes_for_tooling() -> Result<()> {
    let set = popular_target()?;
    let context = Context::new(Arc::clone(&set), [set.group_of("T").unwrap()]);

    let summary = serde_json::to_value(context.summary())?;
    assert_eq!(summary["cost"], 210);
    assert_eq!(summary["full_groups"], 5);
    assert_eq!(summary["added_identifiers"], serde_json::json!(["T"]));
    Ok(())
}

#[test]
fn options_load_from_toml_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
        file,
        "exclude_tests = true\n\n[documentation]\nconst_block_docs = false"
    )?;

    let options = GroupOptions::load(file.path())?;
    assert!(options.exclude_tests);
    assert!(!options.include_external_deps);
    assert!(!options.documentation.const_block_docs);
    assert!(options.documentation.ambiguous_documented);
    Ok(())
}

#[test]
fn options_load_from_json_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("options.json");
    std::fs::write(&path, r#"{"include_external_deps": true}"#)?;

    let options = GroupOptions::load(&path)?;
    assert!(options.include_external_deps);
    assert!(GroupOptions::load(dir.path().join("missing.json")).is_err());
    Ok(())
}
