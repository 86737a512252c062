use crate::error::{BundleError, Result};
use crate::group::{GroupId, GroupSet, IdentifierGroup};
use crate::options::GroupOptions;
use context_graph::{DependencyGraph, ExternalRef};
use context_snippet::{
    ByteEstimate, Snippet, SnippetKind, SnippetSource, TokenCounter, PACKAGE_IDENTIFIER,
};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Group a package's identifiers with the default bytes/4 token estimate
pub fn group_identifiers<G: DependencyGraph>(
    graph: &G,
    source: &dyn SnippetSource,
    options: GroupOptions,
) -> Result<GroupSet> {
    GroupBuilder::new(options).build(graph, source)
}

/// Collapses a package's reference graph into [`IdentifierGroup`]s
pub struct GroupBuilder {
    options: GroupOptions,
    counter: Box<dyn TokenCounter>,
}

impl GroupBuilder {
    pub fn new(options: GroupOptions) -> Self {
        Self {
            options,
            counter: Box::new(ByteEstimate),
        }
    }

    /// Builder: measure snippet text with `counter`
    #[must_use]
    pub fn token_counter(mut self, counter: impl TokenCounter + 'static) -> Self {
        self.counter = Box::new(counter);
        self
    }

    /// Build groups for every identifier of `graph`
    pub fn build<G: DependencyGraph>(&self, graph: &G, source: &dyn SnippetSource) -> Result<GroupSet> {
        // Phase 1: optionally drop test identifiers
        let filtered;
        let graph = if self.options.exclude_tests {
            filtered = graph.without_test_identifiers();
            &filtered
        } else {
            graph
        };

        let ids = graph.all_identifiers();
        let snippets = ids
            .iter()
            .map(|id| {
                source
                    .snippet_for(id)
                    .ok_or_else(|| BundleError::MissingSnippet { id: id.clone() })
            })
            .collect::<Result<Vec<_>>>()?;

        // Phase 2: partition ids (cycles, then blocks)
        let members = partition_identifiers(graph, &ids, &snippets);

        // Phase 3: one group per partition, ordered by lead id
        let snippet_of: HashMap<&str, &Arc<Snippet>> =
            ids.iter().map(String::as_str).zip(snippets.iter()).collect();
        let mut groups: Vec<IdentifierGroup> = members
            .into_iter()
            .map(|group_ids| {
                let group_snippets = group_ids
                    .iter()
                    .map(|id| (id.clone(), Arc::clone(snippet_of[id.as_str()])))
                    .collect();
                let mut group = IdentifierGroup::new(group_ids, group_snippets);
                self.measure(&mut group);
                group
            })
            .collect();

        let group_of: HashMap<&str, usize> = groups
            .iter()
            .enumerate()
            .flat_map(|(idx, group)| group.ids.iter().map(move |id| (id.as_str(), idx)))
            .collect();

        // Phase 4: edges between groups
        let edges: Vec<(BTreeSet<usize>, BTreeSet<usize>)> = groups
            .iter()
            .enumerate()
            .map(|(idx, group)| {
                let mut direct = BTreeSet::new();
                let mut used_by = BTreeSet::new();
                for id in &group.ids {
                    direct.extend(
                        graph
                            .identifiers_from(id)
                            .iter()
                            .filter_map(|to| group_of.get(to.as_str()).copied()),
                    );
                    used_by.extend(
                        graph
                            .identifiers_to(id)
                            .iter()
                            .filter_map(|from| group_of.get(from.as_str()).copied()),
                    );
                }
                direct.remove(&idx);
                used_by.remove(&idx);
                (direct, used_by)
            })
            .collect();

        for (group, (direct, used_by)) in groups.iter_mut().zip(edges) {
            group.direct_deps = direct.into_iter().map(GroupId).collect();
            group.used_by_deps = used_by.into_iter().map(GroupId).collect();
        }

        // Phase 5: package group
        if self.options.include_package_docs && !source.is_test_package() {
            self.add_package_group(&mut groups, source);
        }
        let main_len = groups.len();

        // Phase 6: identifiers of other packages
        if self.options.include_external_deps {
            self.attach_external_groups(&mut groups, main_len, graph)?;
        }

        sort_edges(&mut groups);

        log::info!(
            "Grouped {} identifiers of {} into {} groups ({} external)",
            ids.len(),
            source.import_path(),
            main_len,
            groups.len() - main_len
        );

        Ok(GroupSet::new(groups, main_len))
    }

    /// Token costs and documentation/test flags over distinct snippets
    fn measure(&self, group: &mut IdentifierGroup) {
        let (body_tokens, snippet_tokens, is_test_file) = group.distinct_snippets().iter().fold(
            (0, 0, false),
            |(body, short, test), snippet| {
                (
                    body + self.counter.count(&snippet.full),
                    short + self.counter.count(&snippet.short),
                    test || snippet.is_test_file,
                )
            },
        );

        let policy = self.options.documentation;
        group.body_tokens = body_tokens;
        group.snippet_tokens = snippet_tokens;
        group.is_test_file = is_test_file;
        group.is_documented = group
            .ids
            .iter()
            .all(|id| policy.is_documented(id, group.snippet_for(id)));
    }

    fn add_package_group(&self, groups: &mut Vec<IdentifierGroup>, source: &dyn SnippetSource) {
        let package_idx = groups.len();
        let package_doc = source.package_doc();
        let has_doc = package_doc.is_some();

        let snippet = package_doc.unwrap_or_else(|| {
            let clause = format!("package {}\n", source.package_name());
            Arc::new(Snippet::new(
                "",
                0,
                vec![PACKAGE_IDENTIFIER.to_string()],
                clause.clone(),
                clause,
                SnippetKind::PackageDoc,
            ))
        });

        let mut group = IdentifierGroup::new(
            vec![PACKAGE_IDENTIFIER.to_string()],
            BTreeMap::from([(PACKAGE_IDENTIFIER.to_string(), snippet)]),
        );
        self.measure(&mut group);
        group.is_package = true;

        if has_doc {
            // Package docs describe how everything is used.
            group.is_documented = true;
            for other in groups.iter_mut() {
                other.used_by_deps.push(GroupId(package_idx));
            }
        } else {
            // Nothing to derive a description from except the package itself.
            group.is_documented = false;
            group.direct_deps = groups
                .iter()
                .enumerate()
                .filter(|(_, other)| !other.is_test_file)
                .map(|(idx, _)| GroupId(idx))
                .collect();
        }

        log::debug!(
            "Added package group for {} (package doc: {})",
            source.import_path(),
            has_doc
        );
        groups.push(group);
    }

    fn attach_external_groups<G: DependencyGraph>(
        &self,
        groups: &mut Vec<IdentifierGroup>,
        main_len: usize,
        graph: &G,
    ) -> Result<()> {
        let mut cache: HashMap<ExternalRef, GroupId> = HashMap::new();

        for idx in 0..main_len {
            let mut external_deps = Vec::new();
            for id in groups[idx].ids.clone() {
                for external in graph.external_identifiers_from(&id) {
                    if let Some(&cached) = cache.get(&external) {
                        external_deps.push(cached);
                        continue;
                    }

                    let snippet = match graph.resolve_external(&external) {
                        Ok(snippet) => snippet,
                        Err(err) if err.is_module_unavailable() => {
                            log::debug!(
                                "Skipping {}.{}: {}",
                                external.import_path,
                                external.id,
                                err
                            );
                            continue;
                        }
                        Err(source) => {
                            return Err(BundleError::ExternalResolution {
                                import_path: external.import_path.clone(),
                                id: external.id.clone(),
                                source,
                            })
                        }
                    };

                    let group_id = GroupId(groups.len());
                    groups.push(self.external_group(&external, snippet));
                    cache.insert(external, group_id);
                    external_deps.push(group_id);
                }
            }

            let group = &mut groups[idx];
            for dep in external_deps {
                if !group.direct_deps.contains(&dep) {
                    group.direct_deps.push(dep);
                }
            }
        }

        Ok(())
    }

    fn external_group(&self, external: &ExternalRef, snippet: Arc<Snippet>) -> IdentifierGroup {
        let tokens = self.counter.count(&snippet.short);
        let mut group = IdentifierGroup::new(
            vec![external.id.clone()],
            BTreeMap::from([(external.id.clone(), snippet)]),
        );
        group.body_tokens = tokens;
        group.snippet_tokens = tokens;
        group.is_documented = true;
        group.external_import_path = Some(external.import_path.clone());
        group
    }
}

/// Partition `ids` into group member lists.
///
/// Strongly connected components are never split, and all identifiers of a
/// block declaration share one group. Merging a block can close a cycle
/// through outside groups (`A -> X -> B` with `A`, `B` in one block); such
/// cycles are collapsed as well so the group graph stays acyclic.
///
/// Member lists are sorted, and the lists are ordered by lead id.
fn partition_identifiers<G: DependencyGraph>(
    graph: &G,
    ids: &[String],
    snippets: &[Arc<Snippet>],
) -> Vec<Vec<String>> {
    let index: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.as_str(), idx))
        .collect();
    let mut sets = UnionFind::<usize>::new(ids.len());

    for component in graph.strongly_connected_components() {
        let members: Vec<usize> = component
            .iter()
            .filter_map(|id| index.get(id.as_str()).copied())
            .collect();
        if let Some((&first, rest)) = members.split_first() {
            for &other in rest {
                sets.union(first, other);
            }
        }
    }

    let mut merged_blocks = false;
    for (idx, snippet) in snippets.iter().enumerate() {
        if !snippet.is_block() {
            continue;
        }
        for other in snippet.ids.iter().filter_map(|id| index.get(id.as_str())) {
            merged_blocks |= sets.union(idx, *other);
        }
    }

    if merged_blocks {
        collapse_group_cycles(graph, ids, &index, &mut sets);
    }

    let mut members: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (idx, id) in ids.iter().enumerate() {
        members.entry(sets.find(idx)).or_default().push(id.clone());
    }

    let mut groups: Vec<Vec<String>> = members
        .into_values()
        .map(|mut group| {
            group.sort_unstable();
            group
        })
        .collect();
    groups.sort_unstable_by(|a, b| a[0].cmp(&b[0]));
    groups
}

fn collapse_group_cycles<G: DependencyGraph>(
    graph: &G,
    ids: &[String],
    index: &HashMap<&str, usize>,
    sets: &mut UnionFind<usize>,
) {
    let mut quotient: DiGraph<usize, ()> = DiGraph::new();
    let mut nodes: HashMap<usize, NodeIndex> = HashMap::new();

    for idx in 0..ids.len() {
        let root = sets.find(idx);
        nodes
            .entry(root)
            .or_insert_with(|| quotient.add_node(root));
    }

    for (idx, id) in ids.iter().enumerate() {
        let from = nodes[&sets.find(idx)];
        for to in graph.identifiers_from(id) {
            let Some(&to_idx) = index.get(to.as_str()) else {
                continue;
            };
            let to = nodes[&sets.find(to_idx)];
            if from != to {
                quotient.update_edge(from, to, ());
            }
        }
    }

    for component in tarjan_scc(&quotient) {
        if component.len() < 2 {
            continue;
        }
        let roots: Vec<usize> = component.iter().map(|&node| quotient[node]).collect();
        log::debug!(
            "Collapsing {} groups joined into a cycle by block declarations",
            roots.len()
        );
        for &root in &roots[1..] {
            sets.union(roots[0], root);
        }
    }
}

/// Sort every edge list by the target's lead id (then import path)
fn sort_edges(groups: &mut [IdentifierGroup]) {
    let keys: Vec<(String, String)> = groups
        .iter()
        .map(|group| {
            (
                group.lead_id().to_string(),
                group.external_import_path.clone().unwrap_or_default(),
            )
        })
        .collect();

    for group in groups.iter_mut() {
        group
            .direct_deps
            .sort_by(|a, b| keys[a.0].cmp(&keys[b.0]));
        group
            .used_by_deps
            .sort_by(|a, b| keys[a.0].cmp(&keys[b.0]));
    }
}
