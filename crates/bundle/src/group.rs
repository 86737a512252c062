use context_snippet::{Snippet, PACKAGE_IDENTIFIER};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Stable index of a group inside its [`GroupSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The unit of inclusion: identifiers that are always shown together
#[derive(Debug, Clone)]
pub struct IdentifierGroup {
    /// Member identifiers, sorted when there is more than one
    pub ids: Vec<String>,

    /// Member id -> snippet declaring it
    pub snippets: BTreeMap<String, Arc<Snippet>>,

    /// Tokens of the full view over distinct snippets
    pub body_tokens: usize,

    /// Tokens of the short view over distinct snippets
    pub snippet_tokens: usize,

    /// Every member is documented
    pub is_documented: bool,

    /// Some member comes from a test file
    pub is_test_file: bool,

    /// Groups this group references, sorted by lead id
    pub direct_deps: Vec<GroupId>,

    /// Groups referencing this group, sorted by lead id
    pub used_by_deps: Vec<GroupId>,

    /// Import path when the group is an identifier of another package
    pub external_import_path: Option<String>,

    /// The synthesized package group
    pub is_package: bool,
}

impl IdentifierGroup {
    pub(crate) fn new(ids: Vec<String>, snippets: BTreeMap<String, Arc<Snippet>>) -> Self {
        Self {
            ids,
            snippets,
            body_tokens: 0,
            snippet_tokens: 0,
            is_documented: false,
            is_test_file: false,
            direct_deps: Vec::new(),
            used_by_deps: Vec::new(),
            external_import_path: None,
            is_package: false,
        }
    }

    /// First identifier, used for ordering
    pub fn lead_id(&self) -> &str {
        self.ids.first().map(String::as_str).unwrap_or_default()
    }

    pub const fn is_external(&self) -> bool {
        self.external_import_path.is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.snippets.contains_key(id)
    }

    /// Snippet declaring member `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` is not a member of this group.
    pub fn snippet_for(&self, id: &str) -> &Arc<Snippet> {
        match self.snippets.get(id) {
            Some(snippet) => snippet,
            None => panic!("{id} is not a member of group [{}]", self.ids.join(", ")),
        }
    }

    /// Distinct snippets in member order; block snippets appear once
    pub fn distinct_snippets(&self) -> Vec<&Arc<Snippet>> {
        let mut seen = HashSet::new();
        self.ids
            .iter()
            .filter_map(|id| self.snippets.get(id))
            .filter(|snippet| seen.insert(snippet.key()))
            .collect()
    }

    /// Some member is exported
    pub fn has_exported_identifier(&self) -> bool {
        self.ids
            .iter()
            .any(|id| context_snippet::is_exported_identifier(id))
    }
}

/// Arena of every group produced by one grouping run
///
/// Main groups come first, ordered by lead id, followed by the package group
/// (when requested). External groups are stored after them and are only
/// reachable through `direct_deps`.
#[derive(Debug, Clone, Default)]
pub struct GroupSet {
    groups: Vec<IdentifierGroup>,
    main_len: usize,
    by_id: HashMap<String, GroupId>,
}

impl GroupSet {
    pub(crate) fn new(groups: Vec<IdentifierGroup>, main_len: usize) -> Self {
        let by_id = groups[..main_len]
            .iter()
            .enumerate()
            .flat_map(|(idx, group)| group.ids.iter().map(move |id| (id.clone(), GroupId(idx))))
            .collect();

        Self {
            groups,
            main_len,
            by_id,
        }
    }

    pub fn get(&self, id: GroupId) -> &IdentifierGroup {
        &self.groups[id.0]
    }

    /// Main groups in order (no external groups)
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &IdentifierGroup)> {
        self.groups[..self.main_len]
            .iter()
            .enumerate()
            .map(|(idx, group)| (GroupId(idx), group))
    }

    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> {
        (0..self.main_len).map(GroupId)
    }

    /// Group owning identifier `id`
    pub fn group_of(&self, id: &str) -> Option<GroupId> {
        self.by_id.get(id).copied()
    }

    /// The synthesized package group, if grouping created one
    pub fn package_group(&self) -> Option<GroupId> {
        self.group_of(PACKAGE_IDENTIFIER)
            .filter(|&id| self.get(id).is_package)
    }

    /// Groups owning any of `ids`, each once, in first-match order
    pub fn groups_for_identifiers<S: AsRef<str>>(&self, ids: &[S]) -> Vec<GroupId> {
        let mut seen = HashSet::new();
        ids.iter()
            .filter_map(|id| self.group_of(id.as_ref()))
            .filter(|group| seen.insert(*group))
            .collect()
    }

    /// Number of main groups
    pub fn len(&self) -> usize {
        self.main_len
    }

    pub fn is_empty(&self) -> bool {
        self.main_len == 0
    }

    /// Number of external groups
    pub fn external_len(&self) -> usize {
        self.groups.len() - self.main_len
    }
}
