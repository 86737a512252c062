use crate::group::{GroupId, GroupSet, IdentifierGroup};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// How much of a group's text a context shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// Documentation + signature
    Abbreviated,
    /// Complete declaration
    Full,
}

/// Edges a context has pruned from its view of the shared groups
#[derive(Debug, Clone, Default)]
pub(crate) struct EdgeOverlay {
    pub(crate) removed_direct: HashSet<(GroupId, GroupId)>,
    pub(crate) removed_used_by: HashSet<(GroupId, GroupId)>,
}

/// Budget-aware bundle of groups plus the text needed to understand them
///
/// Groups are shared through an `Arc<GroupSet>`; pruning only edits this
/// context's edge overlay, so contexts built from the same grouping run never
/// affect each other.
#[derive(Debug, Clone)]
pub struct Context {
    pub(crate) groups: Arc<GroupSet>,
    pub(crate) original: Vec<GroupId>,
    pub(crate) included: BTreeMap<GroupId, TextMode>,
    pub(crate) pruned: EdgeOverlay,
}

/// Serializable snapshot of a context, for tooling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
    pub added_identifiers: Vec<String>,
    pub free_identifiers: Vec<String>,
    pub all_identifiers: Vec<String>,
    pub full_groups: usize,
    pub abbreviated_groups: usize,
    pub cost: usize,
}

/// Minimum text a direct dependency needs to be understood
fn required_mode(group: &IdentifierGroup) -> TextMode {
    if group.is_external() || group.is_documented {
        TextMode::Abbreviated
    } else {
        TextMode::Full
    }
}

impl Context {
    pub fn new(groups: Arc<GroupSet>, initial: impl IntoIterator<Item = GroupId>) -> Self {
        let mut original = Vec::new();
        for group in initial {
            if !original.contains(&group) {
                original.push(group);
            }
        }

        let mut context = Self {
            groups,
            original,
            included: BTreeMap::new(),
            pruned: EdgeOverlay::default(),
        };
        context.recompute();
        context
    }

    /// Direct dependencies of `group`, as seen by this context
    pub fn direct_deps(&self, group: GroupId) -> impl Iterator<Item = GroupId> + '_ {
        self.groups
            .get(group)
            .direct_deps
            .iter()
            .copied()
            .filter(move |&dep| !self.pruned.removed_direct.contains(&(group, dep)))
    }

    /// Groups using `group`, as seen by this context
    pub fn used_by_deps(&self, group: GroupId) -> impl Iterator<Item = GroupId> + '_ {
        self.groups
            .get(group)
            .used_by_deps
            .iter()
            .copied()
            .filter(move |&user| !self.pruned.removed_used_by.contains(&(group, user)))
    }

    /// Explicitly include `group`; no-op when it already is
    pub fn add_group(&mut self, group: GroupId) {
        if self.is_explicit(group) {
            return;
        }
        self.original.push(group);
        self.recompute();
    }

    pub fn is_explicit(&self, group: GroupId) -> bool {
        self.original.contains(&group)
    }

    /// Rebuild the inclusion map from the explicit groups
    pub(crate) fn recompute(&mut self) {
        let mut included = BTreeMap::new();

        // Explicit groups and their users: a use is only understood in full.
        for &group in &self.original {
            included.insert(group, TextMode::Full);
            for user in self.used_by_deps(group) {
                included.insert(user, TextMode::Full);
            }
        }

        // Dependencies: full wins over abbreviated.
        for &group in &self.original {
            for dep in self.direct_deps(group) {
                let needed = required_mode(self.groups.get(dep));
                included
                    .entry(dep)
                    .and_modify(|mode: &mut TextMode| *mode = (*mode).max(needed))
                    .or_insert(needed);
            }
        }

        self.included = included;
    }

    /// Estimated tokens of the rendered bundle
    pub fn cost(&self) -> usize {
        self.included
            .iter()
            .map(|(&id, &mode)| {
                let group = self.groups.get(id);
                match mode {
                    _ if group.is_external() => group.snippet_tokens,
                    TextMode::Full => group.body_tokens,
                    TextMode::Abbreviated => group.snippet_tokens,
                }
            })
            .sum()
    }

    /// A non-explicit group already shown in full whose own users and
    /// dependencies are all present with enough text.
    ///
    /// Single hop: a group that only becomes free once another free group is
    /// added is not free.
    pub fn is_free(&self, group: GroupId) -> bool {
        if self.is_explicit(group) || self.text_mode(group) != Some(TextMode::Full) {
            return false;
        }

        let users_full = self
            .used_by_deps(group)
            .all(|user| self.text_mode(user) == Some(TextMode::Full));
        users_full
            && self.direct_deps(group).all(|dep| {
                let needed = required_mode(self.groups.get(dep));
                self.text_mode(dep).is_some_and(|mode| mode >= needed)
            })
    }

    /// Tokens `group` would add if included explicitly
    pub fn additional_cost_for_group(&self, group: GroupId) -> usize {
        if self.is_explicit(group) || self.is_free(group) {
            return 0;
        }

        let mut with_group = self.clone();
        with_group.add_group(group);
        with_group.cost().saturating_sub(self.cost())
    }

    /// Explicitly included groups, in insertion order
    pub fn added_groups(&self) -> &[GroupId] {
        &self.original
    }

    /// Groups that could be added at zero cost
    pub fn groups_for_free(&self) -> Vec<GroupId> {
        self.included
            .keys()
            .copied()
            .filter(|&group| self.is_free(group))
            .collect()
    }

    /// Every group the bundle shows, in full or abbreviated
    pub fn all_groups(&self) -> Vec<GroupId> {
        self.included.keys().copied().collect()
    }

    pub fn added_identifiers(&self) -> Vec<String> {
        self.identifiers_of(self.original.iter().copied())
    }

    pub fn identifiers_for_free(&self) -> Vec<String> {
        self.identifiers_of(self.groups_for_free())
    }

    pub fn all_identifiers(&self) -> Vec<String> {
        self.identifiers_of(self.included.keys().copied())
    }

    fn identifiers_of(&self, groups: impl IntoIterator<Item = GroupId>) -> Vec<String> {
        groups
            .into_iter()
            .flat_map(|group| self.groups.get(group).ids.iter().cloned())
            .collect()
    }

    pub fn has_full_bytes(&self, group: GroupId) -> bool {
        self.text_mode(group) == Some(TextMode::Full)
    }

    /// How `group` is shown, or `None` when absent
    pub fn text_mode(&self, group: GroupId) -> Option<TextMode> {
        self.included.get(&group).copied()
    }

    pub fn summary(&self) -> ContextSummary {
        let full_groups = self
            .included
            .values()
            .filter(|&&mode| mode == TextMode::Full)
            .count();

        ContextSummary {
            added_identifiers: self.added_identifiers(),
            free_identifiers: self.identifiers_for_free(),
            all_identifiers: self.all_identifiers(),
            full_groups,
            abbreviated_groups: self.included.len() - full_groups,
            cost: self.cost(),
        }
    }
}
