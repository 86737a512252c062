use crate::context::Context;
use crate::group::GroupSet;
use std::collections::HashSet;
use std::sync::Arc;

/// Target identifiers one context fully describes
#[derive(Debug, Clone)]
pub struct Coverage {
    pub context: Context,
    pub identifiers: Vec<String>,
}

/// Greedily cover `targets` with as few contexts as possible.
///
/// Targets are visited in order. Each uncovered target with a group seeds a
/// context; the groups that context gets for free are added, and every
/// still-uncovered target among the context's identifiers is assigned to it.
/// Targets without a group are dropped.
pub fn partition<S: AsRef<str>>(groups: &Arc<GroupSet>, targets: &[S]) -> Vec<Coverage> {
    let mut covered: HashSet<&str> = HashSet::new();
    let mut coverages = Vec::new();

    for target in targets {
        let target = target.as_ref();
        if covered.contains(target) {
            continue;
        }
        let Some(seed) = groups.group_of(target) else {
            log::trace!("No group for {target}, skipping");
            continue;
        };

        let mut context = Context::new(Arc::clone(groups), [seed]);
        for free in context.groups_for_free() {
            context.add_group(free);
        }
        let reachable: HashSet<String> = context.added_identifiers().into_iter().collect();

        let mut identifiers = Vec::new();
        for id in targets.iter().map(|id| id.as_ref()) {
            if reachable.contains(id) && covered.insert(id) {
                identifiers.push(id.to_string());
            }
        }

        coverages.push(Coverage {
            context,
            identifiers,
        });
    }

    log::debug!(
        "Partitioned {} targets into {} contexts",
        targets.len(),
        coverages.len()
    );
    coverages
}
