use crate::context::Context;
use crate::group::GroupId;

/// Users an explicit group keeps no matter the budget
pub const MIN_RETAINED_USERS: usize = 2;

impl Context {
    /// Shrink the bundle toward `budget` tokens.
    ///
    /// Returns whether the budget is met. Pruning is best effort and not
    /// reversible: a failed prune may still leave the context smaller.
    ///
    /// - Package context (only the package group is explicit): keep only the
    ///   package's dependencies that contain an exported identifier.
    /// - Otherwise, in rounds: each explicit group drops its most expensive
    ///   user, never going below [`MIN_RETAINED_USERS`], until the budget is
    ///   met or a round removes nothing.
    pub fn prune(&mut self, budget: usize) -> bool {
        if self.cost() <= budget {
            return true;
        }

        if let Some(package) = self.package_context() {
            self.prune_package_deps(package, budget)
        } else {
            self.prune_users(budget)
        }
    }

    fn package_context(&self) -> Option<GroupId> {
        match self.original.as_slice() {
            [only] if self.groups.get(*only).is_package => Some(*only),
            _ => None,
        }
    }

    fn prune_package_deps(&mut self, package: GroupId, budget: usize) -> bool {
        let unexported: Vec<GroupId> = self
            .direct_deps(package)
            .filter(|&dep| !self.groups.get(dep).has_exported_identifier())
            .collect();

        for &dep in &unexported {
            self.pruned.removed_direct.insert((package, dep));
        }
        self.recompute();

        let cost = self.cost();
        log::debug!(
            "Pruned {} unexported package dependencies: cost {} (budget {})",
            unexported.len(),
            cost,
            budget
        );
        cost <= budget
    }

    fn prune_users(&mut self, budget: usize) -> bool {
        let mut round = 0;
        loop {
            round += 1;
            let mut removed_any = false;

            for group in self.original.clone() {
                let Some(victim) = self.most_expensive_user(group) else {
                    continue;
                };

                self.pruned.removed_used_by.insert((group, victim));
                removed_any = true;
                self.recompute();

                let cost = self.cost();
                log::trace!(
                    "Round {}: dropped user {} ({}) of {} ({}), cost now {}",
                    round,
                    victim,
                    self.groups.get(victim).lead_id(),
                    group,
                    self.groups.get(group).lead_id(),
                    cost
                );
                if cost <= budget {
                    log::debug!("Pruned to {} tokens in {} rounds", cost, round);
                    return true;
                }
            }

            if !removed_any {
                log::debug!(
                    "Pruning stopped after {} rounds at {} tokens (budget {})",
                    round,
                    self.cost(),
                    budget
                );
                return false;
            }
        }
    }

    /// Costliest user of `group` by full text, if it has more than the
    /// retained minimum. Ties go to the first user in edge order.
    fn most_expensive_user(&self, group: GroupId) -> Option<GroupId> {
        let users: Vec<GroupId> = self.used_by_deps(group).collect();
        if users.len() <= MIN_RETAINED_USERS {
            return None;
        }

        users.into_iter().reduce(|best, candidate| {
            if self.groups.get(candidate).body_tokens > self.groups.get(best).body_tokens {
                candidate
            } else {
                best
            }
        })
    }
}
