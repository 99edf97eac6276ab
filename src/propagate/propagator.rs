// SPDX-License-Identifier: MPL-2.0

use crate::cache::IdentityCache;
use crate::model::Status;
use crate::propagate::Mutation;
use std::ops::{Add, AddAssign};
use std::sync::Arc;
use tracing::{debug, warn};

/// How many rows a mutation touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
    pub replaced: usize,
    pub removed: usize,
}

impl PropagationReport {
    pub fn replaced(count: usize) -> Self {
        Self {
            replaced: count,
            removed: 0,
        }
    }

    pub fn removed(count: usize) -> Self {
        Self {
            replaced: 0,
            removed: count,
        }
    }

    /// Nothing matched. Not an error: the list may simply not show this status.
    pub fn is_miss(&self) -> bool {
        self.replaced == 0 && self.removed == 0
    }
}

impl Add for PropagationReport {
    type Output = PropagationReport;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            replaced: self.replaced + rhs.replaced,
            removed: self.removed + rhs.removed,
        }
    }
}

impl AddAssign for PropagationReport {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// A list that can take a mutation through its own update entry point.
pub trait PropagationTarget: Send {
    fn apply_mutation(&mut self, mutation: &Mutation) -> PropagationReport;
}

/// Applies one local mutation to the cache and then to every open list.
pub struct MutationPropagator {
    cache: Arc<IdentityCache>,
}

impl MutationPropagator {
    pub fn new(cache: Arc<IdentityCache>) -> Self {
        Self { cache }
    }

    /// Commit `mutation` to the cache, then hand it to each target in turn.
    ///
    /// Targets are independent: a miss in one never affects another.
    pub fn propagate(
        &self,
        mutation: Mutation,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> PropagationReport {
        let mutation = self.commit(mutation);
        let mut total = PropagationReport::default();

        for target in targets.iter_mut() {
            let report = target.apply_mutation(&mutation);
            if report.is_miss() {
                if matches!(mutation, Mutation::Delete(_)) {
                    debug!(status_id = %mutation.status().id, "deleted status not in list");
                } else {
                    warn!(
                        mutation = mutation.name(),
                        status_id = %mutation.status().id,
                        "no matching entry; data in this list was not updated"
                    );
                }
            }
            total += report;
        }

        total
    }

    /// Write the post-mutation state into the cache and return the mutation
    /// carrying exactly what was stored.
    fn commit(&self, mutation: Mutation) -> Mutation {
        if let Mutation::Delete(status) = &mutation {
            self.cache.mark_deleted(&status.id);
            return mutation;
        }

        let previous = self.cache.status(&mutation.status().id);
        let stored = mutation.replacement_for(previous.as_deref());
        self.cache.upsert(stored.clone());
        mutation.with_status(stored)
    }

    pub fn handle_delete(
        &self,
        status: Status,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> PropagationReport {
        self.propagate(Mutation::Delete(status), targets)
    }

    pub fn handle_edit(
        &self,
        status: Status,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> PropagationReport {
        self.propagate(Mutation::Edit(status), targets)
    }

    pub fn handle_favorite(
        &self,
        status: Status,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> PropagationReport {
        self.propagate(Mutation::Favorite(status), targets)
    }

    pub fn handle_bookmark(
        &self,
        status: Status,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> PropagationReport {
        self.propagate(Mutation::Bookmark(status), targets)
    }

    pub fn handle_reblog(
        &self,
        status: Status,
        reblogged: bool,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> PropagationReport {
        self.propagate(Mutation::Reblog { status, reblogged }, targets)
    }

    pub fn handle_sensitivity_toggle(
        &self,
        status: Status,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> PropagationReport {
        self.propagate(Mutation::SensitivityToggle(status), targets)
    }
}
