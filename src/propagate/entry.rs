// SPDX-License-Identifier: MPL-2.0

use crate::model::Status;
use crate::propagate::{Mutation, PropagationReport, PropagationTarget};
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedRecordKind {
    Home,
    Notification,
}

/// A status as it sits in a timeline, with the timeline it came from
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRecord {
    pub kind: FeedRecordKind,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadPosition {
    Root,
    Reply,
    Leaf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadNode {
    pub position: ThreadPosition,
    pub status: Status,
}

/// A row of a list that holds its status payload directly.
///
/// Equality and hashing look at the wrapper kind and the status ID only.
#[derive(Debug, Clone)]
pub enum Entry {
    Status(Status),
    Feed(FeedRecord),
    FeedLoader(FeedRecord),
    Thread(ThreadNode),
    TopLoader,
    BottomLoader,
}

impl Entry {
    pub fn status(&self) -> Option<&Status> {
        match self {
            Entry::Status(status) => Some(status),
            Entry::Feed(record) | Entry::FeedLoader(record) => Some(&record.status),
            Entry::Thread(node) => Some(&node.status),
            Entry::TopLoader | Entry::BottomLoader => None,
        }
    }

    /// Swap the payload, keeping the wrapper and its kind
    pub fn set_status(&mut self, status: Status) {
        match self {
            Entry::Status(current) => *current = status,
            Entry::Feed(record) | Entry::FeedLoader(record) => record.status = status,
            Entry::Thread(node) => node.status = status,
            Entry::TopLoader | Entry::BottomLoader => {}
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        discriminant(self) == discriminant(other)
            && self.status().map(|s| &s.id) == other.status().map(|s| &s.id)
    }
}

impl Eq for Entry {}

impl Hash for Entry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        self.status().map(|s| &s.id).hash(state);
    }
}

impl PropagationTarget for Vec<Entry> {
    fn apply_mutation(&mut self, mutation: &Mutation) -> PropagationReport {
        if let Mutation::Delete(deleted) = mutation {
            let before = self.len();
            self.retain(|entry| entry.status().is_none_or(|s| s.id != deleted.id));
            return PropagationReport::removed(before - self.len());
        }

        let statuses: Vec<Option<&Status>> = self.iter().map(Entry::status).collect();
        let Some(index) = mutation.locate(&statuses) else {
            return PropagationReport::default();
        };
        let replacement = mutation.replacement_for(statuses[index]);
        self[index].set_status(replacement);
        PropagationReport::replaced(1)
    }
}

/// The two halves of an open thread around its focused status
#[derive(Debug, Clone, Default)]
pub struct ThreadLists {
    pub ancestors: Vec<Entry>,
    pub descendants: Vec<Entry>,
}

impl PropagationTarget for ThreadLists {
    fn apply_mutation(&mut self, mutation: &Mutation) -> PropagationReport {
        self.ancestors.apply_mutation(mutation) + self.descendants.apply_mutation(mutation)
    }
}
