// SPDX-License-Identifier: MPL-2.0

use crate::feed::ItemIdentifier;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How to resolve an ID collision when a new page lands on an existing list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeduplicationPolicy {
    /// Drop the incoming duplicate; the row already in the list keeps its place
    #[default]
    OmitNewest,
    /// Drop the row already in the list; the incoming duplicate keeps its
    /// place in the appended page
    RemoveOldest,
}

impl DeduplicationPolicy {
    /// Append `incoming` to `existing` without duplicate rows
    pub fn merge(
        self,
        existing: &[ItemIdentifier],
        incoming: Vec<ItemIdentifier>,
    ) -> Vec<ItemIdentifier> {
        match self {
            DeduplicationPolicy::OmitNewest => {
                removing_duplicates(existing.iter().cloned().chain(incoming))
            }
            DeduplicationPolicy::RemoveOldest => {
                let incoming = removing_duplicates(incoming);
                let replaced: HashSet<&ItemIdentifier> = incoming.iter().collect();
                let kept: Vec<ItemIdentifier> = removing_duplicates(
                    existing
                        .iter()
                        .filter(|item| !replaced.contains(item))
                        .cloned(),
                );
                kept.into_iter().chain(incoming).collect()
            }
        }
    }
}

/// Keep the first occurrence of every row, preserving order
pub fn removing_duplicates<I>(items: I) -> Vec<ItemIdentifier>
where
    I: IntoIterator<Item = ItemIdentifier>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
