// SPDX-License-Identifier: MPL-2.0

use crate::cache::FeedItemIdentifier;

/// One row of a feed list.
///
/// Rows carry IDs only, never payloads, so equality and hashing depend on the
/// tag and IDs alone. Two rows for the same entity are interchangeable no
/// matter how fresh the cached record behind them is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemIdentifier {
    Status(String),
    Notification(String),
    NotificationGroup(String),
    /// Gap between two rows that still has to be filled
    MiddleLoader {
        after: FeedItemIdentifier,
        before: FeedItemIdentifier,
    },
    BottomLoader,
    /// Banner about notifications held back by the server's policy
    FilteredNotificationsInfo,
}

impl ItemIdentifier {
    /// Server ID of the entity this row shows, if it shows one
    pub fn id(&self) -> Option<&str> {
        match self {
            ItemIdentifier::Status(id)
            | ItemIdentifier::Notification(id)
            | ItemIdentifier::NotificationGroup(id) => Some(id),
            ItemIdentifier::MiddleLoader { .. }
            | ItemIdentifier::BottomLoader
            | ItemIdentifier::FilteredNotificationsInfo => None,
        }
    }

    /// Cache key of the entity behind this row
    pub fn entity(&self) -> Option<FeedItemIdentifier> {
        match self {
            ItemIdentifier::Status(id) => Some(FeedItemIdentifier::Status(id.clone())),
            ItemIdentifier::Notification(id) => {
                Some(FeedItemIdentifier::Notification(id.clone()))
            }
            ItemIdentifier::NotificationGroup(id) => {
                Some(FeedItemIdentifier::NotificationGroup(id.clone()))
            }
            _ => None,
        }
    }

    /// Neighbours to fetch between when resolving a gap.
    ///
    /// An entity row anchors only itself; banners and the bottom loader
    /// resolve nothing further.
    pub fn fetch_anchors(&self) -> (Option<FeedItemIdentifier>, Option<FeedItemIdentifier>) {
        match self {
            ItemIdentifier::MiddleLoader { after, before } => {
                (Some(after.clone()), Some(before.clone()))
            }
            ItemIdentifier::BottomLoader | ItemIdentifier::FilteredNotificationsInfo => {
                (None, None)
            }
            entity => (entity.entity(), None),
        }
    }

    /// Stable string ID for diffable UI lists
    pub fn row_id(&self) -> String {
        match self {
            ItemIdentifier::Status(id)
            | ItemIdentifier::Notification(id)
            | ItemIdentifier::NotificationGroup(id) => id.clone(),
            ItemIdentifier::MiddleLoader { after, before } => {
                format!("{}-{}", after.id(), before.id())
            }
            ItemIdentifier::BottomLoader => "bottom_loader".to_string(),
            ItemIdentifier::FilteredNotificationsInfo => "filtered_notifications_info".to_string(),
        }
    }
}

impl From<FeedItemIdentifier> for ItemIdentifier {
    fn from(value: FeedItemIdentifier) -> Self {
        match value {
            FeedItemIdentifier::Status(id) => ItemIdentifier::Status(id),
            FeedItemIdentifier::Notification(id) => ItemIdentifier::Notification(id),
            FeedItemIdentifier::NotificationGroup(id) => ItemIdentifier::NotificationGroup(id),
        }
    }
}
