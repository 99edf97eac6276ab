// SPDX-License-Identifier: MPL-2.0

use crate::model::FilterContext;

/// Which server timeline a loader pages through
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Home,
    NotificationsAll,
    NotificationsMentionsOnly,
    NotificationsWithAccount(String),
}

impl FeedKind {
    pub fn is_notifications(&self) -> bool {
        !matches!(self, FeedKind::Home)
    }

    /// Surface whose filter rules apply to this feed
    pub fn filter_context(&self) -> FilterContext {
        match self {
            FeedKind::Home => FilterContext::Home,
            FeedKind::NotificationsAll
            | FeedKind::NotificationsMentionsOnly
            | FeedKind::NotificationsWithAccount(_) => FilterContext::Notifications,
        }
    }
}
