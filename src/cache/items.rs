// SPDX-License-Identifier: MPL-2.0

use crate::model::{
    Account, Notification, NotificationGroup, PartialAccount, Relationship, Status,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cache key for an entity that can appear as a row in a feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum FeedItemIdentifier {
    Status(String),
    Notification(String),
    NotificationGroup(String),
}

impl FeedItemIdentifier {
    pub fn id(&self) -> &str {
        match self {
            FeedItemIdentifier::Status(id)
            | FeedItemIdentifier::Notification(id)
            | FeedItemIdentifier::NotificationGroup(id) => id,
        }
    }
}

/// A cached entity as returned by a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CachedItem {
    Status(Arc<Status>),
    Notification(Arc<Notification>),
    NotificationGroup(Arc<NotificationGroup>),
}

/// Anything that can be written into the cache
#[derive(Debug, Clone, PartialEq)]
pub enum CacheRecord {
    Account(Account),
    PartialAccount(PartialAccount),
    Status(Status),
    Notification(Notification),
    NotificationGroup(NotificationGroup),
    Relationship(Relationship),
}

impl From<Account> for CacheRecord {
    fn from(value: Account) -> Self {
        CacheRecord::Account(value)
    }
}

impl From<PartialAccount> for CacheRecord {
    fn from(value: PartialAccount) -> Self {
        CacheRecord::PartialAccount(value)
    }
}

impl From<Status> for CacheRecord {
    fn from(value: Status) -> Self {
        CacheRecord::Status(value)
    }
}

impl From<Notification> for CacheRecord {
    fn from(value: Notification) -> Self {
        CacheRecord::Notification(value)
    }
}

impl From<NotificationGroup> for CacheRecord {
    fn from(value: NotificationGroup) -> Self {
        CacheRecord::NotificationGroup(value)
    }
}

impl From<Relationship> for CacheRecord {
    fn from(value: Relationship) -> Self {
        CacheRecord::Relationship(value)
    }
}
