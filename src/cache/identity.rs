// SPDX-License-Identifier: MPL-2.0

use crate::cache::{CacheRecord, CachedItem, FeedItemIdentifier, FollowRequestState};
use crate::model::{
    Account, AccountRecord, Notification, NotificationGroup, PartialAccount, Relationship, Status,
};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

static SHARED: Lazy<Arc<IdentityCache>> = Lazy::new(|| Arc::new(IdentityCache::new()));

#[derive(Default)]
struct Tables {
    statuses: HashMap<String, Arc<Status>>,
    notifications: HashMap<String, Arc<Notification>>,
    groups: HashMap<String, Arc<NotificationGroup>>,
    full_accounts: HashMap<String, Arc<Account>>,
    partial_accounts: HashMap<String, Arc<PartialAccount>>,
    /// Keyed by target account ID
    relationships: HashMap<String, Arc<Relationship>>,
    /// Keyed by follow request notification ID
    follow_requests: HashMap<String, FollowRequestState>,
    /// Status IDs deleted locally. Their records may linger but never resolve.
    tombstones: HashSet<String>,
}

/// What the viewer's menu for an author should offer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorMenuContext {
    pub is_myself: bool,
    pub is_muting: bool,
    pub is_blocking: bool,
}

/// Keyed store of canonical records.
///
/// Every write replaces the whole record under its key while holding the
/// write lock, so a reader sees either the old record or the new one.
/// Readers already holding an `Arc` to an old record are not told about the
/// replacement; rewriting open lists is the propagator's job.
pub struct IdentityCache {
    tables: RwLock<Tables>,
}

impl Default for IdentityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityCache {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// The process-wide instance
    pub fn shared() -> Arc<IdentityCache> {
        Arc::clone(&SHARED)
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().expect("cache lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().expect("cache lock poisoned")
    }

    /// Store a record, replacing whatever was cached under the same key.
    pub fn upsert(&self, record: impl Into<CacheRecord>) {
        let mut tables = self.write();
        Self::store(&mut tables, record.into());
    }

    /// Store several records under a single write lock
    pub fn upsert_all<I>(&self, records: I)
    where
        I: IntoIterator,
        I::Item: Into<CacheRecord>,
    {
        let mut tables = self.write();
        for record in records {
            Self::store(&mut tables, record.into());
        }
    }

    fn store(tables: &mut Tables, record: CacheRecord) {
        match record {
            CacheRecord::Account(account) => {
                Self::store_account(tables, AccountRecord::Full(Arc::new(account)));
            }
            CacheRecord::PartialAccount(account) => {
                Self::store_account(tables, AccountRecord::Partial(Arc::new(account)));
            }
            CacheRecord::Status(status) => Self::store_status(tables, status),
            CacheRecord::Notification(notification) => {
                Self::store(tables, CacheRecord::Account(notification.account.clone()));
                if let Some(status) = &notification.status {
                    Self::store_status(tables, status.clone());
                }
                tables
                    .notifications
                    .insert(notification.id.clone(), Arc::new(notification));
            }
            CacheRecord::NotificationGroup(group) => {
                tables.groups.insert(group.id.clone(), Arc::new(group));
            }
            CacheRecord::Relationship(relationship) => {
                tables
                    .relationships
                    .insert(relationship.id.clone(), Arc::new(relationship));
            }
        }
    }

    fn store_status(tables: &mut Tables, status: Status) {
        if tables.tombstones.contains(&status.id) {
            debug!(status_id = %status.id, "ignoring upsert of deleted status");
            return;
        }
        Self::store_account(tables, AccountRecord::Full(Arc::new(status.account.clone())));
        if let Some(reblog) = &status.reblog {
            Self::store_account(tables, AccountRecord::Full(Arc::new(reblog.account.clone())));
        }
        tables.statuses.insert(status.id.clone(), Arc::new(status));
    }

    /// Merge an account into whichever tier it ends up in. Once the full
    /// record is known the partial placeholder is dropped.
    fn store_account(tables: &mut Tables, record: AccountRecord) {
        let id = record.id().to_string();
        let current = tables
            .full_accounts
            .get(&id)
            .cloned()
            .map(AccountRecord::Full)
            .or_else(|| {
                tables
                    .partial_accounts
                    .get(&id)
                    .cloned()
                    .map(AccountRecord::Partial)
            });
        let merged = match current {
            Some(current) => current.upgrade(record),
            None => record,
        };

        match merged {
            AccountRecord::Full(account) => {
                tables.partial_accounts.remove(&id);
                tables.full_accounts.insert(id, account);
            }
            AccountRecord::Partial(account) => {
                tables.partial_accounts.insert(id, account);
            }
        }
    }

    /// Look up the record behind a feed identifier.
    ///
    /// `None` means the fetch is still pending or the entity was deleted.
    pub fn lookup(&self, identifier: &FeedItemIdentifier) -> Option<CachedItem> {
        match identifier {
            FeedItemIdentifier::Status(id) => self.status(id).map(CachedItem::Status),
            FeedItemIdentifier::Notification(id) => {
                self.notification(id).map(CachedItem::Notification)
            }
            FeedItemIdentifier::NotificationGroup(id) => {
                self.notification_group(id).map(CachedItem::NotificationGroup)
            }
        }
    }

    pub fn status(&self, id: &str) -> Option<Arc<Status>> {
        let tables = self.read();
        if tables.tombstones.contains(id) {
            return None;
        }
        tables.statuses.get(id).cloned()
    }

    pub fn notification(&self, id: &str) -> Option<Arc<Notification>> {
        self.read().notifications.get(id).cloned()
    }

    pub fn notification_group(&self, id: &str) -> Option<Arc<NotificationGroup>> {
        self.read().groups.get(id).cloned()
    }

    /// Resolve an account, preferring the full record when `prefer_full` is set.
    ///
    /// The partial tier only holds accounts whose full record is not known yet.
    pub fn account(&self, id: &str, prefer_full: bool) -> Option<AccountRecord> {
        let tables = self.read();
        let full = tables.full_accounts.get(id).cloned().map(AccountRecord::Full);
        let partial = tables
            .partial_accounts
            .get(id)
            .cloned()
            .map(AccountRecord::Partial);
        if prefer_full {
            full.or(partial)
        } else {
            partial.or(full)
        }
    }

    pub fn full_account(&self, id: &str) -> Option<Arc<Account>> {
        self.read().full_accounts.get(id).cloned()
    }

    pub fn partial_account(&self, id: &str) -> Option<Arc<PartialAccount>> {
        self.read().partial_accounts.get(id).cloned()
    }

    /// Cached relationship between the viewer and `account_id`; may be stale
    pub fn relationship(&self, account_id: &str) -> Option<Arc<Relationship>> {
        self.read().relationships.get(account_id).cloned()
    }

    pub fn follow_request_state(&self, notification_id: &str) -> FollowRequestState {
        self.read()
            .follow_requests
            .get(notification_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_follow_request_state(&self, notification_id: &str, state: FollowRequestState) {
        let mut tables = self.write();
        if state == FollowRequestState::None {
            tables.follow_requests.remove(notification_id);
        } else {
            tables
                .follow_requests
                .insert(notification_id.to_string(), state);
        }
    }

    /// Tombstone a status. Later upserts of the same ID are ignored.
    pub fn mark_deleted(&self, status_id: &str) {
        self.write().tombstones.insert(status_id.to_string());
    }

    pub fn is_deleted(&self, status_id: &str) -> bool {
        self.read().tombstones.contains(status_id)
    }

    /// The status a filter should judge for this row, if any.
    pub fn filterable_status(&self, identifier: &FeedItemIdentifier) -> Option<Arc<Status>> {
        let tables = self.read();
        let status_id = Self::status_id_for(&tables, identifier)?;
        if tables.tombstones.contains(&status_id) {
            return None;
        }
        if let Some(status) = tables.statuses.get(&status_id) {
            return Some(Arc::clone(status));
        }
        // Fall back to the copy embedded in the notification itself
        match identifier {
            FeedItemIdentifier::Notification(id) => tables
                .notifications
                .get(id)
                .and_then(|notification| notification.status.clone())
                .map(Arc::new),
            _ => None,
        }
    }

    /// ID of the status this row is about, even if that status was deleted
    pub fn associated_status_id(&self, identifier: &FeedItemIdentifier) -> Option<String> {
        Self::status_id_for(&self.read(), identifier)
    }

    fn status_id_for(tables: &Tables, identifier: &FeedItemIdentifier) -> Option<String> {
        match identifier {
            FeedItemIdentifier::Status(id) => Some(id.clone()),
            FeedItemIdentifier::Notification(id) => tables
                .notifications
                .get(id)
                .and_then(|notification| notification.status.as_ref())
                .map(|status| status.id.clone()),
            FeedItemIdentifier::NotificationGroup(id) => {
                tables.groups.get(id).and_then(|group| group.status_id.clone())
            }
        }
    }

    /// Whether this row points at a status that has been deleted locally
    pub fn references_deleted_status(&self, identifier: &FeedItemIdentifier) -> bool {
        let tables = self.read();
        Self::status_id_for(&tables, identifier)
            .is_some_and(|status_id| tables.tombstones.contains(&status_id))
    }

    pub fn author_menu_context(&self, viewer_id: &str, account_id: &str) -> AuthorMenuContext {
        let relationship = self.relationship(account_id);
        AuthorMenuContext {
            is_myself: viewer_id == account_id,
            is_muting: relationship.as_ref().is_some_and(|r| r.muting),
            is_blocking: relationship
                .as_ref()
                .is_some_and(|r| r.blocking || r.domain_blocking),
        }
    }
}
