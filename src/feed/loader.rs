// SPDX-License-Identifier: MPL-2.0

use crate::api::{FeedSource, Page, PageRequest};
use crate::cache::{CachedItem, FeedItemIdentifier, IdentityCache};
use crate::feed::{
    DeduplicationPolicy, FeedError, FeedKind, ItemIdentifier, LoadOutcome, removing_duplicates,
};
use crate::filter::{FilterResult, FilterSnapshot, FilterUpdates};
use crate::model::{FilterContext, Status};
use crate::propagate::{Mutation, PropagationReport, PropagationTarget};
use crate::state::{AuthenticationBox, CurrentSession, EngineSettings};
use std::sync::{Arc, RwLock, Weak};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Everything a loader shares with the rest of the engine
#[derive(Clone)]
pub struct FeedContext {
    pub source: Arc<dyn FeedSource>,
    pub cache: Arc<IdentityCache>,
    pub session: Arc<CurrentSession>,
    pub filters: FilterUpdates,
    pub settings: EngineSettings,
}

/// Owns one ordered, filtered list of feed rows.
///
/// Only the loader writes to its list. Other components change it through
/// the [`PropagationTarget`] entry point, observers through [`subscribe`].
///
/// [`subscribe`]: FeedLoader::subscribe
pub struct FeedLoader {
    inner: Arc<LoaderInner>,
    refilter: JoinHandle<()>,
}

struct LoaderInner {
    context: FeedContext,
    kind: RwLock<FeedKind>,
    policy: DeduplicationPolicy,
    records: watch::Sender<Vec<ItemIdentifier>>,
    /// Held for the whole of a load; at most one load runs at a time
    gate: Mutex<()>,
}

impl FeedLoader {
    /// Create an empty loader using the configured deduplication policy.
    ///
    /// Must be called inside a Tokio runtime: the loader spawns a task that
    /// re-filters the list whenever a new filter snapshot is published.
    pub fn new(context: FeedContext, kind: FeedKind) -> Self {
        let policy = context.settings.dedup_policy;
        Self::with_policy(context, kind, policy)
    }

    pub fn with_policy(context: FeedContext, kind: FeedKind, policy: DeduplicationPolicy) -> Self {
        let (records, _) = watch::channel(Vec::new());
        let mut updates = context.filters.clone();
        let inner = Arc::new(LoaderInner {
            context,
            kind: RwLock::new(kind),
            policy,
            records,
            gate: Mutex::new(()),
        });

        // The snapshot in place now is applied by the next load, not here
        updates.borrow_and_update();
        let weak: Weak<LoaderInner> = Arc::downgrade(&inner);
        let refilter = tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.refilter();
            }
        });

        Self { inner, refilter }
    }

    /// Kind of the most recent load
    pub fn kind(&self) -> FeedKind {
        self.inner.kind.read().expect("loader lock poisoned").clone()
    }

    pub fn policy(&self) -> DeduplicationPolicy {
        self.inner.policy
    }

    /// Current rows, in display order
    pub fn records(&self) -> Vec<ItemIdentifier> {
        self.inner.records.borrow().clone()
    }

    /// Observe the list. Every replace, append, re-filter and propagated
    /// change marks the receiver as changed.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ItemIdentifier>> {
        self.inner.records.subscribe()
    }

    /// The cached entity behind a row. `None` for sentinel rows, rows whose
    /// entity is not cached yet, and deleted statuses.
    pub fn resolve(&self, row: &ItemIdentifier) -> Option<CachedItem> {
        row.entity()
            .and_then(|entity| self.inner.context.cache.lookup(&entity))
    }

    pub fn is_loading(&self) -> bool {
        self.inner.gate.try_lock().is_err()
    }

    /// Fetch the first page of `kind` and replace the list with it.
    ///
    /// Waits for any load already in flight. On failure the list is left as
    /// it was.
    pub async fn load_initial(&self, kind: &FeedKind) -> Result<LoadOutcome, FeedError> {
        let _gate = self.inner.gate.lock().await;
        self.inner.load_initial(kind).await
    }

    /// Fetch the page after the last row and append it.
    ///
    /// An empty list cannot be paged from, so this falls back to
    /// [`load_initial`](Self::load_initial). A call made while another load
    /// is running returns [`LoadOutcome::Coalesced`] without fetching.
    pub async fn load_next(&self, kind: &FeedKind) -> Result<LoadOutcome, FeedError> {
        let Ok(_gate) = self.inner.gate.try_lock() else {
            debug!(?kind, "load already in flight, coalescing");
            return Ok(LoadOutcome::Coalesced);
        };

        let last = self.inner.records.borrow().last().cloned();
        let Some(cursor) = last.and_then(|row| self.inner.cursor_for(&row)) else {
            return self.inner.load_initial(kind).await;
        };

        let rows = self.inner.fetch(kind, Some(cursor)).await?;
        Ok(self.inner.append(rows))
    }

    /// Re-apply the current filter snapshot to the rows in the list.
    ///
    /// Returns how many rows were dropped.
    pub fn refilter(&self) -> usize {
        self.inner.refilter()
    }
}

impl Drop for FeedLoader {
    fn drop(&mut self) {
        self.refilter.abort();
    }
}

impl PropagationTarget for FeedLoader {
    fn apply_mutation(&mut self, mutation: &Mutation) -> PropagationReport {
        self.inner.apply_mutation(mutation)
    }
}

impl LoaderInner {
    fn filter_context(&self) -> FilterContext {
        self.kind
            .read()
            .expect("loader lock poisoned")
            .filter_context()
    }

    fn snapshot(&self) -> Option<Arc<FilterSnapshot>> {
        self.context.filters.borrow().clone()
    }

    async fn load_initial(&self, kind: &FeedKind) -> Result<LoadOutcome, FeedError> {
        let rows = self.fetch(kind, None).await?;
        let rows = removing_duplicates(rows);
        let count = rows.len();
        self.records.send_replace(rows);
        debug!(?kind, count, "replaced feed");
        Ok(LoadOutcome::Replaced(count))
    }

    fn append(&self, rows: Vec<ItemIdentifier>) -> LoadOutcome {
        let mut appended = 0;
        self.records.send_modify(|records| {
            let before = records.len();
            *records = self.policy.merge(records, rows);
            appended = records.len().saturating_sub(before);
        });
        debug!(appended, policy = ?self.policy, "appended page");
        LoadOutcome::Appended(appended)
    }

    /// Fetch, cache and filter one page. Nothing is written to the list here.
    async fn fetch(
        &self,
        kind: &FeedKind,
        older_than: Option<String>,
    ) -> Result<Vec<ItemIdentifier>, FeedError> {
        let auth = self.context.session.require()?;
        let request = PageRequest {
            kind: kind.clone(),
            older_than,
            grouped: self.context.settings.use_grouped_notifications && kind.is_notifications(),
            limit: self.context.settings.page_limit,
        };

        let page = self.context.source.fetch_page(&auth, &request).await?;
        debug!(?kind, cursor = ?request.older_than, count = page.len(), "fetched page");
        let rows = self.ingest(&auth, page).await?;

        *self.kind.write().expect("loader lock poisoned") = kind.clone();
        Ok(self.filter_rows(rows, self.snapshot().as_deref(), kind.filter_context()))
    }

    /// Cache every entity in the page and return the page's rows in order.
    ///
    /// All remote calls happen before the first upsert, so a failed page
    /// leaves the cache untouched.
    async fn ingest(
        &self,
        auth: &AuthenticationBox,
        page: Page,
    ) -> Result<Vec<ItemIdentifier>, FeedError> {
        let cache = &self.context.cache;

        match page {
            Page::Statuses(statuses) => {
                let rows = statuses
                    .iter()
                    .map(|status| ItemIdentifier::Status(status.id.clone()))
                    .collect();
                cache.upsert_all(statuses);
                Ok(rows)
            }
            Page::Notifications(notifications) => {
                let mut account_ids: Vec<String> = Vec::new();
                for notification in &notifications {
                    if !account_ids.contains(&notification.account.id) {
                        account_ids.push(notification.account.id.clone());
                    }
                }
                let relationships = if account_ids.is_empty() {
                    Vec::new()
                } else {
                    self.context
                        .source
                        .fetch_relationships(auth, &account_ids)
                        .await?
                };

                let rows = notifications
                    .iter()
                    .map(|notification| ItemIdentifier::Notification(notification.id.clone()))
                    .collect();
                cache.upsert_all(relationships);
                cache.upsert_all(notifications);
                Ok(rows)
            }
            Page::Grouped(grouped) => {
                let rows = grouped
                    .notification_groups
                    .iter()
                    .map(|group| ItemIdentifier::NotificationGroup(group.id.clone()))
                    .collect();
                cache.upsert_all(grouped.accounts);
                cache.upsert_all(grouped.partial_accounts.unwrap_or_default());
                cache.upsert_all(grouped.statuses);
                cache.upsert_all(grouped.notification_groups);
                Ok(rows)
            }
        }
    }

    /// Paging cursor for the row at the end of the list.
    ///
    /// Groups page by the oldest notification they cover, not by group key.
    fn cursor_for(&self, row: &ItemIdentifier) -> Option<String> {
        match row {
            ItemIdentifier::NotificationGroup(id) => {
                let group = self.context.cache.notification_group(id);
                group
                    .and_then(|group| {
                        group
                            .page_min_id
                            .clone()
                            .or_else(|| group.most_recent_notification_id.clone())
                    })
                    .or_else(|| Some(id.clone()))
            }
            other => other.id().map(str::to_string),
        }
    }

    fn filter_rows(
        &self,
        rows: Vec<ItemIdentifier>,
        snapshot: Option<&FilterSnapshot>,
        context: FilterContext,
    ) -> Vec<ItemIdentifier> {
        rows.into_iter()
            .filter(|row| self.is_visible(row, snapshot, context))
            .collect()
    }

    fn is_visible(
        &self,
        row: &ItemIdentifier,
        snapshot: Option<&FilterSnapshot>,
        context: FilterContext,
    ) -> bool {
        let Some(entity) = row.entity() else {
            return true;
        };
        let cache = &self.context.cache;
        if cache.references_deleted_status(&entity) {
            return false;
        }
        let (Some(status), Some(snapshot)) = (cache.filterable_status(&entity), snapshot) else {
            return true;
        };
        snapshot.apply(&status, context) != FilterResult::Hide
    }

    fn refilter(&self) -> usize {
        let snapshot = self.snapshot();
        let context = self.filter_context();
        let mut dropped = 0;

        // Only the rows still in the list are re-judged. A row hidden earlier
        // stays gone even if the rules loosen; it comes back only with a new
        // fetch. This is intended.
        self.records.send_if_modified(|records| {
            let before = records.len();
            records.retain(|row| self.is_visible(row, snapshot.as_deref(), context));
            dropped = before - records.len();
            dropped > 0
        });

        debug!(dropped, "re-filtered feed");
        dropped
    }

    fn apply_mutation(&self, mutation: &Mutation) -> PropagationReport {
        let cache = &self.context.cache;

        if let Mutation::Delete(deleted) = mutation {
            let mut removed = 0;
            self.records.send_if_modified(|records| {
                let before = records.len();
                records.retain(|row| {
                    row.entity()
                        .and_then(|entity| cache.associated_status_id(&entity))
                        .is_none_or(|status_id| status_id != deleted.id)
                });
                removed = before - records.len();
                removed > 0
            });
            return PropagationReport::removed(removed);
        }

        let rows = self.records.borrow().clone();
        let statuses: Vec<Option<Arc<Status>>> = rows
            .iter()
            .map(|row| {
                row.entity()
                    .and_then(|entity| cache.filterable_status(&entity))
            })
            .collect();
        let views: Vec<Option<&Status>> = statuses.iter().map(Option::as_deref).collect();
        let Some(index) = mutation.locate(&views) else {
            return PropagationReport::default();
        };

        let replacement = mutation.replacement_for(views[index]);
        let target = rows[index].clone();
        let Some(updated) = self.repoint(&target, replacement) else {
            warn!(row = %target.row_id(), "row no longer resolves; not updated");
            return PropagationReport::default();
        };

        self.records.send_modify(|records| {
            if let Some(row) = records.iter_mut().find(|row| **row == target) {
                *row = updated;
            }
            *records = removing_duplicates(std::mem::take(records));
        });
        PropagationReport::replaced(1)
    }

    /// Point `row` at `status`, writing through the cache record it resolves
    /// through. Returns the row to keep in the list.
    fn repoint(&self, row: &ItemIdentifier, status: Status) -> Option<ItemIdentifier> {
        let cache = &self.context.cache;

        match row.entity()? {
            FeedItemIdentifier::Status(_) => {
                let id = status.id.clone();
                cache.upsert(status);
                Some(ItemIdentifier::Status(id))
            }
            FeedItemIdentifier::Notification(id) => {
                let mut notification = cache.notification(&id)?.as_ref().clone();
                notification.status = Some(status);
                cache.upsert(notification);
                Some(row.clone())
            }
            FeedItemIdentifier::NotificationGroup(id) => {
                let group = cache.notification_group(&id)?;
                if group.status_id.as_deref() != Some(status.id.as_str()) {
                    let mut group = group.as_ref().clone();
                    group.status_id = Some(status.id.clone());
                    cache.upsert(group);
                }
                cache.upsert(status);
                Some(row.clone())
            }
        }
    }
}
