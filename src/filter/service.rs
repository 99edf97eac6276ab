// SPDX-License-Identifier: MPL-2.0

use crate::api::FeedSource;
use crate::feed::FeedError;
use crate::filter::FilterSnapshot;
use crate::state::CurrentSession;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Receiving end of published snapshots. `None` until the first fetch succeeds.
pub type FilterUpdates = watch::Receiver<Option<Arc<FilterSnapshot>>>;

/// Keeps the active filter snapshot current.
///
/// Rebuilds on a fixed interval, whenever the app reports it resumed, and
/// once at startup. A rebuild equal to the published snapshot is dropped so
/// loaders are not asked to re-filter for nothing.
pub struct FilterService {
    source: Arc<dyn FeedSource>,
    session: Arc<CurrentSession>,
    active: watch::Sender<Option<Arc<FilterSnapshot>>>,
    resumed: Arc<Notify>,
    interval: Duration,
}

impl FilterService {
    pub fn new(
        source: Arc<dyn FeedSource>,
        session: Arc<CurrentSession>,
        interval: Duration,
    ) -> Arc<Self> {
        let (active, _) = watch::channel(None);
        Arc::new(Self {
            source,
            session,
            active,
            resumed: Arc::new(Notify::new()),
            interval,
        })
    }

    pub fn subscribe(&self) -> FilterUpdates {
        self.active.subscribe()
    }

    /// The currently published snapshot
    pub fn active(&self) -> Option<Arc<FilterSnapshot>> {
        self.active.borrow().clone()
    }

    /// Signal that the app came back to the foreground
    pub fn app_resumed(&self) {
        self.resumed.notify_one();
    }

    /// Fetch rules and publish a new snapshot if it differs from the current one.
    ///
    /// Returns whether a snapshot was published.
    pub async fn refresh(&self) -> Result<bool, FeedError> {
        self.refresh_at(Utc::now()).await
    }

    pub async fn refresh_at(&self, now: DateTime<Utc>) -> Result<bool, FeedError> {
        let auth = self.session.require()?;
        let filters = self.source.fetch_filters(&auth).await?;
        let snapshot = FilterSnapshot::build(filters, now);

        let published = self.active.send_if_modified(|current| {
            if current.as_deref() == Some(&snapshot) {
                return false;
            }
            *current = Some(Arc::new(snapshot));
            true
        });

        if published {
            info!(
                rules = self.active.borrow().as_ref().map_or(0, |s| s.filters().count()),
                "published filter snapshot"
            );
        } else {
            debug!("filter rules unchanged");
        }
        Ok(published)
    }

    /// Run the refresh loop in the background.
    ///
    /// The first tick fires immediately, which covers the startup rebuild. The
    /// task ends once the service itself is dropped.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let service: Weak<FilterService> = Arc::downgrade(self);
        let resumed = Arc::clone(&self.resumed);
        let period = self.interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = resumed.notified() => debug!("app resumed, refreshing filters"),
                }

                let Some(service) = service.upgrade() else {
                    break;
                };
                if let Err(e) = service.refresh().await {
                    warn!("filter refresh failed: {e}");
                }
            }
        })
    }
}
