// SPDX-License-Identifier: MPL-2.0

//! User intents that go to the server first and then into every open list.

use crate::api::FeedSource;
use crate::cache::{FollowRequestState, IdentityCache};
use crate::feed::FeedError;
use crate::model::{Notification, NotificationType, Status};
use crate::propagate::{MutationPropagator, PropagationReport, PropagationTarget};
use crate::state::CurrentSession;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Actions {
    source: Arc<dyn FeedSource>,
    session: Arc<CurrentSession>,
    cache: Arc<IdentityCache>,
    propagator: MutationPropagator,
}

impl Actions {
    pub fn new(
        source: Arc<dyn FeedSource>,
        session: Arc<CurrentSession>,
        cache: Arc<IdentityCache>,
    ) -> Self {
        let propagator = MutationPropagator::new(Arc::clone(&cache));
        Self {
            source,
            session,
            cache,
            propagator,
        }
    }

    pub fn propagator(&self) -> &MutationPropagator {
        &self.propagator
    }

    /// Favourite or unfavourite the status shown by `status`
    pub async fn toggle_favorite(
        &self,
        status: &Status,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> Result<PropagationReport, FeedError> {
        let auth = self.session.require()?;
        let content = status.content_status();
        let updated = self
            .source
            .set_favourite(&auth, &content.id, !content.favourited)
            .await?;
        Ok(self.propagator.handle_favorite(updated, targets))
    }

    pub async fn toggle_bookmark(
        &self,
        status: &Status,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> Result<PropagationReport, FeedError> {
        let auth = self.session.require()?;
        let content = status.content_status();
        let updated = self
            .source
            .set_bookmark(&auth, &content.id, !content.bookmarked)
            .await?;
        Ok(self.propagator.handle_bookmark(updated, targets))
    }

    /// Reblog the status shown by `status`, or undo the viewer's reblog of it.
    pub async fn toggle_reblog(
        &self,
        status: &Status,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> Result<PropagationReport, FeedError> {
        let auth = self.session.require()?;
        let content = status.content_status();
        let reblogged = !content.reblogged;
        let updated = self.source.set_reblog(&auth, &content.id, reblogged).await?;
        Ok(self.propagator.handle_reblog(updated, reblogged, targets))
    }

    pub async fn delete(
        &self,
        status: &Status,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> Result<PropagationReport, FeedError> {
        let auth = self.session.require()?;
        let deleted = self.source.delete_status(&auth, &status.id).await?;
        Ok(self.propagator.handle_delete(deleted, targets))
    }

    /// Flip the viewer's local content-warning choice. No network call.
    pub fn toggle_sensitive(
        &self,
        status: &Status,
        targets: &mut [&mut dyn PropagationTarget],
    ) -> PropagationReport {
        let mut toggled = self
            .cache
            .status(&status.id)
            .map_or_else(|| status.clone(), |cached| cached.as_ref().clone());
        toggled.sensitive_toggled = !toggled.sensitive_toggled;
        self.propagator.handle_sensitivity_toggle(toggled, targets)
    }

    /// Accept or reject the follow request behind `notification`.
    ///
    /// The transient state is visible in the cache while the call runs. A
    /// second answer while one is in flight is ignored.
    pub async fn respond_to_follow_request(
        &self,
        notification: &Notification,
        accept: bool,
    ) -> Result<FollowRequestState, FeedError> {
        if notification.kind != NotificationType::FollowRequest {
            warn!(notification_id = %notification.id, "not a follow request");
            return Ok(self.cache.follow_request_state(&notification.id));
        }

        let current = self.cache.follow_request_state(&notification.id);
        if current.is_transient() {
            debug!(notification_id = %notification.id, "follow request answer already in flight");
            return Ok(current);
        }

        let auth = self.session.require()?;
        self.cache
            .set_follow_request_state(&notification.id, FollowRequestState::in_flight(accept));

        match self
            .source
            .respond_to_follow_request(&auth, &notification.account.id, accept)
            .await
        {
            Ok(relationship) => {
                let settled = FollowRequestState::settled(accept);
                self.cache.upsert(relationship);
                self.cache.set_follow_request_state(&notification.id, settled);
                Ok(settled)
            }
            Err(e) => {
                self.cache
                    .set_follow_request_state(&notification.id, FollowRequestState::None);
                Err(e.into())
            }
        }
    }
}
