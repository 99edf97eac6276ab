// SPDX-License-Identifier: MPL-2.0

//! Remote-fetch boundary.
//!
//! The engine only ever talks to the server through [`FeedSource`], so loaders
//! and the filter service can be driven by any implementation.

mod client;

pub use client::MastodonClient;

use crate::feed::FeedKind;
use crate::model::{Filter, GroupedNotifications, Notification, Relationship, Status};
use crate::state::AuthenticationBox;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("not authenticated")]
    NotAuthenticated,
}

/// What a loader asks the source for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub kind: FeedKind,
    /// Exclusive upper-bound cursor (`max_id`)
    pub older_than: Option<String>,
    pub grouped: bool,
    pub limit: u32,
}

/// One page of typed entities. Decoded as a unit: one bad entity fails the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Statuses(Vec<Status>),
    Notifications(Vec<Notification>),
    Grouped(GroupedNotifications),
}

impl Page {
    pub fn len(&self) -> usize {
        match self {
            Page::Statuses(statuses) => statuses.len(),
            Page::Notifications(notifications) => notifications.len(),
            Page::Grouped(grouped) => grouped.notification_groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_page(
        &self,
        auth: &AuthenticationBox,
        request: &PageRequest,
    ) -> Result<Page, ClientError>;

    async fn fetch_relationships(
        &self,
        auth: &AuthenticationBox,
        account_ids: &[String],
    ) -> Result<Vec<Relationship>, ClientError>;

    async fn fetch_filters(&self, auth: &AuthenticationBox) -> Result<Vec<Filter>, ClientError>;

    async fn set_favourite(
        &self,
        auth: &AuthenticationBox,
        status_id: &str,
        favourite: bool,
    ) -> Result<Status, ClientError>;

    async fn set_bookmark(
        &self,
        auth: &AuthenticationBox,
        status_id: &str,
        bookmark: bool,
    ) -> Result<Status, ClientError>;

    /// Returns the reblog wrapper when reblogging, the original status when undoing
    async fn set_reblog(
        &self,
        auth: &AuthenticationBox,
        status_id: &str,
        reblog: bool,
    ) -> Result<Status, ClientError>;

    async fn delete_status(
        &self,
        auth: &AuthenticationBox,
        status_id: &str,
    ) -> Result<Status, ClientError>;

    async fn respond_to_follow_request(
        &self,
        auth: &AuthenticationBox,
        account_id: &str,
        accept: bool,
    ) -> Result<Relationship, ClientError>;
}
