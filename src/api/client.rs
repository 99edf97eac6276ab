// SPDX-License-Identifier: MPL-2.0

use crate::api::{ClientError, FeedSource, Page, PageRequest};
use crate::config::user_agent;
use crate::feed::FeedKind;
use crate::model::{Filter, GroupedNotifications, Notification, Relationship, Status};
use crate::state::AuthenticationBox;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

type Query = Vec<(&'static str, String)>;

/// Body of a Mastodon error response
#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Talks to a Mastodon-compatible REST API so the rest of the engine only sees our own types.
pub struct MastodonClient {
    http: reqwest::Client,
}

impl MastodonClient {
    pub fn new() -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent())
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { http })
    }

    fn endpoint(auth: &AuthenticationBox, path: &str) -> Result<Url, ClientError> {
        Ok(auth.instance.join(path)?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        auth: &AuthenticationBox,
        path: &str,
        query: &Query,
    ) -> Result<T, ClientError> {
        let url = Self::endpoint(auth, path)?;
        debug!(%url, ?query, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(&auth.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        auth: &AuthenticationBox,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = Self::endpoint(auth, path)?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .bearer_auth(&auth.access_token)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn delete<T: DeserializeOwned>(
        &self,
        auth: &AuthenticationBox,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = Self::endpoint(auth, path)?;
        debug!(%url, "DELETE");
        let response = self
            .http
            .delete(url)
            .bearer_auth(&auth.access_token)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// Decode a whole response body. Any malformed entity fails the whole page.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::NotAuthenticated);
        }
        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    fn page_query(request: &PageRequest) -> Query {
        let mut query = vec![("limit", request.limit.to_string())];
        if let Some(max_id) = &request.older_than {
            query.push(("max_id", max_id.clone()));
        }
        match &request.kind {
            FeedKind::NotificationsMentionsOnly => query.push(("types[]", "mention".to_string())),
            FeedKind::NotificationsWithAccount(account_id) => {
                query.push(("account_id", account_id.clone()))
            }
            FeedKind::Home | FeedKind::NotificationsAll => {}
        }
        if request.grouped && request.kind.is_notifications() {
            query.push(("expand_accounts", "partial_avatars".to_string()));
        }
        query
    }
}

#[async_trait]
impl FeedSource for MastodonClient {
    async fn fetch_page(
        &self,
        auth: &AuthenticationBox,
        request: &PageRequest,
    ) -> Result<Page, ClientError> {
        let query = Self::page_query(request);

        if !request.kind.is_notifications() {
            let statuses: Vec<Status> = self.get(auth, "/api/v1/timelines/home", &query).await?;
            return Ok(Page::Statuses(statuses));
        }

        if request.grouped {
            let grouped: GroupedNotifications =
                self.get(auth, "/api/v2/notifications", &query).await?;
            Ok(Page::Grouped(grouped))
        } else {
            let notifications: Vec<Notification> =
                self.get(auth, "/api/v1/notifications", &query).await?;
            Ok(Page::Notifications(notifications))
        }
    }

    async fn fetch_relationships(
        &self,
        auth: &AuthenticationBox,
        account_ids: &[String],
    ) -> Result<Vec<Relationship>, ClientError> {
        if account_ids.is_empty() {
            return Ok(vec![]);
        }

        let query: Query = account_ids
            .iter()
            .map(|id| ("id[]", id.clone()))
            .collect();
        self.get(auth, "/api/v1/accounts/relationships", &query)
            .await
    }

    async fn fetch_filters(&self, auth: &AuthenticationBox) -> Result<Vec<Filter>, ClientError> {
        self.get(auth, "/api/v2/filters", &Vec::new()).await
    }

    async fn set_favourite(
        &self,
        auth: &AuthenticationBox,
        status_id: &str,
        favourite: bool,
    ) -> Result<Status, ClientError> {
        let action = if favourite { "favourite" } else { "unfavourite" };
        self.post(auth, &format!("/api/v1/statuses/{status_id}/{action}"))
            .await
    }

    async fn set_bookmark(
        &self,
        auth: &AuthenticationBox,
        status_id: &str,
        bookmark: bool,
    ) -> Result<Status, ClientError> {
        let action = if bookmark { "bookmark" } else { "unbookmark" };
        self.post(auth, &format!("/api/v1/statuses/{status_id}/{action}"))
            .await
    }

    async fn set_reblog(
        &self,
        auth: &AuthenticationBox,
        status_id: &str,
        reblog: bool,
    ) -> Result<Status, ClientError> {
        let action = if reblog { "reblog" } else { "unreblog" };
        self.post(auth, &format!("/api/v1/statuses/{status_id}/{action}"))
            .await
    }

    async fn delete_status(
        &self,
        auth: &AuthenticationBox,
        status_id: &str,
    ) -> Result<Status, ClientError> {
        self.delete(auth, &format!("/api/v1/statuses/{status_id}"))
            .await
    }

    async fn respond_to_follow_request(
        &self,
        auth: &AuthenticationBox,
        account_id: &str,
        accept: bool,
    ) -> Result<Relationship, ClientError> {
        let action = if accept { "authorize" } else { "reject" };
        self.post(auth, &format!("/api/v1/follow_requests/{account_id}/{action}"))
            .await
    }
}
