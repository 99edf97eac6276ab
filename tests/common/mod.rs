// SPDX-License-Identifier: MPL-2.0

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mastofeed::api::{ClientError, FeedSource, Page, PageRequest};
use mastofeed::cache::IdentityCache;
use mastofeed::feed::{FeedContext, FeedKind, FeedLoader};
use mastofeed::filter::FilterSnapshot;
use mastofeed::model::{
    Account, Filter, FilterAction, FilterContext, FilterKeyword, Notification, NotificationType,
    Relationship, Status,
};
use mastofeed::state::{AuthenticationBox, CurrentSession, EngineSettings};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, watch};
use url::Url;

pub const VIEWER_ID: &str = "me";

/// In-memory server. Pages are handed out in the order they were queued.
#[derive(Default)]
pub struct MockSource {
    pages: Mutex<VecDeque<Result<Page, ClientError>>>,
    requests: Mutex<Vec<PageRequest>>,
    relationships: Mutex<Option<Result<Vec<Relationship>, ClientError>>>,
    relationship_requests: Mutex<Vec<Vec<String>>>,
    filters: Mutex<Vec<Filter>>,
    filter_calls: AtomicUsize,
    /// When set, `fetch_page` waits for a notification before answering
    hold: Mutex<Option<Arc<Notify>>>,
    status_reply: Mutex<Option<Status>>,
    follow_reply: Mutex<Option<Result<Relationship, ClientError>>>,
    action_calls: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_page(&self, page: Page) {
        self.pages.lock().unwrap().push_back(Ok(page));
    }

    pub fn push_error(&self, error: ClientError) {
        self.pages.lock().unwrap().push_back(Err(error));
    }

    pub fn page_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn set_relationships(&self, result: Result<Vec<Relationship>, ClientError>) {
        *self.relationships.lock().unwrap() = Some(result);
    }

    pub fn relationship_requests(&self) -> Vec<Vec<String>> {
        self.relationship_requests.lock().unwrap().clone()
    }

    pub fn set_filters(&self, filters: Vec<Filter>) {
        *self.filters.lock().unwrap() = filters;
    }

    pub fn filter_calls(&self) -> usize {
        self.filter_calls.load(Ordering::SeqCst)
    }

    /// Make page fetches wait until the returned handle is notified
    pub fn hold_pages(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    /// Status returned by every status action
    pub fn reply_with_status(&self, status: Status) {
        *self.status_reply.lock().unwrap() = Some(status);
    }

    pub fn reply_to_follow_request(&self, result: Result<Relationship, ClientError>) {
        *self.follow_reply.lock().unwrap() = Some(result);
    }

    pub fn action_calls(&self) -> Vec<String> {
        self.action_calls.lock().unwrap().clone()
    }

    fn status_action(&self, call: String) -> Result<Status, ClientError> {
        self.action_calls.lock().unwrap().push(call);
        self.status_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::InvalidResponse("no reply scripted".into()))
    }
}

#[async_trait]
impl FeedSource for MockSource {
    async fn fetch_page(
        &self,
        _auth: &AuthenticationBox,
        request: &PageRequest,
    ) -> Result<Page, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        let hold = self.hold.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Page::Statuses(Vec::new())))
    }

    async fn fetch_relationships(
        &self,
        _auth: &AuthenticationBox,
        account_ids: &[String],
    ) -> Result<Vec<Relationship>, ClientError> {
        self.relationship_requests
            .lock()
            .unwrap()
            .push(account_ids.to_vec());
        match self.relationships.lock().unwrap().take() {
            Some(result) => result,
            None => Ok(account_ids
                .iter()
                .map(|id| Relationship {
                    id: id.clone(),
                    ..Default::default()
                })
                .collect()),
        }
    }

    async fn fetch_filters(&self, _auth: &AuthenticationBox) -> Result<Vec<Filter>, ClientError> {
        self.filter_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.filters.lock().unwrap().clone())
    }

    async fn set_favourite(
        &self,
        _auth: &AuthenticationBox,
        status_id: &str,
        favourite: bool,
    ) -> Result<Status, ClientError> {
        self.status_action(format!("favourite {status_id} {favourite}"))
    }

    async fn set_bookmark(
        &self,
        _auth: &AuthenticationBox,
        status_id: &str,
        bookmark: bool,
    ) -> Result<Status, ClientError> {
        self.status_action(format!("bookmark {status_id} {bookmark}"))
    }

    async fn set_reblog(
        &self,
        _auth: &AuthenticationBox,
        status_id: &str,
        reblog: bool,
    ) -> Result<Status, ClientError> {
        self.status_action(format!("reblog {status_id} {reblog}"))
    }

    async fn delete_status(
        &self,
        _auth: &AuthenticationBox,
        status_id: &str,
    ) -> Result<Status, ClientError> {
        self.status_action(format!("delete {status_id}"))
    }

    async fn respond_to_follow_request(
        &self,
        _auth: &AuthenticationBox,
        account_id: &str,
        accept: bool,
    ) -> Result<Relationship, ClientError> {
        self.action_calls
            .lock()
            .unwrap()
            .push(format!("follow_request {account_id} {accept}"));
        self.follow_reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(ClientError::InvalidResponse("no reply scripted".into())))
    }
}

/// A signed-in engine around a [`MockSource`], with a hand-driven filter channel
pub struct Harness {
    pub source: Arc<MockSource>,
    pub cache: Arc<IdentityCache>,
    pub session: Arc<CurrentSession>,
    pub filters: watch::Sender<Option<Arc<FilterSnapshot>>>,
    pub settings: EngineSettings,
}

impl Harness {
    pub fn new() -> Self {
        let (filters, _) = watch::channel(None);
        Self {
            source: MockSource::new(),
            cache: Arc::new(IdentityCache::new()),
            session: Arc::new(CurrentSession::signed_in(auth())),
            filters,
            settings: EngineSettings::default(),
        }
    }

    pub fn context(&self) -> FeedContext {
        FeedContext {
            source: self.source.clone(),
            cache: Arc::clone(&self.cache),
            session: Arc::clone(&self.session),
            filters: self.filters.subscribe(),
            settings: self.settings.clone(),
        }
    }

    pub fn loader(&self, kind: FeedKind) -> FeedLoader {
        FeedLoader::new(self.context(), kind)
    }

    pub fn publish(&self, filters: Vec<Filter>) {
        self.filters
            .send_replace(Some(Arc::new(FilterSnapshot::build(filters, Utc::now()))));
    }
}

pub fn auth() -> AuthenticationBox {
    AuthenticationBox::new(
        Url::parse("https://example.social").unwrap(),
        VIEWER_ID,
        "token",
    )
}

pub fn account(id: &str) -> Account {
    Account {
        id: id.to_string(),
        username: format!("user{id}"),
        acct: format!("user{id}@example.social"),
        ..Default::default()
    }
}

pub fn status(id: &str, text: &str) -> Status {
    Status {
        id: id.to_string(),
        account: account(&format!("author-{id}")),
        content: format!("<p>{text}</p>"),
        ..Default::default()
    }
}

/// `id` reblogging `of`
pub fn reblog(id: &str, of: Status) -> Status {
    Status {
        id: id.to_string(),
        account: account(&format!("booster-{id}")),
        reblog: Some(Box::new(of)),
        ..Default::default()
    }
}

pub fn statuses(ids: &[&str]) -> Page {
    Page::Statuses(ids.iter().map(|id| status(id, "hello")).collect())
}

pub fn notification(
    id: &str,
    kind: NotificationType,
    from: &str,
    status: Option<Status>,
) -> Notification {
    Notification {
        id: id.to_string(),
        kind,
        created_at: DateTime::<Utc>::default(),
        account: account(from),
        status,
        group_key: None,
    }
}

pub fn keyword_filter(id: &str, keyword: &str, action: FilterAction) -> Filter {
    Filter {
        id: id.to_string(),
        title: format!("rule {id}"),
        context: vec![FilterContext::Home, FilterContext::Notifications],
        expires_at: None,
        filter_action: action,
        keywords: vec![FilterKeyword {
            id: format!("kw-{id}"),
            keyword: keyword.to_string(),
            whole_word: true,
        }],
    }
}
