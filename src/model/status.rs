// SPDX-License-Identifier: MPL-2.0

use crate::model::Account;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static HTML_TAG_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"<[^>]*>").expect("valid tag pattern"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    pub account: Account,
    /// HTML body as delivered by the server
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub spoiler_text: String,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub in_reply_to_id: Option<String>,
    /// The status this one reblogs, if it is a reblog wrapper
    #[serde(default)]
    pub reblog: Option<Box<Status>>,
    #[serde(default)]
    pub poll: Option<Poll>,
    #[serde(default)]
    pub favourited: bool,
    #[serde(default)]
    pub reblogged: bool,
    #[serde(default)]
    pub bookmarked: bool,
    #[serde(default)]
    pub favourites_count: u64,
    #[serde(default)]
    pub reblogs_count: u64,
    #[serde(default)]
    pub replies_count: u64,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    /// Whether the viewer has flipped the content warning on this status.
    /// Client-only; never sent to or received from the server.
    #[serde(skip)]
    pub sensitive_toggled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    #[serde(default)]
    pub options: Vec<PollOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    pub title: String,
}

impl Status {
    /// ID of the reblogged status when this is a reblog wrapper
    pub fn reblog_of_id(&self) -> Option<&str> {
        self.reblog.as_deref().map(|status| status.id.as_str())
    }

    /// The status whose content is actually displayed (the reblogged one for wrappers)
    pub fn content_status(&self) -> &Status {
        self.reblog.as_deref().unwrap_or(self)
    }

    /// Whether this status hides its body behind a content warning by default
    pub fn has_content_warning(&self) -> bool {
        let shown = self.content_status();
        shown.sensitive || !shown.spoiler_text.is_empty()
    }

    /// Whether the body is currently visible, taking the local toggle into account
    pub fn is_content_revealed(&self) -> bool {
        !self.has_content_warning() || self.sensitive_toggled
    }

    /// Carry the locally set content-warning toggle over from a previous copy.
    pub fn inherit_sensitivity_toggled(mut self, previous: Option<&Status>) -> Self {
        if let Some(previous) = previous {
            self.sensitive_toggled = previous.sensitive_toggled;
        }
        self
    }

    /// Body text with HTML tags stripped and basic entities decoded
    pub fn plain_text(&self) -> String {
        let stripped = HTML_TAG_RE.replace_all(&self.content, " ");
        html_decode(stripped.trim())
    }
}

/// Basic HTML entity decoding for status bodies.
fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
}
