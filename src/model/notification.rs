// SPDX-License-Identifier: MPL-2.0

use crate::model::{Account, PartialAccount, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Follow,
    FollowRequest,
    Mention,
    Reblog,
    Favourite,
    Poll,
    Status,
    Update,
    #[serde(rename = "admin.sign_up")]
    AdminSignUp,
    #[serde(rename = "admin.report")]
    AdminReport,
    SeveredRelationships,
    ModerationWarning,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    pub account: Account,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub group_key: Option<String>,
}

/// Server-side aggregation of several notifications of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationGroup {
    #[serde(rename = "group_key")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub notifications_count: u64,
    #[serde(default)]
    pub most_recent_notification_id: Option<String>,
    #[serde(default)]
    pub page_min_id: Option<String>,
    #[serde(default)]
    pub page_max_id: Option<String>,
    #[serde(default)]
    pub latest_page_notification_at: Option<DateTime<Utc>>,
    /// Accounts to render as the group's authors, resolved through the cache
    #[serde(default)]
    pub sample_account_ids: Vec<String>,
    #[serde(default)]
    pub status_id: Option<String>,
}

/// One page of the grouped notifications endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedNotifications {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub partial_accounts: Option<Vec<PartialAccount>>,
    #[serde(default)]
    pub statuses: Vec<Status>,
    #[serde(default)]
    pub notification_groups: Vec<NotificationGroup>,
}
