// SPDX-License-Identifier: MPL-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Full account record with every profile field the server returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub acct: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub avatar_static: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub statuses_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn display_name_with_fallback(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// Avatar-only account summary embedded in grouped notification pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialAccount {
    pub id: String,
    pub acct: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub avatar_static: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub bot: bool,
}

/// Either tier of account representation held by the cache.
///
/// A partial record is only a placeholder until the full one arrives.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountRecord {
    Full(Arc<Account>),
    Partial(Arc<PartialAccount>),
}

impl AccountRecord {
    pub fn id(&self) -> &str {
        match self {
            AccountRecord::Full(account) => &account.id,
            AccountRecord::Partial(account) => &account.id,
        }
    }

    pub fn acct(&self) -> &str {
        match self {
            AccountRecord::Full(account) => &account.acct,
            AccountRecord::Partial(account) => &account.acct,
        }
    }

    pub fn avatar(&self) -> &str {
        match self {
            AccountRecord::Full(account) => &account.avatar,
            AccountRecord::Partial(account) => &account.avatar,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, AccountRecord::Full(_))
    }

    pub fn full(&self) -> Option<&Account> {
        match self {
            AccountRecord::Full(account) => Some(account),
            AccountRecord::Partial(_) => None,
        }
    }

    /// Merge a newer record into this one.
    ///
    /// A full record is never downgraded by a later partial one; within the
    /// same tier the newer record wins outright.
    pub fn upgrade(self, newer: AccountRecord) -> AccountRecord {
        match (&self, &newer) {
            (AccountRecord::Full(_), AccountRecord::Partial(_)) => self,
            _ => newer,
        }
    }
}
