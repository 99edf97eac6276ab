// SPDX-License-Identifier: MPL-2.0

use crate::feed::FeedError;
use std::sync::RwLock;
use url::Url;

/// Who is looking at the feeds, and how to talk to their server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationBox {
    pub account_id: String,
    pub instance: Url,
    pub access_token: String,
}

impl AuthenticationBox {
    pub fn new(instance: Url, account_id: &str, access_token: &str) -> Self {
        Self {
            account_id: account_id.to_string(),
            instance,
            access_token: access_token.to_string(),
        }
    }

    /// Whether `account_id` is the viewer's own account
    pub fn is_me(&self, account_id: &str) -> bool {
        self.account_id == account_id
    }
}

/// Holder for the currently active user, shared by every loader.
///
/// Credentials are not persisted here; whoever signs in hands us the box.
#[derive(Debug, Default)]
pub struct CurrentSession {
    active: RwLock<Option<AuthenticationBox>>,
}

impl CurrentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(auth: AuthenticationBox) -> Self {
        Self {
            active: RwLock::new(Some(auth)),
        }
    }

    pub fn sign_in(&self, auth: AuthenticationBox) {
        *self.active.write().expect("session lock poisoned") = Some(auth);
    }

    pub fn sign_out(&self) {
        *self.active.write().expect("session lock poisoned") = None;
    }

    pub fn current(&self) -> Option<AuthenticationBox> {
        self.active.read().expect("session lock poisoned").clone()
    }

    /// The active box, or `MissingAuthentication` before any network call is made
    pub fn require(&self) -> Result<AuthenticationBox, FeedError> {
        self.current().ok_or(FeedError::MissingAuthentication)
    }
}
