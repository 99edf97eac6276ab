// SPDX-License-Identifier: MPL-2.0

//! Process-wide store of canonical entity records.
//!
//! Every entity the engine has seen lives here exactly once, keyed by its
//! server ID. Lists never hold entity data themselves, only identifiers that
//! resolve through this cache.

mod identity;
mod items;
mod pending;

pub use identity::{AuthorMenuContext, IdentityCache};
pub use items::{CacheRecord, CachedItem, FeedItemIdentifier};
pub use pending::FollowRequestState;
