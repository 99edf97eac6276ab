// SPDX-License-Identifier: MPL-2.0

//! Typed API entities as the engine sees them.
//!
//! These mirror the server's JSON closely enough to decode pages with serde,
//! plus the client-only bits (like the sensitivity toggle) the server never sees.

mod account;
mod filter;
mod notification;
mod relationship;
mod status;

pub use account::{Account, AccountRecord, PartialAccount};
pub use filter::{Filter, FilterAction, FilterContext, FilterKeyword};
pub use notification::{GroupedNotifications, Notification, NotificationGroup, NotificationType};
pub use relationship::Relationship;
pub use status::{Poll, PollOption, Status};
