// SPDX-License-Identifier: MPL-2.0

mod dedup;
mod identifier;
mod kind;
mod loader;

pub use dedup::{DeduplicationPolicy, removing_duplicates};
pub use identifier::ItemIdentifier;
pub use kind::FeedKind;
pub use loader::{FeedContext, FeedLoader};

use crate::api::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("not authenticated")]
    MissingAuthentication,
    #[error("fetch failed: {0}")]
    Fetch(#[from] ClientError),
}

/// What a load call did to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The list was replaced with this many rows
    Replaced(usize),
    /// This many rows were appended after filtering and deduplication
    Appended(usize),
    /// Another load was already running; nothing was fetched
    Coalesced,
}
