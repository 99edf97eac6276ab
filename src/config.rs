// SPDX-License-Identifier: MPL-2.0

use std::time::Duration;

pub const APP_ID: &str = "io.github.sethcottle.Mastofeed";
pub const APP_NAME: &str = "Mastofeed";

#[cfg(feature = "devel")]
pub const IS_DEVEL: bool = true;
#[cfg(not(feature = "devel"))]
pub const IS_DEVEL: bool = false;

pub const DEFAULT_INSTANCE: &str = "https://mastodon.social";

/// How often active filter rules are re-fetched
pub const FILTER_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Entities requested per page
pub const DEFAULT_PAGE_LIMIT: u32 = 40;

pub fn user_agent() -> String {
    let suffix = if IS_DEVEL { "-devel" } else { "" };
    format!("{APP_NAME}/{}{suffix}", env!("CARGO_PKG_VERSION"))
}
