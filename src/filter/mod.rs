// SPDX-License-Identifier: MPL-2.0

mod service;
mod snapshot;

pub use service::{FilterService, FilterUpdates};
pub use snapshot::{FilterResult, FilterSnapshot};
