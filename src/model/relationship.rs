// SPDX-License-Identifier: MPL-2.0

use serde::{Deserialize, Serialize};

/// Viewer-to-account flags. Cached on its own and only refreshed opportunistically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Target account ID
    pub id: String,
    #[serde(default)]
    pub following: bool,
    #[serde(default)]
    pub followed_by: bool,
    #[serde(default)]
    pub requested: bool,
    #[serde(default)]
    pub muting: bool,
    #[serde(default)]
    pub blocking: bool,
    #[serde(default)]
    pub domain_blocking: bool,
}
