// SPDX-License-Identifier: MPL-2.0

/// In-flight or settled answer to a follow request notification.
///
/// Lives only in memory; a restart forgets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FollowRequestState {
    #[default]
    None,
    IsAccept,
    IsReject,
    IsAccepting,
    IsRejecting,
}

impl FollowRequestState {
    /// True while the network call backing the answer is still running
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            FollowRequestState::IsAccepting | FollowRequestState::IsRejecting
        )
    }

    pub fn in_flight(accept: bool) -> Self {
        if accept {
            FollowRequestState::IsAccepting
        } else {
            FollowRequestState::IsRejecting
        }
    }

    pub fn settled(accept: bool) -> Self {
        if accept {
            FollowRequestState::IsAccept
        } else {
            FollowRequestState::IsReject
        }
    }
}
