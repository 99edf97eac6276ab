// SPDX-License-Identifier: MPL-2.0

use crate::model::Status;

/// A local change to one status, carrying the post-mutation entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Edit(Status),
    Bookmark(Status),
    Favorite(Status),
    /// The status carries the viewer's new content-warning choice
    SensitivityToggle(Status),
    /// On: the new reblog wrapper. Off: the status that is no longer reblogged.
    Reblog {
        status: Status,
        reblogged: bool,
    },
    Delete(Status),
}

impl Mutation {
    pub fn status(&self) -> &Status {
        match self {
            Mutation::Edit(status)
            | Mutation::Bookmark(status)
            | Mutation::Favorite(status)
            | Mutation::SensitivityToggle(status)
            | Mutation::Delete(status)
            | Mutation::Reblog { status, .. } => status,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Edit(_) => "edit",
            Mutation::Bookmark(_) => "bookmark",
            Mutation::Favorite(_) => "favorite",
            Mutation::SensitivityToggle(_) => "sensitivity_toggle",
            Mutation::Reblog { .. } => "reblog",
            Mutation::Delete(_) => "delete",
        }
    }

    pub(crate) fn with_status(self, status: Status) -> Self {
        match self {
            Mutation::Edit(_) => Mutation::Edit(status),
            Mutation::Bookmark(_) => Mutation::Bookmark(status),
            Mutation::Favorite(_) => Mutation::Favorite(status),
            Mutation::SensitivityToggle(_) => Mutation::SensitivityToggle(status),
            Mutation::Reblog { reblogged, .. } => Mutation::Reblog { status, reblogged },
            Mutation::Delete(_) => Mutation::Delete(status),
        }
    }

    /// The payload that replaces `previous` in a list.
    ///
    /// The content-warning toggle is client state the server never echoes
    /// back, so every replacement keeps the previous row's choice. Only an
    /// explicit toggle sets it.
    ///
    /// A row that reblogs the mutated status keeps its wrapper and gets the
    /// new status as its inner one.
    pub fn replacement_for(&self, previous: Option<&Status>) -> Status {
        if let Some(wrapper) = previous.filter(|row| self.rewraps(row)) {
            let inner = self.replacement_for(wrapper.reblog.as_deref());
            return Status {
                reblog: Some(Box::new(inner)),
                ..wrapper.clone()
            };
        }

        match self {
            Mutation::SensitivityToggle(status) => status.clone(),
            other => other.status().clone().inherit_sensitivity_toggled(previous),
        }
    }

    /// Whether `row` is a reblog wrapper around the status a direct kind mutated
    fn rewraps(&self, row: &Status) -> bool {
        let target = &self.status().id;
        self.is_direct() && row.id != *target && row.reblog_of_id() == Some(target.as_str())
    }

    fn is_direct(&self) -> bool {
        matches!(
            self,
            Mutation::Edit(_)
                | Mutation::Bookmark(_)
                | Mutation::Favorite(_)
                | Mutation::SensitivityToggle(_)
        )
    }

    /// Index of the first row this mutation addresses.
    ///
    /// `statuses` holds the status each row shows, `None` for rows without one.
    /// A reblog toggle may be addressed through either the wrapper or the
    /// reblogged status, so it tries the reblog-of ID before the row's own ID.
    /// Direct kinds try the row's own ID first, then a wrapper reblogging it.
    pub fn locate(&self, statuses: &[Option<&Status>]) -> Option<usize> {
        let find = |predicate: &dyn Fn(&Status) -> bool| {
            statuses
                .iter()
                .position(|status| status.is_some_and(|status| predicate(status)))
        };

        match self {
            Mutation::Reblog {
                status,
                reblogged: true,
            } => {
                let target = status.reblog_of_id()?;
                find(&|s| s.reblog_of_id() == Some(target)).or_else(|| find(&|s| s.id == target))
            }
            Mutation::Reblog {
                status,
                reblogged: false,
            } => find(&|s| s.reblog_of_id() == Some(status.id.as_str()))
                .or_else(|| find(&|s| s.id == status.id)),
            direct => {
                let id = &direct.status().id;
                find(&|s| &s.id == id).or_else(|| find(&|s| s.reblog_of_id() == Some(id.as_str())))
            }
        }
    }
}
