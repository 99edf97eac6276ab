// SPDX-License-Identifier: MPL-2.0

use crate::model::{Filter, FilterAction, FilterContext, Status};
use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Verdict of the filter rules on one status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResult {
    Show,
    /// Keep the row but render it behind a warning naming the rule
    Warn(String),
    Hide,
}

struct CompiledRule {
    filter: Filter,
    patterns: Vec<Regex>,
}

impl CompiledRule {
    fn compile(filter: Filter) -> Self {
        let patterns = filter
            .keywords
            .iter()
            .filter_map(|keyword| {
                let escaped = regex::escape(keyword.keyword.trim());
                let pattern = if keyword.whole_word {
                    let starts_word = keyword.keyword.trim().starts_with(is_word_char);
                    let ends_word = keyword.keyword.trim().ends_with(is_word_char);
                    format!(
                        "{}{}{}",
                        if starts_word { r"\b" } else { "" },
                        escaped,
                        if ends_word { r"\b" } else { "" }
                    )
                } else {
                    escaped
                };
                RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| warn!(filter_id = %filter.id, "skipping keyword: {e}"))
                    .ok()
            })
            .collect();
        Self { filter, patterns }
    }

    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Immutable set of active filter rules plus the instant it was built.
///
/// Expiry is checked once, at build time. A rule that expires afterwards keeps
/// applying until the next snapshot replaces this one.
pub struct FilterSnapshot {
    rules: Vec<CompiledRule>,
    built_at: DateTime<Utc>,
}

impl FilterSnapshot {
    /// Build a snapshot from fetched rules, dropping those already expired at `now`
    pub fn build(filters: Vec<Filter>, now: DateTime<Utc>) -> Self {
        let rules = filters
            .into_iter()
            .filter(|filter| !filter.is_expired_at(now))
            .map(CompiledRule::compile)
            .collect();
        Self {
            rules,
            built_at: now,
        }
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn filters(&self) -> impl Iterator<Item = &Filter> {
        self.rules.iter().map(|rule| &rule.filter)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Judge a status for the given surface.
    ///
    /// The first hiding rule wins outright; otherwise the first warning rule
    /// is reported; no match at all means show.
    pub fn apply(&self, status: &Status, context: FilterContext) -> FilterResult {
        let text = Self::searchable_text(status.content_status());
        let mut warning = None;

        for rule in &self.rules {
            if !rule.filter.applies_to(context) || !rule.matches(&text) {
                continue;
            }
            match rule.filter.filter_action {
                FilterAction::Hide => return FilterResult::Hide,
                FilterAction::Warn | FilterAction::Blur => {
                    if warning.is_none() {
                        warning = Some(rule.filter.title.clone());
                    }
                }
            }
        }

        warning.map_or(FilterResult::Show, FilterResult::Warn)
    }

    fn searchable_text(status: &Status) -> String {
        let mut text = status.spoiler_text.clone();
        text.push('\n');
        text.push_str(&status.plain_text());
        if let Some(poll) = &status.poll {
            for option in &poll.options {
                text.push('\n');
                text.push_str(&option.title);
            }
        }
        text
    }
}

/// Snapshots compare by their rules; the build instant is not part of the value.
impl PartialEq for FilterSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.rules.len() == other.rules.len()
            && self
                .rules
                .iter()
                .zip(&other.rules)
                .all(|(a, b)| a.filter == b.filter)
    }
}

impl std::fmt::Debug for FilterSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSnapshot")
            .field("filters", &self.filters().collect::<Vec<_>>())
            .field("built_at", &self.built_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FilterKeyword, Poll, PollOption};
    use chrono::Duration;

    fn rule(id: &str, keyword: &str, whole_word: bool, action: FilterAction) -> Filter {
        Filter {
            id: id.to_string(),
            title: format!("rule {id}"),
            context: vec![FilterContext::Home, FilterContext::Notifications],
            expires_at: None,
            filter_action: action,
            keywords: vec![FilterKeyword {
                id: format!("k{id}"),
                keyword: keyword.to_string(),
                whole_word,
            }],
        }
    }

    fn status(content: &str) -> Status {
        Status {
            id: "1".to_string(),
            content: format!("<p>{content}</p>"),
            ..Default::default()
        }
    }

    #[test]
    fn no_rules_shows_everything() {
        let snapshot = FilterSnapshot::build(vec![], Utc::now());
        assert_eq!(
            snapshot.apply(&status("anything"), FilterContext::Home),
            FilterResult::Show
        );
    }

    #[test]
    fn hide_beats_earlier_warning() {
        let snapshot = FilterSnapshot::build(
            vec![
                rule("1", "spoiler", false, FilterAction::Warn),
                rule("2", "finale", false, FilterAction::Hide),
            ],
            Utc::now(),
        );
        assert_eq!(
            snapshot.apply(&status("Spoiler: the finale"), FilterContext::Home),
            FilterResult::Hide
        );
        assert_eq!(
            snapshot.apply(&status("spoiler only"), FilterContext::Home),
            FilterResult::Warn("rule 1".to_string())
        );
    }

    #[test]
    fn whole_word_respects_boundaries() {
        let snapshot = FilterSnapshot::build(
            vec![rule("1", "cat", true, FilterAction::Hide)],
            Utc::now(),
        );
        assert_eq!(
            snapshot.apply(&status("concatenate"), FilterContext::Home),
            FilterResult::Show
        );
        assert_eq!(
            snapshot.apply(&status("my CAT!"), FilterContext::Home),
            FilterResult::Hide
        );
    }

    #[test]
    fn rules_only_apply_in_their_context() {
        let mut filter = rule("1", "sports", false, FilterAction::Hide);
        filter.context = vec![FilterContext::Home];
        let snapshot = FilterSnapshot::build(vec![filter], Utc::now());
        assert_eq!(
            snapshot.apply(&status("sports"), FilterContext::Notifications),
            FilterResult::Show
        );
    }

    #[test]
    fn expired_rules_are_dropped_at_build_time_only() {
        let now = Utc::now();
        let mut filter = rule("1", "sports", false, FilterAction::Hide);
        filter.expires_at = Some(now + Duration::seconds(10));

        let snapshot = FilterSnapshot::build(vec![filter.clone()], now);
        assert_eq!(snapshot.filters().count(), 1);

        let later = FilterSnapshot::build(vec![filter], now + Duration::seconds(11));
        assert!(later.is_empty());
    }

    #[test]
    fn reblogs_are_judged_by_their_content() {
        let snapshot = FilterSnapshot::build(
            vec![rule("1", "secret", false, FilterAction::Hide)],
            Utc::now(),
        );
        let wrapper = Status {
            id: "2".to_string(),
            reblog: Some(Box::new(status("a secret"))),
            ..Default::default()
        };
        assert_eq!(
            snapshot.apply(&wrapper, FilterContext::Home),
            FilterResult::Hide
        );
    }

    #[test]
    fn poll_options_are_searched() {
        let snapshot = FilterSnapshot::build(
            vec![rule("1", "pineapple", false, FilterAction::Hide)],
            Utc::now(),
        );
        let mut with_poll = status("which topping?");
        with_poll.poll = Some(Poll {
            id: "p".to_string(),
            options: vec![PollOption {
                title: "Pineapple".to_string(),
            }],
        });
        assert_eq!(
            snapshot.apply(&with_poll, FilterContext::Home),
            FilterResult::Hide
        );
    }

    #[test]
    fn equality_ignores_build_time() {
        let filters = vec![rule("1", "x", false, FilterAction::Hide)];
        let a = FilterSnapshot::build(filters.clone(), Utc::now());
        let b = FilterSnapshot::build(filters, Utc::now() + Duration::seconds(5));
        assert_eq!(a, b);
    }
}
