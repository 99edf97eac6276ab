// SPDX-License-Identifier: MPL-2.0

mod common;

use common::*;
use mastofeed::actions::Actions;
use mastofeed::api::ClientError;
use mastofeed::cache::{CachedItem, FollowRequestState, IdentityCache};
use mastofeed::feed::{FeedKind, ItemIdentifier};
use mastofeed::model::{NotificationType, Relationship, Status};
use mastofeed::propagate::{
    Entry, FeedRecord, FeedRecordKind, MutationPropagator, ThreadLists, ThreadNode,
    ThreadPosition,
};
use std::sync::Arc;

fn node(position: ThreadPosition, status: Status) -> Entry {
    Entry::Thread(ThreadNode { position, status })
}

fn ids(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.status().map(|status| status.id.clone()))
        .collect()
}

fn propagator() -> MutationPropagator {
    MutationPropagator::new(Arc::new(IdentityCache::new()))
}

#[test]
fn delete_removes_status_from_both_thread_halves() {
    let mut thread = ThreadLists {
        ancestors: vec![
            node(ThreadPosition::Root, status("root", "")),
            node(ThreadPosition::Reply, status("x", "")),
        ],
        descendants: vec![
            node(ThreadPosition::Reply, status("x", "")),
            node(ThreadPosition::Leaf, status("leaf", "")),
        ],
    };

    let report = propagator().handle_delete(status("x", ""), &mut [&mut thread]);

    assert_eq!(report.removed, 2);
    assert_eq!(ids(&thread.ancestors), vec!["root"]);
    assert_eq!(ids(&thread.descendants), vec!["leaf"]);
}

#[test]
fn delete_reaches_every_list_it_is_given() {
    let mut timeline = vec![Entry::Status(status("x", "")), Entry::Status(status("y", ""))];
    let mut feed = vec![Entry::Feed(FeedRecord {
        kind: FeedRecordKind::Home,
        status: status("x", ""),
    })];

    propagator().handle_delete(status("x", ""), &mut [&mut timeline, &mut feed]);

    assert_eq!(ids(&timeline), vec!["y"]);
    assert!(feed.is_empty());
}

#[test]
fn reblog_off_finds_wrapper_by_either_id() {
    let original = status("y", "original");
    let wrapper = Status {
        reblogged: true,
        ..reblog("x", original.clone())
    };

    for addressed_by in ["y", "x"] {
        let mut list = vec![
            Entry::Status(status("other", "")),
            Entry::Feed(FeedRecord {
                kind: FeedRecordKind::Home,
                status: wrapper.clone(),
            }),
        ];
        let undone = Status {
            reblogged: false,
            ..status(addressed_by, "original")
        };

        let report = propagator().handle_reblog(undone, false, &mut [&mut list]);

        assert_eq!(report.replaced, 1, "addressed by {addressed_by}");
        assert!(matches!(&list[1], Entry::Feed(record) if record.status.id == addressed_by));
        assert_eq!(ids(&list[..1]), vec!["other"]);
    }
}

#[test]
fn reblog_on_replaces_original_row_with_wrapper() {
    let mut list = vec![Entry::Status(status("y", "original"))];
    let wrapper = Status {
        reblogged: true,
        ..reblog("x", status("y", "original"))
    };

    let report = propagator().handle_reblog(wrapper, true, &mut [&mut list]);

    assert_eq!(report.replaced, 1);
    assert_eq!(list[0].status().unwrap().reblog_of_id(), Some("y"));
}

#[test]
fn revealed_content_warning_survives_favorite() {
    let hidden = Status {
        sensitive: true,
        spoiler_text: "cw".into(),
        ..status("x", "")
    };
    let mut thread = ThreadLists {
        ancestors: vec![node(ThreadPosition::Root, hidden.clone())],
        descendants: Vec::new(),
    };
    let propagator = propagator();

    let mut revealed = hidden.clone();
    revealed.sensitive_toggled = true;
    propagator.handle_sensitivity_toggle(revealed, &mut [&mut thread]);

    let favourited = Status {
        favourited: true,
        ..hidden
    };
    propagator.handle_favorite(favourited, &mut [&mut thread]);

    let shown = thread.ancestors[0].status().unwrap();
    assert!(shown.favourited);
    assert!(shown.sensitive_toggled);
    assert!(matches!(
        thread.ancestors[0],
        Entry::Thread(ThreadNode {
            position: ThreadPosition::Root,
            ..
        })
    ));
}

#[test]
fn last_write_wins_in_cache() {
    let cache = IdentityCache::new();
    cache.upsert(status("x", "first"));
    cache.upsert(status("x", "second"));
    assert_eq!(cache.status("x").unwrap().content, "<p>second</p>");
}

#[tokio::test]
async fn favorite_action_updates_loader_and_thread() {
    let harness = Harness::new();
    harness.source.push_page(statuses(&["x", "y"]));
    let mut loader = harness.loader(FeedKind::Home);
    loader.load_initial(&FeedKind::Home).await.unwrap();
    let mut thread = ThreadLists {
        ancestors: vec![node(ThreadPosition::Root, status("x", "hello"))],
        descendants: Vec::new(),
    };
    harness.source.reply_with_status(Status {
        favourited: true,
        ..status("x", "hello")
    });
    let actions = Actions::new(
        harness.source.clone(),
        harness.session.clone(),
        harness.cache.clone(),
    );

    let report = actions
        .toggle_favorite(&status("x", "hello"), &mut [&mut loader, &mut thread])
        .await
        .unwrap();

    assert_eq!(report.replaced, 2);
    assert_eq!(harness.source.action_calls(), vec!["favourite x true"]);
    assert!(harness.cache.status("x").unwrap().favourited);
    assert!(thread.ancestors[0].status().unwrap().favourited);
}

#[tokio::test]
async fn favoriting_through_a_boosted_row_updates_that_row() {
    let harness = Harness::new();
    let boosted = reblog("x", status("y", "original"));
    harness
        .source
        .push_page(mastofeed::api::Page::Statuses(vec![boosted.clone()]));
    let mut loader = harness.loader(FeedKind::Home);
    loader.load_initial(&FeedKind::Home).await.unwrap();
    harness.source.reply_with_status(Status {
        favourited: true,
        ..status("y", "original")
    });
    let actions = Actions::new(
        harness.source.clone(),
        harness.session.clone(),
        harness.cache.clone(),
    );

    let report = actions
        .toggle_favorite(&boosted, &mut [&mut loader])
        .await
        .unwrap();

    assert_eq!(report.replaced, 1);
    assert_eq!(loader.records(), vec![ItemIdentifier::Status("x".into())]);
    let row = match loader.resolve(&ItemIdentifier::Status("x".into())) {
        Some(CachedItem::Status(row)) => row,
        other => panic!("boosted row resolved to {other:?}"),
    };
    assert_eq!(row.id, "x");
    assert!(row.content_status().favourited);

    harness.source.reply_with_status(status("y", "original"));
    actions
        .toggle_favorite(&row, &mut [&mut loader])
        .await
        .unwrap();
    assert_eq!(
        harness.source.action_calls(),
        vec!["favourite y true", "favourite y false"]
    );
}

#[tokio::test]
async fn bookmarking_through_a_boosted_entry_keeps_the_wrapper() {
    let harness = Harness::new();
    let boosted = reblog("x", status("y", "original"));
    harness.source.reply_with_status(Status {
        bookmarked: true,
        ..status("y", "original")
    });
    let actions = Actions::new(
        harness.source.clone(),
        harness.session.clone(),
        harness.cache.clone(),
    );
    let mut list = vec![Entry::Feed(FeedRecord {
        kind: FeedRecordKind::Home,
        status: boosted.clone(),
    })];

    let report = actions
        .toggle_bookmark(&boosted, &mut [&mut list])
        .await
        .unwrap();

    assert_eq!(report.replaced, 1);
    let shown = list[0].status().unwrap();
    assert_eq!(shown.id, "x");
    assert!(shown.content_status().bookmarked);
}

#[tokio::test]
async fn reblog_action_targets_the_reblogged_status() {
    let harness = Harness::new();
    let boosted = reblog("x", status("y", "original"));
    harness.source.reply_with_status(Status {
        reblogged: true,
        ..reblog("mine", status("y", "original"))
    });
    let actions = Actions::new(
        harness.source.clone(),
        harness.session.clone(),
        harness.cache.clone(),
    );
    let mut list = vec![Entry::Status(boosted.clone())];

    let report = actions.toggle_reblog(&boosted, &mut [&mut list]).await.unwrap();

    assert_eq!(harness.source.action_calls(), vec!["reblog y true"]);
    assert_eq!(report.replaced, 1);
    assert_eq!(list[0].status().unwrap().id, "mine");
}

#[tokio::test]
async fn delete_action_tombstones_status() {
    let harness = Harness::new();
    harness.source.push_page(statuses(&["x", "y"]));
    let mut loader = harness.loader(FeedKind::Home);
    loader.load_initial(&FeedKind::Home).await.unwrap();
    harness.source.reply_with_status(status("x", "hello"));
    let actions = Actions::new(
        harness.source.clone(),
        harness.session.clone(),
        harness.cache.clone(),
    );

    actions
        .delete(&status("x", "hello"), &mut [&mut loader])
        .await
        .unwrap();

    assert_eq!(loader.records(), vec![ItemIdentifier::Status("y".into())]);
    assert!(harness.cache.is_deleted("x"));
    assert!(harness.cache.status("x").is_none());
}

#[tokio::test]
async fn failed_action_changes_nothing() {
    let harness = Harness::new();
    let actions = Actions::new(
        harness.source.clone(),
        harness.session.clone(),
        harness.cache.clone(),
    );
    let mut list = vec![Entry::Status(status("x", ""))];

    let result = actions
        .toggle_bookmark(&status("x", ""), &mut [&mut list])
        .await;

    assert!(result.is_err());
    assert!(!list[0].status().unwrap().bookmarked);
}

#[tokio::test]
async fn accepted_follow_request_settles_and_caches_relationship() {
    let harness = Harness::new();
    harness.source.reply_to_follow_request(Ok(Relationship {
        id: "alice".into(),
        followed_by: true,
        ..Default::default()
    }));
    let actions = Actions::new(
        harness.source.clone(),
        harness.session.clone(),
        harness.cache.clone(),
    );
    let request = notification("n1", NotificationType::FollowRequest, "alice", None);

    let state = actions.respond_to_follow_request(&request, true).await.unwrap();

    assert_eq!(state, FollowRequestState::IsAccept);
    assert_eq!(harness.cache.follow_request_state("n1"), FollowRequestState::IsAccept);
    assert!(harness.cache.relationship("alice").unwrap().followed_by);
    assert_eq!(harness.source.action_calls(), vec!["follow_request alice true"]);
}

#[tokio::test]
async fn failed_follow_request_resets_state() {
    let harness = Harness::new();
    harness
        .source
        .reply_to_follow_request(Err(ClientError::Network("reset".into())));
    let actions = Actions::new(
        harness.source.clone(),
        harness.session.clone(),
        harness.cache.clone(),
    );
    let request = notification("n1", NotificationType::FollowRequest, "alice", None);

    let result = actions.respond_to_follow_request(&request, false).await;

    assert!(result.is_err());
    assert_eq!(harness.cache.follow_request_state("n1"), FollowRequestState::None);
}

#[tokio::test]
async fn follow_request_in_flight_is_not_answered_twice() {
    let harness = Harness::new();
    harness
        .cache
        .set_follow_request_state("n1", FollowRequestState::IsAccepting);
    let actions = Actions::new(
        harness.source.clone(),
        harness.session.clone(),
        harness.cache.clone(),
    );
    let request = notification("n1", NotificationType::FollowRequest, "alice", None);

    let state = actions.respond_to_follow_request(&request, false).await.unwrap();

    assert_eq!(state, FollowRequestState::IsAccepting);
    assert!(harness.source.action_calls().is_empty());
}
