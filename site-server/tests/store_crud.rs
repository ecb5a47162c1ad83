//! Document store contract tests
//!
//! Run: cargo test -p site-server --test store_crud

mod common;

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use site_server::db::models::serde_helpers;
use site_server::db::repository::RepoError;
use site_server::db::{Filter, Ordering};

const NOTES: &str = "note";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Note {
    #[serde(with = "serde_helpers::record_id")]
    id: RecordId,
    title: String,
    body: String,
    pinned: bool,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, Serialize)]
struct NoteRow {
    title: String,
    body: String,
    pinned: bool,
}

fn row(title: &str, pinned: bool) -> NoteRow {
    NoteRow {
        title: title.to_string(),
        body: "lorem".to_string(),
        pinned,
    }
}

#[tokio::test]
async fn create_stamps_both_timestamps() {
    let (_tmp, store) = common::test_store().await;

    let before = chrono::Utc::now().timestamp_millis();
    let created: Note = store.create(NOTES, None, &row("a", false)).await.unwrap();
    let after = chrono::Utc::now().timestamp_millis();

    assert_eq!(created.created_at, created.updated_at);
    assert!(created.created_at >= before && created.created_at <= after);

    let read: Option<Note> = store
        .get_one(NOTES, &created.id.key().to_string())
        .await
        .unwrap();
    let read = read.expect("created note must be readable");
    assert_eq!(read.created_at, created.created_at);
    assert_eq!(read.title, "a");
}

#[tokio::test]
async fn client_supplied_timestamps_are_ignored() {
    let (_tmp, store) = common::test_store().await;

    #[derive(Serialize)]
    struct SneakyRow {
        title: String,
        body: String,
        pinned: bool,
        created_at: i64,
        updated_at: i64,
    }

    let sneaky = SneakyRow {
        title: "a".into(),
        body: "lorem".into(),
        pinned: false,
        created_at: 1,
        updated_at: 2,
    };

    let created: Note = store.create(NOTES, None, &sneaky).await.unwrap();
    assert!(created.created_at > 1_600_000_000_000);
    assert_eq!(created.created_at, created.updated_at);
}

#[tokio::test]
async fn update_merges_one_field_and_bumps_updated_at() {
    let (_tmp, store) = common::test_store().await;

    let created: Note = store.create(NOTES, None, &row("a", false)).await.unwrap();
    let key = created.id.key().to_string();

    // Millisecond timestamps need a beat between writes to move
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    #[derive(Serialize)]
    struct Patch {
        pinned: bool,
    }
    let updated: Note = store.update(NOTES, &key, &Patch { pinned: true }).await.unwrap();

    assert!(updated.pinned);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.body, created.body);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn update_missing_key_is_not_found_and_creates_nothing() {
    let (_tmp, store) = common::test_store().await;

    #[derive(Serialize)]
    struct Patch {
        pinned: bool,
    }
    let result: Result<Note, _> = store.update(NOTES, "ghost", &Patch { pinned: true }).await;
    assert!(matches!(result, Err(RepoError::NotFound(_))));

    let read: Option<Note> = store.get_one(NOTES, "ghost").await.unwrap();
    assert!(read.is_none());
}

#[tokio::test]
async fn delete_then_get_is_none_and_delete_is_idempotent() {
    let (_tmp, store) = common::test_store().await;

    let created: Note = store.create(NOTES, None, &row("a", false)).await.unwrap();
    let key = created.id.key().to_string();

    store.delete(NOTES, &key).await.unwrap();
    let read: Option<Note> = store.get_one(NOTES, &key).await.unwrap();
    assert!(read.is_none());

    // Deleting a missing key is not an error
    store.delete(NOTES, &key).await.unwrap();
}

#[tokio::test]
async fn duplicate_explicit_key_is_rejected() {
    let (_tmp, store) = common::test_store().await;

    let _first: Note = store
        .create(NOTES, Some("fixed"), &row("a", false))
        .await
        .unwrap();
    let second: Result<Note, _> = store.create(NOTES, Some("fixed"), &row("b", false)).await;
    assert!(second.is_err(), "reusing an id must fail");
}

#[tokio::test]
async fn get_many_filters_orders_and_limits() {
    let (_tmp, store) = common::test_store().await;

    for (title, pinned) in [("c", true), ("a", true), ("b", false)] {
        let _: Note = store.create(NOTES, None, &row(title, pinned)).await.unwrap();
    }

    // No filters: the whole collection
    let all: Vec<Note> = store.get_many(NOTES, &[], &[], None).await.unwrap();
    assert_eq!(all.len(), 3);

    // Conjunctive equality filter + ordering
    let pinned: Vec<Note> = store
        .get_many(
            NOTES,
            &[Filter::eq("pinned", true)],
            &[Ordering::asc("title")],
            None,
        )
        .await
        .unwrap();
    assert_eq!(
        pinned.iter().map(|n| n.title.as_str()).collect::<Vec<_>>(),
        ["a", "c"]
    );

    // Limit is never exceeded
    let limited: Vec<Note> = store
        .get_many(NOTES, &[], &[Ordering::asc("title")], Some(2))
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);

    // No matches: empty Vec, not an error
    let none: Vec<Note> = store
        .get_many(NOTES, &[Filter::eq("title", "zzz")], &[], None)
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn range_filters_compose_conjunctively() {
    let (_tmp, store) = common::test_store().await;

    #[derive(Serialize)]
    struct SeqRow {
        title: String,
        body: String,
        pinned: bool,
        seq: i64,
    }

    for seq in 1..=5i64 {
        let _: serde_json::Value = store
            .create(
                NOTES,
                None,
                &SeqRow {
                    title: format!("n{seq}"),
                    body: "lorem".into(),
                    pinned: false,
                    seq,
                },
            )
            .await
            .unwrap();
    }

    let middle: Vec<serde_json::Value> = store
        .get_many(
            NOTES,
            &[Filter::gte("seq", 2i64), Filter::lt("seq", 5i64)],
            &[Ordering::asc("seq")],
            None,
        )
        .await
        .unwrap();
    let seqs: Vec<i64> = middle
        .iter()
        .filter_map(|v| v.get("seq").and_then(|s| s.as_i64()))
        .collect();
    assert_eq!(seqs, [2, 3, 4]);
}
