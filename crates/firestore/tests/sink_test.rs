//! # Firestore Sink Integration Tests
//!
//! Drives the full record -> document -> batch -> commit path against an
//! in-memory store.

mod common;

use anyhow::Result;
use common::MockStore;
use docsink::{DocumentSink, Field, FieldType, Record, Schema, SinkError};
use docsink_firestore::{
    DocumentId, FirestoreSink, FirestoreSinkConfig, IdStrategy, DEFAULT_ID_FIELD,
};

fn test_config(batch_size: usize, id_strategy: IdStrategy) -> FirestoreSinkConfig {
    let mut config = FirestoreSinkConfig::from_json(
        r#"{"project_id": "test-project", "collection": "users"}"#,
    )
    .unwrap();
    config.batch_size = batch_size;
    config.id_strategy = id_strategy;
    config.id_field = Some("id".into());
    config
}

fn test_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", FieldType::String),
        Field::new("name", FieldType::String),
    ])
}

fn user(id: &str, name: &str) -> Record {
    Record::builder().set("id", id).set("name", name).build()
}

fn make_sink(batch_size: usize, id_strategy: IdStrategy, store: MockStore) -> FirestoreSink<MockStore> {
    let config = test_config(batch_size, id_strategy);
    config.validate(&test_schema()).unwrap();
    FirestoreSink::with_store(&config, &test_schema(), store)
}

#[tokio::test]
async fn flushes_exactly_at_the_batch_boundary() -> Result<()> {
    common::init_tracing();
    let store = MockStore::new();
    let mut sink = make_sink(2, IdStrategy::Custom, store.clone());

    // --- 1. Write three records against a batch size of two ---
    sink.write(&user("a", "Ada")).await?;
    sink.write(&user("b", "Brian")).await?;
    sink.write(&user("c", "Clara")).await?;
    let summary = sink.finish().await?;

    // --- 2. Exactly two commits: the full batch, then the remainder ---
    let batches = store.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 2);
    assert_eq!(batches[1].len(), 1);

    assert_eq!(summary.documents_written, 3);
    assert_eq!(summary.document_ids, vec!["a", "b", "c"]);
    assert_eq!(summary.destination, "users");
    Ok(())
}

#[tokio::test]
async fn finish_on_an_empty_batch_issues_no_commit() -> Result<()> {
    let store = MockStore::new();
    let mut sink = make_sink(2, IdStrategy::AutoGenerated, store.clone());

    let summary = sink.finish().await?;

    assert_eq!(store.commit_count(), 0);
    assert_eq!(summary.documents_written, 0);
    assert!(summary.document_ids.is_empty());
    Ok(())
}

#[tokio::test]
async fn custom_mode_strips_the_identifier_from_committed_bodies() -> Result<()> {
    let store = MockStore::new();
    let mut sink = make_sink(10, IdStrategy::Custom, store.clone());

    sink.write(&user("abc", "x")).await?;
    sink.finish().await?;

    let batches = store.batches();
    let document = &batches[0][0];
    assert_eq!(document.id, DocumentId::Named("abc".into()));
    assert!(!document.fields.contains_key("id"));
    assert!(document.fields.contains_key("name"));
    Ok(())
}

#[tokio::test]
async fn auto_mode_keeps_all_fields_and_surfaces_minted_ids() -> Result<()> {
    let store = MockStore::new();
    let mut sink = make_sink(10, IdStrategy::AutoGenerated, store.clone());

    sink.write(&user("abc", "x")).await?;
    sink.write(&user("def", "y")).await?;
    let summary = sink.finish().await?;

    let batches = store.batches();
    let document = &batches[0][0];
    assert_eq!(document.id, DocumentId::Auto);
    assert!(document.fields.contains_key("id"));
    assert!(document.fields.contains_key("name"));

    // The store boundary mints the identifiers; the summary reports them in
    // commit order.
    assert_eq!(summary.document_ids, vec!["auto-0", "auto-1"]);
    Ok(())
}

#[tokio::test]
async fn a_rejected_batch_surfaces_as_one_error_for_all_its_documents() -> Result<()> {
    let store = MockStore::new();
    store.fail_commits();
    let mut sink = make_sink(2, IdStrategy::Custom, store.clone());

    sink.write(&user("a", "Ada")).await?;
    let err = sink.write(&user("b", "Brian")).await.unwrap_err();

    match err {
        SinkError::Commit { documents, .. } => assert_eq!(documents, 2),
        other => panic!("expected a Commit error, got {other:?}"),
    }
    assert_eq!(store.commit_count(), 0);
    Ok(())
}

#[tokio::test]
async fn custom_mode_without_an_id_field_uses_the_fallback_name() -> Result<()> {
    let store = MockStore::new();
    let mut config = test_config(10, IdStrategy::Custom);
    config.id_field = None;
    let schema = Schema::new(vec![
        Field::new(DEFAULT_ID_FIELD, FieldType::String),
        Field::new("name", FieldType::String),
    ]);
    config.validate(&schema)?;

    let mut sink = FirestoreSink::with_store(&config, &schema, store.clone());
    sink.write(
        &Record::builder()
            .set(DEFAULT_ID_FIELD, "row-7")
            .set("name", "x")
            .build(),
    )
    .await?;
    let summary = sink.finish().await?;

    assert_eq!(summary.document_ids, vec!["row-7"]);
    assert!(!store.batches()[0][0].fields.contains_key(DEFAULT_ID_FIELD));
    Ok(())
}
