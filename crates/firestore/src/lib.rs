//! # `docsink-firestore`: Cloud Firestore Sink Plugin
//!
//! This crate writes pipeline records to a Google Cloud Firestore collection
//! as a self-contained plugin for the `docsink` ecosystem. It implements the
//! `DocumentSink` trait from the core `docsink` library: each record is
//! transformed into a document and committed in bounded batches, one atomic
//! write per batch.

use async_trait::async_trait;
use docsink::{DocumentSink, Record, Schema, SinkError, WriteSummary};
use thiserror::Error;
use tracing::info;

pub mod batch;
pub mod config;
pub mod document;
pub mod mapper;
pub mod store;

pub use batch::{BatchCommitter, CommitError, MAX_BATCH_SIZE};
pub use config::{FirestoreSinkConfig, IdStrategy, DEFAULT_ID_FIELD};
pub use document::{DocumentBuilder, DocumentId, IdPolicy, PendingDocument};
pub use mapper::{map_value, TransformError};
pub use store::{DocumentStore, FirestoreStore, StoreError};

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum FirestoreSinkError {
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A helper to convert the plugin's errors into the generic
/// `docsink::SinkError` taxonomy.
impl From<FirestoreSinkError> for SinkError {
    fn from(err: FirestoreSinkError) -> Self {
        match err {
            FirestoreSinkError::Transform(e) => SinkError::Transform(e.to_string()),
            FirestoreSinkError::Commit(e) => SinkError::Commit {
                documents: e.documents,
                source: anyhow::Error::new(e.source),
            },
            FirestoreSinkError::Store(e) => SinkError::Internal(anyhow::Error::new(e)),
        }
    }
}

// --- Sink Implementation ---

/// The `DocumentSink` implementation for Cloud Firestore.
///
/// Generic over the store boundary so tests can substitute an in-memory
/// store; production code connects through [`FirestoreSink::connect`].
pub struct FirestoreSink<S = FirestoreStore> {
    builder: DocumentBuilder,
    committer: BatchCommitter<S>,
    collection: String,
}

impl FirestoreSink<FirestoreStore> {
    /// Validates the configuration against the schema, resolves credentials,
    /// and connects to Firestore. Validation failures are reported together,
    /// before any data movement.
    pub async fn connect(
        config: &FirestoreSinkConfig,
        schema: &Schema,
    ) -> Result<Self, SinkError> {
        config.validate(schema)?;
        if let Some(path) = &config.credentials_path {
            info!("Setting GOOGLE_APPLICATION_CREDENTIALS to use {path}");
            std::env::set_var("GOOGLE_APPLICATION_CREDENTIALS", path);
        }
        let store = FirestoreStore::connect(
            &config.project_id,
            &config.database_name,
            &config.collection,
        )
        .await
        .map_err(FirestoreSinkError::from)?;
        Ok(Self::with_store(config, schema, store))
    }
}

impl<S: DocumentStore> FirestoreSink<S> {
    /// Builds a sink over an already connected store. The configuration is
    /// expected to have passed [`FirestoreSinkConfig::validate`].
    pub fn with_store(config: &FirestoreSinkConfig, schema: &Schema, store: S) -> Self {
        Self {
            builder: DocumentBuilder::new(schema.clone(), config.id_policy()),
            committer: BatchCommitter::new(store, config.batch_size),
            collection: config.collection.clone(),
        }
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentSink for FirestoreSink<S> {
    async fn write(&mut self, record: &Record) -> Result<(), SinkError> {
        let document = self
            .builder
            .build(record)
            .map_err(FirestoreSinkError::from)?;
        self.committer
            .add(document)
            .await
            .map_err(FirestoreSinkError::from)?;
        Ok(())
    }

    async fn finish(&mut self) -> Result<WriteSummary, SinkError> {
        self.committer
            .flush()
            .await
            .map_err(FirestoreSinkError::from)?;
        let summary = WriteSummary {
            destination: self.collection.clone(),
            documents_written: self.committer.documents_written(),
            document_ids: self.committer.committed_ids().to_vec(),
        };
        info!(
            "Wrote {} documents to collection '{}'",
            summary.documents_written, summary.destination
        );
        Ok(summary)
    }
}
