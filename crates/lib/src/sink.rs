//! # Sink Plugin Contract
//!
//! The `DocumentSink` trait is the seam between the host pipeline and a
//! destination-specific plugin. The host drives one sink instance per worker:
//! `write` once per record, then a single `finish` at end-of-stream.

use crate::record::Record;
use async_trait::async_trait;
use thiserror::Error;

/// A generic error type for all sink plugins.
///
/// Each plugin is responsible for mapping its specific errors (e.g. a store
/// RPC error) into these standardized variants, so the host pipeline can
/// handle sink failures in a uniform way.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Aggregated configuration or schema validation report. Raised before
    /// any record is processed and never retried.
    #[error("Invalid sink configuration:\n{0}")]
    InvalidConfig(String),

    /// A record failed to transform into a document. With a pre-validated
    /// schema this is not expected at runtime; when it does happen there is
    /// no safe partial-record skip, so it aborts the run.
    #[error("Failed to transform a record into a document: {0}")]
    Transform(String),

    /// The store rejected an entire batch. One error covers the whole batch;
    /// documents committed by earlier flushes are not rolled back, and retry
    /// policy belongs to the caller.
    #[error("Failed to commit a batch of {documents} documents: {source}")]
    Commit {
        documents: usize,
        #[source]
        source: anyhow::Error,
    },

    /// An unexpected internal error occurred.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Represents the successful result of a completed sink run.
///
/// Returned by `DocumentSink::finish` as a standardized summary of what was
/// written, for logging or downstream correlation.
#[derive(Debug, Clone, Default)]
pub struct WriteSummary {
    /// The destination the documents were written to (e.g. a collection path).
    pub destination: String,
    /// The number of documents committed across all batches of the run.
    pub documents_written: usize,
    /// The identifiers of the written documents, in commit order. Includes
    /// store-side identifiers minted for documents that did not name their
    /// own.
    pub document_ids: Vec<String>,
}

/// A generic trait that defines the contract for a sink plugin.
///
/// Any crate that writes pipeline records to an external store implements
/// this trait, which lets the host treat all destinations polymorphically.
/// A sink instance is owned by exactly one worker; calls arrive sequentially
/// and batch state is never shared across workers.
#[async_trait]
pub trait DocumentSink: Send {
    /// Accepts one record. May block the calling worker on a synchronous
    /// batch commit when the internal batch reaches capacity.
    async fn write(&mut self, record: &Record) -> Result<(), SinkError>;

    /// End-of-stream. Flushes any partially filled batch and returns the
    /// summary of the run.
    async fn finish(&mut self) -> Result<WriteSummary, SinkError>;
}
