//! # Batched Commit Coordination
//!
//! Groups transformed documents into bounded batches and issues one atomic
//! commit per flush against the injected store. A committer is owned by
//! exactly one worker; a commit blocks that worker until the store
//! acknowledges the batch, and nothing is pipelined.

use crate::document::PendingDocument;
use crate::store::{DocumentStore, StoreError};
use thiserror::Error;
use tracing::debug;

/// The largest batch the store accepts in one commit operation.
pub const MAX_BATCH_SIZE: usize = 500;

/// A whole-batch commit failure. One error covers every document in the
/// rejected batch; there is no per-document detail and no retry here.
#[derive(Error, Debug)]
#[error("The store rejected a batch of {documents} documents: {source}")]
pub struct CommitError {
    pub documents: usize,
    #[source]
    pub source: StoreError,
}

/// Accumulates documents and flushes them in bounded batches.
pub struct BatchCommitter<S> {
    store: S,
    capacity: usize,
    pending: Vec<PendingDocument>,
    committed_ids: Vec<String>,
}

impl<S: DocumentStore> BatchCommitter<S> {
    /// `capacity` is pre-validated into `1..=MAX_BATCH_SIZE`.
    pub fn new(store: S, capacity: usize) -> Self {
        Self {
            store,
            capacity,
            pending: Vec::with_capacity(capacity),
            committed_ids: Vec::new(),
        }
    }

    /// Admits one document, flushing synchronously when the batch fills.
    pub async fn add(&mut self, document: PendingDocument) -> Result<(), CommitError> {
        self.pending.push(document);
        if self.pending.len() >= self.capacity {
            self.flush().await?;
        }
        Ok(())
    }

    /// Commits the current batch as one atomic write. A no-op when empty,
    /// so calling it again at end-of-stream is always safe.
    pub async fn flush(&mut self) -> Result<(), CommitError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.pending);
        let documents = batch.len();
        let ids = self
            .store
            .commit(batch)
            .await
            .map_err(|source| CommitError { documents, source })?;
        debug!("Committed a batch of {documents} documents");
        self.committed_ids.extend(ids);
        Ok(())
    }

    /// Number of documents committed so far across all flushes.
    pub fn documents_written(&self) -> usize {
        self.committed_ids.len()
    }

    /// Identifiers of every committed document, in commit order.
    pub fn committed_ids(&self) -> &[String] {
        &self.committed_ids
    }
}
