use async_trait::async_trait;
use docsink_firestore::{DocumentId, DocumentStore, PendingDocument, StoreError};
use gcloud_sdk::tonic::Status;
use std::sync::{Arc, Mutex};

/// Initializes test logging once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("docsink_firestore=debug")
        .try_init();
}

// --- Mock Document Store ---

/// An in-memory [`DocumentStore`] that records every committed batch and can
/// be programmed to reject commits.
#[derive(Clone, Default)]
pub struct MockStore {
    batches: Arc<Mutex<Vec<Vec<PendingDocument>>>>,
    minted: Arc<Mutex<usize>>,
    failing: Arc<Mutex<bool>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent commit fail.
    pub fn fail_commits(&self) {
        *self.failing.lock().unwrap() = true;
    }

    /// The successfully committed batches, in commit order.
    pub fn batches(&self) -> Vec<Vec<PendingDocument>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn commit_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn commit(&self, documents: Vec<PendingDocument>) -> Result<Vec<String>, StoreError> {
        if *self.failing.lock().unwrap() {
            return Err(StoreError::Commit(Status::unavailable("injected outage")));
        }
        let ids = documents
            .iter()
            .map(|document| match &document.id {
                DocumentId::Named(id) => id.clone(),
                DocumentId::Auto => {
                    let mut minted = self.minted.lock().unwrap();
                    let id = format!("auto-{}", *minted);
                    *minted += 1;
                    id
                }
            })
            .collect();
        self.batches.lock().unwrap().push(documents);
        Ok(ids)
    }
}
