//! # Store Client Boundary
//!
//! The sink core is generic over [`DocumentStore`], so tests substitute an
//! in-memory implementation and the production path talks to the Firestore
//! v1 `Commit` RPC through the `gcloud-sdk` generated client.

use crate::document::{DocumentId, PendingDocument};
use async_trait::async_trait;
use gcloud_sdk::google::firestore::v1::{
    firestore_client::FirestoreClient, write::Operation, CommitRequest, Document, Write,
};
use gcloud_sdk::{GoogleApi, GoogleAuthMiddleware};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com";

/// Failures at the store boundary. Retry and backoff policy belong to the
/// caller, not this layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to build the Firestore client: {0}")]
    Connect(#[from] gcloud_sdk::error::Error),

    #[error("Firestore rejected the commit: {0}")]
    Commit(#[from] gcloud_sdk::tonic::Status),
}

/// The boundary to the document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes every document in one atomic operation and returns the
    /// identifiers written, in batch order. A document addressed by an
    /// existing identifier is fully replaced (last-writer-wins); there is no
    /// merge and no concurrency check.
    async fn commit(&self, documents: Vec<PendingDocument>) -> Result<Vec<String>, StoreError>;
}

/// Firestore-backed [`DocumentStore`] issuing one `Commit` RPC per batch.
pub struct FirestoreStore {
    client: GoogleApi<FirestoreClient<GoogleAuthMiddleware>>,
    database_path: String,
    collection: String,
}

impl FirestoreStore {
    /// Connects to the Firestore v1 API for one database and collection.
    /// Credentials come from the environment (application default or
    /// `GOOGLE_APPLICATION_CREDENTIALS`).
    pub async fn connect(
        project_id: &str,
        database_name: &str,
        collection: &str,
    ) -> Result<Self, StoreError> {
        let database_path = format!("projects/{project_id}/databases/{database_name}");
        let client = GoogleApi::from_function(
            FirestoreClient::new,
            FIRESTORE_API_URL,
            // The Firestore API requires the database as the cloud resource
            // prefix.
            Some(database_path.clone()),
        )
        .await?;
        info!("Connected to Firestore database '{database_path}'");
        Ok(Self {
            client,
            database_path,
            collection: collection.to_string(),
        })
    }

    fn document_name(&self, id: &str) -> String {
        format!("{}/documents/{}/{}", self.database_path, self.collection, id)
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn commit(&self, documents: Vec<PendingDocument>) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::with_capacity(documents.len());
        let writes: Vec<Write> = documents
            .into_iter()
            .map(|document| {
                let id = match document.id {
                    DocumentId::Named(id) => id,
                    // The store boundary mints identifiers for documents that
                    // did not name their own, the way Firestore client
                    // libraries assign auto identifiers at write time.
                    DocumentId::Auto => Uuid::new_v4().simple().to_string(),
                };
                let write = Write {
                    // A full-document update with no mask replaces any
                    // existing document wholesale.
                    operation: Some(Operation::Update(Document {
                        name: self.document_name(&id),
                        fields: document.fields,
                        ..Default::default()
                    })),
                    ..Default::default()
                };
                ids.push(id);
                write
            })
            .collect();

        let request = CommitRequest {
            database: self.database_path.clone(),
            writes,
            ..Default::default()
        };
        self.client.get().commit(request).await?;
        Ok(ids)
    }
}
