//! # Record to Document Transformation
//!
//! Builds one Firestore-bound document per input record: every schema field
//! is mapped by name, then the identifier policy resolves what the document
//! will be addressed by. Pure per record; batching and commits live in
//! [`crate::batch`].

use crate::mapper::{map_value, TransformError};
use docsink::{Record, Schema, Value};
use gcloud_sdk::google::firestore::v1::{value::ValueType, Value as StoreValue};
use std::collections::HashMap;

/// Identifier resolution policy, fixed at configuration time. Exactly one
/// mode is active per run.
#[derive(Debug, Clone, PartialEq)]
pub enum IdPolicy {
    /// Identifiers are assigned at write time; documents carry none.
    AutoGenerated,
    /// The identifier is extracted from the named input field and removed
    /// from the document body before writing.
    Custom { field: String },
}

/// The identifier slot of a document awaiting commit.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentId {
    /// Minted by the store boundary at write time.
    Auto,
    /// Supplied by the record.
    Named(String),
}

/// A document ready for commit: the resolved identifier plus the field-name
/// to store-value mapping.
///
/// Equality is mapping equality; field iteration order carries no meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDocument {
    pub id: DocumentId,
    pub fields: HashMap<String, StoreValue>,
}

/// Converts full records into documents against a frozen schema.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    schema: Schema,
    id_policy: IdPolicy,
}

impl DocumentBuilder {
    /// The schema and policy are pre-validated: in custom mode the id field
    /// exists and is a non-nullable string.
    pub fn new(schema: Schema, id_policy: IdPolicy) -> Self {
        Self { schema, id_policy }
    }

    /// Transforms one record. A field absent from the record maps to the
    /// explicit null marker.
    pub fn build(&self, record: &Record) -> Result<PendingDocument, TransformError> {
        let mut fields = HashMap::with_capacity(self.schema.fields().len());
        let absent = Value::Null;
        for field in self.schema.fields() {
            let value = record.get(&field.name).unwrap_or(&absent);
            fields.insert(
                field.name.clone(),
                map_value(&field.name, &field.field_type, value)?,
            );
        }

        let id = match &self.id_policy {
            IdPolicy::AutoGenerated => DocumentId::Auto,
            IdPolicy::Custom { field } => match fields.remove(field).and_then(|v| v.value_type) {
                Some(ValueType::StringValue(id)) => DocumentId::Named(id),
                _ => {
                    return Err(TransformError::InvalidId {
                        field: field.clone(),
                    })
                }
            },
        };

        Ok(PendingDocument { id, fields })
    }
}
