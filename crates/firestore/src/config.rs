//! # Sink Configuration
//!
//! Connection and mapping parameters for the Firestore sink, parseable from
//! a JSON descriptor. Validation runs once before any data movement and
//! aggregates every problem into a single report, so a user sees all of them
//! at once.

use crate::batch::MAX_BATCH_SIZE;
use crate::document::IdPolicy;
use docsink::{FieldType, Schema, SinkError, ValidationCollector};
use serde::Deserialize;
use uuid::Uuid;

/// Fallback identifier field when custom mode is selected without a name.
pub const DEFAULT_ID_FIELD: &str = "__id__";

const DEFAULT_DATABASE: &str = "(default)";

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

/// How documents written by the sink get their identifiers.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Identifiers are assigned at write time.
    #[default]
    AutoGenerated,
    /// Identifiers come from a designated input field.
    Custom,
}

/// Configuration of one Firestore sink run.
#[derive(Deserialize, Debug, Clone)]
pub struct FirestoreSinkConfig {
    /// Google Cloud project that owns the database.
    pub project_id: String,
    /// Firestore database name; `(default)` when not specified.
    #[serde(default = "default_database")]
    pub database_name: String,
    /// Target collection. Created by the store on first write if absent.
    pub collection: String,
    /// Service-account key file. When absent, application-default
    /// credentials are used.
    #[serde(default)]
    pub credentials_path: Option<String>,
    #[serde(default)]
    pub id_strategy: IdStrategy,
    /// Identifier source field; only consulted in custom mode. The field
    /// must exist in the schema as a non-nullable string.
    #[serde(default)]
    pub id_field: Option<String>,
    /// Maximum number of documents passed to one commit operation.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl FirestoreSinkConfig {
    /// Parses a configuration from its JSON descriptor.
    pub fn from_json(source: &str) -> Result<Self, SinkError> {
        serde_json::from_str(source).map_err(|e| {
            SinkError::InvalidConfig(format!("- Failed to parse sink configuration JSON: {e}"))
        })
    }

    /// The effective identifier field in custom mode.
    pub fn id_field(&self) -> &str {
        self.id_field
            .as_deref()
            .filter(|field| !field.is_empty())
            .unwrap_or(DEFAULT_ID_FIELD)
    }

    pub fn id_policy(&self) -> IdPolicy {
        match self.id_strategy {
            IdStrategy::AutoGenerated => IdPolicy::AutoGenerated,
            IdStrategy::Custom => IdPolicy::Custom {
                field: self.id_field().to_string(),
            },
        }
    }

    /// Validates the configuration against the input schema. All failures
    /// are collected before returning.
    pub fn validate(&self, schema: &Schema) -> Result<(), SinkError> {
        let mut collector = ValidationCollector::new();
        self.validate_batch_size(&mut collector);
        self.validate_collection(&mut collector);
        self.validate_database_name(&mut collector);
        self.validate_schema(schema, &mut collector);
        self.validate_id_field(schema, &mut collector);
        collector.into_result()
    }

    fn validate_batch_size(&self, collector: &mut ValidationCollector) {
        if self.batch_size < 1 || self.batch_size > MAX_BATCH_SIZE {
            collector
                .add_failure(
                    format!("Invalid batch size '{}'.", self.batch_size),
                    Some(&format!(
                        "Ensure the batch size is at least 1 and at most {MAX_BATCH_SIZE}."
                    )),
                )
                .with_config_property("batch_size");
        }
    }

    fn validate_collection(&self, collector: &mut ValidationCollector) {
        if self.collection.is_empty() {
            collector
                .add_failure("Collection must be specified.", None)
                .with_config_property("collection");
        }
    }

    fn validate_database_name(&self, collector: &mut ValidationCollector) {
        let name = self.database_name.as_str();
        if name == DEFAULT_DATABASE {
            return;
        }
        if name.is_empty() {
            collector
                .add_failure("Database name must be specified.", None)
                .with_config_property("database_name");
            return;
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            collector
                .add_failure(
                    "Database name can only include letters, numbers and hyphen characters.",
                    None,
                )
                .with_config_property("database_name");
        }
        if name.chars().any(|c| c.is_ascii_uppercase()) {
            collector
                .add_failure("Database name must be in lowercase.", None)
                .with_config_property("database_name");
        }
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            collector
                .add_failure("Database name must start with a letter.", None)
                .with_config_property("database_name");
        }
        if !name.ends_with(|c: char| c.is_ascii_alphanumeric()) {
            collector
                .add_failure("Database name must end with a letter or a number.", None)
                .with_config_property("database_name");
        }
        if name.len() < 4 {
            collector
                .add_failure("Database name should be at least 4 characters.", None)
                .with_config_property("database_name");
        }
        if name.len() > 63 {
            collector
                .add_failure("Database name cannot be more than 63 characters.", None)
                .with_config_property("database_name");
        }
        if Uuid::parse_str(name).is_ok() {
            collector
                .add_failure("Database name cannot be a UUID.", None)
                .with_config_property("database_name");
        }
    }

    fn validate_schema(&self, schema: &Schema, collector: &mut ValidationCollector) {
        if schema.is_empty() {
            collector.add_failure("Sink schema must contain at least one field.", None);
            return;
        }
        for field in schema.fields() {
            validate_field_type(&field.name, &field.field_type, collector);
        }
    }

    fn validate_id_field(&self, schema: &Schema, collector: &mut ValidationCollector) {
        if self.id_strategy != IdStrategy::Custom {
            return;
        }
        let id_field = self.id_field();
        match schema.field(id_field) {
            None => {
                collector
                    .add_failure(
                        format!("Id field '{id_field}' does not exist in the schema."),
                        Some("Change the id field to be one of the schema fields."),
                    )
                    .with_config_property("id_field");
            }
            Some(field) if field.field_type != FieldType::String => {
                let shown = field
                    .field_type
                    .non_null_branch()
                    .unwrap_or(&field.field_type);
                collector
                    .add_failure(
                        format!(
                            "Id field '{id_field}' is of unsupported type '{}'.",
                            shown.display_name()
                        ),
                        Some("Ensure the type is non-nullable string."),
                    )
                    .with_config_property("id_field")
                    .with_input_field(id_field);
            }
            Some(_) => {}
        }
    }
}

/// The type universe is closed, so the open-ended unsupported-type rejection
/// of the store reduces to shape constraints the mapper relies on: a union
/// must carry at most one non-null branch.
fn validate_field_type(name: &str, field_type: &FieldType, collector: &mut ValidationCollector) {
    match field_type {
        FieldType::Union(branches) => {
            let non_null = branches
                .iter()
                .filter(|b| !matches!(b, FieldType::Null))
                .count();
            if non_null > 1 {
                collector
                    .add_failure(
                        format!("Field '{name}' is a union with more than one non-null branch."),
                        Some("Use a union of one concrete type and null."),
                    )
                    .with_input_field(name);
            }
            for branch in branches {
                validate_field_type(name, branch, collector);
            }
        }
        FieldType::Record(fields) => {
            for nested in fields {
                validate_field_type(name, &nested.field_type, collector);
            }
        }
        FieldType::Array(element) => validate_field_type(name, element, collector),
        _ => {}
    }
}
