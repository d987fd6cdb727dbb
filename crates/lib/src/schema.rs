//! # Tabular Schema Model
//!
//! A schema is a frozen field-name to logical-type mapping supplied by the
//! host pipeline before any record flows. Sink plugins validate it once at
//! configuration time and treat it as immutable for the rest of the run.

use serde::{Deserialize, Serialize};

/// The logical type of a single input field.
///
/// This is a closed set. A schema containing anything outside it is rejected
/// by validation before the first record is processed, so mapping code never
/// has to deal with an open-ended type universe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Double,
    Boolean,
    Bytes,
    Int32,
    Float,
    Int64,
    /// A 64-bit microsecond count tagged as a timestamp.
    TimestampMicros,
    /// A 64-bit millisecond count tagged as a timestamp.
    TimestampMillis,
    Null,
    /// A nested record with its own named fields.
    Record(Vec<Field>),
    /// An ordered list of elements sharing one type.
    Array(Box<FieldType>),
    /// One of several possible types, including the possibility of null.
    Union(Vec<FieldType>),
}

impl FieldType {
    /// The single non-null branch of a union, if one exists.
    ///
    /// Non-union types resolve to themselves. A union whose branches are all
    /// `Null` has no non-null branch.
    pub fn non_null_branch(&self) -> Option<&FieldType> {
        match self {
            FieldType::Union(branches) => {
                branches.iter().find(|b| !matches!(b, FieldType::Null))
            }
            FieldType::Null => None,
            other => Some(other),
        }
    }

    /// Whether a null value is admissible for this type.
    pub fn is_nullable(&self) -> bool {
        match self {
            FieldType::Null => true,
            FieldType::Union(branches) => branches.iter().any(FieldType::is_nullable),
            _ => false,
        }
    }

    /// Human-readable name used in validation reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Double => "double",
            FieldType::Boolean => "boolean",
            FieldType::Bytes => "bytes",
            FieldType::Int32 => "int",
            FieldType::Float => "float",
            FieldType::Int64 => "long",
            FieldType::TimestampMicros => "timestamp (microseconds)",
            FieldType::TimestampMillis => "timestamp (milliseconds)",
            FieldType::Null => "null",
            FieldType::Record(_) => "record",
            FieldType::Array(_) => "array",
            FieldType::Union(_) => "union",
        }
    }
}

/// One named field of a schema.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// An immutable record schema, homogeneous across a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks a field up by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
