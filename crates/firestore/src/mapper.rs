//! # Logical Type Mapping
//!
//! Converts one semantically typed field value into its Firestore
//! representation. The mapping is a pure function: no side effects, and the
//! same (value, type) pair always produces the same store value. Unsupported
//! types never reach this module; the schema is validated before the first
//! record flows.

use chrono::{DateTime, Utc};
use docsink::{FieldType, Value};
use gcloud_sdk::google::firestore::v1::{
    value::ValueType, ArrayValue, MapValue, Value as StoreValue,
};
use gcloud_sdk::prost_types::Timestamp;
use std::collections::HashMap;
use thiserror::Error;

/// A defensive failure while turning a record value into a store value.
///
/// A pre-validated schema does not produce these at runtime. When one occurs
/// anyway, the run aborts: skipping part of a record has no safe meaning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Field '{field}' expects type '{expected}' but the record carries an incompatible value")]
    Mismatch { field: String, expected: &'static str },

    #[error("Field '{field}' holds an out-of-range timestamp count '{count}'")]
    InvalidTimestamp { field: String, count: i64 },

    #[error("Identifier field '{field}' is missing or not a string")]
    InvalidId { field: String },
}

/// The explicit null marker. Null fields are stored, not omitted.
pub(crate) fn null_value() -> StoreValue {
    StoreValue {
        value_type: Some(ValueType::NullValue(0)),
    }
}

/// Maps one field value according to its logical type.
///
/// `field` names the schema field being mapped and is only used to label
/// failures; nested values report under their top-level field.
pub fn map_value(
    field: &str,
    field_type: &FieldType,
    value: &Value,
) -> Result<StoreValue, TransformError> {
    let value_type = map_value_type(field, field_type, value)?;
    Ok(StoreValue {
        value_type: Some(value_type),
    })
}

fn map_value_type(
    field: &str,
    field_type: &FieldType,
    value: &Value,
) -> Result<ValueType, TransformError> {
    // Null values short-circuit every type, including union branches.
    if matches!(value, Value::Null) {
        return Ok(ValueType::NullValue(0));
    }

    match (field_type, value) {
        (FieldType::String, Value::String(s)) => Ok(ValueType::StringValue(s.clone())),
        (FieldType::Boolean, Value::Boolean(b)) => Ok(ValueType::BooleanValue(*b)),
        (FieldType::Bytes, Value::Bytes(bytes)) => Ok(ValueType::BytesValue(bytes.clone())),
        (FieldType::Double, Value::Double(d)) => Ok(ValueType::DoubleValue(*d)),
        (FieldType::Int64, Value::Int64(n)) => Ok(ValueType::IntegerValue(*n)),

        // The store has no 32-bit scalar types; widen.
        (FieldType::Int32, Value::Int32(n)) => Ok(ValueType::IntegerValue(i64::from(*n))),
        (FieldType::Float, Value::Float(x)) => Ok(ValueType::DoubleValue(f64::from(*x))),

        // Each timestamp unit maps through its own constructor; no rescaling.
        (FieldType::TimestampMicros, Value::Int64(count)) => {
            timestamp_value(field, DateTime::from_timestamp_micros(*count), *count)
        }
        (FieldType::TimestampMillis, Value::Int64(count)) => {
            timestamp_value(field, DateTime::from_timestamp_millis(*count), *count)
        }

        // Unions resolve to their single non-null branch; an all-null union
        // can only ever hold the null marker.
        (union @ FieldType::Union(_), value) => match union.non_null_branch() {
            Some(branch) => map_value_type(field, branch, value),
            None => Ok(ValueType::NullValue(0)),
        },

        (FieldType::Record(nested_fields), Value::Record(record)) => {
            let mut fields = HashMap::with_capacity(nested_fields.len());
            for nested in nested_fields {
                let mapped = match record.get(&nested.name) {
                    Some(nested_value) => map_value(field, &nested.field_type, nested_value)?,
                    None => null_value(),
                };
                fields.insert(nested.name.clone(), mapped);
            }
            Ok(ValueType::MapValue(MapValue { fields }))
        }

        (FieldType::Array(element_type), Value::Array(items)) => {
            let values = items
                .iter()
                .map(|item| map_value(field, element_type, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ValueType::ArrayValue(ArrayValue { values }))
        }

        (expected, _) => Err(TransformError::Mismatch {
            field: field.to_string(),
            expected: expected.display_name(),
        }),
    }
}

fn timestamp_value(
    field: &str,
    parsed: Option<DateTime<Utc>>,
    count: i64,
) -> Result<ValueType, TransformError> {
    let instant = parsed.ok_or_else(|| TransformError::InvalidTimestamp {
        field: field.to_string(),
        count,
    })?;
    Ok(ValueType::TimestampValue(Timestamp {
        seconds: instant.timestamp(),
        nanos: instant.timestamp_subsec_nanos() as i32,
    }))
}
