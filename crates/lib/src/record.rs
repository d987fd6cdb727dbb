//! # Record and Value Model
//!
//! Records are produced by the upstream source and are read-only to sink
//! plugins. Each record is an ordered field-name to value mapping conforming
//! to the run's frozen schema; timestamp fields carry their raw 64-bit counts
//! and rely on the schema's logical-type tag for the unit.

/// A runtime value carried by a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Double(f64),
    Boolean(bool),
    Bytes(Vec<u8>),
    Int32(i32),
    Float(f32),
    Int64(i64),
    Record(Record),
    Array(Vec<Value>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int64(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// An ordered field-name to value mapping.
///
/// A field absent from a record reads as null; the schema decides whether
/// that is admissible.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Looks a field value up by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder used by sources (and tests) to assemble records.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: Vec<(String, Value)>,
}

impl RecordBuilder {
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> Record {
        Record {
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_insertion_order() {
        let record = Record::builder()
            .set("b", 1i64)
            .set("a", "x")
            .build();
        let names: Vec<&str> = record.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn get_is_by_name() {
        let record = Record::builder().set("n", 5i64).build();
        assert_eq!(record.get("n"), Some(&Value::Int64(5)));
        assert_eq!(record.get("missing"), None);
    }
}
