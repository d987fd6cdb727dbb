//! # `docsink`: Sink Plugin Contracts
//!
//! This crate defines the contract between a host ETL pipeline and the sink
//! plugins that write its records to external document stores. It carries the
//! tabular data model (schema, record, value), the `DocumentSink` trait every
//! plugin implements, the shared error taxonomy, and the aggregating
//! validation collector used to report configuration problems before any data
//! movement begins.

pub mod record;
pub mod schema;
pub mod sink;
pub mod validate;

pub use record::{Record, RecordBuilder, Value};
pub use schema::{Field, FieldType, Schema};
pub use sink::{DocumentSink, SinkError, WriteSummary};
pub use validate::{ValidationCollector, ValidationFailure};
