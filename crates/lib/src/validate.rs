//! # Aggregating Configuration Validation
//!
//! Configuration and schema problems are reported all at once rather than on
//! the first one found, so a user sees every offending property and field in
//! a single report before any data movement begins.

use crate::sink::SinkError;
use std::fmt;

/// One validation failure, optionally tagged with the configuration property
/// or input schema field it concerns.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    message: String,
    correction: Option<String>,
    config_property: Option<String>,
    input_field: Option<String>,
}

impl ValidationFailure {
    /// Tags the failure with the configuration property it concerns.
    pub fn with_config_property(&mut self, property: &str) -> &mut Self {
        self.config_property = Some(property.to_string());
        self
    }

    /// Tags the failure with the input schema field it concerns.
    pub fn with_input_field(&mut self, field: &str) -> &mut Self {
        self.input_field = Some(field.to_string());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(correction) = &self.correction {
            write!(f, " {correction}")?;
        }
        if let Some(property) = &self.config_property {
            write!(f, " (property: {property})")?;
        }
        if let Some(field) = &self.input_field {
            write!(f, " (field: {field})")?;
        }
        Ok(())
    }
}

/// Collects validation failures across an entire configuration pass.
#[derive(Debug, Default)]
pub struct ValidationCollector {
    failures: Vec<ValidationFailure>,
}

impl ValidationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure and returns it for tagging.
    pub fn add_failure(
        &mut self,
        message: impl Into<String>,
        correction: Option<&str>,
    ) -> &mut ValidationFailure {
        self.failures.push(ValidationFailure {
            message: message.into(),
            correction: correction.map(String::from),
            config_property: None,
            input_field: None,
        });
        self.failures.last_mut().unwrap()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Resolves the pass: `Ok` when nothing was collected, otherwise a single
    /// `InvalidConfig` error listing every failure.
    pub fn into_result(self) -> Result<(), SinkError> {
        if self.failures.is_empty() {
            return Ok(());
        }
        let report = self
            .failures
            .iter()
            .map(|failure| format!("- {failure}"))
            .collect::<Vec<_>>()
            .join("\n");
        Err(SinkError::InvalidConfig(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collector_resolves_ok() {
        assert!(ValidationCollector::new().into_result().is_ok());
    }

    #[test]
    fn report_lists_every_failure() {
        let mut collector = ValidationCollector::new();
        collector
            .add_failure("Invalid batch size '0'.", Some("Use a value between 1 and 500."))
            .with_config_property("batch_size");
        collector
            .add_failure("Field 'blob' is of unsupported type.", None)
            .with_input_field("blob");

        let report = match collector.into_result().unwrap_err() {
            SinkError::InvalidConfig(report) => report,
            other => panic!("expected InvalidConfig, got {other:?}"),
        };
        assert!(report.contains("Invalid batch size '0'. Use a value between 1 and 500. (property: batch_size)"));
        assert!(report.contains("Field 'blob' is of unsupported type. (field: blob)"));
        assert_eq!(report.lines().count(), 2);
    }
}
