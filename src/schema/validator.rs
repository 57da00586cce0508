//! JSON Schema validation with miette diagnostics

use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, IntoDiagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::core::identity::RecordPrefix;
use crate::schema::registry::SchemaRegistry;

/// Validation failure for one file, with source spans
#[derive(Debug, Error, Diagnostic)]
#[error("Schema validation failed: {summary}")]
#[diagnostic(code(dlt::schema::validation_error))]
pub struct ValidationError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<SchemaViolation>,
}

/// A single schema violation
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl SchemaViolation {
    pub fn new(message: String, hint: String, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            span,
            message,
            hint,
            help,
        }
    }
}

impl ValidationError {
    pub fn new(filename: &str, source: &str, violations: Vec<SchemaViolation>) -> Self {
        let summary = if violations.len() == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", violations.len())
        };
        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// Outcome of checking one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCheck {
    Passed,
    /// Not a known record file, nothing to check against
    Skipped,
}

/// Schema validator with compiled schemas
pub struct Validator {
    compiled: HashMap<RecordPrefix, JsonValidator>,
}

impl Validator {
    /// Compile every schema the registry carries
    pub fn new(registry: &SchemaRegistry) -> Self {
        let mut compiled = HashMap::new();

        for prefix in RecordPrefix::all() {
            if let Some(schema_str) = registry.get(*prefix) {
                if let Ok(schema_json) = serde_json::from_str::<JsonValue>(schema_str) {
                    if let Ok(schema) = validator_for(&schema_json) {
                        compiled.insert(*prefix, schema);
                    }
                }
            }
        }

        Self { compiled }
    }

    /// Validate YAML content against the schema for the given record type
    ///
    /// Collects every violation in the file, not just the first.
    pub fn validate(
        &self,
        content: &str,
        filename: &str,
        prefix: RecordPrefix,
    ) -> Result<(), ValidationError> {
        let yaml_value: serde_yml::Value = match serde_yml::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                let span = find_error_span(content, e.location());
                let violation = SchemaViolation::new(
                    format!("YAML parse error: {}", e),
                    "invalid YAML".to_string(),
                    span,
                    Some("Check YAML syntax: indentation, colons, quotes".to_string()),
                );
                return Err(ValidationError::new(filename, content, vec![violation]));
            }
        };

        let json_value: JsonValue = match serde_json::to_value(&yaml_value) {
            Ok(v) => v,
            Err(e) => {
                let violation = SchemaViolation::new(
                    format!("Failed to convert YAML to JSON: {}", e),
                    "conversion error".to_string(),
                    (0, content.len()).into(),
                    None,
                );
                return Err(ValidationError::new(filename, content, vec![violation]));
            }
        };

        // No schema for this type means nothing to check against
        let Some(schema) = self.compiled.get(&prefix) else {
            return Ok(());
        };

        let violations: Vec<SchemaViolation> = schema
            .iter_errors(&json_value)
            .map(|e| error_to_violation(content, &e))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(filename, content, violations))
        }
    }

    /// Validate a record file, inferring the record type from its name
    pub fn validate_file(&self, path: &Path) -> miette::Result<FileCheck> {
        let content = std::fs::read_to_string(path).into_diagnostic()?;
        let filename = path.file_name().unwrap_or_default().to_string_lossy();

        let prefix =
            RecordPrefix::from_filename(&filename).or_else(|| RecordPrefix::from_path(path));

        match prefix {
            Some(p) => {
                self.validate(&content, &filename, p)?;
                Ok(FileCheck::Passed)
            }
            None => Ok(FileCheck::Skipped),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&SchemaRegistry::default())
    }
}

fn error_to_violation(content: &str, error: &JsonSchemaError) -> SchemaViolation {
    let path = error.instance_path.to_string();
    let message = format_schema_error(error);
    let hint = format_error_hint(error);
    let help = generate_help_message(error);
    let span = find_path_span(content, &path);

    SchemaViolation::new(message, hint, span, help)
}

/// Turn a JSON Schema error into a readable message
fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "document root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let prop = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: {} at {}", prop, path)
        }
        jsonschema::error::ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        jsonschema::error::ValidationErrorKind::Pattern { pattern } => {
            format!("Value at {} doesn't match pattern: {}", path, pattern)
        }
        jsonschema::error::ValidationErrorKind::MinLength { limit } => {
            format!("Value at {} is too short: minimum {} characters", path, limit)
        }
        jsonschema::error::ValidationErrorKind::Minimum { limit } => {
            format!("Value at {} is too small: minimum {}", path, limit)
        }
        jsonschema::error::ValidationErrorKind::Maximum { limit } => {
            format!("Value at {} is too large: maximum {}", path, limit)
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        _ => format!("Validation error at {}: {}", path, error),
    }
}

/// Short hint for the span label
fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { .. } => {
            "required field missing".to_string()
        }
        jsonschema::error::ValidationErrorKind::Type { .. } => "wrong type".to_string(),
        jsonschema::error::ValidationErrorKind::Pattern { .. } => "pattern mismatch".to_string(),
        jsonschema::error::ValidationErrorKind::MinLength { .. } => "too short".to_string(),
        jsonschema::error::ValidationErrorKind::Minimum { .. } => "out of range".to_string(),
        jsonschema::error::ValidationErrorKind::Maximum { .. } => "out of range".to_string(),
        jsonschema::error::ValidationErrorKind::AdditionalProperties { .. } => {
            "unknown field".to_string()
        }
        _ => "validation error".to_string(),
    }
}

/// Fix-it suggestion, when one is obvious
fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let prop = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            Some(format!("Add the '{}' field to your file", prop))
        }
        jsonschema::error::ValidationErrorKind::Pattern { pattern } => {
            if pattern.contains("NX-") {
                Some("ID format: NX-[serial], e.g., NX-001234".to_string())
            } else if pattern.contains("\\d{4}-\\d{2}-\\d{2}") {
                Some("Use a YYYY-MM-DD date".to_string())
            } else {
                None
            }
        }
        jsonschema::error::ValidationErrorKind::Type { kind } => {
            Some(format!("Expected value of type: {:?}", kind))
        }
        jsonschema::error::ValidationErrorKind::Maximum { limit } => {
            Some(format!("Use a value no larger than {}", limit))
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            if unexpected.len() == 1 {
                Some(format!(
                    "Remove the '{}' field or check spelling",
                    unexpected[0]
                ))
            } else {
                Some("Remove unknown fields or check spelling".to_string())
            }
        }
        _ => None,
    }
}

/// Span for a YAML parse error location
fn find_error_span(content: &str, location: Option<serde_yml::Location>) -> SourceSpan {
    if let Some(loc) = location {
        let line = loc.line().saturating_sub(1);
        let column = loc.column().saturating_sub(1);

        let mut offset = 0;
        for (i, line_content) in content.lines().enumerate() {
            if i == line {
                offset += column;
                break;
            }
            offset += line_content.len() + 1;
        }

        let rest = &content[offset.min(content.len())..];
        let len = rest.find('\n').unwrap_or(rest.len()).max(1);

        (offset, len).into()
    } else {
        let len = content.find('\n').unwrap_or(content.len()).max(1);
        (0, len).into()
    }
}

/// Span for a JSON pointer path inside YAML content
fn find_path_span(content: &str, json_path: &str) -> SourceSpan {
    let parts: Vec<&str> = json_path.split('/').filter(|s| !s.is_empty()).collect();

    if parts.is_empty() {
        let len = content.find('\n').unwrap_or(content.len()).max(1);
        return (0, len).into();
    }

    let search_key = parts.last().unwrap_or(&"");

    // Array indices point back at their parent key
    if search_key.parse::<usize>().is_ok() && parts.len() >= 2 {
        let parent_key = parts[parts.len() - 2];
        if let Some(span) = find_key_span(content, parent_key) {
            return span;
        }
    }

    if let Some(span) = find_key_span(content, search_key) {
        return span;
    }

    let len = content.find('\n').unwrap_or(content.len()).max(1);
    (0, len).into()
}

/// Byte span of `key:` at the start of a line
fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let pattern = format!("{}:", key);

    let mut offset = 0;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with(&pattern) {
            let indent = line.len() - trimmed.len();
            return Some((offset + indent, key.len()).into());
        }
        offset += line.len() + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_DEVICE: &str = r#"
id: NX-001234
name: "iPhone 14 Pro"
manufacturer: "Apple Inc."
model: "A2894"
serial_number: "F2LLD3K8P0H1"
category: smartphone
status: active
registered: 2024-01-15
last_update: 2024-01-20
owner: "TechCorp Ltd"
location: "San Francisco, CA"
"#;

    #[test]
    fn test_valid_device_passes() {
        let validator = Validator::default();
        let result = validator.validate(VALID_DEVICE, "NX-001234.dlt.yaml", RecordPrefix::Device);
        assert!(result.is_ok(), "expected pass: {:?}", result.err());
    }

    #[test]
    fn test_unrecognized_status_still_passes() {
        // Status values are plain strings in the schema; unknown ones render
        // muted rather than failing validation.
        let yaml = VALID_DEVICE.replace("status: active", "status: vaporized");
        let validator = Validator::default();
        let result = validator.validate(&yaml, "NX-001234.dlt.yaml", RecordPrefix::Device);
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let yaml = r#"
id: NX-001234
name: "iPhone 14 Pro"
"#;
        let validator = Validator::default();
        let err = validator
            .validate(yaml, "NX-001234.dlt.yaml", RecordPrefix::Device)
            .unwrap_err();
        assert!(err.violation_count() >= 5);
    }

    #[test]
    fn test_progress_out_of_range() {
        let yaml = r#"
id: SC-2024-001
device: NX-001234
device_name: "iPhone 14 Pro"
origin: "Cupertino, CA"
destination: "New York, NY"
progress: 250
eta: 2024-01-25
carrier: FedEx
tracking_number: "1234567890"
"#;
        let validator = Validator::default();
        let err = validator
            .validate(yaml, "SC-2024-001.dlt.yaml", RecordPrefix::Shipment)
            .unwrap_err();
        assert_eq!(err.violation_count(), 1);
    }

    #[test]
    fn test_unknown_field_flagged() {
        let yaml = format!("{}warranty: lifetime\n", VALID_DEVICE);
        let validator = Validator::default();
        let err = validator
            .validate(&yaml, "NX-001234.dlt.yaml", RecordPrefix::Device)
            .unwrap_err();
        assert_eq!(err.violation_count(), 1);
    }

    #[test]
    fn test_broken_yaml_reports_parse_error() {
        let validator = Validator::default();
        let err = validator
            .validate("{ not: [ valid", "NX-000001.dlt.yaml", RecordPrefix::Device)
            .unwrap_err();
        assert_eq!(err.violation_count(), 1);
    }

    #[test]
    fn test_key_span_lookup() {
        let content = "id: NX-001234\nname: Gadget\n";
        let span = find_key_span(content, "name").unwrap();
        assert_eq!(span.offset(), 14);
    }
}
