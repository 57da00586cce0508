//! Embedded JSON Schema registry

use rust_embed::Embed;
use std::collections::HashMap;

use crate::core::identity::RecordPrefix;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// JSON Schemas compiled into the binary, keyed by record prefix
pub struct SchemaRegistry {
    schemas: HashMap<RecordPrefix, String>,
}

impl SchemaRegistry {
    /// Schema filename for a record prefix
    pub fn filename(prefix: RecordPrefix) -> &'static str {
        match prefix {
            RecordPrefix::Device => "device.schema.json",
            RecordPrefix::Shipment => "shipment.schema.json",
            RecordPrefix::Batch => "batch.schema.json",
            RecordPrefix::Job => "job.schema.json",
            RecordPrefix::User => "profile.schema.json",
        }
    }

    /// Schema source for a record prefix, if embedded
    pub fn get(&self, prefix: RecordPrefix) -> Option<&str> {
        self.schemas.get(&prefix).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        let mut schemas = HashMap::new();

        for prefix in RecordPrefix::all() {
            if let Some(file) = EmbeddedSchemas::get(Self::filename(*prefix)) {
                if let Ok(text) = std::str::from_utf8(&file.data) {
                    schemas.insert(*prefix, text.to_string());
                }
            }
        }

        Self { schemas }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_prefixes_have_schemas() {
        let registry = SchemaRegistry::default();
        assert_eq!(registry.len(), RecordPrefix::all().len());
        for prefix in RecordPrefix::all() {
            assert!(registry.get(*prefix).is_some(), "missing {:?}", prefix);
        }
    }

    #[test]
    fn test_schemas_are_valid_json() {
        let registry = SchemaRegistry::default();
        for prefix in RecordPrefix::all() {
            let source = registry.get(*prefix).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(source).unwrap();
            assert_eq!(parsed["type"], "object");
        }
    }
}
