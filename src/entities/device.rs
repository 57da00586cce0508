//! Device entity - a registered unit in the tracked fleet

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::filter::Filterable;
use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::record::{Record, StatusStyle, Tone};

/// Device category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Smartphone,
    Laptop,
    Tablet,
    Desktop,
    /// Catch-all; unrecognized categories land here instead of failing
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// Canonical facet value for filtering
    pub fn key(&self) -> &'static str {
        match self {
            Category::Smartphone => "smartphone",
            Category::Laptop => "laptop",
            Category::Tablet => "tablet",
            Category::Desktop => "desktop",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Smartphone => "Smartphone",
            Category::Laptop => "Laptop",
            Category::Tablet => "Tablet",
            Category::Desktop => "Desktop",
            Category::Other => "Other",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Smartphone,
            Category::Laptop,
            Category::Tablet,
            Category::Desktop,
            Category::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smartphone" | "phone" => Ok(Category::Smartphone),
            "laptop" => Ok(Category::Laptop),
            "tablet" => Ok(Category::Tablet),
            "desktop" => Ok(Category::Desktop),
            "other" => Ok(Category::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Lifecycle status of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    #[default]
    Active,
    InTransit,
    EndOfLife,
    Refurbishment,
    /// Unrecognized status values deserialize here and render muted
    #[serde(other)]
    Unknown,
}

impl DeviceStatus {
    /// Canonical facet value for filtering
    pub fn key(&self) -> &'static str {
        match self {
            DeviceStatus::Active => "active",
            DeviceStatus::InTransit => "in_transit",
            DeviceStatus::EndOfLife => "end_of_life",
            DeviceStatus::Refurbishment => "refurbishment",
            DeviceStatus::Unknown => "unknown",
        }
    }

    /// Display metadata, defined once for the whole tool
    pub fn style(&self) -> StatusStyle {
        match self {
            DeviceStatus::Active => StatusStyle::new("Active", Tone::Success),
            DeviceStatus::InTransit => StatusStyle::new("In Transit", Tone::Info),
            DeviceStatus::EndOfLife => StatusStyle::new("End of Life", Tone::Danger),
            DeviceStatus::Refurbishment => StatusStyle::new("Refurbishment", Tone::Warning),
            DeviceStatus::Unknown => StatusStyle::new("Unknown", Tone::Muted),
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.style().label)
    }
}

impl std::str::FromStr for DeviceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "active" => Ok(DeviceStatus::Active),
            "in_transit" => Ok(DeviceStatus::InTransit),
            "end_of_life" => Ok(DeviceStatus::EndOfLife),
            "refurbishment" => Ok(DeviceStatus::Refurbishment),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// A device registered in the fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Unique identifier (NX- prefix)
    pub id: RecordId,

    /// Display name ("iPhone 14 Pro")
    pub name: String,

    pub manufacturer: String,

    pub model: String,

    /// Manufacturer serial number
    pub serial_number: String,

    #[serde(default)]
    pub category: Category,

    #[serde(default)]
    pub status: DeviceStatus,

    /// Date the device entered the registry
    pub registered: NaiveDate,

    /// Date of the last lifecycle event
    pub last_update: NaiveDate,

    pub owner: String,

    pub location: String,
}

impl Record for Device {
    const PREFIX: RecordPrefix = RecordPrefix::Device;
    const DIR: &'static str = "devices";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn status_style(&self) -> StatusStyle {
        self.status.style()
    }
}

impl Filterable for Device {
    fn search_text(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.manufacturer.clone(),
            self.id.to_string(),
        ]
    }

    fn facet(&self, key: &str) -> Option<String> {
        match key {
            "status" => Some(self.status.key().to_string()),
            "category" => Some(self.category.key().to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterQuery;

    fn device(serial: u32, name: &str, status: DeviceStatus) -> Device {
        Device {
            id: RecordId::device(serial),
            name: name.to_string(),
            manufacturer: "Apple Inc.".to_string(),
            model: "A2894".to_string(),
            serial_number: "F2LLD3K8P0H1".to_string(),
            category: Category::Smartphone,
            status,
            registered: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            last_update: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            owner: "TechCorp Ltd".to_string(),
            location: "San Francisco, CA".to_string(),
        }
    }

    fn registry() -> Vec<Device> {
        vec![
            device(1234, "iPhone 14 Pro", DeviceStatus::Active),
            device(1235, "MacBook Pro", DeviceStatus::InTransit),
        ]
    }

    #[test]
    fn test_search_matches_name_case_insensitively() {
        let devices = registry();
        let query = FilterQuery::new().with_term("mac").with_facet("status", "all");
        let result = query.apply(&devices);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.to_string(), "NX-001235");
    }

    #[test]
    fn test_status_facet_narrows_registry() {
        let devices = registry();
        let query = FilterQuery::new()
            .with_term("")
            .with_facet("status", DeviceStatus::Active.key());
        let result = query.apply(&devices);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.to_string(), "NX-001234");
    }

    #[test]
    fn test_unknown_status_never_fails_deserialization() {
        let yaml = r#"
id: NX-009999
name: Mystery Box
manufacturer: Acme
model: X
serial_number: SN1
category: lavalamp
status: teleporting
registered: 2024-01-01
last_update: 2024-01-02
owner: Nobody
location: Nowhere
"#;
        let d: Device = serde_yml::from_str(yaml).unwrap();
        assert_eq!(d.status, DeviceStatus::Unknown);
        assert_eq!(d.category, Category::Other);
        assert_eq!(d.status_style().tone, Tone::Muted);
    }

    #[test]
    fn test_status_styles() {
        assert_eq!(DeviceStatus::Active.style().tone, Tone::Success);
        assert_eq!(DeviceStatus::InTransit.style().label, "In Transit");
        assert_eq!(DeviceStatus::EndOfLife.style().tone, Tone::Danger);
        assert_eq!(DeviceStatus::Refurbishment.style().tone, Tone::Warning);
    }

    #[test]
    fn test_status_from_str_accepts_display_form() {
        let parsed: DeviceStatus = "In Transit".parse().unwrap();
        assert_eq!(parsed, DeviceStatus::InTransit);
        let parsed: DeviceStatus = "end-of-life".parse().unwrap();
        assert_eq!(parsed, DeviceStatus::EndOfLife);
    }

    #[test]
    fn test_yaml_roundtrip_keeps_snake_case_status() {
        let d = device(1234, "iPhone 14 Pro", DeviceStatus::EndOfLife);
        let yaml = serde_yml::to_string(&d).unwrap();
        assert!(yaml.contains("status: end_of_life"));
        assert!(yaml.contains("id: NX-001234"));
    }
}
