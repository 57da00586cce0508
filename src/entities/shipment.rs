//! Shipment entity - a device moving through the supply chain

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::filter::Filterable;
use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::metrics::Percent;
use crate::core::record::{Record, StatusStyle, Tone};

/// Shipment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[default]
    Processing,
    InTransit,
    Delivered,
    Delayed,
    /// Unrecognized status values deserialize here and render muted
    #[serde(other)]
    Unknown,
}

impl ShipmentStatus {
    /// Canonical facet value for filtering
    pub fn key(&self) -> &'static str {
        match self {
            ShipmentStatus::Processing => "processing",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Delayed => "delayed",
            ShipmentStatus::Unknown => "unknown",
        }
    }

    /// Display metadata, defined once for the whole tool
    pub fn style(&self) -> StatusStyle {
        match self {
            ShipmentStatus::Processing => StatusStyle::new("Processing", Tone::Warning),
            ShipmentStatus::InTransit => StatusStyle::new("In Transit", Tone::Info),
            ShipmentStatus::Delivered => StatusStyle::new("Delivered", Tone::Success),
            ShipmentStatus::Delayed => StatusStyle::new("Delayed", Tone::Danger),
            ShipmentStatus::Unknown => StatusStyle::new("Unknown", Tone::Muted),
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.style().label)
    }
}

impl std::str::FromStr for ShipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "processing" => Ok(ShipmentStatus::Processing),
            "in_transit" => Ok(ShipmentStatus::InTransit),
            "delivered" => Ok(ShipmentStatus::Delivered),
            "delayed" => Ok(ShipmentStatus::Delayed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// One checkpoint on a shipment's route, in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentStage {
    /// Stage name ("Package Received", "Customs Clearance")
    pub name: String,

    pub completed: bool,

    /// Carrier-reported scan time, verbatim; absent until the stage happens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A shipment moving a device between sites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    /// Unique identifier (SC- prefix)
    pub id: RecordId,

    /// The device being moved
    pub device: RecordId,

    /// Device display name, carried for listings
    pub device_name: String,

    pub origin: String,

    pub destination: String,

    #[serde(default)]
    pub status: ShipmentStatus,

    /// Route completion so far
    #[serde(default)]
    pub progress: Percent,

    /// Estimated arrival date
    pub eta: NaiveDate,

    pub carrier: String,

    pub tracking_number: String,

    /// Ordered route checkpoints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<ShipmentStage>,
}

impl Shipment {
    /// How many route stages are done
    pub fn completed_stages(&self) -> usize {
        self.stages.iter().filter(|s| s.completed).count()
    }

    /// The next stage still outstanding, if the route is not finished
    pub fn current_stage(&self) -> Option<&ShipmentStage> {
        self.stages.iter().find(|s| !s.completed)
    }
}

impl Record for Shipment {
    const PREFIX: RecordPrefix = RecordPrefix::Shipment;
    const DIR: &'static str = "shipments";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.device_name
    }

    fn status_style(&self) -> StatusStyle {
        self.status.style()
    }
}

impl Filterable for Shipment {
    fn search_text(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.device_name.clone(),
            self.origin.clone(),
            self.destination.clone(),
            self.carrier.clone(),
            self.tracking_number.clone(),
        ]
    }

    fn facet(&self, key: &str) -> Option<String> {
        match key {
            "status" => Some(self.status.key().to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterQuery;

    fn shipment() -> Shipment {
        Shipment {
            id: RecordId::shipment(2024, 1),
            device: RecordId::device(1235),
            device_name: "MacBook Pro 16\"".to_string(),
            origin: "Shenzhen, China".to_string(),
            destination: "San Francisco, CA".to_string(),
            status: ShipmentStatus::InTransit,
            progress: Percent::new(65),
            eta: NaiveDate::from_ymd_opt(2024, 1, 25).unwrap(),
            carrier: "DHL Express".to_string(),
            tracking_number: "DHL1234567890".to_string(),
            stages: vec![
                ShipmentStage {
                    name: "Package Received".to_string(),
                    completed: true,
                    timestamp: Some("Jan 15, 10:30 AM".to_string()),
                },
                ShipmentStage {
                    name: "In Transit".to_string(),
                    completed: true,
                    timestamp: Some("Jan 16, 2:15 PM".to_string()),
                },
                ShipmentStage {
                    name: "Customs Clearance".to_string(),
                    completed: false,
                    timestamp: None,
                },
                ShipmentStage {
                    name: "Out for Delivery".to_string(),
                    completed: false,
                    timestamp: None,
                },
            ],
        }
    }

    #[test]
    fn test_stage_progress() {
        let s = shipment();
        assert_eq!(s.completed_stages(), 2);
        assert_eq!(s.current_stage().unwrap().name, "Customs Clearance");
    }

    #[test]
    fn test_all_stages_done_has_no_current() {
        let mut s = shipment();
        for stage in &mut s.stages {
            stage.completed = true;
        }
        assert!(s.current_stage().is_none());
    }

    #[test]
    fn test_search_by_tracking_number() {
        let shipments = vec![shipment()];
        let query = FilterQuery::new().with_term("dhl123");
        assert_eq!(query.apply(&shipments).len(), 1);
    }

    #[test]
    fn test_progress_clamped_on_load() {
        let yaml = r#"
id: SC-2024-009
device: NX-001234
device_name: Gadget
origin: A
destination: B
status: in_transit
progress: 250
eta: 2024-02-01
carrier: UPS
tracking_number: T1
"#;
        let s: Shipment = serde_yml::from_str(yaml).unwrap();
        assert_eq!(s.progress.value(), 100);
    }

    #[test]
    fn test_status_styles() {
        assert_eq!(ShipmentStatus::Delivered.style().tone, Tone::Success);
        assert_eq!(ShipmentStatus::Delayed.style().tone, Tone::Danger);
        assert_eq!(ShipmentStatus::Processing.style().tone, Tone::Warning);
        assert_eq!(ShipmentStatus::InTransit.style().label, "In Transit");
    }
}
