//! Recycling batch entity - devices grouped for material recovery

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::filter::Filterable;
use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::metrics::Percent;
use crate::core::record::{Record, StatusStyle, Tone};

/// Recycling batch status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    #[default]
    Scheduled,
    Processing,
    Completed,
    /// Unrecognized status values deserialize here and render muted
    #[serde(other)]
    Unknown,
}

impl BatchStatus {
    /// Canonical facet value for filtering
    pub fn key(&self) -> &'static str {
        match self {
            BatchStatus::Scheduled => "scheduled",
            BatchStatus::Processing => "processing",
            BatchStatus::Completed => "completed",
            BatchStatus::Unknown => "unknown",
        }
    }

    /// Display metadata, defined once for the whole tool
    pub fn style(&self) -> StatusStyle {
        match self {
            BatchStatus::Scheduled => StatusStyle::new("Scheduled", Tone::Muted),
            BatchStatus::Processing => StatusStyle::new("Processing", Tone::Info),
            BatchStatus::Completed => StatusStyle::new("Completed", Tone::Success),
            BatchStatus::Unknown => StatusStyle::new("Unknown", Tone::Muted),
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.style().label)
    }
}

impl std::str::FromStr for BatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "scheduled" => Ok(BatchStatus::Scheduled),
            "processing" => Ok(BatchStatus::Processing),
            "completed" => Ok(BatchStatus::Completed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Recovery figures for one material stream within a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRecovery {
    /// Material name ("Aluminum", "Rare Earth")
    pub material: String,

    pub recovered_kg: f64,

    pub total_kg: f64,
}

impl MaterialRecovery {
    /// Recovered share of the stream
    pub fn rate(&self) -> Percent {
        if self.total_kg <= 0.0 {
            return Percent::new(0);
        }
        Percent::new((self.recovered_kg / self.total_kg * 100.0).round() as i64)
    }
}

/// A batch of devices queued for recycling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecyclingBatch {
    /// Unique identifier (RC- prefix)
    pub id: RecordId,

    /// Number of devices in the batch
    pub device_count: u32,

    /// Device type labels in the batch ("Smartphones", "Tablets")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub device_types: Vec<String>,

    pub facility: String,

    #[serde(default)]
    pub status: BatchStatus,

    pub start_date: NaiveDate,

    pub estimated_completion: NaiveDate,

    /// Overall material recovery; 0 means not yet assessed
    #[serde(default)]
    pub material_recovery: Percent,

    /// Carbon impact as reported by the facility ("2.4 tons")
    pub carbon_saved: String,

    /// Per-material recovery figures, when the facility has reported them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<MaterialRecovery>,
}

impl RecyclingBatch {
    /// Recovery for display; the zero sentinel renders as pending
    pub fn recovery_label(&self) -> String {
        if self.material_recovery.is_zero() {
            "Pending".to_string()
        } else {
            self.material_recovery.to_string()
        }
    }

    /// True once the facility has reported a recovery figure
    pub fn is_assessed(&self) -> bool {
        !self.material_recovery.is_zero()
    }
}

impl Record for RecyclingBatch {
    const PREFIX: RecordPrefix = RecordPrefix::Batch;
    const DIR: &'static str = "recycling";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.facility
    }

    fn status_style(&self) -> StatusStyle {
        self.status.style()
    }
}

impl Filterable for RecyclingBatch {
    fn search_text(&self) -> Vec<String> {
        let mut fields = vec![self.id.to_string(), self.facility.clone()];
        fields.extend(self.device_types.iter().cloned());
        fields
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

    fn batch(seq: u32, status: BatchStatus, recovery: i64) -> RecyclingBatch {
        RecyclingBatch {
            id: RecordId::batch(2024, seq),
            device_count: 45,
            device_types: vec!["Smartphones".to_string(), "Tablets".to_string()],
            facility: "GreenTech Recycling Center".to_string(),
            status,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            estimated_completion: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            material_recovery: Percent::new(recovery),
            carbon_saved: "2.4 tons".to_string(),
            materials: vec![MaterialRecovery {
                material: "Aluminum".to_string(),
                recovered_kg: 450.0,
                total_kg: 500.0,
            }],
        }
    }

    #[test]
    fn test_recovery_zero_renders_pending() {
        let scheduled = batch(3, BatchStatus::Scheduled, 0);
        assert_eq!(scheduled.recovery_label(), "Pending");
        assert!(!scheduled.is_assessed());

        let done = batch(2, BatchStatus::Completed, 92);
        assert_eq!(done.recovery_label(), "92%");
        assert!(done.is_assessed());
    }

    #[test]
    fn test_material_rate() {
        let b = batch(1, BatchStatus::Processing, 85);
        assert_eq!(b.materials[0].rate().value(), 90);

        let empty = MaterialRecovery {
            material: "Gold".to_string(),
            recovered_kg: 0.0,
            total_kg: 0.0,
        };
        assert_eq!(empty.rate().value(), 0);
    }

    #[test]
    fn test_search_by_device_type_label() {
        let batches = vec![batch(1, BatchStatus::Processing, 85)];
        let query = FilterQuery::new().with_term("tablets");
        assert_eq!(query.apply(&batches).len(), 1);
    }

    #[test]
    fn test_status_facet() {
        let batches = vec![
            batch(1, BatchStatus::Processing, 85),
            batch(2, BatchStatus::Completed, 92),
        ];
        let query = FilterQuery::new().with_facet("status", "completed");
        let result = query.apply(&batches);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.to_string(), "RC-2024-002");
    }

    #[test]
    fn test_unknown_status_is_muted() {
        let yaml = r#"
id: RC-2024-009
device_count: 5
facility: Somewhere
status: vaporized
start_date: 2024-03-01
estimated_completion: 2024-03-05
carbon_saved: 0 tons
"#;
        let b: RecyclingBatch = serde_yml::from_str(yaml).unwrap();
        assert_eq!(b.status, BatchStatus::Unknown);
        assert_eq!(b.status_style().tone, Tone::Muted);
    }
}
