//! Refurbishment job entity - restoring a device for reuse

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::filter::Filterable;
use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::metrics::Percent;
use crate::core::record::{Record, StatusStyle, Tone};

/// Intake condition of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
    /// Unrecognized condition values deserialize here and render muted
    #[serde(other)]
    Unknown,
}

impl Condition {
    /// Canonical facet value for filtering
    pub fn key(&self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
            Condition::Unknown => "unknown",
        }
    }

    /// Display metadata, defined once for the whole tool
    pub fn style(&self) -> StatusStyle {
        match self {
            Condition::Excellent => StatusStyle::new("Excellent", Tone::Success),
            Condition::Good => StatusStyle::new("Good", Tone::Success),
            Condition::Fair => StatusStyle::new("Fair", Tone::Warning),
            Condition::Poor => StatusStyle::new("Poor", Tone::Danger),
            Condition::Unknown => StatusStyle::new("Unknown", Tone::Muted),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.style().label)
    }
}

impl std::str::FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excellent" => Ok(Condition::Excellent),
            "good" => Ok(Condition::Good),
            "fair" => Ok(Condition::Fair),
            "poor" => Ok(Condition::Poor),
            _ => Err(format!("Unknown condition: {}", s)),
        }
    }
}

/// Refurbishment job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Scheduled,
    InProgress,
    QualityCheck,
    Completed,
    OnHold,
    /// Unrecognized status values deserialize here and render muted
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Canonical facet value for filtering
    pub fn key(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::InProgress => "in_progress",
            JobStatus::QualityCheck => "quality_check",
            JobStatus::Completed => "completed",
            JobStatus::OnHold => "on_hold",
            JobStatus::Unknown => "unknown",
        }
    }

    /// Display metadata, defined once for the whole tool
    pub fn style(&self) -> StatusStyle {
        match self {
            JobStatus::Scheduled => StatusStyle::new("Scheduled", Tone::Muted),
            JobStatus::InProgress => StatusStyle::new("In Progress", Tone::Info),
            JobStatus::QualityCheck => StatusStyle::new("Quality Check", Tone::Warning),
            JobStatus::Completed => StatusStyle::new("Completed", Tone::Success),
            JobStatus::OnHold => StatusStyle::new("On Hold", Tone::Danger),
            JobStatus::Unknown => StatusStyle::new("Unknown", Tone::Muted),
        }
    }

    /// Statuses a job may move to from here
    ///
    /// The bench flow is Scheduled -> In Progress -> Quality Check ->
    /// Completed. A job can be put on hold from the bench and resumed, and a
    /// failed quality check sends it back to the bench.
    pub fn allowed_transitions(&self) -> Vec<JobStatus> {
        match self {
            JobStatus::Scheduled => vec![JobStatus::InProgress],
            JobStatus::InProgress => vec![JobStatus::QualityCheck, JobStatus::OnHold],
            JobStatus::QualityCheck => vec![JobStatus::Completed, JobStatus::InProgress],
            JobStatus::OnHold => vec![JobStatus::InProgress],
            JobStatus::Completed => vec![],
            JobStatus::Unknown => vec![],
        }
    }

    pub fn can_transition_to(&self, to: JobStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.style().label)
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "scheduled" => Ok(JobStatus::Scheduled),
            "in_progress" => Ok(JobStatus::InProgress),
            "quality_check" => Ok(JobStatus::QualityCheck),
            "completed" => Ok(JobStatus::Completed),
            "on_hold" => Ok(JobStatus::OnHold),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// A refurbishment job for one device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefurbishmentJob {
    /// Unique identifier (RF- prefix)
    pub id: RecordId,

    /// The device on the bench
    pub device: RecordId,

    /// Device display name, carried for listings
    pub device_name: String,

    #[serde(default)]
    pub condition: Condition,

    #[serde(default)]
    pub status: JobStatus,

    pub technician: String,

    pub facility: String,

    pub start_date: NaiveDate,

    pub estimated_completion: NaiveDate,

    #[serde(default)]
    pub progress: Percent,

    /// Post-refurbishment score; 0 means not yet scored
    #[serde(default)]
    pub quality_score: Percent,

    /// Outstanding issues found at intake or on the bench
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

impl RefurbishmentJob {
    /// Quality score for display; the zero sentinel renders as pending
    pub fn quality_label(&self) -> String {
        if self.is_scored() {
            self.quality_score.to_string()
        } else {
            "Pending".to_string()
        }
    }

    /// True once quality control has scored the finished job
    pub fn is_scored(&self) -> bool {
        !self.quality_score.is_zero()
    }
}

impl Record for RefurbishmentJob {
    const PREFIX: RecordPrefix = RecordPrefix::Job;
    const DIR: &'static str = "refurbishment";

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

impl Filterable for RefurbishmentJob {
    fn search_text(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.device.to_string(),
            self.device_name.clone(),
            self.technician.clone(),
            self.facility.clone(),
        ]
    }

    fn facet(&self, key: &str) -> Option<String> {
        match key {
            "status" => Some(self.status.key().to_string()),
            "condition" => Some(self.condition.key().to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterQuery;

    fn job(seq: u32, status: JobStatus, score: i64) -> RefurbishmentJob {
        RefurbishmentJob {
            id: RecordId::job(2024, seq),
            device: RecordId::device(1237),
            device_name: "Dell XPS 13".to_string(),
            condition: Condition::Good,
            status,
            technician: "Sarah Johnson".to_string(),
            facility: "RefurbTech SF".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            estimated_completion: NaiveDate::from_ymd_opt(2024, 1, 25).unwrap(),
            progress: Percent::new(65),
            quality_score: Percent::new(score),
            issues: vec!["Battery replacement needed".to_string()],
        }
    }

    #[test]
    fn test_quality_zero_renders_pending() {
        let unscored = job(1, JobStatus::InProgress, 0);
        assert_eq!(unscored.quality_label(), "Pending");
        assert!(!unscored.is_scored());

        let scored = job(2, JobStatus::Completed, 94);
        assert_eq!(scored.quality_label(), "94%");
        assert!(scored.is_scored());
    }

    #[test]
    fn test_bench_flow_transitions() {
        assert!(JobStatus::Scheduled.can_transition_to(JobStatus::InProgress));
        assert!(JobStatus::InProgress.can_transition_to(JobStatus::QualityCheck));
        assert!(JobStatus::QualityCheck.can_transition_to(JobStatus::Completed));

        // Hold and resume
        assert!(JobStatus::InProgress.can_transition_to(JobStatus::OnHold));
        assert!(JobStatus::OnHold.can_transition_to(JobStatus::InProgress));

        // Failed quality check goes back to the bench
        assert!(JobStatus::QualityCheck.can_transition_to(JobStatus::InProgress));
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        assert!(!JobStatus::Scheduled.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::InProgress));
        assert!(!JobStatus::OnHold.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Completed.allowed_transitions().is_empty());
        assert!(JobStatus::Unknown.allowed_transitions().is_empty());
    }

    #[test]
    fn test_condition_styles() {
        assert_eq!(Condition::Excellent.style().tone, Tone::Success);
        assert_eq!(Condition::Fair.style().tone, Tone::Warning);
        assert_eq!(Condition::Poor.style().tone, Tone::Danger);
    }

    #[test]
    fn test_search_by_technician() {
        let jobs = vec![job(1, JobStatus::InProgress, 0)];
        let query = FilterQuery::new().with_term("sarah");
        assert_eq!(query.apply(&jobs).len(), 1);
    }

    #[test]
    fn test_condition_facet() {
        let jobs = vec![job(1, JobStatus::InProgress, 0)];
        let hit = FilterQuery::new().with_facet("condition", "good");
        assert_eq!(hit.apply(&jobs).len(), 1);
        let miss = FilterQuery::new().with_facet("condition", "poor");
        assert!(miss.apply(&jobs).is_empty());
    }

    #[test]
    fn test_unknown_status_never_fails_deserialization() {
        let yaml = r#"
id: RF-2024-009
device: NX-001234
device_name: Gadget
condition: mint
status: exploded
technician: Sam
facility: Bench 9
start_date: 2024-02-01
estimated_completion: 2024-02-03
"#;
        let j: RefurbishmentJob = serde_yml::from_str(yaml).unwrap();
        assert_eq!(j.status, JobStatus::Unknown);
        assert_eq!(j.condition, Condition::Unknown);
    }
}
