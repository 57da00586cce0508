//! Record trait - common interface for all record types

use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};

/// Common trait for all DLT records
pub trait Record: Serialize + DeserializeOwned {
    /// The record type prefix (e.g., NX, SC)
    const PREFIX: RecordPrefix;

    /// The workspace directory this record type lives in
    const DIR: &'static str;

    /// Get the record's unique ID
    fn id(&self) -> &RecordId;

    /// Get the record's display label
    fn label(&self) -> &str;

    /// Get display metadata for the record's current status
    fn status_style(&self) -> StatusStyle;
}

/// Display tone for a status badge
///
/// The rendering layer decides what each tone looks like; records only say
/// which tone applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Healthy / complete (Active, Delivered, Completed)
    Success,
    /// In motion (In Transit, In Progress)
    Info,
    /// Needs attention (Refurbishment, Quality Check)
    Warning,
    /// Problem state (End of Life, Delayed, On Hold)
    Danger,
    /// Neutral / unknown
    Muted,
}

/// Display metadata for a status value, defined once per status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    /// Human-readable label ("In Transit", not "in_transit")
    pub label: &'static str,
    pub tone: Tone,
}

impl StatusStyle {
    pub const fn new(label: &'static str, tone: Tone) -> Self {
        Self { label, tone }
    }
}
