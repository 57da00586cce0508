//! Record identity system using type-prefixed business keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Record type prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordPrefix {
    /// Registered device
    #[serde(rename = "NX")]
    Device,
    /// Supply chain shipment
    #[serde(rename = "SC")]
    Shipment,
    /// Recycling batch
    #[serde(rename = "RC")]
    Batch,
    /// Refurbishment job
    #[serde(rename = "RF")]
    Job,
    /// User profile
    #[serde(rename = "USR")]
    User,
}

impl RecordPrefix {
    /// Get the string representation of the prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordPrefix::Device => "NX",
            RecordPrefix::Shipment => "SC",
            RecordPrefix::Batch => "RC",
            RecordPrefix::Job => "RF",
            RecordPrefix::User => "USR",
        }
    }

    /// Get all valid prefixes
    pub fn all() -> &'static [RecordPrefix] {
        &[
            RecordPrefix::Device,
            RecordPrefix::Shipment,
            RecordPrefix::Batch,
            RecordPrefix::Job,
            RecordPrefix::User,
        ]
    }

    /// Try to determine the record prefix from a filename
    /// Looks for patterns like "NX-001234.yaml" or "device.schema.json"
    pub fn from_filename(filename: &str) -> Option<Self> {
        let upper = filename.to_uppercase();
        for prefix in Self::all() {
            if upper.starts_with(&format!("{}-", prefix.as_str())) {
                return Some(*prefix);
            }
        }
        match upper.split('.').next() {
            Some("DEVICE") => Some(RecordPrefix::Device),
            Some("SHIPMENT") => Some(RecordPrefix::Shipment),
            Some("BATCH") => Some(RecordPrefix::Batch),
            Some("JOB") => Some(RecordPrefix::Job),
            Some("PROFILE") => Some(RecordPrefix::User),
            _ => None,
        }
    }

    /// Try to determine the record prefix from a file path by examining parent directories
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        if let Some(filename) = path.file_name() {
            if let Some(prefix) = Self::from_filename(&filename.to_string_lossy()) {
                return Some(prefix);
            }
        }

        for component in path.components() {
            if let std::path::Component::Normal(os_str) = component {
                let dir_name = os_str.to_string_lossy().to_lowercase();
                match dir_name.as_str() {
                    "devices" => return Some(RecordPrefix::Device),
                    "shipments" => return Some(RecordPrefix::Shipment),
                    "recycling" => return Some(RecordPrefix::Batch),
                    "refurbishment" => return Some(RecordPrefix::Job),
                    "profile" => return Some(RecordPrefix::User),
                    _ => {}
                }
            }
        }
        None
    }
}

impl fmt::Display for RecordPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NX" => Ok(RecordPrefix::Device),
            "SC" => Ok(RecordPrefix::Shipment),
            "RC" => Ok(RecordPrefix::Batch),
            "RF" => Ok(RecordPrefix::Job),
            "USR" => Ok(RecordPrefix::User),
            _ => Err(IdParseError::InvalidPrefix(s.to_string())),
        }
    }
}

/// A unique record identifier combining a type prefix and a serial
///
/// Serials are business keys carried over from upstream systems, so they are
/// kept verbatim rather than re-minted: `NX-001234`, `SC-2024-001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    prefix: RecordPrefix,
    serial: String,
}

impl RecordId {
    /// Create a RecordId from a prefix and serial, validating the serial
    pub fn new(prefix: RecordPrefix, serial: impl Into<String>) -> Result<Self, IdParseError> {
        let serial = serial.into();
        validate_serial(&serial)?;
        Ok(Self { prefix, serial })
    }

    /// Create a device ID with a zero-padded six digit serial (NX-001234)
    pub fn device(n: u32) -> Self {
        Self {
            prefix: RecordPrefix::Device,
            serial: format!("{:06}", n),
        }
    }

    /// Create a shipment ID in year-sequence form (SC-2024-001)
    pub fn shipment(year: i32, seq: u32) -> Self {
        Self {
            prefix: RecordPrefix::Shipment,
            serial: format!("{}-{:03}", year, seq),
        }
    }

    /// Create a recycling batch ID in year-sequence form (RC-2024-001)
    pub fn batch(year: i32, seq: u32) -> Self {
        Self {
            prefix: RecordPrefix::Batch,
            serial: format!("{}-{:03}", year, seq),
        }
    }

    /// Create a refurbishment job ID in year-sequence form (RF-2024-001)
    pub fn job(year: i32, seq: u32) -> Self {
        Self {
            prefix: RecordPrefix::Job,
            serial: format!("{}-{:03}", year, seq),
        }
    }

    /// Create a user ID with a zero-padded six digit serial (USR-000001)
    pub fn user(n: u32) -> Self {
        Self {
            prefix: RecordPrefix::User,
            serial: format!("{:06}", n),
        }
    }

    /// Get the record prefix
    pub fn prefix(&self) -> RecordPrefix {
        self.prefix
    }

    /// Get the serial component
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Parse a RecordId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.serial)
    }
}

impl FromStr for RecordId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix_str, serial_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        let prefix = prefix_str.parse()?;
        validate_serial(serial_str)?;

        Ok(Self {
            prefix,
            serial: serial_str.to_string(),
        })
    }
}

fn validate_serial(serial: &str) -> Result<(), IdParseError> {
    if serial.is_empty() {
        return Err(IdParseError::EmptySerial);
    }
    if let Some(c) = serial
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
    {
        return Err(IdParseError::InvalidSerial(serial.to_string(), c));
    }
    Ok(())
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing record IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid record prefix: '{0}' (valid: NX, SC, RC, RF, USR)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in record ID: '{0}'")]
    MissingDelimiter(String),

    #[error("empty serial in record ID")]
    EmptySerial,

    #[error("invalid serial '{0}': character '{1}' is not allowed")]
    InvalidSerial(String, char),
}
