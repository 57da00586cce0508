//! Entity type definitions
//!
//! DLT tracks the following entity types:
//!
//! **Fleet:**
//! - [`Device`] - Registered electronics with category and lifecycle status
//! - [`Shipment`] - A device in transit, with carrier stages and progress
//!
//! **End of life:**
//! - [`RecyclingBatch`] - Devices grouped for material recovery
//! - [`RefurbishmentJob`] - A device on the bench being restored for reuse
//!
//! **Account:**
//! - [`UserProfile`] - The account holder's details and preferences

pub mod device;
pub mod profile;
pub mod recycling;
pub mod refurbishment;
pub mod shipment;

pub use device::{Category, Device, DeviceStatus};
pub use profile::{NotificationPrefs, PrivacyPrefs, UserProfile};
pub use recycling::{BatchStatus, MaterialRecovery, RecyclingBatch};
pub use refurbishment::{Condition, JobStatus, RefurbishmentJob};
pub use shipment::{Shipment, ShipmentStage, ShipmentStatus};
