//! Embedded demo fleet
//!
//! `dlt init --demo` seeds a fresh workspace with this dataset so every
//! command has records to show before the user registers anything real.

use chrono::NaiveDate;
use miette::Result;

use crate::core::identity::RecordId;
use crate::core::loader::save_record;
use crate::core::metrics::Percent;
use crate::core::workspace::Workspace;
use crate::entities::device::{Category, Device, DeviceStatus};
use crate::entities::profile::{NotificationPrefs, PrivacyPrefs, UserProfile};
use crate::entities::recycling::{BatchStatus, MaterialRecovery, RecyclingBatch};
use crate::entities::refurbishment::{Condition, JobStatus, RefurbishmentJob};
use crate::entities::shipment::{Shipment, ShipmentStage, ShipmentStatus};

// Seed dates are compile-time literals, so the fallback never fires.
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn stage(name: &str, completed: bool, timestamp: Option<&str>) -> ShipmentStage {
    ShipmentStage {
        name: name.to_string(),
        completed,
        timestamp: timestamp.map(|t| t.to_string()),
    }
}

pub fn demo_devices() -> Vec<Device> {
    vec![
        Device {
            id: RecordId::device(1234),
            name: "iPhone 14 Pro".to_string(),
            manufacturer: "Apple Inc.".to_string(),
            model: "A2894".to_string(),
            serial_number: "F2LLD3K8P0H1".to_string(),
            category: Category::Smartphone,
            status: DeviceStatus::Active,
            registered: date(2024, 1, 15),
            last_update: date(2024, 1, 20),
            owner: "TechCorp Ltd".to_string(),
            location: "San Francisco, CA".to_string(),
        },
        Device {
            id: RecordId::device(1235),
            name: "MacBook Pro 16\"".to_string(),
            manufacturer: "Apple Inc.".to_string(),
            model: "A2485".to_string(),
            serial_number: "C02ZK0ABMD6T".to_string(),
            category: Category::Laptop,
            status: DeviceStatus::InTransit,
            registered: date(2024, 1, 14),
            last_update: date(2024, 1, 19),
            owner: "Global Electronics".to_string(),
            location: "New York, NY".to_string(),
        },
        Device {
            id: RecordId::device(1236),
            name: "Samsung Galaxy S23".to_string(),
            manufacturer: "Samsung".to_string(),
            model: "SM-S911U".to_string(),
            serial_number: "R58RB0ABCDE".to_string(),
            category: Category::Smartphone,
            status: DeviceStatus::EndOfLife,
            registered: date(2024, 1, 13),
            last_update: date(2024, 1, 18),
            owner: "RecycleTech Inc".to_string(),
            location: "Austin, TX".to_string(),
        },
        Device {
            id: RecordId::device(1237),
            name: "Dell XPS 13".to_string(),
            manufacturer: "Dell Technologies".to_string(),
            model: "9320".to_string(),
            serial_number: "ABCD123456".to_string(),
            category: Category::Laptop,
            status: DeviceStatus::Refurbishment,
            registered: date(2024, 1, 12),
            last_update: date(2024, 1, 17),
            owner: "RefurbCorp".to_string(),
            location: "Seattle, WA".to_string(),
        },
        Device {
            id: RecordId::device(1238),
            name: "iPad Pro 12.9\"".to_string(),
            manufacturer: "Apple Inc.".to_string(),
            model: "A2436".to_string(),
            serial_number: "DMQLD3K8P0H1".to_string(),
            category: Category::Tablet,
            status: DeviceStatus::Active,
            registered: date(2024, 1, 11),
            last_update: date(2024, 1, 16),
            owner: "EduTech Solutions".to_string(),
            location: "Boston, MA".to_string(),
        },
    ]
}

pub fn demo_shipments() -> Vec<Shipment> {
    vec![
        Shipment {
            id: RecordId::shipment(2024, 1),
            device: RecordId::device(1234),
            device_name: "iPhone 14 Pro".to_string(),
            origin: "Cupertino, CA".to_string(),
            destination: "New York, NY".to_string(),
            status: ShipmentStatus::InTransit,
            progress: Percent::new(65),
            eta: date(2024, 1, 25),
            carrier: "FedEx".to_string(),
            tracking_number: "1234567890".to_string(),
            stages: vec![
                stage("Pickup", true, Some("2024-01-20 09:00")),
                stage("Processing", true, Some("2024-01-20 14:30")),
                stage("In Transit", false, None),
                stage("Delivery", false, None),
            ],
        },
        Shipment {
            id: RecordId::shipment(2024, 2),
            device: RecordId::device(1235),
            device_name: "MacBook Pro 16\"".to_string(),
            origin: "Austin, TX".to_string(),
            destination: "Seattle, WA".to_string(),
            status: ShipmentStatus::Delivered,
            progress: Percent::new(100),
            eta: date(2024, 1, 22),
            carrier: "UPS".to_string(),
            tracking_number: "0987654321".to_string(),
            stages: vec![
                stage("Pickup", true, Some("2024-01-19 10:15")),
                stage("Processing", true, Some("2024-01-19 16:45")),
                stage("In Transit", true, Some("2024-01-20 08:30")),
                stage("Delivery", true, Some("2024-01-22 11:20")),
            ],
        },
        Shipment {
            id: RecordId::shipment(2024, 3),
            device: RecordId::device(1236),
            device_name: "Samsung Galaxy S23".to_string(),
            origin: "San Francisco, CA".to_string(),
            destination: "Chicago, IL".to_string(),
            status: ShipmentStatus::Processing,
            progress: Percent::new(25),
            eta: date(2024, 1, 28),
            carrier: "DHL".to_string(),
            tracking_number: "5678901234".to_string(),
            stages: vec![
                stage("Pickup", true, Some("2024-01-21 08:00")),
                stage("Processing", false, None),
                stage("In Transit", false, None),
                stage("Delivery", false, None),
            ],
        },
    ]
}

pub fn demo_batches() -> Vec<RecyclingBatch> {
    let materials = |rows: &[(&str, f64, f64)]| -> Vec<MaterialRecovery> {
        rows.iter()
            .map(|(material, recovered_kg, total_kg)| MaterialRecovery {
                material: material.to_string(),
                recovered_kg: *recovered_kg,
                total_kg: *total_kg,
            })
            .collect()
    };

    vec![
        RecyclingBatch {
            id: RecordId::batch(2024, 1),
            device_count: 150,
            device_types: vec!["Smartphones".to_string(), "Tablets".to_string()],
            facility: "EcoRecycle SF".to_string(),
            status: BatchStatus::Processing,
            start_date: date(2024, 1, 20),
            estimated_completion: date(2024, 1, 25),
            material_recovery: Percent::new(85),
            carbon_saved: "2.4 tons".to_string(),
            materials: vec![],
        },
        RecyclingBatch {
            id: RecordId::batch(2024, 2),
            device_count: 89,
            device_types: vec!["Laptops".to_string(), "Desktops".to_string()],
            facility: "GreenTech Austin".to_string(),
            status: BatchStatus::Completed,
            start_date: date(2024, 1, 15),
            estimated_completion: date(2024, 1, 20),
            material_recovery: Percent::new(92),
            carbon_saved: "3.1 tons".to_string(),
            materials: materials(&[
                ("Aluminum", 450.0, 500.0),
                ("Copper", 280.0, 300.0),
                ("Gold", 12.0, 15.0),
                ("Silver", 35.0, 40.0),
                ("Lithium", 180.0, 200.0),
                ("Rare Earth", 25.0, 30.0),
            ]),
        },
        RecyclingBatch {
            id: RecordId::batch(2024, 3),
            device_count: 203,
            device_types: vec![
                "Smartphones".to_string(),
                "Laptops".to_string(),
                "Tablets".to_string(),
            ],
            facility: "RecycleCorp NY".to_string(),
            status: BatchStatus::Scheduled,
            start_date: date(2024, 1, 25),
            estimated_completion: date(2024, 1, 30),
            material_recovery: Percent::new(0),
            carbon_saved: "Est. 4.2 tons".to_string(),
            materials: vec![],
        },
    ]
}

pub fn demo_jobs() -> Vec<RefurbishmentJob> {
    vec![
        RefurbishmentJob {
            id: RecordId::job(2024, 1),
            device: RecordId::device(1237),
            device_name: "Dell XPS 13".to_string(),
            condition: Condition::Good,
            status: JobStatus::InProgress,
            technician: "Sarah Johnson".to_string(),
            facility: "RefurbTech SF".to_string(),
            start_date: date(2024, 1, 20),
            estimated_completion: date(2024, 1, 25),
            progress: Percent::new(65),
            quality_score: Percent::new(0),
            issues: vec![
                "Battery replacement needed".to_string(),
                "Screen calibration".to_string(),
            ],
        },
        RefurbishmentJob {
            id: RecordId::job(2024, 2),
            device: RecordId::device(1238),
            device_name: "iPad Pro 12.9\"".to_string(),
            condition: Condition::Fair,
            status: JobStatus::Completed,
            technician: "Mike Chen".to_string(),
            facility: "TechRestore Austin".to_string(),
            start_date: date(2024, 1, 15),
            estimated_completion: date(2024, 1, 20),
            progress: Percent::new(100),
            quality_score: Percent::new(94),
            issues: vec![],
        },
        RefurbishmentJob {
            id: RecordId::job(2024, 3),
            device: RecordId::device(1239),
            device_name: "MacBook Air M2".to_string(),
            condition: Condition::Poor,
            status: JobStatus::QualityCheck,
            technician: "Alex Rodriguez".to_string(),
            facility: "RefurbTech SF".to_string(),
            start_date: date(2024, 1, 18),
            estimated_completion: date(2024, 1, 28),
            progress: Percent::new(85),
            quality_score: Percent::new(0),
            issues: vec![
                "Keyboard replacement".to_string(),
                "Logic board repair".to_string(),
            ],
        },
        RefurbishmentJob {
            id: RecordId::job(2024, 4),
            device: RecordId::device(1240),
            device_name: "iPhone 13 Pro".to_string(),
            condition: Condition::Excellent,
            status: JobStatus::Scheduled,
            technician: "Emma Wilson".to_string(),
            facility: "MobileRefurb NY".to_string(),
            start_date: date(2024, 1, 25),
            estimated_completion: date(2024, 1, 27),
            progress: Percent::new(0),
            quality_score: Percent::new(0),
            issues: vec![],
        },
    ]
}

pub fn demo_profile() -> UserProfile {
    UserProfile {
        id: RecordId::user(1),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john@company.com".to_string(),
        phone: "+1 (555) 123-4567".to_string(),
        company: "EcoTech Solutions".to_string(),
        role: "Administrator".to_string(),
        location: "San Francisco, CA".to_string(),
        bio: "Sustainability advocate and blockchain enthusiast working to \
              revolutionize electronics recycling through transparent \
              lifecycle tracking."
            .to_string(),
        joined: date(2024, 1, 1),
        timezone: "America/Los_Angeles".to_string(),
        language: "English".to_string(),
        notifications: NotificationPrefs::default(),
        privacy: PrivacyPrefs::default(),
    }
}

/// Write the full demo fleet into a workspace
pub fn write_demo(workspace: &Workspace) -> Result<usize> {
    let mut written = 0;

    for device in demo_devices() {
        save_record(&workspace.record_path(&device.id), &device)?;
        written += 1;
    }
    for shipment in demo_shipments() {
        save_record(&workspace.record_path(&shipment.id), &shipment)?;
        written += 1;
    }
    for batch in demo_batches() {
        save_record(&workspace.record_path(&batch.id), &batch)?;
        written += 1;
    }
    for job in demo_jobs() {
        save_record(&workspace.record_path(&job.id), &job)?;
        written += 1;
    }

    save_record(&workspace.profile_path(), &demo_profile())?;
    written += 1;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterQuery;
    use crate::core::loader::load_store;
    use tempfile::tempdir;

    #[test]
    fn test_demo_counts() {
        assert_eq!(demo_devices().len(), 5);
        assert_eq!(demo_shipments().len(), 3);
        assert_eq!(demo_batches().len(), 3);
        assert_eq!(demo_jobs().len(), 4);
    }

    #[test]
    fn test_demo_ids_are_canonical() {
        let devices = demo_devices();
        assert_eq!(devices[0].id.to_string(), "NX-001234");
        assert_eq!(devices[4].id.to_string(), "NX-001238");
        assert_eq!(demo_shipments()[0].id.to_string(), "SC-2024-001");
        assert_eq!(demo_batches()[2].id.to_string(), "RC-2024-003");
        assert_eq!(demo_jobs()[3].id.to_string(), "RF-2024-004");
    }

    #[test]
    fn test_search_mac_matches_macbook() {
        let devices = demo_devices();
        let query = FilterQuery::new().with_term("mac");
        let hits = query.apply(&devices);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.to_string(), "NX-001235");
    }

    #[test]
    fn test_write_demo_round_trips() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::init(dir.path()).unwrap();

        let written = write_demo(&workspace).unwrap();
        assert_eq!(written, 16);

        let devices = load_store::<Device>(&dir.path().join("devices")).unwrap();
        assert_eq!(devices.len(), 5);
        let found = devices.find("NX-001236").unwrap();
        assert_eq!(found.name, "Samsung Galaxy S23");

        let shipments = load_store::<Shipment>(&dir.path().join("shipments")).unwrap();
        assert_eq!(shipments.len(), 3);
        assert_eq!(shipments.records()[1].completed_stages(), 4);
    }

    #[test]
    fn test_completed_batch_carries_material_rows() {
        let batches = demo_batches();
        let completed = &batches[1];
        assert_eq!(completed.materials.len(), 6);
        assert_eq!(completed.materials[0].rate().value(), 90);
        assert!(batches[0].materials.is_empty());
    }
}
