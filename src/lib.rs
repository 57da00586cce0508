//! DLT: Device Lifecycle Tracker
//!
//! A local-first tracker for electronics fleets, keeping registered devices,
//! shipments, recycling batches, and refurbishment jobs as plain text files.

pub mod cli;
pub mod core;
pub mod entities;
pub mod forms;
pub mod schema;
pub mod seed;
