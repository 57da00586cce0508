//! CLI command implementations

pub mod account;
pub mod batch;
pub mod completions;
pub mod device;
pub mod init;
pub mod job;
pub mod profile;
pub mod search;
pub mod shipment;
pub mod stats;
pub mod validate;
