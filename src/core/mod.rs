//! Core module - fundamental types and utilities

pub mod config;
pub mod filter;
pub mod form;
pub mod identity;
pub mod loader;
pub mod metrics;
pub mod record;
pub mod session;
pub mod store;
pub mod workspace;

pub use config::Config;
pub use filter::{Filterable, FilterQuery};
pub use form::{
    Accepted, FieldIssue, FieldKind, FieldSpec, FormError, FormPayload, FormSpec, FormState,
    SimulatedGateway, SubmissionError, SubmitOutcome, SubmitPhase, Submitter, ValidationError,
};
pub use identity::{IdParseError, RecordId, RecordPrefix};
pub use metrics::{Percent, SeriesPoint};
pub use record::{Record, StatusStyle, Tone};
pub use session::{Session, SessionError};
pub use store::{RecordStore, StoreError};
pub use workspace::{Workspace, WorkspaceError};
