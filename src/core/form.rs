//! Form state holder
//!
//! Draft values, validation, and the submission lifecycle for every form in
//! the tool (sign-in, sign-up, device registration, profile edit). State
//! lives in an explicit holder with pure update operations so the whole
//! lifecycle is testable without any interactive frontend.
//!
//! Submission goes through the [`Submitter`] trait: commands inject the
//! simulated gateway (fixed delay, standing in for a network call) and tests
//! inject zero-delay or failing doubles.

use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Field input kinds, used for validation and wizard prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Email,
    Phone,
    Password,
    /// Must match the named password field when both are filled in
    Confirm { of: String },
    /// One of a fixed option list
    Select { options: Vec<String> },
    /// Boolean flag stored as "true"/"false"
    Checkbox,
}

/// One field of a form
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A form definition: named fields plus the route to signal on success
#[derive(Debug, Clone)]
pub struct FormSpec {
    pub name: String,
    pub title: String,
    pub fields: Vec<FieldSpec>,
    /// Navigation route signalled after a successful submit, if any
    pub redirect: Option<String>,
}

impl FormSpec {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            fields: Vec::new(),
            redirect: None,
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_redirect(mut self, route: impl Into<String>) -> Self {
        self.redirect = Some(route.into());
        self
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Submission lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
}

/// Snapshot of form values handed to a [`Submitter`]
#[derive(Debug, Clone)]
pub struct FormPayload {
    /// Name of the form spec this payload came from
    pub form: String,
    pub values: BTreeMap<String, String>,
}

impl FormPayload {
    /// Get a field value, empty string when absent
    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }
}

/// Result of an accepted submission
#[derive(Debug, Clone, Default)]
pub struct Accepted {
    /// Human-readable confirmation, if the gateway has one
    pub message: Option<String>,
    /// Reference produced by the gateway (a record ID, a session token)
    pub reference: Option<String>,
}

/// What the caller gets back from a successful submit
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub accepted: Accepted,
    /// The form's redirect route; issued exactly once, only on success
    pub redirect: Option<String>,
}

/// The injectable submission endpoint
pub trait Submitter {
    fn submit(&self, payload: &FormPayload) -> Result<Accepted, SubmissionError>;
}

/// A failed remote call; the form stays idle and never redirects
#[derive(Debug, Clone, Error)]
#[error("submission failed: {reason}")]
pub struct SubmissionError {
    pub reason: String,
}

impl SubmissionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// One offending field found during validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIssue {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },

    #[error("{field} must be accepted")]
    MustAccept { field: String },

    #[error("{field} must be one of: {}", .options.join(", "))]
    InvalidOption { field: String, options: Vec<String> },
}

impl FieldIssue {
    /// The field the issue is about
    pub fn field(&self) -> &str {
        match self {
            FieldIssue::Required { field }
            | FieldIssue::Mismatch { field, .. }
            | FieldIssue::MustAccept { field }
            | FieldIssue::InvalidOption { field, .. } => field,
        }
    }
}

/// Validation failure carrying every offending field, not just the first
#[derive(Debug, Clone, Error)]
#[error("validation failed: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn summarize(issues: &[FieldIssue]) -> String {
    let parts: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
    parts.join("; ")
}

impl ValidationError {
    /// True if some issue concerns the given field
    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field() == field)
    }
}

/// Errors from form operations
#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("a submission is already in progress")]
    AlreadySubmitting,

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Draft values plus submission phase for one form
#[derive(Debug, Clone)]
pub struct FormState {
    spec: FormSpec,
    values: BTreeMap<String, String>,
    phase: SubmitPhase,
}

impl FormState {
    /// Seed a fresh state from the spec's defaults
    pub fn new(spec: FormSpec) -> Self {
        let mut values = BTreeMap::new();
        for field in &spec.fields {
            let seed = match (&field.default, &field.kind) {
                (Some(value), _) => value.clone(),
                (None, FieldKind::Checkbox) => "false".to_string(),
                (None, _) => String::new(),
            };
            values.insert(field.name.clone(), seed);
        }
        Self {
            spec,
            values,
            phase: SubmitPhase::Idle,
        }
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Replace a single field's value, leaving every other field untouched
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        if !self.values.contains_key(field) {
            return Err(FormError::UnknownField {
                field: field.to_string(),
            });
        }
        self.values.insert(field.to_string(), value.into());
        Ok(())
    }

    /// Run the form's validation, collecting all offending fields
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for field in &self.spec.fields {
            let value = self.value(&field.name).unwrap_or("");

            if field.required && value.trim().is_empty() {
                issues.push(FieldIssue::Required {
                    field: field.name.clone(),
                });
                continue;
            }

            match &field.kind {
                FieldKind::Checkbox if field.required && value != "true" => {
                    issues.push(FieldIssue::MustAccept {
                        field: field.name.clone(),
                    });
                }
                FieldKind::Confirm { of } => {
                    let original = self.value(of).unwrap_or("");
                    // Only a mismatch when both sides are filled in; empties
                    // are covered by the required check
                    if !value.is_empty() && !original.is_empty() && value != original {
                        issues.push(FieldIssue::Mismatch {
                            field: field.name.clone(),
                            other: of.clone(),
                        });
                    }
                }
                FieldKind::Select { options } => {
                    if !value.is_empty() && !options.iter().any(|o| o == value) {
                        issues.push(FieldIssue::InvalidOption {
                            field: field.name.clone(),
                            options: options.clone(),
                        });
                    }
                }
                _ => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Validate and move Idle -> Submitting, yielding the payload to send
    ///
    /// Invalid forms stay Idle and no payload is produced. A begin while one
    /// is already in flight is rejected, so the gateway is never called twice
    /// for one user action.
    pub fn begin_submit(&mut self) -> Result<FormPayload, FormError> {
        if self.phase == SubmitPhase::Submitting {
            return Err(FormError::AlreadySubmitting);
        }
        self.validate()?;
        self.phase = SubmitPhase::Submitting;
        Ok(FormPayload {
            form: self.spec.name.clone(),
            values: self.values.clone(),
        })
    }

    /// Move Submitting -> Idle after the gateway call returns
    pub fn finish_submit(&mut self) {
        self.phase = SubmitPhase::Idle;
    }

    /// The full lifecycle: validate, call the gateway, settle back to Idle
    ///
    /// On success the outcome carries the form's redirect route exactly once.
    /// On gateway failure the form is Idle again, the error is returned, and
    /// no redirect is issued.
    pub fn submit(&mut self, gateway: &dyn Submitter) -> Result<SubmitOutcome, FormError> {
        let payload = self.begin_submit()?;
        let result = gateway.submit(&payload);
        self.finish_submit();

        let accepted = result?;
        Ok(SubmitOutcome {
            accepted,
            redirect: self.spec.redirect.clone(),
        })
    }
}

/// Stand-in for a remote submission endpoint
///
/// Sleeps for a fixed delay to behave like a network round trip, then
/// succeeds (or fails, when built with [`SimulatedGateway::failing`]). Tests
/// use a zero delay.
pub struct SimulatedGateway {
    delay: Duration,
    failure: Option<String>,
}

impl SimulatedGateway {
    /// The delay the real UI simulated for remote calls
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

    pub fn new() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            failure: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// A gateway that always rejects with the given reason
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            failure: Some(reason.into()),
        }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Submitter for SimulatedGateway {
    fn submit(&self, payload: &FormPayload) -> Result<Accepted, SubmissionError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        match &self.failure {
            Some(reason) => Err(SubmissionError::new(reason.clone())),
            None => Ok(Accepted {
                message: Some(format!("{} accepted", payload.form)),
                reference: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Counts calls and returns a canned result
    struct RecordingSubmitter {
        calls: RefCell<usize>,
        fail_with: Option<String>,
    }

    impl RecordingSubmitter {
        fn ok() -> Self {
            Self {
                calls: RefCell::new(0),
                fail_with: None,
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                calls: RefCell::new(0),
                fail_with: Some(reason.to_string()),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.borrow()
        }
    }

    impl Submitter for RecordingSubmitter {
        fn submit(&self, _payload: &FormPayload) -> Result<Accepted, SubmissionError> {
            *self.calls.borrow_mut() += 1;
            match &self.fail_with {
                Some(reason) => Err(SubmissionError::new(reason.clone())),
                None => Ok(Accepted::default()),
            }
        }
    }

    fn signin_spec() -> FormSpec {
        FormSpec::new("sign-in", "Sign In")
            .field(FieldSpec::new("email", "Email", FieldKind::Email).required())
            .field(FieldSpec::new("password", "Password", FieldKind::Password).required())
            .with_redirect("/dashboard")
    }

    fn signup_spec() -> FormSpec {
        FormSpec::new("sign-up", "Create Account")
            .field(FieldSpec::new("first_name", "First name", FieldKind::Text).required())
            .field(FieldSpec::new("last_name", "Last name", FieldKind::Text).required())
            .field(FieldSpec::new("email", "Email", FieldKind::Email).required())
            .field(FieldSpec::new("password", "Password", FieldKind::Password).required())
            .field(
                FieldSpec::new(
                    "confirm_password",
                    "Confirm password",
                    FieldKind::Confirm {
                        of: "password".to_string(),
                    },
                )
                .required(),
            )
            .field(FieldSpec::new("terms", "Accept terms", FieldKind::Checkbox).required())
            .with_redirect("/dashboard")
    }

    #[test]
    fn test_defaults_are_seeded() {
        let spec = FormSpec::new("f", "F")
            .field(FieldSpec::new("city", "City", FieldKind::Text).with_default("San Francisco"))
            .field(FieldSpec::new("notify", "Notify", FieldKind::Checkbox))
            .field(FieldSpec::new("name", "Name", FieldKind::Text));
        let state = FormState::new(spec);

        assert_eq!(state.value("city"), Some("San Francisco"));
        assert_eq!(state.value("notify"), Some("false"));
        assert_eq!(state.value("name"), Some(""));
    }

    #[test]
    fn test_set_replaces_single_field() {
        let mut state = FormState::new(signin_spec());
        state.set("email", "a@b.com").unwrap();
        assert_eq!(state.value("email"), Some("a@b.com"));
        assert_eq!(state.value("password"), Some(""));

        state.set("email", "c@d.com").unwrap();
        assert_eq!(state.value("email"), Some("c@d.com"));
    }

    #[test]
    fn test_set_unknown_field() {
        let mut state = FormState::new(signin_spec());
        let err = state.set("username", "x").unwrap_err();
        assert!(matches!(err, FormError::UnknownField { .. }));
    }

    #[test]
    fn test_validation_collects_every_issue() {
        let state = FormState::new(signup_spec());
        let err = state.validate().unwrap_err();

        // Untouched sign-up: all five text fields missing, terms unaccepted
        assert_eq!(err.issues.len(), 6);
        assert!(err.mentions("first_name"));
        assert!(err.mentions("email"));
        assert!(err.mentions("terms"));
    }

    #[test]
    fn test_password_mismatch_blocks_submit() {
        let mut state = FormState::new(signup_spec());
        state.set("first_name", "Ada").unwrap();
        state.set("last_name", "Lovelace").unwrap();
        state.set("email", "ada@example.com").unwrap();
        state.set("password", "secret-1").unwrap();
        state.set("confirm_password", "secret-2").unwrap();
        state.set("terms", "true").unwrap();

        let gateway = RecordingSubmitter::ok();
        let err = state.submit(&gateway).unwrap_err();

        match err {
            FormError::Invalid(v) => {
                assert_eq!(
                    v.issues,
                    vec![FieldIssue::Mismatch {
                        field: "confirm_password".to_string(),
                        other: "password".to_string(),
                    }]
                );
            }
            other => panic!("expected Invalid, got {:?}", other),
        }

        // No remote call, no phase change
        assert_eq!(gateway.calls(), 0);
        assert_eq!(state.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let mut state = FormState::new(signup_spec());
        state.set("first_name", "Ada").unwrap();
        state.set("last_name", "Lovelace").unwrap();
        state.set("email", "ada@example.com").unwrap();
        state.set("password", "secret").unwrap();
        state.set("confirm_password", "secret").unwrap();

        let err = state.validate().unwrap_err();
        assert_eq!(
            err.issues,
            vec![FieldIssue::MustAccept {
                field: "terms".to_string()
            }]
        );
    }

    #[test]
    fn test_select_rejects_unknown_option() {
        let spec = FormSpec::new("f", "F").field(FieldSpec::new(
            "category",
            "Category",
            FieldKind::Select {
                options: vec!["Smartphone".to_string(), "Laptop".to_string()],
            },
        ));
        let mut state = FormState::new(spec);
        state.set("category", "Toaster").unwrap();

        let err = state.validate().unwrap_err();
        assert!(matches!(
            err.issues[0],
            FieldIssue::InvalidOption { .. }
        ));
    }

    #[test]
    fn test_successful_submit_lifecycle() {
        let mut state = FormState::new(signin_spec());
        state.set("email", "jane@example.com").unwrap();
        state.set("password", "hunter2").unwrap();

        assert_eq!(state.phase(), SubmitPhase::Idle);

        // The split API exposes the Submitting phase
        let payload = state.begin_submit().unwrap();
        assert_eq!(state.phase(), SubmitPhase::Submitting);
        assert_eq!(payload.value("email"), "jane@example.com");

        state.finish_submit();
        assert_eq!(state.phase(), SubmitPhase::Idle);

        // The composed API redirects exactly once
        let gateway = RecordingSubmitter::ok();
        let outcome = state.submit(&gateway).unwrap();
        assert_eq!(outcome.redirect.as_deref(), Some("/dashboard"));
        assert_eq!(gateway.calls(), 1);
        assert_eq!(state.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let mut state = FormState::new(signin_spec());
        state.set("email", "jane@example.com").unwrap();
        state.set("password", "hunter2").unwrap();

        let _payload = state.begin_submit().unwrap();
        let err = state.begin_submit().unwrap_err();
        assert!(matches!(err, FormError::AlreadySubmitting));

        // Settling the first attempt unblocks the form
        state.finish_submit();
        assert!(state.begin_submit().is_ok());
    }

    #[test]
    fn test_gateway_failure_leaves_form_idle() {
        let mut state = FormState::new(signin_spec());
        state.set("email", "jane@example.com").unwrap();
        state.set("password", "hunter2").unwrap();

        let gateway = RecordingSubmitter::failing("service unavailable");
        let err = state.submit(&gateway).unwrap_err();

        match err {
            FormError::Submission(e) => assert_eq!(e.reason, "service unavailable"),
            other => panic!("expected Submission, got {:?}", other),
        }
        assert_eq!(state.phase(), SubmitPhase::Idle);
        assert_eq!(gateway.calls(), 1);
    }

    #[test]
    fn test_simulated_gateway_zero_delay() {
        let mut state = FormState::new(signin_spec());
        state.set("email", "jane@example.com").unwrap();
        state.set("password", "hunter2").unwrap();

        let gateway = SimulatedGateway::new().with_delay(Duration::ZERO);
        let outcome = state.submit(&gateway).unwrap();
        assert_eq!(outcome.redirect.as_deref(), Some("/dashboard"));
        assert!(outcome.accepted.message.unwrap().contains("sign-in"));
    }

    #[test]
    fn test_simulated_gateway_failure_path() {
        let mut state = FormState::new(signin_spec());
        state.set("email", "jane@example.com").unwrap();
        state.set("password", "hunter2").unwrap();

        let gateway = SimulatedGateway::failing("backend offline");
        let err = state.submit(&gateway).unwrap_err();
        assert!(matches!(err, FormError::Submission(_)));
        assert_eq!(state.phase(), SubmitPhase::Idle);
    }
}
