//! Form definitions shipped with the binary
//!
//! Each builder returns a [`FormSpec`] ready to drive through
//! [`FormState`](crate::core::form::FormState), either interactively
//! (dialoguer wizard) or from command-line flags.

use crate::core::form::{FieldKind, FieldSpec, FormSpec};
use crate::entities::device::Category;
use crate::entities::profile::UserProfile;

/// Sign-in form: email and password, both required
pub fn sign_in() -> FormSpec {
    FormSpec::new("sign-in", "Sign In")
        .field(FieldSpec::new("email", "Email", FieldKind::Email).required())
        .field(FieldSpec::new("password", "Password", FieldKind::Password).required())
        .field(FieldSpec::new("remember", "Remember me", FieldKind::Checkbox))
        .with_redirect("/dashboard")
}

/// Account creation form with password confirmation and terms acceptance
pub fn sign_up() -> FormSpec {
    FormSpec::new("sign-up", "Create Account")
        .field(FieldSpec::new("first_name", "First Name", FieldKind::Text).required())
        .field(FieldSpec::new("last_name", "Last Name", FieldKind::Text).required())
        .field(FieldSpec::new("email", "Email", FieldKind::Email).required())
        .field(FieldSpec::new(
            "company",
            "Company/Organization",
            FieldKind::Text,
        ))
        .field(FieldSpec::new("password", "Password", FieldKind::Password).required())
        .field(
            FieldSpec::new(
                "confirm_password",
                "Confirm Password",
                FieldKind::Confirm {
                    of: "password".to_string(),
                },
            )
            .required(),
        )
        .field(
            FieldSpec::new(
                "terms",
                "I agree to the Terms of Service and Privacy Policy",
                FieldKind::Checkbox,
            )
            .required(),
        )
        .field(FieldSpec::new(
            "updates",
            "Send me updates about sustainability initiatives",
            FieldKind::Checkbox,
        ))
        .with_redirect("/dashboard")
}

/// Device registration form for the registry
pub fn device_registration() -> FormSpec {
    let categories = Category::all()
        .iter()
        .map(|c| c.key().to_string())
        .collect();

    FormSpec::new("device-registration", "Register New Device")
        .field(FieldSpec::new("name", "Device Name", FieldKind::Text).required())
        .field(FieldSpec::new("manufacturer", "Manufacturer", FieldKind::Text).required())
        .field(FieldSpec::new("model", "Model", FieldKind::Text).required())
        .field(FieldSpec::new("serial_number", "Serial Number", FieldKind::Text).required())
        .field(
            FieldSpec::new(
                "category",
                "Category",
                FieldKind::Select {
                    options: categories,
                },
            )
            .required(),
        )
        .field(FieldSpec::new("owner", "Owner", FieldKind::Text).required())
        .field(FieldSpec::new("location", "Location", FieldKind::Text).required())
        .with_redirect("/dashboard/nexus")
}

/// Profile editing form, seeded with the current profile values
pub fn profile_edit(profile: &UserProfile) -> FormSpec {
    FormSpec::new("profile-edit", "Profile Settings")
        .field(
            FieldSpec::new("first_name", "First Name", FieldKind::Text)
                .required()
                .with_default(&profile.first_name),
        )
        .field(
            FieldSpec::new("last_name", "Last Name", FieldKind::Text)
                .required()
                .with_default(&profile.last_name),
        )
        .field(
            FieldSpec::new("email", "Email Address", FieldKind::Email)
                .required()
                .with_default(&profile.email),
        )
        .field(
            FieldSpec::new("phone", "Phone Number", FieldKind::Phone).with_default(&profile.phone),
        )
        .field(
            FieldSpec::new("company", "Company", FieldKind::Text).with_default(&profile.company),
        )
        .field(FieldSpec::new("role", "Role", FieldKind::Text).with_default(&profile.role))
        .field(
            FieldSpec::new("location", "Location", FieldKind::Text)
                .with_default(&profile.location),
        )
        .field(FieldSpec::new("bio", "Bio", FieldKind::Multiline).with_default(&profile.bio))
        .with_redirect("/dashboard/profile")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::form::FormState;
    use crate::seed::demo_profile;

    #[test]
    fn test_sign_in_requires_email_and_password() {
        let state = FormState::new(sign_in());
        let err = state.validate().unwrap_err();
        assert!(err.mentions("email"));
        assert!(err.mentions("password"));
        assert!(!err.mentions("remember"));
    }

    #[test]
    fn test_sign_up_passes_when_filled() {
        let mut state = FormState::new(sign_up());
        state.set("first_name", "John").unwrap();
        state.set("last_name", "Doe").unwrap();
        state.set("email", "john@company.com").unwrap();
        state.set("password", "hunter22").unwrap();
        state.set("confirm_password", "hunter22").unwrap();
        state.set("terms", "true").unwrap();
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_sign_up_company_is_optional() {
        let mut state = FormState::new(sign_up());
        state.set("first_name", "John").unwrap();
        state.set("last_name", "Doe").unwrap();
        state.set("email", "john@company.com").unwrap();
        state.set("password", "hunter22").unwrap();
        state.set("confirm_password", "hunter22").unwrap();
        state.set("terms", "true").unwrap();
        let result = state.validate();
        assert!(result.is_ok());
    }

    #[test]
    fn test_registration_category_options_track_enum() {
        let spec = device_registration();
        let field = spec.field_spec("category").unwrap();
        match &field.kind {
            FieldKind::Select { options } => {
                assert_eq!(options.len(), Category::all().len());
                assert!(options.contains(&"smartphone".to_string()));
            }
            other => panic!("expected select, got {:?}", other),
        }
    }

    #[test]
    fn test_profile_edit_seeds_current_values() {
        let profile = demo_profile();
        let state = FormState::new(profile_edit(&profile));
        assert_eq!(state.value("first_name"), Some("John"));
        assert_eq!(state.value("company"), Some("EcoTech Solutions"));
        assert!(state.validate().is_ok());
    }
}
