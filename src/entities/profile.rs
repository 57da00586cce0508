//! User profile entity - account details and preferences

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::record::{Record, StatusStyle, Tone};

/// Which events reach the user, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
    pub marketing: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            sms: false,
            marketing: true,
        }
    }
}

/// What other account holders can see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyPrefs {
    pub profile_visible: bool,
    pub activity_visible: bool,
    pub contact_visible: bool,
}

impl Default for PrivacyPrefs {
    fn default() -> Self {
        Self {
            profile_visible: true,
            activity_visible: false,
            contact_visible: true,
        }
    }
}

/// The account holder's profile
///
/// One profile per workspace, stored at `profile/profile.dlt.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier (USR- prefix)
    pub id: RecordId,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bio: String,

    pub joined: NaiveDate,

    #[serde(default)]
    pub timezone: String,

    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub notifications: NotificationPrefs,

    #[serde(default)]
    pub privacy: PrivacyPrefs,
}

impl UserProfile {
    /// Full name for headings
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Member-since line, month and year only
    pub fn joined_label(&self) -> String {
        self.joined.format("%B %Y").to_string()
    }
}

impl Record for UserProfile {
    const PREFIX: RecordPrefix = RecordPrefix::User;
    const DIR: &'static str = "profile";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.email
    }

    fn status_style(&self) -> StatusStyle {
        StatusStyle::new("Active", Tone::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: RecordId::user(1),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            company: "Acme Corporation".to_string(),
            role: "Product Manager".to_string(),
            location: "San Francisco, CA".to_string(),
            bio: "Passionate about technology.".to_string(),
            joined: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            timezone: "America/Los_Angeles".to_string(),
            language: "en".to_string(),
            notifications: NotificationPrefs::default(),
            privacy: PrivacyPrefs::default(),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(profile().display_name(), "John Doe");
    }

    #[test]
    fn test_joined_label() {
        assert_eq!(profile().joined_label(), "January 2023");
    }

    #[test]
    fn test_preference_defaults() {
        let n = NotificationPrefs::default();
        assert!(n.email && n.push && n.marketing);
        assert!(!n.sms);

        let p = PrivacyPrefs::default();
        assert!(p.profile_visible && p.contact_visible);
        assert!(!p.activity_visible);
    }

    #[test]
    fn test_sparse_yaml_fills_defaults() {
        let yaml = r#"
id: USR-001
first_name: Jane
last_name: Smith
email: jane@example.com
joined: 2024-03-01
"#;
        let p: UserProfile = serde_yml::from_str(yaml).unwrap();
        assert_eq!(p.display_name(), "Jane Smith");
        assert!(p.phone.is_empty());
        assert!(p.notifications.email);
        assert!(!p.privacy.activity_visible);
    }
}
