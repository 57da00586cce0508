//! `dlt profile` command - account holder profile and preferences

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_workspace, print_field, print_separator};
use crate::cli::wizard;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::form::FormState;
use crate::core::identity::RecordId;
use crate::core::loader;
use crate::core::workspace::Workspace;
use crate::entities::profile::UserProfile;
use crate::forms;

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the profile
    Show,

    /// Edit profile fields (flags or interactive)
    Edit(EditArgs),

    /// Switch a notification channel on or off
    Notify(NotifyArgs),

    /// Switch a privacy setting on or off
    Privacy(PrivacyArgs),
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct NotifyArgs {
    /// Notification channel
    #[arg(value_enum)]
    pub channel: NotifyChannel,

    /// New state
    #[arg(value_enum)]
    pub state: ToggleState,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum NotifyChannel {
    Email,
    Push,
    Sms,
    Marketing,
}

#[derive(clap::Args, Debug)]
pub struct PrivacyArgs {
    /// Privacy setting
    #[arg(value_enum)]
    pub setting: PrivacySetting,

    /// New state
    #[arg(value_enum)]
    pub state: ToggleState,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PrivacySetting {
    /// Profile visible to other account holders
    Profile,
    /// Activity feed visible
    Activity,
    /// Contact details visible
    Contact,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleState {
    On,
    Off,
}

impl ToggleState {
    fn as_bool(&self) -> bool {
        matches!(self, ToggleState::On)
    }
}

pub fn run(cmd: ProfileCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProfileCommands::Show => run_show(global),
        ProfileCommands::Edit(args) => run_edit(args, global),
        ProfileCommands::Notify(args) => run_notify(args, global),
        ProfileCommands::Privacy(args) => run_privacy(args, global),
    }
}

fn load_profile(workspace: &Workspace) -> Result<Option<UserProfile>> {
    let path = workspace.profile_path();
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).into_diagnostic()?;
    let profile = serde_yml::from_str(&content).into_diagnostic()?;
    Ok(Some(profile))
}

fn require_profile(workspace: &Workspace) -> Result<UserProfile> {
    load_profile(workspace)?.ok_or_else(|| {
        miette::miette!(
            "no profile yet; run `dlt profile edit` to create one, or `dlt init --demo`"
        )
    })
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let Some(profile) = load_profile(&workspace)? else {
        println!("No profile yet.");
        println!(
            "Run {} to create one, or {} for sample data.",
            style("dlt profile edit").yellow(),
            style("dlt init --demo").yellow()
        );
        return Ok(());
    };

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&profile).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&profile).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", profile.id),
        _ => {
            println!();
            print_separator();
            println!(
                "  {}  {}",
                style(profile.id.to_string()).cyan().bold(),
                style(profile.display_name()).yellow().bold()
            );
            print_separator();
            print_field("Email", &profile.email);
            if !profile.phone.is_empty() {
                print_field("Phone", &profile.phone);
            }
            if !profile.company.is_empty() {
                print_field("Company", &profile.company);
            }
            if !profile.role.is_empty() {
                print_field("Role", &profile.role);
            }
            if !profile.location.is_empty() {
                print_field("Location", &profile.location);
            }
            if !profile.bio.is_empty() {
                print_field("Bio", &profile.bio);
            }
            print_field("Member since", profile.joined_label());
            if !profile.timezone.is_empty() {
                print_field("Timezone", &profile.timezone);
            }
            if !profile.language.is_empty() {
                print_field("Language", &profile.language);
            }
            print_separator();
            println!("  {}", style("Notifications").bold());
            println!(
                "    {}  {}  {}  {}",
                checkbox(profile.notifications.email, "Email"),
                checkbox(profile.notifications.push, "Push"),
                checkbox(profile.notifications.sms, "SMS"),
                checkbox(profile.notifications.marketing, "Marketing")
            );
            println!("  {}", style("Privacy").bold());
            println!(
                "    {}  {}  {}",
                checkbox(profile.privacy.profile_visible, "Profile visible"),
                checkbox(profile.privacy.activity_visible, "Activity visible"),
                checkbox(profile.privacy.contact_visible, "Contact visible")
            );
            print_separator();
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let base = load_profile(&workspace)?.unwrap_or_else(blank_profile);

    let mut form = FormState::new(forms::profile_edit(&base));

    let flags = [
        ("first_name", &args.first_name),
        ("last_name", &args.last_name),
        ("email", &args.email),
        ("phone", &args.phone),
        ("company", &args.company),
        ("role", &args.role),
        ("location", &args.location),
        ("bio", &args.bio),
    ];
    let flag_mode = flags.iter().any(|(_, value)| value.is_some());

    if flag_mode {
        for (field, value) in flags {
            if let Some(value) = value {
                form.set(field, value.clone())
                    .map_err(|e| miette::miette!("{}", e))?;
            }
        }
    } else {
        println!("{}", style(&form.spec().title).bold());
        wizard::fill_interactive(&mut form)?;
    }

    if let Err(err) = form.validate() {
        for issue in &err.issues {
            eprintln!("  {} {}", style("✗").red(), issue);
        }
        return Err(miette::miette!(
            "{} field issue(s), profile unchanged",
            err.issues.len()
        ));
    }

    let updated = UserProfile {
        first_name: form.value("first_name").unwrap_or("").to_string(),
        last_name: form.value("last_name").unwrap_or("").to_string(),
        email: form.value("email").unwrap_or("").to_string(),
        phone: form.value("phone").unwrap_or("").to_string(),
        company: form.value("company").unwrap_or("").to_string(),
        role: form.value("role").unwrap_or("").to_string(),
        location: form.value("location").unwrap_or("").to_string(),
        bio: form.value("bio").unwrap_or("").to_string(),
        ..base
    };

    loader::save_record(&workspace.profile_path(), &updated)?;
    println!(
        "{} Profile saved for {}",
        style("✓").green(),
        style(updated.display_name()).cyan()
    );

    Ok(())
}

fn run_notify(args: NotifyArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let mut profile = require_profile(&workspace)?;

    let on = args.state.as_bool();
    let label = match args.channel {
        NotifyChannel::Email => {
            profile.notifications.email = on;
            "Email notifications"
        }
        NotifyChannel::Push => {
            profile.notifications.push = on;
            "Push notifications"
        }
        NotifyChannel::Sms => {
            profile.notifications.sms = on;
            "SMS notifications"
        }
        NotifyChannel::Marketing => {
            profile.notifications.marketing = on;
            "Marketing emails"
        }
    };

    loader::save_record(&workspace.profile_path(), &profile)?;
    print_toggle(label, on);
    Ok(())
}

fn run_privacy(args: PrivacyArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let mut profile = require_profile(&workspace)?;

    let on = args.state.as_bool();
    let label = match args.setting {
        PrivacySetting::Profile => {
            profile.privacy.profile_visible = on;
            "Profile visibility"
        }
        PrivacySetting::Activity => {
            profile.privacy.activity_visible = on;
            "Activity visibility"
        }
        PrivacySetting::Contact => {
            profile.privacy.contact_visible = on;
            "Contact visibility"
        }
    };

    loader::save_record(&workspace.profile_path(), &profile)?;
    print_toggle(label, on);
    Ok(())
}

fn print_toggle(label: &str, on: bool) {
    let state = if on {
        style("on").green()
    } else {
        style("off").dim()
    };
    println!("{} {} {}", style("✓").green(), label, state);
}

fn checkbox(on: bool, label: &str) -> String {
    if on {
        format!("{} {}", style("[✓]").green(), label)
    } else {
        format!("{} {}", style("[✗]").dim(), label)
    }
}

/// Empty profile scaffold used when editing before any profile exists
fn blank_profile() -> UserProfile {
    UserProfile {
        id: RecordId::user(1),
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
        phone: String::new(),
        company: String::new(),
        role: String::new(),
        location: String::new(),
        bio: String::new(),
        joined: chrono::Utc::now().date_naive(),
        timezone: "UTC".to_string(),
        language: "English".to_string(),
        notifications: Default::default(),
        privacy: Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_state_maps_to_bool() {
        assert!(ToggleState::On.as_bool());
        assert!(!ToggleState::Off.as_bool());
    }

    #[test]
    fn test_blank_profile_has_user_id() {
        let profile = blank_profile();
        assert_eq!(profile.id.to_string(), "USR-000001");
        assert!(profile.notifications.email);
    }
}
