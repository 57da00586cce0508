//! `dlt account` command - simulated sign-in and the stored session
//!
//! Nothing talks to a real service. Submissions go through the simulated
//! gateway (fixed delay, always accepts) and a successful sign-in mints a
//! local session token so the flow has a visible artifact.

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::wizard;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::form::{FormError, FormState, SimulatedGateway, SubmitOutcome};
use crate::core::session::Session;
use crate::forms;

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Sign in and store a session
    Login(LoginArgs),

    /// Create an account and store a session
    Signup(SignupArgs),

    /// Show the stored session
    Status,

    /// Remove the stored session
    Logout,
}

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Account email; omit to be prompted
    #[arg(long)]
    pub email: Option<String>,

    /// Account password; omit to be prompted with hidden input
    #[arg(long)]
    pub password: Option<String>,

    /// Keep the session across restarts
    #[arg(long)]
    pub remember: bool,
}

#[derive(clap::Args, Debug)]
pub struct SignupArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Company or organization (optional)
    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Password confirmation; defaults to --password when omitted
    #[arg(long)]
    pub confirm_password: Option<String>,

    /// Accept the terms of service
    #[arg(long)]
    pub accept_terms: bool,

    /// Opt in to sustainability updates
    #[arg(long)]
    pub updates: bool,
}

pub fn run(cmd: AccountCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AccountCommands::Login(args) => run_login(args, global),
        AccountCommands::Signup(args) => run_signup(args, global),
        AccountCommands::Status => run_status(global),
        AccountCommands::Logout => run_logout(global),
    }
}

fn run_login(args: LoginArgs, global: &GlobalOpts) -> Result<()> {
    let mut form = FormState::new(forms::sign_in());

    let flag_mode = args.email.is_some() || args.password.is_some();
    if flag_mode {
        if let Some(email) = &args.email {
            form.set("email", email.clone())
                .map_err(|e| miette::miette!("{}", e))?;
        }
        if let Some(password) = &args.password {
            form.set("password", password.clone())
                .map_err(|e| miette::miette!("{}", e))?;
        }
    } else {
        println!("{}", style(&form.spec().title).bold());
        wizard::fill_interactive(&mut form)?;
    }
    if args.remember {
        form.set("remember", "true")
            .map_err(|e| miette::miette!("{}", e))?;
    }

    if !global.quiet {
        println!("{}", style("Signing in...").dim());
    }

    let outcome = submit_or_report(&mut form, "not signed in")?;

    let email = form.value("email").unwrap_or("").to_string();
    let session = Session::new(&email);
    let path = Session::default_path().map_err(|e| miette::miette!("{}", e))?;
    session
        .save_to(&path)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Signed in as {}",
        style("✓").green(),
        style(&email).cyan()
    );
    report_outcome(&outcome, global);

    Ok(())
}

fn run_signup(args: SignupArgs, global: &GlobalOpts) -> Result<()> {
    let mut form = FormState::new(forms::sign_up());

    let flag_mode = args.email.is_some() || args.first_name.is_some();
    if flag_mode {
        let confirm = args
            .confirm_password
            .clone()
            .or_else(|| args.password.clone());
        let flags = [
            ("first_name", args.first_name),
            ("last_name", args.last_name),
            ("email", args.email),
            ("company", args.company),
            ("password", args.password),
            ("confirm_password", confirm),
        ];
        for (field, value) in flags {
            if let Some(value) = value {
                form.set(field, value).map_err(|e| miette::miette!("{}", e))?;
            }
        }
        if args.accept_terms {
            form.set("terms", "true")
                .map_err(|e| miette::miette!("{}", e))?;
        }
        if args.updates {
            form.set("updates", "true")
                .map_err(|e| miette::miette!("{}", e))?;
        }
    } else {
        println!("{}", style(&form.spec().title).bold());
        wizard::fill_interactive(&mut form)?;
    }

    if !global.quiet {
        println!("{}", style("Creating account...").dim());
    }

    let outcome = submit_or_report(&mut form, "account not created")?;

    let email = form.value("email").unwrap_or("").to_string();
    let session = Session::new(&email);
    let path = Session::default_path().map_err(|e| miette::miette!("{}", e))?;
    session
        .save_to(&path)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Account created for {}",
        style("✓").green(),
        style(&email).cyan()
    );
    report_outcome(&outcome, global);

    Ok(())
}

/// Submit through the simulated gateway, listing every field issue on
/// validation failure
fn submit_or_report(form: &mut FormState, failure_note: &str) -> Result<SubmitOutcome> {
    let gateway = SimulatedGateway::new();
    match form.submit(&gateway) {
        Ok(outcome) => Ok(outcome),
        Err(FormError::Invalid(err)) => {
            for issue in &err.issues {
                eprintln!("  {} {}", style("✗").red(), issue);
            }
            Err(miette::miette!(
                "{} field issue(s), {}",
                err.issues.len(),
                failure_note
            ))
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn report_outcome(outcome: &SubmitOutcome, global: &GlobalOpts) {
    if global.verbose {
        if let Some(message) = &outcome.accepted.message {
            println!("  {}", style(message).dim());
        }
    }
    if let Some(route) = &outcome.redirect {
        println!("  {}", style(format!("→ {}", route)).dim());
    }
}

fn run_status(global: &GlobalOpts) -> Result<()> {
    let path = Session::default_path().map_err(|e| miette::miette!("{}", e))?;
    let session = Session::load_from(&path).map_err(|e| miette::miette!("{}", e))?;

    let Some(session) = session else {
        println!("Not signed in.");
        println!("Run {} to sign in.", style("dlt account login").yellow());
        return Ok(());
    };

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&session)
                    .map_err(|e| miette::miette!("{}", e))?
            );
        }
        OutputFormat::Yaml => {
            print!(
                "{}",
                serde_yml::to_string(&session).map_err(|e| miette::miette!("{}", e))?
            );
        }
        _ => {
            println!(
                "Signed in as {} since {}",
                style(&session.email).cyan(),
                session.created.format("%Y-%m-%d %H:%M UTC")
            );
            if global.verbose {
                println!("  {}", style(format!("token {}", session.token)).dim());
                println!("  {}", style(format!("({})", path.display())).dim());
            }
        }
    }

    Ok(())
}

fn run_logout(_global: &GlobalOpts) -> Result<()> {
    let path = Session::default_path().map_err(|e| miette::miette!("{}", e))?;
    let had_session = Session::load_from(&path)
        .map_err(|e| miette::miette!("{}", e))?
        .is_some();
    Session::clear(&path).map_err(|e| miette::miette!("{}", e))?;

    if had_session {
        println!("{} Signed out", style("✓").green());
    } else {
        println!("No session to remove.");
    }

    Ok(())
}
