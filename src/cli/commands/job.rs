//! `dlt job` command - refurbishment job management

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_workspace, paint_status, print_field, print_separator};
use crate::cli::table::{Cell, Listing};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::filter::FilterQuery;
use crate::core::identity::RecordPrefix;
use crate::core::loader;
use crate::core::metrics::Percent;
use crate::entities::refurbishment::{JobStatus, RefurbishmentJob};

#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// List refurbishment jobs
    List(ListArgs),

    /// Show details for one job
    Show(ShowArgs),

    /// Move a job to another bench status
    Advance(AdvanceArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search by device name, technician, facility, or ID
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by job status
    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    /// Filter by device condition
    #[arg(long, value_enum, default_value_t = ConditionFilter::All)]
    pub condition: ConditionFilter,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// No status constraint
    #[default]
    All,
    Scheduled,
    InProgress,
    QualityCheck,
    Completed,
    OnHold,
}

impl StatusFilter {
    fn facet_value(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Scheduled => "scheduled",
            StatusFilter::InProgress => "in_progress",
            StatusFilter::QualityCheck => "quality_check",
            StatusFilter::Completed => "completed",
            StatusFilter::OnHold => "on_hold",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConditionFilter {
    /// No condition constraint
    #[default]
    All,
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ConditionFilter {
    fn facet_value(&self) -> &'static str {
        match self {
            ConditionFilter::All => "all",
            ConditionFilter::Excellent => "excellent",
            ConditionFilter::Good => "good",
            ConditionFilter::Fair => "fair",
            ConditionFilter::Poor => "poor",
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Job ID (full or partial) or device name fragment
    pub query: String,
}

#[derive(clap::Args, Debug)]
pub struct AdvanceArgs {
    /// Job ID (full or partial) or device name fragment
    pub query: String,

    /// Target status (in-progress, quality-check, completed, on-hold)
    pub to: String,

    /// Quality score (0-100), usually recorded when completing
    #[arg(long)]
    pub score: Option<i64>,

    /// Progress percent override
    #[arg(long)]
    pub progress: Option<i64>,
}

pub fn run(cmd: JobCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        JobCommands::List(args) => run_list(args, global),
        JobCommands::Show(args) => run_show(args, global),
        JobCommands::Advance(args) => run_advance(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let store =
        loader::load_store::<RefurbishmentJob>(&workspace.record_dir(RecordPrefix::Job))?;

    if store.is_empty() {
        if !global.quiet {
            println!("No refurbishment jobs on file.");
            println!(
                "Run {} for sample data.",
                style("dlt init --demo").yellow()
            );
        }
        return Ok(());
    }

    let mut query = FilterQuery::new()
        .with_facet("status", args.status.facet_value())
        .with_facet("condition", args.condition.facet_value());
    if let Some(term) = &args.search {
        query = query.with_term(term.clone());
    }
    let jobs = store.filter(&query);

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Table,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&jobs).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&jobs).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for job in &jobs {
                println!("{}", job.id);
            }
        }
        _ => {
            let listing = Listing::new(
                "job",
                vec![
                    ("ID", 13),
                    ("DEVICE", 22),
                    ("CONDITION", 10),
                    ("STATUS", 14),
                    ("TECHNICIAN", 16),
                    ("PROGRESS", 8),
                    ("QUALITY", 8),
                ],
            );
            let rows: Vec<Vec<Cell>> = jobs
                .iter()
                .map(|j| {
                    vec![
                        Cell::Id(j.id.to_string()),
                        Cell::Text(j.device_name.clone()),
                        Cell::Status(j.condition.style()),
                        Cell::Status(j.status.style()),
                        Cell::Text(j.technician.clone()),
                        Cell::Percent(j.progress),
                        Cell::Text(j.quality_label()),
                    ]
                })
                .collect();
            match format {
                OutputFormat::Csv => listing.print_csv(&rows),
                OutputFormat::Tsv => listing.print_tsv(&rows),
                _ => listing.print_table(&rows),
            }
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let store =
        loader::load_store::<RefurbishmentJob>(&workspace.record_dir(RecordPrefix::Job))?;
    let job = store
        .find(&args.query)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(job).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(job).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", job.id),
        _ => {
            println!();
            print_separator();
            println!(
                "  {}  {}",
                style(job.id.to_string()).cyan().bold(),
                style(&job.device_name).yellow().bold()
            );
            print_separator();
            print_field("Device", &job.device);
            print_field("Condition", paint_status(&job.condition.style()));
            print_field("Status", paint_status(&job.status.style()));
            print_field("Technician", &job.technician);
            print_field("Facility", &job.facility);
            print_field("Started", job.start_date.format("%Y-%m-%d"));
            print_field(
                "Est. completion",
                job.estimated_completion.format("%Y-%m-%d"),
            );
            print_field("Progress", job.progress);
            if job.is_scored() {
                print_field("Quality score", style(job.quality_label()).cyan());
            } else {
                print_field("Quality score", style("Pending").dim());
            }
            if !job.issues.is_empty() {
                println!();
                println!("  {}", style("Issues found").bold());
                for issue in &job.issues {
                    println!("    {} {}", style("!").yellow(), issue);
                }
            }
            print_separator();
        }
    }

    Ok(())
}

fn run_advance(args: AdvanceArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let store =
        loader::load_store::<RefurbishmentJob>(&workspace.record_dir(RecordPrefix::Job))?;
    let job = store
        .find(&args.query)
        .map_err(|e| miette::miette!("{}", e))?;

    let target: JobStatus = args
        .to
        .parse()
        .map_err(|e: String| miette::miette!("{}", e))?;

    if !job.status.can_transition_to(target) {
        let allowed = job.status.allowed_transitions();
        let allowed = if allowed.is_empty() {
            "none".to_string()
        } else {
            allowed
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        return Err(miette::miette!(
            "{} cannot move from {} to {} (allowed: {})",
            job.id,
            job.status,
            target,
            allowed
        ));
    }

    let mut updated = job.clone();
    updated.status = target;
    if let Some(progress) = args.progress {
        updated.progress = Percent::new(progress);
    }
    if target == JobStatus::Completed {
        updated.progress = Percent::new(100);
    }
    if let Some(score) = args.score {
        updated.quality_score = Percent::new(score);
    }

    let path = workspace.record_path(&updated.id);
    loader::save_record(&path, &updated)?;

    println!(
        "{} {} now {}",
        style("✓").green(),
        style(updated.id.to_string()).cyan(),
        paint_status(&target.style())
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_values_match_facets() {
        assert_eq!(StatusFilter::All.facet_value(), "all");
        assert_eq!(StatusFilter::QualityCheck.facet_value(), "quality_check");
        assert_eq!(ConditionFilter::Poor.facet_value(), "poor");
    }
}
