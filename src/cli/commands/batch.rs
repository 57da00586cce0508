//! `dlt batch` command - recycling batch management

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{open_workspace, paint_status, print_field, print_separator};
use crate::cli::table::{Cell, Listing};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::filter::FilterQuery;
use crate::core::identity::RecordPrefix;
use crate::core::loader;
use crate::entities::recycling::RecyclingBatch;

#[derive(Subcommand, Debug)]
pub enum BatchCommands {
    /// List recycling batches
    List(ListArgs),

    /// Show details for one batch, including material recovery
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search by facility, device type, or ID
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by batch status
    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// No status constraint
    #[default]
    All,
    Scheduled,
    Processing,
    Completed,
}

impl StatusFilter {
    fn facet_value(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Scheduled => "scheduled",
            StatusFilter::Processing => "processing",
            StatusFilter::Completed => "completed",
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Batch ID (full or partial) or facility fragment
    pub query: String,
}

pub fn run(cmd: BatchCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        BatchCommands::List(args) => run_list(args, global),
        BatchCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let store =
        loader::load_store::<RecyclingBatch>(&workspace.record_dir(RecordPrefix::Batch))?;

    if store.is_empty() {
        if !global.quiet {
            println!("No recycling batches on file.");
            println!(
                "Run {} for sample data.",
                style("dlt init --demo").yellow()
            );
        }
        return Ok(());
    }

    let mut query = FilterQuery::new().with_facet("status", args.status.facet_value());
    if let Some(term) = &args.search {
        query = query.with_term(term.clone());
    }
    let batches = store.filter(&query);

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Table,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&batches).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&batches).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for batch in &batches {
                println!("{}", batch.id);
            }
        }
        _ => {
            let listing = Listing::new(
                "batch",
                vec![
                    ("ID", 14),
                    ("DEVICES", 7),
                    ("FACILITY", 22),
                    ("STATUS", 12),
                    ("RECOVERY", 8),
                    ("CARBON", 14),
                ],
            );
            let rows: Vec<Vec<Cell>> = batches
                .iter()
                .map(|b| {
                    vec![
                        Cell::Id(b.id.to_string()),
                        Cell::Number(b.device_count as i64),
                        Cell::Text(b.facility.clone()),
                        Cell::Status(b.status.style()),
                        Cell::Text(b.recovery_label()),
                        Cell::Text(b.carbon_saved.clone()),
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
        loader::load_store::<RecyclingBatch>(&workspace.record_dir(RecordPrefix::Batch))?;
    let batch = store
        .find(&args.query)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(batch).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(batch).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", batch.id),
        _ => {
            println!();
            print_separator();
            println!(
                "  {}  {}",
                style(batch.id.to_string()).cyan().bold(),
                style(&batch.facility).yellow().bold()
            );
            print_separator();
            print_field("Devices", batch.device_count);
            if !batch.device_types.is_empty() {
                print_field("Device types", batch.device_types.join(", "));
            }
            print_field("Status", paint_status(&batch.status.style()));
            print_field("Started", batch.start_date.format("%Y-%m-%d"));
            print_field(
                "Est. completion",
                batch.estimated_completion.format("%Y-%m-%d"),
            );
            if batch.is_assessed() {
                print_field("Material recovery", style(batch.recovery_label()).cyan());
            } else {
                print_field("Material recovery", style("Pending").dim());
            }
            print_field("Carbon saved", &batch.carbon_saved);
            print_separator();

            if !batch.materials.is_empty() {
                println!();
                println!("  {}", style("Material recovery").bold());
                let mut builder = Builder::default();
                builder.push_record(["Material", "Recovered", "Total", "Rate"]);
                for row in &batch.materials {
                    builder.push_record([
                        row.material.clone(),
                        format!("{:.0} kg", row.recovered_kg),
                        format!("{:.0} kg", row.total_kg),
                        row.rate().to_string(),
                    ]);
                }
                let table = builder.build().with(Style::rounded()).to_string();
                for line in table.lines() {
                    println!("  {}", line);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_values_match_facets() {
        assert_eq!(StatusFilter::All.facet_value(), "all");
        assert_eq!(StatusFilter::Completed.facet_value(), "completed");
    }
}
