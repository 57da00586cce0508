//! `dlt shipment` command - shipment tracking

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_workspace, paint_status, print_field, print_separator};
use crate::cli::table::{Cell, Listing};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::filter::FilterQuery;
use crate::core::identity::RecordPrefix;
use crate::core::loader;
use crate::entities::shipment::Shipment;

#[derive(Subcommand, Debug)]
pub enum ShipmentCommands {
    /// List shipments
    List(ListArgs),

    /// Show details for one shipment
    Show(ShowArgs),

    /// Show the stage-by-stage tracking checklist
    Track(TrackArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search by device name, route, carrier, tracking number, or ID
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by shipment status
    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// No status constraint
    #[default]
    All,
    Processing,
    InTransit,
    Delivered,
    Delayed,
}

impl StatusFilter {
    fn facet_value(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Processing => "processing",
            StatusFilter::InTransit => "in_transit",
            StatusFilter::Delivered => "delivered",
            StatusFilter::Delayed => "delayed",
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Shipment ID (full or partial) or device name fragment
    pub query: String,
}

#[derive(clap::Args, Debug)]
pub struct TrackArgs {
    /// Shipment ID, device name fragment, or tracking number
    pub query: String,
}

pub fn run(cmd: ShipmentCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ShipmentCommands::List(args) => run_list(args, global),
        ShipmentCommands::Show(args) => run_show(args, global),
        ShipmentCommands::Track(args) => run_track(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let store = loader::load_store::<Shipment>(&workspace.record_dir(RecordPrefix::Shipment))?;

    if store.is_empty() {
        if !global.quiet {
            println!("No shipments on file.");
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
    let shipments = store.filter(&query);

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Table,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&shipments).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&shipments).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for shipment in &shipments {
                println!("{}", shipment.id);
            }
        }
        _ => {
            let listing = Listing::new(
                "shipment",
                vec![
                    ("ID", 13),
                    ("DEVICE", 22),
                    ("ROUTE", 32),
                    ("STATUS", 12),
                    ("PROGRESS", 8),
                    ("ETA", 10),
                ],
            );
            let rows: Vec<Vec<Cell>> = shipments
                .iter()
                .map(|s| {
                    vec![
                        Cell::Id(s.id.to_string()),
                        Cell::Text(s.device_name.clone()),
                        Cell::Text(format!("{} → {}", s.origin, s.destination)),
                        Cell::Status(s.status.style()),
                        Cell::Percent(s.progress),
                        Cell::Date(s.eta),
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
    let store = loader::load_store::<Shipment>(&workspace.record_dir(RecordPrefix::Shipment))?;
    let shipment = store
        .find(&args.query)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(shipment).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(shipment).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", shipment.id),
        _ => {
            println!();
            print_separator();
            println!(
                "  {}  {}",
                style(shipment.id.to_string()).cyan().bold(),
                style(&shipment.device_name).yellow().bold()
            );
            print_separator();
            print_field("Device", &shipment.device);
            print_field(
                "Route",
                format!("{} → {}", shipment.origin, shipment.destination),
            );
            print_field("Status", paint_status(&shipment.status.style()));
            print_field("Progress", shipment.progress);
            print_field("ETA", shipment.eta.format("%Y-%m-%d"));
            print_field("Carrier", &shipment.carrier);
            print_field("Tracking number", &shipment.tracking_number);
            print_separator();
        }
    }

    Ok(())
}

fn run_track(args: TrackArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let store = loader::load_store::<Shipment>(&workspace.record_dir(RecordPrefix::Shipment))?;
    let shipment = store
        .find(&args.query)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(shipment).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(shipment).into_diagnostic()?);
        }
        _ => {
            println!();
            println!(
                "{} {} {} {}",
                style(shipment.id.to_string()).cyan().bold(),
                style(&shipment.device_name).bold(),
                style("via").dim(),
                shipment.carrier
            );
            println!(
                "{} {} → {}   {} {}",
                style("Route:").bold(),
                shipment.origin,
                shipment.destination,
                style("ETA:").bold(),
                shipment.eta.format("%Y-%m-%d")
            );
            println!();

            let current = shipment.current_stage().map(|s| s.name.clone());
            for stage in &shipment.stages {
                let is_current = current.as_deref() == Some(stage.name.as_str());
                let mark = if stage.completed {
                    style("✓").green()
                } else if is_current {
                    style("●").cyan()
                } else {
                    style("○").dim()
                };
                let name = if stage.completed {
                    style(stage.name.as_str()).white()
                } else if is_current {
                    style(stage.name.as_str()).cyan().bold()
                } else {
                    style(stage.name.as_str()).dim()
                };
                let when = stage
                    .timestamp
                    .as_deref()
                    .map(|t| format!("  {}", style(t).dim()))
                    .unwrap_or_default();
                println!("  {} {}{}", mark, name, when);
            }

            println!();
            println!(
                "{} of {} stages complete, {} overall",
                shipment.completed_stages(),
                shipment.stages.len(),
                style(shipment.progress.to_string()).cyan()
            );
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
        assert_eq!(StatusFilter::InTransit.facet_value(), "in_transit");
        assert_eq!(StatusFilter::Delayed.facet_value(), "delayed");
    }
}
