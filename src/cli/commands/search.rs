//! `dlt search` command - Search across all record types
//!
//! One query over the whole workspace: devices, shipments, recycling
//! batches, and refurbishment jobs share the same predicate engine, so a
//! term like "macbook" surfaces the device and everything referencing it.

use clap::ValueEnum;
use console::style;
use miette::Result;

use crate::cli::helpers::{escape_csv, open_workspace, paint, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::filter::{Filterable, FilterQuery};
use crate::core::identity::RecordPrefix;
use crate::core::loader;
use crate::core::record::{Record, StatusStyle};
use crate::core::workspace::Workspace;
use crate::entities::device::Device;
use crate::entities::recycling::RecyclingBatch;
use crate::entities::refurbishment::RefurbishmentJob;
use crate::entities::shipment::Shipment;

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search term (matches IDs, names, and other text fields)
    pub query: String,

    /// Filter by record type(s)
    #[arg(long, short = 't', value_delimiter = ',')]
    pub record_type: Option<Vec<RecordTypeFilter>>,

    /// Limit number of results
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: usize,

    /// Show only the result count
    #[arg(long)]
    pub count: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RecordTypeFilter {
    Device,
    Shipment,
    Batch,
    Job,
}

impl RecordTypeFilter {
    fn prefix(&self) -> RecordPrefix {
        match self {
            RecordTypeFilter::Device => RecordPrefix::Device,
            RecordTypeFilter::Shipment => RecordPrefix::Shipment,
            RecordTypeFilter::Batch => RecordPrefix::Batch,
            RecordTypeFilter::Job => RecordPrefix::Job,
        }
    }
}

/// One row of the unified result set
struct SearchHit {
    id: String,
    kind: &'static str,
    title: String,
    status: StatusStyle,
}

pub fn run(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let query = FilterQuery::new().with_term(args.query.clone());

    let wanted = |prefix: RecordPrefix| match &args.record_type {
        Some(types) => types.iter().any(|t| t.prefix() == prefix),
        None => true,
    };

    let mut hits: Vec<SearchHit> = Vec::new();
    if wanted(RecordPrefix::Device) {
        collect::<Device>(&workspace, &query, "device", &mut hits)?;
    }
    if wanted(RecordPrefix::Shipment) {
        collect::<Shipment>(&workspace, &query, "shipment", &mut hits)?;
    }
    if wanted(RecordPrefix::Batch) {
        collect::<RecyclingBatch>(&workspace, &query, "batch", &mut hits)?;
    }
    if wanted(RecordPrefix::Job) {
        collect::<RefurbishmentJob>(&workspace, &query, "job", &mut hits)?;
    }
    hits.truncate(args.limit);

    if args.count {
        println!("{}", hits.len());
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results found for '{}'.", style(&args.query).yellow());
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Table,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = hits.iter().map(hit_json).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).unwrap_or_default()
            );
        }
        OutputFormat::Yaml => {
            let rows: Vec<serde_json::Value> = hits.iter().map(hit_json).collect();
            print!("{}", serde_yml::to_string(&rows).unwrap_or_default());
        }
        OutputFormat::Csv => {
            println!("id,type,title,status");
            for hit in &hits {
                println!(
                    "{},{},{},{}",
                    hit.id,
                    hit.kind,
                    escape_csv(&hit.title),
                    hit.status.label
                );
            }
        }
        OutputFormat::Tsv => {
            for hit in &hits {
                println!(
                    "{}\t{}\t{}\t{}",
                    hit.id, hit.kind, hit.title, hit.status.label
                );
            }
        }
        OutputFormat::Id => {
            for hit in &hits {
                println!("{}", hit.id);
            }
        }
        OutputFormat::Auto | OutputFormat::Table => {
            println!(
                "{} result(s) for '{}':",
                style(hits.len()).cyan(),
                style(&args.query).yellow()
            );
            println!();
            println!(
                "{:<13} {:<10} {:<32} {:<14}",
                style("ID").bold(),
                style("TYPE").bold(),
                style("TITLE").bold(),
                style("STATUS").bold()
            );
            println!("{}", "-".repeat(72));

            for hit in &hits {
                let kind_styled = match hit.kind {
                    "device" => style(hit.kind).blue(),
                    "shipment" => style(hit.kind).magenta(),
                    "batch" => style(hit.kind).green(),
                    "job" => style(hit.kind).yellow(),
                    _ => style(hit.kind).white(),
                };
                println!(
                    "{:<13} {:<10} {:<32} {:<14}",
                    style(&hit.id).cyan(),
                    kind_styled,
                    truncate_str(&hit.title, 30),
                    paint(hit.status.label, hit.status.tone)
                );
            }

            println!();
            println!(
                "Use {} to show record details.",
                style("dlt <type> show <ID>").cyan()
            );
        }
    }

    Ok(())
}

fn collect<R: Record + Filterable + 'static>(
    workspace: &Workspace,
    query: &FilterQuery,
    kind: &'static str,
    hits: &mut Vec<SearchHit>,
) -> Result<()> {
    let store = loader::load_store::<R>(&workspace.record_dir(R::PREFIX))?;
    for record in store.filter(query) {
        hits.push(SearchHit {
            id: record.id().to_string(),
            kind,
            title: record.label().to_string(),
            status: record.status_style(),
        });
    }
    Ok(())
}

fn hit_json(hit: &SearchHit) -> serde_json::Value {
    serde_json::json!({
        "id": hit.id,
        "type": hit.kind,
        "title": hit.title,
        "status": hit.status.label,
    })
}
