//! `dlt device` command - fleet registry management

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{open_workspace, paint_status, print_field, print_separator};
use crate::cli::table::{Cell, Listing};
use crate::cli::wizard;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::filter::FilterQuery;
use crate::core::form::FormState;
use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::loader;
use crate::core::store::RecordStore;
use crate::entities::device::{Category, Device, DeviceStatus};
use crate::forms;
use crate::schema::TemplateGenerator;

#[derive(Subcommand, Debug)]
pub enum DeviceCommands {
    /// List devices in the fleet
    List(ListArgs),

    /// Show details for one device
    Show(ShowArgs),

    /// Register a new device
    Register(RegisterArgs),

    /// Import devices from a CSV file
    Import(ImportArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search by name, manufacturer, or ID (case-insensitive substring)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by lifecycle status
    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    /// Filter by category
    #[arg(long, value_enum, default_value_t = CategoryFilter::All)]
    pub category: CategoryFilter,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// No status constraint
    #[default]
    All,
    Active,
    InTransit,
    EndOfLife,
    Refurbishment,
}

impl StatusFilter {
    fn facet_value(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::InTransit => "in_transit",
            StatusFilter::EndOfLife => "end_of_life",
            StatusFilter::Refurbishment => "refurbishment",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No category constraint
    #[default]
    All,
    Smartphone,
    Laptop,
    Tablet,
    Desktop,
    Other,
}

impl CategoryFilter {
    fn facet_value(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Smartphone => "smartphone",
            CategoryFilter::Laptop => "laptop",
            CategoryFilter::Tablet => "tablet",
            CategoryFilter::Desktop => "desktop",
            CategoryFilter::Other => "other",
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Device ID (full or partial) or name fragment
    pub query: String,
}

#[derive(clap::Args, Debug)]
pub struct RegisterArgs {
    /// Device name; omit all flags to run the interactive wizard
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub manufacturer: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    /// Manufacturer serial number
    #[arg(long)]
    pub serial: Option<String>,

    /// Device category (smartphone, laptop, tablet, desktop, other)
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub owner: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Don't open the new file in the editor
    #[arg(long)]
    pub no_edit: bool,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV file with headers: name,manufacturer,model,serial_number,category,status,owner,location
    pub file: PathBuf,

    /// Parse and report without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(cmd: DeviceCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DeviceCommands::List(args) => run_list(args, global),
        DeviceCommands::Show(args) => run_show(args, global),
        DeviceCommands::Register(args) => run_register(args, global),
        DeviceCommands::Import(args) => run_import(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let store = loader::load_store::<Device>(&workspace.record_dir(RecordPrefix::Device))?;

    if store.is_empty() {
        if !global.quiet {
            println!("No devices registered.");
            println!(
                "Run {} to add one, or {} for sample data.",
                style("dlt device register").yellow(),
                style("dlt init --demo").yellow()
            );
        }
        return Ok(());
    }

    let mut query = FilterQuery::new()
        .with_facet("status", args.status.facet_value())
        .with_facet("category", args.category.facet_value());
    if let Some(term) = &args.search {
        query = query.with_term(term.clone());
    }
    let devices = store.filter(&query);

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Table,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&devices).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&devices).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for device in &devices {
                println!("{}", device.id);
            }
        }
        _ => {
            let listing = Listing::new(
                "device",
                vec![
                    ("ID", 10),
                    ("NAME", 24),
                    ("CATEGORY", 12),
                    ("STATUS", 14),
                    ("OWNER", 22),
                    ("LOCATION", 18),
                ],
            );
            let rows: Vec<Vec<Cell>> = devices
                .iter()
                .map(|d| {
                    vec![
                        Cell::Id(d.id.to_string()),
                        Cell::Text(d.name.clone()),
                        Cell::Text(d.category.label().to_string()),
                        Cell::Status(d.status.style()),
                        Cell::Text(d.owner.clone()),
                        Cell::Text(d.location.clone()),
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
    let store = loader::load_store::<Device>(&workspace.record_dir(RecordPrefix::Device))?;
    let device = store
        .find(&args.query)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(device).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(device).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", device.id),
        _ => {
            println!();
            print_separator();
            println!(
                "  {}  {}",
                style(device.id.to_string()).cyan().bold(),
                style(&device.name).yellow().bold()
            );
            print_separator();
            print_field("Manufacturer", &device.manufacturer);
            print_field("Model", &device.model);
            print_field("Serial number", &device.serial_number);
            print_field("Category", device.category.label());
            print_field("Status", paint_status(&device.status.style()));
            print_field("Registered", device.registered.format("%Y-%m-%d"));
            print_field("Last update", device.last_update.format("%Y-%m-%d"));
            print_field("Owner", &device.owner);
            print_field("Location", &device.location);
            print_separator();
        }
    }

    Ok(())
}

fn run_register(args: RegisterArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let store = loader::load_store::<Device>(&workspace.record_dir(RecordPrefix::Device))?;

    let mut form = FormState::new(forms::device_registration());

    let flags = [
        ("name", &args.name),
        ("manufacturer", &args.manufacturer),
        ("model", &args.model),
        ("serial_number", &args.serial),
        ("category", &args.category),
        ("owner", &args.owner),
        ("location", &args.location),
    ];
    let flag_mode = flags.iter().any(|(_, value)| value.is_some());

    if flag_mode {
        for (field, value) in flags {
            if let Some(value) = value {
                // Select options are lowercase keys; accept --category Laptop
                let value = if field == "category" {
                    value.to_lowercase()
                } else {
                    value.clone()
                };
                form.set(field, value).map_err(|e| miette::miette!("{}", e))?;
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
            "{} field issue(s), nothing registered",
            err.issues.len()
        ));
    }

    let category: Category = form
        .value("category")
        .unwrap_or("")
        .parse()
        .map_err(|e: String| miette::miette!("{}", e))?;

    let today = chrono::Utc::now().date_naive();
    let device = Device {
        id: next_device_id(&store),
        name: form.value("name").unwrap_or("").to_string(),
        manufacturer: form.value("manufacturer").unwrap_or("").to_string(),
        model: form.value("model").unwrap_or("").to_string(),
        serial_number: form.value("serial_number").unwrap_or("").to_string(),
        category,
        status: DeviceStatus::Active,
        registered: today,
        last_update: today,
        owner: form.value("owner").unwrap_or("").to_string(),
        location: form.value("location").unwrap_or("").to_string(),
    };

    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let content = generator
        .generate_device(&device)
        .map_err(|e| miette::miette!("{}", e))?;

    let path = workspace.record_path(&device.id);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    std::fs::write(&path, content).into_diagnostic()?;

    println!(
        "{} Registered device {} {}",
        style("✓").green(),
        style(device.id.to_string()).cyan(),
        style(format!("({})", path.display())).dim()
    );

    if !args.no_edit {
        let config = Config::load();
        config.run_editor(&path).into_diagnostic()?;
    }

    Ok(())
}

/// One line of a device import file
#[derive(serde::Deserialize)]
struct ImportRow {
    name: String,
    manufacturer: String,
    model: String,
    serial_number: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    status: String,
    owner: String,
    location: String,
}

fn run_import(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let store = loader::load_store::<Device>(&workspace.record_dir(RecordPrefix::Device))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&args.file)
        .into_diagnostic()?;

    let mut next = next_device_id(&store);
    let today = chrono::Utc::now().date_naive();
    let mut imported = 0usize;
    let mut skipped = 0usize;

    for result in reader.deserialize::<ImportRow>() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                eprintln!("  {} skipping row: {}", style("!").yellow(), e);
                skipped += 1;
                continue;
            }
        };

        if row.name.is_empty() || row.serial_number.is_empty() {
            eprintln!(
                "  {} skipping row: name and serial_number are required",
                style("!").yellow()
            );
            skipped += 1;
            continue;
        }

        let device = Device {
            id: next.clone(),
            name: row.name,
            manufacturer: row.manufacturer,
            model: row.model,
            serial_number: row.serial_number,
            category: row.category.parse().unwrap_or_default(),
            status: row.status.parse().unwrap_or_default(),
            registered: today,
            last_update: today,
            owner: row.owner,
            location: row.location,
        };
        next = bump(&next);

        if !args.dry_run {
            let path = workspace.record_path(&device.id);
            loader::save_record(&path, &device)?;
        }
        if global.verbose {
            println!("  {} {} {}", style("✓").green(), device.id, device.name);
        }
        imported += 1;
    }

    let verb = if args.dry_run { "Parsed" } else { "Imported" };
    println!(
        "{} {} {} device(s), {} skipped",
        style("✓").green(),
        verb,
        imported,
        skipped
    );

    Ok(())
}

/// Next free NX- serial, one past the highest in the store
fn next_device_id(store: &RecordStore<Device>) -> RecordId {
    let max = store
        .iter()
        .filter_map(|d| d.id.serial().parse::<u32>().ok())
        .max()
        .unwrap_or(999);
    RecordId::device(max + 1)
}

fn bump(id: &RecordId) -> RecordId {
    let next = id.serial().parse::<u32>().unwrap_or(999) + 1;
    RecordId::device(next)
}
