//! `dlt init` command - Initialize a new DLT workspace

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::core::workspace::{Workspace, WorkspaceError};
use crate::seed;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Seed the workspace with the demo fleet
    #[arg(long)]
    pub demo: bool,

    /// Force initialization even if .dlt/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    // Create directory if it doesn't exist
    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let workspace = if args.force {
        Workspace::init_force(&path)
    } else {
        Workspace::init(&path)
    };

    match workspace {
        Ok(workspace) => {
            println!(
                "{} Initialized DLT workspace at {}",
                style("✓").green(),
                style(workspace.root().display()).cyan()
            );

            if args.demo {
                let written = seed::write_demo(&workspace)?;
                println!(
                    "{} Seeded demo fleet ({} records)",
                    style("✓").green(),
                    written
                );
            }

            println!();
            println!("Created workspace structure:");
            print_structure(workspace.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} List registered devices",
                style("dlt device list").yellow()
            );
            println!(
                "  {} Register your first device",
                style("dlt device register").yellow()
            );
            println!(
                "  {} Validate workspace files",
                style("dlt validate").yellow()
            );
            Ok(())
        }
        Err(WorkspaceError::AlreadyExists(path)) => {
            println!(
                "{} DLT workspace already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("dlt init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(root: &Path) {
    let dirs = [
        ".dlt/",
        ".dlt/config.yaml",
        "devices/",
        "shipments/",
        "recycling/",
        "refurbishment/",
        "profile/",
    ];

    for dir in dirs {
        let full_path = root.join(dir);
        if full_path.exists() {
            let prefix = if dir.ends_with('/') { "📁" } else { "📄" };
            println!("  {} {}", prefix, style(dir).dim());
        }
    }
}
