//! `dlt validate` command - Validate workspace files against schemas

use console::style;
use miette::Result;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::cli::helpers::open_workspace;
use crate::cli::GlobalOpts;
use crate::core::identity::RecordPrefix;
use crate::core::workspace::Workspace;
use crate::schema::registry::SchemaRegistry;
use crate::schema::validator::Validator;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Paths to validate (default: entire workspace)
    #[arg()]
    pub paths: Vec<PathBuf>,

    /// Only validate one record type (device, shipment, batch, job, profile)
    #[arg(long, short = 't')]
    pub record_type: Option<String>,

    /// Continue validation after first error
    #[arg(long)]
    pub keep_going: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    files_skipped: usize,
    total_errors: usize,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;
    let registry = SchemaRegistry::default();
    let validator = Validator::new(&registry);

    let files_to_validate: Vec<PathBuf> = if args.paths.is_empty() {
        all_record_files(&workspace)
    } else {
        expand_paths(&args.paths)
    };

    let type_filter = args.record_type.as_deref().and_then(parse_type_filter);
    if args.record_type.is_some() && type_filter.is_none() {
        return Err(miette::miette!(
            "unknown record type '{}' (expected device, shipment, batch, job, or profile)",
            args.record_type.unwrap_or_default()
        ));
    }

    let mut stats = ValidationStats::default();
    let mut had_error = false;

    println!(
        "{} Validating {} file(s)...\n",
        style("→").blue(),
        files_to_validate.len()
    );

    for path in &files_to_validate {
        if !path.to_string_lossy().ends_with(".dlt.yaml") {
            continue;
        }

        let filename = path.file_name().unwrap_or_default().to_string_lossy();
        let prefix = RecordPrefix::from_filename(&filename).or_else(|| RecordPrefix::from_path(path));

        if let Some(filter) = type_filter {
            if prefix != Some(filter) {
                continue;
            }
        }

        let prefix = match prefix {
            Some(p) => p,
            None => {
                stats.files_skipped += 1;
                if !args.summary {
                    println!(
                        "{} {} - unknown record type (skipped)",
                        style("?").yellow(),
                        path.display()
                    );
                }
                continue;
            }
        };

        stats.files_checked += 1;

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                if !args.summary {
                    println!("{} {} - {}", style("✗").red(), path.display(), e);
                }
                stats.files_failed += 1;
                stats.total_errors += 1;
                had_error = true;
                if !args.keep_going {
                    break;
                }
                continue;
            }
        };

        match validator.validate(&content, &filename, prefix) {
            Ok(()) => {
                stats.files_passed += 1;
                if !args.summary {
                    println!("{} {}", style("✓").green(), path.display());
                }
            }
            Err(e) => {
                stats.files_failed += 1;
                stats.total_errors += e.violation_count();
                had_error = true;

                if !args.summary {
                    println!(
                        "{} {} - {} error(s)",
                        style("✗").red(),
                        path.display(),
                        e.violation_count()
                    );

                    // Print detailed error using miette
                    let report = miette::Report::new(e);
                    println!("{:?}", report);
                }

                if !args.keep_going {
                    break;
                }
            }
        }
    }

    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());

    if stats.files_skipped > 0 {
        println!("  Files skipped:  {}", style(stats.files_skipped).yellow());
    }

    println!();

    if had_error {
        if stats.files_failed == 1 {
            Err(miette::miette!("Validation failed: 1 file has errors"))
        } else {
            Err(miette::miette!(
                "Validation failed: {} files have errors",
                stats.files_failed
            ))
        }
    } else {
        println!(
            "{} All files passed validation!",
            style("✓").green().bold()
        );
        Ok(())
    }
}

/// Accept both type names (device) and ID prefixes (NX)
fn parse_type_filter(input: &str) -> Option<RecordPrefix> {
    input
        .parse()
        .ok()
        .or_else(|| RecordPrefix::from_filename(input))
}

/// Get all .dlt.yaml files in the workspace
fn all_record_files(workspace: &Workspace) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(workspace.root())
        .into_iter()
        .filter_entry(|e| {
            // Skip .git and .dlt directories
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') || e.depth() == 0
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.to_string_lossy().ends_with(".dlt.yaml") {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files
}

/// Expand paths - if a directory is given, find all .dlt.yaml files in it
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if entry.path().to_string_lossy().ends_with(".dlt.yaml") {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.exists() {
            files.push(path.clone());
        }
    }

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use tempfile::tempdir;

    #[test]
    fn test_parse_type_filter() {
        assert_eq!(parse_type_filter("device"), Some(RecordPrefix::Device));
        assert_eq!(parse_type_filter("NX"), Some(RecordPrefix::Device));
        assert_eq!(parse_type_filter("batch"), Some(RecordPrefix::Batch));
        assert_eq!(parse_type_filter("profile"), Some(RecordPrefix::User));
        assert_eq!(parse_type_filter("widget"), None);
    }

    #[test]
    fn test_all_record_files_finds_demo() {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::init(tmp.path()).unwrap();
        seed::write_demo(&workspace).unwrap();

        let files = all_record_files(&workspace);
        assert_eq!(files.len(), 16);
    }

    #[test]
    fn test_demo_fleet_passes_validation() {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::init(tmp.path()).unwrap();
        seed::write_demo(&workspace).unwrap();

        let validator = Validator::default();
        for path in all_record_files(&workspace) {
            let outcome = validator.validate_file(&path).unwrap();
            assert_eq!(
                outcome,
                crate::schema::validator::FileCheck::Passed,
                "{} should validate",
                path.display()
            );
        }
    }
}
