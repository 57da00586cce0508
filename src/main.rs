use clap::Parser;
use dlt::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => dlt::cli::commands::init::run(args),
        Commands::Device(cmd) => dlt::cli::commands::device::run(cmd, &global),
        Commands::Shipment(cmd) => dlt::cli::commands::shipment::run(cmd, &global),
        Commands::Batch(cmd) => dlt::cli::commands::batch::run(cmd, &global),
        Commands::Job(cmd) => dlt::cli::commands::job::run(cmd, &global),
        Commands::Profile(cmd) => dlt::cli::commands::profile::run(cmd, &global),
        Commands::Account(cmd) => dlt::cli::commands::account::run(cmd, &global),
        Commands::Stats(args) => dlt::cli::commands::stats::run(args, &global),
        Commands::Search(args) => dlt::cli::commands::search::run(args, &global),
        Commands::Validate(args) => dlt::cli::commands::validate::run(args, &global),
        Commands::Completions(args) => dlt::cli::commands::completions::run(args),
    }
}
