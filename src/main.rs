mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    init_tracing(args.verbose);
    cli::context::init(args.config_dir.as_deref());
    cli::output::set_quiet(args.quiet);

    let profile = args.profile.as_deref();
    tracing::debug!(?profile, command = ?args.command, "starting");

    let result = match &args.command {
        Commands::Init { project } => cli::commands::init::execute(project, args.verbose),
        Commands::Resolve { output } => cli::commands::resolve::execute(profile, output),
        Commands::Show => cli::commands::show::execute(profile),
        Commands::Check { all } => cli::commands::check::execute(profile, *all),
        Commands::Diff { left, right } => cli::commands::diff::execute(left, right),
        Commands::Render { target, output } => {
            cli::commands::render::execute(profile, *target, output.as_deref())
        }
        Commands::Status => cli::commands::status::execute(profile),
        Commands::Log {
            author,
            since,
            last,
        } => {
            cli::commands::log::execute(profile, author.as_deref(), since.as_deref(), *last)
        },
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr so rendered artifacts on stdout stay clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
