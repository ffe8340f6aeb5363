//! Rulemap CLI binary entry point.
//! Scans the given directory, writes the report, and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use rulemap::cli::Cli;
use rulemap::{config, output, report, scan, utils};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rulemap=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Updated by `run` once the config is resolved.
    let mut color = utils::use_colors(true);
    if let Err(err) = run(&cli, &mut color) {
        eprintln!("{} {:#}", utils::error_prefix(color), err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, color: &mut bool) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let no_color = std::env::var_os("NO_COLOR").is_some();
    let eff = config::resolve_effective(&cwd, no_color)?;
    *color = eff.color;
    debug!(?eff, "configuration resolved");

    let agg = scan::run_scan(&cli.directory, eff.color)?;
    let path = report::write_report(&agg, &eff.output_dir, &eff.prefix)?;

    let summary = agg.summary(path);
    output::print_summary(&summary, eff.color);
    info!(summary = %output::compose_summary_json(&summary), "run complete");
    Ok(())
}
