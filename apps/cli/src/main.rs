//! `mcm`: install the media of a modpack manifest

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dialoguer::Input;
use modpack_installer::{
    format_size, load_manifest, CompositeProgressReporter, ConsoleProgressReporter, InstallConfig,
    InstallError, Installer, IntoProgressCallback, Manifest, MediaKind, Preparation, Side,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod progress;

use progress::BarReporter;

#[derive(Debug, Parser)]
#[command(name = "mcm", version, about = "Install the mods, resource packs and shader packs of a modpack")]
struct Cli {
    /// Path to the modpack manifest (JSON)
    manifest: PathBuf,

    /// Minecraft directory to install into
    #[arg(short = 'p', long, env = "MCM_INSTALL_PATH", default_value = ".")]
    install_path: PathBuf,

    /// Side to install for (client or server)
    #[arg(short, long, env = "MCM_SIDE", default_value = "client")]
    side: Side,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Request timeout in seconds; requests wait indefinitely when unset
    #[arg(long, env = "MCM_TIMEOUT")]
    timeout: Option<u64>,

    /// More output (-v for info logs and per-file lines, -vv for debug logs)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Environment variables from .env feed the clap `env` fallbacks
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<InstallError>() {
                Some(install_error) => eprintln!("{}", install_error.detailed_report()),
                None => eprintln!("Error: {:#}", error),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    // Warnings already reach the console through the progress reporter
    let default_level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let manifest = load_manifest(&cli.manifest).await?;
    print_modpack_info(&manifest);

    let mut config = InstallConfig::new(&cli.install_path, cli.side);
    if let Some(seconds) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    debug!("Installing into {} for the {} side", cli.install_path.display(), cli.side);

    let installer = Installer::new(config)?;

    let listing = ConsoleProgressReporter::new(false).into_callback();
    let preparation = installer.prepare(&manifest, Some(listing)).await?;
    print_totals(&preparation);

    if !cli.yes && !confirm()? {
        println!("Cancelling...");
        return Ok(());
    }

    let reporter = CompositeProgressReporter::new()
        .add_reporter(BarReporter::new(cli.verbose > 0)?)
        .add_reporter(ConsoleProgressReporter::new(false));

    let summary = installer.download(&preparation, Some(reporter.into_callback())).await?;

    info!(
        "Installed {} files ({}) in {:.1}s",
        summary.metrics.downloaded_files,
        format_size(summary.metrics.downloaded_bytes),
        summary.duration.as_secs_f64()
    );

    Ok(())
}

fn print_modpack_info(manifest: &Manifest) {
    println!("Modpack version: {}", manifest.minecraft.version);
    println!("Mod loader: {}", manifest.minecraft.loader);
    println!("Mod loader version: {}", manifest.minecraft.loader_version);
}

fn print_totals(preparation: &Preparation) {
    let counts: Vec<String> = MediaKind::ALL
        .iter()
        .map(|kind| format!("{} {}", preparation.count_of(*kind), kind.dir_name()))
        .collect();

    println!("\n{}", counts.join(", "));
    println!("Total file size: {}", format_size(preparation.total_size));
}

fn confirm() -> Result<bool> {
    let answer = Input::<String>::new()
        .with_prompt("Continue? (Y/n)")
        .allow_empty(true)
        .interact_text()
        .context("Could not read the confirmation; pass --yes to skip it")?;

    Ok(accepts(&answer))
}

/// Only an empty answer or `y` continues
fn accepts(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "y")
}
