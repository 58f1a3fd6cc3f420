use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vivarium_core::Settings;
use vivarium_lib::kernel::Kernel;
use vivarium_lib::shell;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom settings file path
    #[arg(short, long, default_value = "vivarium.toml")]
    config: String,

    /// Execute a single command and exit
    #[arg(long)]
    once: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(&args.config);
    init_logging(&settings).context("Failed to initialise logging")?;

    let mut kernel =
        Kernel::bootstrap(&settings).context("Failed to boot the vivarium kernel")?;
    shell::run(&mut kernel, &settings.creature_name, args.once.as_deref())
}

fn init_logging(settings: &Settings) -> Result<()> {
    fs::create_dir_all(&settings.log_path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(&settings.log_path).join("vivarium.log"))?;
    let filter =
        EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
