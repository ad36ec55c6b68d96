use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tankopedia::config::{DEFAULT_LANG, DEFAULT_MAPS_FILE, DEFAULT_TANKS_FILE};
use tankopedia::error::ExtractError;
use tankopedia::pipeline::{self, PipelineConfig, Summary};
use tankopedia::registry::Registry;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "tankopedia")]
#[command(about = "Extract Tankopedia data from Blitz game files")]
struct Cli {
    /// Base dir of the unpacked game files
    #[arg(value_name = "APP_DIR", env = "BLITZ_APP_DIR", default_value = ".")]
    app_dir: PathBuf,

    /// File to write the tankopedia to
    #[arg(value_name = "TANKS_FILE", default_value = DEFAULT_TANKS_FILE)]
    tanks: PathBuf,

    /// File to write map names to
    #[arg(value_name = "MAPS_FILE", default_value = DEFAULT_MAPS_FILE)]
    maps: PathBuf,

    /// Do not read or write the maps file
    #[arg(long)]
    no_maps: bool,

    /// Localization language (file name under Data/Strings)
    #[arg(long, default_value = DEFAULT_LANG)]
    lang: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "silent")]
    verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    silent: bool,
}

fn print_summary(config: &PipelineConfig, summary: &Summary) {
    println!(
        "New tankopedia '{}' contains {} tanks",
        config.tanks_path.display(),
        summary.tanks
    );
    println!(
        "New tankopedia '{}' contains {} tank strings",
        config.tanks_path.display(),
        summary.tank_strings
    );
    if let (Some(path), Some(maps)) = (&config.maps_path, summary.maps) {
        println!("New maps file '{}' contains {} maps", path.display(), maps);
    }
    println!(
        "Nations scanned: {} (missing: {}), vehicles: {}, skipped: {}",
        summary.nations_scanned,
        summary.nations_missing,
        summary.vehicles_extracted,
        summary.records_skipped
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.silent {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let config = PipelineConfig {
        app_dir: cli.app_dir,
        tanks_path: cli.tanks,
        maps_path: (!cli.no_maps).then_some(cli.maps),
        lang: cli.lang,
    };

    match pipeline::run(&config, &Registry::blitz()) {
        Ok(summary) => {
            if !cli.silent {
                print_summary(&config, &summary);
            }
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            let code = e.downcast_ref::<ExtractError>().map_or(1, ExtractError::exit_code);
            ExitCode::from(code)
        }
    }
}
