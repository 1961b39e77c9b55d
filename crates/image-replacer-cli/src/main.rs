use clap::{Parser, Subcommand};
use image_replacer_core::{logging, Config, ImageReplacer, LogLevel};
use log::{info, LevelFilter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image-replacer")]
#[command(about = "Replace images with their reference versions, matched by name")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match target images to reference images and overwrite them
    Replace {
        /// Directory holding the reference images (searched recursively)
        reference: Option<PathBuf>,

        /// Directory whose subfolders hold the images to replace
        target: Option<PathBuf>,

        /// Only show what would be done
        #[arg(long)]
        dry_run: bool,

        /// Overwrite targets without keeping a backup copy
        #[arg(long)]
        no_backup: bool,

        /// Minimum similarity ratio for fuzzy matches (0.0-1.0)
        #[arg(long)]
        fuzzy_cutoff: Option<f64>,

        /// Verbosity level
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write logs to rotating files in this directory instead of stderr
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Also write the run report as JSON
        #[arg(long)]
        json_report: Option<PathBuf>,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "image-replacer.json")]
        path: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Replace {
            reference,
            target,
            dry_run,
            no_backup,
            fuzzy_cutoff,
            verbose,
            config,
            log_dir,
            json_report,
        } => {
            // Set up configuration
            let mut config = if let Some(config_path) = config {
                Config::from_file(&config_path)?
            } else {
                Config::default()
            };

            // Override config with command line arguments
            if let Some(reference) = reference {
                config.reference_dir = reference;
            }
            if let Some(target) = target {
                config.target_dir = target;
            }
            if let Some(cutoff) = fuzzy_cutoff {
                config.fuzzy_cutoff = cutoff;
            }
            config.dry_run |= dry_run;
            config.make_backup &= !no_backup;

            // Set log level based on verbosity
            match verbose {
                0 => {}
                1 => config.log_level = LogLevel::Debug,
                _ => config.log_level = LogLevel::Trace,
            }

            init_logging(log_dir, config.log_level)?;

            let replacer = ImageReplacer::new(config)?;

            info!("Starting image replacement...");
            let report = replacer.run()?;
            info!("Image replacement complete");

            if let Some(path) = json_report {
                let file = std::fs::File::create(&path)?;
                serde_json::to_writer_pretty(file, &report)?;
                println!("Run report written to: {}", path.display());
            }

            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

fn init_logging(log_dir: Option<PathBuf>, level: LogLevel) -> Result<(), anyhow::Error> {
    let level = LevelFilter::from(level);
    match log_dir {
        Some(dir) => logging::init_logger(&dir, level)
            .map_err(|e| anyhow::anyhow!("Failed to initialize file logging: {}", e)),
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_env(logging::LOG_LEVEL_ENV)
                .init();
            Ok(())
        }
    }
}
