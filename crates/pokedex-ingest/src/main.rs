//! Pokedex Ingest - PokéAPI extraction tool

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use pokedex_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use pokedex_ingest::{ExtractConfig, ExtractionPipeline, RecordClass};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "pokedex-ingest")]
#[command(author, version, about = "PokéAPI extraction tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract one or all record classes into JSON artifacts
    Extract {
        /// Record class to extract
        #[arg(short, long, value_enum, default_value_t = ClassArg::All)]
        class: ClassArg,

        /// Output directory
        #[arg(short, long, env = "EXTRACT_OUTPUT_DIR")]
        output: Option<PathBuf>,

        /// API root URL
        #[arg(long, env = "POKEAPI_BASE_URL")]
        base_url: Option<String>,

        /// Concurrent detail fetches per page
        #[arg(long)]
        concurrency: Option<usize>,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// List supported record classes and their catalog endpoints
    Classes,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ClassArg {
    Pokemon,
    Type,
    Move,
    Ability,
    Item,
    All,
}

impl ClassArg {
    fn classes(self) -> Vec<RecordClass> {
        match self {
            ClassArg::Pokemon => vec![RecordClass::Pokemon],
            ClassArg::Type => vec![RecordClass::Type],
            ClassArg::Move => vec![RecordClass::Move],
            ClassArg::Ability => vec![RecordClass::Ability],
            ClassArg::Item => vec![RecordClass::Item],
            ClassArg::All => RecordClass::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .output(LogOutput::Both)
        .log_dir("./logs")
        .log_file_prefix("extraction")
        .filter_directives("hyper=info,reqwest=info")
        .build();

    // Environment variables take precedence
    let log_config = log_config.overlay_env()?;
    let _log_guard = init_logging(&log_config)?;

    match cli.command {
        Command::Classes => {
            let config = ExtractConfig::from_env()?;
            for class in RecordClass::ALL {
                println!("{:<8} {}", class, config.catalog_url(class));
            }
            Ok(())
        },
        Command::Extract {
            class,
            output,
            base_url,
            concurrency,
            no_progress,
        } => {
            let mut config = ExtractConfig::from_env()?.with_progress(!no_progress);
            if let Some(output) = output {
                config = config.with_output_dir(output);
            }
            if let Some(base_url) = base_url {
                config = config.with_base_url(base_url);
            }
            if let Some(concurrency) = concurrency {
                config = config.with_concurrency(concurrency);
            }

            extract(config, &class.classes()).await
        },
    }
}

async fn extract(config: ExtractConfig, classes: &[RecordClass]) -> Result<()> {
    info!(
        base_url = %config.base_url,
        output_dir = %config.output_dir.display(),
        classes = ?classes,
        "Starting extraction"
    );

    let pipeline = ExtractionPipeline::with_http(config)?;
    let results = pipeline.run_all(classes).await;

    let mut failed = Vec::new();
    for (class, result) in results {
        match result {
            Ok(report) => println!("✓ {}", report.summary()),
            Err(e) => {
                println!("✗ {}: {}", class, e);
                failed.push(class);
            },
        }
    }

    if failed.is_empty() {
        info!("Extraction complete");
        Ok(())
    } else {
        error!(failed = ?failed, "Extraction failed for {} record class(es)", failed.len());
        anyhow::bail!("extraction failed for: {:?}", failed)
    }
}
