//! spectool — spectral analysis toolkit and matrix pipeline runner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use spectool::config::loader::load_config;
use spectool::config::ToolkitConfig;
use spectool::fileio::{read_observations, write_observations};
use spectool::logging::init_logging;
use spectool::pipeline::PipelineRunner;
use spectool::spectral::ContinuumMethod;

#[derive(Parser)]
#[command(name = "spectool")]
#[command(about = "Spectral analysis toolkit with a matrix pipeline runner", long_about = None)]
struct Cli {
    /// Path to the TOML configuration. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline matrix and print the summary
    Run {
        /// Emit the run summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load and validate a configuration file
    Validate,
    /// Apply a continuum correction to an observations file
    Correct {
        /// Input observations file
        input: PathBuf,

        /// Output file for the corrected frame
        output: PathBuf,

        /// Continuum estimator
        #[arg(long, value_enum, default_value_t = Method::Linear)]
        method: Method,

        /// Wavelength nodes for the linear estimator
        #[arg(long, num_args = 2..)]
        nodes: Option<Vec<f64>>,

        /// Anchor wavelengths for the horgan estimator
        #[arg(long, num_args = 3)]
        anchors: Option<Vec<f64>>,

        /// Window half-width around each horgan anchor
        #[arg(long, default_value_t = 10.0)]
        window: f64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Linear,
    Regression,
    Horgan,
}

fn load_or_default(path: &Option<PathBuf>) -> Result<ToolkitConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(ToolkitConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate => {
            let path = cli
                .config
                .ok_or("validate requires --config <FILE>")?;
            match load_config(&path) {
                Ok(_) => println!("{}: configuration OK", path.display()),
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Run { json } => {
            let config = load_or_default(&cli.config)?;
            init_logging(&config.logging)?;
            tracing::info!("spectool v0.1.0 starting");

            let runner = PipelineRunner::new(config.pipeline);
            let cancel = runner.cancellation();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received, cancelling run");
                    cancel.trigger();
                }
            });

            let summary = runner.run().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary);
            }
            if !summary.is_success() {
                std::process::exit(1);
            }
        }

        Commands::Correct {
            input,
            output,
            method,
            nodes,
            anchors,
            window,
        } => {
            let config = load_or_default(&cli.config)?;
            init_logging(&config.logging)?;

            let method = match method {
                Method::Linear => ContinuumMethod::Linear { nodes },
                Method::Regression => ContinuumMethod::Regression,
                Method::Horgan => {
                    let anchors = anchors.ok_or("horgan requires --anchors <A> <B> <C>")?;
                    ContinuumMethod::Horgan {
                        anchors: [anchors[0], anchors[1], anchors[2]],
                        window,
                    }
                }
            };

            let delimiter = config.analysis.delimiter;
            let frame = read_observations(&input, delimiter)?
                .with_tolerance(config.analysis.tolerance);
            tracing::info!(
                observations = frame.len(),
                wavelengths = frame.wavelengths().len(),
                "observations loaded"
            );

            let corrected = frame.continuum_correct(&method)?;
            write_observations(&corrected, &output, delimiter)?;
            tracing::info!(output = %output.display(), "corrected frame written");
        }
    }

    Ok(())
}
