use std::path::PathBuf;

use clap::{Parser, Subcommand};
use titanic_predict::config::{PredictConfig, DEFAULT_INPUT, DEFAULT_MODELFILE};
use titanic_predict::predict;

#[derive(Parser)]
#[command(name = "titanic-predict")]
#[command(about = "Label passengers with a persisted survival model", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a model artifact and predict survival for every passenger
    Predict {
        /// Passenger table (.csv, .json or .parquet)
        #[arg(long, env = "TITANIC_INPUT", default_value = DEFAULT_INPUT)]
        input: PathBuf,
        /// Serialized model artifact
        #[arg(long, env = "TITANIC_MODELFILE", default_value = DEFAULT_MODELFILE)]
        modelfile: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Predict { input, modelfile } => {
            let config = PredictConfig { input, modelfile };
            let stdout = std::io::stdout();
            predict::run(&config, &mut stdout.lock())?;
        }
    }
    Ok(())
}
