//! Product-name decomposition command-line runner.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use medname_parser::{
    clean_and_decompose, run_batch, BatchConfig, BatchPaths, Decomposer, VocabularySet,
    DEFAULT_NAME_COLUMN,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FORM_TERMS: &str = "form_terms.txt";
const DEFAULT_DOSE_UNITS: &str = "dose_units.txt";

#[derive(Parser)]
#[command(
    name = "medname",
    version,
    about = "Split pharmaceutical product names into name, dose, pack and form fields"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Form term vocabulary, one token per line.
    #[arg(long, value_name = "PATH", env = "MEDNAME_FORM_TERMS", default_value = DEFAULT_FORM_TERMS, global = true)]
    form_terms: PathBuf,

    /// Dose unit vocabulary, one token per line.
    #[arg(long, value_name = "PATH", env = "MEDNAME_DOSE_UNITS", default_value = DEFAULT_DOSE_UNITS, global = true)]
    dose_units: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Decompose every row of a CSV table.
    Batch {
        /// Input CSV table.
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Column holding raw product names.
        #[arg(long, env = "MEDNAME_NAME_COLUMN", default_value = DEFAULT_NAME_COLUMN)]
        column: String,

        /// Output table (default: parsed_<INPUT stem>.csv next to the input).
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Table of rows needing attention (default: unparsed_<INPUT stem>.csv next to the output).
        #[arg(long, value_name = "PATH")]
        unparsed: Option<PathBuf>,

        /// Write plain UTF-8 without a byte order mark.
        #[arg(long)]
        no_bom: bool,
    },

    /// Decompose names given on the command line and print them as JSON.
    Parse {
        /// Product names.
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let vocab = VocabularySet::load(&cli.form_terms, &cli.dose_units)?;
    let decomposer = Decomposer::from_vocabularies(&vocab)?;

    match cli.command {
        Command::Batch {
            input,
            column,
            output,
            unparsed,
            no_bom,
        } => {
            let mut paths = BatchPaths::for_input(&input);
            if let Some(output) = output {
                paths = paths.with_output(output);
            }
            if let Some(unparsed) = unparsed {
                paths = paths.with_unparsed(unparsed);
            }

            let config = BatchConfig {
                write_bom: !no_bom,
                ..BatchConfig::for_column(column)
            };

            let report = run_batch(&paths, &decomposer, &config)?;
            tracing::info!(
                "{} of {} rows parsed, output saved to {}",
                report.stats.parsed_rows,
                report.stats.total_rows,
                report.output.display()
            );
            if let Some(path) = report.unparsed {
                tracing::info!(
                    "{} rows need attention, see {}",
                    report.stats.unparsed_rows,
                    path.display()
                );
            }
        }
        Command::Parse { names } => {
            for name in &names {
                let (_, parsed) = clean_and_decompose(&decomposer, name);
                println!("{}", serde_json::to_string(&parsed)?);
            }
        }
    }

    Ok(())
}
