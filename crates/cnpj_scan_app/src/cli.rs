use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::platform::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "cnpj-scan")]
#[command(about = "Estimate the impact of alphanumeric CNPJ on a code base", long_about = None)]
pub struct Cli {
    /// Analysis server base URL (overrides the config file and CNPJ_SCAN_SERVER)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File, global = true)]
    pub log: LogDestination,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full wizard: pre-analysis, simulated progress, results
    Analyze {
        /// Directory to analyse; prompted for when omitted
        dir: Option<String>,
        /// Save the generated spreadsheet into this directory
        #[arg(long)]
        download: Option<PathBuf>,
    },
    /// Print the server's directory summary, language chart and insights
    PreAnalyze {
        dir: Option<String>,
    },
    /// Count files, lines and method declarations locally
    Estimate {
        dir: PathBuf,
    },
    /// Check a CNPJ's length and check digits, optionally against its headquarters
    Validate {
        cnpj: String,
        #[arg(long)]
        matriz: Option<String>,
    },
    /// Look a CNPJ up in a SQLite company registry
    Lookup {
        #[arg(long)]
        db: PathBuf,
        cnpj: String,
    },
}
