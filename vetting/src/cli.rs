// vetting/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vetting")]
#[command(about = "Declarative, metadata-driven field validation", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ✅ Validates a JSON bean against a form
    Validate(ValidateArgs),

    /// 🔍 Shows the fields a form resolves to for a locale
    Inspect {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Form (group) name
        #[arg(long, short)]
        form: String,

        /// Locale key (ex: "en_US"). Defaults to the project's default locale
        #[arg(long, short)]
        locale: Option<String>,
    },

    /// 📜 Lists the registered rules
    Rules {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Project directory
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Form (group) name
    #[arg(long, short)]
    pub form: String,

    /// Locale key (ex: "en_US"). Defaults to the project's default locale
    #[arg(long, short)]
    pub locale: Option<String>,

    /// JSON file holding the object to validate
    #[arg(long, short)]
    pub bean: PathBuf,

    /// Validate only fields on this page or lower
    #[arg(long)]
    pub page: Option<u32>,

    /// Validate a single field (ex: "firstName", "lines[].qty")
    #[arg(long)]
    pub field: Option<String>,

    /// Report only fields that failed
    #[arg(long, default_value = "false")]
    pub only_failures: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
