// vetting/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use miette::Diagnostic;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use vetting_core::{DomainError, VettingError};

fn main() -> ExitCode {
    // RUST_LOG=debug vetting validate ... to see the engine's spans
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        // --- USE CASE: VALIDATE A BEAN ---
        Commands::Validate(args) => commands::validate::execute(args),

        // --- USE CASE: INSPECT A FORM ---
        Commands::Inspect {
            project_dir,
            form,
            locale,
        } => commands::inspect::execute(project_dir, form, locale).map(|()| true),

        // --- USE CASE: LIST RULES ---
        Commands::Rules { project_dir } => commands::rules::execute(project_dir).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        // Failed outcomes (CI friendly)
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            report(e);
            ExitCode::from(2)
        }
    }
}

/// Library errors carry miette diagnostics; render them with their code.
fn report(err: anyhow::Error) {
    let headline = err.to_string();
    match err.downcast::<VettingError>() {
        Ok(VettingError::Domain(e)) => diagnose(&headline, title_of(&e), e),
        Ok(VettingError::Infrastructure(e)) => diagnose(&headline, CONFIG_TITLE, e),
        Ok(other) => eprintln!("💥 {}", other),
        Err(err) => match err.downcast::<DomainError>() {
            Ok(e) => diagnose(&headline, title_of(&e), e),
            Err(err) => eprintln!("💥 {:#}", err),
        },
    }
}

const CONFIG_TITLE: &str = "💥 CONFIGURATION ERROR";

fn title_of(err: &DomainError) -> &'static str {
    if matches!(err, DomainError::ValidationFault { .. }) {
        "💥 VALIDATION FAULT"
    } else {
        CONFIG_TITLE
    }
}

fn diagnose<D: Diagnostic + Send + Sync + 'static>(headline: &str, title: &str, err: D) {
    eprintln!("\n{}", title);
    // Context added by the command (file, project dir)
    if headline != err.to_string() {
        eprintln!("   {}", headline);
    }
    eprintln!("{:?}", miette::Report::new(err));
}
