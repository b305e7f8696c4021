// vetting/src/commands/validate.rs
//
// USE CASE: Validate a JSON bean against a form.

use anyhow::Context as _;
use comfy_table::{Attribute, Cell, Color, Table};
use std::fs;
use std::sync::Arc;
use tracing::debug;

use vetting_core::{Context, ResultAggregate, ValidationEngine, ValidationOptions};

use super::{load, new_table, pick_locale};
use crate::cli::{OutputFormat, ValidateArgs};

/// Returns whether every recorded outcome passed.
pub fn execute(args: ValidateArgs) -> anyhow::Result<bool> {
    let start = std::time::Instant::now();
    let verbose = args.format == OutputFormat::Table;

    if verbose {
        println!("⚙️  Loading configuration...");
    }
    let project = load(&args.project_dir)?;
    let locale = pick_locale(args.locale.as_deref(), &project);
    if verbose {
        println!("   Project: {} (v{})", project.config.name, project.config.version);
        println!("   Form: {} [{}]", args.form, locale);
    }

    let raw = fs::read_to_string(&args.bean).with_context(|| format!("Failed to read bean {:?}", args.bean))?;
    let bean: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("Bean {:?} is not valid JSON", args.bean))?;

    let options = ValidationOptions {
        page: args.page,
        field: args.field,
        only_failures: args.only_failures,
    };
    let engine = ValidationEngine::new(Arc::new(project.resources));
    let results = engine.validate_with(&bean, &args.form, Some(&locale), &Context::new(), &options)?;
    debug!(fields = results.fields().len(), "Validation finished");

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Table => {
            println!("{}", outcome_table(&results));
            let failed = results.failures().count();
            if failed == 0 {
                println!("\n✨ VALID! {} fields checked in {:.2?}", results.fields().len(), start.elapsed());
            } else {
                eprintln!("\n❌ INVALID. {} rule(s) failed.", failed);
            }
        }
    }

    Ok(results.is_valid())
}

fn outcome_table(results: &ResultAggregate) -> Table {
    let mut table = new_table(["Field", "Rule", "Result", "Produced"]);
    for field in results.fields() {
        if field.outcomes().is_empty() {
            table.add_row(vec![
                Cell::new(field.key()),
                Cell::new("-"),
                Cell::new("-").add_attribute(Attribute::Dim),
                Cell::new(""),
            ]);
            continue;
        }
        for outcome in field.outcomes() {
            let verdict = if outcome.passed {
                Cell::new("PASSED").fg(Color::Green)
            } else {
                Cell::new("FAILED").fg(Color::Red).add_attribute(Attribute::Bold)
            };
            let produced = outcome.produced.as_ref().map(|v| v.to_string()).unwrap_or_default();
            table.add_row(vec![
                Cell::new(field.key()),
                Cell::new(&outcome.rule),
                verdict,
                Cell::new(produced),
            ]);
        }
    }
    table
}
