// vetting/src/commands/mod.rs

pub mod inspect;
pub mod rules;
pub mod validate;

use anyhow::Context;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

use vetting_core::{LoadedProject, Locale, LogicCatalog, load_project};

/// Loads the project with the built-in logic catalog.
pub(crate) fn load(project_dir: &Path) -> anyhow::Result<LoadedProject> {
    load_project(project_dir, &LogicCatalog::builtin())
        .with_context(|| format!("Failed to load project from {:?}", project_dir))
}

/// Explicit locale first, then the project's default one.
pub(crate) fn pick_locale(requested: Option<&str>, project: &LoadedProject) -> Locale {
    requested
        .map(|key| key.parse().unwrap_or_default())
        .unwrap_or_else(|| project.config.default_locale.clone())
}

pub(crate) fn new_table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}
