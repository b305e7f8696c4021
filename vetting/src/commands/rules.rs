// vetting/src/commands/rules.rs
//
// USE CASE: List the registered rules.

use std::path::PathBuf;

use super::{load, new_table};

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let project = load(&project_dir)?;
    let registry = project.resources.registry();

    println!("\n📜 Rules of '{}' ({} files)", project.config.name, project.rule_files.len());

    let mut table = new_table(["Rule", "Kind", "Depends", "Message"]);
    for rule in registry.iter() {
        let depends = if rule.prerequisites().is_empty() {
            "-".to_string()
        } else {
            rule.prerequisites().join(", ")
        };
        table.add_row(vec![
            rule.name().to_string(),
            rule.kind().to_string(),
            depends,
            rule.message_key().unwrap_or("-").to_string(),
        ]);
    }
    println!("{table}");
    println!("   {} rule(s)", registry.len());

    Ok(())
}
