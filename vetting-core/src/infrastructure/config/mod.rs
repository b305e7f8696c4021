// vetting-core/src/infrastructure/config/mod.rs

pub mod project;
pub mod rules_file;

pub use project::{ProjectConfig, load_project_config};
pub use rules_file::{RuleFile, load_rule_file, load_rule_files, parse_rule_file};
