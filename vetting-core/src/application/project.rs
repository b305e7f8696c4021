// vetting-core/src/application/project.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::application::resources::{ResourcesBuilder, ValidatorResources};
use crate::domain::rules::LogicCatalog;
use crate::error::VettingError;
use crate::infrastructure::config::{ProjectConfig, load_project_config, load_rule_files};
use crate::infrastructure::discovery::RuleDiscovery;

/// A project directory turned into frozen resources.
#[derive(Debug)]
pub struct LoadedProject {
    pub config: ProjectConfig,
    pub rule_files: Vec<PathBuf>,
    pub resources: ValidatorResources,
}

/// Reads the project file, discovers its rule files and merges them in
/// discovery order. Rule `logic` bindings are looked up in `catalog`.
#[instrument(skip(catalog))]
pub fn load_project(project_dir: &Path, catalog: &LogicCatalog) -> Result<LoadedProject, VettingError> {
    let config = load_project_config(project_dir)?;
    let rule_files = RuleDiscovery::discover(&config.resolved_rule_paths(project_dir))?;

    let mut builder = ResourcesBuilder::new();
    for source in load_rule_files(&rule_files, catalog)? {
        builder.merge_source(source)?;
    }
    let resources = builder.build()?;

    info!(
        project = %config.name,
        files = rule_files.len(),
        rules = resources.registry().len(),
        "Project loaded"
    );
    Ok(LoadedProject {
        config,
        rule_files,
        resources,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    const RULES: &str = "global:\n  rules:\n    - { name: required, logic: required }\n";
    const FORMS: &str = "formsets:\n  - forms:\n      - name: signup\n        fields:\n          - { property: email, depends: \"required,email\" }\n";

    #[test]
    fn test_load_project_merges_in_file_order() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("vetting.yaml"), "name: signup\n")?;
        let rules = dir.path().join("rules");
        fs::create_dir_all(&rules)?;
        fs::write(rules.join("00_rules.yml"), RULES)?;
        fs::write(rules.join("10_forms.yml"), FORMS)?;
        fs::write(
            rules.join("05_email.yml"),
            "global:\n  rules:\n    - { name: email, logic: email }\n",
        )?;

        let project = load_project(dir.path(), &LogicCatalog::builtin())?;
        assert_eq!(project.rule_files.len(), 3);
        assert_eq!(project.resources.registry().len(), 2);
        assert!(project.resources.store().form_sets().next().is_some());
        Ok(())
    }

    #[test]
    fn test_load_project_fails_closed() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("vetting.yaml"), "name: signup\n")?;
        let rules = dir.path().join("rules");
        fs::create_dir_all(&rules)?;
        // email is used by the form but never declared
        fs::write(rules.join("00_rules.yml"), RULES)?;
        fs::write(rules.join("10_forms.yml"), FORMS)?;

        let err = load_project(dir.path(), &LogicCatalog::builtin()).unwrap_err();
        assert!(matches!(
            err,
            VettingError::Domain(DomainError::UnknownRule { ref name, .. }) if name == "email"
        ));
        Ok(())
    }
}
