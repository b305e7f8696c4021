// vetting-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::locale::Locale;
use crate::infrastructure::error::InfrastructureError;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Rule files or directories, relative to the project directory.
    #[serde(rename = "rule-paths", default = "default_rule_paths")]
    pub rule_paths: Vec<String>,

    #[serde(rename = "default-locale", default)]
    pub default_locale: Locale,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_rule_paths() -> Vec<String> {
    vec!["rules".to_string()]
}

impl ProjectConfig {
    pub fn resolved_rule_paths(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.rule_paths
            .iter()
            .map(|p| {
                let path = Path::new(p);
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    project_dir.join(path)
                }
            })
            .collect()
    }
}

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)?;

    if config.name.trim().is_empty() {
        return Err(InfrastructureError::ConfigError(format!(
            "Project name cannot be empty in {:?}",
            config_path
        )));
    }

    // Layering: VETTING_DEFAULT_LOCALE=fr_FR vetting validate ...
    apply_env_overrides(&mut config);

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    let candidates = ["vetting_project_conf.yaml", "vetting.yaml"];
    for filename in candidates {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, candidates
    )))
}

fn apply_env_overrides(config: &mut ProjectConfig) {
    apply_overrides(
        config,
        std::env::var("VETTING_DEFAULT_LOCALE").ok(),
        std::env::var("VETTING_RULE_PATHS").ok(),
    );
}

fn apply_overrides(config: &mut ProjectConfig, locale: Option<String>, rule_paths: Option<String>) {
    if let Some(val) = locale {
        let locale: Locale = val.parse().unwrap_or_default();
        info!(old = %config.default_locale, new = %locale, "Overriding default locale via ENV");
        config.default_locale = locale;
    }
    if let Some(val) = rule_paths {
        let paths: Vec<String> = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        info!(old = ?config.rule_paths, new = ?paths, "Overriding rule paths via ENV");
        config.rule_paths = paths;
    }
}
