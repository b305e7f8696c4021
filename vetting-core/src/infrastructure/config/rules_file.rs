// vetting-core/src/infrastructure/config/rules_file.rs

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};
use validator::Validate;

use crate::domain::form::{Arg, ConfigSource, FieldSpec, Form, FormSet, parse_depends};
use crate::domain::locale::Locale;
use crate::domain::rules::{LogicCatalog, RuleDefinition};
use crate::error::VettingError;
use crate::infrastructure::error::InfrastructureError;

// --- FILE STRUCTS ---

#[derive(Debug, Deserialize, Validate, Default)]
pub struct RuleFile {
    #[validate(nested)]
    #[serde(default)]
    pub global: GlobalSection,

    #[validate(nested)]
    #[serde(default)]
    pub formsets: Vec<FormSetDef>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct GlobalSection {
    #[serde(default)]
    pub constants: BTreeMap<String, String>,

    #[validate(nested)]
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RuleDef {
    #[validate(length(min = 1, message = "Rule name cannot be empty"))]
    pub name: String,

    /// Name of the logic binding in the catalog.
    #[validate(length(min = 1, message = "Logic binding cannot be empty"))]
    pub logic: String,

    #[serde(default)]
    pub parameters: Vec<String>,

    #[serde(default)]
    pub depends: Vec<String>,

    #[serde(default)]
    pub msg: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FormSetDef {
    /// Omitted for the default tier.
    #[serde(default)]
    pub locale: Locale,

    #[serde(default)]
    pub constants: BTreeMap<String, String>,

    #[validate(nested)]
    #[serde(default)]
    pub forms: Vec<FormDef>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FormDef {
    #[validate(length(min = 1, message = "Form name cannot be empty"))]
    pub name: String,

    #[serde(default)]
    pub extends: Option<String>,

    #[validate(nested)]
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDef {
    #[validate(length(min = 1, message = "Field property cannot be empty"))]
    pub property: String,

    /// Comma separated rule names.
    #[serde(default)]
    pub depends: String,

    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub indexed_list_property: Option<String>,

    #[serde(default)]
    pub args: Vec<Arg>,

    /// Scalars; numbers and booleans are kept as their text.
    #[serde(default)]
    pub vars: BTreeMap<String, serde_yaml::Value>,

    #[serde(default)]
    pub msgs: BTreeMap<String, String>,
}

// --- CONVERSION ---

impl RuleFile {
    /// Binds every rule to its catalog logic and builds the domain source.
    pub fn into_source(self, origin: &str, catalog: &LogicCatalog) -> Result<ConfigSource, VettingError> {
        self.validate().map_err(|e| InfrastructureError::InvalidDocument {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;

        let mut source = ConfigSource::new(origin);
        source.constants = self.global.constants;

        for def in self.global.rules {
            let logic = catalog
                .get(&def.logic)
                .cloned()
                .ok_or_else(|| InfrastructureError::UnknownLogic {
                    path: origin.to_string(),
                    rule: def.name.clone(),
                    logic: def.logic.clone(),
                })?;
            let mut rule = RuleDefinition::new(def.name, logic)
                .with_parameters(def.parameters)
                .with_prerequisites(def.depends);
            if let Some(msg) = def.msg {
                rule = rule.with_message(msg);
            }
            source.rules.push(rule);
        }

        for set_def in self.formsets {
            let mut form_set = FormSet::new(set_def.locale);
            for (name, value) in set_def.constants {
                form_set.add_constant(name, value);
            }
            for form_def in set_def.forms {
                form_set.add_form(convert_form(origin, form_def)?);
            }
            source.form_sets.push(form_set);
        }

        Ok(source)
    }
}

fn convert_form(origin: &str, def: FormDef) -> Result<Form, VettingError> {
    let mut form = Form::new(def.name);
    if let Some(parent) = def.extends {
        form = form.extending(parent);
    }
    for field_def in def.fields {
        form.add_field(convert_field(origin, field_def)?);
    }
    Ok(form)
}

fn convert_field(origin: &str, def: FieldDef) -> Result<FieldSpec, VettingError> {
    let mut field = FieldSpec::new(def.property).with_rules(parse_depends(&def.depends)).with_page(def.page);
    if let Some(list) = def.indexed_list_property {
        field = field.indexed_by(list);
    }
    for (name, value) in &def.vars {
        let text = scalar_text(value).ok_or_else(|| InfrastructureError::InvalidDocument {
            path: origin.to_string(),
            reason: format!("var '{}' of field '{}' must be a scalar", name, field.key()),
        })?;
        field = field.with_var(name, &text);
    }
    for (rule, key) in &def.msgs {
        field.add_msg(rule, key);
    }
    for arg in def.args {
        field.add_arg(arg)?;
    }
    Ok(field)
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// --- LOADERS ---

pub fn parse_rule_file(content: &str, origin: &str, catalog: &LogicCatalog) -> Result<ConfigSource, VettingError> {
    let file: RuleFile = serde_yaml::from_str(content).map_err(InfrastructureError::from)?;
    file.into_source(origin, catalog)
}

#[instrument(skip(catalog))]
pub fn load_rule_file(path: &Path, catalog: &LogicCatalog) -> Result<ConfigSource, VettingError> {
    let content = fs::read_to_string(path)?;
    let source = parse_rule_file(&content, &path.display().to_string(), catalog)?;
    debug!(
        rules = source.rules.len(),
        formsets = source.form_sets.len(),
        "Rule file loaded"
    );
    Ok(source)
}

/// Loads several files; the returned sources keep the given order, which is
/// the merge order.
pub fn load_rule_files<P: AsRef<Path>>(paths: &[P], catalog: &LogicCatalog) -> Result<Vec<ConfigSource>, VettingError> {
    paths
        .iter()
        .map(|p| load_rule_file(p.as_ref(), catalog))
        .collect()
}
