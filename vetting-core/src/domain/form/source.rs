// vetting-core/src/domain/form/source.rs

use std::collections::BTreeMap;

use crate::domain::form::formset::FormSet;
use crate::domain::rules::RuleDefinition;

/// Everything one configuration source contributes: global rule bindings,
/// global constants and locale-qualified formsets.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// Where the source came from (file path, test name...). Used in logs.
    pub origin: String,
    pub rules: Vec<RuleDefinition>,
    pub constants: BTreeMap<String, String>,
    pub form_sets: Vec<FormSet>,
}

impl ConfigSource {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Default::default()
        }
    }

    pub fn with_rule(mut self, rule: RuleDefinition) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_constant(mut self, name: &str, value: &str) -> Self {
        self.constants.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_form_set(mut self, form_set: FormSet) -> Self {
        self.form_sets.push(form_set);
        self
    }
}
