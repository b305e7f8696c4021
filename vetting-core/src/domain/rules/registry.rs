// vetting-core/src/domain/rules/registry.rs

use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::graph::GraphSolver;
use crate::domain::rules::definition::RuleDefinition;

/// Named rules available to every form.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<String, RuleDefinition>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: RuleDefinition) -> Result<(), DomainError> {
        if self.rules.contains_key(definition.name()) {
            return Err(DomainError::DuplicateRule(definition.name().to_string()));
        }
        self.rules.insert(definition.name().to_string(), definition);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&RuleDefinition, DomainError> {
        self.rules
            .get(name)
            .ok_or_else(|| DomainError::unknown_rule(name))
    }

    pub fn get(&self, name: &str) -> Option<&RuleDefinition> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every prerequisite must be registered and prerequisite chains must
    /// be acyclic. Returns the rules in prerequisite layers.
    pub(crate) fn check(&self) -> Result<Vec<Vec<String>>, DomainError> {
        for rule in self.rules.values() {
            for prerequisite in rule.prerequisites() {
                if !self.rules.contains_key(prerequisite) {
                    return Err(DomainError::UnknownRule {
                        name: prerequisite.clone(),
                        context: Some(format!("prerequisite of rule '{}'", rule.name())),
                    });
                }
            }
        }

        let graph: BTreeMap<String, Vec<String>> = self
            .rules
            .values()
            .map(|r| (r.name().to_string(), r.prerequisites().to_vec()))
            .collect();
        let layers = GraphSolver::plan_execution(&graph)?;
        debug!(rules = self.rules.len(), layers = layers.len(), "Rule prerequisites checked");
        Ok(layers)
    }
}
