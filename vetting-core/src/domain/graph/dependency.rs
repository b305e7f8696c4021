// vetting-core/src/domain/graph/dependency.rs

use std::collections::BTreeMap;

use crate::domain::error::DomainError;
use crate::domain::rules::{RuleDefinition, RuleRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleState {
    Pending,
    Running,
    Passed,
    Failed,
    Skipped,
}

impl RuleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RuleState::Passed | RuleState::Failed | RuleState::Skipped)
    }
}

/// Tracks the state of every rule for one field (or one element of an
/// indexed field). Prerequisites are driven before the rule that needs them
/// and each rule runs at most once.
pub struct DependencyResolver<'r> {
    registry: &'r RuleRegistry,
    states: BTreeMap<String, RuleState>,
}

impl<'r> DependencyResolver<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            states: BTreeMap::new(),
        }
    }

    pub fn state(&self, rule: &str) -> RuleState {
        self.states.get(rule).copied().unwrap_or(RuleState::Pending)
    }

    /// Drives `rule` to a terminal state.
    ///
    /// `run` invokes the rule logic (and records its outcome); it returns
    /// whether the rule passed. It is never called for a rule whose
    /// prerequisites did not all pass: that rule becomes SKIPPED.
    pub fn ensure<F>(&mut self, rule: &str, run: &mut F) -> Result<RuleState, DomainError>
    where
        F: FnMut(&'r RuleDefinition) -> Result<bool, DomainError>,
    {
        match self.state(rule) {
            RuleState::Pending => {}
            RuleState::Running => {
                return Err(DomainError::CircularDependency(format!(
                    "rule '{}' is its own prerequisite",
                    rule
                )));
            }
            done => return Ok(done),
        }

        let definition = self.registry.resolve(rule)?;
        self.states.insert(rule.to_string(), RuleState::Running);

        for prerequisite in definition.prerequisites() {
            if self.ensure(prerequisite, run)? != RuleState::Passed {
                self.states.insert(rule.to_string(), RuleState::Skipped);
                return Ok(RuleState::Skipped);
            }
        }

        let state = if run(definition)? {
            RuleState::Passed
        } else {
            RuleState::Failed
        };
        self.states.insert(rule.to_string(), state);
        Ok(state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::rules::RuleLogic;
    use anyhow::Result;

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        let noop = || RuleLogic::predicate(|_| Ok(true));
        registry.register(RuleDefinition::new("required", noop())).unwrap();
        registry
            .register(RuleDefinition::new("int", noop()).depends_on("required"))
            .unwrap();
        registry
            .register(RuleDefinition::new("positive", noop()).depends_on("int"))
            .unwrap();
        registry
    }

    #[test]
    fn test_prerequisites_run_first_and_once() -> Result<()> {
        let registry = registry();
        let mut resolver = DependencyResolver::new(&registry);
        let mut ran = Vec::new();
        let mut run = |def: &RuleDefinition| {
            ran.push(def.name().to_string());
            Ok(true)
        };

        assert_eq!(resolver.ensure("positive", &mut run)?, RuleState::Passed);
        assert_eq!(resolver.ensure("int", &mut run)?, RuleState::Passed);
        assert_eq!(ran, vec!["required", "int", "positive"]);
        Ok(())
    }

    #[test]
    fn test_failed_prerequisite_skips_dependents() -> Result<()> {
        let registry = registry();
        let mut resolver = DependencyResolver::new(&registry);
        let mut ran = Vec::new();
        let mut run = |def: &RuleDefinition| {
            ran.push(def.name().to_string());
            Ok(def.name() != "required")
        };

        assert_eq!(resolver.ensure("positive", &mut run)?, RuleState::Skipped);
        assert_eq!(resolver.state("required"), RuleState::Failed);
        assert_eq!(resolver.state("int"), RuleState::Skipped);
        assert_eq!(ran, vec!["required"]);
        Ok(())
    }

    #[test]
    fn test_unknown_rule() {
        let registry = registry();
        let mut resolver = DependencyResolver::new(&registry);
        let err = resolver.ensure("ghost", &mut |_| Ok(true)).unwrap_err();
        assert!(matches!(err, DomainError::UnknownRule { ref name, .. } if name == "ghost"));
    }
}
