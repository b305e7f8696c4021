// vetting-core/src/application/resources.rs

use tracing::{debug, info, instrument};

use crate::domain::error::DomainError;
use crate::domain::form::{ConfigSource, FormSet, ResolvedForm, RuleSetStore};
use crate::domain::locale::Locale;
use crate::domain::rules::builtin::standard_rules;
use crate::domain::rules::{RuleDefinition, RuleRegistry};

/// Load phase: the single writer that assembles rules and forms.
///
/// Consumed by [`ResourcesBuilder::build`], which runs every load-time check.
/// Nothing can be validated until it succeeds.
#[derive(Debug, Default)]
pub struct ResourcesBuilder {
    registry: RuleRegistry,
    store: RuleSetStore,
}

impl ResourcesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every built-in leaf under its own name.
    pub fn with_standard_rules(mut self) -> Result<Self, DomainError> {
        for rule in standard_rules() {
            self.registry.register(rule)?;
        }
        Ok(self)
    }

    pub fn register_rule(&mut self, rule: RuleDefinition) -> Result<&mut Self, DomainError> {
        self.registry.register(rule)?;
        Ok(self)
    }

    pub fn rule(mut self, rule: RuleDefinition) -> Result<Self, DomainError> {
        self.registry.register(rule)?;
        Ok(self)
    }

    pub fn add_global_constant(&mut self, name: &str, value: &str) -> &mut Self {
        self.store.add_global_constant(name, value);
        self
    }

    pub fn merge_form_sets<I>(&mut self, form_sets: I) -> &mut Self
    where
        I: IntoIterator<Item = FormSet>,
    {
        self.store.merge(form_sets);
        self
    }

    /// Adds one configuration source. Sources merge in call order: a later
    /// source replaces fields an earlier one declared for the same form.
    pub fn merge_source(&mut self, source: ConfigSource) -> Result<&mut Self, DomainError> {
        debug!(
            origin = %source.origin,
            rules = source.rules.len(),
            formsets = source.form_sets.len(),
            "Merging configuration source"
        );
        for rule in source.rules {
            self.registry.register(rule)?;
        }
        for (name, value) in &source.constants {
            self.store.add_global_constant(name, value);
        }
        self.store.merge(source.form_sets);
        Ok(self)
    }

    pub fn source(mut self, source: ConfigSource) -> Result<Self, DomainError> {
        self.merge_source(source)?;
        Ok(self)
    }

    /// Freezes the configuration after constant substitution, reference
    /// checks, and cycle checks on rule prerequisites and form inheritance.
    #[instrument(skip(self))]
    pub fn build(mut self) -> Result<ValidatorResources, DomainError> {
        self.registry.check()?;
        self.store.process()?;

        for (form, field) in self.store.all_fields() {
            for rule in field.depends() {
                if !self.registry.contains(rule) {
                    return Err(DomainError::UnknownRule {
                        name: rule.clone(),
                        context: Some(format!("field '{}' of form '{}'", field.key(), form)),
                    });
                }
            }
        }

        info!(
            rules = self.registry.len(),
            formsets = self.store.form_sets().count(),
            "Validator resources ready"
        );
        Ok(ValidatorResources {
            registry: self.registry,
            store: self.store,
        })
    }
}

/// Frozen, read-only configuration. Share it across threads with `Arc`.
#[derive(Debug, Clone)]
pub struct ValidatorResources {
    registry: RuleRegistry,
    store: RuleSetStore,
}

impl ValidatorResources {
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn store(&self) -> &RuleSetStore {
        &self.store
    }

    pub fn resolve_form(&self, locale: &Locale, form: &str) -> Result<ResolvedForm<'_>, DomainError> {
        self.store.resolve_group(locale, form)
    }
}
