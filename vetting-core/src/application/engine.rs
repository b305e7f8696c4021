// vetting-core/src/application/engine.rs

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::application::resources::ValidatorResources;
use crate::domain::error::DomainError;
use crate::domain::form::FieldSpec;
use crate::domain::graph::{DependencyResolver, RuleState};
use crate::domain::locale::Locale;
use crate::domain::results::{ResultAggregate, ValidationOutcome};
use crate::domain::rules::{Context, RuleCall, RuleDefinition, RuleFault, Verdict};
use crate::domain::value::FieldValue;
use crate::ports::bean::{Bean, read_property};

/// Narrows one run.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Only fields declared on this page or an earlier one. `None` runs all.
    pub page: Option<u32>,
    /// Only the field with this key.
    pub field: Option<String>,
    /// Record failed outcomes only.
    pub only_failures: bool,
}

impl ValidationOptions {
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn only_field(mut self, key: impl Into<String>) -> Self {
        self.field = Some(key.into());
        self
    }

    pub fn only_failures(mut self) -> Self {
        self.only_failures = true;
        self
    }
}

struct Run<'a> {
    form: &'a str,
    bean: &'a dyn Bean,
    locale: &'a Locale,
    context: &'a Context,
    options: &'a ValidationOptions,
}

/// Runs forms against beans. Cheap to clone; clones share the resources.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    resources: Arc<ValidatorResources>,
}

impl ValidationEngine {
    pub fn new(resources: Arc<ValidatorResources>) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &ValidatorResources {
        &self.resources
    }

    /// Validates `bean` against `form`. A missing locale means the default
    /// (root) formset chain.
    ///
    /// Rule failures are reported in the returned aggregate, never as an
    /// error. `Err` means a configuration problem (unknown form) or a rule
    /// that raised an expected fault, which aborts the whole run.
    pub fn validate(
        &self,
        bean: &dyn Bean,
        form: &str,
        locale: Option<&Locale>,
        context: &Context,
    ) -> Result<ResultAggregate, DomainError> {
        self.validate_with(bean, form, locale, context, &ValidationOptions::default())
    }

    #[instrument(skip(self, bean, context, options))]
    pub fn validate_with(
        &self,
        bean: &dyn Bean,
        form: &str,
        locale: Option<&Locale>,
        context: &Context,
        options: &ValidationOptions,
    ) -> Result<ResultAggregate, DomainError> {
        let locale = locale.cloned().unwrap_or_default();
        let resolved = self.resources.resolve_form(&locale, form)?;

        let selected: Vec<&FieldSpec> = match &options.field {
            Some(key) => {
                let field = resolved.field(key).ok_or_else(|| DomainError::UnknownField {
                    form: form.to_string(),
                    field: key.clone(),
                })?;
                vec![field]
            }
            None => resolved.fields.clone(),
        };

        let run = Run {
            form,
            bean,
            locale: &locale,
            context,
            options,
        };
        let mut aggregate = ResultAggregate::new(form, &locale);

        for field in selected {
            if options.page.is_some_and(|page| field.page() > page) {
                continue;
            }
            match field.indexed_list_property() {
                Some(list) => self.validate_indexed(&run, &mut aggregate, field, list)?,
                None => {
                    let value = read_property(bean, field.property());
                    self.validate_element(&run, &mut aggregate, field, &field.key(), value.as_ref())?;
                }
            }
        }

        info!(
            form,
            locale = %locale,
            outcomes = aggregate.outcomes().count(),
            failures = aggregate.failures().count(),
            "Validation finished"
        );
        Ok(aggregate)
    }

    /// One pass per list element; the first element that does not pass
    /// stops the remaining ones.
    fn validate_indexed(
        &self,
        run: &Run<'_>,
        aggregate: &mut ResultAggregate,
        field: &FieldSpec,
        list: &str,
    ) -> Result<(), DomainError> {
        let Some(FieldValue::List(items)) = read_property(run.bean, list) else {
            debug!(field = %field.key(), "Indexed list is missing or not a list");
            return Ok(());
        };

        for (index, item) in items.iter().enumerate() {
            let value = match item {
                FieldValue::Record(_) => read_property(item, field.property()),
                scalar => Some(scalar.clone()),
            };
            let key = field.indexed_key(index);
            if !self.validate_element(run, aggregate, field, &key, value.as_ref())? {
                break;
            }
        }
        Ok(())
    }

    /// Returns whether every rule of the field passed.
    fn validate_element(
        &self,
        run: &Run<'_>,
        aggregate: &mut ResultAggregate,
        field: &FieldSpec,
        key: &str,
        value: Option<&FieldValue>,
    ) -> Result<bool, DomainError> {
        if !run.options.only_failures {
            aggregate.touch(key);
        }

        let mut resolver = DependencyResolver::new(self.resources.registry());
        let mut invoke = |rule: &RuleDefinition| -> Result<bool, DomainError> {
            let call = RuleCall {
                rule,
                bean: run.bean,
                field,
                key,
                value,
                args: field.effective_args(rule.name()),
                locale: run.locale,
                context: run.context,
            };

            let verdict = match rule.logic().evaluate(&call) {
                Ok(verdict) => verdict,
                Err(RuleFault::Expected(message)) => {
                    return Err(DomainError::ValidationFault {
                        form: run.form.to_string(),
                        field: key.to_string(),
                        rule: rule.name().to_string(),
                        message,
                    });
                }
                Err(RuleFault::Unexpected(message)) => {
                    // Legacy contract: bug-class faults degrade to a failure
                    warn!(
                        form = run.form,
                        field = key,
                        rule = rule.name(),
                        error = %message,
                        "Unexpected rule fault recorded as a failed outcome"
                    );
                    Verdict::Failed
                }
            };

            let (passed, produced) = match verdict {
                Verdict::Passed { produced } => (true, produced),
                Verdict::Failed => (false, None),
            };
            if !passed || !run.options.only_failures {
                aggregate.record(ValidationOutcome {
                    field: key.to_string(),
                    rule: rule.name().to_string(),
                    passed,
                    produced,
                });
            }
            Ok(passed)
        };

        for rule in field.depends() {
            if resolver.ensure(rule, &mut invoke)? != RuleState::Passed {
                debug!(field = key, rule = %rule, "Remaining rules of the field skipped");
                return Ok(false);
            }
        }
        Ok(true)
    }
}
