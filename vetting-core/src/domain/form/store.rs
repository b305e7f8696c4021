// vetting-core/src/domain/form/store.rs

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::error::DomainError;
use crate::domain::form::field::FieldSpec;
use crate::domain::form::formset::FormSet;
use crate::domain::locale::Locale;

/// Form definitions of every locale tier, assembled from one or more
/// configuration sources.
#[derive(Debug, Clone, Default)]
pub struct RuleSetStore {
    global_constants: BTreeMap<String, String>,
    form_sets: BTreeMap<Locale, FormSet>,
}

/// The field list of a form after locale fallback and inheritance.
#[derive(Debug, Clone)]
pub struct ResolvedForm<'a> {
    pub name: String,
    pub locale: Locale,
    pub fields: Vec<&'a FieldSpec>,
}

impl ResolvedForm<'_> {
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().copied().find(|f| f.key() == key)
    }
}

impl RuleSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_global_constant(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.global_constants.insert(name.into(), value.into());
    }

    /// Ingests the formsets of one configuration source. Forms that already
    /// exist for the same locale are extended: new fields are appended,
    /// fields with an existing key are replaced wholesale.
    pub fn merge<I>(&mut self, form_sets: I)
    where
        I: IntoIterator<Item = FormSet>,
    {
        for form_set in form_sets {
            let locale = form_set.locale().clone();
            match self.form_sets.get_mut(&locale) {
                Some(existing) => {
                    debug!(locale = %locale, "Merging formset into existing tier");
                    existing.absorb(form_set);
                }
                None => {
                    self.form_sets.insert(locale, form_set);
                }
            }
        }
    }

    pub fn form_set(&self, locale: &Locale) -> Option<&FormSet> {
        self.form_sets.get(locale)
    }

    pub fn form_sets(&self) -> impl Iterator<Item = &FormSet> {
        self.form_sets.values()
    }

    pub fn global_constants(&self) -> &BTreeMap<String, String> {
        &self.global_constants
    }

    /// Resolves the fields of `name` for `locale`.
    ///
    /// Tiers are walked from the most specific (language, country, variant)
    /// down to the root tier; a field key found in a more specific tier wins
    /// and less specific tiers only contribute keys not seen yet. When the
    /// form extends another form, the parent's fields not redefined by the
    /// child come first.
    pub fn resolve_group(&self, locale: &Locale, name: &str) -> Result<ResolvedForm<'_>, DomainError> {
        let mut visiting = Vec::new();
        let fields = self.collect_fields(locale, name, &mut visiting)?;
        Ok(ResolvedForm {
            name: name.to_string(),
            locale: locale.clone(),
            fields,
        })
    }

    fn collect_fields<'a>(
        &'a self,
        locale: &Locale,
        name: &str,
        visiting: &mut Vec<String>,
    ) -> Result<Vec<&'a FieldSpec>, DomainError> {
        if visiting.iter().any(|v| v == name) {
            visiting.push(name.to_string());
            return Err(DomainError::CircularDependency(format!(
                "form inheritance {}",
                visiting.join(" -> ")
            )));
        }
        visiting.push(name.to_string());

        let mut fields: Vec<&'a FieldSpec> = Vec::new();
        let mut parent: Option<&'a str> = None;
        let mut found = false;

        for tier in locale.fallback_chain() {
            let Some(form) = self.form_sets.get(&tier).and_then(|fs| fs.form(name)) else {
                continue;
            };
            found = true;
            if parent.is_none() {
                parent = form.extends();
            }
            for field in form.fields() {
                let key = field.key();
                if !fields.iter().any(|f| f.key() == key) {
                    fields.push(field);
                }
            }
        }

        if !found {
            return Err(DomainError::UnknownGroup {
                form: name.to_string(),
                locale: locale.to_string(),
            });
        }

        if let Some(parent) = parent {
            let inherited = self.collect_fields(locale, parent, visiting)?;
            let own = fields;
            fields = inherited
                .into_iter()
                .filter(|p| {
                    let key = p.key();
                    !own.iter().any(|o| o.key() == key)
                })
                .collect();
            fields.extend(own);
        }

        visiting.pop();
        Ok(fields)
    }

    /// Load-time processing: constant substitution, then a resolution of
    /// every declared form so that missing parents and inheritance cycles
    /// surface before the store is used.
    pub(crate) fn process(&mut self) -> Result<(), DomainError> {
        let globals = self.global_constants.clone();
        for form_set in self.form_sets.values_mut() {
            let constants = form_set.constants().clone();
            for form in form_set.forms_mut() {
                for field in form.fields_mut() {
                    field.process(&globals, &constants);
                }
            }
        }

        if !self.form_sets.contains_key(&Locale::root()) {
            warn!("No default formset declared: locales without a dedicated formset will not resolve");
        }

        for form_set in self.form_sets.values() {
            for form in form_set.forms() {
                self.resolve_group(form_set.locale(), form.name())?;
            }
        }
        Ok(())
    }

    /// Every field of every tier, with the name of its form.
    pub(crate) fn all_fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.form_sets
            .values()
            .flat_map(|fs| fs.forms())
            .flat_map(|form| form.fields().iter().map(move |f| (form.name(), f)))
    }
}
