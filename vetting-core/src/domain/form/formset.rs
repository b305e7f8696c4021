// vetting-core/src/domain/form/formset.rs

use std::collections::BTreeMap;

use crate::domain::form::field::FieldSpec;
use crate::domain::locale::Locale;

/// A named, ordered group of field definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    name: String,
    extends: Option<String>,
    fields: Vec<FieldSpec>,
}

impl Form {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            fields: Vec::new(),
        }
    }

    pub fn extending(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.add_field(field);
        self
    }

    /// Appends a field, or replaces (in place, wholesale) the field that
    /// already has the same key.
    pub fn add_field(&mut self, field: FieldSpec) {
        let key = field.key();
        match self.fields.iter_mut().find(|f| f.key() == key) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Extends this form with the fields of another declaration of the same
    /// form coming from a later source.
    pub(crate) fn absorb(&mut self, other: Form) {
        if other.extends.is_some() {
            self.extends = other.extends;
        }
        for field in other.fields {
            self.add_field(field);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extends(&self) -> Option<&str> {
        self.extends.as_deref()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [FieldSpec] {
        &mut self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key() == key)
    }

    pub fn contains_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }
}

/// All forms declared for one locale tier, with the constants visible to
/// them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSet {
    locale: Locale,
    constants: BTreeMap<String, String>,
    forms: BTreeMap<String, Form>,
}

impl FormSet {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            constants: BTreeMap::new(),
            forms: BTreeMap::new(),
        }
    }

    pub fn with_constant(mut self, name: &str, value: &str) -> Self {
        self.constants.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.add_form(form);
        self
    }

    /// Adds a form, merging it into an existing form of the same name.
    pub fn add_form(&mut self, form: Form) {
        match self.forms.get_mut(form.name()) {
            Some(existing) => existing.absorb(form),
            None => {
                self.forms.insert(form.name().to_string(), form);
            }
        }
    }

    pub fn add_constant(&mut self, name: String, value: String) {
        self.constants.insert(name, value);
    }

    pub(crate) fn absorb(&mut self, other: FormSet) {
        self.constants.extend(other.constants);
        for form in other.forms.into_values() {
            self.add_form(form);
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn constants(&self) -> &BTreeMap<String, String> {
        &self.constants
    }

    pub fn form(&self, name: &str) -> Option<&Form> {
        self.forms.get(name)
    }

    pub fn forms(&self) -> impl Iterator<Item = &Form> {
        self.forms.values()
    }

    pub(crate) fn forms_mut(&mut self) -> impl Iterator<Item = &mut Form> {
        self.forms.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_replaces_wholesale_in_place() {
        let mut form = Form::new("nameForm")
            .with_field(FieldSpec::new("firstName").with_depends("required"))
            .with_field(FieldSpec::new("lastName").with_depends("required"));

        form.add_field(FieldSpec::new("firstName").with_depends("mask"));

        let keys: Vec<String> = form.fields().iter().map(FieldSpec::key).collect();
        assert_eq!(keys, vec!["firstName", "lastName"]);
        assert_eq!(form.field("firstName").map(|f| f.depends().to_vec()), Some(vec!["mask".to_string()]));
    }

    #[test]
    fn test_formset_merges_forms_of_same_name() {
        let mut set = FormSet::new(Locale::root())
            .with_form(Form::new("nameForm").with_field(FieldSpec::new("firstName")));
        set.absorb(
            FormSet::new(Locale::root())
                .with_constant("c", "1")
                .with_form(Form::new("nameForm").with_field(FieldSpec::new("lastName"))),
        );

        let form = set.form("nameForm");
        assert_eq!(form.map(|f| f.fields().len()), Some(2));
        assert_eq!(set.constants().get("c").map(String::as_str), Some("1"));
    }
}
