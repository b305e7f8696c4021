// vetting-core/src/domain/form/field.rs

use std::collections::BTreeMap;

use crate::domain::error::DomainError;
use crate::domain::form::arg::{Arg, ArgTable};

/// Rule-specific configuration value (`min`, `max`, `mask`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub name: String,
    pub value: String,
}

impl Var {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Message key overriding a rule's default message for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Msg {
    pub name: String,
    pub key: String,
}

/// The complete validation contract of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    property: String,
    indexed_list_property: Option<String>,
    depends: Vec<String>,
    page: u32,
    args: ArgTable,
    vars: BTreeMap<String, Var>,
    msgs: BTreeMap<String, Msg>,
}

impl FieldSpec {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            indexed_list_property: None,
            depends: Vec::new(),
            page: 0,
            args: ArgTable::default(),
            vars: BTreeMap::new(),
            msgs: BTreeMap::new(),
        }
    }

    /// Sets the rule list from a comma separated declaration
    /// (`"required, int"`). Blank entries are dropped.
    pub fn with_depends(mut self, depends: &str) -> Self {
        self.depends = parse_depends(depends);
        self
    }

    pub fn with_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends = rules.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn indexed_by(mut self, list_property: impl Into<String>) -> Self {
        self.indexed_list_property = Some(list_property.into());
        self
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.add_var(Var::new(name, value));
        self
    }

    pub fn with_arg(mut self, arg: Arg) -> Result<Self, DomainError> {
        self.add_arg(arg)?;
        Ok(self)
    }

    pub fn with_msg(mut self, rule: &str, key: &str) -> Self {
        self.add_msg(rule, key);
        self
    }

    pub fn add_arg(&mut self, arg: Arg) -> Result<Option<usize>, DomainError> {
        let key = self.key();
        self.args.add(&key, arg)
    }

    pub fn add_var(&mut self, var: Var) {
        self.vars.insert(var.name.clone(), var);
    }

    pub fn add_msg(&mut self, rule: &str, key: &str) {
        self.msgs.insert(
            rule.to_string(),
            Msg {
                name: rule.to_string(),
                key: key.to_string(),
            },
        );
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn indexed_list_property(&self) -> Option<&str> {
        self.indexed_list_property.as_deref()
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed_list_property.is_some()
    }

    /// Identity of the field inside a form.
    pub fn key(&self) -> String {
        match &self.indexed_list_property {
            Some(list) => format!("{}[].{}", list, self.property),
            None => self.property.clone(),
        }
    }

    /// Result key of one element of an indexed field.
    pub fn indexed_key(&self, index: usize) -> String {
        match &self.indexed_list_property {
            Some(list) => format!("{}[{}].{}", list, index, self.property),
            None => self.property.clone(),
        }
    }

    pub fn depends(&self) -> &[String] {
        &self.depends
    }

    pub fn is_dependency(&self, rule: &str) -> bool {
        self.depends.iter().any(|d| d == rule)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn args(&self) -> &ArgTable {
        &self.args
    }

    pub fn arg(&self, rule: &str, position: usize) -> Option<&Arg> {
        self.args.get(rule, position)
    }

    pub fn effective_args(&self, rule: &str) -> Vec<Option<&Arg>> {
        self.args.effective(rule)
    }

    pub fn var(&self, name: &str) -> Option<&Var> {
        self.vars.get(name)
    }

    pub fn var_value(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|v| v.value.as_str())
    }

    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        self.vars.values()
    }

    pub fn msg(&self, rule: &str) -> Option<&str> {
        self.msgs.get(rule).map(|m| m.key.as_str())
    }

    /// Replaces `${constant}` references in var values, arg keys and msg
    /// keys, then `${var:name}` references in arg and msg keys.
    pub(crate) fn process(
        &mut self,
        global_constants: &BTreeMap<String, String>,
        constants: &BTreeMap<String, String>,
    ) {
        for var in self.vars.values_mut() {
            var.value = substitute_constants(&var.value, constants, global_constants);
        }

        let var_values: BTreeMap<String, String> = self
            .vars
            .values()
            .map(|v| (v.name.clone(), v.value.clone()))
            .collect();

        for arg in self.args.iter_mut() {
            let replaced = substitute_constants(&arg.key, constants, global_constants);
            arg.key = substitute_vars(&replaced, &var_values);
        }
        for msg in self.msgs.values_mut() {
            let replaced = substitute_constants(&msg.key, constants, global_constants);
            msg.key = substitute_vars(&replaced, &var_values);
        }
    }
}

pub fn parse_depends(depends: &str) -> Vec<String> {
    depends
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn substitute_constants(
    text: &str,
    local: &BTreeMap<String, String>,
    global: &BTreeMap<String, String>,
) -> String {
    // Tier constants shadow global ones
    expand(text, |name| local.get(name).or_else(|| global.get(name)).map(String::as_str))
}

fn substitute_vars(text: &str, vars: &BTreeMap<String, String>) -> String {
    expand(text, |name| {
        name.strip_prefix("var:")
            .and_then(|var| vars.get(var))
            .map(String::as_str)
    })
}

/// Replaces each `${name}` of `text` in a single left-to-right pass.
/// Replacement text is never scanned again; unknown references are kept.
fn expand<'a>(text: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let reference = &rest[start..];
        let Some(end) = reference.find('}') else {
            // Unterminated, kept as is
            rest = reference;
            break;
        };
        match lookup(&reference[2..end]) {
            Some(value) => out.push_str(value),
            None => out.push_str(&reference[..=end]),
        }
        rest = &reference[end + 1..];
    }
    out.push_str(rest);
    out
}
