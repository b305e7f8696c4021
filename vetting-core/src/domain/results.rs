// vetting-core/src/domain/results.rs

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::locale::Locale;
use crate::domain::value::FieldValue;

/// Result of one rule invocation on one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub field: String,
    pub rule: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produced: Option<FieldValue>,
}

/// Outcomes of one field, in invocation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldResult {
    key: String,
    outcomes: Vec<ValidationOutcome>,
}

impl FieldResult {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            outcomes: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn outcomes(&self) -> &[ValidationOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, rule: &str) -> Option<&ValidationOutcome> {
        self.outcomes.iter().find(|o| o.rule == rule)
    }

    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().map(|o| o.rule.as_str())
    }

    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }
}

/// Everything one `validate` run recorded. Skipped rules are absent.
#[derive(Debug, Clone, Serialize)]
pub struct ResultAggregate {
    form: String,
    locale: Locale,
    fields: Vec<FieldResult>,
}

impl ResultAggregate {
    pub(crate) fn new(form: &str, locale: &Locale) -> Self {
        Self {
            form: form.to_string(),
            locale: locale.clone(),
            fields: Vec::new(),
        }
    }

    /// Registers a field so that it is reported even if no rule of it
    /// ends up recorded.
    pub(crate) fn touch(&mut self, key: &str) {
        if self.field(key).is_none() {
            self.fields.push(FieldResult::new(key));
        }
    }

    pub(crate) fn record(&mut self, outcome: ValidationOutcome) {
        self.touch(&outcome.field);
        if let Some(entry) = self.fields.iter_mut().find(|f| f.key == outcome.field) {
            entry.outcomes.push(outcome);
        }
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn fields(&self) -> &[FieldResult] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldResult> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn has_rule_result(&self, field: &str, rule: &str) -> bool {
        self.outcome(field, rule).is_some()
    }

    /// Whether `rule` passed on `field`. `false` when it was not recorded.
    pub fn rule_outcome(&self, field: &str, rule: &str) -> bool {
        self.outcome(field, rule).is_some_and(|o| o.passed)
    }

    pub fn outcome(&self, field: &str, rule: &str) -> Option<&ValidationOutcome> {
        self.field(field).and_then(|f| f.outcome(rule))
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &ValidationOutcome> {
        self.fields.iter().flat_map(|f| f.outcomes.iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationOutcome> {
        self.outcomes().filter(|o| !o.passed)
    }

    pub fn is_valid(&self) -> bool {
        self.outcomes().all(|o| o.passed)
    }

    /// Produced values keyed by rule name. When several fields ran the same
    /// converter, the field validated last wins.
    pub fn produced_values(&self) -> BTreeMap<String, FieldValue> {
        self.outcomes()
            .filter_map(|o| o.produced.clone().map(|v| (o.rule.clone(), v)))
            .collect()
    }

    /// Produced values keyed by field, then by rule.
    pub fn produced_values_by_field(&self) -> BTreeMap<String, BTreeMap<String, FieldValue>> {
        let mut out: BTreeMap<String, BTreeMap<String, FieldValue>> = BTreeMap::new();
        for o in self.outcomes() {
            if let Some(v) = &o.produced {
                out.entry(o.field.clone())
                    .or_default()
                    .insert(o.rule.clone(), v.clone());
            }
        }
        out
    }
}

impl fmt::Display for ResultAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.form, self.locale)?;
        for field in &self.fields {
            let parts: Vec<String> = field
                .outcomes
                .iter()
                .map(|o| {
                    let status = if o.passed { "PASSED" } else { "FAILED" };
                    match &o.produced {
                        Some(v) => format!("{}={}({})", o.rule, status, v),
                        None => format!("{}={}", o.rule, status),
                    }
                })
                .collect();
            if parts.is_empty() {
                writeln!(f, "  {}: -", field.key)?;
            } else {
                writeln!(f, "  {}: {}", field.key, parts.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(field: &str, rule: &str, passed: bool, produced: Option<FieldValue>) -> ValidationOutcome {
        ValidationOutcome {
            field: field.into(),
            rule: rule.into(),
            passed,
            produced,
        }
    }

    fn aggregate() -> ResultAggregate {
        let mut agg = ResultAggregate::new("orderForm", &Locale::root());
        agg.record(outcome("qty", "required", true, None));
        agg.record(outcome("qty", "int", true, Some(FieldValue::Int(3))));
        agg.touch("note");
        agg.record(outcome("total", "required", true, None));
        agg.record(outcome("total", "int", false, None));
        agg
    }

    #[test]
    fn test_accessors() {
        let agg = aggregate();

        assert!(agg.has_rule_result("qty", "int"));
        assert!(agg.rule_outcome("qty", "int"));
        assert!(!agg.rule_outcome("total", "int"));
        assert!(!agg.has_rule_result("note", "required"));
        assert!(!agg.rule_outcome("ghost", "required"));
        assert_eq!(agg.field("note").map(|f| f.outcomes().len()), Some(0));
        assert!(!agg.is_valid());
        assert_eq!(agg.failures().count(), 1);
    }

    #[test]
    fn test_produced_values() {
        let mut agg = aggregate();
        agg.record(outcome("age", "int", true, Some(FieldValue::Int(40))));

        let by_rule = agg.produced_values();
        assert_eq!(by_rule.get("int"), Some(&FieldValue::Int(40)));
        assert_eq!(by_rule.len(), 1);

        let by_field = agg.produced_values_by_field();
        assert_eq!(by_field["qty"]["int"], FieldValue::Int(3));
        assert_eq!(by_field["age"]["int"], FieldValue::Int(40));
    }

    #[test]
    fn test_display() {
        let agg = aggregate();
        insta::assert_snapshot!(agg.to_string(), @r"
        orderForm [default]
          qty: required=PASSED, int=PASSED(3)
          note: -
          total: required=PASSED, int=FAILED
        ");
    }
}
