// vetting-core/src/domain/rules/definition.rs

use serde::Serialize;
use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::form::{Arg, FieldSpec, parse_depends};
use crate::domain::locale::Locale;
use crate::domain::value::FieldValue;
use crate::ports::bean::Bean;

/// Fault raised by rule logic.
///
/// The two variants are handled very differently by the engine:
/// - `Expected` aborts the whole run; the caller gets a single
///   `DomainError::ValidationFault` carrying the message.
/// - `Unexpected` (a bug-class condition such as a malformed `min` var) is
///   logged and recorded as a plain FAILED outcome for that rule. Callers
///   cannot observe it as an error. This mirrors a legacy contract and is
///   kept on purpose even though it is not fail-fast.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleFault {
    #[error("{0}")]
    Expected(String),
    #[error("{0}")]
    Unexpected(String),
}

/// Shared context bag handed to every rule invocation of a run.
#[derive(Clone, Default)]
pub struct Context {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, name: &str, value: T) {
        self.entries.insert(name.to_string(), Arc::new(value));
    }

    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.entries.get(name).and_then(|v| (**v).downcast_ref::<T>())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("Context").field("entries", &keys).finish()
    }
}

/// Everything a rule sees when it is invoked.
pub struct RuleCall<'a> {
    pub rule: &'a RuleDefinition,
    pub bean: &'a dyn Bean,
    pub field: &'a FieldSpec,
    /// Result key of the field (`lines[2].qty` for indexed fields).
    pub key: &'a str,
    /// The property value, `None` when the bean does not have it.
    pub value: Option<&'a FieldValue>,
    pub args: Vec<Option<&'a Arg>>,
    pub locale: &'a Locale,
    pub context: &'a Context,
}

impl<'a> RuleCall<'a> {
    pub fn text(&self) -> Option<Cow<'a, str>> {
        self.value.and_then(FieldValue::as_text)
    }

    /// Missing, null, or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self.value {
            None | Some(FieldValue::Null) => true,
            Some(FieldValue::Text(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    pub fn var(&self, name: &str) -> Option<&'a str> {
        self.field.var_value(name)
    }

    /// Parses a var the rule cannot work without. A missing or malformed
    /// var is a configuration bug, reported as an unexpected fault.
    pub fn parse_var<T>(&self, name: &str) -> Result<T, RuleFault>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.var(name).ok_or_else(|| {
            RuleFault::Unexpected(format!(
                "rule '{}' on field '{}' needs var '{}'",
                self.rule.name(),
                self.key,
                name
            ))
        })?;
        raw.trim().parse::<T>().map_err(|e| {
            RuleFault::Unexpected(format!(
                "var '{}' of field '{}' is not valid ({}): {}",
                name, self.key, raw, e
            ))
        })
    }

    /// Value of a declared parameter taken from the context bag.
    pub fn param<T: Any>(&self, name: &str) -> Option<&'a T> {
        if !self.rule.parameters().iter().any(|p| p == name) {
            return None;
        }
        self.context.get::<T>(name)
    }
}

pub type PredicateFn = dyn Fn(&RuleCall<'_>) -> Result<bool, RuleFault> + Send + Sync;
pub type ProducerFn = dyn Fn(&RuleCall<'_>) -> Result<Option<FieldValue>, RuleFault> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationKind {
    Predicate,
    Producer,
}

impl fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationKind::Predicate => write!(f, "predicate"),
            InvocationKind::Producer => write!(f, "producer"),
        }
    }
}

/// Outcome of one invocation, before it is recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Passed { produced: Option<FieldValue> },
    Failed,
}

/// The invocation target of a rule, tagged by its return contract.
///
/// - `Predicate`: `true` passes, `false` fails.
/// - `Producer`: `Some(value)` passes and records `value`. `None` and
///   `Some(FieldValue::Null)` fail: a producer that yields nothing has not
///   converted anything.
#[derive(Clone)]
pub enum RuleLogic {
    Predicate(Arc<PredicateFn>),
    Producer(Arc<ProducerFn>),
}

impl RuleLogic {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&RuleCall<'_>) -> Result<bool, RuleFault> + Send + Sync + 'static,
    {
        RuleLogic::Predicate(Arc::new(f))
    }

    pub fn producer<F>(f: F) -> Self
    where
        F: Fn(&RuleCall<'_>) -> Result<Option<FieldValue>, RuleFault> + Send + Sync + 'static,
    {
        RuleLogic::Producer(Arc::new(f))
    }

    pub fn kind(&self) -> InvocationKind {
        match self {
            RuleLogic::Predicate(_) => InvocationKind::Predicate,
            RuleLogic::Producer(_) => InvocationKind::Producer,
        }
    }

    pub fn evaluate(&self, call: &RuleCall<'_>) -> Result<Verdict, RuleFault> {
        match self {
            RuleLogic::Predicate(f) => Ok(if f(call)? {
                Verdict::Passed { produced: None }
            } else {
                Verdict::Failed
            }),
            RuleLogic::Producer(f) => Ok(match f(call)? {
                Some(value) if !value.is_null() => Verdict::Passed {
                    produced: Some(value),
                },
                _ => Verdict::Failed,
            }),
        }
    }
}

impl fmt::Debug for RuleLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleLogic::{}", self.kind())
    }
}

/// A named, reusable validation rule.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    name: String,
    logic: RuleLogic,
    parameters: Vec<String>,
    prerequisites: Vec<String>,
    message_key: Option<String>,
}

impl RuleDefinition {
    pub fn new(name: impl Into<String>, logic: RuleLogic) -> Self {
        Self {
            name: name.into(),
            logic,
            parameters: Vec::new(),
            prerequisites: Vec::new(),
            message_key: None,
        }
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Prerequisite rules, comma separated (`"required"`).
    pub fn depends_on(mut self, depends: &str) -> Self {
        self.prerequisites = parse_depends(depends);
        self
    }

    pub fn with_prerequisites(mut self, prerequisites: Vec<String>) -> Self {
        self.prerequisites = prerequisites;
        self
    }

    pub fn with_message(mut self, key: impl Into<String>) -> Self {
        self.message_key = Some(key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logic(&self) -> &RuleLogic {
        &self.logic
    }

    pub fn kind(&self) -> InvocationKind {
        self.logic.kind()
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    pub fn message_key(&self) -> Option<&str> {
        self.message_key.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn call_with<'a>(
        rule: &'a RuleDefinition,
        field: &'a FieldSpec,
        value: Option<&'a FieldValue>,
        bean: &'a BTreeMap<String, FieldValue>,
        context: &'a Context,
        locale: &'a Locale,
    ) -> RuleCall<'a> {
        RuleCall {
            rule,
            bean,
            field,
            key: "age",
            value,
            args: Vec::new(),
            locale,
            context,
        }
    }

    #[test]
    fn test_producer_null_fails() {
        let rule = RuleDefinition::new("conv", RuleLogic::producer(|_| Ok(Some(FieldValue::Null))));
        let field = FieldSpec::new("age");
        let bean = BTreeMap::new();
        let context = Context::new();
        let locale = Locale::root();
        let call = call_with(&rule, &field, None, &bean, &context, &locale);

        assert_eq!(rule.logic().evaluate(&call), Ok(Verdict::Failed));
    }

    #[test]
    fn test_parse_var_reports_unexpected_fault() {
        let rule = RuleDefinition::new("intRange", RuleLogic::predicate(|_| Ok(true)));
        let field = FieldSpec::new("age").with_var("min", "ten");
        let bean = BTreeMap::new();
        let context = Context::new();
        let locale = Locale::root();
        let call = call_with(&rule, &field, None, &bean, &context, &locale);

        assert!(matches!(call.parse_var::<i64>("min"), Err(RuleFault::Unexpected(_))));
        assert!(matches!(call.parse_var::<i64>("max"), Err(RuleFault::Unexpected(_))));
    }

    #[test]
    fn test_param_requires_declaration() {
        let rule = RuleDefinition::new("r", RuleLogic::predicate(|_| Ok(true)))
            .with_parameters(["tenant"]);
        let field = FieldSpec::new("age");
        let bean = BTreeMap::new();
        let context = Context::new().with("tenant", "acme".to_string()).with("other", 1u8);
        let locale = Locale::root();
        let call = call_with(&rule, &field, None, &bean, &context, &locale);

        assert_eq!(call.param::<String>("tenant").map(String::as_str), Some("acme"));
        assert_eq!(call.param::<u8>("other"), None);
        assert_eq!(call.param::<u32>("tenant"), None);
    }
}
