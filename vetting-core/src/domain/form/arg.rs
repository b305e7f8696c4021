// vetting-core/src/domain/form/arg.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::error::DomainError;

/// A rule-invocation argument (usually a message replacement key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arg {
    pub key: String,

    /// Rule this argument is bound to. `None` binds it to every rule of the
    /// field that has no specific argument at the same position.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub position: Option<usize>,

    /// Whether `key` is a resource key rather than a literal.
    #[serde(default = "default_true")]
    pub resource: bool,
}

fn default_true() -> bool {
    true
}

impl Arg {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
            position: None,
            resource: true,
        }
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn for_rule(mut self, rule: impl Into<String>) -> Self {
        self.name = Some(rule.into());
        self
    }

    pub fn literal(mut self) -> Self {
        self.resource = false;
        self
    }

    pub fn binding(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_BINDING)
    }
}

const DEFAULT_BINDING: &str = "(default)";

/// Highest argument position a field may declare.
pub const MAX_ARG_POSITION: usize = 63;

#[derive(Debug, Clone, Default, PartialEq)]
struct ArgSlot {
    default: Option<Arg>,
    bound: BTreeMap<String, Arg>,
}

impl ArgSlot {
    fn holds(&self, name: Option<&str>) -> bool {
        match name {
            None => self.default.is_some(),
            Some(rule) => self.bound.contains_key(rule),
        }
    }
}

/// Positional argument table of one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgTable {
    slots: Vec<ArgSlot>,
}

impl ArgTable {
    /// Adds an argument, resolving its position when none is given: one past
    /// the last position that already holds an argument with the same
    /// binding, else one past the last default argument, else 0.
    ///
    /// Returns the position the argument was stored at.
    pub fn add(&mut self, field: &str, mut arg: Arg) -> Result<Option<usize>, DomainError> {
        if arg.key.trim().is_empty() {
            return Ok(None);
        }

        let position = match arg.position {
            Some(p) => p,
            None => self.implied_position(arg.name.as_deref()),
        };
        if position > MAX_ARG_POSITION {
            return Err(DomainError::InvalidConfiguration(format!(
                "argument '{}' of field '{}' is at position {}, the maximum is {}",
                arg.key, field, position, MAX_ARG_POSITION
            )));
        }
        arg.position = Some(position);

        if self.slots.len() <= position {
            self.slots.resize_with(position + 1, ArgSlot::default);
        }
        let slot = &mut self.slots[position];

        if slot.holds(arg.name.as_deref()) {
            return Err(DomainError::AmbiguousArgumentOverride {
                field: field.to_string(),
                binding: arg.binding().to_string(),
                position,
            });
        }

        match arg.name.clone() {
            None => slot.default = Some(arg),
            Some(rule) => {
                slot.bound.insert(rule, arg);
            }
        }
        Ok(Some(position))
    }

    fn implied_position(&self, name: Option<&str>) -> usize {
        let last_same = self.slots.iter().rposition(|slot| slot.holds(name));
        let last_default = self.slots.iter().rposition(|slot| slot.default.is_some());
        match last_same.or(last_default) {
            Some(p) => p + 1,
            None => 0,
        }
    }

    /// Argument used by `rule` at `position`: the bound one, else the default.
    pub fn get(&self, rule: &str, position: usize) -> Option<&Arg> {
        let slot = self.slots.get(position)?;
        slot.bound.get(rule).or(slot.default.as_ref())
    }

    /// Effective arguments for `rule`, one entry per position.
    pub fn effective(&self, rule: &str) -> Vec<Option<&Arg>> {
        (0..self.slots.len()).map(|p| self.get(rule, p)).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every stored argument, for load-time key processing.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Arg> {
        self.slots
            .iter_mut()
            .flat_map(|slot| slot.default.iter_mut().chain(slot.bound.values_mut()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.slots
            .iter()
            .flat_map(|slot| slot.default.iter().chain(slot.bound.values()))
    }
}
