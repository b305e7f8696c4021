// vetting-core/src/domain/rules/builtin/generic.rs

use regex::Regex;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::domain::rules::definition::{RuleCall, RuleFault};
use crate::domain::value::FieldValue;

pub fn required(call: &RuleCall<'_>) -> Result<bool, RuleFault> {
    Ok(match call.value {
        None | Some(FieldValue::Null) => false,
        Some(FieldValue::Text(s)) => !s.trim().is_empty(),
        Some(FieldValue::List(items)) => !items.is_empty(),
        Some(_) => true,
    })
}

fn length_of(call: &RuleCall<'_>) -> Option<usize> {
    match call.value {
        Some(FieldValue::List(items)) => Some(items.len()),
        _ => call.text().map(|t| t.chars().count()),
    }
}

pub fn min_length(call: &RuleCall<'_>) -> Result<bool, RuleFault> {
    if call.is_blank() {
        return Ok(true);
    }
    let min: usize = call.parse_var("minlength")?;
    Ok(length_of(call).is_some_and(|len| len >= min))
}

pub fn max_length(call: &RuleCall<'_>) -> Result<bool, RuleFault> {
    if call.is_blank() {
        return Ok(true);
    }
    let max: usize = call.parse_var("maxlength")?;
    Ok(length_of(call).is_some_and(|len| len <= max))
}

/// Masks come from configuration, so each distinct pattern is compiled once
/// per process and shared.
fn mask_regex(pattern: &str) -> Result<Regex, regex::Error> {
    static MASKS: OnceLock<RwLock<HashMap<String, Regex>>> = OnceLock::new();
    let cache = MASKS.get_or_init(Default::default);

    if let Some(re) = cache.read().ok().and_then(|masks| masks.get(pattern).cloned()) {
        return Ok(re);
    }
    let re = Regex::new(pattern)?;
    if let Ok(mut masks) = cache.write() {
        masks.insert(pattern.to_string(), re.clone());
    }
    Ok(re)
}

pub fn mask(call: &RuleCall<'_>) -> Result<bool, RuleFault> {
    if call.is_blank() {
        return Ok(true);
    }
    let pattern = call.var("mask").ok_or_else(|| {
        RuleFault::Unexpected(format!("rule 'mask' on field '{}' needs var 'mask'", call.key))
    })?;
    let re = mask_regex(pattern).map_err(|e| {
        RuleFault::Unexpected(format!("Invalid mask on field '{}': {}", call.key, e))
    })?;
    Ok(call.text().is_some_and(|t| re.is_match(&t)))
}
