// vetting-core/src/domain/rules/builtin/format.rs

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::rules::definition::{RuleCall, RuleFault};

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern).unwrap_or_else(|_| {
            // Patterns are hardcoded; fall back to a never-matching regex
            Regex::new("$^").unwrap_or_else(|_| unreachable!())
        })
    })
}

fn re_email() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(
        &RE,
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
}

fn re_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"(?i)^(https?|ftp)://[^\s/$.?#][^\s]*$")
}

pub fn email(call: &RuleCall<'_>) -> Result<bool, RuleFault> {
    if call.is_blank() {
        return Ok(true);
    }
    Ok(call.text().is_some_and(|t| re_email().is_match(t.trim())))
}

pub fn url(call: &RuleCall<'_>) -> Result<bool, RuleFault> {
    if call.is_blank() {
        return Ok(true);
    }
    Ok(call.text().is_some_and(|t| re_url().is_match(t.trim())))
}

/// Card number check: 13 to 19 digits (spaces and dashes allowed as
/// separators) with a valid Luhn checksum.
pub fn credit_card(call: &RuleCall<'_>) -> Result<bool, RuleFault> {
    if call.is_blank() {
        return Ok(true);
    }
    let Some(text) = call.text() else {
        return Ok(false);
    };
    let digits: String = text.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    if !(13..=19).contains(&digits.len()) {
        return Ok(false);
    }
    Ok(luhn(&digits))
}

fn luhn(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}
