// vetting-core/src/domain/rules/builtin/types.rs

use chrono::NaiveDate;
use chrono::format::ParseErrorKind;

use crate::domain::rules::definition::{RuleCall, RuleFault};
use crate::domain::value::FieldValue;

const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";

/// Missing, null and blank input have nothing to convert and fail; anything
/// else goes through `parse`, `None` meaning the value is not of the type.
fn convert<F>(call: &RuleCall<'_>, parse: F) -> Result<Option<FieldValue>, RuleFault>
where
    F: Fn(&str) -> Option<FieldValue>,
{
    if call.is_blank() {
        return Ok(None);
    }
    Ok(call.text().and_then(|t| parse(&t)))
}

pub fn byte(call: &RuleCall<'_>) -> Result<Option<FieldValue>, RuleFault> {
    convert(call, |t| t.parse::<i8>().ok().map(FieldValue::Byte))
}

pub fn short(call: &RuleCall<'_>) -> Result<Option<FieldValue>, RuleFault> {
    convert(call, |t| t.parse::<i16>().ok().map(FieldValue::Short))
}

pub fn integer(call: &RuleCall<'_>) -> Result<Option<FieldValue>, RuleFault> {
    convert(call, |t| t.parse::<i32>().ok().map(FieldValue::Int))
}

pub fn long(call: &RuleCall<'_>) -> Result<Option<FieldValue>, RuleFault> {
    convert(call, |t| t.parse::<i64>().ok().map(FieldValue::Long))
}

pub fn float(call: &RuleCall<'_>) -> Result<Option<FieldValue>, RuleFault> {
    convert(call, |t| {
        let v = t.parse::<f64>().ok()?;
        if !v.is_finite() || v.abs() > f64::from(f32::MAX) {
            return None;
        }
        let narrowed = v as f32;
        // Nonzero input that rounds to zero is out of range
        (narrowed != 0.0 || v == 0.0).then_some(FieldValue::Float(narrowed))
    })
}

pub fn double(call: &RuleCall<'_>) -> Result<Option<FieldValue>, RuleFault> {
    convert(call, |t| {
        let v = t.parse::<f64>().ok()?;
        v.is_finite().then_some(FieldValue::Double(v))
    })
}

/// Date converter. The `datePattern` var holds a chrono format string
/// (`%d/%m/%Y`); ISO dates are expected without it.
pub fn date(call: &RuleCall<'_>) -> Result<Option<FieldValue>, RuleFault> {
    if let Some(FieldValue::Date(d)) = call.value {
        return Ok(Some(FieldValue::Date(*d)));
    }
    if call.is_blank() {
        return Ok(None);
    }
    let pattern = call.var("datePattern").unwrap_or(DEFAULT_DATE_PATTERN);
    let Some(text) = call.text() else {
        return Ok(None);
    };
    match NaiveDate::parse_from_str(text.trim(), pattern) {
        Ok(d) => Ok(Some(FieldValue::Date(d))),
        Err(e) if e.kind() == ParseErrorKind::BadFormat => Err(RuleFault::Unexpected(format!(
            "Invalid datePattern '{}' on field '{}'",
            pattern, call.key
        ))),
        Err(_) => Ok(None),
    }
}

pub fn int_range(call: &RuleCall<'_>) -> Result<bool, RuleFault> {
    if call.is_blank() {
        return Ok(true);
    }
    let min: i64 = call.parse_var("min")?;
    let max: i64 = call.parse_var("max")?;
    let Some(value) = call.text().and_then(|t| t.trim().parse::<i64>().ok()) else {
        return Ok(false);
    };
    Ok((min..=max).contains(&value))
}

pub fn float_range(call: &RuleCall<'_>) -> Result<bool, RuleFault> {
    if call.is_blank() {
        return Ok(true);
    }
    let min: f64 = call.parse_var("min")?;
    let max: f64 = call.parse_var("max")?;
    let Some(value) = call.text().and_then(|t| t.trim().parse::<f64>().ok()) else {
        return Ok(false);
    };
    Ok(value >= min && value <= max)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::{passes, produced, run_leaf};
    use crate::domain::rules::definition::{RuleFault, Verdict};
    use crate::domain::value::FieldValue;
    use chrono::NaiveDate;

    fn boundaries(rule: &str, min: i128, max: i128) {
        let (min, max) = (min.to_string(), max.to_string());
        assert!(passes(rule, &min, &[]), "{} should accept {}", rule, min);
        assert!(passes(rule, &max, &[]), "{} should accept {}", rule, max);
        assert!(!passes(rule, &format!("{}0", min), &[]), "{} below minimum", rule);
        assert!(!passes(rule, &format!("{}0", max), &[]), "{} above maximum", rule);
    }

    #[test]
    fn test_integer_widths_at_boundaries() {
        boundaries("byte", i8::MIN.into(), i8::MAX.into());
        boundaries("short", i16::MIN.into(), i16::MAX.into());
        boundaries("integer", i32::MIN.into(), i32::MAX.into());
        boundaries("int", i32::MIN.into(), i32::MAX.into());
        boundaries("long", i64::MIN.into(), i64::MAX.into());
    }

    #[test]
    fn test_converters_produce_typed_values() {
        assert_eq!(produced("byte", "-12", &[]), Some(FieldValue::Byte(-12)));
        assert_eq!(produced("short", "300", &[]), Some(FieldValue::Short(300)));
        assert_eq!(produced("int", "12345678", &[]), Some(FieldValue::Int(12_345_678)));
        assert_eq!(produced("long", "9000000000", &[]), Some(FieldValue::Long(9_000_000_000)));
        assert_eq!(produced("double", "2.5", &[]), Some(FieldValue::Double(2.5)));
        assert_eq!(produced("float", "0.5", &[]), Some(FieldValue::Float(0.5)));
    }

    #[test]
    fn test_converters_reject_out_of_domain() {
        assert!(!passes("int", "12.5", &[]));
        assert!(!passes("int", "abc", &[]));
        assert!(!passes("float", "1e40", &[]));
        assert!(passes("double", "1e40", &[]));
        assert!(!passes("double", "NaN", &[]));
    }

    #[test]
    fn test_float_rejects_values_that_round_to_zero() {
        assert!(!passes("float", "1e-50", &[]));
        assert!(!passes("float", "-1e-50", &[]));
        assert_eq!(produced("float", "0", &[]), Some(FieldValue::Float(0.0)));
        assert!(passes("double", "1e-50", &[]));
    }

    #[test]
    fn test_nothing_to_convert_fails() {
        assert_eq!(run_leaf("int", Some(FieldValue::from("")), &[]), Ok(Verdict::Failed));
        assert_eq!(run_leaf("int", Some(FieldValue::from("  ")), &[]), Ok(Verdict::Failed));
        assert_eq!(run_leaf("long", None, &[]), Ok(Verdict::Failed));
        assert_eq!(run_leaf("double", Some(FieldValue::Null), &[]), Ok(Verdict::Failed));
        assert_eq!(run_leaf("date", None, &[]), Ok(Verdict::Failed));
        assert_eq!(run_leaf("date", Some(FieldValue::from("")), &[]), Ok(Verdict::Failed));
    }

    #[test]
    fn test_typed_bean_values_convert() {
        assert_eq!(
            run_leaf("int", Some(FieldValue::Long(42)), &[]),
            Ok(Verdict::Passed { produced: Some(FieldValue::Int(42)) })
        );
    }

    #[test]
    fn test_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).map(FieldValue::Date);
        assert_eq!(produced("date", "2024-02-29", &[]), expected);
        assert_eq!(produced("date", "29/02/2024", &[("datePattern", "%d/%m/%Y")]), expected);
        assert!(!passes("date", "2023-02-29", &[]));
        assert!(!passes("date", "yesterday", &[]));
    }

    #[test]
    fn test_int_range() {
        let vars = [("min", "18"), ("max", "65")];
        assert!(passes("intRange", "18", &vars));
        assert!(passes("intRange", "65", &vars));
        assert!(!passes("intRange", "66", &vars));
        // Out of the predicate's domain: plain failure, no fault
        assert_eq!(
            run_leaf("intRange", Some(FieldValue::from("eighteen")), &vars),
            Ok(Verdict::Failed)
        );
    }

    #[test]
    fn test_range_with_broken_vars_is_unexpected() {
        let result = run_leaf("floatRange", Some(FieldValue::from("1.5")), &[("min", "low"), ("max", "2")]);
        assert!(matches!(result, Err(RuleFault::Unexpected(_))));
        assert!(passes("floatRange", "1.5", &[("min", "1"), ("max", "2")]));
    }
}
