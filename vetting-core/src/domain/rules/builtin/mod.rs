// vetting-core/src/domain/rules/builtin/mod.rs

//! Built-in rule leaves.
//!
//! Every leaf except `required` lets blank input through: presence is the
//! job of `required`, the other leaves only check what is there. Type
//! converters (`byte` .. `double`, `date`) are producers and hand back the
//! parsed value.

pub mod format;
pub mod generic;
pub mod types;

use crate::domain::rules::catalog::LogicCatalog;
use crate::domain::rules::definition::{RuleDefinition, RuleLogic};

pub(crate) fn install(catalog: &mut LogicCatalog) {
    catalog
        .register("required", RuleLogic::predicate(generic::required))
        .register("minlength", RuleLogic::predicate(generic::min_length))
        .register("maxlength", RuleLogic::predicate(generic::max_length))
        .register("mask", RuleLogic::predicate(generic::mask))
        .register("byte", RuleLogic::producer(types::byte))
        .register("short", RuleLogic::producer(types::short))
        .register("integer", RuleLogic::producer(types::integer))
        .register("int", RuleLogic::producer(types::integer))
        .register("long", RuleLogic::producer(types::long))
        .register("float", RuleLogic::producer(types::float))
        .register("double", RuleLogic::producer(types::double))
        .register("date", RuleLogic::producer(types::date))
        .register("intRange", RuleLogic::predicate(types::int_range))
        .register("floatRange", RuleLogic::predicate(types::float_range))
        .register("email", RuleLogic::predicate(format::email))
        .register("url", RuleLogic::predicate(format::url))
        .register("creditCard", RuleLogic::predicate(format::credit_card));
}

/// One rule per built-in leaf, named after it, without prerequisites.
/// Messages default to `errors.<name>`.
pub fn standard_rules() -> Vec<RuleDefinition> {
    let catalog = LogicCatalog::builtin();
    catalog
        .names()
        .filter_map(|name| {
            catalog.get(name).map(|logic| {
                RuleDefinition::new(name, logic.clone()).with_message(format!("errors.{}", name))
            })
        })
        .collect()
}
