// vetting-core/src/domain/rules/mod.rs

pub mod builtin;
pub mod catalog;
pub mod definition;
pub mod registry;

pub use catalog::LogicCatalog;
pub use definition::{
    Context, InvocationKind, PredicateFn, ProducerFn, RuleCall, RuleDefinition, RuleFault, RuleLogic,
    Verdict,
};
pub use registry::RuleRegistry;
