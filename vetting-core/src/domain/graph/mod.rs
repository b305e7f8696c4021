// vetting-core/src/domain/graph/mod.rs

pub mod dag;
pub mod dependency;

pub use dag::GraphSolver;
pub use dependency::{DependencyResolver, RuleState};
