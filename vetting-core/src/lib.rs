// vetting-core/src/lib.rs

// 1. Documentation is encouraged but not enforced yet
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// How the engine reads properties off caller-supplied objects.
pub mod ports;

// 2. Domain (Business core)
// Rules, forms, locales, dependency graph, results.
// Depends on nothing else (no infra, no app).
pub mod domain;

// 3. Infrastructure (Adapters)
// YAML rule files, project config, discovery.
// Depends on Domain and Ports.
pub mod infrastructure;

// 4. Application (Use Cases)
// Frozen resources and the validation engine.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use application::{
    LoadedProject, ResourcesBuilder, ValidationEngine, ValidationOptions, ValidatorResources, load_project,
};
pub use domain::results::{FieldResult, ResultAggregate, ValidationOutcome};
pub use domain::rules::{Context, LogicCatalog, RuleCall, RuleDefinition, RuleFault, RuleLogic};
pub use domain::{DomainError, FieldValue, Locale};
pub use error::VettingError;
pub use ports::bean::Bean;
