// vetting-core/src/application/mod.rs

pub mod engine;
pub mod project;
pub mod resources;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write `use vetting_core::application::{ResourcesBuilder, ValidationEngine};`
// without knowing the file layout.

pub use engine::{ValidationEngine, ValidationOptions};
pub use project::{LoadedProject, load_project};
pub use resources::{ResourcesBuilder, ValidatorResources};
