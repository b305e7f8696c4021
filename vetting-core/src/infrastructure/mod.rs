// vetting-core/src/infrastructure/mod.rs

pub mod config;
pub mod discovery;
pub mod error;
