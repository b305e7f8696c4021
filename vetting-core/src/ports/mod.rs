// vetting-core/src/ports/mod.rs

pub mod bean;

pub use bean::{Bean, read_property};
