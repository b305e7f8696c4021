// vetting-core/src/domain/mod.rs

pub mod error;
pub mod form;
pub mod graph;
pub mod locale;
pub mod results;
pub mod rules;
pub mod value;

pub use error::DomainError;
pub use locale::Locale;
pub use value::FieldValue;
