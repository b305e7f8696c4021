// vetting-core/src/domain/form/mod.rs

pub mod arg;
pub mod field;
pub mod formset;
pub mod source;
pub mod store;

pub use arg::{Arg, ArgTable};
pub use field::{FieldSpec, Msg, Var, parse_depends};
pub use formset::{Form, FormSet};
pub use source::ConfigSource;
pub use store::{ResolvedForm, RuleSetStore};
