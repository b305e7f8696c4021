// vetting-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum DomainError {
    // --- CONFIGURATION ERRORS (load / resolve time) ---
    #[error("Form '{form}' is not defined for locale '{locale}' or any of its fallbacks")]
    #[diagnostic(
        code(vetting::domain::unknown_group),
        help("Declare the form in a formset for this locale or in the default formset.")
    )]
    UnknownGroup { form: String, locale: String },

    #[error("No rule named '{name}' is registered{}", context_suffix(.context))]
    #[diagnostic(
        code(vetting::domain::unknown_rule),
        help("Check the 'depends' list and the global rule declarations.")
    )]
    UnknownRule {
        name: String,
        context: Option<String>,
    },

    #[error("Rule '{0}' is already registered")]
    #[diagnostic(code(vetting::domain::duplicate_rule))]
    DuplicateRule(String),

    #[error(
        "Field '{field}' declares more than one argument for '{binding}' at position {position}"
    )]
    #[diagnostic(
        code(vetting::domain::ambiguous_argument),
        help("Each (rule, position) pair may be overridden only once per field.")
    )]
    AmbiguousArgumentOverride {
        field: String,
        binding: String,
        position: usize,
    },

    #[error("Circular dependency detected involving: {0}")]
    #[diagnostic(
        code(vetting::domain::cycle),
        help("Check the rule 'depends' and the form 'extends' declarations.")
    )]
    CircularDependency(String),

    #[error("Unknown field '{field}' in form '{form}'")]
    #[diagnostic(code(vetting::domain::unknown_field))]
    UnknownField { form: String, field: String },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(vetting::domain::configuration))]
    InvalidConfiguration(String),

    // --- RUN-TIME FAULT (raised by rule logic) ---
    #[error("Rule '{rule}' raised a fault on field '{field}' of form '{form}': {message}")]
    #[diagnostic(
        code(vetting::domain::validation_fault),
        help("The whole run was aborted. Per-field failures are reported in the results instead.")
    )]
    ValidationFault {
        form: String,
        field: String,
        rule: String,
        message: String,
    },
}

impl DomainError {
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        DomainError::UnknownRule {
            name: name.into(),
            context: None,
        }
    }

    /// Configuration errors make the resources unusable. The only other
    /// variant is a fault raised while a run was in progress.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, DomainError::ValidationFault { .. })
    }
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(ctx) => format!(" (referenced by {})", ctx),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rule_message_with_context() {
        let err = DomainError::UnknownRule {
            name: "int".into(),
            context: Some("field 'age' of form 'person'".into()),
        };
        assert_eq!(
            err.to_string(),
            "No rule named 'int' is registered (referenced by field 'age' of form 'person')"
        );
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_fault_is_not_configuration_error() {
        let err = DomainError::ValidationFault {
            form: "f".into(),
            field: "x".into(),
            rule: "r".into(),
            message: "boom".into(),
        };
        assert!(!err.is_configuration_error());
        assert!(err.to_string().ends_with("boom"));
    }
}
