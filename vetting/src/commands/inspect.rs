// vetting/src/commands/inspect.rs
//
// USE CASE: Show how a form resolves for a locale (fields, rules, args).

use std::path::PathBuf;

use vetting_core::domain::form::FieldSpec;

use super::{load, new_table, pick_locale};

pub fn execute(project_dir: PathBuf, form: String, locale: Option<String>) -> anyhow::Result<()> {
    let project = load(&project_dir)?;
    let locale = pick_locale(locale.as_deref(), &project);
    let resolved = project.resources.resolve_form(&locale, &form)?;

    println!("\n🔍 Inspecting Form: '{}' [{}]", resolved.name, locale);

    let mut table = new_table(["Field", "Page", "Rules", "Args"]);
    for field in &resolved.fields {
        let rules = if field.depends().is_empty() {
            "-".to_string()
        } else {
            field.depends().join(", ")
        };
        table.add_row(vec![
            field.key(),
            field.page().to_string(),
            rules,
            describe_args(field),
        ]);
    }
    println!("{table}");
    println!("   {} field(s)", resolved.fields.len());

    Ok(())
}

/// One line per rule that has arguments: `rule: a, b, -`.
fn describe_args(field: &FieldSpec) -> String {
    field
        .depends()
        .iter()
        .filter_map(|rule| {
            let args = field.effective_args(rule);
            if args.iter().all(Option::is_none) {
                return None;
            }
            let keys: Vec<&str> = args
                .iter()
                .map(|a| a.map(|a| a.key.as_str()).unwrap_or("-"))
                .collect();
            Some(format!("{}: {}", rule, keys.join(", ")))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vetting_core::domain::form::Arg;

    #[test]
    fn test_describe_args_applies_overrides() {
        let field = FieldSpec::new("firstName")
            .with_depends("required, maxlength")
            .with_arg(Arg::new("firstName.label").at(0))
            .unwrap()
            .with_arg(Arg::new("10").for_rule("maxlength").at(1).literal())
            .unwrap();

        assert_eq!(
            describe_args(&field),
            "required: firstName.label, -\nmaxlength: firstName.label, 10"
        );
    }

    #[test]
    fn test_describe_args_without_args() {
        let field = FieldSpec::new("nickname").with_depends("required");
        assert_eq!(describe_args(&field), "");
    }
}
