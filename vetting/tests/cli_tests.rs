use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// A private copy of the demo project, so tests may edit it.
struct VettingTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl VettingTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .context("Workspace root not found")?
            .join("demos/name_form");

        let dest = tmp.path().join("name_form");
        Self::copy_dir(&project_root, &dest)?;

        Ok(Self { _tmp: tmp, root: dest })
    }

    fn copy_dir(src: &PathBuf, dst: &PathBuf) -> std::io::Result<()> {
        let mut options = fs_extra::dir::CopyOptions::new();
        options.content_only = true;

        std::fs::create_dir_all(dst)?;
        fs_extra::dir::copy(src, dst, &options)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    fn vetting(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vetting"));
        cmd.current_dir(&self.root);
        cmd.env_remove("VETTING_DEFAULT_LOCALE").env_remove("VETTING_RULE_PATHS");
        cmd
    }

    fn validate(&self, form: &str, bean: &str) -> Command {
        let mut cmd = self.vetting();
        cmd.args(["validate", "--form", form, "--bean", bean]);
        cmd
    }
}

fn json_output(output: &std::process::Output) -> Result<serde_json::Value> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn test_valid_bean_succeeds() -> Result<()> {
    let env = VettingTestEnv::new()?;

    env.validate("nameForm", "beans/ada.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Project: name_form (v1.0.0)"))
        .stdout(predicate::str::contains("PASSED"))
        .stdout(predicate::str::contains("VALID!"));
    Ok(())
}

#[test]
fn test_failures_exit_with_one() -> Result<()> {
    let env = VettingTestEnv::new()?;

    env.validate("nameForm", "beans/broken.json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("INVALID. 5 rule(s) failed."));
    Ok(())
}

#[test]
fn test_json_report() -> Result<()> {
    let env = VettingTestEnv::new()?;

    let output = env
        .validate("nameForm", "beans/broken.json")
        .args(["--format", "json"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let report = json_output(&output)?;
    assert_eq!(report["form"], "nameForm");
    let age = &report["fields"][4];
    assert_eq!(age["key"], "age");
    assert_eq!(age["outcomes"][0]["rule"], "int");
    assert_eq!(age["outcomes"][0]["passed"], true);
    assert_eq!(age["outcomes"][0]["produced"], 12);
    assert_eq!(age["outcomes"][1]["rule"], "intRange");
    assert_eq!(age["outcomes"][1]["passed"], false);
    Ok(())
}

#[test]
fn test_only_failures_report() -> Result<()> {
    let env = VettingTestEnv::new()?;

    let output = env
        .validate("nameForm", "beans/broken.json")
        .args(["--format", "json", "--only-failures"])
        .output()?;
    let report = json_output(&output)?;
    let fields = report["fields"].as_array().context("fields is not an array")?;

    let keys: Vec<&str> = fields.iter().filter_map(|f| f["key"].as_str()).collect();
    assert_eq!(keys, vec!["firstName", "lastName", "email", "zip", "age"]);
    for field in fields {
        let outcomes = field["outcomes"].as_array().context("outcomes is not an array")?;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0]["passed"], false);
    }
    Ok(())
}

#[test]
fn test_page_and_field_selection() -> Result<()> {
    let env = VettingTestEnv::new()?;

    let output = env
        .validate("nameForm", "beans/broken.json")
        .args(["--format", "json", "--page", "0"])
        .output()?;
    let report = json_output(&output)?;
    let fields = report["fields"].as_array().context("fields is not an array")?;
    assert_eq!(fields.len(), 4);
    assert!(fields.iter().all(|f| f["key"] != "age"));

    env.validate("nameForm", "beans/ada.json")
        .args(["--field", "age", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("intRange"))
        .stdout(predicate::str::contains("firstName").not());
    Ok(())
}

#[test]
fn test_locale_changes_the_rules() -> Result<()> {
    let env = VettingTestEnv::new()?;

    // The fr tier caps lastName at 5 characters
    env.validate("nameForm", "beans/ada.json")
        .args(["--locale", "fr_CA"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Form: nameForm [fr_CA]"));

    env.validate("nameForm", "beans/ada.json")
        .env("VETTING_DEFAULT_LOCALE", "fr")
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn test_indexed_field_stops_at_first_bad_element() -> Result<()> {
    let env = VettingTestEnv::new()?;

    let output = env
        .validate("orderForm", "beans/order.json")
        .args(["--format", "json"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let report = json_output(&output)?;
    let keys: Vec<&str> = report["fields"]
        .as_array()
        .context("fields is not an array")?
        .iter()
        .filter_map(|f| f["key"].as_str())
        .collect();
    assert_eq!(keys, vec!["lines[0].qty", "lines[1].qty"]);
    Ok(())
}

#[test]
fn test_unknown_form_is_a_configuration_error() -> Result<()> {
    let env = VettingTestEnv::new()?;

    env.validate("ghostForm", "beans/ada.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("CONFIGURATION ERROR"))
        .stderr(predicate::str::contains("ghostForm"));
    Ok(())
}

#[test]
fn test_unknown_logic_binding_fails_loading() -> Result<()> {
    let env = VettingTestEnv::new()?;
    std::fs::write(
        env.root.join("rules/20_custom.yml"),
        "global:\n  rules:\n    - { name: positive, logic: positiveNumber }\n",
    )?;

    env.vetting()
        .arg("rules")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load project"))
        .stderr(predicate::str::contains("positiveNumber"));
    Ok(())
}

#[test]
fn test_missing_bean_file() -> Result<()> {
    let env = VettingTestEnv::new()?;

    env.validate("nameForm", "beans/ghost.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read bean"));
    Ok(())
}

#[test]
fn test_rules_listing() -> Result<()> {
    let env = VettingTestEnv::new()?;

    env.vetting()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("intRange"))
        .stdout(predicate::str::contains("errors.range"))
        .stdout(predicate::str::contains("7 rule(s)"));
    Ok(())
}

#[test]
fn test_inspect_shows_effective_args() -> Result<()> {
    let env = VettingTestEnv::new()?;

    env.vetting()
        .args(["inspect", "--form", "nameForm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("maxlength: nameForm.firstname.displayname, 10"))
        .stdout(predicate::str::contains("5 field(s)"));

    env.vetting()
        .args(["inspect", "--form", "nameForm", "--locale", "fr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("required, maxlength"));
    Ok(())
}
