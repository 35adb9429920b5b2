use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn schemas_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../schemas")
}

fn regbook() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_regbook"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_register(dir: &Path, requirements: &str, evidences: &str) -> PathBuf {
    let register = dir.join("register");
    fs::create_dir_all(&register).unwrap();
    fs::write(register.join("Requirements.csv"), requirements).unwrap();
    fs::write(register.join("Evidences.csv"), evidences).unwrap();
    register
}

#[test]
fn wrong_argument_count_prints_usage() {
    let output = regbook().args(["only-one"]).output().expect("run regbook");
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Usage: regbook"), "stdout={stdout}");
}

#[test]
fn generates_tree_from_csv_register() {
    let dir = tempfile::tempdir().unwrap();
    let register = write_register(
        dir.path(),
        "Requirement ID,Title,Category,SATRE\nR1,X,Governance,S-1\n",
        "Evidence ID,Title,Related Requirement ID(s)\nE1,Log,R1\n",
    );
    let out = dir.path().join("docs");

    let output = regbook()
        .arg(&register)
        .arg(schemas_dir().join("requirement.schema.json"))
        .arg(schemas_dir().join("evidence.schema.json"))
        .arg(&out)
        .output()
        .expect("run regbook");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stdout={stdout}\nstderr={stderr}");
    assert!(stdout.contains("JSON repository successfully generated"));

    let r1: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("requirements/R1.json")).unwrap())
            .unwrap();
    assert_eq!(
        r1["Framework Mappings"][0],
        serde_json::json!({"frameworkId": "SATRE", "mapping": "S-1"})
    );
    assert!(out.join("indexes/by-category.json").is_file());
    assert!(out.join("indexes/index.json").is_file());
}

#[test]
fn failure_exits_nonzero_and_names_record() {
    let dir = tempfile::tempdir().unwrap();
    let register = write_register(
        dir.path(),
        "Requirement ID,Title,Category\nR9,X,Astrology\n",
        "Evidence ID,Title,Related Requirement ID(s)\n",
    );

    let output = regbook()
        .arg(&register)
        .arg(schemas_dir().join("requirement.schema.json"))
        .arg(schemas_dir().join("evidence.schema.json"))
        .arg(dir.path().join("docs"))
        .output()
        .expect("run regbook");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("R9"), "stderr={stderr}");
}

#[test]
fn check_mode_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let register = write_register(
        dir.path(),
        "Requirement ID,Title\nR1,X\n",
        "Evidence ID,Title,Related Requirement ID(s)\n",
    );
    let out = dir.path().join("docs");

    let output = regbook()
        .arg("--check")
        .arg(&register)
        .arg(schemas_dir().join("requirement.schema.json"))
        .arg(schemas_dir().join("evidence.schema.json"))
        .arg(&out)
        .output()
        .expect("run regbook");
    assert!(output.status.success());
    assert!(!out.exists());
}
