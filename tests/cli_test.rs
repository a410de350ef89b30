//! CLI Tests for the sheetprompt binary
//!
//! Runs the compiled binary inside a temporary working directory.

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::*;
use std::fs;
use tempfile::TempDir;

fn knowledge_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Admission").unwrap();
    sheet.write_string(0, 0, "Condition").unwrap();
    sheet.write_string(1, 0, "Bac STI2D ou général").unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Options").unwrap();
    sheet.write_string(0, 0, "Contenu").unwrap();
    sheet.write_string(1, 0, "SISR et SLAM").unwrap();

    workbook.save_to_buffer().unwrap()
}

fn sheetprompt(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sheetprompt").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_default_arguments() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("BTS_SIO_Infos.xlsx"), knowledge_workbook()).unwrap();

    sheetprompt(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("ollama create"));

    let modelfile = fs::read_to_string(dir.path().join("Modelfile")).unwrap();
    assert!(modelfile.contains("FROM llama3.2\n"));
    assert!(modelfile.contains("ADMISSION"));
    assert!(modelfile.contains("- SISR et SLAM\n"));

    let debug = fs::read_to_string(dir.path().join("debug_content.txt")).unwrap();
    assert!(modelfile.contains(&debug));
}

#[test]
fn test_positional_arguments() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("infos.xlsx"), knowledge_workbook()).unwrap();

    sheetprompt(&dir)
        .args(["infos.xlsx", "Assistant.modelfile", "mistral"])
        .assert()
        .success();

    let modelfile = fs::read_to_string(dir.path().join("Assistant.modelfile")).unwrap();
    assert!(modelfile.contains("FROM mistral\n"));
    assert!(modelfile.contains("# Source : infos.xlsx\n"));
    assert!(!dir.path().join("Modelfile").exists());
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();

    sheetprompt(&dir)
        .arg("absent.xlsx")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("input file 'absent.xlsx' not found"));

    assert!(!dir.path().join("Modelfile").exists());
    assert!(!dir.path().join("debug_content.txt").exists());
}

#[test]
fn test_corrupt_input() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("corrompu.xlsx"), b"pas un classeur").unwrap();

    sheetprompt(&dir)
        .arg("corrompu.xlsx")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "'corrompu.xlsx' could not be read as a workbook",
        ))
        .stderr(predicate::str::contains("Caused by").not());

    assert!(!dir.path().join("Modelfile").exists());
}

#[test]
fn test_blank_base_model() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("infos.xlsx"), knowledge_workbook()).unwrap();

    sheetprompt(&dir)
        .args(["infos.xlsx", "Modelfile", " "])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"))
        .stderr(predicate::str::contains("Caused by:"))
        .stderr(predicate::str::contains("Base model must not be empty"));

    assert!(!dir.path().join("Modelfile").exists());
}

#[test]
fn test_unwritable_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("infos.xlsx"), knowledge_workbook()).unwrap();

    sheetprompt(&dir)
        .args(["infos.xlsx", "absent/Modelfile"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not write 'absent/Modelfile'"));
}
