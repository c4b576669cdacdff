use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use invex_core::PROCESSING_FAILED_MESSAGE;
use tempfile::TempDir;

const RECORD: &str = r#"{
  "invoiceNumber": "INV-7",
  "date": "2025-03-01",
  "vendorName": "Acme",
  "currency": "SAR",
  "totalAmount": 90,
  "items": [
    {
      "redCode": "00123",
      "lvTyUc": "",
      "supplierRef": "SR-9",
      "fam": "F1",
      "vat": 0,
      "descriptionEn": "Bolt \"M8\"",
      "descriptionAr": "برغي",
      "quantity": 3,
      "unitPrice": 30,
      "total": 90
    }
  ]
}"#;

fn invex() -> Command {
    let mut cmd = Command::cargo_bin("invex").unwrap();
    cmd.env_remove("GEMINI_API_KEY").env_remove("API_KEY");
    cmd
}

fn workspace() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    let config = config.to_string_lossy().into_owned();
    (dir, config)
}

#[test]
fn export_to_stdout_prints_csv() {
    let (dir, config) = workspace();
    let record = dir.path().join("record.json");
    fs::write(&record, RECORD).unwrap();

    invex()
        .args(["--config", &config, "export", "--stdout"])
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "\u{FEFF}Red Code,LV TY UC,Supplier REF,FAM,VAT",
        ))
        .stdout(predicate::str::contains(
            r#"="00123",,="SR-9",="F1",0,"Bolt ""M8""","برغي",3,30,90"#,
        ));
}

#[test]
fn export_writes_dated_file() {
    let (dir, config) = workspace();
    let record = dir.path().join("record.json");
    fs::write(&record, RECORD).unwrap();
    let out = dir.path().join("out");

    invex()
        .args(["--config", &config, "export", "-o"])
        .arg(&out)
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let name = format!("invoice_extract_{}.csv", chrono_today());
    let content = fs::read_to_string(out.join(name)).unwrap();
    assert!(content.starts_with('\u{FEFF}'));
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn export_rejects_invalid_record() {
    let (dir, config) = workspace();
    let record = dir.path().join("record.json");
    fs::write(&record, r#"{"vendorName": "Acme"}"#).unwrap();

    invex()
        .args(["--config", &config, "export", "--stdout"])
        .arg(&record)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid invoice record"));
}

#[test]
fn process_missing_file_fails() {
    let (dir, config) = workspace();

    invex()
        .args(["--config", &config, "process"])
        .arg(dir.path().join("nope.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_rejects_unsupported_file() {
    let (dir, config) = workspace();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "hello").unwrap();

    invex()
        .args(["--config", &config, "process"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file"));
}

#[test]
fn process_without_api_key_shows_generic_error() {
    let (dir, config) = workspace();
    let input = dir.path().join("scan.png");
    fs::write(&input, b"\x89PNG\r\n\x1a\nnot really").unwrap();

    invex()
        .args(["--config", &config, "process"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains(PROCESSING_FAILED_MESSAGE));
}

#[test]
fn config_path_reports_location() {
    let (_dir, config) = workspace();

    invex()
        .args(["--config", &config, "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file:"))
        .stdout(predicate::str::contains("exists"));
}

#[test]
fn config_set_then_get() {
    let (_dir, config) = workspace();

    invex()
        .args(["--config", &config, "config", "set", "extraction.model", "gemini-test"])
        .assert()
        .success();

    invex()
        .args(["--config", &config, "config", "get", "extraction.model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"gemini-test\""));
}

fn chrono_today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
