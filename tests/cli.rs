use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const HEADER: &str = "Date,ID,Tag,Name,Amount,Type,Category,Source\n";

fn txmerge(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("txmerge").unwrap();
    cmd.env("HOME", home).env("RUST_LOG", "warn");
    cmd
}

fn seed(data_dir: &Path) {
    std::fs::create_dir_all(data_dir.join("Debit")).unwrap();
    std::fs::create_dir_all(data_dir.join("Credit")).unwrap();
    std::fs::write(
        data_dir.join("Debit").join("checking.csv"),
        format!(
            "{HEADER}\
2025-03-02,1.5E+3,Rent,Landlord,-1200.00,expense,Housing,bank
2025-03-15,2001,Payroll,Acme,3000.00,income,Salary,bank
2025-03-20,2002,AUTOMATIC PAYMENT THANK YOU,Card,450.00,expense,Card,bank
"
        ),
    )
    .unwrap();
    std::fs::write(
        data_dir.join("Credit").join("card.csv"),
        format!(
            "{HEADER}\
2025-04-01,3001,Streaming,NETFLIX.COM,15.49,expense,Fun,card
2025-04-03,XK9,Coffee,Bean Co,4.25,expense,Food,card
"
        ),
    )
    .unwrap();
}

#[test]
fn test_run_writes_ledger_and_log() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed(data.path());

    txmerge(home.path())
        .args(["run", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("5 loaded, 4 written"));

    let ledger =
        std::fs::read_to_string(data.path().join("Result").join("combined_transactions.csv")).unwrap();
    assert!(ledger.contains("2025-03-02,1500,Rent,Landlord,1200.00,expense,Housing,DEBIT"));
    assert!(ledger.contains("2025-04-03,0,Coffee XK9,Bean Co,4.25,expense,Food,CREDIT"));
    assert!(!ledger.contains("AUTOMATIC PAYMENT"));

    let log = std::fs::read_to_string(data.path().join("log.txt")).unwrap();
    assert!(log.contains("Skipped AUTOMATIC PAYMENT entry"));
    assert!(log.contains("Expanded scientific ID '1.5E+3' to '1500'"));
}

#[test]
fn test_run_with_summary_and_ignores() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed(data.path());
    std::fs::create_dir_all(data.path().join("Config")).unwrap();
    std::fs::write(data.path().join("Config").join("ignores.txt"), "# subs\nnetflix\n").unwrap();

    txmerge(home.path())
        .args(["run", "--summary", "--starting-balance", "-200", "--data-dir"])
        .arg(data.path())
        .assert()
        .success();

    let summary = std::fs::read_to_string(
        data.path().join("Result").join("combined_transactions_with_summary.csv"),
    )
    .unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines[0], "Group,Category,Expense,Income,Net,Net_With_Starting_Balance");
    assert!(lines.contains(&"ALL,TOTAL,1204.25,3000.00,1795.75,1595.75"), "{summary}");
    assert!(lines.contains(&"2025-04,TOTAL,4.25,0.00,-4.25,-204.25"), "{summary}");
    assert!(!summary.contains("Fun"));

    let log = std::fs::read_to_string(data.path().join("log.txt")).unwrap();
    assert!(log.contains("Ignored 1 transactions due to ignores.txt patterns"));
}

#[test]
fn test_read_prints_ledger() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed(data.path());

    txmerge(home.path())
        .args(["run", "--data-dir"])
        .arg(data.path())
        .assert()
        .success();

    txmerge(home.path())
        .args(["read", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Date,ID,Tag,Name,Amount,Type,Category,Source"));
}

#[test]
fn test_read_without_ledger_fails() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();

    txmerge(home.path())
        .args(["read", "--data-dir"])
        .arg(data.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No combined ledger"));
}

#[test]
fn test_init_creates_layout_and_settings() {
    let home = tempfile::tempdir().unwrap();
    let data = home.path().join("books");

    txmerge(home.path())
        .args(["init", "--data-dir"])
        .arg(&data)
        .assert()
        .success();

    assert!(data.join("Debit").is_dir());
    assert!(data.join("Credit").is_dir());
    assert!(data.join("Config").join("ignores.txt").is_file());
    let settings =
        std::fs::read_to_string(home.path().join(".config").join("txmerge").join("settings.json")).unwrap();
    assert!(settings.contains("books"));
}

#[test]
fn test_summary_prints_table() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed(data.path());

    txmerge(home.path())
        .args(["summary", "--month", "2025-03", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Housing"))
        .stdout(predicate::str::contains("$3,000.00"));

    assert!(!data.path().join("Result").exists());
}

#[test]
fn test_run_uses_saved_settings() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed(data.path());
    let config_dir = home.path().join(".config").join("txmerge");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("settings.json"),
        format!(
            r#"{{"data_dir": {:?}, "starting_balance": "100", "summary": true}}"#,
            data.path().to_string_lossy()
        ),
    )
    .unwrap();

    txmerge(home.path()).arg("run").assert().success();

    let summary = std::fs::read_to_string(
        data.path().join("Result").join("combined_transactions_with_summary.csv"),
    )
    .unwrap();
    assert!(summary.contains("ALL,TOTAL,1219.74,3000.00,1780.26,1880.26"), "{summary}");
}
