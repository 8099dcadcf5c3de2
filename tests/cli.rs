//! End-to-end tests of the `fintrack` binary against a temporary data directory

use assert_cmd::Command;
use predicates::prelude::*;
use secrecy::SecretString;
use tempfile::TempDir;

const WEBHOOK_SECRET: &str = "whsec_integration";

fn fintrack(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fintrack").unwrap();
    cmd.env("FINTRACK_DATA_DIR", dir.path())
        .env("FINTRACK_STRIPE_WEBHOOK_SECRET", WEBHOOK_SECRET)
        .env_remove("FINTRACK_LOG")
        .arg("--no-recurring");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    fintrack(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));
    fintrack(&dir)
        .args(["account", "create", "Checking", "--balance", "1000"])
        .assert()
        .success();
    dir
}

#[test]
fn init_creates_default_categories() {
    let dir = TempDir::new().unwrap();
    fintrack(&dir).arg("init").assert().success();

    assert!(dir.path().join("config.json").exists());
    fintrack(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Salary"));
}

#[test]
fn transactions_move_the_account_balance() {
    let dir = initialized();

    fintrack(&dir)
        .args([
            "txn", "add", "Checking", "42.50", "-D", "Weekly shop", "-c", "Groceries", "-d",
            "2025-03-10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded expense"));

    fintrack(&dir)
        .args(["txn", "add", "Checking", "2000", "-k", "income", "-D", "Payroll", "-d", "2025-03-01"])
        .assert()
        .success();

    fintrack(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$2957.50"));

    fintrack(&dir)
        .args(["txn", "list", "--kind", "expense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Weekly shop"))
        .stdout(predicate::str::contains("Payroll").not());
}

#[test]
fn unknown_account_is_an_error() {
    let dir = initialized();

    fintrack(&dir)
        .args(["txn", "add", "Savings", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Savings"));
}

#[test]
fn materialize_does_not_duplicate_charges() {
    let dir = initialized();

    fintrack(&dir)
        .args([
            "sub", "add", "Streaming", "15.99", "-a", "Checking", "-s", "2025-01-05",
        ])
        .assert()
        .success();

    fintrack(&dir)
        .args(["sub", "materialize", "--date", "2025-03-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 3 charge(s)"));

    fintrack(&dir)
        .args(["sub", "materialize", "--date", "2025-03-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No subscription charges due."));

    fintrack(&dir)
        .args(["txn", "list", "--search", "Streaming"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-05"))
        .stdout(predicate::str::contains("2025-03-05"))
        .stdout(predicate::str::contains("2025-04-05").not());
}

#[test]
fn export_transactions_as_csv() {
    let dir = initialized();
    fintrack(&dir)
        .args(["txn", "add", "Checking", "9.99", "-D", "Coffee beans", "-d", "2025-02-02"])
        .assert()
        .success();

    let out = dir.path().join("transactions.csv");
    fintrack(&dir)
        .args(["export", "-f", "csv", "-t", "transactions", "-o"])
        .arg(&out)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&out).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("date,account,description,category,kind,amount,source")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("2025-02-02,Checking,Coffee beans"));
    assert!(row.contains("-9.99"));
}

#[test]
fn import_skips_duplicates_on_second_run() {
    let dir = initialized();
    let statement = dir.path().join("bank.csv");
    std::fs::write(
        &statement,
        "Date,Description,Amount\n2025-02-01,Corner Store,-12.40\n2025-02-03,Refund,30.00\n",
    )
    .unwrap();

    fintrack(&dir)
        .args(["import", "-a", "Checking"])
        .arg(&statement)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 transaction(s)"));

    fintrack(&dir)
        .args(["import", "-a", "Checking"])
        .arg(&statement)
        .assert()
        .success()
        .stdout(predicate::str::contains("No new transactions to import."));
}

#[test]
fn webhook_with_bad_signature_changes_nothing() {
    let dir = initialized();
    let payload = dir.path().join("event.json");
    std::fs::write(
        &payload,
        r#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"customer":"cus_1"}}}"#,
    )
    .unwrap();

    let now = chrono::Utc::now().timestamp();
    fintrack(&dir)
        .args(["billing", "webhook", "--signature"])
        .arg(format!("t={},v1={}", now, "00".repeat(32)))
        .arg("--payload")
        .arg(&payload)
        .assert()
        .failure()
        .stderr(predicate::str::contains("signature does not match"));

    fintrack(&dir)
        .args(["billing", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("free"));
}

#[test]
fn signed_webhook_activates_the_plan() {
    let dir = initialized();
    let body = r#"{"id":"evt_2","type":"checkout.session.completed","data":{"object":{"customer":"cus_9","subscription":"sub_9"}}}"#;
    let payload = dir.path().join("event.json");
    std::fs::write(&payload, body).unwrap();

    let secret = SecretString::new(WEBHOOK_SECRET.to_string());
    let header =
        fintrack::billing::webhook::sign(body, &secret, chrono::Utc::now().timestamp()).unwrap();

    fintrack(&dir)
        .args(["billing", "webhook", "--signature", &header, "--payload"])
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("plan is now active"));

    fintrack(&dir)
        .args(["billing", "webhook", "--signature", &header, "--payload"])
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("already processed"));

    fintrack(&dir)
        .args(["billing", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cus_9"));
}

#[test]
fn config_set_rejects_unknown_keys() {
    let dir = initialized();

    fintrack(&dir)
        .args(["config", "set", "budget_warning_percent", "90"])
        .assert()
        .success();
    fintrack(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("budget_warning_percent: 90"));

    fintrack(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure();
}
