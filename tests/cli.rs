//! End-to-end tests of the vestline binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SHAREHOLDER: &str = "7d9f8a52-3c41-4e0b-9a7e-2f1c6d5b8e90";
const SHARE_CLASS: &str = "0b6e2c1a-94d3-4f7e-8a25-c3d1e0f9b742";
const PASSPHRASE: &str = "cli-test-vault-passphrase";

fn vestline(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vestline").unwrap();
    cmd.env("VESTLINE_DATA_DIR", data_dir.path())
        .env_remove("VESTLINE_ROLE")
        .env_remove("VESTLINE_USER")
        .env_remove("VESTLINE_DOCUMENT_KEY");
    cmd
}

fn create_grant(data_dir: &TempDir) {
    vestline(data_dir)
        .args([
            "--role",
            "admin_edit",
            "grant",
            "create",
            "--shareholder",
            SHAREHOLDER,
            "--share-class",
            SHARE_CLASS,
            "--units",
            "4800",
            "--grant-date",
            "2024-01-15",
            "--today",
            "2025-03-20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vesting events: 37"))
        .stdout(predicate::str::contains("First vesting: 1200 units on 2025-01-15"));
}

fn enable_sweeps(data_dir: &TempDir) {
    std::fs::write(
        data_dir.path().join("config.json"),
        r#"{"vesting": {"enable_auto_vesting": true, "enable_pre_vest_notifications": true}}"#,
    )
    .unwrap();
}

#[test]
fn test_init_creates_layout() {
    let dir = TempDir::new().unwrap();
    vestline(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("vesting.json").exists());
    assert!(dir.path().join("documents").is_dir());
}

#[test]
fn test_grant_create_and_summary() {
    let dir = TempDir::new().unwrap();
    create_grant(&dir);

    vestline(&dir)
        .args(["grant", "summary", SHAREHOLDER])
        .assert()
        .success()
        .stdout(predicate::str::contains("Granted:       4800"))
        .stdout(predicate::str::contains("Vested:        1400"))
        .stdout(predicate::str::contains("100 units on 2025-04-15"));

    vestline(&dir)
        .args(["grant", "list", "--shareholder", SHAREHOLDER])
        .assert()
        .success()
        .stdout(predicate::str::contains("active"));
}

#[test]
fn test_grant_create_requires_editor() {
    let dir = TempDir::new().unwrap();
    vestline(&dir)
        .args([
            "--role",
            "admin_view",
            "grant",
            "create",
            "--shareholder",
            SHAREHOLDER,
            "--share-class",
            SHARE_CLASS,
            "--units",
            "100",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized"));
}

#[test]
fn test_default_role_cannot_edit() {
    let dir = TempDir::new().unwrap();
    vestline(&dir)
        .args([
            "grant",
            "create",
            "--shareholder",
            SHAREHOLDER,
            "--share-class",
            SHARE_CLASS,
            "--units",
            "100",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized"));

    let source = dir.path().join("letter.pdf");
    std::fs::write(&source, b"%PDF-1.7").unwrap();
    vestline(&dir)
        .env("VESTLINE_DOCUMENT_KEY", PASSPHRASE)
        .args(["document", "upload"])
        .arg(&source)
        .args(["--title", "Letter", "--type", "quarterly_letter"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized"));
}

#[test]
fn test_unknown_frequency_rejected() {
    let dir = TempDir::new().unwrap();
    vestline(&dir)
        .args([
            "--role",
            "admin_edit",
            "grant",
            "create",
            "--shareholder",
            SHAREHOLDER,
            "--share-class",
            SHARE_CLASS,
            "--units",
            "100",
            "--frequency",
            "weekly",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_preview_shows_cliff_catch_up() {
    let dir = TempDir::new().unwrap();
    vestline(&dir)
        .args([
            "grant", "preview", "--units", "4800", "--start", "2024-01-15", "--today",
            "2024-01-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-15"))
        .stdout(predicate::str::contains("1200"))
        .stdout(predicate::str::contains("2028-01-15"));
}

#[test]
fn test_sweep_disabled_by_default() {
    let dir = TempDir::new().unwrap();
    create_grant(&dir);

    vestline(&dir)
        .args(["sweep", "daily", "--date", "2025-04-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vesting: disabled in settings"));

    assert!(!dir.path().join("outbox.jsonl").exists());
}

#[test]
fn test_sweep_notifies_once() {
    let dir = TempDir::new().unwrap();
    create_grant(&dir);
    enable_sweeps(&dir);

    vestline(&dir)
        .args(["sweep", "vesting", "--date", "2025-04-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Vesting (2025-04-15): 1 due, 1 notified, 1 realized",
        ));

    vestline(&dir)
        .args(["sweep", "vesting", "--date", "2025-04-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 due, 0 notified"));

    let outbox = std::fs::read_to_string(dir.path().join("outbox.jsonl")).unwrap();
    assert_eq!(outbox.lines().count(), 1);
    assert!(outbox.contains("RSU Vested: 100 units"));
}

#[test]
fn test_pre_vest_sweep() {
    let dir = TempDir::new().unwrap();
    create_grant(&dir);
    enable_sweeps(&dir);

    vestline(&dir)
        .args(["sweep", "pre-vest", "--date", "2025-04-08"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pre-vest (2025-04-15): 1 due, 1 notified"));

    let outbox = std::fs::read_to_string(dir.path().join("outbox.jsonl")).unwrap();
    assert!(outbox.contains("Upcoming RSU Vesting: 100 units on 2025-04-15"));
}

#[test]
fn test_document_upload_and_download() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Q3 letter.pdf");
    std::fs::write(&source, b"%PDF-1.7 third quarter letter").unwrap();

    let output = vestline(&dir)
        .env("VESTLINE_DOCUMENT_KEY", PASSPHRASE)
        .args(["--role", "admin_edit", "document", "upload"])
        .arg(&source)
        .args(["--title", "Q3 Letter", "--type", "quarterly_letter"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let id = stdout
        .lines()
        .find_map(|l| l.strip_prefix("Uploaded document: "))
        .unwrap()
        .trim()
        .to_string();

    let outbox = std::fs::read_to_string(dir.path().join("outbox.jsonl")).unwrap();
    assert!(outbox.contains("New Document Available: Q3 Letter"));

    let target = dir.path().join("out.pdf");
    vestline(&dir)
        .env("VESTLINE_DOCUMENT_KEY", PASSPHRASE)
        .args(["--role", "shareholder", "document", "download", &id, "--output"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("application/pdf"));

    assert_eq!(
        std::fs::read(&target).unwrap(),
        b"%PDF-1.7 third quarter letter"
    );

    vestline(&dir)
        .env("VESTLINE_DOCUMENT_KEY", "wrong-passphrase")
        .args(["document", "download", &id, "--output"])
        .arg(dir.path().join("bad.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Integrity check failed"));
}

#[test]
fn test_board_document_hidden_from_shareholders() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("minutes.docx");
    std::fs::write(&source, b"board minutes").unwrap();

    vestline(&dir)
        .env("VESTLINE_DOCUMENT_KEY", PASSPHRASE)
        .args(["--role", "admin_edit", "document", "upload"])
        .arg(&source)
        .args([
            "--title",
            "March minutes",
            "--type",
            "board_minutes",
            "--access",
            "board",
        ])
        .assert()
        .success();

    assert!(!dir.path().join("outbox.jsonl").exists());

    vestline(&dir)
        .args(["--role", "shareholder", "document", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No documents found."));

    vestline(&dir)
        .args(["--role", "board_member", "document", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("March minutes"));
}
