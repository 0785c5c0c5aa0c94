//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn timedquiz(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("timedquiz").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("TIMEDQUIZ_BANK")
        .env_remove("RUST_LOG");
    cmd
}

/// Questions with a single choice, so answer `1` is always correct.
fn single_choice_bank(dir: &Path, n: usize) -> String {
    let questions: Vec<String> = (1..=n)
        .map(|i| format!(r#"{{"question": "Question {i}", "answers": ["Only {i}"], "correct": 0}}"#))
        .collect();
    let path = dir.join("bank.json");
    std::fs::write(&path, format!("[{}]", questions.join(","))).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    timedquiz(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("take"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("theme"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn validate_sample_bank() {
    let dir = TempDir::new().unwrap();
    let bank = std::fs::canonicalize("../../banks/general.json").unwrap();
    timedquiz(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 questions"))
        .stdout(predicate::str::contains("Bank valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let bank = single_choice_bank(dir.path(), 2);
    timedquiz(dir.path())
        .args(["validate", "--bank", &bank])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Q1] WARNING: only 1 answer choice"))
        .stdout(predicate::str::contains("2 warning(s) found"));
}

#[test]
fn validate_rejects_bad_answer_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"[{"question": "Q", "answers": ["a", "b"], "correct": 5}]"#,
    )
    .unwrap();

    timedquiz(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("outside 2 answers"));
}

#[test]
fn take_correct_answer_passes() {
    let dir = TempDir::new().unwrap();
    let bank = single_choice_bank(dir.path(), 1);
    timedquiz(dir.path())
        .args(["take", "--bank", &bank, "--count", "1"])
        .write_stdin("1\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 1"))
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Score: 1/1 (100.00%)"))
        .stdout(predicate::str::contains("Result: Pass"))
        .stdout(predicate::str::contains("Your Answer"));
}

#[test]
fn take_no_review_hides_table() {
    let dir = TempDir::new().unwrap();
    let bank = single_choice_bank(dir.path(), 1);
    timedquiz(dir.path())
        .args(["take", "--bank", &bank, "--count", "1", "--no-review"])
        .write_stdin("1\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1/1"))
        .stdout(predicate::str::contains("Your Answer").not());
}

#[test]
fn take_clamps_to_available_questions() {
    let dir = TempDir::new().unwrap();
    let bank = single_choice_bank(dir.path(), 2);
    timedquiz(dir.path())
        .args(["take", "--bank", &bank, "--count", "5"])
        .write_stdin("1\nn\n1\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Only 2 questions available. Starting with 2 questions (5 requested).",
        ))
        .stdout(predicate::str::contains("Question 2 of 2"))
        .stdout(predicate::str::contains("Score: 2/2"));
}

#[test]
fn take_zero_questions_fails_immediately() {
    let dir = TempDir::new().unwrap();
    let bank = single_choice_bank(dir.path(), 1);
    timedquiz(dir.path())
        .args(["take", "--bank", &bank, "--count", "0"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0/0 (0.00%)"))
        .stdout(predicate::str::contains("Result: Fail"));
}

#[test]
fn take_quit_abandons_exam() {
    let dir = TempDir::new().unwrap();
    let bank = single_choice_bank(dir.path(), 3);
    timedquiz(dir.path())
        .args(["take", "--bank", &bank, "--count", "3"])
        .write_stdin("1\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam abandoned"))
        .stdout(predicate::str::contains("Score:").not());
}

#[test]
fn take_restart_after_finish_runs_again() {
    let dir = TempDir::new().unwrap();
    let bank = single_choice_bank(dir.path(), 1);
    let output = timedquiz(dir.path())
        .args(["take", "--bank", &bank, "--count", "1"])
        .write_stdin("1\nn\nr\n1\nn\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Score: 1/1").count(), 2);
}

#[test]
fn take_missing_bank_fails() {
    let dir = TempDir::new().unwrap();
    timedquiz(dir.path())
        .args(["take", "--bank", "missing.json"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("question bank not found"));
}

#[test]
fn take_empty_bank_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("empty.json"), "[]").unwrap();
    timedquiz(dir.path())
        .args(["take", "--bank", "empty.json"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no questions available"));
}

#[test]
fn take_exports_json_report() {
    let dir = TempDir::new().unwrap();
    let bank = single_choice_bank(dir.path(), 1);
    let export = dir.path().join("out").join("result.json");

    timedquiz(dir.path())
        .args(["take", "--bank", &bank, "--count", "1", "--export"])
        .arg(&export)
        .write_stdin("1\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(json["score"], 1);
    assert_eq!(json["total"], 1);
    assert_eq!(json["verdict"], "pass");
    assert_eq!(json["review"][0]["user_choice_text"], "Only 1");
}

#[test]
fn take_rejects_unknown_export_format() {
    let dir = TempDir::new().unwrap();
    let bank = single_choice_bank(dir.path(), 1);
    timedquiz(dir.path())
        .args(["take", "--bank", &bank, "--export", "result.csv"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported export format"));
}

#[test]
fn take_uses_config_file() {
    let dir = TempDir::new().unwrap();
    single_choice_bank(dir.path(), 3);
    std::fs::write(
        dir.path().join("timedquiz.toml"),
        "bank = \"bank.json\"\nquestion_count = 2\n",
    )
    .unwrap();

    timedquiz(dir.path())
        .arg("take")
        .write_stdin("1\nn\n1\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 2 of 2"))
        .stdout(predicate::str::contains("Score: 2/2"));
}

#[test]
fn init_creates_files_once() {
    let dir = TempDir::new().unwrap();

    timedquiz(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created timedquiz.toml"))
        .stdout(predicate::str::contains("Created questions.json"));

    assert!(dir.path().join("timedquiz.toml").exists());

    timedquiz(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));

    timedquiz(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 questions"))
        .stdout(predicate::str::contains("Bank valid"));
}

#[test]
fn theme_toggle_persists() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("prefs.toml");

    timedquiz(dir.path())
        .args(["theme", "--dark", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme set to dark"));
    assert!(std::fs::read_to_string(&config)
        .unwrap()
        .contains("dark_mode = true"));

    timedquiz(dir.path())
        .args(["theme", "--toggle", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme set to light"));

    timedquiz(dir.path())
        .args(["theme", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: light"));
}

#[test]
fn theme_flags_conflict() {
    let dir = TempDir::new().unwrap();
    timedquiz(dir.path())
        .args(["theme", "--dark", "--light"])
        .assert()
        .failure();
}
