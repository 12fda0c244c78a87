use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn regsync(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("regsync").unwrap();
    cmd.env("REGSYNC_CONFIG", temp.path().join("config.toml"));
    cmd
}

fn leftovers(dir: &Path, name: &str) -> usize {
    let prefix = format!("{name}.");
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
        .count()
}

#[test]
fn write_replaces_file_from_stdin() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("hosts.conf");

    regsync(&temp)
        .arg("write")
        .arg(&dest)
        .write_stdin("a\nb\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 line(s)"));
    regsync(&temp)
        .arg("write")
        .arg(&dest)
        .write_stdin("c\n")
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "c\n");
    assert_eq!(leftovers(temp.path(), "hosts.conf"), 0);
}

#[test]
fn write_reads_input_file() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("dump.txt");
    let dest = temp.path().join("passwd");
    std::fs::write(&input, "root:x:0:0\nalice:x:1000:1000").unwrap();

    regsync(&temp)
        .arg("write")
        .arg(&dest)
        .arg("--input")
        .arg(&input)
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&dest).unwrap(),
        "root:x:0:0\nalice:x:1000:1000"
    );
}

#[test]
fn write_empty_input_creates_empty_file() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("empty");

    regsync(&temp)
        .arg("write")
        .arg(&dest)
        .write_stdin("")
        .assert()
        .success();

    assert_eq!(std::fs::read(&dest).unwrap(), b"");
}

#[test]
fn write_size_guard_keeps_old_content() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("group");
    std::fs::write(&dest, "x\n".repeat(50)).unwrap();

    regsync(&temp)
        .arg("write")
        .arg(&dest)
        .args(["--max-change", "20"])
        .write_stdin("x\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to replace"));

    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "x\n".repeat(50));
    assert_eq!(leftovers(temp.path(), "group"), 0);
}

#[test]
fn write_size_guard_from_config() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("config.toml"),
        "[writer]\nmax_change_percent = 20\n",
    )
    .unwrap();
    let dest = temp.path().join("group");
    std::fs::write(&dest, "x\n".repeat(50)).unwrap();

    regsync(&temp)
        .arg("write")
        .arg(&dest)
        .write_stdin("x\n")
        .assert()
        .failure();

    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "x\n".repeat(50));
}

#[test]
fn write_skip_equal_reports_unchanged() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("aliases");
    std::fs::write(&dest, "same\n").unwrap();

    regsync(&temp)
        .arg("write")
        .arg(&dest)
        .arg("--skip-equal")
        .write_stdin("same\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));
}

#[test]
fn write_missing_parent_needs_create_dirs() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("exports/ldap/people.ldif");

    regsync(&temp)
        .arg("write")
        .arg(&dest)
        .write_stdin("dn: uid=alice\n")
        .assert()
        .failure();
    assert!(!dest.exists());

    regsync(&temp)
        .arg("write")
        .arg(&dest)
        .arg("--create-dirs")
        .write_stdin("dn: uid=alice\n")
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "dn: uid=alice\n");
}

#[test]
fn categories_json_lists_taxonomy() {
    let temp = TempDir::new().unwrap();

    let output = regsync(&temp)
        .args(["categories", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 7);

    let login = entries.iter().find(|e| e["name"] == "LoginError").unwrap();
    assert_eq!(login["parents"], serde_json::json!(["ServerError"]));
    assert_eq!(login["description"], "Could not log in to the remote server.");
}

#[test]
fn categories_table_shows_names() {
    let temp = TempDir::new().unwrap();

    regsync(&temp)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("NotPosixError"))
        .stdout(predicate::str::contains("WrongModeError"));
}

#[test]
fn check_follows_ancestry() {
    let temp = TempDir::new().unwrap();

    regsync(&temp)
        .args(["check", "LoginError", "SyncError"])
        .assert()
        .success();
    regsync(&temp)
        .args(["check", "WrongModeError", "ProgrammingError"])
        .assert()
        .success();
    regsync(&temp)
        .args(["check", "LoginError", "NotSupportedError"])
        .assert()
        .code(1);
}

#[test]
fn check_unknown_category_is_programming_error() {
    let temp = TempDir::new().unwrap();

    regsync(&temp)
        .args(["check", "TimeoutError", "SyncError"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "ProgrammingError: unknown error category 'TimeoutError'",
        ));
}

#[test]
fn config_set_rejects_tag_with_separator() {
    let temp = TempDir::new().unwrap();

    regsync(&temp)
        .args(["config", "set", "writer.tmp_tag", "a/b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("without separators"));

    assert!(!temp.path().join("config.toml").exists());
}

#[test]
fn config_set_rejects_unknown_key() {
    let temp = TempDir::new().unwrap();

    regsync(&temp)
        .args(["config", "set", "writer.bogus", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for 'writer.bogus'"));

    assert!(!temp.path().join("config.toml").exists());
}

#[test]
fn config_set_then_get() {
    let temp = TempDir::new().unwrap();

    regsync(&temp)
        .args(["config", "set", "writer.max_change_percent", "15"])
        .assert()
        .success();
    regsync(&temp)
        .args(["config", "get", "writer.max_change_percent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("15"));

    let saved = std::fs::read_to_string(temp.path().join("config.toml")).unwrap();
    assert!(saved.contains("max_change_percent = 15"));
}

#[test]
fn config_path_honors_env() {
    let temp = TempDir::new().unwrap();

    regsync(&temp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
