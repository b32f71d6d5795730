//! Drives the `rentaldb` binary through stdin the way an operator would.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn sqlite_dsn(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("rentals.db").display())
}

/// Runs the binary with a clean `DB_*`/`RENTALDB_LOG` environment. Without an
/// env file the default `.env` lookup is pointed at a path that does not exist.
fn rentaldb(dir: &Path, env_file: Option<&Path>, envs: &[(&str, &str)], stdin: &str) -> Output {
    let env_file = env_file.map_or_else(|| dir.join("missing.env"), PathBuf::from);
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rentaldb"));
    cmd.env_remove("DB_USER")
        .env_remove("DB_PASS")
        .env_remove("DB_DSN")
        .env_remove("RENTALDB_LOG")
        .arg("--env-file")
        .arg(env_file)
        .arg("--log-file")
        .arg(dir.join("rentaldb.log"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in envs {
        cmd.env(key, value);
    }

    let mut child = cmd.spawn().unwrap();
    // the process may exit before reading, e.g. on missing credentials
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

#[test]
fn missing_user_exits_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = rentaldb(dir.path(), None, &[("DB_PASS", "tiger")], "1\n5\n");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing DB_USER/DB_PASS"), "{stderr}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Menu"));
}

#[test]
fn env_file_supplies_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join("creds.env");
    let contents = format!("# demo\nDB_USER=scott\nDB_PASS=tiger\nDB_DSN={}\n", sqlite_dsn(&dir));
    std::fs::write(&env_file, contents).unwrap();

    let output = rentaldb(dir.path(), Some(&env_file), &[], "5\n");

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).ends_with("Exiting...\n"));
}

#[test]
fn env_file_sets_the_log_level() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join("debug.env");
    let contents = format!(
        "DB_USER=scott\nDB_PASS=tiger\nDB_DSN={}\nRENTALDB_LOG=debug\n",
        sqlite_dsn(&dir)
    );
    std::fs::write(&env_file, contents).unwrap();

    let output = rentaldb(dir.path(), Some(&env_file), &[], "2\n5\n");

    assert_eq!(output.status.code(), Some(0));
    let log = std::fs::read_to_string(dir.path().join("rentaldb.log")).unwrap();
    assert!(log.contains("DEBUG"), "{log}");
    assert!(log.contains("CREATE TABLE BRANCH_INFORMATION"), "{log}");
}

#[test]
fn private_memory_database_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let envs = [("DB_USER", "scott"), ("DB_PASS", "tiger"), ("DB_DSN", "sqlite::memory:")];
    let output = rentaldb(dir.path(), None, &envs, "2\n3\n5\n");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sqlite::memory:"), "{stderr}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Tables created"));
}

#[test]
fn invalid_choice_then_exit() {
    let dir = tempfile::tempdir().unwrap();
    let dsn = sqlite_dsn(&dir);
    let envs = [("DB_USER", "scott"), ("DB_PASS", "tiger"), ("DB_DSN", dsn.as_str())];
    let output = rentaldb(dir.path(), None, &envs, "9\n5\n");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Invalid choice. Try again."));
    assert_eq!(stdout.matches("Enter your choice: ").count(), 2);
    assert!(stdout.ends_with("Exiting...\n"));
}

#[test]
fn empty_query_is_reported_without_running() {
    let dir = tempfile::tempdir().unwrap();
    let dsn = sqlite_dsn(&dir);
    let envs = [("DB_USER", "scott"), ("DB_PASS", "tiger"), ("DB_DSN", dsn.as_str())];
    let output = rentaldb(dir.path(), None, &envs, "4\n\n5\n");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Parse error: empty statement"), "{stdout}");
    assert!(!stdout.contains("not an error"), "{stdout}");
}

#[test]
fn create_seed_and_query_a_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let dsn = sqlite_dsn(&dir);
    let envs = [("DB_USER", "scott"), ("DB_PASS", "tiger"), ("DB_DSN", dsn.as_str())];

    let output = rentaldb(
        dir.path(),
        None,
        &envs,
        "1\n2\n3\n4\nSELECT Name FROM BRANCH_INFORMATION WHERE Branch_ID = 1\n5\n",
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tables dropped successfully (or they did not exist)."));
    assert!(stdout.contains("Tables created successfully."));
    assert!(stdout.contains("Tables populated successfully."));
    assert!(!stdout.contains("Error executing query"), "{stdout}");
    assert!(stdout.contains("NAME => Downtown Branch"), "{stdout}");
}

#[test]
fn unreachable_database_exits_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no/such/dir/rentals.db");
    let dsn = format!("sqlite://{}", missing.display());
    let envs = [("DB_USER", "scott"), ("DB_PASS", "tiger"), ("DB_DSN", dsn.as_str())];

    let output = rentaldb(dir.path(), None, &envs, "2\n5\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Connection failed:"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Exiting..."));
}
