//! End-to-end tests for the gpctl binary
//!
//! Each test gets its own state directory and token file and points the CLI
//! at a local mock GridPane server, so nothing touches the real API or the
//! user's home directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::assert::OutputAssertExt;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use tempfile::TempDir;

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new(tokens: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("work")).unwrap();
        fs::write(dir.path().join("tokens"), tokens).unwrap();
        Self { dir }
    }

    fn home(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    fn gpctl(&self, server: Option<&Server>, args: &[&str]) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gpctl"));
        cmd.current_dir(self.dir.path().join("work"))
            .env("GPCTL_HOME", self.home())
            .env("GPCTL_TOKEN_FILE", self.dir.path().join("tokens"))
            .env("XDG_CONFIG_HOME", self.dir.path().join("xdg"))
            .env("HOME", self.dir.path())
            .env_remove("GPCTL_HOURLY_LIMIT")
            .env_remove("GPCTL_API_BASE_URL")
            .env_remove("RUST_LOG")
            .arg("--non-interactive");
        if let Some(server) = server {
            cmd.arg("--base-url").arg(server.url());
        }
        cmd.args(args);
        cmd
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_connection_charges_quota_record() {
    let env = TestEnv::new("main=token-main\n");
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/oauth/api/v1/user")
        .match_header("authorization", "Bearer token-main")
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create();

    env.gpctl(Some(&server), &["test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profile 'main'"))
        .stdout(predicate::str::contains("99 of 100"));
    mock.assert();

    let record = read_json(&env.home().join("quota").join("main.json"));
    assert_eq!(record["count"], 1);
    assert_eq!(record["limit"], 100);
}

#[test]
fn test_local_quota_exhaustion_exits_5_without_request() {
    let env = TestEnv::new("main=token-main\n");
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/oauth/api/v1/user")
        .with_status(200)
        .expect(1)
        .create();

    env.gpctl(Some(&server), &["--hourly-limit", "1", "test"])
        .assert()
        .success();
    env.gpctl(Some(&server), &["--hourly-limit", "1", "test"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Error:"));
    mock.assert();
}

#[test]
fn test_unauthorized_exits_7() {
    let env = TestEnv::new("main=bad-token\n");
    let mut server = Server::new();
    server
        .mock("GET", "/oauth/api/v1/user")
        .with_status(401)
        .create();

    env.gpctl(Some(&server), &["test"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("401"));
}

#[test]
fn test_missing_token_file_exits_3() {
    let env = TestEnv::new("");
    fs::remove_file(env.dir.path().join("tokens")).unwrap();

    env.gpctl(None, &["test"]).assert().code(3);
}

#[test]
fn test_ambiguous_profiles_non_interactive() {
    let env = TestEnv::new("a=token-a\nb=token-b\n");
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/oauth/api/v1/user")
        .match_header("authorization", "Bearer token-b")
        .with_status(200)
        .expect(1)
        .create();

    env.gpctl(Some(&server), &["test"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("a, b").or(predicate::str::contains("--profile")));

    env.gpctl(Some(&server), &["--profile", "b", "test"])
        .assert()
        .success();
    mock.assert();
}

#[test]
fn test_servers_populates_then_reuses_cache() {
    let env = TestEnv::new("main=token-main\n");
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/oauth/api/v1/server")
        .with_status(200)
        .with_body(r#"{"data": [{"id": 5, "name": "web-5"}, {"id": "6", "name": "web-6"}]}"#)
        .expect(1)
        .create();

    for _ in 0..2 {
        env.gpctl(Some(&server), &["servers"])
            .assert()
            .success()
            .stdout(predicate::str::contains("5\tweb-5"))
            .stdout(predicate::str::contains("6\tweb-6"));
    }
    mock.assert();

    let cached = read_json(&env.home().join("cache").join("servers.json"));
    assert_eq!(cached[1]["id"], 6);
}

#[test]
fn test_wp_runs_against_cached_site() {
    let env = TestEnv::new("main=token-main\n");
    let mut server = Server::new();
    let sites = server
        .mock("GET", "/oauth/api/v1/site")
        .with_status(200)
        .with_body(r#"[{"id": 41, "url": "other.org"}, {"id": 42, "url": "example.com"}]"#)
        .expect(1)
        .create();
    let wp = server
        .mock("PUT", "/oauth/api/v1/site/run-wp-cli/42")
        .match_body(Matcher::Json(
            serde_json::json!({"wp": {"plugin": ["list", "--status=active"]}}),
        ))
        .with_status(200)
        .with_body("\"akismet active\"")
        .expect(1)
        .create();

    env.gpctl(
        Some(&server),
        &["wp", "https://www.example.com/wp-admin", "plugin", "list", "--status=active"],
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("akismet active"));
    sites.assert();
    wp.assert();
}

#[test]
fn test_wp_unknown_site_exits_8() {
    let env = TestEnv::new("main=token-main\n");
    let mut server = Server::new();
    server
        .mock("GET", "/oauth/api/v1/site")
        .with_status(200)
        .with_body(r#"[{"id": 41, "url": "other.org"}]"#)
        .create();

    env.gpctl(Some(&server), &["wp", "example.com", "plugin", "list"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("gpctl cache refresh sites"));
}

#[test]
fn test_wp_path_argument_rejected_before_any_request() {
    let env = TestEnv::new("main=token-main\n");
    let mut server = Server::new();
    let gets = server.mock("GET", Matcher::Any).expect(0).create();
    let puts = server.mock("PUT", Matcher::Any).expect(0).create();

    env.gpctl(Some(&server), &["wp", "example.com", "plugin", "list", "--path=/tmp"])
        .assert()
        .code(2);
    gets.assert();
    puts.assert();
    assert!(!env.home().join("quota").exists());
}

#[test]
fn test_wp_invalid_domain_exits_2() {
    let env = TestEnv::new("main=token-main\n");
    env.gpctl(None, &["wp", "not a domain", "plugin", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_cache_status_and_unknown_type() {
    let env = TestEnv::new("main=token-main\n");
    env.gpctl(None, &["cache", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sites"))
        .stdout(predicate::str::contains("missing"));

    env.gpctl(None, &["cache", "refresh", "plugins"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("sites, servers"));
}

#[test]
fn test_quota_json_without_charging() {
    let env = TestEnv::new("main=token-main\n");
    let output = env
        .gpctl(None, &["--hourly-limit", "7", "quota", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["account"], "main");
    assert_eq!(report["used"], 0);
    assert_eq!(report["remaining"], 7);
    assert!(!env.home().join("quota").join("main.json").exists());
}

#[test]
fn test_config_shows_sources() {
    let env = TestEnv::new("main=token-main\n");
    env.gpctl(None, &["--base-url", "http://localhost:9", "config"])
        .env("GPCTL_HOURLY_LIMIT", "42")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:9"))
        .stdout(predicate::str::contains("[cli]"))
        .stdout(predicate::str::contains("42"))
        .stdout(predicate::str::contains("[env]"));
}

#[test]
fn test_invalid_config_file_exits_2() {
    let env = TestEnv::new("main=token-main\n");
    let config = env.dir.path().join("bad.toml");
    fs::write(&config, "[quota]\nhourly_limit = 0\n").unwrap();

    env.gpctl(None, &["--config", config.to_str().unwrap(), "config"])
        .assert()
        .code(2);
}

#[test]
fn test_profiles_list_never_prints_tokens() {
    let env = TestEnv::new("agency=super-secret-token\npersonal=another-secret\n");
    env.gpctl(None, &["profiles", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("agency"))
        .stdout(predicate::str::contains("personal"))
        .stdout(predicate::str::contains("secret").not());
}

#[test]
fn test_logs_combine() {
    let env = TestEnv::new("");
    let input = env.dir.path().join("run.jsonl");
    let output = env.dir.path().join("run.json");
    fs::write(&input, "{\"level\":\"INFO\"}\n{\"level\":\"WARN\"}\n").unwrap();

    env.gpctl(
        None,
        &["logs", "combine", input.to_str().unwrap(), output.to_str().unwrap()],
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("Combined 2 JSON objects"));

    let combined = read_json(&output);
    assert_eq!(combined[1]["level"], "WARN");
}
