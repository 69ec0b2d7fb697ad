use std::process::{Command, Output};

use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn edusoho() -> Command {
    Command::new(env!("CARGO_BIN_EXE_edusoho"))
}

/// Runs the binary against `base_url` with an isolated home directory.
async fn run_against(base_url: &str, token: Option<&str>, args: &[&str]) -> Output {
    let home = TempDir::new().unwrap();
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_edusoho"));
    cmd.env("HOME", home.path())
        .env_remove("EDUSOHO_TOKEN")
        .env_remove("RUST_LOG")
        .env("EDUSOHO_BASE_URL", base_url)
        .arg("--config")
        .arg(home.path().join("config.yaml"))
        .args(args);
    if let Some(token) = token {
        cmd.env("EDUSOHO_TOKEN", token);
    }
    cmd.output().await.expect("Failed to execute command")
}

#[test]
fn test_cli_version() {
    let output = edusoho()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("edusoho"));
    assert!(stdout.contains("0.1."));
}

#[test]
fn test_cli_help() {
    let output = edusoho()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("request"));
    assert!(stdout.contains("course-set"));
    assert!(stdout.contains("classroom"));
    assert!(stdout.contains("order"));
}

#[test]
fn test_auth_help() {
    let output = edusoho()
        .args(["auth", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Authentication commands"));
    assert!(stdout.contains("login"));
    assert!(stdout.contains("whoami"));
}

#[test]
fn test_output_format_flag() {
    let output = edusoho()
        .args(["--output", "csv", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
}

#[test]
fn test_invalid_command() {
    let output = edusoho()
        .arg("nonexistent")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand") || stderr.contains("error:"));
}

#[test]
fn test_no_profile_configured() {
    let home = TempDir::new().unwrap();
    let output = edusoho()
        .env("HOME", home.path())
        .env_remove("EDUSOHO_BASE_URL")
        .arg("--config")
        .arg(home.path().join("config.yaml"))
        .arg("me")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("edusoho auth login"));
}

#[tokio::test]
async fn test_request_get_prints_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/course_sets"))
        .and(query_param("title", "music"))
        .and(query_param("limit", "5"))
        .and(header("x-auth-token", "cli-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[],"paging":{"total":0}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/api/", server.uri());
    let output = run_against(
        &base,
        Some("cli-token"),
        &["request", "get", "course_sets", "-p", "title=music", "-p", "limit:=5"],
    )
    .await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        r#"{"data":[],"paging":{"total":0}}"#
    );
}

#[tokio::test]
async fn test_request_post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/me/favorite_course_sets"))
        .and(body_json(serde_json::json!({"courseSetId": 42})))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/api/", server.uri());
    let output = run_against(
        &base,
        Some("cli-token"),
        &["request", "POST", "me/favorite_course_sets", "-p", "courseSetId:=42"],
    )
    .await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[tokio::test]
async fn test_failed_request_prints_status_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":{"code":4}}"#))
        .mount(&server)
        .await;

    let base = format!("{}/api/", server.uri());
    let output = run_against(&base, None, &["course-set", "get", "999"]).await;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("404"));
}

#[tokio::test]
async fn test_failed_request_debug_prints_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"Fatal: {"error":{"message":"boom"}}"#),
        )
        .mount(&server)
        .await;

    let base = format!("{}/api/", server.uri());
    let output = run_against(&base, None, &["--debug", "site", "settings", "site"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(r#"{"error":{"message":"boom"}}"#));
    assert!(!stderr.contains("Fatal:"));
}

#[tokio::test]
async fn test_order_create_uses_target_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_json(serde_json::json!({
            "targetType": "classroom",
            "targetId": 3,
            "couponCode": "SAVE10"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"sn":"ORD-1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/api/", server.uri());
    let output = run_against(
        &base,
        Some("cli-token"),
        &["order", "create", "classroom", "3", "--coupon", "SAVE10"],
    )
    .await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("ORD-1"));
}

#[tokio::test]
async fn test_csv_output_for_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/classrooms"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data":[{"id":1,"title":"Spring"},{"id":2,"title":"Autumn"}],"paging":{"total":2}}"#,
        ))
        .mount(&server)
        .await;

    let base = format!("{}/api/", server.uri());
    let output = run_against(&base, None, &["--output", "csv", "classroom", "list"]).await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["id,title", "1,Spring", "2,Autumn"]);
}
