//! Exit codes and stdout discipline of the binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

fn obsreview() -> Command {
    let mut cmd = Command::cargo_bin("obsreview").unwrap();
    cmd.env_remove("ALLOWED_SAVE_PATHS").arg("--no-browser");
    cmd
}

#[test]
fn test_empty_tool_input_exits_1_with_empty_stdout() {
    obsreview()
        .write_stdin(r#"{"tool_input":{}}"#)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No plan content found"));
}

#[test]
fn test_invalid_json_exits_1() {
    obsreview()
        .write_stdin("this is not json")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to parse hook event JSON"));
}

#[test]
fn test_check_path_inside_allowlist() {
    obsreview()
        .env("ALLOWED_SAVE_PATHS", "/vault")
        .args(["check-path", "/vault/sub/x.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/vault/sub/x.md"));
}

#[test]
fn test_check_path_sibling_prefix_rejected() {
    obsreview()
        .env("ALLOWED_SAVE_PATHS", "/vault")
        .args(["check-path", "/vault-other/x.md"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Path is not within any allowed directory"));
}

#[test]
fn test_check_path_traversal_rejected() {
    obsreview()
        .args(["check-path", "../../etc/passwd"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Path traversal detected"));
}

#[test]
fn test_annotate_missing_file_exits_1() {
    let tmp = tempfile::TempDir::new().unwrap();
    let missing = tmp.path().join("missing.md");
    obsreview()
        .args(["annotate", &missing.to_string_lossy()])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_nota_alias() {
    obsreview()
        .args(["nota", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Collect feedback"));
}

/// Run a plan review in a real process, POST `body` to `route` and return
/// the exit code and stdout.
async fn review_and_answer(route: &str, body: serde_json::Value) -> (Option<i32>, String) {
    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_obsreview"))
        .args(["--no-browser", "--grace-ms", "10"])
        .env_remove("ALLOWED_SAVE_PATHS")
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin
        .write_all(br#"{"tool_input":{"plan":"Do the thing"}}"#)
        .await
        .unwrap();
    drop(stdin);

    // The URL is announced on stderr; keep draining it afterwards.
    let mut lines = BufReader::new(child.stderr.take().unwrap()).lines();
    let url = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(line) = lines.next_line().await.unwrap() {
            if let Some(start) = line.find("http://127.0.0.1:") {
                let port: String = line[start + "http://127.0.0.1:".len()..]
                    .chars()
                    .take_while(char::is_ascii_digit)
                    .collect();
                return format!("http://127.0.0.1:{port}");
            }
        }
        panic!("process exited without announcing a URL");
    })
    .await
    .unwrap();
    tokio::spawn(async move { while let Ok(Some(_)) = lines.next_line().await {} });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let content: serde_json::Value = client
        .get(format!("{url}/api/content"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(content["content"], "Do the thing");

    let resp = client
        .post(format!("{url}{route}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let output = tokio::time::timeout(Duration::from_secs(10), child.wait_with_output())
        .await
        .unwrap()
        .unwrap();
    (output.status.code(), String::from_utf8(output.stdout).unwrap())
}

#[tokio::test]
async fn test_deny_prints_one_decision_line_and_exits_0() {
    let (code, stdout) =
        review_and_answer("/api/deny", serde_json::json!({ "feedback": "Needs tests" })).await;

    assert_eq!(code, Some(0));
    assert_eq!(
        stdout,
        concat!(
            r#"{"hookSpecificOutput":{"hookEventName":"PermissionRequest","#,
            r#""decision":{"behavior":"deny","message":"Needs tests"}}}"#,
            "\n"
        )
    );
}

#[tokio::test]
async fn test_approve_prints_one_decision_line_and_exits_0() {
    let (code, stdout) = review_and_answer("/api/approve", serde_json::json!({})).await;

    assert_eq!(code, Some(0));
    assert_eq!(stdout.lines().count(), 1);
    let decision: serde_json::Value = serde_json::from_str(stdout.trim_end()).unwrap();
    assert_eq!(
        decision,
        serde_json::json!({
            "hookSpecificOutput": {
                "hookEventName": "PermissionRequest",
                "decision": { "behavior": "allow" }
            }
        })
    );
}
