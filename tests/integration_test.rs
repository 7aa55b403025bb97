use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use serde_json::json;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

const DOC: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Hello</title>
  <meta name="author" content="Ann">
  <meta name="description" content="A greeting">
</head>
<body><h1>Big news</h1><p>Hello <b>world</b></p><script>track()</script></body>
</html>"#;

fn write_doc(content: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("post.html");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

fn telegraph() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("telegraph"));
    cmd.env_remove("TELEGRAPH_ACCESS_TOKEN")
        .env_remove("TELEGRAPH_API_URL");
    cmd
}

#[test]
fn test_convert_prints_page_json() {
    let (_dir, path) = write_doc(DOC);

    let output = telegraph().arg("convert").arg(&path).output().unwrap();
    assert!(output.status.success());

    let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["title"], "Hello");
    assert_eq!(page["author_name"], "Ann");
    assert_eq!(page["description"], "A greeting");
    // The newline after </body> belongs to the body and is kept verbatim.
    assert_eq!(
        page["content"],
        json!([
            {"tag": "h3", "children": ["Big news"]},
            {"tag": "p", "children": ["Hello ", {"tag": "strong", "children": ["world"]}]},
            "\n"
        ])
    );
}

#[test]
fn test_convert_missing_file_fails() {
    let dir = tempdir().unwrap();

    telegraph()
        .arg("convert")
        .arg(dir.path().join("missing.html"))
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to read"));
}

#[test]
fn test_publish_requires_token() {
    let (_dir, path) = write_doc(DOC);

    telegraph()
        .arg("publish")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicates::str::contains("access token is required"));
}

#[test]
fn test_publish_creates_page() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/createPage")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "access_token": "secret",
            "title": "Custom title",
            "author_name": "Ann",
            "content": [
                {"tag": "h3", "children": ["Big news"]},
                {"tag": "p", "children": ["Hello ", {"tag": "strong", "children": ["world"]}]},
                "\n"
            ]
        })))
        .with_status(200)
        .with_body(
            r#"{"ok":true,"result":{"path":"Custom-title-10-18","url":"https://telegra.ph/Custom-title-10-18","title":"Custom title","description":"","views":0}}"#,
        )
        .expect(1)
        .create();

    let (_dir, path) = write_doc(DOC);
    telegraph()
        .arg("publish")
        .arg(&path)
        .arg("--title")
        .arg("Custom title")
        .arg("--api-url")
        .arg(server.url())
        .env("TELEGRAPH_ACCESS_TOKEN", "secret")
        .assert()
        .success()
        .stdout("https://telegra.ph/Custom-title-10-18\n");

    mock.assert();
}

#[test]
fn test_page_shows_summary_and_content() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/getPage")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("path".into(), "Sample-Page".into()),
            Matcher::UrlEncoded("return_content".into(), "true".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"ok":true,"result":{"path":"Sample-Page","url":"https://telegra.ph/Sample-Page","title":"Sample","description":"","views":3,"content":[{"tag":"p","children":["Body text"]}]}}"#,
        )
        .create();

    telegraph()
        .arg("page")
        .arg("Sample-Page")
        .arg("--content")
        .arg("--api-url")
        .arg(server.url())
        .assert()
        .success()
        .stdout(predicates::str::contains("Title: Sample"))
        .stdout(predicates::str::contains("Views: 3"))
        .stdout(predicates::str::contains("Body text"));
}

#[test]
fn test_views_server_errors_exhaust_retries() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/getViews")
        .with_status(500)
        .with_body("internal error")
        .expect(2)
        .create();

    telegraph()
        .arg("views")
        .arg("Sample-Page")
        .arg("--max-retries")
        .arg("1")
        .arg("--api-url")
        .arg(server.url())
        .assert()
        .failure()
        .stderr(predicates::str::contains("request failed after 2 attempts"));

    mock.assert();
}

#[test]
fn test_api_error_is_reported() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/getViews")
        .with_status(200)
        .with_body(r#"{"ok":false,"error":"PAGE_NOT_FOUND"}"#)
        .create();

    telegraph()
        .arg("views")
        .arg("Missing-Page")
        .arg("--api-url")
        .arg(server.url())
        .assert()
        .failure()
        .stderr(predicates::str::contains("PAGE_NOT_FOUND"));
}

#[test]
fn test_create_account_validation_fails_before_sending() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/createAccount")
        .expect(0)
        .create();

    telegraph()
        .arg("create-account")
        .arg("--short-name")
        .arg("x".repeat(33))
        .arg("--api-url")
        .arg(server.url())
        .assert()
        .failure()
        .stderr(predicates::str::contains("validation: short_name"));

    mock.assert();
}

#[test]
fn test_create_account_prints_token() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/createAccount")
        .match_body(Matcher::Json(json!({"short_name": "Sandbox"})))
        .with_status(200)
        .with_body(r#"{"ok":true,"result":{"short_name":"Sandbox","access_token":"abc123","auth_url":"https://edit.telegra.ph/auth/x"}}"#)
        .create();

    telegraph()
        .arg("create-account")
        .arg("--short-name")
        .arg("Sandbox")
        .arg("--api-url")
        .arg(server.url())
        .assert()
        .success()
        .stdout(predicates::str::contains("Access token: abc123"));
}
