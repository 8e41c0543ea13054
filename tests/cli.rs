use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::tempdir;

const FINDING: &str = "Line 1: Buffer Overflow — strcpy into fixed buffer — FIX: use strncpy";

/// Local stand-in for an Ollama server with `phi4` installed; every chat
/// request is answered with `reply`.
fn fake_ollama(reply: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut reader = BufReader::new(&stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut length = 0;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut body = vec![0; length];
            reader.read_exact(&mut body).unwrap();

            let payload = if request_line.starts_with("GET /api/tags") {
                r#"{"models":[{"name":"phi4:latest"}]}"#.to_string()
            } else {
                serde_json::json!({ "message": { "role": "assistant", "content": reply } })
                    .to_string()
            };
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                payload.len(),
                payload
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    url
}

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("vuln-analyzer"))
}

#[test]
fn help_lists_commands() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn analyze_help_lists_knobs() {
    bin()
        .args(["analyze", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--tokens"))
        .stdout(predicate::str::contains("--nosplit"))
        .stdout(predicate::str::contains("--model"));
}

#[test]
fn zero_token_budget_is_rejected() {
    bin()
        .args(["analyze", "--tokens", "0", "main.c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("value must be > 0"));
}

#[test]
fn analyze_without_files_is_rejected() {
    bin().arg("analyze").assert().failure();
}

#[test]
fn init_writes_config_once() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join(".vuln-analyzer.toml");

    bin()
        .current_dir(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created .vuln-analyzer.toml"));

    let written = fs::read_to_string(&config_path).unwrap();
    assert!(written.contains("[model]"));
    assert!(written.contains("[analysis]"));

    fs::write(&config_path, "# edited\n").unwrap();
    bin()
        .current_dir(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), "# edited\n");
}

#[test]
fn unreachable_model_server_is_fatal() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("main.c");
    fs::write(&source, "int main(void) { return 0; }\n").unwrap();

    bin()
        .current_dir(temp.path())
        .args(["analyze", "--no-config", "--base-url", "http://127.0.0.1:9", "--timeout", "2"])
        .arg(&source)
        .assert()
        .failure()
        .stderr(predicate::str::contains("model server unavailable"))
        .stdout(predicate::str::contains("SCAN REPORT").not());
}

#[test]
fn missing_file_does_not_stop_remaining_files() {
    let url = fake_ollama(FINDING);
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("ok.c"), "char b[4]; strcpy(b, argv[1]);\n").unwrap();

    bin()
        .current_dir(temp.path())
        .args(["analyze", "--no-config", "--model", "phi4", "--base-url", url.as_str()])
        .args(["missing.c", "ok.c"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("❌"))
        .stderr(predicate::str::contains("File not found: missing.c"))
        .stdout(predicate::str::contains(format!("# analyzer ok.c\n{}\n", FINDING)))
        .stdout(predicate::str::contains("# analyzer missing.c").not());
}

#[test]
fn clean_run_exits_zero_and_quiet_hides_progress() {
    let url = fake_ollama("No vulnerabilities found.");
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("ok.c"), "int main(void) { return 0; }\n").unwrap();

    bin()
        .current_dir(temp.path())
        .args(["-q", "analyze", "--no-config", "--base-url", url.as_str(), "ok.c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# analyzer ok.c\nNo vulnerabilities found."))
        .stdout(predicate::str::contains("Analyzing").not());
}
