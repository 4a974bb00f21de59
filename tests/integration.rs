use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

/// The port the binary targets. Must match `fnbench::invoke::TARGET_PORT`.
const TARGET_PORT: u16 = 10000;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn fnbench_cmd() -> Command {
    let mut cmd = Command::cargo_bin("fnbench").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Minimal one-thread HTTP responder: answers `expected` requests on the
/// fixed port with 200 OK, returning the request bodies.
fn spawn_responder(listener: TcpListener, expected: usize) -> thread::JoinHandle<Vec<String>> {
    thread::spawn(move || {
        let mut bodies = Vec::new();
        for _ in 0..expected {
            let (mut stream, _) = listener.accept().unwrap();
            bodies.push(read_request_body(&mut stream));
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
                .unwrap();
        }
        bodies
    })
}

fn read_request_body(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut buf).unwrap();
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        assert!(n > 0, "connection closed before headers completed");
    };

    let headers = String::from_utf8_lossy(&raw[..header_end]).to_lowercase();
    let content_length: usize = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .map(|v| v.trim().parse().unwrap())
        .unwrap_or(0);

    while raw.len() < header_end + content_length {
        let n = stream.read(&mut buf).unwrap();
        assert!(n > 0, "connection closed before body completed");
        raw.extend_from_slice(&buf[..n]);
    }

    String::from_utf8_lossy(&raw[header_end..header_end + content_length]).to_string()
}

// ---- CLI surface tests ----

#[test]
fn version_flag_works() {
    fnbench_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fnbench"));
}

#[test]
fn help_mentions_iterations_and_output() {
    fnbench_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--iterations"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn zero_iterations_is_an_error() {
    // Fails on the empty sample set before any request is made, so no
    // responder is needed.
    fnbench_cmd()
        .args(["--iterations", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No samples recorded"));
}

// ---- End-to-end tests ----
//
// These share the fixed target port, so they run as one sequential test
// to avoid binding conflicts between parallel test threads.

#[test]
fn end_to_end_against_local_responder() {
    // If something else already listens on the port, skip rather than
    // produce a misleading failure.
    let probe = match TcpListener::bind(("127.0.0.1", TARGET_PORT)) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("skipping end-to-end test: port {} unavailable: {}", TARGET_PORT, e);
            return;
        }
    };
    drop(probe);

    // With nothing listening, the run must fail with a request error.
    fnbench_cmd()
        .args(["--iterations", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Request to"));

    // JSON run: 2 workloads x 2 iterations = 4 requests.
    let tmp = TempDir::new().unwrap();
    let chart_path = tmp.path().join("light_function.png");

    let listener = TcpListener::bind(("127.0.0.1", TARGET_PORT)).unwrap();
    let responder = spawn_responder(listener, 4);

    let output = fnbench_cmd()
        .args(["--iterations", "2", "--json"])
        .arg("--output")
        .arg(&chart_path)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let bodies = responder.join().unwrap();
    assert_eq!(bodies, vec!["1", "1", "10", "10"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("--json output should be valid JSON");
    let reports = parsed.as_array().expect("should be a JSON array");
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["label"], "Fibonacci(1)");
    assert_eq!(reports[1]["label"], "Fibonacci(10)");
    for report in reports {
        assert_eq!(report["iterations"], 2);
        assert!(report["mean_secs"].as_f64().unwrap() >= 0.0);
    }

    // The chart file exists and is a PNG.
    let bytes = fs::read(&chart_path).unwrap();
    assert_eq!(&bytes[..8], &PNG_MAGIC);

    // Default format run: 2 workloads x 1 iteration = 2 requests.
    let chart_path = tmp.path().join("chart2.png");
    let listener = TcpListener::bind(("127.0.0.1", TARGET_PORT)).unwrap();
    let responder = spawn_responder(listener, 2);

    fnbench_cmd()
        .args(["--iterations", "1"])
        .arg("--output")
        .arg(&chart_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting..."))
        .stdout(predicate::str::contains("Average latency per workload:"))
        .stdout(predicate::str::contains("Fibonacci(1)"))
        .stdout(predicate::str::contains("Fibonacci(10)"))
        .stdout(predicate::str::contains("Done!"));

    responder.join().unwrap();
    assert!(chart_path.exists());
}
