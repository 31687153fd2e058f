use collector_core::batch::{ChangeRequest, Command};
use collector_core::sync::{SyncExecutor, SyncOutcome};
use collector_core::Error;
use serde_json::Value;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use uuid::Uuid;

/// One-shot HTTP endpoint answering with `status_line`. The join handle
/// yields the received request body.
fn spawn_endpoint(status_line: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).unwrap();

        write!(
            stream,
            "{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            status_line
        )
        .unwrap();
        stream.flush().unwrap();
        String::from_utf8(body).unwrap()
    });

    (format!("http://{}/change", addr), handle)
}

fn sample_request() -> ChangeRequest {
    ChangeRequest::new(666, vec![Command::delete(Uuid::new_v4())])
}

#[test]
fn test_commit_posts_json_body() {
    let (url, handle) = spawn_endpoint("HTTP/1.1 200 OK");
    let request = sample_request();

    let outcome = SyncExecutor::commit(&url).unwrap().execute(&request).unwrap();
    assert_eq!(outcome, SyncOutcome::Committed { status: 200 });

    let body: Value = serde_json::from_str(&handle.join().unwrap()).unwrap();
    assert_eq!(body, serde_json::to_value(&request).unwrap());
}

#[test]
fn test_non_success_status_is_rejected() {
    let (url, handle) = spawn_endpoint("HTTP/1.1 500 Internal Server Error");

    let result = SyncExecutor::commit(&url).unwrap().execute(&sample_request());
    assert!(matches!(result, Err(Error::Rejected { status: 500 })));
    handle.join().unwrap();
}

#[test]
fn test_unreachable_endpoint_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let executor = SyncExecutor::commit(&format!("http://{}/change", addr)).unwrap();
    assert!(matches!(executor.execute(&sample_request()), Err(Error::Http(_))));
}

#[test]
fn test_empty_request_is_not_posted() {
    // nothing listens here; an attempted POST would fail
    let executor = SyncExecutor::commit("http://127.0.0.1:9/change").unwrap();
    let outcome = executor.execute(&ChangeRequest::new(666, Vec::new())).unwrap();
    assert_eq!(outcome, SyncOutcome::Empty);
}

#[test]
fn test_print_mode_writes_to_sink() {
    let executor = SyncExecutor::print_only();
    assert!(executor.is_dry_run());

    let request = sample_request();
    let mut out = Vec::new();
    let outcome = executor.execute_with_sink(&request, &mut out).unwrap();
    assert_eq!(outcome, SyncOutcome::Printed);

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.trim_end(), request.to_json().unwrap());
}

#[test]
fn test_invalid_endpoint_is_rejected_up_front() {
    assert!(matches!(
        SyncExecutor::commit("not a url"),
        Err(Error::InvalidUrl { .. })
    ));
    assert!(matches!(
        SyncExecutor::commit("ftp://localhost/change"),
        Err(Error::InvalidUrl { .. })
    ));
}
