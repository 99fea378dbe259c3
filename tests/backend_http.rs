use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use steam_affinity::backend::{BackendClient, FetchOutcome};
use steam_affinity::provider::fetch_from_backend;
use steam_affinity::state::Delta;

const ME: &str = "76561197960287930";
const TIMEOUT_SECS: u64 = 5;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

/// Local HTTP server answering every request through `route`. Returns the base
/// url and the request targets seen so far.
fn serve<F>(route: F) -> (String, Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str) -> (u16, String) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if header == "\r\n" => break,
                    Ok(_) => {}
                }
            }

            let target = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            let (status, body) = route(&target);
            log.lock().expect("request log").push(target);

            let reason = if status == 200 { "OK" } else { "Internal Server Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    (format!("http://{addr}/api/v1"), seen)
}

#[test]
fn ranking_request_always_lists_games() {
    let ranking = read_fixture("ranking.json");
    let (base, seen) = serve(move |_| (200, ranking.clone()));
    let backend = BackendClient::new(base, TIMEOUT_SECS);

    let outcome = backend.fetch_ranking(ME);
    assert_eq!(outcome.error(), None);
    assert_eq!(outcome.items().len(), 3);

    let seen = seen.lock().expect("request log");
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("/api/v1/friends/ranking?"), "{}", seen[0]);
    assert!(seen[0].contains(&format!("steamid={ME}")), "{}", seen[0]);
    assert!(seen[0].contains("listGames=true"), "{}", seen[0]);
}

#[test]
fn server_error_becomes_failed_and_reads_empty() {
    let (base, _) = serve(|_| (500, r#"{"error": "steam is down"}"#.to_string()));
    let backend = BackendClient::new(base, TIMEOUT_SECS);

    let ranking = backend.fetch_ranking(ME);
    let err = ranking.error().expect("500 should fail");
    assert!(err.contains("failed to get affinity ranking"), "{err}");
    assert!(err.contains("500"), "{err}");
    assert!(ranking.items().is_empty());

    let summaries = backend.fetch_summaries(&[ME.to_string()]);
    assert!(summaries.error().is_some());
    assert!(summaries.into_items().is_empty());
}

#[test]
fn refused_connection_becomes_failed_and_reads_empty() {
    let backend = BackendClient::new("http://127.0.0.1:1/api/v1", TIMEOUT_SECS);

    let friends = backend.fetch_friends(ME);
    let err = friends.error().expect("nothing listens on port 1");
    assert!(err.contains("failed to get friends list"), "{err}");
    assert!(friends.items().is_empty());
}

#[test]
fn friends_failure_retries_identities_through_summaries() {
    let ranking = read_fixture("ranking.json");
    let friends = read_fixture("friends.json");
    let profile = read_fixture("summaries.json");
    let (base, seen) = serve(move |target| {
        if target.contains("/friends/ranking") {
            (200, ranking.clone())
        } else if target.contains("/friends") {
            (500, String::new())
        } else if target.contains("287931") {
            (200, friends.clone())
        } else {
            (200, profile.clone())
        }
    });
    let backend = BackendClient::new(base, TIMEOUT_SECS);
    let (tx, rx) = mpsc::channel();

    let fetched = fetch_from_backend(&backend, ME, &tx).expect("receiver is alive");

    assert_eq!(fetched.ranking.items().len(), 3);
    assert!(matches!(fetched.friends, FetchOutcome::Loaded(_)));
    let names: Vec<&str> = fetched
        .friends
        .items()
        .iter()
        .map(|p| p.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Chell", "Alyx"]);
    assert_eq!(fetched.profile.items()[0].display_name, "Gordon");

    let logs: Vec<String> = rx
        .try_iter()
        .filter_map(|d| match d {
            Delta::Log(msg) => Some(msg),
            _ => None,
        })
        .collect();
    assert!(
        logs.iter().any(|l| l.contains("retrying with player summaries")),
        "{logs:?}"
    );

    let seen = seen.lock().expect("request log");
    assert_eq!(seen.iter().filter(|t| t.contains("/summaries")).count(), 2);
}

#[test]
fn closed_ui_stops_fetch_before_any_request() {
    let (base, seen) = serve(|_| (200, String::new()));
    let backend = BackendClient::new(base, TIMEOUT_SECS);
    let (tx, rx) = mpsc::channel();
    drop(rx);

    assert!(fetch_from_backend(&backend, ME, &tx).is_none());
    assert!(seen.lock().expect("request log").is_empty());
}
