//! Generation client tests against a local HTTP server.
//!
//! The server plays the RealFaviconGenerator API: canned responses by path,
//! with every request recorded so tests can check what the client sent.
//!
//! Run with: `cargo test --test rfg_client`

use reqwest::blocking::Client as HttpClient;
use rfg_favicons::request::CompiledRequest;
use rfg_favicons::service::{FaviconGenerator, GenerationError, RfgClient};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::{Read as _, Write as _};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

// ===========================================================================
// Minimal HTTP server
// ===========================================================================

/// `path → (status line, body)`
type Routes = HashMap<String, (&'static str, Vec<u8>)>;

struct TestServer {
    port: u16,
    requests: Arc<Mutex<Vec<(String, String)>>>,
    _stop: std::sync::mpsc::Sender<()>,
}

impl TestServer {
    /// Start serving; `routes` receives the server's base URL so responses
    /// can point back at it.
    fn start(routes: impl FnOnce(&str) -> Routes) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let routes = Arc::new(routes(&format!("http://127.0.0.1:{port}")));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = std::sync::mpsc::channel::<()>();

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            listener.set_nonblocking(true).unwrap();
            loop {
                if rx.try_recv().is_ok() {
                    break;
                }
                match listener.accept() {
                    Ok((stream, _)) => {
                        let routes = Arc::clone(&routes);
                        let recorded = Arc::clone(&recorded);
                        thread::spawn(move || serve_request(stream, &routes, &recorded));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            port,
            requests,
            _stop: tx,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    fn paths_requested(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn body_of(&self, path: &str) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, body)| body.clone())
    }
}

/// Read one request: headers up to the blank line, then `Content-Length`
/// bytes of body. Returns the request path and the body.
fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let path = head.split_whitespace().nth(1)?.to_string();
    let body = String::from_utf8_lossy(&data[header_end..]).to_string();
    Some((path, body))
}

fn serve_request(
    mut stream: TcpStream,
    routes: &Routes,
    recorded: &Mutex<Vec<(String, String)>>,
) {
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let Some((path, body)) = read_request(&mut stream) else {
        return;
    };
    recorded.lock().unwrap().push((path.clone(), body));

    let (status, body) = routes
        .get(&path)
        .cloned()
        .unwrap_or(("404 Not Found", b"Not Found".to_vec()));
    let header = format!(
        "HTTP/1.1 {status}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&body);
}

// ===========================================================================
// Setup helpers
// ===========================================================================

fn success_envelope(base: &str, files: &[&str]) -> Vec<u8> {
    let files_urls: Vec<String> = files.iter().map(|f| format!("{base}{f}")).collect();
    json!({
        "favicon_generation_result": {
            "result": {"status": "success"},
            "favicon": {
                "package_url": format!("{base}/package.zip"),
                "files_urls": files_urls,
                "html_code": "<link rel=\"icon\" href=\"/favicons/favicon.ico\">",
                "overlapping_markups": []
            },
            "files_location": {"type": "path", "path": "/favicons"},
            "preview_picture_url": format!("{base}/preview.png")
        }
    })
    .to_string()
    .into_bytes()
}

fn routes() -> impl FnOnce(&str) -> Routes {
    |base: &str| {
        let mut routes = Routes::new();
        routes.insert(
            "/api/ok".into(),
            (
                "200 OK",
                success_envelope(base, &["/files/favicon.ico", "/files/site.webmanifest"]),
            ),
        );
        routes.insert(
            "/api/broken".into(),
            (
                "200 OK",
                success_envelope(base, &["/files/favicon.ico", "/files/missing.png"]),
            ),
        );
        routes.insert(
            "/api/rejected".into(),
            (
                "200 OK",
                br#"{"favicon_generation_result":{"result":{"status":"error","error_message":"Invalid API key"}}}"#
                    .to_vec(),
            ),
        );
        routes.insert(
            "/api/down".into(),
            ("500 Internal Server Error", b"boom".to_vec()),
        );
        routes.insert("/files/favicon.ico".into(), ("200 OK", b"ico-bytes".to_vec()));
        routes.insert(
            "/files/site.webmanifest".into(),
            ("200 OK", br#"{"name":"Site"}"#.to_vec()),
        );
        routes
    }
}

fn client_for(server: &TestServer, endpoint: &str) -> RfgClient {
    let http = HttpClient::builder().no_proxy().build().unwrap();
    RfgClient::new()
        .unwrap()
        .with_http_client(http)
        .with_endpoint(server.url(endpoint))
}

fn request() -> CompiledRequest {
    let Value::Object(map) = json!({"api_key": "k", "favicon_design": {"desktop_browser": {}}})
    else {
        unreachable!()
    };
    CompiledRequest::from_map(map)
}

// ===========================================================================
// Tests
// ===========================================================================

#[test]
fn success_downloads_every_file_by_last_segment() {
    let server = TestServer::start(routes());
    let dest = TempDir::new().unwrap();

    let result = client_for(&server, "/api/ok")
        .generate(&request(), dest.path())
        .unwrap();

    assert_eq!(result.favicon.unwrap().files_urls.len(), 2);
    assert_eq!(
        std::fs::read(dest.path().join("favicon.ico")).unwrap(),
        b"ico-bytes"
    );
    assert_eq!(
        std::fs::read_to_string(dest.path().join("site.webmanifest")).unwrap(),
        r#"{"name":"Site"}"#
    );
    assert_eq!(
        server.paths_requested(),
        vec!["/api/ok", "/files/favicon.ico", "/files/site.webmanifest"]
    );
}

#[test]
fn request_is_wrapped_in_generation_envelope() {
    let server = TestServer::start(routes());
    let dest = TempDir::new().unwrap();

    client_for(&server, "/api/ok")
        .generate(&request(), dest.path())
        .unwrap();

    let sent: Value = serde_json::from_str(&server.body_of("/api/ok").unwrap()).unwrap();
    assert_eq!(
        sent,
        json!({"favicon_generation": {"api_key": "k", "favicon_design": {"desktop_browser": {}}}})
    );
}

#[test]
fn error_status_carries_canonical_reason() {
    let server = TestServer::start(routes());
    let dest = TempDir::new().unwrap();

    let err = client_for(&server, "/api/down")
        .generate(&request(), dest.path())
        .unwrap_err();

    match &err {
        GenerationError::Status {
            code,
            status_text,
            body,
        } => {
            assert_eq!(*code, 500);
            assert_eq!(status_text, "Internal Server Error");
            assert_eq!(body, "boom");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
    assert_eq!(err.status_text(), Some("Internal Server Error"));
}

#[test]
fn error_envelope_is_rejected_with_message() {
    let server = TestServer::start(routes());
    let dest = TempDir::new().unwrap();

    let err = client_for(&server, "/api/rejected")
        .generate(&request(), dest.path())
        .unwrap_err();

    assert!(
        matches!(&err, GenerationError::Rejected(message) if message == "Invalid API key"),
        "got {err:?}"
    );
    assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
}

#[test]
fn failed_download_aborts_generation() {
    let server = TestServer::start(routes());
    let dest = TempDir::new().unwrap();

    let err = client_for(&server, "/api/broken")
        .generate(&request(), dest.path())
        .unwrap_err();

    assert!(
        matches!(err, GenerationError::Status { code: 404, .. }),
        "got {err:?}"
    );
    assert!(!dest.path().join("missing.png").exists());
}
