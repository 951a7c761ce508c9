// Minimal HTTP/1.1 server standing in for the rbxstats API in integration tests.
//
// Routes map a request path (without query string) to a status and body.
// Unknown paths get 404. Every request head is recorded so tests can
// inspect the query string and headers that were sent.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Clone, Default)]
pub struct Routes {
    map: HashMap<String, (u16, String)>,
}

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, status: u16, body: &str) -> Self {
        self.map.insert(path.to_string(), (status, body.to_string()));
        self
    }
}

pub struct ApiServer {
    /// Base URL ending in `/api/`, e.g. "http://127.0.0.1:12345/api/".
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ApiServer {
    /// Raw request heads received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Request targets (`/api/offsets?api=key`) received so far.
    pub fn targets(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.lines().next())
            .filter_map(|line| line.split_whitespace().nth(1))
            .map(str::to_string)
            .collect()
    }
}

/// Starts a server in a background thread. The server runs until the
/// process exits.
pub fn start(routes: Routes) -> ApiServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    let routes = Arc::new(routes);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            handle(stream, &routes, &log);
        }
    });
    ApiServer {
        base_url: format!("http://127.0.0.1:{}/api/", port),
        requests,
    }
}

/// A base URL nothing listens on, for transport failures.
pub fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api/", port)
}

fn handle(mut stream: TcpStream, routes: &Routes, log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut head = Vec::new();
    let mut buf = [0u8; 4096];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    let head = String::from_utf8_lossy(&head).into_owned();
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(head);

    let path = target.split('?').next().unwrap_or("/");
    let path = path.strip_prefix("/api/").unwrap_or(path);
    let (status, body) = routes
        .map
        .get(path)
        .cloned()
        .unwrap_or((404, r#"{"error":"not found"}"#.to_string()));
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
