#![allow(dead_code)]

use freshcam_core::{ClassificationRequest, Classifier, ClassifyError, EndpointConfig};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One-shot HTTP server on loopback that records the raw request.
pub struct CannedServer {
    pub base_url: String,
    handle: JoinHandle<String>,
}

impl CannedServer {
    pub fn respond(status_line: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).expect("write response");
            stream.flush().expect("flush");
            String::from_utf8_lossy(&request).into_owned()
        });
        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Raw request text as received.
    pub fn request(self) -> String {
        self.handle.join().expect("server thread")
    }
}

fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("read timeout");
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut header_end = None;
    loop {
        if header_end.is_none() {
            header_end = find(&buf, b"\r\n\r\n").map(|i| i + 4);
        }
        if let Some(end) = header_end {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());
            match length {
                Some(len) if buf.len() >= end + len => break,
                None if !head.contains("transfer-encoding: chunked") => break,
                None if buf.ends_with(b"0\r\n\r\n") => break,
                _ => {}
            }
        }
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    buf
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Base URL of a port nobody listens on.
pub fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn endpoint(base_url: &str) -> EndpointConfig {
    EndpointConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..EndpointConfig::default()
    }
}

pub fn write_photo(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\xFF\xD8\xFFfake-jpeg-bytes\xFF\xD9").expect("write photo");
    path
}

/// Answers every request with the same payload.
pub struct Canned(pub Value);

impl Classifier for Canned {
    fn classify(&self, _request: &ClassificationRequest) -> Result<Value, ClassifyError> {
        Ok(self.0.clone())
    }
}

/// Holds each attempt until the test releases it.
pub struct Gated {
    gates: Mutex<HashMap<u64, Receiver<Result<Value, ClassifyError>>>>,
    returned: Option<Sender<u64>>,
}

impl Gated {
    pub fn new(attempts: &[u64]) -> (Self, HashMap<u64, Sender<Result<Value, ClassifyError>>>) {
        let mut gates = HashMap::new();
        let mut releases = HashMap::new();
        for &attempt in attempts {
            let (tx, rx) = mpsc::channel();
            gates.insert(attempt, rx);
            releases.insert(attempt, tx);
        }
        (
            Self {
                gates: Mutex::new(gates),
                returned: None,
            },
            releases,
        )
    }

    /// Report each attempt number once its `classify` call has returned.
    pub fn reporting(mut self) -> (Self, Receiver<u64>) {
        let (tx, rx) = mpsc::channel();
        self.returned = Some(tx);
        (self, rx)
    }
}

impl Classifier for Gated {
    fn classify(&self, request: &ClassificationRequest) -> Result<Value, ClassifyError> {
        let gate = self.gates.lock().unwrap().remove(&request.attempt());
        let answer = match gate {
            Some(rx) => rx
                .recv()
                .unwrap_or_else(|_| Err(ClassifyError::Transport("gate dropped".into()))),
            None => Err(ClassifyError::Transport("unexpected attempt".into())),
        };
        if let Some(returned) = &self.returned {
            let _ = returned.send(request.attempt());
        }
        answer
    }
}
