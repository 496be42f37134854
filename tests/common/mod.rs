//! Shared test harness: a canned-response HTTP server bound to a local
//! port that records every request it serves, plus JSON builders for the
//! service's payloads.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

/// One endpoint with a queue of responses. Responses are consumed in
/// order; the last one keeps being served so repeated fetches stay cheap
/// to script.
pub struct Route {
    method: String,
    path: String,
    responses: VecDeque<(u16, String)>,
}

impl Route {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            responses: VecDeque::new(),
        }
    }

    pub fn respond(mut self, status: u16, body: &str) -> Self {
        self.responses.push_back((status, body.to_string()));
        self
    }
}

pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(Mutex::new(routes));

        let accept_requests = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let requests = accept_requests.clone();
                let routes = routes.clone();
                tokio::spawn(async move {
                    serve_connection(stream, routes, requests).await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Handle exactly one request; responses carry `Connection: close` so the
/// client opens a fresh connection each time.
async fn serve_connection(
    mut stream: TcpStream,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
) {
    let (read_half, mut write_half) = stream.split();
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut authorization = None;
    let mut content_type = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let lower = line.to_ascii_lowercase();
        if let Some(value) = lower.strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        } else if lower.starts_with("authorization:") {
            authorization = Some(line["authorization:".len()..].trim().to_string());
        } else if lower.starts_with("content-type:") {
            content_type = Some(line["content-type:".len()..].trim().to_string());
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body).await.is_err() {
        return;
    }

    requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization,
        content_type,
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let (status, response_body) = {
        let mut routes = routes.lock().unwrap();
        match routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
        {
            Some(route) if !route.responses.is_empty() => {
                if route.responses.len() > 1 {
                    route.responses.pop_front().unwrap()
                } else {
                    route.responses.front().unwrap().clone()
                }
            }
            _ => (404, r#"{"detail": "Not found."}"#.to_string()),
        }
    };

    let reason = match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        response_body.len(),
        response_body
    );
    let _ = write_half.write_all(response.as_bytes()).await;
    let _ = write_half.shutdown().await;
}

// --- JSON builders for the service's canned payloads ---

pub fn user_json() -> String {
    r#"{"id": 1, "email": "a@x.com", "username": "a"}"#.to_string()
}

pub fn auth_response_json(access: &str, refresh: &str) -> String {
    format!(
        r#"{{"tokens": {{"access": "{}", "refresh": "{}"}}, "user": {}}}"#,
        access,
        refresh,
        user_json()
    )
}

pub fn resume_json(id: i64, filename: &str) -> String {
    format!(
        r#"{{"id": {}, "original_filename": "{}", "file_type": "PDF",
            "uploaded_at": "2024-05-01T12:00:00Z"}}"#,
        id, filename
    )
}

pub fn job_json(id: i64, title: &str) -> String {
    format!(
        r#"{{"id": {}, "title": "{}", "company": "Tech Corp",
            "description": "Build things in Rust", "created_at": "2024-05-01T12:00:00Z"}}"#,
        id, title
    )
}

pub fn analysis_record_json(id: i64, resume_id: i64, job_id: i64, score: u8) -> String {
    format!(
        r#"{{"id": {}, "resume": {}, "job_description": {}, "ats_score": {},
            "extracted_skills": ["python"], "matched_skills": [],
            "missing_keywords": ["docker"],
            "recommendations": "Add Docker experience.",
            "created_at": "2024-05-01T12:00:00Z"}}"#,
        id,
        resume_json(resume_id, "resume.pdf"),
        job_json(job_id, "Senior Engineer"),
        score
    )
}
