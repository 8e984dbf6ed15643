// tests/common.rs

use githubdl::errors::Result;
use githubdl::git::{ContentFetcher, Downloader, HttpResponse, Transport};
use std::collections::HashMap;
use std::process::Command;
use std::sync::{Arc, Mutex};

// Helper function to get the binary command
#[allow(dead_code)] // This is used by many integration tests, but not all.
pub fn githubdl_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("githubdl"))
}

/// An in-memory GitHub API. Unknown URLs answer 404 with GitHub's error body.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<String, HttpResponse>,
    requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` with status 200 at `url`.
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            HttpResponse {
                status: 200,
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    pub fn with_status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            HttpResponse {
                status,
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| *u == url).count()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(self.routes.get(url).cloned().unwrap_or_else(|| HttpResponse {
            status: 404,
            body: br#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#
                .to_vec(),
        }))
    }
}

/// A downloader with `jobs` workers on top of `transport`.
#[allow(dead_code)]
pub fn downloader(transport: Arc<MockTransport>, jobs: usize) -> Downloader {
    Downloader::new(ContentFetcher::new(transport), jobs).unwrap()
}

/// A JSON directory listing from `(name, type)` pairs.
#[allow(dead_code)]
pub fn listing(entries: &[(&str, &str)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(name, kind)| format!(r#"{{"name":"{}","type":"{}","sha":"0"}}"#, name, kind))
        .collect();
    format!("[{}]", items.join(","))
}
