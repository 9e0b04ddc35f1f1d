//! Test doubles: a routing fake transport and a log capture.

use std::cell::RefCell;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

use crate::client::GrocyClient;
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::logging::LogHandle;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

pub(crate) const TEST_BASE_URL: &str = "https://grocy.test/api";
const BASE_PATH: &str = "/api";

struct Route {
    method: Method,
    path: String,
    reply: Result<ApiResponse, TransportError>,
}

/// Replies to requests by method and path (below `/api`, query ignored).
///
/// Each route answers once, in registration order; unmatched requests fail
/// like a refused connection.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: RefCell<Vec<Route>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        FakeTransport::default()
    }

    fn route(self, method: Method, path: &str, reply: Result<ApiResponse, TransportError>) -> Self {
        self.routes.borrow_mut().push(Route {
            method,
            path: path.to_string(),
            reply,
        });
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.route(Method::Get, path, Ok(ApiResponse::new(status, body)))
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.route(Method::Post, path, Ok(ApiResponse::new(status, body)))
    }

    pub fn on_get_json(self, path: &str, body: Value) -> Self {
        self.on_get(path, 200, &body.to_string())
    }

    pub fn on_post_json(self, path: &str, body: Value) -> Self {
        self.on_post(path, 200, &body.to_string())
    }

    pub fn fail_get(self, path: &str) -> Self {
        self.route(
            Method::Get,
            path,
            Err(TransportError::Request("connection reset".to_string())),
        )
    }

    pub fn fail_post(self, path: &str) -> Self {
        self.route(
            Method::Post,
            path,
            Err(TransportError::Request("connection reset".to_string())),
        )
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    /// `"GET /objects/products"`-style summary of every request sent.
    pub fn calls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method, relative_path(r)))
            .collect()
    }
}

fn relative_path(request: &ApiRequest) -> String {
    let path = request.url.path();
    path.strip_prefix(BASE_PATH).unwrap_or(path).to_string()
}

impl Transport for FakeTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());

        let path = relative_path(request);
        let mut routes = self.routes.borrow_mut();
        match routes
            .iter()
            .position(|r| r.method == request.method && r.path == path)
        {
            Some(index) => routes.remove(index).reply,
            None => Err(TransportError::Request(format!(
                "connection refused: {} {path}",
                request.method
            ))),
        }
    }
}

pub(crate) fn client_with<T: Transport>(transport: T) -> GrocyClient<T> {
    let config = ClientConfig::new(TEST_BASE_URL, "test-api-key").unwrap();
    GrocyClient::with_transport(config, transport).unwrap()
}

/// A client whose log output is captured.
pub(crate) fn logged_client_with<T: Transport>(transport: T) -> (GrocyClient<T>, CapturedLogs) {
    let (log, captured) = capture_logs();
    (client_with(transport).with_logger(log), captured)
}

// =============================================================================
// Log Capture
// =============================================================================

#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn error_count(&self) -> usize {
        self.contents()
            .lines()
            .filter(|line| line.contains(" ERROR "))
            .count()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// A dispatcher writing plain-text events into a buffer.
pub(crate) fn capture_dispatch() -> (Dispatch, CapturedLogs) {
    let captured = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    (Dispatch::new(subscriber), captured)
}

pub(crate) fn capture_logs() -> (LogHandle, CapturedLogs) {
    let (dispatch, captured) = capture_dispatch();
    (LogHandle::from_dispatch(dispatch), captured)
}
