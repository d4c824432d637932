//! Scripted HTTP client shared by the resolver and webhook tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Mock HTTP client that replays a queue of results and records requests.
///
/// Once the queue is empty every further call times out.
#[derive(Debug, Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn status(code: u16) -> Self {
        Self::new(vec![Ok(response(code, ""))])
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Builds a response with the given status and text body.
pub fn response(code: u16, body: &str) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::from_u16(code).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    )
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(HttpError::Timeout))
    }
}

impl HttpClient for std::sync::Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}
