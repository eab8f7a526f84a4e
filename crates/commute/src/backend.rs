use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use aptscout_core::CommuteRequest;
use async_trait::async_trait;

use crate::CommuteError;

/// One batched distance-matrix exchange. Returns the raw text the maps server produced.
#[async_trait]
pub trait CommuteBackend: Send + Sync {
    fn name(&self) -> &'static str;
    async fn distance_matrix(&self, request: &CommuteRequest) -> Result<String, CommuteError>;
}

#[derive(Debug)]
enum StaticResponse {
    Text(String),
    Failure(String),
}

/// Backend that answers every request with the same canned response and records what it saw.
#[derive(Debug)]
pub struct StaticCommuteBackend {
    response: StaticResponse,
    calls: AtomicUsize,
    requests: Mutex<Vec<CommuteRequest>>,
}

impl StaticCommuteBackend {
    pub fn text(raw: impl Into<String>) -> Self {
        Self::with_response(StaticResponse::Text(raw.into()))
    }

    /// Fails every call with [`CommuteError::Call`] carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_response(StaticResponse::Failure(message.into()))
    }

    fn with_response(response: StaticResponse) -> Self {
        Self { response, calls: AtomicUsize::new(0), requests: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CommuteRequest> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CommuteBackend for StaticCommuteBackend {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn distance_matrix(&self, request: &CommuteRequest) -> Result<String, CommuteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.response {
            StaticResponse::Text(raw) => Ok(raw.clone()),
            StaticResponse::Failure(message) => Err(CommuteError::Call(message.clone())),
        }
    }
}
