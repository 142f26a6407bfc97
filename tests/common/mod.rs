use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use badgr_cli::api::{ApiOutcome, ApiRequest, Transport};

/// Transport double that replays scripted outcomes and records every
/// request it was handed.
pub struct FakeTransport {
    outcomes: Mutex<VecDeque<ApiOutcome>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn scripted(outcomes: Vec<ApiOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A transport that must never be reached.
    pub fn unreachable() -> Self {
        Self::scripted(Vec::new())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> ApiOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called with no scripted outcome left")
    }
}
