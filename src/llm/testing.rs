// file: src/llm/testing.rs
// description: scripted in-process transport for exercising generation without a network
// reference: internal test utilities

use crate::error::{DspError, Result};
use crate::llm::client::{CompletionRequest, LlmTransport};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<String> + Send + Sync>;
type Latency = Box<dyn Fn(&CompletionRequest) -> Duration + Send + Sync>;

pub struct MockTransport {
    responder: Responder,
    latency: Latency,
    calls: AtomicU32,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockTransport {
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            latency: Box::new(|_| Duration::ZERO),
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::with_responder(move |_| Ok(reply.clone()))
    }

    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::with_responder(move |_| Err(DspError::Llm(message.clone())))
    }

    pub fn with_latency<F>(mut self, latency: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Duration + Send + Sync + 'static,
    {
        self.latency = Box::new(latency);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmTransport for MockTransport {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let delay = (self.latency)(request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        (self.responder)(request)
    }
}
