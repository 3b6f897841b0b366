use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;

use super::error::TransportError;
use super::response::RawResponse;
use super::transport::ApiTransport;
use crate::form::FormPayload;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub form: Option<FormPayload>,
}

/// Scripted in-memory server. Responses are consumed in order; an empty script
/// behaves like an unreachable host.
#[derive(Default)]
pub(crate) struct FakeTransport {
    script: Mutex<VecDeque<Result<RawResponse, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Option<Arc<Notify>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request waits on `gate` before answering.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn respond_json(self, status: u16, body: Value) -> Self {
        self.script.lock().push_back(Ok(RawResponse::json(status, &body)));
        self
    }

    pub fn respond_raw(self, status: u16, body: &str) -> Self {
        self.script.lock().push_back(Ok(RawResponse::new(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.script.lock().push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    async fn answer(
        &self,
        method: &'static str,
        path: &str,
        form: Option<&FormPayload>,
    ) -> Result<RawResponse, TransportError> {
        self.calls.lock().push(RecordedCall {
            method,
            path: path.to_string(),
            form: form.cloned(),
        });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.script.lock().pop_front();
        match next {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(message)) => Err(TransportError::Unreachable { message }),
            None => Err(TransportError::Unreachable {
                message: "no scripted response".to_string(),
            }),
        }
    }
}

#[async_trait]
impl ApiTransport for FakeTransport {
    async fn post_empty(&self, path: &str) -> Result<RawResponse, TransportError> {
        self.answer("POST", path, None).await
    }

    async fn post_form(
        &self,
        path: &str,
        form: &FormPayload,
    ) -> Result<RawResponse, TransportError> {
        self.answer("POST", path, Some(form)).await
    }

    async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
        self.answer("GET", path, None).await
    }
}
