//! Test doubles shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::GatewayError;
use crate::gateway::{Gateway, Method};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

struct Scripted {
    result: Result<Value, GatewayError>,
    delay: Option<Duration>,
}

/// Gateway that replays queued responses in call order and records every
/// request it receives.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, value: Value) {
        self.push(Ok(value), None);
    }

    pub fn push_err(&self, err: GatewayError) {
        self.push(Err(err), None);
    }

    pub fn push_delayed(&self, value: Value, delay: Duration) {
        self.push(Ok(value), Some(delay));
    }

    fn push(&self, result: Result<Value, GatewayError>, delay: Option<Duration>) {
        self.script.lock().unwrap().push_back(Scripted { result, delay });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });
        let next = self.script.lock().unwrap().pop_front();
        let Some(next) = next else {
            return Err(GatewayError::transport(format!(
                "no scripted response for {} {}",
                method, path
            )));
        };
        if let Some(delay) = next.delay {
            tokio::time::sleep(delay).await;
        }
        next.result
    }
}
