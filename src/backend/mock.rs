//! Scripted in-memory gateway for deterministic testing
//!
//! Responses are queued per command and consumed in call order. A response can
//! be *held*: the call suspends until the test releases it, which makes
//! out-of-order resolution reproducible.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use workspace_browser::backend::{Backend, MockGateway};
//!
//! # async fn demo() {
//! let mock = Arc::new(MockGateway::new());
//! mock.respond_ok("get_repositories", json!([]));
//! let release = mock.respond_held("get_workspace_files", Ok(json!([])));
//!
//! let backend = Backend::new(mock.clone());
//! // ... the held call resolves only after:
//! release.release();
//! # }
//! ```

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use super::{Args, BackendError, BackendGateway};

/// A call observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub command: String,
    pub args: Args,
}

struct Scripted {
    result: Result<Value, BackendError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Releases a held response
pub struct Release(oneshot::Sender<()>);

impl Release {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

/// Mock gateway for testing
#[derive(Default)]
pub struct MockGateway {
    queued: Mutex<HashMap<String, VecDeque<Scripted>>>,
    fallback: Mutex<HashMap<String, Result<Value, BackendError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for the next call to `command`
    pub fn respond_ok(&self, command: &str, value: Value) {
        self.push(command, Ok(value), None);
    }

    /// Queue a failure for the next call to `command`
    pub fn respond_err(&self, command: &str, message: &str) {
        self.push(command, Err(BackendError::remote(message)), None);
    }

    /// Queue a response that is only delivered once released
    pub fn respond_held(&self, command: &str, result: Result<Value, BackendError>) -> Release {
        let (tx, rx) = oneshot::channel();
        self.push(command, result, Some(rx));
        Release(tx)
    }

    /// Response used whenever nothing is queued for `command`
    pub fn set_default(&self, command: &str, result: Result<Value, BackendError>) {
        self.fallback.lock().insert(command.to_string(), result);
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received for `command`
    pub fn call_count(&self, command: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.command == command)
            .count()
    }

    fn push(&self, command: &str, result: Result<Value, BackendError>, gate: Option<oneshot::Receiver<()>>) {
        self.queued
            .lock()
            .entry(command.to_string())
            .or_default()
            .push_back(Scripted { result, gate });
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn call(&self, command: &str, args: Args) -> Result<Value, BackendError> {
        self.calls.lock().push(RecordedCall {
            command: command.to_string(),
            args,
        });

        let scripted = self
            .queued
            .lock()
            .get_mut(command)
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(Scripted { result, gate }) => {
                if let Some(gate) = gate {
                    // A dropped release handle lets the call through
                    let _ = gate.await;
                }
                result
            }
            None => self
                .fallback
                .lock()
                .get(command)
                .cloned()
                .unwrap_or_else(|| {
                    Err(BackendError::remote(format!(
                        "no scripted response for {command}"
                    )))
                }),
        }
    }
}
