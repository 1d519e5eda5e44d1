use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{Args, BackendError, BackendGateway};

/// Bounds every call of the wrapped gateway with a deadline.
///
/// An expired call reports [`BackendError::Timeout`]; the inner future is
/// dropped, which is all the cancellation the boundary offers.
pub struct TimeoutGateway<G> {
    inner: G,
    deadline: Duration,
}

impl<G: BackendGateway> TimeoutGateway<G> {
    pub fn new(inner: G, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl<G: BackendGateway> BackendGateway for TimeoutGateway<G> {
    async fn call(&self, command: &str, args: Args) -> Result<Value, BackendError> {
        match tokio::time::timeout(self.deadline, self.inner.call(command, args)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(command, deadline_ms = self.deadline.as_millis() as u64, "Backend call timed out");
                Err(BackendError::Timeout {
                    command: command.to_string(),
                    after: self.deadline,
                })
            }
        }
    }
}
