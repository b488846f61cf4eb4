//! Polling driver for server-side jobs

use super::handler::{PollHandler, PollOutcome};
use crate::error::{Error, Result};
use crate::rest::RestClient;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(5);

/// A server-side job in progress.
///
/// Holds the status URI of an accepted job and a [`PollHandler`] that
/// interprets status responses. Callers either drive it step by step
/// with [`poll`](Self::poll), or wait for the result with
/// [`get`](Self::get) / [`get_within`](Self::get_within).
///
/// When a non-terminal response carries a `Location` header, subsequent
/// polls follow the new URI.
pub struct FutureResult<T> {
    client: RestClient,
    handler: Box<dyn PollHandler<Output = T> + Send>,
    polling_uri: String,
    interval: Duration,
    max_interval: Duration,
    polls: u32,
    result: Option<T>,
}

impl<T: Send> FutureResult<T> {
    /// Job polled at `polling_uri`, interpreted by `handler`
    pub fn new(
        client: RestClient,
        polling_uri: impl Into<String>,
        handler: impl PollHandler<Output = T> + 'static,
    ) -> Self {
        Self {
            client,
            handler: Box::new(handler),
            polling_uri: polling_uri.into(),
            interval: DEFAULT_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
            polls: 0,
            result: None,
        }
    }

    /// Override the polling cadence.
    ///
    /// The delay between polls grows linearly from `interval` and is
    /// capped at `max_interval`.
    #[must_use]
    pub fn with_cadence(mut self, interval: Duration, max_interval: Duration) -> Self {
        self.interval = interval;
        self.max_interval = max_interval;
        self
    }

    /// URI currently being polled
    pub fn polling_uri(&self) -> &str {
        &self.polling_uri
    }

    /// Number of polling requests performed so far
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// True once the job finished and the result is held
    pub fn is_done(&self) -> bool {
        self.result.is_some()
    }

    /// Perform one polling step.
    ///
    /// Returns `Ok(true)` once the job finished successfully (the result
    /// is held until [`get`](Self::get) consumes it), `Ok(false)` while
    /// it is still running, and an error when the job failed or polling
    /// itself failed.
    pub async fn poll(&mut self) -> Result<bool> {
        if self.result.is_some() {
            return Ok(true);
        }

        self.polls += 1;
        let response = match self.client.poll(&self.polling_uri).await {
            Ok(response) => response,
            Err(e) => return Err(self.handler.on_transport_error(e)),
        };

        match self.handler.on_response(&response)? {
            PollOutcome::Done(value) => {
                debug!(uri = %self.polling_uri, polls = self.polls, "Job finished");
                self.result = Some(value);
                Ok(true)
            }
            PollOutcome::Pending => {
                if let Some(location) = response.location {
                    if location != self.polling_uri {
                        debug!(from = %self.polling_uri, to = %location, "Status resource moved");
                        self.polling_uri = location;
                    }
                }
                Ok(false)
            }
        }
    }

    /// Poll until the job finishes and return its result
    pub async fn get(mut self) -> Result<T> {
        loop {
            if self.poll().await? {
                return self.take_result();
            }
            tokio::time::sleep(self.delay()).await;
        }
    }

    /// Poll until the job finishes, giving up after `timeout`.
    ///
    /// The deadline is checked between polls; a polling request already
    /// in flight is never abandoned. On expiry the job keeps running
    /// server-side and [`Error::PollTimeout`] names its status URI.
    pub async fn get_within(mut self, timeout: Duration) -> Result<T> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.poll().await? {
                return self.take_result();
            }
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return Err(Error::PollTimeout {
                    uri: self.polling_uri,
                    timeout_ms: timeout.as_millis() as u64,
                });
            };
            if remaining.is_zero() {
                return Err(Error::PollTimeout {
                    uri: self.polling_uri,
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.delay().min(remaining)).await;
        }
    }

    fn take_result(&mut self) -> Result<T> {
        self.result
            .take()
            .ok_or_else(|| Error::Other("job result already consumed".to_string()))
    }

    fn delay(&self) -> Duration {
        self.interval
            .saturating_mul(self.polls.max(1))
            .min(self.max_interval)
    }
}

impl<T> std::fmt::Debug for FutureResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FutureResult")
            .field("polling_uri", &self.polling_uri)
            .field("polls", &self.polls)
            .field("done", &self.result.is_some())
            .finish_non_exhaustive()
    }
}
