//! Typed services over the platform's resource families
//!
//! Each service holds a clone of the shared [`RestClient`]. Operations
//! validate their arguments before any network call, build the templated
//! resource path, issue the request, and map responses to typed results
//! (404 becomes a typed not-found error where the lookup defines one).
//! Long-running operations return a [`crate::poll::FutureResult`].

mod accounts;
mod connectors;
mod exports;
mod metadata;
mod projects;

pub use accounts::AccountService;
pub use connectors::ConnectorService;
pub use exports::ExportImportService;
pub use metadata::MetadataService;
pub use projects::ProjectService;

use crate::poll::{FutureResult, PollHandler};
use crate::rest::RestClient;
use std::time::Duration;

/// Polling cadence shared by all services of one client instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCadence {
    /// Initial delay between polls
    pub interval: Duration,
    /// Cap for the linearly growing delay
    pub max_interval: Duration,
}

impl Default for PollCadence {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(5),
        }
    }
}

impl PollCadence {
    pub(crate) fn future<T: Send>(
        self,
        client: RestClient,
        uri: impl Into<String>,
        handler: impl PollHandler<Output = T> + 'static,
    ) -> FutureResult<T> {
        FutureResult::new(client, uri, handler).with_cadence(self.interval, self.max_interval)
    }
}
