//! Asynchronous job polling
//!
//! Long-running operations are accepted by the server with a status URI
//! and finish later. [`FutureResult`] drives the polling loop; a
//! [`PollHandler`] interprets each status response for one kind of job.

mod future;
mod handler;

pub use future::FutureResult;
pub use handler::{JsonPollHandler, PollHandler, PollOutcome, PollResponse, TaskPollHandler};

#[cfg(test)]
mod tests;
