//! Poll handlers
//!
//! A handler interprets one polling response: is the job still running,
//! did it finish, and what value does a finished job produce. Handlers
//! never decide *when* to poll; cadence and URI migration belong to
//! [`crate::poll::FutureResult`].

use crate::error::{Error, Result};
use crate::model::TaskStatus;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One polling response, decoded far enough for a handler to interpret
#[derive(Debug, Clone)]
pub struct PollResponse {
    /// HTTP status of the polling GET
    pub status: StatusCode,
    /// `Location` header, when the server moved the status resource
    pub location: Option<String>,
    /// JSON body; `Null` when the response had no body
    pub body: Value,
}

impl PollResponse {
    /// Decode the body as `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// True for `202 Accepted`, which always means "still running"
    pub fn is_accepted(&self) -> bool {
        self.status == StatusCode::ACCEPTED
    }
}

/// What a handler concluded from one polling response
#[derive(Debug)]
pub enum PollOutcome<T> {
    /// The job is still running; poll again later
    Pending,
    /// The job finished successfully with this value
    Done(T),
}

/// Interprets polling responses for one kind of server-side job.
pub trait PollHandler: Send {
    /// Value produced by a successfully finished job
    type Output: Send;

    /// Interpret one polling response.
    ///
    /// Returns `Pending` to keep polling, `Done` when the job finished
    /// successfully, or an error when it finished in failure (or the
    /// body could not be decoded).
    fn on_response(&mut self, response: &PollResponse) -> Result<PollOutcome<Self::Output>>;

    /// Map a transport-level polling error before it reaches the caller.
    ///
    /// The default keeps the error as-is. Handlers for resources that
    /// disappear on completion override this to turn a 404 into a typed
    /// not-found error.
    fn on_transport_error(&self, error: Error) -> Error {
        error
    }
}

type Finish<T> = Box<dyn FnOnce(TaskStatus) -> Result<T> + Send>;
type ErrorMapper = Box<dyn Fn(Error) -> Error + Send + Sync>;

/// Handler for jobs reporting progress through the standard task-status
/// document (`{"status": "RUNNING", ...}`).
///
/// `202 Accepted` and non-terminal states are pending. `ERROR` and
/// `CANCELED` become [`Error::TaskFailed`] carrying the server's
/// messages. `OK` runs the `finish` closure, typically one final GET of
/// the produced resource.
pub struct TaskPollHandler<T> {
    operation: String,
    finish: Option<Finish<T>>,
    map_error: Option<ErrorMapper>,
}

impl<T: Send> TaskPollHandler<T> {
    /// Handler named `operation` (used in failure messages), producing
    /// its value from the terminal `OK` status via `finish`.
    pub fn new(
        operation: impl Into<String>,
        finish: impl FnOnce(TaskStatus) -> Result<T> + Send + 'static,
    ) -> Self {
        Self {
            operation: operation.into(),
            finish: Some(Box::new(finish)),
            map_error: None,
        }
    }

    /// Map transport-level polling errors, e.g. 404 into a typed
    /// not-found error.
    #[must_use]
    pub fn map_transport_error(
        mut self,
        map: impl Fn(Error) -> Error + Send + Sync + 'static,
    ) -> Self {
        self.map_error = Some(Box::new(map));
        self
    }
}

impl TaskPollHandler<()> {
    /// Handler for jobs whose completion itself is the result
    pub fn unit(operation: impl Into<String>) -> Self {
        Self::new(operation, |_| Ok(()))
    }
}

impl<T: Send> PollHandler for TaskPollHandler<T> {
    type Output = T;

    fn on_response(&mut self, response: &PollResponse) -> Result<PollOutcome<T>> {
        if response.is_accepted() {
            return Ok(PollOutcome::Pending);
        }

        let status: TaskStatus = response.json()?;
        if !status.is_finished() {
            return Ok(PollOutcome::Pending);
        }
        if !status.is_success() {
            let mut messages = status.messages;
            if messages.is_empty() {
                messages.push(format!("task finished as {:?}", status.status));
            }
            return Err(Error::task_failed(&self.operation, messages));
        }

        let finish = self
            .finish
            .take()
            .ok_or_else(|| Error::Other(format!("{} polled after completion", self.operation)))?;
        Ok(PollOutcome::Done(finish(status)?))
    }

    fn on_transport_error(&self, error: Error) -> Error {
        match &self.map_error {
            Some(map) => map(error),
            None => error,
        }
    }
}

type Convert<P, T> = Box<dyn FnOnce(P) -> Result<T> + Send>;

/// Handler for jobs reporting progress through a domain-specific JSON
/// document instead of the standard task status.
///
/// `finished` inspects the decoded document; once it returns true,
/// `convert` turns the terminal document into the result (returning an
/// error for failed terminal states).
pub struct JsonPollHandler<P, T> {
    operation: String,
    finished: Box<dyn Fn(&P) -> bool + Send>,
    convert: Option<Convert<P, T>>,
    map_error: Option<ErrorMapper>,
}

impl<P: DeserializeOwned, T: Send> JsonPollHandler<P, T> {
    /// Handler decoding `P` from each response, finished per `finished`,
    /// converted to the result by `convert`.
    pub fn new(
        operation: impl Into<String>,
        finished: impl Fn(&P) -> bool + Send + 'static,
        convert: impl FnOnce(P) -> Result<T> + Send + 'static,
    ) -> Self {
        Self {
            operation: operation.into(),
            finished: Box::new(finished),
            convert: Some(Box::new(convert)),
            map_error: None,
        }
    }

    /// Map transport-level polling errors
    #[must_use]
    pub fn map_transport_error(
        mut self,
        map: impl Fn(Error) -> Error + Send + Sync + 'static,
    ) -> Self {
        self.map_error = Some(Box::new(map));
        self
    }
}

impl<P, T> PollHandler for JsonPollHandler<P, T>
where
    P: DeserializeOwned + Send,
    T: Send,
{
    type Output = T;

    fn on_response(&mut self, response: &PollResponse) -> Result<PollOutcome<T>> {
        if response.is_accepted() {
            return Ok(PollOutcome::Pending);
        }

        let progress: P = response.json()?;
        if !(self.finished)(&progress) {
            return Ok(PollOutcome::Pending);
        }

        let convert = self
            .convert
            .take()
            .ok_or_else(|| Error::Other(format!("{} polled after completion", self.operation)))?;
        Ok(PollOutcome::Done(convert(progress)?))
    }

    fn on_transport_error(&self, error: Error) -> Error {
        match &self.map_error {
            Some(map) => map(error),
            None => error,
        }
    }
}
