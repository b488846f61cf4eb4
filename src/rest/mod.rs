//! REST transport layer
//!
//! Generic HTTP client with retry, throttling and session authentication.
//! Services never touch reqwest directly; everything goes through
//! [`RestClient`].

mod client;
mod throttle;

pub use client::{Backoff, RequestConfig, RestClient, RestConfig, RestConfigBuilder};
pub use throttle::{Throttle, ThrottleConfig};
