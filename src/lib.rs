//! # Meridian SDK
//!
//! Async Rust client for the Meridian analytics platform REST API.
//!
//! The platform exposes long-running work (project provisioning,
//! metadata export/import, validation, connector synchronization) as
//! fire-and-poll HTTP resources: a POST is accepted with a status URI,
//! and the client polls that URI until a terminal state. This crate
//! wraps that pattern in [`poll::FutureResult`] and exposes each
//! resource family as a typed service.
//!
//! ## Quick start
//!
//! ```no_run
//! use meridian_sdk::{Credentials, Endpoint, Meridian};
//! use meridian_sdk::model::Project;
//!
//! # async fn run() -> meridian_sdk::Result<()> {
//! let sdk = Meridian::connect(
//!     Endpoint::new("https://analytics.example.com")?,
//!     Credentials::login_password("alice@example.com", "secret"),
//! )?;
//!
//! let project = sdk
//!     .projects()
//!     .create_project(&Project::new("Sales", "auth-token"))
//!     .await?
//!     .get()
//!     .await?;
//!
//! println!("created {}", project.uri.unwrap_or_default());
//! sdk.logout().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`client`]: the [`Meridian`] entry point, endpoint and settings
//! - [`service`]: one typed service per resource family
//! - [`poll`]: the polling abstraction for server-side jobs
//! - [`model`]: serde DTOs for the wire format
//! - [`rest`]: the shared HTTP client (retries, throttling, auth)
//! - [`auth`]: session-token authentication
//! - [`paging`]: helpers for paged list resources

pub mod auth;
pub mod client;
pub mod error;
pub mod model;
pub mod paging;
pub mod poll;
pub mod rest;
pub mod service;
pub mod validate;

pub use auth::Credentials;
pub use client::{Endpoint, Meridian, Settings};
pub use error::{Error, Result};
pub use poll::FutureResult;
