//! Authentication
//!
//! Session-token retrieval and caching. The REST client asks the
//! [`SessionProvider`] to stamp every outgoing request.

mod session;

pub use session::{CachedToken, Credentials, SessionProvider, SESSION_TOKEN_HEADER};

#[cfg(test)]
mod tests;
