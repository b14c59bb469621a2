//! HTTP module
//!
//! Request descriptors and the transport seam.
//!
//! # Overview
//!
//! - `PendingRequest` - mutable per-call descriptor the authenticator edits
//! - `HttpResponse` - status, headers and body text
//! - `Transport` - trait for performing one exchange
//! - `ReqwestTransport` - default reqwest-backed transport

mod request;
mod transport;

pub use request::{HttpResponse, PendingRequest, DEFAULT_TIMEOUT_MS};
pub use transport::{ReqwestTransport, Transport};
