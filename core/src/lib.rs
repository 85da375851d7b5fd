//! Authenticated client for the catalog admin API.
//!
//! # Overview
//! One client, one session, one envelope contract. Every resource facade
//! (products, categories, admin users, dashboard, inventory, invoices, auth)
//! is a table of named operations over [`ApiClient::execute`], so credential
//! handling and failure classification live in exactly one place.
//!
//! # Design
//! - Request building and response parsing are pure functions of their
//!   inputs plus the current [`Session`]; the [`Transport`] trait is the only
//!   I/O seam (host-does-IO). [`ReqwestTransport`] is the bundled default.
//! - The bearer credential has a single owner, [`Session`]. A response
//!   carrying `INVALID_TOKEN` clears it and publishes
//!   `SessionEvent::Ended(EndReason::Invalidated)`; hosts subscribe and
//!   decide how to get the user back to a login screen.
//! - A 2xx response whose envelope says `success: false` is a failure.
//! - No retries. Each call is one attempt.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{ApiClient, NO_BODY};
pub use config::{ClientConfig, ConfigError, ConfigLoader};
pub use endpoint::Endpoint;
pub use envelope::{Envelope, ErrorBody};
pub use error::{ApiError, ErrorKind, INVALID_TOKEN};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{Credential, EndReason, Session, SessionEvent};
pub use transport::{ReqwestTransport, Transport};
