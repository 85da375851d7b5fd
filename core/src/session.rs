//! Process-wide session state: the single owner of the bearer credential.
//!
//! # Design
//! `Session` is a cheap, cloneable handle. The client and the hosting shell
//! share one instance; the shell subscribes to [`SessionEvent`]s and performs
//! navigation itself. The credential lock is only held for the duration of a
//! read or swap and never across an `.await`.
//!
//! Invalidation is a compare-and-clear: only the call that actually removes a
//! held credential publishes `Ended(Invalidated)`, so any number of concurrent
//! `INVALID_TOKEN` responses produce exactly one event.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::info;

const EVENT_CAPACITY: usize = 16;

/// An opaque bearer token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The user logged out.
    LoggedOut,
    /// The backend rejected the credential with `INVALID_TOKEN`.
    Invalidated,
}

/// Observable session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    Ended(EndReason),
}

struct Inner {
    credential: RwLock<Option<Credential>>,
    events: Sender<SessionEvent>,
}

/// Shared handle to the session credential and its event stream.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                credential: RwLock::new(None),
                events,
            }),
        }
    }

    /// Store a new credential, replacing any previous one.
    pub fn set(&self, credential: Credential) {
        *self.write() = Some(credential);
        info!("session started");
        self.publish(SessionEvent::Started);
    }

    /// Drop the credential because the user logged out.
    ///
    /// Returns false if no credential was held.
    pub fn clear(&self) -> bool {
        self.end(EndReason::LoggedOut)
    }

    /// Drop the credential because the backend rejected it.
    ///
    /// Returns true only for the call that actually cleared a credential.
    pub fn invalidate(&self) -> bool {
        self.end(EndReason::Invalidated)
    }

    /// The credential as of now. Requests capture this once at build time.
    pub fn credential(&self) -> Option<Credential> {
        self.inner
            .credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Receive every transition published after this call.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    fn end(&self, reason: EndReason) -> bool {
        let removed = self.write().take();
        if removed.is_none() {
            return false;
        }
        info!(?reason, "session ended");
        self.publish(SessionEvent::Ended(reason));
        true
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Credential>> {
        self.inner
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is not an error.
        let _ = self.inner.events.send(event);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
