//! # Event Bus System
//!
//! Provides an event-driven channel for the Fleet Yard core using
//! `tokio::sync::broadcast`, so hosts can react to auth and yard changes
//! without polling.
//!
//! ## Overview
//!
//! - **Event Types**: `CoreEvent` wraps the per-domain enums
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Receiver wrapper with optional filtering
//!
//! ```text
//! ┌──────────────┐   emit    ┌───────────┐  subscribe  ┌────────────┐
//! │ AuthManager  ├──────────>│ EventBus  ├────────────>│ Host / UI  │
//! └──────────────┘           │ (broadcast│             └────────────┘
//! ┌──────────────┐   emit    │  channel) │
//! │ CoreService  ├──────────>│           │
//! └──────────────┘           └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(32);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Auth(AuthEvent::SignedOut { uid: None }))
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert!(matches!(event, CoreEvent::Auth(_)));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events; it can keep going.
//! - **`RecvError::Closed`**: every sender was dropped; treat it as shutdown.
//!
//! `emit` fails only when nobody is subscribed. Emitters ignore that case.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Identity changes, mirrors the provider's auth-state listener
    Auth(AuthEvent),
    /// Local yard data changes
    Yard(YardEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Auth(e) => e.description(),
            CoreEvent::Yard(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Auth(AuthEvent::AuthError { .. }) => EventSeverity::Error,
            CoreEvent::Auth(AuthEvent::SignedIn { .. }) => EventSeverity::Info,
            CoreEvent::Yard(YardEvent::MockDataSeeded { .. }) => EventSeverity::Info,
            CoreEvent::Yard(YardEvent::LocalDataCleared) => EventSeverity::Warning,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Authentication Events
// ============================================================================

/// Events related to the signed-in identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    /// A user signed in or registered.
    SignedIn {
        uid: String,
        /// Already redacted for logging
        email: String,
    },
    /// The session ended. `uid` is absent when nobody was signed in.
    SignedOut { uid: Option<String> },
    /// The display name changed.
    ProfileUpdated {
        uid: String,
        display_name: Option<String>,
    },
    /// A provider call failed.
    AuthError {
        /// Localization key of the mapped error code
        code: String,
        /// User-facing message
        message: String,
    },
}

impl AuthEvent {
    fn description(&self) -> &str {
        match self {
            AuthEvent::SignedIn { .. } => "User signed in successfully",
            AuthEvent::SignedOut { .. } => "User signed out",
            AuthEvent::ProfileUpdated { .. } => "User profile updated",
            AuthEvent::AuthError { .. } => "Authentication error",
        }
    }
}

// ============================================================================
// Yard Events
// ============================================================================

/// Events related to the local yard collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum YardEvent {
    /// First-run seeding wrote the slot grid and its motorcycles.
    MockDataSeeded { vagas: usize, motos: usize },
    /// All local collections were dropped.
    LocalDataCleared,
}

impl YardEvent {
    fn description(&self) -> &str {
        match self {
            YardEvent::MockDataSeeded { .. } => "Yard seeded with mock data",
            YardEvent::LocalDataCleared => "Local yard data cleared",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel for core events.
///
/// Cloning the bus is cheap; every clone publishes into the same channel.
/// Subscribers only see events emitted after they subscribed.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Creates a new [`EventStream`] subscriber.
    pub fn stream(&self) -> EventStream {
        EventStream::new(self.subscribe())
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(16);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus};
///
/// let event_bus = EventBus::default();
/// let auth_only = event_bus
///     .stream()
///     .filter(|event| matches!(event, CoreEvent::Auth(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` once all senders are gone.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching event is currently queued.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> CoreEvent {
        CoreEvent::Auth(AuthEvent::SignedIn {
            uid: "uid-1".to_string(),
            email: "o***@[REDACTED]".to_string(),
        })
    }

    #[tokio::test]
    async fn test_emit_and_receive() {
        let bus = EventBus::new(10);
        let mut subscriber = bus.subscribe();

        let delivered = bus.emit(signed_in()).unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(subscriber.recv().await.unwrap(), signed_in());
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(CoreEvent::Yard(YardEvent::LocalDataCleared)).unwrap();

        assert_eq!(
            first.recv().await.unwrap(),
            CoreEvent::Yard(YardEvent::LocalDataCleared)
        );
        assert_eq!(
            second.recv().await.unwrap(),
            CoreEvent::Yard(YardEvent::LocalDataCleared)
        );
    }

    #[test]
    fn test_emit_without_subscribers_fails() {
        let bus = EventBus::new(4);
        assert!(bus.emit(signed_in()).is_err());
    }

    #[tokio::test]
    async fn test_stream_filter_skips_other_domains() {
        let bus = EventBus::new(10);
        let mut stream = bus
            .stream()
            .filter(|event| matches!(event, CoreEvent::Yard(_)));

        bus.emit(signed_in()).unwrap();
        bus.emit(CoreEvent::Yard(YardEvent::MockDataSeeded { vagas: 80, motos: 28 }))
            .unwrap();

        let event = stream.recv().await.unwrap();
        assert_eq!(
            event,
            CoreEvent::Yard(YardEvent::MockDataSeeded { vagas: 80, motos: 28 })
        );
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut stream = bus.stream();

        for _ in 0..4 {
            bus.emit(signed_in()).unwrap();
        }

        assert!(matches!(stream.try_recv(), Some(Err(RecvError::Lagged(_)))));
        assert!(matches!(stream.try_recv(), Some(Ok(_))));
    }

    #[test]
    fn test_severity_and_description() {
        let error = CoreEvent::Auth(AuthEvent::AuthError {
            code: "auth.errors.wrongPassword".to_string(),
            message: "Senha incorreta.".to_string(),
        });
        assert_eq!(error.severity(), EventSeverity::Error);
        assert_eq!(error.description(), "Authentication error");

        assert_eq!(signed_in().severity(), EventSeverity::Info);
        assert_eq!(
            CoreEvent::Auth(AuthEvent::SignedOut { uid: None }).severity(),
            EventSeverity::Debug
        );
        assert!(EventSeverity::Error > EventSeverity::Warning);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(CoreEvent::Yard(YardEvent::MockDataSeeded {
            vagas: 80,
            motos: 30,
        }))
        .unwrap();

        assert_eq!(json["type"], "Yard");
        assert_eq!(json["payload"]["event"], "MockDataSeeded");
        assert_eq!(json["payload"]["vagas"], 80);

        let back: CoreEvent = serde_json::from_value(json).unwrap();
        assert!(matches!(back, CoreEvent::Yard(YardEvent::MockDataSeeded { .. })));
    }
}
