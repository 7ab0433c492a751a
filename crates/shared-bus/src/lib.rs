//! # Shared Bus - Event Bus for Inter-Subsystem Communication
//!
//! Choreography backbone of the platform: subsystems never call each
//! other directly; they publish domain events here and react to the
//! events of others.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Field Records│                    │   Registry   │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! The in-memory implementation rides on `tokio::sync::broadcast` and is
//! sufficient for the single-session client runtime; a networked backend
//! would implement the same [`EventPublisher`] seam.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, PlatformEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Dead-letter topic name for failed choreography steps.
pub const DLQ_TOPIC: &str = "dlq.critical";
