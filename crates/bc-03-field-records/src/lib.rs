//! # Field Record Store Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Offline-first store for field measurement batches. Measurements are
//! captured on a field device with no connectivity assumption, queued
//! durably, and synced to the platform when connectivity resumes.
//!
//! ## Sync Protocol
//!
//! ```text
//! [Offline] ──sync──→ [Syncing] ──accept──→ [Synced] (dequeued, archived)
//!                          │
//!                          └──transient failure──→ [Error] (stays queued)
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Queue drains strictly FIFO, oldest first | `domain/queue.rs` - `snapshot()` order |
//! | A record that errors is retried on the next sync | `service.rs` - errored records stay queued |
//! | One sync in flight per device | `service.rs` - `try_lock` single-flight guard |
//! | Cancellation never leaves a record half-applied | `service.rs` - cancel checked between records |
//! | Re-submitting a record is idempotent | `domain/dedupe.rs` + uplink adapter |
//! | Synced records are never deleted | `domain/archive.rs` - append-only |
//!
//! The measurement id doubles as the idempotency key: a crash between
//! the uplink accepting a record and the queue persisting the dequeue is
//! resolved on the next sync by the uplink's dedupe cache, so retries
//! can never double-archive a measurement.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryUplink;
pub use domain::*;
pub use ports::*;
pub use service::FieldRecordService;
