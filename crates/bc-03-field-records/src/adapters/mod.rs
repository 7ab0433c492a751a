//! Adapters for the Field Record Store.

pub mod uplink;

pub use uplink::InMemoryUplink;
