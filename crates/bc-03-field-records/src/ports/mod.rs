//! Ports for the Field Record Store subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::FieldRecordsApi;
pub use outbound::RecordUplink;
