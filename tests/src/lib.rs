//! # Blue-Carbon MRV Test Suite
//!
//! Cross-subsystem integration tests over the real wired services and
//! the shared bus. Unit coverage lives next to each subsystem's code;
//! this crate exercises the flows no single crate can see.

pub mod integration;
