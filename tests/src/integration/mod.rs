//! # Integration Tests
//!
//! Cross-crate flows: signing workflow, event bus and runtime wiring.

pub mod concurrency;
pub mod signing_flow;
