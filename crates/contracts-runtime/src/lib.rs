//! # Contracts Runtime Library
//!
//! Exposes the runtime's modules for testing. The main entry point is the
//! `main.rs` binary.
//!
//! - `container/` - Configuration and service wiring
//! - `handlers/` - Event bus subscribers

#![warn(missing_docs)]

pub mod container;
pub mod handlers;

pub use container::{ConfigError, RuntimeConfig, ServiceContainer};
pub use handlers::NotificationHandler;
