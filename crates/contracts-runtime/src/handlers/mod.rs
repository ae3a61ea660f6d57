//! # Event Handlers
//!
//! Subscribers that react to contract events on the bus.

pub mod notifications;

pub use notifications::NotificationHandler;
