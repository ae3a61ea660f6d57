//! # Shared Bus - In-Process Event Bus
//!
//! Delivers domain events from the subsystem that produced them to any
//! number of interested subscribers.
//!
//! ## Choreography Pattern
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────────┐
//! │ Contract Signing │                    │  Notifications   │
//! │                  │    publish()       │                  │
//! │                  │ ──────┐            │                  │
//! └──────────────────┘       │            └──────────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐          │
//!                      │  Event Bus   │          │
//!                      │              │ ─────────┘
//!                      └──────────────┘  subscribe()
//! ```
//!
//! The bus is generic over the event type. Each event type implements
//! [`BusEvent`] to declare its topic and source subsystem, which is what
//! subscribers filter on.
//!
//! ## Delivery
//!
//! - Publishing with no subscribers is not an error; the event is dropped.
//! - Publishing after [`InMemoryEventBus::close`] fails with [`BusError::Closed`].
//! - Slow subscribers that lag behind the channel capacity skip events.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{BusEvent, EventFilter};
pub use publisher::{BusError, EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging subscribers skip.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
