//! # Bus Events
//!
//! The contract every event type must satisfy to travel over the bus, and
//! the topic filter subscribers use to select events.

use std::fmt::Debug;
use std::hash::Hash;

/// An event that can be published to the bus.
///
/// Implementors are usually an enum owned by the emitting subsystem, with
/// one variant per domain fact.
pub trait BusEvent: Clone + Debug + Send + Sync + 'static {
    /// Topic type used for routing. Typically a fieldless enum.
    type Topic: Copy + Eq + Hash + Debug + Send + Sync + Unpin + 'static;

    /// Topic this event is routed under.
    fn topic(&self) -> Self::Topic;

    /// Name of the subsystem that emitted the event.
    fn source(&self) -> &'static str;
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone)]
pub struct EventFilter<T> {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<T>,
    /// Source subsystems to include. Empty means all sources.
    pub sources: Vec<&'static str>,
}

impl<T> Default for EventFilter<T> {
    fn default() -> Self {
        Self {
            topics: Vec::new(),
            sources: Vec::new(),
        }
    }
}

impl<T: Copy + Eq> EventFilter<T> {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<T>) -> Self {
        Self {
            topics,
            sources: Vec::new(),
        }
    }

    /// Create a filter for events from specific subsystems.
    #[must_use]
    pub fn from_sources(sources: Vec<&'static str>) -> Self {
        Self {
            topics: Vec::new(),
            sources,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches<E>(&self, event: &E) -> bool
    where
        E: BusEvent<Topic = T>,
    {
        let topic_match = self.topics.is_empty() || self.topics.contains(&event.topic());
        let source_match = self.sources.is_empty() || self.sources.contains(&event.source());

        topic_match && source_match
    }
}
