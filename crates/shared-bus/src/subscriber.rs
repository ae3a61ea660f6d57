//! # Event Subscriber
//!
//! Defines the subscription side of the event bus.

use crate::events::{BusEvent, EventFilter};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{ready, Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

/// Live subscription counts per topic, shared by a bus and its subscriptions.
pub(crate) type TopicCounts<T> = Arc<RwLock<HashMap<T, usize>>>;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Counts a subscription under each topic its filter names, until dropped.
pub(crate) struct TopicRegistration<T: Copy + Eq + Hash + Debug> {
    counts: TopicCounts<T>,
    topics: Vec<T>,
}

impl<T: Copy + Eq + Hash + Debug> TopicRegistration<T> {
    pub(crate) fn register(counts: &TopicCounts<T>, topics: &[T]) -> Self {
        if let Ok(mut subs) = counts.write() {
            for topic in topics {
                *subs.entry(*topic).or_insert(0) += 1;
            }
        }

        Self {
            counts: Arc::clone(counts),
            topics: topics.to_vec(),
        }
    }
}

impl<T: Copy + Eq + Hash + Debug> Drop for TopicRegistration<T> {
    fn drop(&mut self) {
        let Ok(mut subs) = self.counts.write() else {
            return;
        };
        for topic in &self.topics {
            let Some(count) = subs.get_mut(topic) else {
                continue;
            };
            *count = count.saturating_sub(1);
            if *count == 0 {
                subs.remove(topic);
            }
        }
        debug!(topics = ?self.topics, "Subscription dropped");
    }
}

/// A subscription handle for receiving events.
///
/// Dropping it releases its per-topic count on the bus.
pub struct Subscription<E: BusEvent> {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<E>,

    /// Filter for this subscription.
    filter: EventFilter<E::Topic>,

    /// Per-topic tracking, released on drop.
    registration: TopicRegistration<E::Topic>,
}

impl<E: BusEvent> Subscription<E> {
    pub(crate) fn new(
        receiver: broadcast::Receiver<E>,
        filter: EventFilter<E::Topic>,
        registration: TopicRegistration<E::Topic>,
    ) -> Self {
        Self {
            receiver,
            filter,
            registration,
        }
    }

    /// Receive the next event that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(event)` - The next matching event
    /// - `None` - The channel was closed (bus dropped)
    pub async fn recv(&mut self) -> Option<E> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some events dropped");
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Try to receive the next event without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was available and matched
    /// - `Ok(None)` - No event available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<E>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter<E::Topic> {
        &self.filter
    }

    /// Convert into a [`Stream`] of matching events.
    ///
    /// The stream keeps the subscription's per-topic count alive.
    #[must_use]
    pub fn into_stream(self) -> EventStream<E> {
        let Self {
            receiver,
            filter,
            registration,
        } = self;

        EventStream {
            inner: BroadcastStream::new(receiver),
            filter,
            _registration: registration,
        }
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct EventStream<E: BusEvent> {
    inner: BroadcastStream<E>,
    filter: EventFilter<E::Topic>,
    _registration: TopicRegistration<E::Topic>,
}

impl<E: BusEvent> Stream for EventStream<E> {
    type Item = E;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
                Some(Ok(event)) if this.filter.matches(&event) => return Poll::Ready(Some(event)),
                Some(Ok(_)) => continue,
                Some(Err(BroadcastStreamRecvError::Lagged(count))) => {
                    debug!(lagged = count, "Stream lagged, some events dropped");
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::InMemoryEventBus;
    use crate::test_support::{TestEvent, TestTopic};
    use crate::EventPublisher;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_subscription_recv() {
        let bus = InMemoryEventBus::<TestEvent>::new();
        let mut sub = bus.subscribe(EventFilter::all());

        bus.publish(TestEvent::alpha(7)).await.unwrap();

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");

        assert_eq!(received, TestEvent::alpha(7));
    }

    #[tokio::test]
    async fn test_subscription_filter() {
        let bus = InMemoryEventBus::<TestEvent>::new();
        let mut sub = bus.subscribe(EventFilter::topics(vec![TestTopic::Beta]));

        // Filtered out
        bus.publish(TestEvent::alpha(1)).await.unwrap();
        bus.publish(TestEvent::beta(2)).await.unwrap();

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");

        assert_eq!(received, TestEvent::beta(2));
    }

    #[test]
    fn test_event_stream_is_unpin() {
        fn assert_unpin<T: Unpin>() {}
        assert_unpin::<EventStream<TestEvent>>();
    }

    #[tokio::test]
    async fn test_topic_counts_released_on_drop() {
        let bus = InMemoryEventBus::<TestEvent>::new();
        let alpha = bus.subscribe(EventFilter::topics(vec![TestTopic::Alpha]));
        let both = bus.subscribe(EventFilter::topics(vec![TestTopic::Alpha, TestTopic::Beta]));
        let _all = bus.subscribe(EventFilter::all());

        assert_eq!(bus.subscription_count(TestTopic::Alpha), 2);
        assert_eq!(bus.subscription_count(TestTopic::Beta), 1);
        assert_eq!(alpha.filter().topics, vec![TestTopic::Alpha]);

        drop(alpha);
        assert_eq!(bus.subscription_count(TestTopic::Alpha), 1);

        // Converting to a stream keeps the count until the stream goes away
        let stream = both.into_stream();
        assert_eq!(bus.subscription_count(TestTopic::Beta), 1);
        drop(stream);

        assert_eq!(bus.subscription_count(TestTopic::Alpha), 0);
        assert_eq!(bus.subscription_count(TestTopic::Beta), 0);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_subscription_drop_cleanup() {
        let bus = InMemoryEventBus::<TestEvent>::new();

        {
            let _sub1 = bus.subscribe(EventFilter::all());
            let _sub2 = bus.subscribe(EventFilter::all());
            assert_eq!(bus.subscriber_count(), 2);
        }

        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let bus = InMemoryEventBus::<TestEvent>::new();
        let mut sub = bus.subscribe(EventFilter::all());

        assert!(matches!(sub.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_try_recv_closed() {
        let bus = InMemoryEventBus::<TestEvent>::new();
        let mut sub = bus.subscribe(EventFilter::all());
        drop(bus);

        assert_eq!(sub.try_recv(), Err(SubscriptionError::Closed));
    }

    #[tokio::test]
    async fn test_lagged_subscriber_keeps_receiving() {
        let bus = InMemoryEventBus::<TestEvent>::with_capacity(2);
        let mut sub = bus.subscribe(EventFilter::all());

        for seq in 0..5 {
            bus.publish(TestEvent::alpha(seq)).await.unwrap();
        }

        // Oldest events were overwritten; the newest two survive
        let first = sub.recv().await.expect("event");
        assert_eq!(first.seq, 3);
    }

    #[tokio::test]
    async fn test_event_stream_filters() {
        let bus = InMemoryEventBus::<TestEvent>::new();
        let mut stream = bus.event_stream(EventFilter::topics(vec![TestTopic::Alpha]));

        bus.publish(TestEvent::beta(1)).await.unwrap();
        bus.publish(TestEvent::alpha(2)).await.unwrap();

        let next = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(next, TestEvent::alpha(2));
    }

    #[tokio::test]
    async fn test_event_stream_ends_when_bus_dropped() {
        let bus = InMemoryEventBus::<TestEvent>::new();
        let mut stream = bus.event_stream(EventFilter::all());
        drop(bus);

        assert!(stream.next().await.is_none());
    }
}
