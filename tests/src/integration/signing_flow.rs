//! # Signing Flow Integration Tests
//!
//! Drives the signing workflow through the runtime container and observes
//! the results on both the store and the event bus.
//!
//! ## Flow Tested:
//!
//! ```text
//! SignContractCommand ──→ ContractSigningService ──→ InMemoryContractStore
//!                                   │
//!                                   └── ContractSigned ──→ Event Bus ──→ subscriber
//! ```

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use chrono::{Duration, TimeZone, Utc};
    use tokio::time::timeout;

    use contract_signing::{
        Contract, ContractError, ContractEvent, ContractId, ContractSigningApi, ContractStore,
        ContractTopic, CustomerId, InfrastructureError, SignContractCommand, SignContractOutcome,
        StoreError, Timestamp,
    };
    use contracts_runtime::container::{RuntimeConfig, ServiceContainer};
    use shared_bus::{EventFilter, EventPublisher};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const EXPIRED_MESSAGE: &str =
        "Contract can not be signed because more than 30 days have passed from the contract preparation";

    fn day(n: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap() + Duration::days(n)
    }

    async fn prepare(container: &ServiceContainer) -> Contract {
        let contract = Contract::prepare(ContractId::new(), CustomerId::new(), day(0));
        container.store.insert(contract.clone()).await.unwrap();
        contract
    }

    fn command(contract_id: ContractId, signed_at: Timestamp) -> SignContractCommand {
        SignContractCommand {
            contract_id,
            signed_at,
        }
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    /// Prepared at day 0, signed at day 10: accepted and announced once.
    #[tokio::test]
    async fn test_sign_within_window_publishes_event() {
        let container = ServiceContainer::new(RuntimeConfig::default()).unwrap();
        let mut sub = container
            .bus
            .subscribe(EventFilter::topics(vec![ContractTopic::Lifecycle]));
        let contract = prepare(&container).await;

        let outcome = container
            .signing
            .sign_contract(command(contract.id(), day(10)))
            .await
            .unwrap();

        assert_eq!(outcome, SignContractOutcome::Signed);
        assert_eq!(outcome.status_code(), 204);

        let stored = container.store.find(contract.id()).await.unwrap().unwrap();
        assert_eq!(stored.value.signed_at(), Some(day(10)));

        let event = timeout(StdDuration::from_millis(100), sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        let ContractEvent::ContractSigned(signed) = event;
        assert_eq!(signed.contract_id(), contract.id());
        assert_eq!(signed.customer_id(), contract.customer_id());

        assert!(matches!(sub.try_recv(), Ok(None)), "exactly one event expected");
        assert_eq!(container.bus.events_published(), 1);
    }

    /// Prepared at day 0, signed at day 31: rejected with the exact message.
    #[tokio::test]
    async fn test_sign_after_window_conflicts() {
        let container = ServiceContainer::new(RuntimeConfig::default()).unwrap();
        let mut sub = container.bus.subscribe(EventFilter::all());
        let contract = prepare(&container).await;

        let outcome = container
            .signing
            .sign_contract(command(contract.id(), day(31)))
            .await
            .unwrap();

        assert_eq!(outcome.status_code(), 409);
        let body = outcome.error_response().expect("conflict body");
        assert_eq!(body.status_code, 409);
        assert_eq!(body.message, EXPIRED_MESSAGE);

        let stored = container.store.find(contract.id()).await.unwrap().unwrap();
        assert!(!stored.value.is_signed());
        assert_eq!(stored.version, 1);
        assert!(matches!(sub.try_recv(), Ok(None)));
    }

    /// A contract id that was never prepared.
    #[tokio::test]
    async fn test_unknown_contract_not_found() {
        let container = ServiceContainer::new(RuntimeConfig::default()).unwrap();

        let outcome = container
            .signing
            .sign_contract(command(ContractId::new(), day(1)))
            .await
            .unwrap();

        assert_eq!(outcome, SignContractOutcome::NotFound);
        assert_eq!(outcome.status_code(), 404);
        assert_eq!(container.store.writes(), 0);
        assert_eq!(container.bus.events_published(), 0);
    }

    #[tokio::test]
    async fn test_resign_conflicts_and_publishes_once() {
        let container = ServiceContainer::new(RuntimeConfig::default()).unwrap();
        let contract = prepare(&container).await;

        let first = container
            .signing
            .sign_contract(command(contract.id(), day(1)))
            .await
            .unwrap();
        let second = container
            .signing
            .sign_contract(command(contract.id(), day(2)))
            .await
            .unwrap();

        assert_eq!(first, SignContractOutcome::Signed);
        assert_eq!(
            second,
            SignContractOutcome::Conflict(ContractError::AlreadySigned { signed_at: day(1) })
        );
        assert_ne!(
            second.error_response().unwrap().message,
            EXPIRED_MESSAGE,
            "state conflicts carry their own message"
        );
        assert_eq!(container.bus.events_published(), 1);
    }

    #[tokio::test]
    async fn test_closed_bus_is_infrastructure_failure() {
        let container = ServiceContainer::new(RuntimeConfig::default()).unwrap();
        let contract = prepare(&container).await;
        container.bus.close();

        let err = container
            .signing
            .sign_contract(command(contract.id(), day(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, InfrastructureError::Publish(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_store_outage_is_not_a_conflict() {
        let container = ServiceContainer::new(RuntimeConfig::default()).unwrap();
        let contract = prepare(&container).await;
        container.store.set_unavailable(true);

        let err = container
            .signing
            .sign_contract(command(contract.id(), day(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, InfrastructureError::Store(StoreError::Unavailable(_))));
        assert_eq!(container.bus.events_published(), 0);
    }

    #[tokio::test]
    async fn test_notification_handler_sees_signed_contract() {
        let container = ServiceContainer::new(RuntimeConfig::default()).unwrap();
        let notifications = container.spawn_notifications();
        let contract = prepare(&container).await;

        container
            .signing
            .sign_contract(command(contract.id(), day(5)))
            .await
            .unwrap();
        container
            .signing
            .sign_contract(command(contract.id(), day(40)))
            .await
            .unwrap();

        container.shutdown();
        assert_eq!(notifications.await.unwrap(), 1);
    }
}
