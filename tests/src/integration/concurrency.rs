//! # Concurrent Signing Tests
//!
//! Many requests racing on one contract must produce exactly one signature
//! and exactly one event. Requests on different contracts must not
//! interfere.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use futures::future::join_all;

    use contract_signing::{
        Contract, ContractError, ContractId, ContractSigningApi, ContractStore, CustomerId,
        SignContractCommand, SignContractOutcome,
    };
    use contracts_runtime::container::{RuntimeConfig, ServiceContainer};
    use shared_bus::EventPublisher;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_signers_sign_once() {
        let container = Arc::new(ServiceContainer::new(RuntimeConfig::default()).unwrap());
        let prepared_at = Utc::now() - Duration::days(1);
        let contract = Contract::prepare(ContractId::new(), CustomerId::new(), prepared_at);
        container.store.insert(contract.clone()).await.unwrap();

        let attempts = (0..16i64).map(|i| {
            let container = Arc::clone(&container);
            let command = SignContractCommand {
                contract_id: contract.id(),
                signed_at: prepared_at + Duration::minutes(i),
            };
            tokio::spawn(async move { container.signing.sign_contract(command).await })
        });

        let outcomes: Vec<SignContractOutcome> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        let signed = outcomes
            .iter()
            .filter(|o| **o == SignContractOutcome::Signed)
            .count();
        let already_signed = outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    SignContractOutcome::Conflict(ContractError::AlreadySigned { .. })
                )
            })
            .count();

        assert_eq!(signed, 1);
        assert_eq!(already_signed, 15);
        assert_eq!(container.bus.events_published(), 1);
        assert_eq!(container.store.find(contract.id()).await.unwrap().unwrap().version, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_independent_contracts_all_sign() {
        let container = Arc::new(ServiceContainer::new(RuntimeConfig::default()).unwrap());
        let prepared_at = Utc::now() - Duration::days(2);

        let mut ids = Vec::new();
        for _ in 0..20 {
            let contract = Contract::prepare(ContractId::new(), CustomerId::new(), prepared_at);
            container.store.insert(contract.clone()).await.unwrap();
            ids.push(contract.id());
        }

        let attempts = ids.iter().map(|&contract_id| {
            let container = Arc::clone(&container);
            tokio::spawn(async move {
                container
                    .signing
                    .sign_contract(SignContractCommand {
                        contract_id,
                        signed_at: prepared_at + Duration::days(1),
                    })
                    .await
            })
        });

        for joined in join_all(attempts).await {
            assert_eq!(joined.unwrap().unwrap(), SignContractOutcome::Signed);
        }
        assert_eq!(container.bus.events_published(), 20);
    }
}
