//! # Contracts Runtime
//!
//! Wires the signing subsystem to the event bus and runs a short showcase
//! of the signing rules.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults + environment)
//! 2. Initialize logging
//! 3. Build the service container
//! 4. Start the notification handler
//! 5. Run the showcase, then shut down

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use contract_signing::{
    Contract, ContractId, ContractSigningApi, ContractStore, CustomerId, SignContractCommand,
    SignContractOutcome, Timestamp,
};
use contracts_runtime::container::{ConcreteSigningService, RuntimeConfig, ServiceContainer};

async fn sign_and_report(
    signing: &Arc<ConcreteSigningService>,
    label: &str,
    contract_id: ContractId,
    signed_at: Timestamp,
) {
    let command = SignContractCommand {
        contract_id,
        signed_at,
    };

    match signing.sign_contract(command).await {
        Ok(outcome @ SignContractOutcome::Signed) | Ok(outcome @ SignContractOutcome::NotFound) => {
            info!(scenario = label, status = outcome.status_code(), "{:?}", outcome);
        }
        Ok(outcome @ SignContractOutcome::Conflict(_)) => {
            let body = outcome
                .error_response()
                .map(|body| serde_json::to_string(&body).unwrap_or_default())
                .unwrap_or_default();
            warn!(scenario = label, status = outcome.status_code(), body = %body, "Conflict");
        }
        Err(e) => {
            error!(scenario = label, status = e.status_code(), error = %e, "Infrastructure failure");
        }
    }
}

async fn showcase(container: &ServiceContainer) -> Result<()> {
    let now = Utc::now();

    let fresh = Contract::prepare(ContractId::new(), CustomerId::new(), now - Duration::days(10));
    let stale = Contract::prepare(ContractId::new(), CustomerId::new(), now - Duration::days(31));
    for contract in [&fresh, &stale] {
        container
            .store
            .insert(contract.clone())
            .await
            .context("failed to prepare showcase contract")?;
    }

    sign_and_report(&container.signing, "within-window", fresh.id(), now).await;
    sign_and_report(&container.signing, "window-expired", stale.id(), now).await;
    sign_and_report(&container.signing, "unknown-contract", ContractId::new(), now).await;
    sign_and_report(&container.signing, "already-signed", fresh.id(), now).await;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("invalid configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("===========================================");
    info!("  Contracts Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let container = ServiceContainer::new(config)?;
    let notifications = container.spawn_notifications();

    showcase(&container).await?;

    container.shutdown();
    let delivered = notifications
        .await
        .context("notification handler panicked")?;
    info!(delivered, "Runtime stopped");

    Ok(())
}
