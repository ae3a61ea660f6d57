//! # Service Container
//!
//! Builds the collaborators from configuration and wires them together.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Event bus, contract store
//! Level 1: Bus-backed publisher
//! Level 2: Signing service
//! ```
//!
//! Everything is passed explicitly through constructors.

use std::sync::Arc;

use contract_signing::{
    BusContractPublisher, ContractEvent, ContractSigningService, InMemoryContractStore,
};
use shared_bus::InMemoryEventBus;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::container::config::{ConfigError, RuntimeConfig};
use crate::handlers::NotificationHandler;

/// The contract event bus.
pub type ContractBus = InMemoryEventBus<ContractEvent>;

/// Signing service wired to in-memory storage and the contract bus.
pub type ConcreteSigningService =
    ContractSigningService<InMemoryContractStore, BusContractPublisher<ContractBus>>;

/// Central container holding all service instances.
pub struct ServiceContainer {
    /// Configuration the container was built from.
    pub config: RuntimeConfig,
    /// Event bus shared by publishers and handlers.
    pub bus: Arc<ContractBus>,
    /// Contract store.
    pub store: Arc<InMemoryContractStore>,
    /// Signing workflow.
    pub signing: Arc<ConcreteSigningService>,
    shutdown_tx: watch::Sender<bool>,
}

impl ServiceContainer {
    /// Build every service from `config`.
    pub fn new(config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let bus = Arc::new(ContractBus::with_capacity(config.bus.capacity));
        let store = Arc::new(InMemoryContractStore::new());
        let publisher = Arc::new(BusContractPublisher::new(Arc::clone(&bus)));
        let signing = Arc::new(ContractSigningService::new(
            config.signing.clone(),
            Arc::clone(&store),
            publisher,
        ));
        let (shutdown_tx, _) = watch::channel(false);

        info!(
            bus_capacity = config.bus.capacity,
            max_save_attempts = config.signing.max_save_attempts,
            "Service container initialized"
        );

        Ok(Self {
            config,
            bus,
            store,
            signing,
            shutdown_tx,
        })
    }

    /// Subscribe a notification handler and run it on its own task.
    ///
    /// The task resolves to the number of notifications delivered.
    pub fn spawn_notifications(&self) -> JoinHandle<u64> {
        let handler = NotificationHandler::new(&self.bus, self.shutdown_tx.subscribe());
        tokio::spawn(handler.run())
    }

    /// Stop accepting events and tell handlers to finish.
    pub fn shutdown(&self) {
        info!("Shutting down service container");
        self.bus.close();
        // No receivers just means no handler was spawned
        let _ = self.shutdown_tx.send(true);
    }
}
