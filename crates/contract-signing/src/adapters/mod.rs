//! Adapters layer for the signing subsystem.
//!
//! Concrete implementations of the outbound ports.

pub mod bus_publisher;
pub mod memory_store;

pub use bus_publisher::BusContractPublisher;
pub use memory_store::InMemoryContractStore;
