//! # Service Container
//!
//! Central container holding the runtime's services with explicit
//! dependency injection.

pub mod config;
pub mod services;

pub use config::{BusConfig, ConfigError, RuntimeConfig};
pub use services::{ConcreteSigningService, ContractBus, ServiceContainer};
