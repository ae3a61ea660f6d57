//! # Domain Module
//!
//! Core domain types for the contract signing subsystem. Nothing in here
//! performs I/O.

pub mod entities;
pub mod errors;
pub mod events;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use value_objects::*;
