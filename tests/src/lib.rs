//! # Contracts Test Suite
//!
//! Unified test crate for flows that span more than one crate.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── signing_flow.rs   # Store + bus + runtime wiring
//!     └── concurrency.rs    # Racing and independent signers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p contracts-tests
//! cargo test -p contracts-tests integration::concurrency
//! ```

#![allow(dead_code)]

pub mod integration;
