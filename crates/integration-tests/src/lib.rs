//! Integration tests for Sheger Market.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sheger-market-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Full checkout walks against the simulated gateway
//!   and in-memory adapters
//! - `payment_failures` - Declined payments, failed verification, and
//!   order-store outages
//!
//! The tests live in `tests/`; this library target only hosts the shared
//! docs.
