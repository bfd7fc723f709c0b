//! Sheger Market Core - Shared types library.
//!
//! This crate provides common types used across all Sheger Market components:
//! - `checkout` - Checkout session state machine and collaborator ports
//! - `cli` - Command-line tools for demos and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! gateway clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, phone
//!   numbers, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
