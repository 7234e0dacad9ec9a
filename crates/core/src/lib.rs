//! E-Shop Pro Core - Shared types library.
//!
//! This crate provides common types used across all E-Shop Pro components:
//! - `storefront` - Session, cart, navigation and checkout state machine
//! - `cli` - Terminal front end and account tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no clocks.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, products and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
