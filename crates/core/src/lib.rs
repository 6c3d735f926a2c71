//! Under the Hoodies Core - Shared types library.
//!
//! This crate provides common types used across all Under the Hoodies
//! components:
//! - `storefront` - The public site and admin panel binary
//! - `cli` - Command-line tools for seeding and role management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! knowledge of the hosted backend. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
