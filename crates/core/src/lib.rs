//! Oakline Core - Shared types library.
//!
//! This crate provides common types used across all Oakline components:
//! - `storefront` - Product query layer and public JSON API
//! - `cli` - Command-line access to the catalog and inventory reports
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients, no content-store access. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for document IDs, prices, emails and stock levels

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
