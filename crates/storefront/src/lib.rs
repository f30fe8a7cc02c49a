//! Oakline Storefront library.
//!
//! The product query layer (typed GROQ queries over a Sanity content store)
//! and the catalog HTTP API, as a library so it can be tested and reused by
//! the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod components;
pub mod config;
pub mod error;
pub mod routes;
pub mod sanity;
pub mod state;
