//! Core types for Oakline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod stock;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::format_price;
pub use stock::StockLevel;
