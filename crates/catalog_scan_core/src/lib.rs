//! Shared catalog scan domain primitives.
//!
//! This crate owns the item model, the JSON wire encoding of scanned items and
//! the response envelope contract. It intentionally excludes AWS SDK and Lambda
//! runtime concerns.

pub mod encoding;
pub mod envelope;
pub mod item;
