//! AWS-oriented adapters and handlers for the product catalog scan function.
//!
//! This crate owns runtime integration details (the Lambda handler, table
//! configuration and the DynamoDB adapter) and exposes a single runtime module
//! boundary for the item, encoding and envelope primitives.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod runtime;
