//! Credential exchange client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `backend` defines the adapter trait, `mock_api` and `account_api` implement
//! the two wire dialects, `http` holds the shared request plumbing, `error`
//! normalizes failures, and `types` defines the wire schema.

pub mod account_api;
pub mod backend;
pub mod error;
mod http;
pub mod mock_api;
pub mod types;
