//! Storage abstractions for the service layer
//!
//! Contains the file-backed map store the ledger persists through.

pub mod json_map_store;
