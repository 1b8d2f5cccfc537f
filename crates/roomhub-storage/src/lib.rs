//! # roomhub-storage
//!
//! Snapshot store implementations for RoomHub: an atomic JSON file store for
//! real deployments and an in-memory store for tests and throwaway runs.

pub mod manager;
pub mod providers;

pub use manager::build_store;
pub use providers::{JsonFileStore, MemoryStore};
