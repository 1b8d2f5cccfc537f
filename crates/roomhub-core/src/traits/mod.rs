//! Core traits defined in `roomhub-core` and implemented by other crates.

pub mod store;

pub use store::SnapshotStore;
