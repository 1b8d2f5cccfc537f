//! Snapshot store backends.

pub mod local;
pub mod memory;

pub use local::JsonFileStore;
pub use memory::MemoryStore;
