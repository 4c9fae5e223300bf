// Cache module for local widget state.
// Stores the latest keyword snapshot per widget group.

pub mod paths;
pub mod store;

pub use store::{FileStore, MemoryStore, SnapshotStore};
