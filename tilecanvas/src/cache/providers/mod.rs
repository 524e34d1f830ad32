//! Object store providers.
//!
//! Each provider is a self-contained [`ObjectStore`](super::ObjectStore)
//! implementation; the active one is chosen from configuration at startup
//! and handed around as `Arc<dyn ObjectStore>`.

mod disk;
mod memory;

pub use disk::DiskObjectStore;
pub use memory::MemoryObjectStore;
