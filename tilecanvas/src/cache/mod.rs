//! Rendered tile caching over a generic object store.
//!
//! The cache is split the same way as the rest of the storage seams: a
//! domain-agnostic [`ObjectStore`] byte interface with interchangeable
//! providers (in-memory and on-disk, selected at startup; a cloud object
//! store plugs in behind the same trait), and a [`TileCache`] client on top
//! that owns key derivation, the square-tile validation rule, and PNG
//! encode/decode.

pub mod providers;

mod tile;
mod traits;

pub use providers::{DiskObjectStore, MemoryObjectStore};
pub use tile::{TileCache, TileCacheError};
pub use traits::{ObjectStore, ObjectStoreError};
