//! Tilecanvas - shared infinite pixel canvas core
//!
//! This library backs a shared, effectively-infinite pixel canvas. Actors
//! draw individual pixels or rectangular images; square rendered "tiles" of
//! the canvas are served from a cache and regenerated in the background when
//! the underlying pixels change.
//!
//! # Architecture
//!
//! ```text
//! geom ──► tiling ──► changes ──► precache ──► cache (object store providers)
//!   │                                │            ▲
//!   └──► lease (ledger + authorizer) └── store (pixel store) ──┘
//! ```
//!
//! - [`geom`] - integer points and canonical rectangles
//! - [`tiling`] - quantizing points to fixed-side square tiles
//! - [`lease`] - time-bounded drawing grants and draw authorization
//! - [`changes`] - dirty-tile tracking bucketed by minute
//! - [`store`] - the pixel persistence collaborator interface
//! - [`cache`] - rendered tile images over a generic object store
//! - [`precache`] - the background pipeline rebuilding dirty tiles
//!
//! Persistence seams (lease store, pixel store, change tracker, object store)
//! are dyn-compatible traits; in-memory implementations are provided for
//! tests and single-process deployments, and database or cloud-backed
//! implementations plug in behind the same traits.

use std::future::Future;
use std::pin::Pin;

pub mod cache;
pub mod changes;
pub mod config;
pub mod geom;
pub mod lease;
pub mod pixel;
pub mod precache;
pub mod store;
pub mod telemetry;
pub mod tiling;

pub use geom::{Area, Point};
pub use pixel::{Pixel, Rgba};

/// Boxed future type for dyn-compatible async trait methods.
///
/// The storage traits ([`lease::LeaseStore`], [`store::PixelStore`],
/// [`changes::ChangeTracker`], [`cache::ObjectStore`]) return boxed futures so
/// they can be held as trait objects (`Arc<dyn Trait>`) and swapped for
/// alternative backends at startup.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
