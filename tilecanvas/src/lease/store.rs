//! Lease persistence: the ledger trait and the in-memory implementation.

use dashmap::DashMap;
use thiserror::Error;

use crate::geom::{Area, Point};
use crate::BoxFuture;

use super::Lease;

/// Errors from a lease store backend.
///
/// "Not found" is not an error: [`LeaseStore::get`] returns `Ok(None)` for an
/// absent lease so callers can distinguish a missing grant from a failed
/// lookup.
#[derive(Debug, Error)]
pub enum LeaseStoreError {
    /// The backing store failed while executing the named operation.
    #[error("lease store failed during {op}: {message}")]
    Backend { op: &'static str, message: String },
}

impl LeaseStoreError {
    /// Wrap a backend failure with operation context.
    pub fn backend(op: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Backend {
            op,
            message: err.to_string(),
        }
    }
}

/// The lease ledger: persisted drawing grants with spatial queries.
///
/// The ledger exclusively owns persistence; updates are full re-saves via
/// [`LeaseStore::save`]. Implementations must be `Send + Sync`, and
/// list-returning queries must order their results deterministically
/// (canonical area order, then lease id) so output is stable across runs.
///
/// Queries are read-only and tolerate concurrent writers; no cross-call
/// atomicity is guaranteed.
pub trait LeaseStore: Send + Sync {
    /// Upsert a lease by id, replacing all mutable fields.
    fn save(&self, lease: Lease) -> BoxFuture<'_, Result<(), LeaseStoreError>>;

    /// Fetch a lease by id. Absent leases are `Ok(None)`.
    fn get(&self, id: &str) -> BoxFuture<'_, Result<Option<Lease>, LeaseStoreError>>;

    /// Delete a lease by id. Deleting an absent lease is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, Result<(), LeaseStoreError>>;

    /// All leases on the canvas, any status, whose area contains the point.
    fn find_by_point(
        &self,
        canvas_id: i64,
        point: Point,
    ) -> BoxFuture<'_, Result<Vec<Lease>, LeaseStoreError>>;

    /// All leases on the canvas, any status, whose area overlaps the given
    /// area (exact rectangle-overlap test).
    fn find_by_area(
        &self,
        canvas_id: i64,
        area: Area,
    ) -> BoxFuture<'_, Result<Vec<Lease>, LeaseStoreError>>;
}

/// In-memory lease store over a concurrent map.
///
/// Serves as the test double and as the ledger for single-process
/// deployments; a SQL-backed store plugs in behind the same trait.
#[derive(Debug, Default)]
pub struct MemoryLeaseStore {
    leases: DashMap<String, Lease>,
}

impl MemoryLeaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored leases, any status.
    pub fn len(&self) -> usize {
        self.leases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leases.is_empty()
    }

    fn find_where(&self, predicate: impl Fn(&Lease) -> bool) -> Vec<Lease> {
        let mut found: Vec<Lease> = self
            .leases
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary; impose the canonical order.
        found.sort_by(|a, b| a.area.cmp(&b.area).then_with(|| a.id.cmp(&b.id)));
        found
    }
}

impl LeaseStore for MemoryLeaseStore {
    fn save(&self, lease: Lease) -> BoxFuture<'_, Result<(), LeaseStoreError>> {
        Box::pin(async move {
            self.leases.insert(lease.id.clone(), lease);
            Ok(())
        })
    }

    fn get(&self, id: &str) -> BoxFuture<'_, Result<Option<Lease>, LeaseStoreError>> {
        let id = id.to_string();
        Box::pin(async move { Ok(self.leases.get(&id).map(|entry| entry.value().clone())) })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, Result<(), LeaseStoreError>> {
        let id = id.to_string();
        Box::pin(async move {
            self.leases.remove(&id);
            Ok(())
        })
    }

    fn find_by_point(
        &self,
        canvas_id: i64,
        point: Point,
    ) -> BoxFuture<'_, Result<Vec<Lease>, LeaseStoreError>> {
        Box::pin(async move {
            Ok(self.find_where(|lease| {
                lease.canvas_id == canvas_id && lease.area.contains_point(point)
            }))
        })
    }

    fn find_by_area(
        &self,
        canvas_id: i64,
        area: Area,
    ) -> BoxFuture<'_, Result<Vec<Lease>, LeaseStoreError>> {
        Box::pin(async move {
            Ok(self
                .find_where(|lease| lease.canvas_id == canvas_id && lease.area.intersects(&area)))
        })
    }
}
