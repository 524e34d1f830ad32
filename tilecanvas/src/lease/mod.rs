//! Rectangular, time-bounded drawing grants.
//!
//! A lease grants one actor exclusive drawing rights over an [`Area`] of a
//! canvas for a `[start, end)` window. The ledger ([`LeaseStore`]) owns
//! persistence; [`DrawAuthorizer`] answers "may this actor draw here, now?"
//! on top of it.

mod authorizer;
mod store;

pub use authorizer::DrawAuthorizer;
pub use store::{LeaseStore, LeaseStoreError, MemoryLeaseStore};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geom::Area;

/// Lifecycle status of a lease.
///
/// Only `Active` leases restrict drawing; terminated and expired leases are
/// retained for audit but excluded from authorization. Expiry is computed on
/// read from the validity window, never written back automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaseStatus {
    Pending,
    Active,
    Expired,
    Terminated,
}

impl fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LeaseStatus::Pending => "pending",
            LeaseStatus::Active => "active",
            LeaseStatus::Expired => "expired",
            LeaseStatus::Terminated => "terminated",
        };
        f.write_str(s)
    }
}

/// Opaque key-value metadata attached to a lease.
///
/// Stored and round-tripped as a JSON object; the ledger never interprets
/// its contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(serde_json::Map<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A time-bounded, area-bounded exclusive drawing grant.
///
/// Updates go through a full re-save via [`LeaseStore::save`]; callers never
/// mutate the stored copy in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lease {
    pub id: String,
    pub leaseholder_id: i64,
    pub canvas_id: i64,
    pub area: Area,
    pub status: LeaseStatus,
    /// Start of the validity window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the validity window (exclusive).
    pub end: DateTime<Utc>,
    pub price: i64,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
    pub updated_at: DateTime<Utc>,
    pub updated_by: i64,
}

impl Lease {
    /// Whether the lease restricts drawing at the given instant.
    ///
    /// True iff the status is `Active` and `at` falls inside `[start, end)`.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.status == LeaseStatus::Active && self.start <= at && at < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::pt;
    use chrono::Duration;

    fn sample_lease(id: &str, leaseholder_id: i64, area: Area) -> Lease {
        let now = Utc::now();
        Lease {
            id: id.to_string(),
            leaseholder_id,
            canvas_id: 0,
            area,
            status: LeaseStatus::Active,
            start: now - Duration::minutes(5),
            end: now + Duration::hours(1),
            price: 1000,
            metadata: Metadata::new(),
            created_at: now,
            created_by: leaseholder_id,
            updated_at: now,
            updated_by: leaseholder_id,
        }
    }

    #[test]
    fn test_is_active_at_window_bounds() {
        let mut lease = sample_lease("l1", 1, Area::new(pt(0, 0), pt(10, 10)));
        let start = Utc::now();
        let end = start + Duration::hours(1);
        lease.start = start;
        lease.end = end;

        // Start inclusive, end exclusive.
        assert!(lease.is_active_at(start));
        assert!(lease.is_active_at(end - Duration::seconds(1)));
        assert!(!lease.is_active_at(end));
        assert!(!lease.is_active_at(start - Duration::seconds(1)));
    }

    #[test]
    fn test_is_active_at_requires_active_status() {
        let mut lease = sample_lease("l1", 1, Area::new(pt(0, 0), pt(10, 10)));
        let inside = lease.start + Duration::minutes(1);
        assert!(lease.is_active_at(inside));

        for status in [
            LeaseStatus::Pending,
            LeaseStatus::Expired,
            LeaseStatus::Terminated,
        ] {
            lease.status = status;
            assert!(!lease.is_active_at(inside), "{status} should not qualify");
        }
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&LeaseStatus::Terminated).unwrap();
        assert_eq!(json, "\"terminated\"");
        let parsed: LeaseStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(parsed, LeaseStatus::Active);
    }

    #[test]
    fn test_metadata_helpers() {
        let mut meta = Metadata::new();
        assert!(meta.is_empty());

        meta.set("foo", "bar");
        meta.set("max_width", 64);
        assert!(meta.has("foo"));
        assert_eq!(meta.get("foo"), Some(&Value::from("bar")));
        assert_eq!(meta.keys().count(), 2);

        assert_eq!(meta.remove("foo"), Some(Value::from("bar")));
        assert!(!meta.has("foo"));
    }

    #[test]
    fn test_metadata_json_roundtrip() {
        let mut meta = Metadata::new();
        meta.set("foo", "bar");
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"foo":"bar"}"#);
        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
