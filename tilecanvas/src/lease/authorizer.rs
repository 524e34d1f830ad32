//! Draw authorization over the lease ledger.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::geom::{Area, Point};

use super::{LeaseStore, LeaseStoreError};

/// Decides whether an actor may draw on a canvas, based on the leases
/// covering the target pixel or area.
///
/// Ungranted land is public: with no active lease in the way, anyone may
/// draw. Checks are read-only against the ledger and tolerate concurrent
/// lease changes; a lease may activate or expire between the check and the
/// caller's subsequent write, which the write path is expected to absorb.
///
/// "Not permitted" is a normal `Ok(false)` answer; only a ledger failure is
/// an error.
pub struct DrawAuthorizer {
    store: Arc<dyn LeaseStore>,
}

impl DrawAuthorizer {
    pub fn new(store: Arc<dyn LeaseStore>) -> Self {
        Self { store }
    }

    /// Whether the actor may draw the given pixel right now.
    pub async fn can_draw_pixel(
        &self,
        canvas_id: i64,
        actor_id: i64,
        point: Point,
    ) -> Result<bool, LeaseStoreError> {
        self.can_draw_pixel_at(canvas_id, actor_id, point, Utc::now())
            .await
    }

    /// Whether the actor may draw the given pixel at the given instant.
    ///
    /// A lease restricts the pixel only if it covers the point and is active
    /// at `at`; inactive or out-of-window leases are ignored. If no lease
    /// restricts the pixel, drawing is unrestricted. Otherwise the actor must
    /// hold at least one of the restricting leases.
    pub async fn can_draw_pixel_at(
        &self,
        canvas_id: i64,
        actor_id: i64,
        point: Point,
        at: DateTime<Utc>,
    ) -> Result<bool, LeaseStoreError> {
        let leases = self.store.find_by_point(canvas_id, point).await?;

        let mut restricted = false;
        for lease in &leases {
            if !lease.area.contains_point(point) || !lease.is_active_at(at) {
                continue;
            }
            if lease.leaseholder_id == actor_id {
                return Ok(true);
            }
            restricted = true;
        }

        if restricted {
            debug!(canvas_id, actor_id, %point, "pixel is leased by another actor");
        }
        Ok(!restricted)
    }

    /// Whether the actor may draw over the whole area right now.
    pub async fn can_draw_in_area(
        &self,
        canvas_id: i64,
        actor_id: i64,
        area: Area,
    ) -> Result<bool, LeaseStoreError> {
        self.can_draw_in_area_at(canvas_id, actor_id, area, Utc::now())
            .await
    }

    /// Whether the actor may draw over the whole area at the given instant.
    ///
    /// All-or-nothing: any active lease overlapping the area, even by a
    /// single pixel, that is held by another actor denies the entire area.
    /// This keeps the check O(leases-in-area); callers wanting per-pixel
    /// granularity use [`DrawAuthorizer::can_draw_pixel_at`] instead.
    pub async fn can_draw_in_area_at(
        &self,
        canvas_id: i64,
        actor_id: i64,
        area: Area,
        at: DateTime<Utc>,
    ) -> Result<bool, LeaseStoreError> {
        let leases = self.store.find_by_area(canvas_id, area).await?;

        for lease in &leases {
            if !lease.is_active_at(at) || !lease.area.intersects(&area) {
                continue;
            }
            if lease.leaseholder_id != actor_id {
                debug!(
                    canvas_id,
                    actor_id,
                    lease_id = %lease.id,
                    %area,
                    "area overlaps a lease held by another actor"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}
