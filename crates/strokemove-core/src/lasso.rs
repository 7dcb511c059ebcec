//! Lasso resolution by probe delete.
//!
//! The drawing surface keeps its region selection to itself. The only way to learn
//! which strokes it covers is to let the surface delete them, look at what is left,
//! and put everything back.

use crate::store::StoreSnapshot;
use crate::surface::DrawingSurface;
use serde::{Deserialize, Serialize};

/// Partition of a frozen store snapshot into selected and unselected indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LassoResolution {
    /// Indices removed by the probe, ascending.
    pub selected: Vec<usize>,
    /// Indices that survived the probe, ascending.
    pub unselected: Vec<usize>,
}

impl LassoResolution {
    /// True when the lasso covered no stroke.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Restores a snapshot into the surface when dropped.
///
/// Holding the surface through this guard ties the restore to every exit path,
/// including a probe that errors or panics.
struct RestoreGuard<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
    snapshot: Option<StoreSnapshot>,
}

impl<'a, S: DrawingSurface + ?Sized> RestoreGuard<'a, S> {
    fn new(surface: &'a mut S) -> Self {
        let snapshot = Some(surface.store().snapshot());
        Self { surface, snapshot }
    }
}

impl<S: DrawingSurface + ?Sized> Drop for RestoreGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.surface.store_mut().restore(snapshot);
            self.surface.request_redraw();
        }
    }
}

/// Work out which strokes the surface's region selection covers.
///
/// Snapshots the store, lets the surface delete its selection, diffs what is left
/// against the snapshot, and restores the snapshot before returning. A stroke counts
/// as unselected when a stroke with the same bounds and transform survived the probe.
/// An empty store returns an empty result without probing; a failed probe is logged
/// and also returns an empty result.
pub fn resolve_lasso<S: DrawingSurface + ?Sized>(surface: &mut S) -> LassoResolution {
    if surface.store().is_empty() {
        return LassoResolution::default();
    }

    let mut guard = RestoreGuard::new(surface);
    if let Err(e) = guard.surface.delete_selection() {
        log::warn!("Lasso probe failed, treating selection as empty: {}", e);
        return LassoResolution::default();
    }

    let after = guard.surface.store().snapshot();
    let resolution = guard
        .snapshot
        .as_ref()
        .map(|before| partition(before, &after))
        .unwrap_or_default();
    drop(guard);

    log::debug!(
        "Lasso resolved {} selected / {} unselected",
        resolution.selected.len(),
        resolution.unselected.len()
    );
    resolution
}

fn partition(before: &StoreSnapshot, after: &StoreSnapshot) -> LassoResolution {
    let mut resolution = LassoResolution::default();
    for (index, stroke) in before.strokes().iter().enumerate() {
        if after.strokes().iter().any(|kept| kept.same_stroke(stroke)) {
            resolution.unselected.push(index);
        } else {
            resolution.selected.push(index);
        }
    }
    resolution
}
