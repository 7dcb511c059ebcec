//! The stroke store: ordered, index-addressed strokes.

use crate::stroke::Stroke;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stroke store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Stroke index {index} out of range (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Malformed drawing data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A by-value capture of a store's strokes, taken with [`StrokeStore::snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    strokes: Vec<Stroke>,
}

impl StoreSnapshot {
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

/// Ordered sequence of strokes. Index order is z-order and selection addressing.
///
/// Every wholesale change bumps [`revision`](Self::revision) so a renderer knows to
/// repaint. Equality only compares the strokes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
    #[serde(skip)]
    revision: u64,
}

impl PartialEq for StrokeStore {
    fn eq(&self, other: &Self) -> bool {
        self.strokes == other.strokes
    }
}

impl StrokeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self { strokes, revision: 0 }
    }

    /// Number of strokes.
    pub fn count(&self) -> usize {
        self.strokes.len()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Get the stroke at `index`.
    pub fn get(&self, index: usize) -> Result<&Stroke, StoreError> {
        self.strokes.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: self.strokes.len(),
        })
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    /// Revision counter, bumped on every change a renderer must repaint for.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Install a whole new stroke sequence.
    ///
    /// The sequence is fully collected before it replaces the current one, so no
    /// reader ever sees a mix of old and new strokes.
    pub fn replace_all(&mut self, strokes: impl IntoIterator<Item = Stroke>) {
        let next: Vec<Stroke> = strokes.into_iter().collect();
        self.strokes = next;
        self.revision += 1;
    }

    /// Capture the current strokes by value.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            strokes: self.strokes.clone(),
        }
    }

    /// Reinstate a snapshot verbatim.
    pub fn restore(&mut self, snapshot: StoreSnapshot) {
        self.strokes = snapshot.strokes;
        self.revision += 1;
    }

    /// Append a newly drawn stroke.
    pub fn append(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
        self.revision += 1;
    }

    /// Remove the stroke at `index`; later strokes shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<Stroke, StoreError> {
        if index >= self.strokes.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.strokes.len(),
            });
        }
        let removed = self.strokes.remove(index);
        self.revision += 1;
        Ok(removed)
    }

    /// Union of all render bounds, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.strokes
            .iter()
            .map(Stroke::render_bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Serialize the strokes into an opaque data blob.
    pub fn to_blob(&self) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Rebuild a store from a blob produced by [`to_blob`](Self::to_blob).
    pub fn from_blob(data: &[u8]) -> Result<Self, StoreError> {
        Ok(serde_json::from_slice(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Ink, StrokePath};
    use kurbo::{Affine, Point};

    fn stroke_at(x: f64, y: f64) -> Stroke {
        Stroke::new(
            Ink::default(),
            StrokePath::from_locations([Point::new(x, y), Point::new(x + 10.0, y + 10.0)], 0.0),
        )
    }

    fn store_of(n: usize) -> StrokeStore {
        StrokeStore::from_strokes((0..n).map(|i| stroke_at(i as f64 * 20.0, 0.0)).collect())
    }

    #[test]
    fn test_get_out_of_range() {
        let store = store_of(2);
        assert!(store.get(1).is_ok());
        assert!(matches!(
            store.get(2),
            Err(StoreError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_snapshot_restore_is_noop() {
        for n in [0, 1, 7] {
            let mut store = store_of(n);
            let before = store.clone();
            let snapshot = store.snapshot();
            store.restore(snapshot);
            assert_eq!(store, before);
        }
    }

    #[test]
    fn test_restore_undoes_changes() {
        let mut store = store_of(3);
        let before = store.clone();
        let snapshot = store.snapshot();

        store.remove(1).unwrap();
        store.append(stroke_at(100.0, 100.0));
        assert_ne!(store, before);

        store.restore(snapshot);
        assert_eq!(store, before);
    }

    #[test]
    fn test_restore_bumps_revision() {
        let mut store = store_of(3);
        let snapshot = store.snapshot();
        let revision = store.revision();

        store.restore(snapshot.clone());
        assert_eq!(store.revision(), revision + 1);

        store.remove(0).unwrap();
        store.restore(snapshot);
        assert_eq!(store.revision(), revision + 3);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_changes() {
        let mut store = store_of(2);
        let snapshot = store.snapshot();
        store.replace_all(Vec::new());
        assert_eq!(snapshot.len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_bumps_revision() {
        let mut store = store_of(2);
        let revision = store.revision();
        let moved: Vec<Stroke> = store
            .iter()
            .map(|s| s.with_transform(Affine::translate((5.0, 0.0))))
            .collect();
        store.replace_all(moved);
        assert_eq!(store.revision(), revision + 1);
        assert_eq!(store.count(), 2);
        assert_eq!(store.get(0).unwrap().transform, Affine::translate((5.0, 0.0)));
    }

    #[test]
    fn test_remove_compacts() {
        let mut store = store_of(3);
        let last = store.get(2).unwrap().clone();
        store.remove(1).unwrap();
        assert_eq!(store.count(), 2);
        assert_eq!(store.get(1).unwrap(), &last);
        assert!(store.remove(5).is_err());
    }

    #[test]
    fn test_bounds() {
        assert!(StrokeStore::new().bounds().is_none());
        let store = store_of(2);
        assert_eq!(store.bounds(), Some(Rect::new(0.0, 0.0, 30.0, 10.0)));
    }

    #[test]
    fn test_blob_roundtrip_preserves_strokes() {
        let store = store_of(3);
        let blob = store.to_blob().unwrap();
        let loaded = StrokeStore::from_blob(&blob).unwrap();
        assert_eq!(loaded, store);
        assert!(matches!(
            StrokeStore::from_blob(b"not a drawing"),
            Err(StoreError::Malformed(_))
        ));
    }
}
