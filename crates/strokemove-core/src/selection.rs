//! Point hit-testing and the single-stroke selection tracker.

use crate::store::StrokeStore;
use crate::stroke::Stroke;
use kurbo::{Affine, Point, Vec2};

/// Find the first stroke, in store order, whose render bounds contain `point`.
///
/// Bounding-box containment over-approximates a real path hit. The lowest index wins,
/// which is the bottom-most stroke when store order is render order.
pub fn hit_test(store: &StrokeStore, point: Point) -> Option<(&Stroke, usize)> {
    store
        .iter()
        .enumerate()
        .find(|(_, stroke)| stroke.render_bounds().contains(point))
        .map(|(index, stroke)| (stroke, index))
}

/// The currently selected stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Index into the store.
    pub index: usize,
    /// The stroke value last installed at `index`.
    pub stroke: Stroke,
    /// Transform captured when the current drag started (or at selection time).
    pub drag_origin: Option<Affine>,
}

/// Result of a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// A selection existed and was cleared.
    Deselected,
    /// The stroke at this index is now selected.
    Selected(usize),
    /// Nothing was selected and nothing was hit.
    Missed,
}

/// Tracks at most one selected stroke and moves it by drag deltas.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selection: Option<Selection>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.as_ref().map(|s| s.index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected_index() == Some(index)
    }

    pub fn clear(&mut self) {
        self.selection = None;
    }

    /// Tap handling. Any tap while something is selected only deselects.
    pub fn on_tap(&mut self, store: &StrokeStore, point: Point) -> TapOutcome {
        if self.selection.take().is_some() {
            log::debug!("Tap at {:?} cleared selection", point);
            return TapOutcome::Deselected;
        }

        match hit_test(store, point) {
            Some((stroke, index)) => {
                log::debug!("Tap at {:?} selected stroke {}", point, index);
                self.selection = Some(Selection {
                    index,
                    stroke: stroke.clone(),
                    drag_origin: Some(stroke.transform),
                });
                TapOutcome::Selected(index)
            }
            None => TapOutcome::Missed,
        }
    }

    /// Capture the selected stroke's current transform as the drag origin.
    /// Returns false when nothing is selected.
    pub fn on_drag_begin(&mut self) -> bool {
        match &mut self.selection {
            Some(selection) => {
                selection.drag_origin = Some(selection.stroke.transform);
                true
            }
            None => false,
        }
    }

    /// Move the selected stroke to `origin` translated by `translation`.
    ///
    /// `translation` is the total offset since the drag began, not a per-event step.
    /// Rewrites the whole store with the moved stroke at the selected index. Returns
    /// false, changing nothing, when nothing is selected. A stale selection (the store
    /// no longer holds the selected stroke at its index) is cleared instead.
    pub fn on_drag_update(&mut self, store: &mut StrokeStore, translation: Vec2) -> bool {
        if self.revalidate(store) {
            return false;
        }
        let Some(selection) = &mut self.selection else {
            return false;
        };

        let origin = selection.drag_origin.unwrap_or(selection.stroke.transform);
        let moved = selection
            .stroke
            .with_transform(origin * Affine::translate(translation));

        let index = selection.index;
        let strokes: Vec<Stroke> = store
            .iter()
            .enumerate()
            .map(|(i, stroke)| if i == index { moved.clone() } else { stroke.clone() })
            .collect();
        store.replace_all(strokes);

        selection.stroke = moved;
        true
    }

    /// Forget the drag origin; the selection itself stays.
    pub fn on_drag_end(&mut self) {
        if let Some(selection) = &mut self.selection {
            selection.drag_origin = None;
        }
    }

    /// Drop the selection if the store no longer holds the selected stroke at its index.
    /// Returns true when the selection was cleared.
    pub fn revalidate(&mut self, store: &StrokeStore) -> bool {
        let Some(selection) = &self.selection else {
            return false;
        };

        let still_valid = store
            .get(selection.index)
            .map(|stroke| stroke.same_stroke(&selection.stroke))
            .unwrap_or(false);
        if !still_valid {
            log::debug!("Selected stroke {} no longer in store, clearing", selection.index);
            self.selection = None;
        }
        !still_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Ink, StrokePath};
    use kurbo::Rect;

    /// A stroke whose render bounds are exactly `(x, y, w, h)`.
    fn boxed_stroke(x: f64, y: f64, w: f64, h: f64) -> Stroke {
        Stroke::new(
            Ink::default(),
            StrokePath::from_locations([Point::new(x, y), Point::new(x + w, y + h)], 0.0),
        )
    }

    fn sample_store() -> StrokeStore {
        StrokeStore::from_strokes(vec![
            boxed_stroke(0.0, 0.0, 100.0, 100.0),
            boxed_stroke(50.0, 50.0, 100.0, 100.0),
            boxed_stroke(300.0, 300.0, 10.0, 10.0),
        ])
    }

    #[test]
    fn test_hit_test_first_match_wins() {
        let store = sample_store();
        // Inside both 0 and 1.
        let (_, index) = hit_test(&store, Point::new(75.0, 75.0)).unwrap();
        assert_eq!(index, 0);
        // Only inside 1.
        let (_, index) = hit_test(&store, Point::new(120.0, 120.0)).unwrap();
        assert_eq!(index, 1);
        let (stroke, index) = hit_test(&store, Point::new(305.0, 305.0)).unwrap();
        assert_eq!(index, 2);
        assert_eq!(stroke.render_bounds(), Rect::new(300.0, 300.0, 310.0, 310.0));
    }

    #[test]
    fn test_hit_test_miss() {
        let store = sample_store();
        assert!(hit_test(&store, Point::new(200.0, 20.0)).is_none());
        assert!(hit_test(&StrokeStore::new(), Point::ZERO).is_none());
    }

    #[test]
    fn test_tap_selects_and_records_origin() {
        let store = sample_store();
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.on_tap(&store, Point::new(305.0, 305.0)), TapOutcome::Selected(2));

        let selection = tracker.selection().unwrap();
        assert_eq!(selection.index, 2);
        assert_eq!(selection.drag_origin, Some(Affine::IDENTITY));
        assert!(tracker.is_selected(2));
    }

    #[test]
    fn test_tap_miss_selects_nothing() {
        let store = sample_store();
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.on_tap(&store, Point::new(200.0, 20.0)), TapOutcome::Missed);
        assert!(tracker.selection().is_none());
    }

    #[test]
    fn test_tap_while_selected_always_deselects() {
        let store = sample_store();
        let mut tracker = SelectionTracker::new();
        tracker.on_tap(&store, Point::new(305.0, 305.0));

        // Lands inside stroke 0, still only deselects.
        assert_eq!(tracker.on_tap(&store, Point::new(10.0, 10.0)), TapOutcome::Deselected);
        assert!(tracker.selection().is_none());

        // The next tap selects again.
        assert_eq!(tracker.on_tap(&store, Point::new(10.0, 10.0)), TapOutcome::Selected(0));
    }

    #[test]
    fn test_drag_moves_only_selected_stroke() {
        let mut store = sample_store();
        let untouched = store.clone();
        let mut tracker = SelectionTracker::new();
        tracker.on_tap(&store, Point::new(120.0, 120.0));

        assert!(tracker.on_drag_begin());
        assert!(tracker.on_drag_update(&mut store, Vec2::new(10.0, 5.0)));

        assert_eq!(store.get(1).unwrap().transform, Affine::translate((10.0, 5.0)));
        assert_eq!(store.get(0).unwrap(), untouched.get(0).unwrap());
        assert_eq!(store.get(2).unwrap(), untouched.get(2).unwrap());
        assert_eq!(tracker.selection().unwrap().stroke, *store.get(1).unwrap());
    }

    #[test]
    fn test_drag_updates_do_not_accumulate() {
        let mut store = sample_store();
        let mut tracker = SelectionTracker::new();
        tracker.on_tap(&store, Point::new(305.0, 305.0));
        tracker.on_drag_begin();

        tracker.on_drag_update(&mut store, Vec2::new(3.0, 0.0));
        tracker.on_drag_update(&mut store, Vec2::new(6.0, 0.0));
        tracker.on_drag_update(&mut store, Vec2::new(9.0, 2.0));

        assert_eq!(store.get(2).unwrap().transform, Affine::translate((9.0, 2.0)));
    }

    #[test]
    fn test_second_drag_composes_from_new_origin() {
        let mut store = sample_store();
        let mut tracker = SelectionTracker::new();
        tracker.on_tap(&store, Point::new(305.0, 305.0));

        tracker.on_drag_begin();
        tracker.on_drag_update(&mut store, Vec2::new(5.0, 0.0));
        tracker.on_drag_update(&mut store, Vec2::new(10.0, 4.0));
        tracker.on_drag_end();
        assert!(tracker.selection().unwrap().drag_origin.is_none());

        tracker.on_drag_begin();
        tracker.on_drag_update(&mut store, Vec2::new(1.0, 1.0));
        tracker.on_drag_update(&mut store, Vec2::new(-3.0, 6.0));
        tracker.on_drag_end();

        assert_eq!(store.get(2).unwrap().transform, Affine::translate((7.0, 10.0)));
        assert_eq!(
            store.get(2).unwrap().render_bounds(),
            Rect::new(307.0, 310.0, 317.0, 320.0)
        );
    }

    #[test]
    fn test_translation_is_applied_in_stroke_space() {
        let mut store = StrokeStore::from_strokes(vec![
            boxed_stroke(0.0, 0.0, 10.0, 10.0).with_transform(Affine::scale(2.0)),
        ]);
        let mut tracker = SelectionTracker::new();
        tracker.on_tap(&store, Point::new(15.0, 15.0));
        tracker.on_drag_begin();
        tracker.on_drag_update(&mut store, Vec2::new(1.0, 0.0));

        let expected = Affine::scale(2.0) * Affine::translate((1.0, 0.0));
        assert_eq!(store.get(0).unwrap().transform, expected);
    }

    #[test]
    fn test_drag_without_selection_is_noop() {
        let mut store = sample_store();
        let before = store.clone();
        let revision = store.revision();
        let mut tracker = SelectionTracker::new();
        assert!(!tracker.on_drag_begin());
        assert!(!tracker.on_drag_update(&mut store, Vec2::new(5.0, 5.0)));
        tracker.on_drag_end();
        assert_eq!(store, before);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_drag_with_stale_index_is_noop() {
        let mut store = sample_store();
        let mut tracker = SelectionTracker::new();
        tracker.on_tap(&store, Point::new(305.0, 305.0));

        store.remove(2).unwrap();
        let before = store.clone();
        tracker.on_drag_begin();
        assert!(!tracker.on_drag_update(&mut store, Vec2::new(5.0, 5.0)));
        assert_eq!(store, before);
        assert!(tracker.selection().is_none());
    }

    #[test]
    fn test_drag_after_earlier_removal_leaves_shifted_stroke_alone() {
        let mut store = StrokeStore::from_strokes(vec![
            boxed_stroke(0.0, 0.0, 5.0, 5.0),
            boxed_stroke(20.0, 0.0, 5.0, 5.0),
            boxed_stroke(40.0, 0.0, 5.0, 5.0),
        ]);
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.on_tap(&store, Point::new(22.0, 2.0)), TapOutcome::Selected(1));

        // Index 1 is still in range but now holds the x=40 stroke.
        store.remove(0).unwrap();
        let before = store.clone();
        let revision = store.revision();
        tracker.on_drag_begin();
        assert!(!tracker.on_drag_update(&mut store, Vec2::new(1.0, 0.0)));

        assert_eq!(store, before);
        assert_eq!(store.revision(), revision);
        let lefts: Vec<f64> = store.iter().map(|s| s.render_bounds().x0).collect();
        assert_eq!(lefts, vec![20.0, 40.0]);
        assert!(tracker.selection().is_none());
    }

    #[test]
    fn test_revalidate_clears_stale_selection() {
        let mut store = sample_store();
        let mut tracker = SelectionTracker::new();
        tracker.on_tap(&store, Point::new(10.0, 10.0));
        assert!(!tracker.revalidate(&store));

        // Index 0 now holds what used to be stroke 1.
        store.remove(0).unwrap();
        assert!(tracker.revalidate(&store));
        assert!(tracker.selection().is_none());
    }

    #[test]
    fn test_revalidate_survives_own_drag() {
        let mut store = sample_store();
        let mut tracker = SelectionTracker::new();
        tracker.on_tap(&store, Point::new(10.0, 10.0));
        tracker.on_drag_begin();
        tracker.on_drag_update(&mut store, Vec2::new(40.0, 40.0));
        assert!(!tracker.revalidate(&store));
        assert_eq!(tracker.selected_index(), Some(0));
    }
}
