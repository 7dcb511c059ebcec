//! Gesture controller tying modes, selection and the drawing surface together.

use crate::export::{ExportPlan, plan_export};
use crate::input::{Gesture, PanPhase, PenEvent};
use crate::lasso::resolve_lasso;
use crate::selection::{Selection, SelectionTracker, TapOutcome};
use crate::stroke::Ink;
use crate::surface::{DrawingSurface, SurfaceError};
use crate::tools::{EditMode, ToolConfig, ToolManager};
use kurbo::Rect;

/// What a gesture did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Gestures are disabled in the current mode.
    PassedThrough,
    Tapped(TapOutcome),
    DragBegan,
    Moved,
    DragEnded,
    /// Handled, but there was nothing to act on.
    Ignored,
}

/// Routes gestures and pen input for one drawing surface.
///
/// The surface is passed into every call and never stored.
#[derive(Debug, Clone, Default)]
pub struct StrokeEditor {
    tools: ToolManager,
    tracker: SelectionTracker,
}

impl StrokeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.tools.mode()
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.tracker.selection()
    }

    /// Switch modes. The selection is left alone.
    pub fn set_mode(&mut self, mode: EditMode) -> ToolConfig {
        *self.tools.set_mode(mode)
    }

    pub fn set_ink(&mut self, ink: Ink) {
        self.tools.set_ink(ink);
    }

    /// Explicitly drop the selection.
    pub fn deselect<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.tracker.selection().is_some() {
            self.tracker.clear();
            surface.request_redraw();
        }
    }

    /// Re-check the selection after the store changed outside the editor.
    pub fn store_changed<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.tracker.revalidate(surface.store()) {
            surface.request_redraw();
        }
    }

    /// Handle a tap or pan. Only active in [`EditMode::RegionEdit`].
    pub fn handle_gesture<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        gesture: Gesture,
    ) -> GestureOutcome {
        if !self.tools.config().gestures_enabled {
            return GestureOutcome::PassedThrough;
        }
        self.store_changed(surface);

        match gesture {
            Gesture::Tap { location } => {
                let outcome = self.tracker.on_tap(surface.store(), location);
                if outcome != TapOutcome::Missed {
                    surface.request_redraw();
                }
                GestureOutcome::Tapped(outcome)
            }
            Gesture::Pan { phase, translation } => {
                if self.tracker.selection().is_none() {
                    return GestureOutcome::Ignored;
                }
                match phase {
                    PanPhase::Began => {
                        self.tracker.on_drag_begin();
                        GestureOutcome::DragBegan
                    }
                    PanPhase::Changed => {
                        if self.tracker.on_drag_update(surface.store_mut(), translation) {
                            surface.request_redraw();
                            GestureOutcome::Moved
                        } else {
                            GestureOutcome::Ignored
                        }
                    }
                    PanPhase::Ended | PanPhase::Cancelled => {
                        self.tracker.on_drag_end();
                        GestureOutcome::DragEnded
                    }
                }
            }
        }
    }

    /// Forward pen input to the surface's active tool.
    pub fn handle_pen<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        event: PenEvent,
    ) -> Result<(), SurfaceError> {
        match event {
            PenEvent::Down { position } => self.tools.begin(position),
            PenEvent::Move { position } => self.tools.update(position),
            PenEvent::Up { position } => {
                let points = self.tools.end(position);
                if points.is_empty() {
                    return Ok(());
                }
                let tool = self.tools.config().tool;
                surface.apply_tool(&tool, &points)?;
                self.store_changed(surface);
            }
            PenEvent::Cancel => self.tools.cancel(),
        }
        Ok(())
    }

    /// Resolve the lasso and plan an export of what it covers (whole canvas if nothing).
    pub fn plan_lasso_export<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        canvas_bounds: Rect,
    ) -> ExportPlan {
        let resolution = resolve_lasso(surface);
        let plan = plan_export(surface.store(), &resolution.selected, canvas_bounds);
        log::info!(
            "Planned export of {} strokes over {:?}",
            plan.strokes.len(),
            plan.bounds
        );
        plan
    }
}
