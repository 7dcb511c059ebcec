//! Edit modes and the tool each mode activates.

use crate::stroke::{DEFAULT_INK_WIDTH, Ink, InkKind, SerializableColor};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Interaction mode, switched from outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditMode {
    #[default]
    Drawing,
    Erasing,
    RegionEdit,
}

impl EditMode {
    /// Tap and pan gestures are only handled while editing regions.
    pub fn gestures_enabled(self) -> bool {
        self == EditMode::RegionEdit
    }

    /// Menu toggle between drawing and region editing.
    pub fn toggled(self) -> Self {
        match self {
            EditMode::Drawing => EditMode::RegionEdit,
            EditMode::Erasing | EditMode::RegionEdit => EditMode::Drawing,
        }
    }

    /// Tool configuration this mode activates, drawing with `ink`.
    pub fn tool_config(self, ink: Ink) -> ToolConfig {
        let tool = match self {
            EditMode::Drawing => ActiveTool::Ink(ink),
            EditMode::Erasing => ActiveTool::Eraser(EraserKind::Vector),
            EditMode::RegionEdit => ActiveTool::Lasso,
        };
        ToolConfig {
            tool,
            gestures_enabled: self.gestures_enabled(),
        }
    }
}

/// How the eraser removes ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EraserKind {
    /// Removes whole strokes.
    #[default]
    Vector,
    /// Removes only the ink under the eraser.
    Bitmap,
}

/// Tool the drawing surface applies raw pen input with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActiveTool {
    Ink(Ink),
    Eraser(EraserKind),
    Lasso,
}

/// Result of a mode transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolConfig {
    pub tool: ActiveTool,
    pub gestures_enabled: bool,
}

/// Manages the current mode, its tool, and pen input in progress.
#[derive(Debug, Clone)]
pub struct ToolManager {
    mode: EditMode,
    config: ToolConfig,
    /// Ink used for new strokes.
    ink: Ink,
    /// Pen samples of the gesture in progress.
    pen_points: Vec<Point>,
}

impl Default for ToolManager {
    fn default() -> Self {
        let ink = Ink::new(InkKind::Pen, SerializableColor::black(), DEFAULT_INK_WIDTH);
        Self {
            mode: EditMode::default(),
            config: EditMode::default().tool_config(ink),
            ink,
            pen_points: Vec::new(),
        }
    }
}

impl ToolManager {
    /// Create a new tool manager in drawing mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn ink(&self) -> Ink {
        self.ink
    }

    /// Switch modes. Takes effect immediately and drops any pen input in progress.
    pub fn set_mode(&mut self, mode: EditMode) -> &ToolConfig {
        if mode != self.mode {
            log::info!("Edit mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.config = mode.tool_config(self.ink);
        self.pen_points.clear();
        &self.config
    }

    /// Change the ink for new strokes.
    pub fn set_ink(&mut self, ink: Ink) {
        self.ink = ink;
        self.config = self.mode.tool_config(ink);
    }

    /// Begin a pen gesture.
    pub fn begin(&mut self, point: Point) {
        self.pen_points.clear();
        self.pen_points.push(point);
    }

    /// Add a sample to the pen gesture in progress.
    pub fn update(&mut self, point: Point) {
        if !self.pen_points.is_empty() {
            self.pen_points.push(point);
        }
    }

    /// Finish the pen gesture, returning its samples (empty if none began).
    pub fn end(&mut self, point: Point) -> Vec<Point> {
        self.update(point);
        std::mem::take(&mut self.pen_points)
    }

    /// Abandon the pen gesture in progress.
    pub fn cancel(&mut self) {
        self.pen_points.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.pen_points.is_empty()
    }

    pub fn pen_points(&self) -> &[Point] {
        &self.pen_points
    }
}
