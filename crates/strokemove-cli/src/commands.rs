//! Subcommand implementations. Each returns the text to print on success.

use kurbo::{Point, Vec2};
use std::path::{Path, PathBuf};
use strokemove_core::canvas::Canvas;
use strokemove_core::editor::{GestureOutcome, StrokeEditor};
use strokemove_core::export::plan_export;
use strokemove_core::input::{Gesture, PanPhase, PenEvent};
use strokemove_core::lasso::resolve_lasso;
use strokemove_core::note::Note;
use strokemove_core::selection::{TapOutcome, hit_test};
use strokemove_core::storage::{Storage, StorageError};
use strokemove_core::store::StoreError;
use strokemove_core::surface::{DrawingSurface, SurfaceError};
use strokemove_core::tools::EditMode;
use strokemove_render::{RasterRenderer, RendererError};
use thiserror::Error;

/// Errors surfaced to the user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No stroke at ({x}, {y})")]
    NoStrokeAt { x: f64, y: f64 },
    #[error("A lasso needs at least three points, got {0}")]
    LassoTooShort(usize),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What an export covers.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportSource {
    /// Explicit store indices; empty means the whole canvas.
    Indices(Vec<usize>),
    /// Whatever a lasso through these points covers.
    Lasso(Vec<Point>),
}

fn load(storage: &dyn Storage, id: &str) -> Result<Note, CliError> {
    Ok(pollster::block_on(storage.load(id))?)
}

fn save(storage: &dyn Storage, id: &str, note: &Note) -> Result<(), CliError> {
    Ok(pollster::block_on(storage.save(id, note))?)
}

/// Feed `points` to the editor as one pen gesture.
fn trace(editor: &mut StrokeEditor, canvas: &mut Canvas, points: &[Point]) -> Result<(), CliError> {
    let Some((&first, rest)) = points.split_first() else {
        return Ok(());
    };
    editor.handle_pen(canvas, PenEvent::Down { position: first })?;
    let (last, middle) = match rest.split_last() {
        Some((&last, middle)) => (last, middle),
        None => (first, &rest[..0]),
    };
    for &position in middle {
        editor.handle_pen(canvas, PenEvent::Move { position })?;
    }
    editor.handle_pen(canvas, PenEvent::Up { position: last })?;
    Ok(())
}

fn lasso_canvas(note: Note, polygon: &[Point]) -> Result<(StrokeEditor, Canvas), CliError> {
    if polygon.len() < 3 {
        return Err(CliError::LassoTooShort(polygon.len()));
    }
    let mut canvas = Canvas::with_store(note.drawing);
    let mut editor = StrokeEditor::new();
    editor.set_mode(EditMode::RegionEdit);
    trace(&mut editor, &mut canvas, polygon)?;
    Ok((editor, canvas))
}

pub fn new_note(storage: &dyn Storage, title: &str) -> Result<String, CliError> {
    let note = Note::new(title);
    save(storage, &note.id, &note)?;
    log::info!("Created note {} ({})", note.id, note.title);
    Ok(note.id)
}

pub fn list_notes(storage: &dyn Storage) -> Result<String, CliError> {
    let mut ids = pollster::block_on(storage.list())?;
    ids.sort();
    if ids.is_empty() {
        return Ok("No notes".to_string());
    }

    let lines: Vec<String> = ids
        .iter()
        .map(|id| match pollster::block_on(storage.load(id)) {
            Ok(note) => format!("{}\t{}\t{} strokes", id, note.title, note.drawing.count()),
            Err(e) => {
                log::warn!("Could not read note {}: {}", id, e);
                format!("{}\t<unreadable>", id)
            }
        })
        .collect();
    Ok(lines.join("\n"))
}

pub fn draw(
    storage: &dyn Storage,
    id: &str,
    points: &[Point],
    width: Option<f64>,
) -> Result<String, CliError> {
    let mut note = load(storage, id)?;
    let mut canvas = Canvas::with_store(std::mem::take(&mut note.drawing));
    let mut editor = StrokeEditor::new();
    if let Some(width) = width {
        let mut ink = editor.tools().ink();
        ink.width = width;
        editor.set_ink(ink);
    }

    trace(&mut editor, &mut canvas, points)?;

    note.drawing = canvas.into_store();
    save(storage, id, &note)?;
    Ok(format!("Drew stroke {}", note.drawing.count().saturating_sub(1)))
}

pub fn hit(storage: &dyn Storage, id: &str, point: Point) -> Result<String, CliError> {
    let note = load(storage, id)?;
    match hit_test(&note.drawing, point) {
        Some((_, index)) => Ok(index.to_string()),
        None => Err(CliError::NoStrokeAt {
            x: point.x,
            y: point.y,
        }),
    }
}

pub fn move_stroke(
    storage: &dyn Storage,
    id: &str,
    at: Point,
    by: Vec2,
) -> Result<String, CliError> {
    let mut note = load(storage, id)?;
    let mut canvas = Canvas::with_store(std::mem::take(&mut note.drawing));
    let mut editor = StrokeEditor::new();
    editor.set_mode(EditMode::RegionEdit);

    let index = match editor.handle_gesture(&mut canvas, Gesture::Tap { location: at }) {
        GestureOutcome::Tapped(TapOutcome::Selected(index)) => index,
        _ => return Err(CliError::NoStrokeAt { x: at.x, y: at.y }),
    };
    editor.handle_gesture(&mut canvas, Gesture::pan(PanPhase::Began, 0.0, 0.0));
    editor.handle_gesture(&mut canvas, Gesture::pan(PanPhase::Changed, by.x, by.y));
    editor.handle_gesture(&mut canvas, Gesture::pan(PanPhase::Ended, by.x, by.y));

    let transform = canvas.store().get(index)?.transform;
    note.drawing = canvas.into_store();
    save(storage, id, &note)?;
    Ok(format!("Moved stroke {} (transform {:?})", index, transform.as_coeffs()))
}

pub fn lasso(storage: &dyn Storage, id: &str, polygon: &[Point]) -> Result<String, CliError> {
    let note = load(storage, id)?;
    let (_, mut canvas) = lasso_canvas(note, polygon)?;
    let resolution = resolve_lasso(&mut canvas);
    Ok(serde_json::to_string(&resolution)?)
}

pub fn export(
    storage: &dyn Storage,
    id: &str,
    source: ExportSource,
    scale: f64,
    out: &Path,
) -> Result<String, CliError> {
    let note = load(storage, id)?;
    let (store, plan) = match source {
        ExportSource::Indices(indices) => {
            let canvas = Canvas::with_store(note.drawing);
            for &index in &indices {
                canvas.store().get(index)?;
            }
            let plan = plan_export(canvas.store(), &indices, canvas.bounds);
            (canvas.into_store(), plan)
        }
        ExportSource::Lasso(polygon) => {
            let (editor, mut canvas) = lasso_canvas(note, &polygon)?;
            let bounds = canvas.bounds;
            let plan = editor.plan_lasso_export(&mut canvas, bounds);
            (canvas.into_store(), plan)
        }
    };

    let image = RasterRenderer::new().render(&store, &plan, scale)?;
    let png_data = image.encode_png()?;
    std::fs::write(out, png_data).map_err(|source| CliError::Write {
        path: out.to_path_buf(),
        source,
    })?;

    Ok(format!(
        "Wrote {}x{} PNG to {}",
        image.width(),
        image.height(),
        out.display()
    ))
}
