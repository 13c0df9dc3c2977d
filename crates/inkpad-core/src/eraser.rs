//! Whole-stroke eraser driven by a circular cursor.

use crate::flags::EngineFlags;
use crate::history::HistoryAction;
use crate::page::Page;
use crate::stroke::StrokeId;
use kurbo::{Circle, Point};

/// Smallest eraser radius in page units.
pub const MIN_RADIUS: f64 = 1.0;

/// Eraser state. The cursor is only shown while the pointer is down.
#[derive(Debug, Clone)]
pub struct EraserEngine {
    cursor: Option<Point>,
    radius: f64,
}

impl Default for EraserEngine {
    fn default() -> Self {
        Self::new(crate::settings::DEFAULT_ERASER_RADIUS as f64)
    }
}

impl EraserEngine {
    pub fn new(radius: f64) -> Self {
        Self {
            cursor: None,
            radius: radius.max(MIN_RADIUS),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(MIN_RADIUS);
    }

    /// Cursor circle for the overlay, `None` while the pointer is up.
    pub fn cursor(&self) -> Option<Circle> {
        self.cursor.map(|c| Circle::new(c, self.radius))
    }

    /// Returns the ids of removed strokes alongside the flags.
    pub fn on_pointer_down(
        &mut self,
        page: &mut Page,
        position: Point,
    ) -> (EngineFlags, Vec<StrokeId>) {
        self.erase_at(page, position)
    }

    pub fn on_pointer_move(
        &mut self,
        page: &mut Page,
        position: Point,
    ) -> (EngineFlags, Vec<StrokeId>) {
        self.erase_at(page, position)
    }

    pub fn on_pointer_up(&mut self) -> EngineFlags {
        self.hide_cursor()
    }

    pub fn on_pointer_cancel(&mut self) -> EngineFlags {
        self.hide_cursor()
    }

    fn hide_cursor(&mut self) -> EngineFlags {
        match self.cursor.take() {
            Some(_) => EngineFlags::redraw(),
            None => EngineFlags::default(),
        }
    }

    /// Remove every stroke touching the cursor circle in one batch.
    fn erase_at(&mut self, page: &mut Page, position: Point) -> (EngineFlags, Vec<StrokeId>) {
        self.cursor = Some(position);
        let radius = self.radius;
        let removed = page
            .strokes
            .extract_if(|stroke| stroke.any_point_within(position, radius));
        if removed.is_empty() {
            return (EngineFlags::redraw(), Vec::new());
        }

        log::debug!("erased {} strokes at {:?}", removed.len(), position);
        let ids = removed.iter().map(|s| s.id()).collect();
        page.history.record_all(removed.into_iter().map(HistoryAction::Delete));
        (EngineFlags::modified(), ids)
    }
}
