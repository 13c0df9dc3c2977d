//! Turns a pointer down/move/up sequence into a committed stroke.

use crate::flags::EngineFlags;
use crate::history::HistoryAction;
use crate::page::Page;
use crate::stroke::{Brush, InkPoint, Stroke, ToolType};
use kurbo::Point;

/// A raw pointer sample already mapped to page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Point,
    /// Absolute event time in milliseconds.
    pub timestamp_ms: i64,
    pub pressure: f32,
    pub tilt_radians: f32,
    pub orientation_radians: f32,
}

impl PointerSample {
    /// Sample with full pressure and no tilt.
    pub fn at(x: f64, y: f64, timestamp_ms: i64) -> Self {
        Self {
            position: Point::new(x, y),
            timestamp_ms,
            pressure: 1.0,
            tilt_radians: 0.0,
            orientation_radians: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct InProgressStroke {
    brush: Brush,
    tool_type: ToolType,
    origin_ms: i64,
    points: Vec<InkPoint>,
}

impl InProgressStroke {
    /// Append a sample. Samples with a non-finite position are dropped and
    /// non-finite attributes fall back to the previous point's values.
    fn append(&mut self, sample: &PointerSample) {
        let x = sample.position.x as f32;
        let y = sample.position.y as f32;
        if !x.is_finite() || !y.is_finite() {
            log::warn!("dropping pointer sample at non-finite position ({x}, {y})");
            return;
        }
        let (mut elapsed, pressure, tilt, orientation) = match self.points.last() {
            Some(last) => (
                last.elapsed_time_ms,
                last.pressure,
                last.tilt_radians,
                last.orientation_radians,
            ),
            None => (0, 1.0, 0.0, 0.0),
        };
        elapsed = elapsed.max(sample.timestamp_ms.saturating_sub(self.origin_ms));
        self.points.push(InkPoint {
            x,
            y,
            elapsed_time_ms: elapsed,
            pressure: finite_or(sample.pressure, pressure),
            tilt_radians: finite_or(sample.tilt_radians, tilt),
            orientation_radians: finite_or(sample.orientation_radians, orientation),
        });
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Stroke authoring state for one pointer.
#[derive(Debug, Clone, Default)]
pub struct StrokeAuthoringEngine {
    in_progress: Option<InProgressStroke>,
    unit_length_cm: f32,
}

impl StrokeAuthoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine stamping new strokes with a physical unit length.
    pub fn with_unit_length(unit_length_cm: f32) -> Self {
        Self {
            in_progress: None,
            unit_length_cm,
        }
    }

    /// Start a stroke. The brush is snapshotted for the whole stroke.
    ///
    /// A stroke already in progress is discarded.
    pub fn on_pointer_down(
        &mut self,
        page: &mut Page,
        brush: Brush,
        tool_type: ToolType,
        sample: PointerSample,
    ) -> EngineFlags {
        page.history.clear_future();
        let mut stroke = InProgressStroke {
            brush,
            tool_type,
            origin_ms: sample.timestamp_ms,
            points: Vec::new(),
        };
        stroke.append(&sample);
        self.in_progress = Some(stroke);
        EngineFlags::redraw()
    }

    pub fn on_pointer_move(&mut self, sample: PointerSample) -> EngineFlags {
        match self.in_progress.as_mut() {
            Some(stroke) => {
                stroke.append(&sample);
                EngineFlags::redraw()
            }
            None => EngineFlags::default(),
        }
    }

    /// Finish the stroke, commit it to the page and record it for undo.
    pub fn on_pointer_up(&mut self, page: &mut Page, sample: PointerSample) -> EngineFlags {
        let Some(mut in_progress) = self.in_progress.take() else {
            return EngineFlags::default();
        };
        in_progress.append(&sample);
        if in_progress.points.is_empty() {
            return EngineFlags::redraw();
        }
        let stroke = Stroke::new(
            in_progress.brush,
            in_progress.tool_type,
            self.unit_length_cm,
            in_progress.points,
        );
        log::debug!("committed stroke {} with {} points", stroke.id(), stroke.len());
        page.strokes.push(stroke.clone());
        page.history.record(HistoryAction::Add(stroke));
        EngineFlags::modified()
    }

    /// Drop the stroke in progress without touching the page.
    pub fn on_pointer_cancel(&mut self) -> EngineFlags {
        match self.in_progress.take() {
            Some(_) => EngineFlags::redraw(),
            None => EngineFlags::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Samples of the stroke in progress, for live rendering.
    pub fn in_progress_points(&self) -> &[InkPoint] {
        self.in_progress
            .as_ref()
            .map(|s| s.points.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::BrushFamily;
    use crate::stroke::tests::stroke_through;

    fn sample(x: f64, y: f64, t: i64) -> PointerSample {
        PointerSample {
            pressure: 0.5,
            tilt_radians: 0.25,
            orientation_radians: 1.5,
            ..PointerSample::at(x, y, t)
        }
    }

    fn down(
        engine: &mut StrokeAuthoringEngine,
        page: &mut Page,
        sample: PointerSample,
    ) -> EngineFlags {
        engine.on_pointer_down(page, Brush::default(), ToolType::Stylus, sample)
    }

    #[test]
    fn test_points_equal_raw_samples() {
        let mut page = Page::new();
        let mut engine = StrokeAuthoringEngine::new();
        let _ = down(&mut engine, &mut page, sample(1.0, 2.0, 1000));
        let _ = engine.on_pointer_move(sample(3.0, 4.0, 1016));
        let flags = engine.on_pointer_up(&mut page, sample(5.0, 6.0, 1033));

        assert!(flags.store_modified);
        assert!(!engine.is_active());
        assert_eq!(page.strokes.len(), 1);
        let stroke = &page.strokes.as_slice()[0];
        let expected = [(1.0, 2.0, 0), (3.0, 4.0, 16), (5.0, 6.0, 33)];
        assert_eq!(stroke.len(), expected.len());
        for (point, (x, y, t)) in stroke.points().iter().zip(expected) {
            assert_eq!((point.x, point.y, point.elapsed_time_ms), (x, y, t));
            assert_eq!(point.pressure, 0.5);
            assert_eq!(point.tilt_radians, 0.25);
            assert_eq!(point.orientation_radians, 1.5);
        }
        assert_eq!(page.history.past(), &[HistoryAction::Add(stroke.clone())]);
    }

    #[test]
    fn test_brush_is_snapshotted() {
        let mut page = Page::new();
        let mut engine = StrokeAuthoringEngine::with_unit_length(0.5);
        let brush = Brush::new(BrushFamily::Highlighter, 12.0, 0.1, 0xFFFF_0000);
        let _ = engine.on_pointer_down(&mut page, brush, ToolType::Stylus, sample(0.0, 0.0, 0));
        let _ = engine.on_pointer_up(&mut page, sample(1.0, 1.0, 5));
        let stroke = &page.strokes.as_slice()[0];
        assert_eq!(*stroke.brush(), brush);
        assert_eq!(stroke.unit_length_cm(), 0.5);
        assert_eq!(stroke.tool_type(), ToolType::Stylus);
    }

    #[test]
    fn test_cancel_leaves_page_untouched() {
        let mut page = Page::new();
        let mut engine = StrokeAuthoringEngine::new();
        let _ = down(&mut engine, &mut page, sample(0.0, 0.0, 0));
        let _ = engine.on_pointer_move(sample(1.0, 1.0, 10));
        assert_eq!(engine.in_progress_points().len(), 2);
        let flags = engine.on_pointer_cancel();
        assert!(!flags.store_modified);
        assert!(page.strokes.is_empty());
        assert!(!page.history.can_undo());
        assert!(engine.in_progress_points().is_empty());
    }

    #[test]
    fn test_move_and_up_without_down_are_ignored() {
        let mut page = Page::new();
        let mut engine = StrokeAuthoringEngine::new();
        assert!(!engine.on_pointer_move(sample(1.0, 1.0, 0)).handled);
        assert!(!engine.on_pointer_up(&mut page, sample(1.0, 1.0, 0)).handled);
        assert!(page.strokes.is_empty());
    }

    #[test]
    fn test_down_clears_redo() {
        let mut page = Page::new();
        let existing = stroke_through(&[(0.0, 0.0)]);
        page.strokes.push(existing.clone());
        page.history.record(HistoryAction::Add(existing));
        page.undo();
        assert!(page.history.can_redo());

        let mut engine = StrokeAuthoringEngine::new();
        let _ = down(&mut engine, &mut page, sample(0.0, 0.0, 0));
        assert!(!page.history.can_redo());
    }

    #[test]
    fn test_decreasing_timestamps_are_clamped() {
        let mut page = Page::new();
        let mut engine = StrokeAuthoringEngine::new();
        let _ = down(&mut engine, &mut page, sample(0.0, 0.0, 100));
        let _ = engine.on_pointer_move(sample(1.0, 0.0, 120));
        let _ = engine.on_pointer_move(sample(2.0, 0.0, 110));
        let _ = engine.on_pointer_up(&mut page, sample(3.0, 0.0, 130));
        let times: Vec<i64> = page.strokes.as_slice()[0]
            .points()
            .iter()
            .map(|p| p.elapsed_time_ms)
            .collect();
        assert_eq!(times, vec![0, 20, 20, 30]);
    }

    #[test]
    fn test_non_finite_attributes_fall_back() {
        let mut page = Page::new();
        let mut engine = StrokeAuthoringEngine::new();
        let first = PointerSample {
            pressure: f32::NAN,
            tilt_radians: f32::INFINITY,
            ..sample(0.0, 0.0, 0)
        };
        let _ = down(&mut engine, &mut page, first);
        let second = PointerSample {
            pressure: 0.75,
            ..sample(1.0, 0.0, 8)
        };
        let _ = engine.on_pointer_move(second);
        let third = PointerSample {
            pressure: f32::NEG_INFINITY,
            orientation_radians: f32::NAN,
            ..sample(2.0, 0.0, 16)
        };
        let _ = engine.on_pointer_up(&mut page, third);

        let points = page.strokes.as_slice()[0].points();
        assert_eq!(points[0].pressure, 1.0);
        assert_eq!(points[0].tilt_radians, 0.0);
        assert_eq!(points[1].pressure, 0.75);
        assert_eq!(points[2].pressure, 0.75);
        assert_eq!(points[2].orientation_radians, 1.5);
    }

    #[test]
    fn test_non_finite_positions_are_dropped() {
        let mut page = Page::new();
        let mut engine = StrokeAuthoringEngine::new();
        let _ = down(&mut engine, &mut page, sample(0.0, 0.0, 0));
        let _ = engine.on_pointer_move(sample(f64::NAN, 1.0, 4));
        let _ = engine.on_pointer_move(sample(1e300, 1.0, 8));
        let _ = engine.on_pointer_up(&mut page, sample(2.0, 2.0, 12));
        let stroke = &page.strokes.as_slice()[0];
        assert_eq!(stroke.len(), 2);
        assert!(stroke.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_stroke_without_finite_samples_is_not_committed() {
        let mut page = Page::new();
        let mut engine = StrokeAuthoringEngine::new();
        let _ = down(&mut engine, &mut page, sample(f64::INFINITY, 0.0, 0));
        let flags = engine.on_pointer_up(&mut page, sample(0.0, f64::NAN, 5));
        assert!(!flags.store_modified);
        assert!(page.strokes.is_empty());
        assert!(!page.history.can_undo());
    }

    #[test]
    fn test_extreme_timestamps_saturate() {
        let mut page = Page::new();
        let mut engine = StrokeAuthoringEngine::new();
        let _ = down(&mut engine, &mut page, sample(0.0, 0.0, i64::MIN));
        let _ = engine.on_pointer_up(&mut page, sample(1.0, 1.0, 5));
        let points = page.strokes.as_slice()[0].points();
        assert_eq!(points[0].elapsed_time_ms, 0);
        assert_eq!(points[1].elapsed_time_ms, i64::MAX);
    }
}
