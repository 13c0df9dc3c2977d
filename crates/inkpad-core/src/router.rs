//! Tool state machine dispatching pointer input to the ink engines.

use crate::authoring::{PointerSample, StrokeAuthoringEngine};
use crate::eraser::EraserEngine;
use crate::flags::EngineFlags;
use crate::page::Page;
use crate::selection::SelectionEngine;
use crate::settings::SettingsProvider;
use crate::stroke::{Brush, BrushFamily, InkPoint, ToolType};
use crate::transform::ViewTransform;
use kurbo::{BezPath, Circle, Point, Rect};
use serde::{Deserialize, Serialize};

/// Active ink tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Draw,
    Erase,
    Select,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer event in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: i64,
    #[serde(default = "full_pressure")]
    pub pressure: f32,
    #[serde(default)]
    pub tilt: f32,
    #[serde(default)]
    pub orientation: f32,
    #[serde(default = "default_tool_type")]
    pub tool_type: ToolType,
    pub phase: PointerPhase,
}

fn full_pressure() -> f32 {
    1.0
}

fn default_tool_type() -> ToolType {
    ToolType::Stylus
}

impl PointerEvent {
    /// Stylus event with full pressure.
    pub fn stylus(phase: PointerPhase, x: f32, y: f32, timestamp_ms: i64) -> Self {
        Self {
            x,
            y,
            timestamp_ms,
            pressure: 1.0,
            tilt: 0.0,
            orientation: 0.0,
            tool_type: ToolType::Stylus,
            phase,
        }
    }

    fn sample(&self, view: &ViewTransform) -> PointerSample {
        PointerSample {
            position: view.screen_to_page(Point::new(self.x as f64, self.y as f64)),
            timestamp_ms: self.timestamp_ms,
            pressure: self.pressure,
            tilt_radians: self.tilt,
            orientation_radians: self.orientation,
        }
    }
}

/// Stylus side-button signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideButton {
    Down,
    Up,
}

/// Routes every stylus event to exactly one engine according to the tool mode.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    mode: ToolMode,
    authoring: StrokeAuthoringEngine,
    eraser: EraserEngine,
    selection: SelectionEngine,
    /// Erase mode was entered by holding the side button.
    button_erase: bool,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Switch tools, cancelling the gesture of the engine being left.
    pub fn set_mode(&mut self, mode: ToolMode, page: &mut Page) -> EngineFlags {
        self.button_erase = false;
        if mode == self.mode {
            return EngineFlags::default();
        }
        let flags = self.cancel_active(page);
        log::debug!("tool {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        let mut result = EngineFlags::redraw();
        result.merge(flags);
        result
    }

    /// Side button down switches Draw to Erase; up returns to Draw.
    pub fn handle_side_button(&mut self, button: SideButton, page: &mut Page) -> EngineFlags {
        match (button, self.mode) {
            (SideButton::Down, ToolMode::Draw) => {
                let flags = self.set_mode(ToolMode::Erase, page);
                self.button_erase = true;
                flags
            }
            (SideButton::Up, ToolMode::Erase) if self.button_erase => {
                self.set_mode(ToolMode::Draw, page)
            }
            _ => EngineFlags::default(),
        }
    }

    /// Dispatch a pointer event. Non-stylus input is not handled.
    pub fn handle_pointer<S: SettingsProvider + ?Sized>(
        &mut self,
        event: &PointerEvent,
        page: &mut Page,
        view: &ViewTransform,
        settings: &S,
    ) -> EngineFlags {
        if event.tool_type != ToolType::Stylus {
            return EngineFlags::default();
        }
        let sample = event.sample(view);

        match self.mode {
            ToolMode::Draw => match event.phase {
                PointerPhase::Down => {
                    let brush = Brush::new(
                        BrushFamily::PressurePen,
                        settings.draw_thickness(),
                        Brush::DEFAULT_EPSILON,
                        settings.current_color(),
                    );
                    self.authoring
                        .on_pointer_down(page, brush, event.tool_type, sample)
                }
                PointerPhase::Move => self.authoring.on_pointer_move(sample),
                PointerPhase::Up => self.authoring.on_pointer_up(page, sample),
                PointerPhase::Cancel => self.authoring.on_pointer_cancel(),
            },
            ToolMode::Erase => match event.phase {
                PointerPhase::Down | PointerPhase::Move => {
                    self.eraser.set_radius(settings.eraser_radius() as f64);
                    let (flags, removed) = if event.phase == PointerPhase::Down {
                        self.eraser.on_pointer_down(page, sample.position)
                    } else {
                        self.eraser.on_pointer_move(page, sample.position)
                    };
                    if !removed.is_empty() {
                        self.selection.retain_existing(page);
                    }
                    flags
                }
                PointerPhase::Up => self.eraser.on_pointer_up(),
                PointerPhase::Cancel => self.eraser.on_pointer_cancel(),
            },
            ToolMode::Select => match event.phase {
                PointerPhase::Down => self.selection.on_pointer_down(
                    page,
                    sample.position,
                    settings.eraser_radius() as f64,
                ),
                PointerPhase::Move => self.selection.on_pointer_move(page, sample.position),
                PointerPhase::Up => self.selection.on_pointer_up(page, sample.position),
                PointerPhase::Cancel => self.selection.on_pointer_cancel(page),
            },
        }
    }

    pub fn undo(&mut self, page: &mut Page) -> EngineFlags {
        if !page.undo() {
            return EngineFlags::default();
        }
        self.selection.retain_existing(page);
        EngineFlags::modified()
    }

    pub fn redo(&mut self, page: &mut Page) -> EngineFlags {
        if !page.redo() {
            return EngineFlags::default();
        }
        self.selection.retain_existing(page);
        EngineFlags::modified()
    }

    pub fn copy_selection(&mut self, page: &mut Page) -> EngineFlags {
        self.selection.copy(page)
    }

    pub fn delete_selection(&mut self, page: &mut Page) -> EngineFlags {
        self.selection.delete_selected(page)
    }

    /// Cancel any gesture and drop the selection, e.g. when the page changes.
    pub fn reset(&mut self, page: &mut Page) -> EngineFlags {
        let flags = self.cancel_active(page);
        self.selection.clear();
        flags
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    /// Eraser circle, shown only in Erase mode while the pointer is down.
    pub fn eraser_cursor(&self) -> Option<Circle> {
        match self.mode {
            ToolMode::Erase => self.eraser.cursor(),
            _ => None,
        }
    }

    /// Lasso being drawn, page space.
    pub fn lasso_path(&self) -> Option<BezPath> {
        self.selection.lasso_path()
    }

    pub fn selection_bounds(&self, page: &Page) -> Option<Rect> {
        self.selection.selection_bounds(page)
    }

    /// Samples of the stroke being drawn.
    pub fn in_progress_points(&self) -> &[InkPoint] {
        self.authoring.in_progress_points()
    }

    fn cancel_active(&mut self, page: &mut Page) -> EngineFlags {
        match self.mode {
            ToolMode::Draw => self.authoring.on_pointer_cancel(),
            ToolMode::Erase => self.eraser.on_pointer_cancel(),
            ToolMode::Select => self.selection.on_pointer_cancel(page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryAction;
    use crate::settings::Settings;
    use crate::stroke::Stroke;

    struct Fixture {
        router: InputRouter,
        page: Page,
        view: ViewTransform,
        settings: Settings,
        clock: i64,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                router: InputRouter::new(),
                page: Page::new(),
                view: ViewTransform::new(),
                settings: Settings::default(),
                clock: 0,
            }
        }

        fn send(&mut self, phase: PointerPhase, x: f32, y: f32) -> EngineFlags {
            self.clock += 10;
            let event = PointerEvent::stylus(phase, x, y, self.clock);
            self.router
                .handle_pointer(&event, &mut self.page, &self.view, &self.settings)
        }

        fn gesture(&mut self, points: &[(f32, f32)]) {
            let (last, rest) = points.split_last().unwrap();
            let _ = self.send(PointerPhase::Down, rest[0].0, rest[0].1);
            for &(x, y) in &rest[1..] {
                let _ = self.send(PointerPhase::Move, x, y);
            }
            let _ = self.send(PointerPhase::Up, last.0, last.1);
        }

        fn set_mode(&mut self, mode: ToolMode) {
            let _ = self.router.set_mode(mode, &mut self.page);
        }

        fn stroke(&self, index: usize) -> Stroke {
            self.page.strokes.as_slice()[index].clone()
        }
    }

    #[test]
    fn test_draw_uses_settings_brush() {
        let mut fx = Fixture::new();
        fx.settings.draw_thickness = 3.0;
        fx.settings.set_current_color_index(1);
        fx.gesture(&[(0.0, 0.0), (5.0, 5.0)]);
        let brush = *fx.stroke(0).brush();
        assert_eq!(brush.family, BrushFamily::PressurePen);
        assert_eq!(brush.size, 3.0);
        assert_eq!(brush.epsilon, 0.1);
        assert_eq!(brush.color, 0xFFFF_0000);
    }

    #[test]
    fn test_non_stylus_ignored() {
        let mut fx = Fixture::new();
        for tool_type in [ToolType::Touch, ToolType::Mouse, ToolType::Unknown] {
            let event = PointerEvent {
                tool_type,
                ..PointerEvent::stylus(PointerPhase::Down, 1.0, 1.0, 0)
            };
            let flags = fx
                .router
                .handle_pointer(&event, &mut fx.page, &fx.view, &fx.settings);
            assert!(!flags.handled);
        }
        assert!(fx.router.in_progress_points().is_empty());
    }

    #[test]
    fn test_samples_mapped_to_page_space() {
        let mut fx = Fixture::new();
        fx.view.apply_gesture(2.0, kurbo::Vec2::new(10.0, 20.0), Point::ZERO);
        fx.gesture(&[(30.0, 40.0), (50.0, 60.0)]);
        let points = fx.stroke(0).points().to_vec();
        assert_eq!((points[0].x, points[0].y), (10.0, 10.0));
        assert_eq!((points[1].x, points[1].y), (20.0, 20.0));
    }

    #[test]
    fn test_erase_scenario() {
        let mut fx = Fixture::new();
        fx.gesture(&[(0.0, 0.0), (10.0, 10.0)]);
        fx.gesture(&[(40.0, 40.0), (60.0, 40.0)]);
        let a = fx.stroke(0);
        let b = fx.stroke(1);

        fx.settings.set_eraser_radius(8.0);
        fx.set_mode(ToolMode::Erase);
        let flags = fx.send(PointerPhase::Down, 5.0, 5.0);
        assert!(flags.store_modified);
        assert!(fx.router.eraser_cursor().is_some());
        let _ = fx.send(PointerPhase::Up, 5.0, 5.0);

        assert_eq!(fx.page.strokes.as_slice(), &[b.clone()]);
        assert_eq!(
            fx.page.history.past(),
            &[
                HistoryAction::Add(a.clone()),
                HistoryAction::Add(b),
                HistoryAction::Delete(a),
            ]
        );
        assert!(fx.page.history.future().is_empty());
        assert!(fx.router.eraser_cursor().is_none());
    }

    #[test]
    fn test_lasso_copy_scenario() {
        let mut fx = Fixture::new();
        fx.gesture(&[(0.0, 0.0), (10.0, 10.0)]);
        fx.gesture(&[(100.0, 100.0), (110.0, 110.0)]);
        let a = fx.stroke(0);
        let b = fx.stroke(1);

        fx.set_mode(ToolMode::Select);
        fx.gesture(&[(90.0, 90.0), (120.0, 90.0), (120.0, 120.0), (90.0, 120.0)]);
        assert_eq!(fx.router.selection().selected_ids(), &[b.id()]);
        assert!(fx.router.selection_bounds(&fx.page).is_some());

        assert!(fx.router.copy_selection(&mut fx.page).store_modified);
        let strokes = fx.page.strokes.as_slice();
        assert_eq!(strokes.len(), 3);
        assert_eq!(strokes[0], a);
        assert_eq!(strokes[1], b);
        assert!(strokes[2].same_content(&b));
        assert_eq!(fx.router.selection().selected_ids(), &[strokes[2].id()]);
    }

    #[test]
    fn test_move_selection_keeps_ids() {
        let mut fx = Fixture::new();
        fx.gesture(&[(100.0, 100.0), (110.0, 110.0)]);
        let b = fx.stroke(0);
        fx.set_mode(ToolMode::Select);
        fx.gesture(&[(90.0, 90.0), (120.0, 90.0), (120.0, 120.0), (90.0, 120.0)]);

        fx.gesture(&[(100.0, 100.0), (120.0, 100.0), (120.0, 100.0)]);
        let moved = fx.stroke(0);
        assert_eq!(moved.id(), b.id());
        assert_eq!(moved.points()[0].x, 120.0);
        assert_eq!(fx.router.selection().selected_ids(), &[b.id()]);
    }

    #[test]
    fn test_side_button_toggles_draw_and_erase() {
        let mut fx = Fixture::new();
        let _ = fx.router.handle_side_button(SideButton::Down, &mut fx.page);
        assert_eq!(fx.router.mode(), ToolMode::Erase);
        let _ = fx.router.handle_side_button(SideButton::Up, &mut fx.page);
        assert_eq!(fx.router.mode(), ToolMode::Draw);

        fx.set_mode(ToolMode::Select);
        let _ = fx.router.handle_side_button(SideButton::Down, &mut fx.page);
        assert_eq!(fx.router.mode(), ToolMode::Select);

        fx.set_mode(ToolMode::Erase);
        let _ = fx.router.handle_side_button(SideButton::Up, &mut fx.page);
        assert_eq!(fx.router.mode(), ToolMode::Erase);
    }

    #[test]
    fn test_mode_switch_cancels_stroke() {
        let mut fx = Fixture::new();
        let _ = fx.send(PointerPhase::Down, 0.0, 0.0);
        let _ = fx.send(PointerPhase::Move, 5.0, 5.0);
        fx.set_mode(ToolMode::Erase);
        fx.set_mode(ToolMode::Draw);
        let _ = fx.send(PointerPhase::Up, 9.0, 9.0);
        assert!(fx.page.strokes.is_empty());
        assert!(!fx.page.history.can_undo());
    }

    #[test]
    fn test_undo_redo_and_prune() {
        let mut fx = Fixture::new();
        fx.gesture(&[(0.0, 0.0), (10.0, 10.0)]);
        fx.gesture(&[(100.0, 100.0), (110.0, 110.0)]);
        let b = fx.stroke(1);
        fx.set_mode(ToolMode::Select);
        fx.gesture(&[(90.0, 90.0), (120.0, 90.0), (120.0, 120.0), (90.0, 120.0)]);

        assert!(fx.router.undo(&mut fx.page).store_modified);
        assert_eq!(fx.page.strokes.len(), 1);
        assert!(!fx.router.selection().has_selection());

        assert!(fx.router.redo(&mut fx.page).store_modified);
        assert_eq!(fx.stroke(1), b);
        assert!(!fx.router.redo(&mut fx.page).handled);
    }

    #[test]
    fn test_commit_after_undo_clears_redo() {
        let mut fx = Fixture::new();
        fx.gesture(&[(0.0, 0.0), (1.0, 1.0)]);
        fx.gesture(&[(2.0, 2.0), (3.0, 3.0)]);
        let _ = fx.router.undo(&mut fx.page);
        fx.gesture(&[(4.0, 4.0), (5.0, 5.0)]);
        assert!(!fx.router.redo(&mut fx.page).handled);
        assert_eq!(fx.page.strokes.len(), 2);
    }
}
