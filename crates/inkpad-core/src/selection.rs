//! Lasso selection and group manipulation of strokes.

use crate::flags::EngineFlags;
use crate::page::Page;
use crate::stroke::{Stroke, StrokeId};
use kurbo::{BezPath, Point, Rect, Shape, Vec2};
use std::collections::HashMap;

/// Minimum number of lasso points for a closed polygon.
pub const MIN_LASSO_POINTS: usize = 3;

/// State of an in-progress drag of the selected strokes.
#[derive(Debug, Clone)]
pub struct MultiMoveState {
    /// Starting point of the drag.
    pub start_point: Point,
    /// Last pointer position applied to the strokes.
    pub current_point: Point,
    /// Stroke values before the drag, for cancellation.
    pub original_strokes: HashMap<StrokeId, Stroke>,
    /// Whether any translation reached the page.
    pub moved: bool,
}

impl MultiMoveState {
    pub fn new(start_point: Point, original_strokes: HashMap<StrokeId, Stroke>) -> Self {
        Self {
            start_point,
            current_point: start_point,
            original_strokes,
            moved: false,
        }
    }

    /// Total drag delta so far.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    Lassoing,
    Moving(MultiMoveState),
}

/// Lasso capture, hit-testing and manipulation of the selected strokes.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    phase: Phase,
    selected: Vec<StrokeId>,
    lasso: Vec<Point>,
    /// Selection at the start of the current gesture.
    previous_selection: Vec<StrokeId>,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the selected strokes in selection order.
    pub fn selected_ids(&self) -> &[StrokeId] {
        &self.selected
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn is_lassoing(&self) -> bool {
        matches!(self.phase, Phase::Lassoing)
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.phase, Phase::Moving(_))
    }

    /// Lasso points captured so far, page space.
    pub fn lasso_points(&self) -> &[Point] {
        &self.lasso
    }

    /// Open lasso polyline for the overlay.
    pub fn lasso_path(&self) -> Option<BezPath> {
        let (first, rest) = self.lasso.split_first()?;
        let mut path = BezPath::new();
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        Some(path)
    }

    /// Start a lasso, or a drag when `position` is within `grab_radius` of a
    /// selected stroke.
    pub fn on_pointer_down(
        &mut self,
        page: &Page,
        position: Point,
        grab_radius: f64,
    ) -> EngineFlags {
        self.previous_selection = self.selected.clone();

        let grabbed = self
            .selected_strokes(page)
            .any(|stroke| stroke.any_point_within(position, grab_radius));
        if grabbed {
            let originals = self
                .selected_strokes(page)
                .map(|stroke| (stroke.id(), stroke.clone()))
                .collect();
            self.phase = Phase::Moving(MultiMoveState::new(position, originals));
            return EngineFlags::handled();
        }

        self.selected.clear();
        self.lasso.clear();
        self.lasso.push(position);
        self.phase = Phase::Lassoing;
        EngineFlags::redraw()
    }

    pub fn on_pointer_move(&mut self, page: &mut Page, position: Point) -> EngineFlags {
        match &mut self.phase {
            Phase::Idle => EngineFlags::default(),
            Phase::Lassoing => {
                self.lasso.push(position);
                EngineFlags::redraw()
            }
            Phase::Moving(state) => {
                let delta = position - state.current_point;
                state.current_point = position;
                if delta == Vec2::ZERO {
                    return EngineFlags::handled();
                }
                translate_strokes(page, &self.selected, delta);
                state.moved = true;
                EngineFlags::modified()
            }
        }
    }

    pub fn on_pointer_up(&mut self, page: &Page, position: Point) -> EngineFlags {
        match std::mem::take(&mut self.phase) {
            Phase::Idle => EngineFlags::default(),
            Phase::Lassoing => {
                self.lasso.push(position);
                let lasso = std::mem::take(&mut self.lasso);
                if lasso.len() < MIN_LASSO_POINTS {
                    return EngineFlags::redraw();
                }
                self.selected = strokes_in_lasso(page, &lasso);
                log::debug!("lasso selected {} strokes", self.selected.len());
                EngineFlags::redraw()
            }
            Phase::Moving(state) => {
                log::debug!(
                    "moved {} strokes by {:?}",
                    self.selected.len(),
                    state.delta()
                );
                EngineFlags::handled()
            }
        }
    }

    /// Abort the gesture and restore the selection from before it.
    ///
    /// A cancelled drag also puts the original stroke values back.
    pub fn on_pointer_cancel(&mut self, page: &mut Page) -> EngineFlags {
        let flags = match std::mem::take(&mut self.phase) {
            Phase::Idle => return EngineFlags::default(),
            Phase::Lassoing => EngineFlags::redraw(),
            Phase::Moving(state) if state.moved => {
                for original in state.original_strokes.into_values() {
                    page.strokes.replace(original);
                }
                EngineFlags::modified()
            }
            Phase::Moving(_) => EngineFlags::redraw(),
        };
        self.lasso.clear();
        self.selected = std::mem::take(&mut self.previous_selection);
        self.retain_existing(page);
        flags
    }

    /// Duplicate the selected strokes and select the copies.
    pub fn copy(&mut self, page: &mut Page) -> EngineFlags {
        let copies: Vec<Stroke> = self.selected_strokes(page).map(Stroke::duplicate).collect();
        if copies.is_empty() {
            return EngineFlags::default();
        }
        self.selected = copies.iter().map(Stroke::id).collect();
        for copy in copies {
            page.strokes.push(copy);
        }
        log::debug!("copied {} strokes", self.selected.len());
        EngineFlags::modified()
    }

    /// Remove the selected strokes from the page and clear the selection.
    pub fn delete_selected(&mut self, page: &mut Page) -> EngineFlags {
        let removed = std::mem::take(&mut self.selected)
            .into_iter()
            .filter_map(|id| page.strokes.remove(id))
            .count();
        if removed == 0 {
            return EngineFlags::redraw();
        }
        log::debug!("deleted {} selected strokes", removed);
        EngineFlags::modified()
    }

    /// Drop the selection without touching the page.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Forget selected ids whose strokes are no longer on the page.
    pub fn retain_existing(&mut self, page: &Page) {
        self.selected.retain(|id| page.strokes.contains(*id));
    }

    /// Bounds of every selected sample, `None` when empty or degenerate.
    pub fn selection_bounds(&self, page: &Page) -> Option<Rect> {
        let bounds = self
            .selected_strokes(page)
            .filter_map(Stroke::bounds)
            .reduce(|acc, r| acc.union(r))?;
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return None;
        }
        Some(bounds)
    }

    fn selected_strokes<'a>(&'a self, page: &'a Page) -> impl Iterator<Item = &'a Stroke> + 'a {
        self.selected
            .iter()
            .filter_map(move |id| page.strokes.get(*id))
    }
}

/// Substitute each stroke by a copy shifted by `delta`, keeping ids.
fn translate_strokes(page: &mut Page, ids: &[StrokeId], delta: Vec2) {
    for id in ids {
        let Some(moved) = page.strokes.get(*id).map(|s| s.translated(delta)) else {
            continue;
        };
        page.strokes.replace(moved);
    }
}

/// Ids of the strokes with at least one sample inside the closed lasso.
///
/// Containment uses the non-zero winding rule.
fn strokes_in_lasso(page: &Page, lasso: &[Point]) -> Vec<StrokeId> {
    let Some((first, rest)) = lasso.split_first() else {
        return Vec::new();
    };
    let mut polygon = BezPath::new();
    polygon.move_to(*first);
    for p in rest {
        polygon.line_to(*p);
    }
    polygon.close_path();
    let bounds = polygon.bounding_box();

    page.strokes
        .iter()
        .filter(|stroke| {
            stroke.points().iter().any(|p| {
                let pos = p.position();
                bounds.contains(pos) && polygon.contains(pos)
            })
        })
        .map(Stroke::id)
        .collect()
}
