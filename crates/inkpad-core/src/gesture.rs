//! Reduction of multi-touch samples to pan/zoom steps.
//!
//! Only finger (touch) contacts drive the view. Stylus contacts belong to the
//! ink engines and are ignored here.

use crate::stroke::ToolType;
use crate::transform::ViewTransform;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// One active contact in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub tool_type: ToolType,
}

impl TouchPoint {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            tool_type: ToolType::Touch,
        }
    }

    fn position(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct GestureFrame {
    ids: Vec<u64>,
    centroid: Point,
    spread: f64,
}

impl GestureFrame {
    fn from_touches(touches: &[TouchPoint]) -> Option<Self> {
        if touches.is_empty() {
            return None;
        }
        let mut ids: Vec<u64> = touches.iter().map(|t| t.id).collect();
        ids.sort_unstable();

        let sum = touches
            .iter()
            .fold(Vec2::ZERO, |acc, t| acc + t.position().to_vec2());
        let centroid = (sum / touches.len() as f64).to_point();

        let mut total = 0.0;
        let mut pairs = 0usize;
        for (i, a) in touches.iter().enumerate() {
            for b in &touches[i + 1..] {
                total += a.position().distance(b.position());
                pairs += 1;
            }
        }
        let spread = if pairs > 0 { total / pairs as f64 } else { 0.0 };

        Some(Self {
            ids,
            centroid,
            spread,
        })
    }
}

/// Tracks finger contacts between frames and feeds pan/zoom into a view.
#[derive(Debug, Clone, Default)]
pub struct TouchGesture {
    previous: Option<GestureFrame>,
}

impl TouchGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process the current set of active contacts.
    ///
    /// The centroid drives panning; with two or more fingers the ratio of the
    /// mean pairwise distance drives zooming about the centroid. A single finger
    /// only pans while the view is zoomed in, leaving plain swipes to page
    /// navigation. When the set of fingers changes the baseline is reset.
    ///
    /// Returns true if the view changed.
    pub fn update(&mut self, touches: &[TouchPoint], view: &mut ViewTransform) -> bool {
        let fingers: Vec<TouchPoint> = touches
            .iter()
            .filter(|t| t.tool_type == ToolType::Touch)
            .copied()
            .collect();
        let Some(frame) = GestureFrame::from_touches(&fingers) else {
            self.previous = None;
            return false;
        };

        let Some(previous) = self.previous.replace(frame.clone()) else {
            return false;
        };
        if previous.ids != frame.ids {
            return false;
        }

        let pan = frame.centroid - previous.centroid;
        let zoom = if fingers.len() >= 2 && previous.spread > f64::EPSILON {
            frame.spread / previous.spread
        } else {
            1.0
        };

        if fingers.len() == 1 && view.scale() <= 1.0 {
            return false;
        }
        if pan == Vec2::ZERO && (zoom - 1.0).abs() < f64::EPSILON {
            return false;
        }
        view.apply_gesture(zoom, pan, frame.centroid);
        true
    }

    /// Forget the current baseline.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
