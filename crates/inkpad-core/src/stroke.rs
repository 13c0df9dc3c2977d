//! Stroke model: sampled points, brushes and committed strokes.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// One raw pointer sample in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkPoint {
    pub x: f32,
    pub y: f32,
    /// Milliseconds since the first sample of the stroke.
    pub elapsed_time_ms: i64,
    pub pressure: f32,
    pub tilt_radians: f32,
    pub orientation_radians: f32,
}

impl InkPoint {
    /// Create a sample with full pressure and no tilt or orientation.
    pub fn new(x: f32, y: f32, elapsed_time_ms: i64) -> Self {
        Self {
            x,
            y,
            elapsed_time_ms,
            pressure: 1.0,
            tilt_radians: 0.0,
            orientation_radians: 0.0,
        }
    }

    /// Position as a kurbo point.
    pub fn position(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }

    /// Euclidean distance to a page-space position.
    pub fn distance_to(&self, other: Point) -> f64 {
        self.position().distance(other)
    }

    /// Same sample shifted by `delta`; timing and pen state are kept.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x as f32,
            y: self.y + delta.y as f32,
            ..*self
        }
    }
}

/// Stock brush families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BrushFamily {
    Marker,
    #[default]
    PressurePen,
    Highlighter,
}

impl BrushFamily {
    /// All families in persisted index order.
    pub const ALL: [BrushFamily; 3] = [
        BrushFamily::Marker,
        BrushFamily::PressurePen,
        BrushFamily::Highlighter,
    ];

    /// Index used by the persisted record.
    pub fn index(self) -> u8 {
        match self {
            BrushFamily::Marker => 0,
            BrushFamily::PressurePen => 1,
            BrushFamily::Highlighter => 2,
        }
    }

    /// Family for a persisted index, if it is known.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Brush descriptor, snapshotted when a stroke starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub family: BrushFamily,
    pub size: f32,
    pub epsilon: f32,
    pub color: u64,
}

impl Brush {
    /// Default epsilon for new strokes.
    pub const DEFAULT_EPSILON: f32 = 0.1;

    pub fn new(family: BrushFamily, size: f32, epsilon: f32, color: u64) -> Self {
        Self {
            family,
            size,
            epsilon,
            color,
        }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(
            BrushFamily::PressurePen,
            5.0,
            Self::DEFAULT_EPSILON,
            0xFF00_0000,
        )
    }
}

/// Device that produced a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    #[default]
    Unknown,
    Stylus,
    Touch,
    Mouse,
}

impl ToolType {
    /// Index used by the persisted record.
    pub fn index(self) -> u8 {
        match self {
            ToolType::Unknown => 0,
            ToolType::Stylus => 1,
            ToolType::Touch => 2,
            ToolType::Mouse => 3,
        }
    }

    /// Tool type for a persisted index. Unrecognized values map to `Unknown`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => ToolType::Stylus,
            2 => ToolType::Touch,
            3 => ToolType::Mouse,
            _ => ToolType::Unknown,
        }
    }
}

/// A committed stroke.
///
/// Strokes are immutable values. Edits such as translation build a new value
/// carrying the same id, so the page and the selection can swap it in.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    id: StrokeId,
    brush: Brush,
    tool_type: ToolType,
    unit_length_cm: f32,
    points: Vec<InkPoint>,
}

impl Stroke {
    /// Create a stroke with a fresh id.
    pub fn new(
        brush: Brush,
        tool_type: ToolType,
        unit_length_cm: f32,
        points: Vec<InkPoint>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), brush, tool_type, unit_length_cm, points)
    }

    /// Create a stroke with a known id (used when decoding).
    pub fn with_id(
        id: StrokeId,
        brush: Brush,
        tool_type: ToolType,
        unit_length_cm: f32,
        points: Vec<InkPoint>,
    ) -> Self {
        Self {
            id,
            brush,
            tool_type,
            unit_length_cm,
            points,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn tool_type(&self) -> ToolType {
        self.tool_type
    }

    pub fn unit_length_cm(&self) -> f32 {
        self.unit_length_cm
    }

    pub fn points(&self) -> &[InkPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any sample lies within `radius` of `center` (inclusive).
    pub fn any_point_within(&self, center: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.distance_to(center) <= radius)
    }

    /// Axis-aligned bounds of the samples, `None` for an empty stroke.
    pub fn bounds(&self) -> Option<Rect> {
        let first = self.points.first()?.position();
        Some(
            self.points
                .iter()
                .skip(1)
                .fold(Rect::from_points(first, first), |rect, p| {
                    rect.union_pt(p.position())
                }),
        )
    }

    /// New value with every sample shifted by `delta`. The id is kept.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            points: self.points.iter().map(|p| p.translated(delta)).collect(),
            ..self.clone()
        }
    }

    /// Identical geometry and brush under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    /// Same brush, tool, unit length and samples, ignoring the id.
    pub fn same_content(&self, other: &Stroke) -> bool {
        self.brush == other.brush
            && self.tool_type == other.tool_type
            && self.unit_length_cm == other.unit_length_cm
            && self.points == other.points
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Stylus stroke through the given page positions, 10 ms apart.
    pub(crate) fn stroke_through(points: &[(f32, f32)]) -> Stroke {
        let points = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| InkPoint::new(x, y, i as i64 * 10))
            .collect();
        Stroke::new(Brush::default(), ToolType::Stylus, 0.0, points)
    }

    #[test]
    fn test_brush_family_index() {
        for family in BrushFamily::ALL {
            assert_eq!(BrushFamily::from_index(family.index()), Some(family));
        }
        assert_eq!(BrushFamily::from_index(3), None);
    }

    #[test]
    fn test_tool_type_unknown_fallback() {
        assert_eq!(ToolType::from_index(1), ToolType::Stylus);
        assert_eq!(ToolType::from_index(42), ToolType::Unknown);
    }

    #[test]
    fn test_any_point_within() {
        let stroke = stroke_through(&[(0.0, 0.0), (10.0, 10.0)]);
        assert!(stroke.any_point_within(Point::new(3.0, 4.0), 5.0));
        assert!(!stroke.any_point_within(Point::new(5.0, 5.0), 7.0));
    }

    #[test]
    fn test_bounds() {
        let stroke = stroke_through(&[(0.0, 5.0), (10.0, -5.0), (4.0, 20.0)]);
        let bounds = stroke.bounds().unwrap();
        assert_eq!(bounds, Rect::new(0.0, -5.0, 10.0, 20.0));
        assert!(stroke_through(&[]).bounds().is_none());
    }

    #[test]
    fn test_translated_keeps_id_and_pen_state() {
        let stroke = stroke_through(&[(1.0, 2.0), (3.0, 4.0)]);
        let moved = stroke.translated(Vec2::new(10.0, -1.0));
        assert_eq!(moved.id(), stroke.id());
        assert_eq!(moved.points()[0].x, 11.0);
        assert_eq!(moved.points()[1].y, 3.0);
        assert_eq!(moved.points()[1].elapsed_time_ms, 10);
        assert_eq!(moved.brush(), stroke.brush());
    }

    #[test]
    fn test_translate_back_restores_coordinates() {
        let stroke = stroke_through(&[(1.25, 2.5), (300.75, -40.125)]);
        let back = stroke
            .translated(Vec2::new(17.3, -8.9))
            .translated(Vec2::new(-17.3, 8.9));
        for (a, b) in stroke.points().iter().zip(back.points()) {
            assert!((a.x - b.x).abs() < 1e-3);
            assert!((a.y - b.y).abs() < 1e-3);
        }
    }

    #[test]
    fn test_duplicate_has_fresh_id() {
        let stroke = stroke_through(&[(0.0, 0.0)]);
        let copy = stroke.duplicate();
        assert_ne!(copy.id(), stroke.id());
        assert!(copy.same_content(&stroke));
        assert_ne!(copy, stroke);
    }
}
