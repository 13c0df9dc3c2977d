//! View transform for pan/zoom between page and screen space.

use kurbo::{Affine, Point, Vec2};

/// Smallest allowed scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed scale.
pub const MAX_SCALE: f64 = 10.0;
/// Zoom factor of one "zoom in" step.
pub const ZOOM_IN_FACTOR: f64 = 1.25;
/// Zoom factor of one "zoom out" step.
pub const ZOOM_OUT_FACTOR: f64 = 0.8;

/// Affine mapping between page space and screen space.
///
/// The forward matrix maps page to screen (relative to the page origin on
/// screen); the inverse is recomputed after every update.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    forward: Affine,
    inverse: Affine,
    /// Position of the page origin on screen.
    page_offset: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            forward: Affine::IDENTITY,
            inverse: Affine::IDENTITY,
            page_offset: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    /// Create an identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Page-to-screen matrix, for rendering.
    pub fn forward(&self) -> Affine {
        self.forward
    }

    /// Screen-to-page matrix.
    pub fn inverse(&self) -> Affine {
        self.inverse
    }

    /// Current uniform scale.
    pub fn scale(&self) -> f64 {
        self.forward.as_coeffs()[0]
    }

    pub fn translate_x(&self) -> f64 {
        self.forward.as_coeffs()[4]
    }

    pub fn translate_y(&self) -> f64 {
        self.forward.as_coeffs()[5]
    }

    pub fn page_offset(&self) -> Vec2 {
        self.page_offset
    }

    /// Set where the page origin sits on screen.
    pub fn set_page_offset(&mut self, offset: Vec2) {
        self.page_offset = offset;
    }

    /// Apply a pan/zoom gesture step.
    ///
    /// Zooms by `zoom` about `pivot`, then pans by `pan`, both in screen space.
    /// The resulting scale is clamped to [`MIN_SCALE`, `MAX_SCALE`].
    pub fn apply_gesture(&mut self, zoom: f64, pan: Vec2, pivot: Point) {
        let scale = self.scale();
        let target = (scale * zoom).clamp(MIN_SCALE, MAX_SCALE);
        let zoom = target / scale;

        let pivot = pivot.to_vec2();
        self.forward = Affine::translate(pan)
            * Affine::translate(pivot)
            * Affine::scale(zoom)
            * Affine::translate(-pivot)
            * self.forward;
        self.inverse = self.forward.inverse();
    }

    /// Map a screen position to page space.
    pub fn screen_to_page(&self, screen: Point) -> Point {
        self.inverse * (screen - self.page_offset)
    }

    /// Map a page position to screen space.
    pub fn page_to_screen(&self, page: Point) -> Point {
        self.forward * page + self.page_offset
    }

    /// Zoom in one step about the page origin.
    pub fn zoom_in(&mut self) {
        self.apply_gesture(ZOOM_IN_FACTOR, Vec2::ZERO, Point::ZERO);
    }

    /// Zoom out one step about the page origin.
    pub fn zoom_out(&mut self) {
        self.apply_gesture(ZOOM_OUT_FACTOR, Vec2::ZERO, Point::ZERO);
    }

    /// Return to 100% about the page origin. Panning is kept.
    pub fn reset_zoom(&mut self) {
        self.apply_gesture(1.0 / self.scale(), Vec2::ZERO, Point::ZERO);
    }

    /// Scale as a whole percentage for display.
    pub fn zoom_percent(&self) -> i32 {
        (self.scale() * 100.0).round() as i32
    }
}
