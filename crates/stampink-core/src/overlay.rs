//! Overlay rectangle geometry and hit-testing.

use kurbo::{Point, Rect, Size, Vec2};

/// Visual size of the resize handle in canvas pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Side length of the square grab zone at the bottom-right corner.
/// Larger than the visual handle to give a forgiving grab target.
pub const HANDLE_GRAB_SIZE: f64 = 15.0;
/// Minimum overlay width/height enforced during resize.
pub const MIN_OVERLAY_SIZE: f64 = 20.0;

/// The box within which the overlay image is drawn, in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    /// Top-left corner position.
    pub position: Point,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
}

impl Default for OverlayRect {
    /// The fixed placement every freshly loaded base image starts with.
    fn default() -> Self {
        Self {
            position: Point::new(50.0, 50.0),
            width: 69.0,
            height: 69.0,
        }
    }
}

impl OverlayRect {
    /// Get the bounding rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// Check whether a point falls within the closed rectangle
    /// `[x, x+w] x [y, y+h]`. Both edges are inclusive so a click exactly
    /// on the border still grabs the overlay.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.width
            && point.y >= self.position.y
            && point.y <= self.position.y + self.height
    }

    /// Check whether a point falls within the grab zone: a closed
    /// `HANDLE_GRAB_SIZE` square anchored at the bottom-right corner.
    /// Callers must check this before [`contains`](Self::contains) so that
    /// resizing wins over moving in the overlapping corner region.
    pub fn near_handle(&self, point: Point) -> bool {
        let right = self.position.x + self.width;
        let bottom = self.position.y + self.height;
        point.x >= right - HANDLE_GRAB_SIZE
            && point.x <= right
            && point.y >= bottom - HANDLE_GRAB_SIZE
            && point.y <= bottom
    }

    /// Translate by `delta`, clamping the rectangle inside the canvas.
    ///
    /// The clamp is `max(0, min(x + dx, canvas_w - width))` per axis. When
    /// the rectangle is larger than the canvas the inner `min` goes
    /// negative and the outer `max` pins the position to 0; the min/max
    /// ordering matters and must not be replaced with `f64::clamp`, which
    /// panics on an inverted range.
    pub fn translate_clamped(&mut self, delta: Vec2, canvas: Size) {
        self.position.x = (self.position.x + delta.x)
            .min(canvas.width - self.width)
            .max(0.0);
        self.position.y = (self.position.y + delta.y)
            .min(canvas.height - self.height)
            .max(0.0);
    }

    /// Grow or shrink by `delta`, flooring both dimensions at
    /// [`MIN_OVERLAY_SIZE`]. Width and height change independently (no
    /// aspect-ratio preservation) and the result is intentionally not
    /// clamped to the canvas; only moves are. Known quirk, kept as-is.
    pub fn resize_by(&mut self, delta: Vec2) {
        self.width = (self.width + delta.x).max(MIN_OVERLAY_SIZE);
        self.height = (self.height + delta.y).max(MIN_OVERLAY_SIZE);
    }
}
