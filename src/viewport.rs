//! Viewport state: zoom factor and pan offset, with bidirectional
//! screen↔diagram coordinate mapping.

use crate::model::Point;
use crate::style::{MAX_ZOOM, MIN_ZOOM, ZOOM_FACTOR};

/// Maps between screen pixels and diagram coordinates:
/// `diagram = (screen - offset) / scale`, `screen = diagram * scale + offset`.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::with_bounds(MIN_ZOOM, MAX_ZOOM)
    }

    /// A viewport with custom zoom clamp bounds (some hosts allow up to 10x).
    pub fn with_bounds(min_zoom: f64, max_zoom: f64) -> Self {
        Viewport {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            min_zoom,
            max_zoom,
        }
    }

    pub fn screen_to_diagram(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }

    pub fn diagram_to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    /// Multiply the scale by the zoom step, clamped to the bounds.
    pub fn zoom_in(&mut self) {
        self.scale = (self.scale * ZOOM_FACTOR).min(self.max_zoom);
    }

    /// Divide the scale by the zoom step, clamped to the bounds.
    pub fn zoom_out(&mut self) {
        self.scale = (self.scale / ZOOM_FACTOR).max(self.min_zoom);
    }

    /// Back to scale 1 with the offset at the origin.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Additive pan in screen pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_mapping() {
        let mut vp = Viewport::new();
        vp.scale = 2.0;
        vp.offset_x = 100.0;
        vp.offset_y = -50.0;
        let d = vp.screen_to_diagram(Point::new(140.0, 10.0));
        assert_eq!(d, Point::new(20.0, 30.0));
        assert_eq!(vp.diagram_to_screen(d), Point::new(140.0, 10.0));
    }

    #[test]
    fn test_zoom_clamps() {
        let mut vp = Viewport::new();
        for _ in 0..100 {
            vp.zoom_in();
        }
        assert!((vp.scale - MAX_ZOOM).abs() < 1e-9);
        for _ in 0..200 {
            vp.zoom_out();
        }
        assert!((vp.scale - MIN_ZOOM).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_step_factor() {
        let mut vp = Viewport::new();
        vp.zoom_in();
        assert!((vp.scale - 1.2).abs() < 1e-9);
        vp.zoom_out();
        assert!((vp.scale - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_and_pan() {
        let mut vp = Viewport::new();
        vp.pan(30.0, -10.0);
        vp.pan(5.0, 5.0);
        assert_eq!((vp.offset_x, vp.offset_y), (35.0, -5.0));
        vp.zoom_in();
        vp.reset();
        assert_eq!(vp.scale, 1.0);
        assert_eq!((vp.offset_x, vp.offset_y), (0.0, 0.0));
    }
}
