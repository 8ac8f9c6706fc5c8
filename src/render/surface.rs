//! The drawing-surface contract.
//!
//! The core renders onto any 2D immediate-mode surface exposing the minimal
//! vocabulary below: path construction, fill/stroke with configurable color
//! and width, aligned text, clear-rectangle, and a save/restore stack with
//! local translate/rotate/scale. The egui adapter (feature `egui`)
//! implements it for an `egui::Painter`; tests use [`RecordingSurface`].

use crate::style::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A 2D immediate-mode drawing context.
///
/// Angles are in degrees; `rotate` turns the local frame clockwise around
/// the current origin, matching the component rotation convention.
pub trait DrawSurface {
    /// Clear the whole surface, ignoring the current transform.
    fn clear(&mut self, color: Rgba);
    /// Clear a rectangle given in current local coordinates.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, cx: f64, cy: f64, r: f64, start_angle: f64, end_angle: f64);
    fn close_path(&mut self);
    fn stroke(&mut self, color: Rgba, width: f64);
    fn fill(&mut self, color: Rgba);

    fn fill_text(&mut self, text: &str, x: f64, y: f64, size: f64, align: TextAlign, color: Rgba);

    fn save(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, degrees: f64);
    fn scale(&mut self, factor: f64);
    fn restore(&mut self);
}

// ────────────────────────────────────────────────────────────────────────────
// Recording surface (test double)
// ────────────────────────────────────────────────────────────────────────────

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Rgba),
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc {
        cx: f64,
        cy: f64,
        r: f64,
        start_angle: f64,
        end_angle: f64,
    },
    ClosePath,
    Stroke {
        color: Rgba,
        width: f64,
    },
    Fill(Rgba),
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        align: TextAlign,
        color: Rgba,
    },
    Save,
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64),
    Restore,
}

/// A surface that records every call, for asserting on render behavior.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of whole-surface clears.
    pub fn full_clears(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Clear(_)))
            .count()
    }

    /// Number of clear-rectangle calls.
    pub fn rect_clears(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::ClearRect { .. }))
            .count()
    }

    pub fn strokes(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke { .. }))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, color: Rgba) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn arc(&mut self, cx: f64, cy: f64, r: f64, start_angle: f64, end_angle: f64) {
        self.ops.push(DrawOp::Arc {
            cx,
            cy,
            r,
            start_angle,
            end_angle,
        });
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn stroke(&mut self, color: Rgba, width: f64) {
        self.ops.push(DrawOp::Stroke { color, width });
    }

    fn fill(&mut self, color: Rgba) {
        self.ops.push(DrawOp::Fill(color));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, size: f64, align: TextAlign, color: Rgba) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            size,
            align,
            color,
        });
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(DrawOp::Translate(dx, dy));
    }

    fn rotate(&mut self, degrees: f64) {
        self.ops.push(DrawOp::Rotate(degrees));
    }

    fn scale(&mut self, factor: f64) {
        self.ops.push(DrawOp::Scale(factor));
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }
}
