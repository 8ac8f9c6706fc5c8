//! egui adapter (feature = "egui").
//!
//! [`PainterSurface`] implements the core's [`DrawSurface`] contract on top
//! of an [`egui::Painter`], so an eframe application can host the editing
//! session directly: forward input to the session's entry points, then call
//! `session.render(&mut PainterSurface::new(painter), w, h)` each frame.
//!
//! The save/translate/rotate/scale stack is tracked as an affine matrix here
//! because egui painters have no transform state of their own.

#![cfg(feature = "egui")]

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Shape, Stroke};

use crate::render::{DrawSurface, TextAlign};
use crate::style::Rgba;

fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.0, c.1, c.2, c.3)
}

/// Row-major 2D affine transform: `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy)]
struct Affine {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Affine {
    const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn then(self, rhs: Affine) -> Affine {
        // self ∘ rhs: apply rhs first, then self.
        Affine {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            e: self.a * rhs.e + self.c * rhs.f + self.e,
            f: self.b * rhs.e + self.d * rhs.f + self.f,
        }
    }

    fn apply(&self, x: f64, y: f64) -> Pos2 {
        Pos2::new(
            (self.a * x + self.c * y + self.e) as f32,
            (self.b * x + self.d * y + self.f) as f32,
        )
    }

    /// Uniform length scale of the transform, for stroke widths.
    fn length_scale(&self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

/// A [`DrawSurface`] drawing through an egui painter.
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    transform: Affine,
    stack: Vec<Affine>,
    path: Vec<Pos2>,
    path_closed: bool,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a egui::Painter) -> Self {
        // Anchor diagram (0,0) at the painter's clip origin.
        let origin = painter.clip_rect().min;
        let transform = Affine {
            e: origin.x as f64,
            f: origin.y as f64,
            ..Affine::IDENTITY
        };
        PainterSurface {
            painter,
            transform,
            stack: Vec::new(),
            path: Vec::new(),
            path_closed: false,
        }
    }

    fn closed_points(&self) -> Vec<Pos2> {
        let mut points = self.path.clone();
        if self.path_closed {
            if let Some(&first) = points.first() {
                points.push(first);
            }
        }
        points
    }
}

impl DrawSurface for PainterSurface<'_> {
    fn clear(&mut self, color: Rgba) {
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, color32(color));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        // egui has no transparent clear; paint the background color instead.
        let min = self.transform.apply(x, y);
        let max = self.transform.apply(x + width, y + height);
        let rect = egui::Rect::from_two_pos(min, max);
        self.painter
            .rect_filled(rect, 0.0, color32(crate::style::BACKGROUND));
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.path_closed = false;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.clear();
        self.path_closed = false;
        self.path.push(self.transform.apply(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.push(self.transform.apply(x, y));
    }

    fn arc(&mut self, cx: f64, cy: f64, r: f64, start_angle: f64, end_angle: f64) {
        const SEGMENTS: usize = 24;
        let start = start_angle.to_radians();
        let end = end_angle.to_radians();
        let sweep = if (end - start).abs() < f64::EPSILON {
            std::f64::consts::TAU
        } else {
            end - start
        };
        for i in 0..=SEGMENTS {
            let angle = start + sweep * (i as f64 / SEGMENTS as f64);
            let x = cx + r * angle.cos();
            let y = cy + r * angle.sin();
            self.path.push(self.transform.apply(x, y));
        }
    }

    fn close_path(&mut self) {
        self.path_closed = true;
    }

    fn stroke(&mut self, color: Rgba, width: f64) {
        if self.path.len() < 2 {
            return;
        }
        let stroke = Stroke::new(
            (width * self.transform.length_scale()) as f32,
            color32(color),
        );
        self.painter.add(Shape::line(self.closed_points(), stroke));
    }

    fn fill(&mut self, color: Rgba) {
        if self.path.len() < 3 {
            return;
        }
        self.painter.add(Shape::convex_polygon(
            self.path.clone(),
            color32(color),
            Stroke::NONE,
        ));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, size: f64, align: TextAlign, color: Rgba) {
        let anchor = match align {
            TextAlign::Left => Align2::LEFT_CENTER,
            TextAlign::Center => Align2::CENTER_CENTER,
            TextAlign::Right => Align2::RIGHT_CENTER,
        };
        let font = FontId::proportional((size * self.transform.length_scale()) as f32);
        self.painter
            .text(self.transform.apply(x, y), anchor, text, font, color32(color));
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.then(Affine {
            e: dx,
            f: dy,
            ..Affine::IDENTITY
        });
    }

    fn rotate(&mut self, degrees: f64) {
        let r = degrees.to_radians();
        self.transform = self.transform.then(Affine {
            a: r.cos(),
            b: r.sin(),
            c: -r.sin(),
            d: r.cos(),
            e: 0.0,
            f: 0.0,
        });
    }

    fn scale(&mut self, factor: f64) {
        self.transform = self.transform.then(Affine {
            a: factor,
            d: factor,
            ..Affine::IDENTITY
        });
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }
}
