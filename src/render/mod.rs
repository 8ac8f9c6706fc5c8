//! Differential rendering: dirty tracking, coalesced frame scheduling, and
//! the drawing routines for schematics.
//!
//! Mutations mark element ids dirty on the [`RenderQueue`]; at most one
//! redraw is requested per frame regardless of how many marks arrive. At the
//! frame boundary [`RenderQueue::begin_frame`] decides between a full redraw
//! (first frame, zoom/pan, structural changes, or more dirty elements than
//! the threshold) and a partial one that only clears and redraws the padded
//! bounds of dirty elements. Wires draw beneath components; the in-progress
//! wire always draws last.

pub mod surface;

pub use surface::{DrawOp, DrawSurface, RecordingSurface, TextAlign};

use std::collections::BTreeSet;

use crate::cache::{Bitmap, SymbolCache};
use crate::editor::wiring::{Highlight, WireTool};
use crate::library::GraphicElement;
use crate::model::{Component, Schematic, Wire};
use crate::style::{
    self, CONNECTION_HIGHLIGHT_RADIUS, DIRTY_THRESHOLD, GRID_MAJOR_INTERVAL, GRID_SIZE,
    PIN_RADIUS, REDRAW_PADDING, Rgba, WIRE_SELECTED_WIDTH, WIRE_VERTEX_RADIUS, WIRE_WIDTH,
};
use crate::viewport::Viewport;

// ────────────────────────────────────────────────────────────────────────────
// Render queue
// ────────────────────────────────────────────────────────────────────────────

/// What the current frame must repaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePlan {
    pub full: bool,
    /// Dirty element ids, meaningful only for partial frames.
    pub dirty: Vec<String>,
}

/// Dirty bookkeeping between mutations and frames.
///
/// `mark_*` calls return `true` only when they newly scheduled a frame, so
/// callers can forward exactly one redraw request per frame to the host.
#[derive(Debug, Clone)]
pub struct RenderQueue {
    dirty: BTreeSet<String>,
    full_redraw: bool,
    frame_pending: bool,
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderQueue {
    pub fn new() -> Self {
        RenderQueue {
            dirty: BTreeSet::new(),
            // The very first frame is always a full draw.
            full_redraw: true,
            frame_pending: false,
        }
    }

    /// Mark one element stale.
    pub fn mark_dirty(&mut self, id: &str) -> bool {
        self.dirty.insert(id.to_string());
        self.schedule()
    }

    /// Request a full repaint (structural change, zoom/pan, first draw).
    pub fn mark_structural(&mut self) -> bool {
        self.full_redraw = true;
        self.schedule()
    }

    pub fn is_pending(&self) -> bool {
        self.frame_pending
    }

    /// Drop the pending frame request. Required on teardown so nothing draws
    /// onto a destroyed surface; safe to call repeatedly.
    pub fn cancel(&mut self) {
        self.frame_pending = false;
        self.dirty.clear();
    }

    /// Consume the pending request at the frame boundary. `None` when no
    /// redraw was requested since the last frame.
    pub fn begin_frame(&mut self) -> Option<FramePlan> {
        if !self.frame_pending {
            return None;
        }
        self.frame_pending = false;
        let full = self.full_redraw || self.dirty.len() > DIRTY_THRESHOLD;
        self.full_redraw = false;
        let dirty: Vec<String> = std::mem::take(&mut self.dirty).into_iter().collect();
        Some(FramePlan {
            full,
            dirty: if full { Vec::new() } else { dirty },
        })
    }

    fn schedule(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Frame rendering
// ────────────────────────────────────────────────────────────────────────────

/// Paint one frame according to `plan`. `view_width`/`view_height` are the
/// surface dimensions in screen pixels, used to size the grid.
pub fn render_frame(
    plan: &FramePlan,
    schematic: &Schematic,
    viewport: &Viewport,
    wire_tool: &WireTool,
    surface: &mut dyn DrawSurface,
    view_width: f64,
    view_height: f64,
) {
    if plan.full {
        surface.clear(style::BACKGROUND);
    }

    surface.save();
    surface.translate(viewport.offset_x, viewport.offset_y);
    surface.scale(viewport.scale);

    if plan.full {
        draw_grid(surface, viewport, view_width, view_height);
        for wire in &schematic.wires {
            draw_wire(surface, wire);
        }
        for component in &schematic.components {
            draw_component(surface, component);
        }
    } else {
        for id in &plan.dirty {
            if let Some(component) = schematic.component(id) {
                let (l, t, r, b) = component.bounds();
                surface.clear_rect(
                    l - REDRAW_PADDING,
                    t - REDRAW_PADDING,
                    (r - l) + REDRAW_PADDING * 2.0,
                    (b - t) + REDRAW_PADDING * 2.0,
                );
                draw_component(surface, component);
            }
            if let Some(wire) = schematic.wire(id) {
                draw_wire(surface, wire);
            }
        }
    }

    draw_wiring_preview(surface, wire_tool);
    surface.restore();
}

/// Grid over the visible diagram region, every Nth line in the major color.
fn draw_grid(surface: &mut dyn DrawSurface, viewport: &Viewport, width: f64, height: f64) {
    let top_left = viewport.screen_to_diagram(crate::model::Point::new(0.0, 0.0));
    let bottom_right = viewport.screen_to_diagram(crate::model::Point::new(width, height));

    let first_col = (top_left.x / GRID_SIZE).floor() as i64;
    let last_col = (bottom_right.x / GRID_SIZE).ceil() as i64;
    for col in first_col..=last_col {
        let x = col as f64 * GRID_SIZE;
        let color = grid_line_color(col);
        surface.begin_path();
        surface.move_to(x, top_left.y);
        surface.line_to(x, bottom_right.y);
        surface.stroke(color, 0.5);
    }

    let first_row = (top_left.y / GRID_SIZE).floor() as i64;
    let last_row = (bottom_right.y / GRID_SIZE).ceil() as i64;
    for row in first_row..=last_row {
        let y = row as f64 * GRID_SIZE;
        let color = grid_line_color(row);
        surface.begin_path();
        surface.move_to(top_left.x, y);
        surface.line_to(bottom_right.x, y);
        surface.stroke(color, 0.5);
    }
}

fn grid_line_color(index: i64) -> Rgba {
    if index.rem_euclid(GRID_MAJOR_INTERVAL as i64) == 0 {
        style::GRID_MAJOR_COLOR
    } else {
        style::GRID_COLOR
    }
}

/// Body (symbol graphics or the default rectangle), pins, then reference and
/// value text, all in the component's rotated local frame.
pub fn draw_component(surface: &mut dyn DrawSurface, component: &Component) {
    let outline = if component.selected {
        style::SELECTION_COLOR
    } else {
        style::COMPONENT_OUTLINE
    };
    let outline_width = if component.selected { 2.0 } else { 1.0 };

    surface.save();
    surface.translate(component.x, component.y);
    if component.rotation != 0.0 {
        surface.rotate(component.rotation);
    }

    if let Some(symbol) = &component.symbol {
        for element in &symbol.graphics {
            draw_graphic_element(surface, element, outline, outline_width);
        }
    } else {
        rect_path(
            surface,
            -component.width / 2.0,
            -component.height / 2.0,
            component.width,
            component.height,
        );
        surface.fill(style::COMPONENT_FILL);
        surface.stroke(outline, outline_width);
    }

    let pin_color = if component.selected {
        style::SELECTION_COLOR
    } else {
        style::PIN_COLOR
    };
    for pin in &component.pins {
        circle_path(surface, pin.x, pin.y, PIN_RADIUS);
        surface.fill(pin_color);
    }

    surface.fill_text(
        &component.reference,
        0.0,
        -component.height / 2.0 - 10.0,
        12.0,
        TextAlign::Center,
        style::TEXT_COLOR,
    );
    surface.fill_text(
        &component.value,
        0.0,
        component.height / 2.0 + 10.0,
        12.0,
        TextAlign::Center,
        style::TEXT_COLOR,
    );

    surface.restore();
}

fn draw_graphic_element(
    surface: &mut dyn DrawSurface,
    element: &GraphicElement,
    outline: Rgba,
    width: f64,
) {
    match element {
        GraphicElement::Line { x1, y1, x2, y2 } => {
            surface.begin_path();
            surface.move_to(*x1, *y1);
            surface.line_to(*x2, *y2);
            surface.stroke(outline, width);
        }
        GraphicElement::Rect {
            x,
            y,
            width: w,
            height: h,
            filled,
        } => {
            rect_path(surface, *x, *y, *w, *h);
            if *filled {
                surface.fill(style::COMPONENT_FILL);
            }
            surface.stroke(outline, width);
        }
        GraphicElement::Circle { cx, cy, r, filled } => {
            circle_path(surface, *cx, *cy, *r);
            if *filled {
                surface.fill(outline);
            }
            surface.stroke(outline, width);
        }
        GraphicElement::Arc {
            cx,
            cy,
            r,
            start_angle,
            end_angle,
        } => {
            surface.begin_path();
            surface.arc(*cx, *cy, *r, *start_angle, *end_angle);
            surface.stroke(outline, width);
        }
        GraphicElement::Polygon { points, filled } => {
            surface.begin_path();
            for (i, p) in points.iter().enumerate() {
                if i == 0 {
                    surface.move_to(p.x, p.y);
                } else {
                    surface.line_to(p.x, p.y);
                }
            }
            surface.close_path();
            if *filled {
                surface.fill(outline);
            }
            surface.stroke(outline, width);
        }
        GraphicElement::Text {
            x,
            y,
            text,
            font_size,
        } => {
            surface.fill_text(text, *x, *y, *font_size, TextAlign::Center, style::TEXT_COLOR);
        }
    }
}

/// Polyline with vertex dots; selected wires draw wider in the highlight color.
pub fn draw_wire(surface: &mut dyn DrawSurface, wire: &Wire) {
    if wire.points.len() < 2 {
        return;
    }
    let (color, width) = if wire.selected {
        (style::SELECTION_COLOR, WIRE_SELECTED_WIDTH)
    } else {
        (style::WIRE_COLOR, WIRE_WIDTH)
    };

    surface.begin_path();
    surface.move_to(wire.points[0].x, wire.points[0].y);
    for p in &wire.points[1..] {
        surface.line_to(p.x, p.y);
    }
    surface.stroke(color, width);

    for p in &wire.points {
        circle_path(surface, p.x, p.y, WIRE_VERTEX_RADIUS);
        surface.fill(style::WIRE_COLOR);
    }
}

/// Guidelines, highlighted connection points, and the in-progress wire with
/// its preview leg, on top of everything else.
fn draw_wiring_preview(surface: &mut dyn DrawSurface, tool: &WireTool) {
    for guideline in tool.guidelines() {
        surface.begin_path();
        surface.move_to(guideline.from.x, guideline.from.y);
        surface.line_to(guideline.to.x, guideline.to.y);
        surface.stroke(style::GUIDELINE_COLOR, 1.0);
    }

    for highlight in tool.highlights() {
        let color = match highlight {
            Highlight::Pin { .. } => style::HIGHLIGHT_PIN_COLOR,
            Highlight::Wire { .. } => style::HIGHLIGHT_WIRE_COLOR,
        };
        let p = highlight.point();
        circle_path(surface, p.x, p.y, CONNECTION_HIGHLIGHT_RADIUS);
        surface.stroke(color, 2.0);
    }

    if let Some(wire) = tool.current_wire() {
        draw_wire(surface, wire);
        let preview = tool.preview_path();
        if preview.len() >= 2 {
            surface.begin_path();
            surface.move_to(preview[0].x, preview[0].y);
            for p in &preview[1..] {
                surface.line_to(p.x, p.y);
            }
            surface.stroke(style::WIRE_COLOR, WIRE_WIDTH);
        }
    }
}

fn rect_path(surface: &mut dyn DrawSurface, x: f64, y: f64, width: f64, height: f64) {
    surface.begin_path();
    surface.move_to(x, y);
    surface.line_to(x + width, y);
    surface.line_to(x + width, y + height);
    surface.line_to(x, y + height);
    surface.close_path();
}

fn circle_path(surface: &mut dyn DrawSurface, cx: f64, cy: f64, r: f64) {
    surface.begin_path();
    surface.arc(cx, cy, r, 0.0, 360.0);
}

// ────────────────────────────────────────────────────────────────────────────
// Symbol preview cache integration
// ────────────────────────────────────────────────────────────────────────────

/// Cached preview bitmap for a library-sourced component, rasterizing on miss
/// via the host-provided callback. Ad-hoc components have no symbol to
/// rasterize and always return `None`.
pub fn symbol_preview<'a>(
    cache: &'a mut SymbolCache,
    component: &Component,
    width: u32,
    height: u32,
    rasterize: impl FnOnce(&Component, u32, u32) -> Bitmap,
) -> Option<&'a Bitmap> {
    component.symbol.as_ref()?;
    if cache.get(&component.id, width, height).is_none() {
        let bitmap = rasterize(component, width, height);
        cache.set(&component.id, bitmap, width, height);
    }
    cache.get(&component.id, width, height)
}
