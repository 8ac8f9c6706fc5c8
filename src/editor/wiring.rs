//! Smart wiring: turns a stream of pointer positions into a topologically
//! connected wire.
//!
//! Snapping priority at every cursor position: the nearest pin within the
//! snap radius, failing that the nearest point on an existing wire (vertex or
//! interior projection), failing that the grid. Committed legs are routed
//! orthogonally unless orthogonal mode is toggled off.
//!
//! A wire that starts at a pin records a connection immediately; committing a
//! second pin connection finishes the wire without further termination. The
//! in-progress wire is not part of the schematic until finished with at least
//! two points; cancelling leaves no trace.

use crate::geometry::{nearest_point_on_segment, snap_point};
use crate::model::{Connection, Point, Schematic, Wire};
use crate::style::{AUTOROUTE_CLEARANCE, AUTOROUTE_PADDING, GRID_SIZE, SNAP_RADIUS};

use super::operations::new_id;

// ────────────────────────────────────────────────────────────────────────────
// Snapping
// ────────────────────────────────────────────────────────────────────────────

/// A pin found within the snap radius.
#[derive(Debug, Clone, PartialEq)]
pub struct PinHit {
    pub component_id: String,
    pub pin_id: String,
    pub position: Point,
    pub connected: bool,
}

/// Where a cursor position snapped to.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapTarget {
    Pin(PinHit),
    Wire(Point),
    Grid(Point),
}

impl SnapTarget {
    pub fn position(&self) -> Point {
        match self {
            SnapTarget::Pin(hit) => hit.position,
            SnapTarget::Wire(p) | SnapTarget::Grid(p) => *p,
        }
    }
}

/// Global minimum pin distance under the snap radius.
pub fn find_nearest_pin(schematic: &Schematic, point: Point) -> Option<PinHit> {
    let mut nearest: Option<PinHit> = None;
    let mut min_distance = SNAP_RADIUS;
    for component in &schematic.components {
        for pin in &component.pins {
            let pos = component.pin_position(pin);
            let distance = point.distance_to(pos);
            if distance < min_distance {
                min_distance = distance;
                nearest = Some(PinHit {
                    component_id: component.id.clone(),
                    pin_id: pin.id.clone(),
                    position: pos,
                    connected: schematic.pin_connected(&component.id, &pin.id),
                });
            }
        }
    }
    nearest
}

/// Nearest point on any existing wire (vertices and interior projections)
/// under the snap radius.
pub fn find_nearest_wire_point(schematic: &Schematic, point: Point) -> Option<Point> {
    let mut nearest: Option<Point> = None;
    let mut min_distance = SNAP_RADIUS;
    for wire in &schematic.wires {
        for p in &wire.points {
            let distance = point.distance_to(*p);
            if distance < min_distance {
                min_distance = distance;
                nearest = Some(*p);
            }
        }
        for segment in wire.points.windows(2) {
            let on_segment = nearest_point_on_segment(point, segment[0], segment[1]);
            let distance = point.distance_to(on_segment);
            if distance < min_distance {
                min_distance = distance;
                nearest = Some(on_segment);
            }
        }
    }
    nearest
}

/// Resolve a cursor position with the pin > wire > grid priority.
pub fn snap_target(schematic: &Schematic, point: Point) -> SnapTarget {
    if let Some(pin) = find_nearest_pin(schematic, point) {
        return SnapTarget::Pin(pin);
    }
    if let Some(p) = find_nearest_wire_point(schematic, point) {
        return SnapTarget::Wire(p);
    }
    SnapTarget::Grid(snap_point(point, GRID_SIZE))
}

// ────────────────────────────────────────────────────────────────────────────
// Path synthesis
// ────────────────────────────────────────────────────────────────────────────

/// Orthogonal path from `start` to `end`: the dominant axis runs first, then
/// the remaining leg. Identical consecutive points are omitted.
pub fn orthogonal_path(start: Point, end: Point) -> Vec<Point> {
    let mut points = vec![start];
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    if dx > dy {
        points.push(Point::new(end.x, start.y));
        points.push(end);
    } else {
        points.push(Point::new(start.x, end.y));
        points.push(end);
    }
    dedup_consecutive(points)
}

fn dedup_consecutive(points: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

/// Simplified two-leg auto-route between arbitrary points: an L-shaped path,
/// or a three-point detour stepping above the target when the direct segment
/// crosses a component's padded bounds. A coarse heuristic, not a planner.
pub fn auto_route(schematic: &Schematic, start: Point, end: Point) -> Vec<Point> {
    let mut points = vec![start];
    if path_obstructed(schematic, start, end) {
        let mid = Point::new(start.x, end.y - AUTOROUTE_CLEARANCE);
        points.push(mid);
        points.push(Point::new(end.x, mid.y));
    } else if (end.x - start.x).abs() > (end.y - start.y).abs() {
        points.push(Point::new(end.x, start.y));
    } else {
        points.push(Point::new(start.x, end.y));
    }
    points.push(end);
    dedup_consecutive(points)
}

fn path_obstructed(schematic: &Schematic, start: Point, end: Point) -> bool {
    schematic.components.iter().any(|c| {
        let (l, t, r, b) = c.bounds();
        crate::geometry::segment_intersects_rect(
            start,
            end,
            l - AUTOROUTE_PADDING,
            t - AUTOROUTE_PADDING,
            r + AUTOROUTE_PADDING,
            b + AUTOROUTE_PADDING,
        )
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Wiring state machine
// ────────────────────────────────────────────────────────────────────────────

/// A guideline segment of the live routing preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guideline {
    pub from: Point,
    pub to: Point,
}

/// A highlighted connection point shown while wiring.
#[derive(Debug, Clone, PartialEq)]
pub enum Highlight {
    Pin {
        component_id: String,
        pin_id: String,
        point: Point,
    },
    Wire {
        point: Point,
    },
}

impl Highlight {
    pub fn point(&self) -> Point {
        match self {
            Highlight::Pin { point, .. } | Highlight::Wire { point } => *point,
        }
    }
}

/// The wiring tool: `Idle → start → (add_point)* → finish | cancel → Idle`.
#[derive(Debug, Clone)]
pub struct WireTool {
    current: Option<Wire>,
    start_point: Option<Point>,
    preview_point: Option<Point>,
    snap_point: Option<Point>,
    nearest_pin: Option<PinHit>,
    orthogonal: bool,
    guidelines: Vec<Guideline>,
    highlights: Vec<Highlight>,
}

impl Default for WireTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WireTool {
    pub fn new() -> Self {
        WireTool {
            current: None,
            start_point: None,
            preview_point: None,
            snap_point: None,
            nearest_pin: None,
            orthogonal: true,
            guidelines: Vec::new(),
            highlights: Vec::new(),
        }
    }

    pub fn is_wiring(&self) -> bool {
        self.current.is_some()
    }

    /// The uncommitted wire being drawn, if any. Always rendered on top.
    pub fn current_wire(&self) -> Option<&Wire> {
        self.current.as_ref()
    }

    pub fn guidelines(&self) -> &[Guideline] {
        &self.guidelines
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn preview_point(&self) -> Option<Point> {
        self.preview_point
    }

    pub fn snap_point(&self) -> Option<Point> {
        self.snap_point
    }

    /// Where the wire began, while wiring is active.
    pub fn start_point(&self) -> Option<Point> {
        self.start_point
    }

    /// The pin currently under the cursor, if the last position snapped to one.
    pub fn nearest_pin(&self) -> Option<&PinHit> {
        self.nearest_pin.as_ref()
    }

    pub fn orthogonal_mode(&self) -> bool {
        self.orthogonal
    }

    pub fn toggle_orthogonal_mode(&mut self) {
        self.orthogonal = !self.orthogonal;
    }

    /// Begin a wire at the snapped cursor position. Starting on a pin records
    /// the first connection.
    pub fn start(&mut self, schematic: &Schematic, point: Point) {
        let target = snap_target(schematic, point);
        let start_point = target.position();

        let mut wire = Wire::new(new_id());
        wire.points.push(start_point);
        if let SnapTarget::Pin(hit) = &target {
            wire.connections.push(Connection {
                component_id: hit.component_id.clone(),
                pin_id: hit.pin_id.clone(),
                point: hit.position,
            });
        }

        self.nearest_pin = match &target {
            SnapTarget::Pin(hit) => Some(hit.clone()),
            _ => None,
        };
        self.current = Some(wire);
        self.start_point = Some(start_point);
        self.preview_point = None;
        self.snap_point = None;
        self.guidelines.clear();
        self.rebuild_highlights(Some(&target));
    }

    /// Update the routing preview for the current cursor position.
    pub fn update(&mut self, schematic: &Schematic, point: Point) {
        if self.current.is_none() {
            return;
        }
        let target = snap_target(schematic, point);
        let target_point = target.position();

        match &target {
            SnapTarget::Pin(hit) => {
                self.snap_point = Some(hit.position);
                self.nearest_pin = Some(hit.clone());
            }
            SnapTarget::Wire(p) => {
                self.snap_point = Some(*p);
                self.nearest_pin = None;
            }
            SnapTarget::Grid(_) => {
                self.snap_point = None;
                self.nearest_pin = None;
            }
        }
        self.preview_point = Some(target_point);
        self.rebuild_highlights(Some(&target));

        self.guidelines.clear();
        if self.orthogonal {
            if let Some(last) = self.last_point() {
                let path = orthogonal_path(last, target_point);
                for segment in path.windows(2) {
                    self.guidelines.push(Guideline {
                        from: segment[0],
                        to: segment[1],
                    });
                }
            }
        }
    }

    /// Commit a point at the snapped cursor position, routing the new leg
    /// orthogonally when orthogonal mode is on. Returns `true` when the wire
    /// picked up its second pin connection and should be finished.
    pub fn add_point(&mut self, schematic: &Schematic, point: Point) -> bool {
        let target = snap_target(schematic, point);
        let target_point = target.position();
        let Some(wire) = self.current.as_mut() else {
            return false;
        };
        let Some(&last) = wire.points.last() else {
            return false;
        };

        if let SnapTarget::Pin(hit) = &target {
            wire.connections.push(Connection {
                component_id: hit.component_id.clone(),
                pin_id: hit.pin_id.clone(),
                point: hit.position,
            });
        }

        if self.orthogonal {
            for p in orthogonal_path(last, target_point).into_iter().skip(1) {
                wire.points.push(p);
            }
        } else if last != target_point {
            wire.points.push(target_point);
        }

        matches!(target, SnapTarget::Pin(_)) && wire.connections.len() >= 2
    }

    /// Finalize the wire. Candidates with fewer than two points are silently
    /// discarded. Either way the tool returns to idle.
    pub fn finish(&mut self) -> Option<Wire> {
        let wire = self.current.take();
        self.reset_preview();
        wire.filter(|w| w.points.len() >= 2)
    }

    /// Abandon the in-progress wire, leaving no trace.
    pub fn cancel(&mut self) {
        self.current = None;
        self.reset_preview();
    }

    /// The preview polyline from the last committed point to the cursor, as
    /// drawn on top of everything else.
    pub fn preview_path(&self) -> Vec<Point> {
        let (Some(last), Some(preview)) = (self.last_point(), self.preview_point) else {
            return Vec::new();
        };
        if self.orthogonal {
            orthogonal_path(last, preview)
        } else {
            vec![last, preview]
        }
    }

    fn last_point(&self) -> Option<Point> {
        self.current.as_ref().and_then(|w| w.points.last().copied())
    }

    fn reset_preview(&mut self) {
        self.start_point = None;
        self.preview_point = None;
        self.snap_point = None;
        self.nearest_pin = None;
        self.guidelines.clear();
        self.highlights.clear();
    }

    /// Highlights are the current wire's recorded pin connections plus the
    /// transient snap target, if it is a pin or wire point.
    fn rebuild_highlights(&mut self, target: Option<&SnapTarget>) {
        self.highlights.clear();
        if let Some(wire) = &self.current {
            for c in &wire.connections {
                self.highlights.push(Highlight::Pin {
                    component_id: c.component_id.clone(),
                    pin_id: c.pin_id.clone(),
                    point: c.point,
                });
            }
        }
        match target {
            Some(SnapTarget::Pin(hit)) => {
                let already = self.highlights.iter().any(|h| {
                    matches!(h, Highlight::Pin { component_id, pin_id, .. }
                        if *component_id == hit.component_id && *pin_id == hit.pin_id)
                });
                if !already {
                    self.highlights.push(Highlight::Pin {
                        component_id: hit.component_id.clone(),
                        pin_id: hit.pin_id.clone(),
                        point: hit.position,
                    });
                }
            }
            Some(SnapTarget::Wire(p)) => {
                self.highlights.push(Highlight::Wire { point: *p });
            }
            _ => {}
        }
    }
}
