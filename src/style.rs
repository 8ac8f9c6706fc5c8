//! Editor constants and the color palette used by the rendering routines.

/// Grid pitch in diagram units.
pub const GRID_SIZE: f64 = 10.0;
/// Every Nth grid line is drawn with the major color.
pub const GRID_MAJOR_INTERVAL: u32 = 5;

/// Maximum cursor-to-target distance for pin/wire snapping.
pub const SNAP_RADIUS: f64 = 15.0;
/// Perpendicular distance under which a click hits a wire segment.
pub const WIRE_HIT_THRESHOLD: f64 = 5.0;
/// Radius of the ring drawn around highlighted connection points.
pub const CONNECTION_HIGHLIGHT_RADIUS: f64 = 8.0;

/// Rotation step for components, in degrees.
pub const ROTATION_STEP: f64 = 90.0;

/// Default ad-hoc component bounds.
pub const DEFAULT_COMPONENT_WIDTH: f64 = 80.0;
pub const DEFAULT_COMPONENT_HEIGHT: f64 = 60.0;
pub const PIN_RADIUS: f64 = 3.0;

/// Multiplicative zoom step and clamp bounds.
pub const ZOOM_FACTOR: f64 = 1.2;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Number of dirty elements above which a frame falls back to a full redraw.
pub const DIRTY_THRESHOLD: usize = 10;
/// Padding around a dirty element's bounds when clearing for a partial redraw.
pub const REDRAW_PADDING: f64 = 5.0;

/// Wire stroke widths.
pub const WIRE_WIDTH: f64 = 2.0;
pub const WIRE_SELECTED_WIDTH: f64 = 3.0;
pub const WIRE_VERTEX_RADIUS: f64 = 2.0;

/// History log depth.
pub const MAX_HISTORY: usize = 100;

/// Symbol preview cache bounds.
pub const MAX_CACHE_SIZE: usize = 100;
pub const CACHE_TTL_SECS: u64 = 5 * 60;

/// Auto-route obstacle padding around a component's half-extents, and the
/// vertical clearance of the detour leg.
pub const AUTOROUTE_PADDING: f64 = 10.0;
pub const AUTOROUTE_CLEARANCE: f64 = 50.0;

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba(r, g, b, 255)
    }
}

pub const BACKGROUND: Rgba = Rgba::rgb(0xf8, 0xf8, 0xf8);
pub const GRID_COLOR: Rgba = Rgba::rgb(0xe0, 0xe0, 0xe0);
pub const GRID_MAJOR_COLOR: Rgba = Rgba::rgb(0xc0, 0xc0, 0xc0);

pub const COMPONENT_OUTLINE: Rgba = Rgba::rgb(0x00, 0x00, 0x00);
pub const COMPONENT_FILL: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
pub const PIN_COLOR: Rgba = Rgba::rgb(0xcc, 0x00, 0x00);
pub const TEXT_COLOR: Rgba = Rgba::rgb(0x00, 0x00, 0x00);

pub const WIRE_COLOR: Rgba = Rgba::rgb(0x00, 0x66, 0xcc);
pub const SELECTION_COLOR: Rgba = Rgba::rgb(0x20, 0x80, 0xf0);

pub const GUIDELINE_COLOR: Rgba = Rgba::rgb(0x00, 0xff, 0x00);
pub const HIGHLIGHT_PIN_COLOR: Rgba = Rgba::rgb(0xff, 0x00, 0x00);
pub const HIGHLIGHT_WIRE_COLOR: Rgba = Rgba::rgb(0x00, 0x80, 0xff);
