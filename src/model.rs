use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::library::SymbolTemplate;

// ────────────────────────────────────────────────────────────────────────────
// SchematicDoc – binary serialization wrapper
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchematicDoc {
    pub name: String,
    pub schematic: Schematic,
}

impl SchematicDoc {
    /// Save the document to a binary file with magic bytes and versioning.
    pub fn save_to_binary<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        std::io::Write::write_all(&mut writer, b"RUSTYSCHEM")?;
        std::io::Write::write_all(&mut writer, &1u32.to_le_bytes())?;
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        Ok(())
    }

    /// Load a document from a binary file, checking magic bytes and version.
    pub fn load_from_binary<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut reader = std::io::BufReader::new(file);
        let mut magic = [0u8; 10];
        std::io::Read::read_exact(&mut reader, &mut magic)?;
        if &magic != b"RUSTYSCHEM" {
            anyhow::bail!("Invalid magic bytes: expected 'RUSTYSCHEM'");
        }
        let mut version_bytes = [0u8; 4];
        std::io::Read::read_exact(&mut reader, &mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != 1 {
            anyhow::bail!("Unsupported version: {}", version);
        }
        let doc: SchematicDoc =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
        Ok(doc)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Point
// ────────────────────────────────────────────────────────────────────────────

/// A point in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pin
// ────────────────────────────────────────────────────────────────────────────

/// Electrical role of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinRole {
    Input,
    Output,
    Bidirectional,
    Power,
    Ground,
    Passive,
    NoConnect,
}

impl Default for PinRole {
    fn default() -> Self {
        PinRole::Passive
    }
}

/// A terminal on a component, at a fixed offset from the component origin.
///
/// Whether a pin is *connected* is derived from the wires' connection lists
/// (see [`Schematic::pin_connected`]); it is never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
    /// Offset from the owning component's origin.
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub role: PinRole,
}

impl Pin {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Pin {
            id: id.into(),
            name: String::new(),
            number: String::new(),
            x,
            y,
            role: PinRole::Passive,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Component
// ────────────────────────────────────────────────────────────────────────────

/// A placed symbol instance.
///
/// `properties` preserves the insertion order of user-visible properties for
/// the properties panel. `symbol` carries the resolved library template for
/// rendering; `symbol_id`/`library_id` identify its source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    /// Diagram position of the component origin (center of the body).
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, a multiple of the rotation step.
    pub rotation: f64,
    /// Reference label, e.g. "U3".
    pub reference: String,
    pub value: String,
    pub selected: bool,
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub symbol_id: Option<String>,
    #[serde(default)]
    pub library_id: Option<String>,
    #[serde(default)]
    pub symbol: Option<SymbolTemplate>,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
}

impl Component {
    /// Absolute diagram position of a pin.
    pub fn pin_position(&self, pin: &Pin) -> Point {
        Point::new(self.x + pin.x, self.y + pin.y)
    }

    /// Axis-aligned bounds as `(left, top, right, bottom)`, ignoring rotation.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            self.x + self.width / 2.0,
            self.y + self.height / 2.0,
        )
    }

    /// Axis-aligned containment test, ignoring rotation.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (l, t, r, b) = self.bounds();
        x >= l && x <= r && y >= t && y <= b
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire
// ────────────────────────────────────────────────────────────────────────────

/// A recorded association between a wire and a specific pin. Component and
/// wire lifetimes are independent; this is a relation, not ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub component_id: String,
    pub pin_id: String,
    pub point: Point,
}

/// A drawn wire: an ordered polyline through diagram points.
///
/// A finalized wire always has at least two points; candidates with fewer
/// are discarded before they ever reach the schematic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire {
    pub id: String,
    pub points: Vec<Point>,
    #[serde(default)]
    pub net_name: Option<String>,
    pub selected: bool,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Wire {
    pub fn new(id: impl Into<String>) -> Self {
        Wire {
            id: id.into(),
            points: Vec::new(),
            net_name: None,
            selected: false,
            connections: Vec::new(),
        }
    }

    /// Axis-aligned bounds of the polyline as `(left, top, right, bottom)`.
    /// Empty wires report a zero rectangle at the origin.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let mut it = self.points.iter();
        let Some(first) = it.next() else {
            return (0.0, 0.0, 0.0, 0.0);
        };
        let (mut l, mut t, mut r, mut b) = (first.x, first.y, first.x, first.y);
        for p in it {
            l = l.min(p.x);
            t = t.min(p.y);
            r = r.max(p.x);
            b = b.max(p.y);
        }
        (l, t, r, b)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Schematic
// ────────────────────────────────────────────────────────────────────────────

/// The authoritative in-memory diagram: all placed components and drawn wires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schematic {
    pub components: Vec<Component>,
    pub wires: Vec<Wire>,
}

impl Schematic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    pub fn wire(&self, id: &str) -> Option<&Wire> {
        self.wires.iter().find(|w| w.id == id)
    }

    pub fn wire_mut(&mut self, id: &str) -> Option<&mut Wire> {
        self.wires.iter_mut().find(|w| w.id == id)
    }

    /// A pin is connected if any wire's connection list references it.
    pub fn pin_connected(&self, component_id: &str, pin_id: &str) -> bool {
        self.wires.iter().any(|w| {
            w.connections
                .iter()
                .any(|c| c.component_id == component_id && c.pin_id == pin_id)
        })
    }

    /// Absolute position of a pin, if both the component and pin exist.
    pub fn pin_position(&self, component_id: &str, pin_id: &str) -> Option<Point> {
        let component = self.component(component_id)?;
        let pin = component.pins.iter().find(|p| p.id == pin_id)?;
        Some(component.pin_position(pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component_at(id: &str, x: f64, y: f64) -> Component {
        Component {
            id: id.to_string(),
            x,
            y,
            width: 80.0,
            height: 60.0,
            rotation: 0.0,
            reference: "U1".to_string(),
            value: "IC".to_string(),
            selected: false,
            pins: vec![Pin::new("1", -40.0, -20.0), Pin::new("2", 40.0, 0.0)],
            symbol_id: None,
            library_id: None,
            symbol: None,
            properties: IndexMap::new(),
        }
    }

    #[test]
    fn test_pin_position_is_component_relative() {
        let c = component_at("c1", 100.0, 200.0);
        assert_eq!(c.pin_position(&c.pins[0]), Point::new(60.0, 180.0));
        assert_eq!(c.pin_position(&c.pins[1]), Point::new(140.0, 200.0));
    }

    #[test]
    fn test_component_bounds_and_contains() {
        let c = component_at("c1", 100.0, 100.0);
        assert_eq!(c.bounds(), (60.0, 70.0, 140.0, 130.0));
        assert!(c.contains(100.0, 100.0));
        assert!(c.contains(60.0, 70.0));
        assert!(!c.contains(141.0, 100.0));
    }

    #[test]
    fn test_wire_bounds() {
        let mut w = Wire::new("w1");
        w.points = vec![
            Point::new(10.0, 5.0),
            Point::new(30.0, 5.0),
            Point::new(30.0, -15.0),
        ];
        assert_eq!(w.bounds(), (10.0, -15.0, 30.0, 5.0));
        assert_eq!(Wire::new("w2").bounds(), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_pin_connected_is_derived_from_wires() {
        let mut sch = Schematic::new();
        sch.components.push(component_at("c1", 0.0, 0.0));
        assert!(!sch.pin_connected("c1", "1"));

        let mut w = Wire::new("w1");
        w.points = vec![Point::new(-40.0, -20.0), Point::new(0.0, -20.0)];
        w.connections.push(Connection {
            component_id: "c1".to_string(),
            pin_id: "1".to_string(),
            point: Point::new(-40.0, -20.0),
        });
        sch.wires.push(w);

        assert!(sch.pin_connected("c1", "1"));
        assert!(!sch.pin_connected("c1", "2"));
        assert!(!sch.pin_connected("nope", "1"));
    }

    #[test]
    fn test_lookup_by_id() {
        let mut sch = Schematic::new();
        sch.components.push(component_at("c1", 0.0, 0.0));
        assert!(sch.component("c1").is_some());
        assert!(sch.component("missing").is_none());
        assert!(sch.wire("missing").is_none());
        assert_eq!(sch.pin_position("c1", "2"), Some(Point::new(40.0, 0.0)));
        assert_eq!(sch.pin_position("c1", "9"), None);
    }
}
