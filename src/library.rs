//! Symbol library: templates for placeable components and the lookup
//! interface used when placing library-sourced components.
//!
//! The built-in standard catalog covers the basic electronic symbols and is
//! served by [`StandardLibrary`]. Hosts with an external library service
//! implement [`SymbolSource`] themselves; the editing session only ever sees
//! the trait.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rustyschem::library::{standard_library, SymbolSource, StandardLibrary};
//!
//! let lib = StandardLibrary;
//! let resistor = lib.get_symbol("resistor", "standard")?;
//! assert_eq!(resistor.reference_prefix(), "R");
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::model::{PinRole, Point};

/// Id of the built-in library.
pub const STANDARD_LIBRARY_ID: &str = "standard";

// ────────────────────────────────────────────────────────────────────────────
// Template types
// ────────────────────────────────────────────────────────────────────────────

/// A vector-graphics primitive of a symbol body, in symbol-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum GraphicElement {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        filled: bool,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        filled: bool,
    },
    /// Angles in degrees, counter-clockwise from the positive x axis.
    Arc {
        cx: f64,
        cy: f64,
        r: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Polygon {
        points: Vec<Point>,
        filled: bool,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
    },
}

/// A pin of a symbol template, copied onto components placed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinTemplate {
    pub id: String,
    pub name: String,
    pub number: String,
    pub role: PinRole,
    /// Offset from the symbol origin.
    pub x: f64,
    pub y: f64,
}

/// A placeable library symbol: graphics, bounds and pin layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolTemplate {
    pub id: String,
    /// Human-readable name, e.g. `"Resistor"`. Drives the reference prefix.
    pub name: String,
    pub description: String,
    pub width: f64,
    pub height: f64,
    /// Default display value for newly placed components.
    pub default_value: Option<String>,
    pub graphics: Vec<GraphicElement>,
    pub pins: Vec<PinTemplate>,
}

impl SymbolTemplate {
    /// Case-insensitive substring match on id, name or description.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let q = query.to_lowercase();
        self.id.to_lowercase().contains(&q)
            || self.name.to_lowercase().contains(&q)
            || self.description.to_lowercase().contains(&q)
    }

    /// Reference-designator prefix for this symbol (e.g. `"R"` for resistors).
    pub fn reference_prefix(&self) -> &'static str {
        reference_prefix(&self.name)
    }
}

/// Reference-designator prefix by symbol name; unknown symbols get `"U"`.
pub fn reference_prefix(symbol_name: &str) -> &'static str {
    match symbol_name {
        "Resistor" => "R",
        "Capacitor" => "C",
        "Inductor" => "L",
        "Diode" | "LED" => "D",
        "Transistor" | "MOSFET" => "Q",
        "Connector" => "J",
        _ => "U",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lookup interface
// ────────────────────────────────────────────────────────────────────────────

/// Library lookup used when placing a library-sourced component. A failed
/// lookup aborts the placement; no partial component is ever created.
pub trait SymbolSource {
    fn get_symbol(&self, symbol_id: &str, library_id: &str)
    -> Result<SymbolTemplate, EditorError>;
}

/// The built-in catalog, served by value.
#[derive(Debug, Default)]
pub struct StandardLibrary;

impl SymbolSource for StandardLibrary {
    fn get_symbol(
        &self,
        symbol_id: &str,
        library_id: &str,
    ) -> Result<SymbolTemplate, EditorError> {
        if library_id != STANDARD_LIBRARY_ID {
            return Err(EditorError::UnknownLibrary(library_id.to_string()));
        }
        standard_library()
            .iter()
            .find(|s| s.id == symbol_id)
            .cloned()
            .ok_or_else(|| EditorError::SymbolNotFound {
                symbol_id: symbol_id.to_string(),
                library_id: library_id.to_string(),
            })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in catalog
// ────────────────────────────────────────────────────────────────────────────

fn pin(id: &str, name: &str, number: &str, role: PinRole, x: f64, y: f64) -> PinTemplate {
    PinTemplate {
        id: id.to_string(),
        name: name.to_string(),
        number: number.to_string(),
        role,
        x,
        y,
    }
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> GraphicElement {
    GraphicElement::Line { x1, y1, x2, y2 }
}

fn resistor() -> SymbolTemplate {
    SymbolTemplate {
        id: "resistor".to_string(),
        name: "Resistor".to_string(),
        description: "Fixed resistor".to_string(),
        width: 60.0,
        height: 20.0,
        default_value: Some("10k".to_string()),
        graphics: vec![
            line(-30.0, 0.0, -20.0, 0.0),
            GraphicElement::Rect {
                x: -20.0,
                y: -8.0,
                width: 40.0,
                height: 16.0,
                filled: false,
            },
            line(20.0, 0.0, 30.0, 0.0),
        ],
        pins: vec![
            pin("1", "~", "1", PinRole::Passive, -30.0, 0.0),
            pin("2", "~", "2", PinRole::Passive, 30.0, 0.0),
        ],
    }
}

fn capacitor() -> SymbolTemplate {
    SymbolTemplate {
        id: "capacitor".to_string(),
        name: "Capacitor".to_string(),
        description: "Non-polarized capacitor".to_string(),
        width: 60.0,
        height: 30.0,
        default_value: Some("100n".to_string()),
        graphics: vec![
            line(-30.0, 0.0, -4.0, 0.0),
            line(-4.0, -12.0, -4.0, 12.0),
            line(4.0, -12.0, 4.0, 12.0),
            line(4.0, 0.0, 30.0, 0.0),
        ],
        pins: vec![
            pin("1", "~", "1", PinRole::Passive, -30.0, 0.0),
            pin("2", "~", "2", PinRole::Passive, 30.0, 0.0),
        ],
    }
}

fn inductor() -> SymbolTemplate {
    SymbolTemplate {
        id: "inductor".to_string(),
        name: "Inductor".to_string(),
        description: "Inductor / coil".to_string(),
        width: 60.0,
        height: 20.0,
        default_value: Some("10u".to_string()),
        graphics: vec![
            line(-30.0, 0.0, -24.0, 0.0),
            GraphicElement::Arc {
                cx: -16.0,
                cy: 0.0,
                r: 8.0,
                start_angle: 180.0,
                end_angle: 0.0,
            },
            GraphicElement::Arc {
                cx: 0.0,
                cy: 0.0,
                r: 8.0,
                start_angle: 180.0,
                end_angle: 0.0,
            },
            GraphicElement::Arc {
                cx: 16.0,
                cy: 0.0,
                r: 8.0,
                start_angle: 180.0,
                end_angle: 0.0,
            },
            line(24.0, 0.0, 30.0, 0.0),
        ],
        pins: vec![
            pin("1", "~", "1", PinRole::Passive, -30.0, 0.0),
            pin("2", "~", "2", PinRole::Passive, 30.0, 0.0),
        ],
    }
}

fn diode() -> SymbolTemplate {
    SymbolTemplate {
        id: "diode".to_string(),
        name: "Diode".to_string(),
        description: "Rectifier diode".to_string(),
        width: 60.0,
        height: 24.0,
        default_value: Some("1N4148".to_string()),
        graphics: vec![
            line(-30.0, 0.0, -8.0, 0.0),
            GraphicElement::Polygon {
                points: vec![
                    Point::new(-8.0, -10.0),
                    Point::new(-8.0, 10.0),
                    Point::new(8.0, 0.0),
                ],
                filled: true,
            },
            line(8.0, -10.0, 8.0, 10.0),
            line(8.0, 0.0, 30.0, 0.0),
        ],
        pins: vec![
            pin("1", "A", "1", PinRole::Passive, -30.0, 0.0),
            pin("2", "K", "2", PinRole::Passive, 30.0, 0.0),
        ],
    }
}

fn led() -> SymbolTemplate {
    let mut t = diode();
    t.id = "led".to_string();
    t.name = "LED".to_string();
    t.description = "Light-emitting diode".to_string();
    t.default_value = Some("LED".to_string());
    t.graphics.push(line(2.0, -12.0, 8.0, -18.0));
    t.graphics.push(line(8.0, -12.0, 14.0, -18.0));
    t
}

fn transistor_npn() -> SymbolTemplate {
    SymbolTemplate {
        id: "transistor-npn".to_string(),
        name: "Transistor".to_string(),
        description: "NPN bipolar transistor".to_string(),
        width: 60.0,
        height: 60.0,
        default_value: Some("2N3904".to_string()),
        graphics: vec![
            GraphicElement::Circle {
                cx: 0.0,
                cy: 0.0,
                r: 22.0,
                filled: false,
            },
            line(-30.0, 0.0, -8.0, 0.0),
            line(-8.0, -14.0, -8.0, 14.0),
            line(-8.0, -6.0, 12.0, -20.0),
            line(12.0, -20.0, 12.0, -30.0),
            line(-8.0, 6.0, 12.0, 20.0),
            line(12.0, 20.0, 12.0, 30.0),
        ],
        pins: vec![
            pin("1", "B", "1", PinRole::Input, -30.0, 0.0),
            pin("2", "C", "2", PinRole::Passive, 12.0, -30.0),
            pin("3", "E", "3", PinRole::Passive, 12.0, 30.0),
        ],
    }
}

fn opamp() -> SymbolTemplate {
    SymbolTemplate {
        id: "opamp".to_string(),
        name: "Op-Amp".to_string(),
        description: "Operational amplifier".to_string(),
        width: 80.0,
        height: 60.0,
        default_value: Some("LM358".to_string()),
        graphics: vec![
            GraphicElement::Polygon {
                points: vec![
                    Point::new(-25.0, -28.0),
                    Point::new(-25.0, 28.0),
                    Point::new(30.0, 0.0),
                ],
                filled: false,
            },
            line(-40.0, -14.0, -25.0, -14.0),
            line(-40.0, 14.0, -25.0, 14.0),
            line(30.0, 0.0, 40.0, 0.0),
            GraphicElement::Text {
                x: -18.0,
                y: -14.0,
                text: "+".to_string(),
                font_size: 12.0,
            },
            GraphicElement::Text {
                x: -18.0,
                y: 14.0,
                text: "-".to_string(),
                font_size: 12.0,
            },
        ],
        pins: vec![
            pin("1", "IN+", "3", PinRole::Input, -40.0, -14.0),
            pin("2", "IN-", "2", PinRole::Input, -40.0, 14.0),
            pin("3", "OUT", "1", PinRole::Output, 40.0, 0.0),
        ],
    }
}

fn ground() -> SymbolTemplate {
    SymbolTemplate {
        id: "ground".to_string(),
        name: "Ground".to_string(),
        description: "Ground reference".to_string(),
        width: 30.0,
        height: 24.0,
        default_value: Some("GND".to_string()),
        graphics: vec![
            line(0.0, -12.0, 0.0, 0.0),
            line(-12.0, 0.0, 12.0, 0.0),
            line(-8.0, 5.0, 8.0, 5.0),
            line(-4.0, 10.0, 4.0, 10.0),
        ],
        pins: vec![pin("1", "GND", "1", PinRole::Ground, 0.0, -12.0)],
    }
}

fn vcc() -> SymbolTemplate {
    SymbolTemplate {
        id: "vcc".to_string(),
        name: "VCC".to_string(),
        description: "Positive supply rail".to_string(),
        width: 30.0,
        height: 24.0,
        default_value: Some("VCC".to_string()),
        graphics: vec![
            line(0.0, 12.0, 0.0, 0.0),
            GraphicElement::Circle {
                cx: 0.0,
                cy: -4.0,
                r: 4.0,
                filled: false,
            },
        ],
        pins: vec![pin("1", "VCC", "1", PinRole::Power, 0.0, 12.0)],
    }
}

fn connector_2pin() -> SymbolTemplate {
    SymbolTemplate {
        id: "connector-2pin".to_string(),
        name: "Connector".to_string(),
        description: "2-pin header".to_string(),
        width: 40.0,
        height: 40.0,
        default_value: Some("CONN_2".to_string()),
        graphics: vec![
            GraphicElement::Rect {
                x: -10.0,
                y: -20.0,
                width: 20.0,
                height: 40.0,
                filled: false,
            },
            line(-20.0, -10.0, -10.0, -10.0),
            line(-20.0, 10.0, -10.0, 10.0),
            GraphicElement::Circle {
                cx: -4.0,
                cy: -10.0,
                r: 2.0,
                filled: true,
            },
            GraphicElement::Circle {
                cx: -4.0,
                cy: 10.0,
                r: 2.0,
                filled: true,
            },
        ],
        pins: vec![
            pin("1", "1", "1", PinRole::Bidirectional, -20.0, -10.0),
            pin("2", "2", "2", PinRole::Bidirectional, -20.0, 10.0),
        ],
    }
}

static STANDARD_LIBRARY: Lazy<Vec<SymbolTemplate>> = Lazy::new(|| {
    vec![
        resistor(),
        capacitor(),
        inductor(),
        diode(),
        led(),
        transistor_npn(),
        opamp(),
        ground(),
        vcc(),
        connector_2pin(),
    ]
});

/// All symbols of the built-in standard library.
pub fn standard_library() -> &'static [SymbolTemplate] {
    &STANDARD_LIBRARY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_library_lookup() {
        let lib = StandardLibrary;
        let r = lib.get_symbol("resistor", STANDARD_LIBRARY_ID).unwrap();
        assert_eq!(r.name, "Resistor");
        assert_eq!(r.pins.len(), 2);
    }

    #[test]
    fn test_unknown_symbol_is_an_error() {
        let lib = StandardLibrary;
        let err = lib.get_symbol("flux-capacitor", STANDARD_LIBRARY_ID);
        assert!(matches!(err, Err(EditorError::SymbolNotFound { .. })));
    }

    #[test]
    fn test_unknown_library_is_an_error() {
        let lib = StandardLibrary;
        let err = lib.get_symbol("resistor", "exotic");
        assert!(matches!(err, Err(EditorError::UnknownLibrary(_))));
    }

    #[test]
    fn test_reference_prefixes() {
        assert_eq!(reference_prefix("Resistor"), "R");
        assert_eq!(reference_prefix("Capacitor"), "C");
        assert_eq!(reference_prefix("LED"), "D");
        assert_eq!(reference_prefix("MOSFET"), "Q");
        assert_eq!(reference_prefix("Op-Amp"), "U");
        assert_eq!(reference_prefix("Gizmo"), "U");
    }

    #[test]
    fn test_matches_query() {
        let r = resistor();
        assert!(r.matches_query(""));
        assert!(r.matches_query("RESIST"));
        assert!(r.matches_query("fixed"));
        assert!(!r.matches_query("opamp"));
    }

    #[test]
    fn test_every_symbol_has_pins_and_bounds() {
        for s in standard_library() {
            assert!(!s.pins.is_empty(), "{} has no pins", s.id);
            assert!(s.width > 0.0 && s.height > 0.0, "{} has no bounds", s.id);
        }
    }
}
