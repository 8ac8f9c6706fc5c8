//! Editing operations on the schematic.
//!
//! This module provides all low-level model-mutation operations used by the
//! editing session. Each operation works directly on [`Schematic`] /
//! [`Component`] / [`Wire`] structures and returns a [`HistoryEntry`]
//! describing the mutation, which the caller records (or drops, during
//! replays).
//!
//! # Design
//!
//! Operations mutate the model in place. Operations addressing a missing id
//! are no-ops returning `None`, so racing UI events (a delete fired twice, a
//! move for an element that was just removed) degrade gracefully instead of
//! surfacing errors into the event handler. [`apply_undo`] / [`apply_redo`]
//! replay a recorded entry's inverse/forward effect.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::editor::history::{HistoryEntry, HistoryKind, HistoryPayload};
use crate::geometry::{distance_to_segment, snap_point};
use crate::library::SymbolTemplate;
use crate::model::{Component, Pin, Point, Schematic, Wire};
use crate::style::{
    DEFAULT_COMPONENT_HEIGHT, DEFAULT_COMPONENT_WIDTH, GRID_SIZE, ROTATION_STEP,
    WIRE_HIT_THRESHOLD,
};

/// Fresh entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A hit-test result: a reference to the element under a point.
#[derive(Debug, Clone, Copy)]
pub enum ElementAt<'a> {
    Component(&'a Component),
    Wire(&'a Wire),
}

impl<'a> ElementAt<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            ElementAt::Component(c) => &c.id,
            ElementAt::Wire(w) => &w.id,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Component operations
// ────────────────────────────────────────────────────────────────────────────

/// Place an ad-hoc component of the given kind, snapped to the grid, with the
/// default 80×60 body and six-pin layout.
pub fn add_component(schematic: &mut Schematic, kind: &str, x: f64, y: f64) -> (String, HistoryEntry) {
    let pos = snap_point(Point::new(x, y), GRID_SIZE);
    let component = Component {
        id: new_id(),
        x: pos.x,
        y: pos.y,
        width: DEFAULT_COMPONENT_WIDTH,
        height: DEFAULT_COMPONENT_HEIGHT,
        rotation: 0.0,
        reference: format!("U{}", schematic.components.len() + 1),
        value: kind.to_string(),
        selected: false,
        pins: vec![
            Pin::new("1", -40.0, -20.0),
            Pin::new("2", -40.0, 0.0),
            Pin::new("3", -40.0, 20.0),
            Pin::new("4", 40.0, -20.0),
            Pin::new("5", 40.0, 0.0),
            Pin::new("6", 40.0, 20.0),
        ],
        symbol_id: None,
        library_id: None,
        symbol: None,
        properties: IndexMap::new(),
    };
    push_component(schematic, component)
}

/// Place a component from a resolved library template. The reference label is
/// the symbol's prefix followed by one plus the highest existing suffix for
/// that prefix.
pub fn add_component_from_template(
    schematic: &mut Schematic,
    template: SymbolTemplate,
    symbol_id: &str,
    library_id: &str,
    x: f64,
    y: f64,
) -> (String, HistoryEntry) {
    let pos = snap_point(Point::new(x, y), GRID_SIZE);
    let prefix = template.reference_prefix();
    let reference = format!("{prefix}{}", next_reference_number(schematic, prefix));
    let pins = template
        .pins
        .iter()
        .map(|p| Pin {
            id: p.id.clone(),
            name: p.name.clone(),
            number: p.number.clone(),
            x: p.x,
            y: p.y,
            role: p.role,
        })
        .collect();
    let component = Component {
        id: new_id(),
        x: pos.x,
        y: pos.y,
        width: template.width,
        height: template.height,
        rotation: 0.0,
        reference,
        value: template
            .default_value
            .clone()
            .unwrap_or_else(|| template.name.clone()),
        selected: false,
        pins,
        symbol_id: Some(symbol_id.to_string()),
        library_id: Some(library_id.to_string()),
        symbol: Some(template),
        properties: IndexMap::new(),
    };
    push_component(schematic, component)
}

fn push_component(schematic: &mut Schematic, component: Component) -> (String, HistoryEntry) {
    let id = component.id.clone();
    let index = schematic.components.len();
    let entry = HistoryEntry::new(
        HistoryKind::Create,
        format!("Add component {}", component.reference),
        HistoryPayload::AddComponent {
            index,
            component: Box::new(component.clone()),
        },
    );
    schematic.components.push(component);
    (id, entry)
}

/// One plus the highest numeric suffix among references with this prefix.
fn next_reference_number(schematic: &Schematic, prefix: &str) -> u32 {
    schematic
        .components
        .iter()
        .filter_map(|c| c.reference.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .map_or(1, |n| n + 1)
}

/// Move a component to a new position. `None` if the id does not resolve.
pub fn move_component(
    schematic: &mut Schematic,
    id: &str,
    x: f64,
    y: f64,
) -> Option<HistoryEntry> {
    let component = schematic.component_mut(id)?;
    let from = Point::new(component.x, component.y);
    component.x = x;
    component.y = y;
    Some(HistoryEntry::new(
        HistoryKind::Update,
        format!("Move {}", component.reference),
        HistoryPayload::MoveComponent {
            id: id.to_string(),
            from,
            to: Point::new(x, y),
        },
    ))
}

/// Rotate a component by one rotation step, normalized to [0, 360).
pub fn rotate_component(schematic: &mut Schematic, id: &str) -> Option<HistoryEntry> {
    let component = schematic.component_mut(id)?;
    let from = component.rotation;
    component.rotation = (component.rotation + ROTATION_STEP).rem_euclid(360.0);
    Some(HistoryEntry::new(
        HistoryKind::Update,
        format!("Rotate {}", component.reference),
        HistoryPayload::RotateComponent {
            id: id.to_string(),
            from,
            to: component.rotation,
        },
    ))
}

/// Apply an in-place edit to a component (reference, value, properties) and
/// record the before/after pair.
pub fn update_properties(
    schematic: &mut Schematic,
    id: &str,
    edit: impl FnOnce(&mut Component),
) -> Option<HistoryEntry> {
    let component = schematic.component_mut(id)?;
    let before = Box::new(component.clone());
    edit(component);
    let after = Box::new(component.clone());
    Some(HistoryEntry::new(
        HistoryKind::Update,
        format!("Edit {}", after.reference),
        HistoryPayload::UpdateComponent {
            id: id.to_string(),
            before,
            after,
        },
    ))
}

/// Remove every component and wire whose id is in `ids`. `None` when nothing
/// was removed (already-empty selection, stale ids).
pub fn delete_elements(schematic: &mut Schematic, ids: &[String]) -> Option<HistoryEntry> {
    let mut removed_components = Vec::new();
    let mut removed_wires = Vec::new();

    let mut i = 0;
    while i < schematic.components.len() {
        if ids.iter().any(|id| *id == schematic.components[i].id) {
            removed_components.push((i, schematic.components.remove(i)));
        } else {
            i += 1;
        }
    }
    let mut i = 0;
    while i < schematic.wires.len() {
        if ids.iter().any(|id| *id == schematic.wires[i].id) {
            removed_wires.push((i, schematic.wires.remove(i)));
        } else {
            i += 1;
        }
    }

    if removed_components.is_empty() && removed_wires.is_empty() {
        return None;
    }
    let count = removed_components.len() + removed_wires.len();
    Some(HistoryEntry::new(
        HistoryKind::Delete,
        format!("Delete {count} element(s)"),
        HistoryPayload::DeleteElements {
            components: removed_components,
            wires: removed_wires,
        },
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Wire operations
// ────────────────────────────────────────────────────────────────────────────

/// Append a finalized wire. Candidates with fewer than two points are
/// silently discarded (`None`), not an error.
pub fn add_wire(schematic: &mut Schematic, wire: Wire) -> Option<(String, HistoryEntry)> {
    if wire.points.len() < 2 {
        return None;
    }
    let id = wire.id.clone();
    let index = schematic.wires.len();
    let entry = HistoryEntry::new(
        HistoryKind::Create,
        "Draw wire",
        HistoryPayload::AddWire {
            index,
            wire: Box::new(wire.clone()),
        },
    );
    schematic.wires.push(wire);
    Some((id, entry))
}

pub fn delete_wire(schematic: &mut Schematic, id: &str) -> Option<HistoryEntry> {
    let index = schematic.wires.iter().position(|w| w.id == id)?;
    let wire = schematic.wires.remove(index);
    Some(HistoryEntry::new(
        HistoryKind::Delete,
        "Delete wire",
        HistoryPayload::DeleteElements {
            components: Vec::new(),
            wires: vec![(index, wire)],
        },
    ))
}

/// Move one vertex of a wire, snapped to the grid.
pub fn edit_wire_point(
    schematic: &mut Schematic,
    id: &str,
    index: usize,
    position: Point,
) -> Option<HistoryEntry> {
    let wire = schematic.wire_mut(id)?;
    let from = *wire.points.get(index)?;
    let to = snap_point(position, GRID_SIZE);
    wire.points[index] = to;
    Some(HistoryEntry::new(
        HistoryKind::Update,
        "Move wire point",
        HistoryPayload::EditWirePoint {
            id: id.to_string(),
            index,
            from,
            to,
        },
    ))
}

pub fn update_wire_net(
    schematic: &mut Schematic,
    id: &str,
    net_name: Option<String>,
) -> Option<HistoryEntry> {
    let wire = schematic.wire_mut(id)?;
    let before = wire.net_name.clone();
    wire.net_name = net_name.clone();
    Some(HistoryEntry::new(
        HistoryKind::Update,
        "Rename net",
        HistoryPayload::UpdateWireNet {
            id: id.to_string(),
            before,
            after: net_name,
        },
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Id adoption (persistence mirroring)
// ────────────────────────────────────────────────────────────────────────────

/// Rebind an optimistically-assigned component id to the authoritative one
/// handed back by the persistence service, rewriting wire connections that
/// reference it. Not a user action; nothing is recorded.
pub fn adopt_component_id(schematic: &mut Schematic, local_id: &str, authoritative_id: &str) -> bool {
    let Some(component) = schematic.component_mut(local_id) else {
        return false;
    };
    component.id = authoritative_id.to_string();
    for wire in &mut schematic.wires {
        for conn in &mut wire.connections {
            if conn.component_id == local_id {
                conn.component_id = authoritative_id.to_string();
            }
        }
    }
    true
}

/// Rebind an optimistically-assigned wire id to the authoritative one.
pub fn adopt_wire_id(schematic: &mut Schematic, local_id: &str, authoritative_id: &str) -> bool {
    let Some(wire) = schematic.wire_mut(local_id) else {
        return false;
    };
    wire.id = authoritative_id.to_string();
    true
}

// ────────────────────────────────────────────────────────────────────────────
// Hit testing
// ────────────────────────────────────────────────────────────────────────────

/// The element under a diagram point: components first (axis-aligned bounds,
/// rotation ignored), then wires by perpendicular segment distance.
pub fn find_element_at(schematic: &Schematic, x: f64, y: f64) -> Option<ElementAt<'_>> {
    for component in &schematic.components {
        if component.contains(x, y) {
            return Some(ElementAt::Component(component));
        }
    }
    let p = Point::new(x, y);
    for wire in &schematic.wires {
        for segment in wire.points.windows(2) {
            if distance_to_segment(p, segment[0], segment[1]) < WIRE_HIT_THRESHOLD {
                return Some(ElementAt::Wire(wire));
            }
        }
    }
    None
}

// ────────────────────────────────────────────────────────────────────────────
// Undo / redo application
// ────────────────────────────────────────────────────────────────────────────

/// Apply the inverse effect of a recorded entry to the schematic.
pub fn apply_undo(schematic: &mut Schematic, entry: &HistoryEntry) {
    match &entry.payload {
        HistoryPayload::AddComponent { component, .. } => {
            schematic.components.retain(|c| c.id != component.id);
        }
        HistoryPayload::AddWire { wire, .. } => {
            schematic.wires.retain(|w| w.id != wire.id);
        }
        HistoryPayload::MoveComponent { id, from, .. } => {
            if let Some(c) = schematic.component_mut(id) {
                c.x = from.x;
                c.y = from.y;
            }
        }
        HistoryPayload::RotateComponent { id, from, .. } => {
            if let Some(c) = schematic.component_mut(id) {
                c.rotation = *from;
            }
        }
        HistoryPayload::UpdateComponent { id, before, .. } => {
            if let Some(c) = schematic.component_mut(id) {
                *c = (**before).clone();
            }
        }
        HistoryPayload::EditWirePoint { id, index, from, .. } => {
            if let Some(w) = schematic.wire_mut(id) {
                if let Some(p) = w.points.get_mut(*index) {
                    *p = *from;
                }
            }
        }
        HistoryPayload::UpdateWireNet { id, before, .. } => {
            if let Some(w) = schematic.wire_mut(id) {
                w.net_name = before.clone();
            }
        }
        HistoryPayload::DeleteElements { components, wires } => {
            restore_indexed(&mut schematic.components, components);
            restore_indexed(&mut schematic.wires, wires);
        }
        HistoryPayload::Snapshot { before, .. } => {
            *schematic = (**before).clone();
        }
    }
}

/// Re-apply the forward effect of a recorded entry to the schematic.
pub fn apply_redo(schematic: &mut Schematic, entry: &HistoryEntry) {
    match &entry.payload {
        HistoryPayload::AddComponent { index, component } => {
            let at = (*index).min(schematic.components.len());
            schematic.components.insert(at, (**component).clone());
        }
        HistoryPayload::AddWire { index, wire } => {
            let at = (*index).min(schematic.wires.len());
            schematic.wires.insert(at, (**wire).clone());
        }
        HistoryPayload::MoveComponent { id, to, .. } => {
            if let Some(c) = schematic.component_mut(id) {
                c.x = to.x;
                c.y = to.y;
            }
        }
        HistoryPayload::RotateComponent { id, to, .. } => {
            if let Some(c) = schematic.component_mut(id) {
                c.rotation = *to;
            }
        }
        HistoryPayload::UpdateComponent { id, after, .. } => {
            if let Some(c) = schematic.component_mut(id) {
                *c = (**after).clone();
            }
        }
        HistoryPayload::EditWirePoint { id, index, to, .. } => {
            if let Some(w) = schematic.wire_mut(id) {
                if let Some(p) = w.points.get_mut(*index) {
                    *p = *to;
                }
            }
        }
        HistoryPayload::UpdateWireNet { id, after, .. } => {
            if let Some(w) = schematic.wire_mut(id) {
                w.net_name = after.clone();
            }
        }
        HistoryPayload::DeleteElements { components, wires } => {
            for (_, c) in components {
                schematic.components.retain(|x| x.id != c.id);
            }
            for (_, w) in wires {
                schematic.wires.retain(|x| x.id != w.id);
            }
        }
        HistoryPayload::Snapshot { after, .. } => {
            *schematic = (**after).clone();
        }
    }
}

/// Re-insert removed elements at their original indices, ascending so that
/// later indices stay valid.
fn restore_indexed<T: Clone>(target: &mut Vec<T>, removed: &[(usize, T)]) {
    let mut sorted: Vec<_> = removed.to_vec();
    sorted.sort_by_key(|(i, _)| *i);
    for (index, element) in sorted {
        if index <= target.len() {
            target.insert(index, element);
        } else {
            target.push(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{STANDARD_LIBRARY_ID, StandardLibrary, SymbolSource};

    #[test]
    fn test_add_component_snaps_to_grid() {
        let mut sch = Schematic::new();
        let (id, _) = add_component(&mut sch, "IC", 103.0, 107.0);
        let c = sch.component(&id).unwrap();
        assert_eq!((c.x, c.y), (100.0, 110.0));
        assert_eq!(c.pins.len(), 6);
        assert_eq!(c.reference, "U1");
    }

    #[test]
    fn test_library_references_are_monotonic_per_prefix() {
        let mut sch = Schematic::new();
        let lib = StandardLibrary;
        let r = lib.get_symbol("resistor", STANDARD_LIBRARY_ID).unwrap();
        let c = lib.get_symbol("capacitor", STANDARD_LIBRARY_ID).unwrap();

        let (r1, _) =
            add_component_from_template(&mut sch, r.clone(), "resistor", STANDARD_LIBRARY_ID, 0.0, 0.0);
        let (r2, _) =
            add_component_from_template(&mut sch, r, "resistor", STANDARD_LIBRARY_ID, 50.0, 0.0);
        let (c1, _) =
            add_component_from_template(&mut sch, c, "capacitor", STANDARD_LIBRARY_ID, 100.0, 0.0);

        assert_eq!(sch.component(&r1).unwrap().reference, "R1");
        assert_eq!(sch.component(&r2).unwrap().reference, "R2");
        assert_eq!(sch.component(&c1).unwrap().reference, "C1");
    }

    #[test]
    fn test_missing_id_operations_are_noops() {
        let mut sch = Schematic::new();
        assert!(move_component(&mut sch, "ghost", 1.0, 2.0).is_none());
        assert!(rotate_component(&mut sch, "ghost").is_none());
        assert!(update_properties(&mut sch, "ghost", |_| {}).is_none());
        assert!(delete_wire(&mut sch, "ghost").is_none());
        assert!(delete_elements(&mut sch, &["ghost".to_string()]).is_none());
    }

    #[test]
    fn test_rotate_wraps_at_360() {
        let mut sch = Schematic::new();
        let (id, _) = add_component(&mut sch, "IC", 0.0, 0.0);
        for _ in 0..4 {
            let _ = rotate_component(&mut sch, &id);
        }
        assert_eq!(sch.component(&id).unwrap().rotation, 0.0);
    }

    #[test]
    fn test_short_wire_is_discarded() {
        let mut sch = Schematic::new();
        let mut w = Wire::new(new_id());
        w.points.push(Point::new(0.0, 0.0));
        assert!(add_wire(&mut sch, w).is_none());
        assert!(sch.wires.is_empty());

        let mut w = Wire::new(new_id());
        w.points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        assert!(add_wire(&mut sch, w).is_some());
        assert_eq!(sch.wires.len(), 1);
    }

    #[test]
    fn test_find_element_prefers_components_over_wires() {
        let mut sch = Schematic::new();
        let (cid, _) = add_component(&mut sch, "IC", 100.0, 100.0);
        let mut w = Wire::new(new_id());
        w.points = vec![Point::new(60.0, 100.0), Point::new(140.0, 100.0)];
        let (wid, _) = add_wire(&mut sch, w).unwrap();

        // Both overlap at (100, 100); the component wins.
        assert_eq!(find_element_at(&sch, 100.0, 100.0).unwrap().id(), cid);
        // Within 5 units of the wire's end, outside the body.
        assert_eq!(find_element_at(&sch, 143.0, 101.0).unwrap().id(), wid);
        // Too far from everything.
        assert!(find_element_at(&sch, 400.0, 400.0).is_none());
    }

    #[test]
    fn test_delete_and_undo_restores_order() {
        let mut sch = Schematic::new();
        let (a, _) = add_component(&mut sch, "IC", 0.0, 0.0);
        let (b, _) = add_component(&mut sch, "IC", 200.0, 0.0);
        let (c, _) = add_component(&mut sch, "IC", 400.0, 0.0);

        let entry = delete_elements(&mut sch, &[b.clone()]).unwrap();
        assert_eq!(sch.components.len(), 2);

        apply_undo(&mut sch, &entry);
        let ids: Vec<_> = sch.components.iter().map(|x| x.id.clone()).collect();
        assert_eq!(ids, vec![a, b.clone(), c]);

        apply_redo(&mut sch, &entry);
        assert!(sch.component(&b).is_none());
        assert_eq!(sch.components.len(), 2);
    }

    #[test]
    fn test_update_properties_roundtrip() {
        let mut sch = Schematic::new();
        let (id, _) = add_component(&mut sch, "IC", 0.0, 0.0);
        let entry = update_properties(&mut sch, &id, |c| {
            c.value = "74HC00".to_string();
            c.properties.insert("footprint".to_string(), "DIP-14".to_string());
        })
        .unwrap();
        assert_eq!(sch.component(&id).unwrap().value, "74HC00");

        apply_undo(&mut sch, &entry);
        assert_eq!(sch.component(&id).unwrap().value, "IC");
        assert!(sch.component(&id).unwrap().properties.is_empty());

        apply_redo(&mut sch, &entry);
        assert_eq!(sch.component(&id).unwrap().value, "74HC00");
    }

    #[test]
    fn test_edit_wire_point_snaps() {
        let mut sch = Schematic::new();
        let mut w = Wire::new(new_id());
        w.points = vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)];
        let (wid, _) = add_wire(&mut sch, w).unwrap();

        let entry = edit_wire_point(&mut sch, &wid, 1, Point::new(63.0, 17.0)).unwrap();
        assert_eq!(sch.wire(&wid).unwrap().points[1], Point::new(60.0, 20.0));
        assert!(edit_wire_point(&mut sch, &wid, 9, Point::new(0.0, 0.0)).is_none());

        apply_undo(&mut sch, &entry);
        assert_eq!(sch.wire(&wid).unwrap().points[1], Point::new(50.0, 0.0));
    }

    #[test]
    fn test_adopt_component_id_rewrites_connections() {
        let mut sch = Schematic::new();
        let (local, _) = add_component(&mut sch, "IC", 100.0, 100.0);
        let mut w = Wire::new(new_id());
        w.points = vec![Point::new(60.0, 80.0), Point::new(0.0, 80.0)];
        w.connections.push(crate::model::Connection {
            component_id: local.clone(),
            pin_id: "1".to_string(),
            point: Point::new(60.0, 80.0),
        });
        let _ = add_wire(&mut sch, w);

        assert!(adopt_component_id(&mut sch, &local, "srv-42"));
        assert!(sch.component(&local).is_none());
        assert!(sch.component("srv-42").is_some());
        assert!(sch.pin_connected("srv-42", "1"));
        // Unknown ids are a no-op.
        assert!(!adopt_component_id(&mut sch, &local, "srv-43"));
    }

    #[test]
    fn test_update_wire_net_roundtrip() {
        let mut sch = Schematic::new();
        let mut w = Wire::new(new_id());
        w.points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let (wid, _) = add_wire(&mut sch, w).unwrap();

        let entry = update_wire_net(&mut sch, &wid, Some("VBUS".to_string())).unwrap();
        assert_eq!(sch.wire(&wid).unwrap().net_name.as_deref(), Some("VBUS"));
        apply_undo(&mut sch, &entry);
        assert_eq!(sch.wire(&wid).unwrap().net_name, None);
    }
}
