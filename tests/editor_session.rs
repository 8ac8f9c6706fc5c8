//! End-to-end editing flows through the session entry points.

use rustyschem::editor::{EditorSession, Key, Modifiers, Tool};
use rustyschem::library::STANDARD_LIBRARY_ID;
use rustyschem::model::Point;
use rustyschem::render::RecordingSurface;

fn started() -> EditorSession {
    let mut session = EditorSession::new();
    session.start();
    session
}

fn shift() -> Modifiers {
    Modifiers {
        shift: true,
        ctrl: false,
    }
}

#[test]
fn test_select_then_multi_select_then_delete() {
    let mut session = started();
    let a = session.add_component("IC", 100.0, 100.0);
    let b = session.add_component("IC", 300.0, 100.0);
    let c = session.add_component("IC", 500.0, 100.0);

    session.on_click(100.0, 100.0, Modifiers::default());
    session.on_click(300.0, 100.0, shift());
    assert!(session.selection.is_selected(&a));
    assert!(session.selection.is_selected(&b));
    assert!(!session.selection.is_selected(&c));

    session.on_key(Key::Delete);
    assert!(session.schematic.component(&a).is_none());
    assert!(session.schematic.component(&b).is_none());
    assert!(session.schematic.component(&c).is_some());

    // One delete entry covering both elements; a single undo restores them.
    assert!(session.undo());
    assert_eq!(session.schematic.components.len(), 3);
}

#[test]
fn test_single_select_replaces_previous() {
    let mut session = started();
    let a = session.add_component("IC", 100.0, 100.0);
    let b = session.add_component("IC", 300.0, 100.0);

    session.on_click(100.0, 100.0, Modifiers::default());
    session.on_click(300.0, 100.0, Modifiers::default());
    assert!(!session.selection.is_selected(&a));
    assert!(session.selection.is_selected(&b));
    assert_eq!(session.selection.len(), 1);
    assert_eq!(
        session
            .selection
            .selected_component(&session.schematic)
            .map(|c| c.id.clone()),
        Some(b)
    );
}

#[test]
fn test_wire_selection_via_click() {
    let mut session = started();
    session.set_tool(Tool::Wire);
    session.on_click(0.0, 0.0, Modifiers::default());
    session.on_click(100.0, 0.0, Modifiers::default());
    session.on_double_click();
    let wire_id = session.schematic.wires[0].id.clone();

    session.set_tool(Tool::Select);
    // 3 units off the segment still hits.
    session.on_click(50.0, 3.0, Modifiers::default());
    assert!(session.selection.is_selected(&wire_id));
    assert!(
        session
            .selection
            .selected_wire(&session.schematic)
            .is_some()
    );
    assert!(session.schematic.wires[0].selected);

    session.on_key(Key::Backspace);
    assert!(session.schematic.wires.is_empty());
}

#[test]
fn test_pin_to_pin_wire_marks_pins_connected() {
    let mut session = started();
    let r = session
        .add_component_from_library("resistor", STANDARD_LIBRARY_ID, 100.0, 100.0)
        .unwrap();
    let c = session
        .add_component_from_library("capacitor", STANDARD_LIBRARY_ID, 300.0, 100.0)
        .unwrap();

    session.set_tool(Tool::Wire);
    // Click near (not on) the pins; snapping does the rest.
    session.on_click(133.0, 104.0, Modifiers::default());
    session.on_click(268.0, 97.0, Modifiers::default());

    assert_eq!(session.schematic.wires.len(), 1);
    let wire = &session.schematic.wires[0];
    assert_eq!(wire.points.first(), Some(&Point::new(130.0, 100.0)));
    assert_eq!(wire.points.last(), Some(&Point::new(270.0, 100.0)));
    assert!(session.schematic.pin_connected(&r, "2"));
    assert!(session.schematic.pin_connected(&c, "1"));
    assert!(!session.schematic.pin_connected(&r, "1"));
}

#[test]
fn test_zoomed_click_maps_to_diagram() {
    let mut session = started();
    let id = session.add_component("IC", 100.0, 100.0);
    session.on_wheel(-1.0); // scale 1.2
    // Screen (120, 120) / 1.2 == diagram (100, 100).
    session.on_click(120.0, 120.0, Modifiers::default());
    assert!(session.selection.is_selected(&id));
}

#[test]
fn test_history_truncation_through_session() {
    let mut session = started();
    let id = session.add_component("IC", 100.0, 100.0);
    session.move_component(&id, 200.0, 100.0); // A
    session.move_component(&id, 300.0, 100.0); // B
    session.undo(); // back to 200
    assert!(session.history.can_redo());

    session.move_component(&id, 400.0, 100.0); // C discards B
    assert!(!session.history.can_redo());
    assert_eq!(session.schematic.component(&id).unwrap().x, 400.0);

    session.undo();
    assert_eq!(session.schematic.component(&id).unwrap().x, 200.0);
}

#[test]
fn test_undo_after_delete_restores_wire_connections() {
    let mut session = started();
    let r = session
        .add_component_from_library("resistor", STANDARD_LIBRARY_ID, 100.0, 100.0)
        .unwrap();
    session.set_tool(Tool::Wire);
    session.on_click(130.0, 100.0, Modifiers::default());
    session.on_click(200.0, 100.0, Modifiers::default());
    session.on_double_click();
    let wire_id = session.schematic.wires[0].id.clone();

    session.set_tool(Tool::Select);
    session.on_click(160.0, 100.0, Modifiers::default());
    session.on_key(Key::Delete);
    assert!(session.schematic.wire(&wire_id).is_none());
    assert!(!session.schematic.pin_connected(&r, "2"));

    session.undo();
    assert!(session.schematic.wire(&wire_id).is_some());
    assert!(session.schematic.pin_connected(&r, "2"));
}

#[test]
fn test_component_tool_places_and_selects() {
    let mut session = started();
    session.set_tool(Tool::Component);
    session.on_click(103.0, 107.0, Modifiers::default());
    assert_eq!(session.schematic.components.len(), 1);
    let c = &session.schematic.components[0];
    assert_eq!((c.x, c.y), (100.0, 110.0));
    assert!(session.selection.is_selected(&c.id));
}

#[test]
fn test_render_full_then_partial() {
    let mut session = started();
    let id = session.add_component("IC", 100.0, 100.0);

    let mut surface = RecordingSurface::new();
    assert!(session.render(&mut surface, 800.0, 600.0));
    assert_eq!(surface.full_clears(), 1);

    // A move marks only that component dirty: the next frame is partial.
    session.move_component(&id, 120.0, 100.0);
    let mut surface = RecordingSurface::new();
    assert!(session.render(&mut surface, 800.0, 600.0));
    assert_eq!(surface.full_clears(), 0);
    assert_eq!(surface.rect_clears(), 1);

    // Zoom forces the next frame back to full.
    session.on_wheel(-1.0);
    let mut surface = RecordingSurface::new();
    assert!(session.render(&mut surface, 800.0, 600.0));
    assert_eq!(surface.full_clears(), 1);
}

#[test]
fn test_update_properties_drives_properties_panel() {
    let mut session = started();
    let id = session
        .add_component_from_library("resistor", STANDARD_LIBRARY_ID, 0.0, 0.0)
        .unwrap();
    session.update_properties(&id, |c| {
        c.value = "4k7".to_string();
        c.properties
            .insert("tolerance".to_string(), "1%".to_string());
    });
    let c = session.schematic.component(&id).unwrap();
    assert_eq!(c.value, "4k7");
    assert_eq!(c.properties.get("tolerance").map(String::as_str), Some("1%"));

    session.undo();
    assert_eq!(session.schematic.component(&id).unwrap().value, "10k");
}

#[test]
fn test_rotate_steps_through_quadrants() {
    let mut session = started();
    let id = session.add_component("IC", 0.0, 0.0);
    session.rotate_component(&id);
    assert_eq!(session.schematic.component(&id).unwrap().rotation, 90.0);
    session.rotate_component(&id);
    assert_eq!(session.schematic.component(&id).unwrap().rotation, 180.0);
    session.undo();
    assert_eq!(session.schematic.component(&id).unwrap().rotation, 90.0);
}

#[test]
fn test_stale_ids_are_noops() {
    let mut session = started();
    assert!(!session.move_component("ghost", 0.0, 0.0));
    assert!(!session.rotate_component("ghost"));
    assert!(!session.delete_wire("ghost"));
    assert!(!session.update_wire_net("ghost", None));
    assert!(session.history.is_empty());
}
