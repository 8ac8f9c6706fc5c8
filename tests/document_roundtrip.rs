use std::collections::BTreeSet;

use anyhow::Result;
use rustyschem::editor::{EditorSession, Tool};
use rustyschem::library::STANDARD_LIBRARY_ID;
use rustyschem::model::{Schematic, SchematicDoc};
use tempfile::NamedTempFile;

/// Build a small schematic through the editing session: two library
/// components and one wire drawn pin to pin.
fn build_schematic() -> Result<Schematic> {
    let mut session = EditorSession::new();
    session.start();

    session.add_component_from_library("resistor", STANDARD_LIBRARY_ID, 100.0, 100.0)?;
    session.add_component_from_library("capacitor", STANDARD_LIBRARY_ID, 300.0, 100.0)?;
    session.add_component("IC", 200.0, 300.0);

    // Resistor pin 2 sits at (130, 100), capacitor pin 1 at (270, 100).
    session.set_tool(Tool::Wire);
    session.on_click(130.0, 100.0, Default::default());
    session.on_click(270.0, 100.0, Default::default());
    assert_eq!(session.schematic.wires.len(), 1);

    Ok(session.schematic.clone())
}

fn id_sets(s: &Schematic) -> (BTreeSet<String>, BTreeSet<String>) {
    (
        s.components.iter().map(|c| c.id.clone()).collect(),
        s.wires.iter().map(|w| w.id.clone()).collect(),
    )
}

#[test]
fn test_binary_roundtrip_preserves_id_sets() -> Result<()> {
    let schematic = build_schematic()?;
    let doc = SchematicDoc {
        name: "roundtrip".to_string(),
        schematic,
    };

    let temp_file = NamedTempFile::new()?;
    doc.save_to_binary(temp_file.path())?;
    let loaded = SchematicDoc::load_from_binary(temp_file.path())?;

    assert_eq!(loaded.name, "roundtrip");
    assert_eq!(id_sets(&loaded.schematic), id_sets(&doc.schematic));
    assert_eq!(loaded.schematic.components.len(), 3);
    assert_eq!(loaded.schematic.wires.len(), 1);

    // Connection bookkeeping survives the trip.
    let wire = &loaded.schematic.wires[0];
    assert_eq!(wire.connections.len(), 2);
    for conn in &wire.connections {
        assert!(
            loaded
                .schematic
                .pin_connected(&conn.component_id, &conn.pin_id)
        );
    }
    Ok(())
}

#[test]
fn test_json_roundtrip_preserves_id_sets() -> Result<()> {
    let schematic = build_schematic()?;
    let doc = SchematicDoc {
        name: "json".to_string(),
        schematic,
    };

    let json = serde_json::to_string(&doc)?;
    let loaded: SchematicDoc = serde_json::from_str(&json)?;

    assert_eq!(id_sets(&loaded.schematic), id_sets(&doc.schematic));
    let reference: Vec<_> = loaded
        .schematic
        .components
        .iter()
        .map(|c| c.reference.as_str())
        .collect();
    assert!(reference.contains(&"R1"));
    assert!(reference.contains(&"C1"));
    Ok(())
}

#[test]
fn test_load_rejects_wrong_magic() -> Result<()> {
    let temp_file = NamedTempFile::new()?;
    std::fs::write(temp_file.path(), b"NOTASCHEMATIC")?;
    assert!(SchematicDoc::load_from_binary(temp_file.path()).is_err());
    Ok(())
}
