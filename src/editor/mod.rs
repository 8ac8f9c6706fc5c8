//! The interactive editing layer.
//!
//! This module turns pointer and keyboard input into schematic mutations:
//!
//! - **Session**: the [`session::EditorSession`] owns the schematic and every
//!   interaction subsystem, and exposes the host-facing entry points
//! - **Selection**: single/multi selection with flag synchronization
//! - **Smart wiring**: pin/wire/grid snapping, orthogonal routing,
//!   connection bookkeeping, and a coarse auto-route heuristic
//! - **Operations**: the model mutation API, each call yielding an undoable
//!   history entry
//! - **History**: a linear undo/redo log with cursor, batching, and a size cap

pub mod history;
pub mod operations;
pub mod selection;
pub mod session;
pub mod wiring;

pub use history::{History, HistoryEntry, HistoryKind, HistoryPayload};
pub use operations::{
    ElementAt, add_component, add_component_from_template, add_wire, adopt_component_id,
    adopt_wire_id, apply_redo, apply_undo, delete_elements, delete_wire, edit_wire_point,
    find_element_at, move_component, new_id, rotate_component, update_properties,
    update_wire_net,
};
pub use selection::Selection;
pub use session::{EditorSession, Key, Modifiers, PointerButton, Tool};
pub use wiring::{
    Guideline, Highlight, PinHit, SnapTarget, WireTool, auto_route, find_nearest_pin,
    find_nearest_wire_point, orthogonal_path, snap_target,
};
