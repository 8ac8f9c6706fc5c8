//! The editing session: owns the schematic and every interaction subsystem,
//! and exposes the pointer/keyboard entry points the host forwards events to.
//!
//! All state is exclusively owned by the single editing task; nothing here
//! blocks or locks. Redraws are requested through the [`RenderQueue`] and an
//! optional host callback; requests within one frame coalesce. The host
//! registers listeners on [`EditorSession::start`] and must call
//! [`EditorSession::shutdown`] on teardown, which cancels any pending frame
//! request. Both calls are idempotent.

use crate::cache::SymbolCache;
use crate::editor::history::{History, HistoryEntry, HistoryKind, HistoryPayload};
use crate::editor::operations;
use crate::editor::selection::Selection;
use crate::editor::wiring::WireTool;
use crate::error::EditorError;
use crate::library::{StandardLibrary, SymbolSource};
use crate::model::{Component, Point, Schematic};
use crate::render::{DrawSurface, RenderQueue, render_frame};
use crate::viewport::Viewport;

/// The active interaction tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Wire,
    Component,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Modifier-key flags accompanying pointer events.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

/// Keyboard entry points the core handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
}

/// The complete state of one schematic editing session.
pub struct EditorSession {
    pub schematic: Schematic,
    pub viewport: Viewport,
    pub selection: Selection,
    pub history: History,
    pub wire_tool: WireTool,
    pub queue: RenderQueue,
    pub cache: SymbolCache,
    pub tool: Tool,
    library: Box<dyn SymbolSource>,
    redraw_hook: Option<Box<dyn FnMut()>>,
    running: bool,
    /// Last pointer position while panning, in screen coordinates.
    pan_anchor: Option<Point>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// A session backed by the built-in standard symbol library.
    pub fn new() -> Self {
        Self::with_library(Box::new(StandardLibrary))
    }

    /// A session backed by a host-provided symbol source.
    pub fn with_library(library: Box<dyn SymbolSource>) -> Self {
        EditorSession {
            schematic: Schematic::new(),
            viewport: Viewport::new(),
            selection: Selection::new(),
            history: History::default(),
            wire_tool: WireTool::new(),
            queue: RenderQueue::new(),
            cache: SymbolCache::new(),
            tool: Tool::Select,
            library,
            redraw_hook: None,
            running: false,
            pan_anchor: None,
        }
    }

    /// Called by the host whenever a frame should be scheduled; at most once
    /// per frame regardless of how many mutations arrive.
    pub fn set_redraw_hook(&mut self, hook: impl FnMut() + 'static) {
        self.redraw_hook = Some(Box::new(hook));
    }

    /// Begin the session: input entry points become live and the first
    /// (full) frame is requested. Idempotent.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        log::debug!("editor session started");
        self.request_structural();
    }

    /// End the session: input entry points go dead and any pending frame
    /// request is dropped so nothing draws onto a destroyed surface.
    /// Idempotent.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.wire_tool.cancel();
        self.queue.cancel();
        log::debug!("editor session shut down");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    // ────────────────────────────────────────────────────────────────────
    // Model operations
    // ────────────────────────────────────────────────────────────────────

    /// Place an ad-hoc component, snapped to the grid.
    pub fn add_component(&mut self, kind: &str, x: f64, y: f64) -> String {
        let (id, entry) = operations::add_component(&mut self.schematic, kind, x, y);
        self.history.push(entry);
        self.request_structural();
        id
    }

    /// Place a component from the symbol library. A failed lookup aborts the
    /// placement and leaves the schematic untouched.
    pub fn add_component_from_library(
        &mut self,
        symbol_id: &str,
        library_id: &str,
        x: f64,
        y: f64,
    ) -> Result<String, EditorError> {
        let template = match self.library.get_symbol(symbol_id, library_id) {
            Ok(t) => t,
            Err(err) => {
                log::warn!("library placement aborted: {err}");
                return Err(err);
            }
        };
        let (id, entry) = operations::add_component_from_template(
            &mut self.schematic,
            template,
            symbol_id,
            library_id,
            x,
            y,
        );
        self.history.push(entry);
        self.request_structural();
        Ok(id)
    }

    /// Move a component; a stale id is a no-op.
    pub fn move_component(&mut self, id: &str, x: f64, y: f64) -> bool {
        let Some(entry) = operations::move_component(&mut self.schematic, id, x, y) else {
            return false;
        };
        self.history.push(entry);
        self.mark_dirty(id);
        true
    }

    /// Rotate a component by one step; a stale id is a no-op.
    pub fn rotate_component(&mut self, id: &str) -> bool {
        let Some(entry) = operations::rotate_component(&mut self.schematic, id) else {
            return false;
        };
        self.history.push(entry);
        self.mark_dirty(id);
        true
    }

    /// Edit a component in place (reference, value, properties).
    pub fn update_properties(&mut self, id: &str, edit: impl FnOnce(&mut Component)) -> bool {
        let Some(entry) = operations::update_properties(&mut self.schematic, id, edit) else {
            return false;
        };
        self.history.push(entry);
        self.mark_dirty(id);
        true
    }

    /// Delete everything in the selection set. A no-op with empty selection.
    pub fn delete_selected(&mut self) {
        let ids: Vec<String> = self.selection.ids().map(String::from).collect();
        if let Some(entry) = operations::delete_elements(&mut self.schematic, &ids) {
            self.history.push(entry);
            self.request_structural();
        }
        self.selection.clear(&mut self.schematic);
    }

    pub fn delete_wire(&mut self, id: &str) -> bool {
        let Some(entry) = operations::delete_wire(&mut self.schematic, id) else {
            return false;
        };
        self.history.push(entry);
        self.request_structural();
        true
    }

    /// Move one wire vertex, snapped to the grid.
    pub fn edit_wire_point(&mut self, id: &str, index: usize, position: Point) -> bool {
        let Some(entry) = operations::edit_wire_point(&mut self.schematic, id, index, position)
        else {
            return false;
        };
        self.history.push(entry);
        self.mark_dirty(id);
        true
    }

    pub fn update_wire_net(&mut self, id: &str, net_name: Option<String>) -> bool {
        let Some(entry) = operations::update_wire_net(&mut self.schematic, id, net_name) else {
            return false;
        };
        self.history.push(entry);
        self.mark_dirty(id);
        true
    }

    // ────────────────────────────────────────────────────────────────────
    // Undo / redo / batching
    // ────────────────────────────────────────────────────────────────────

    /// Revert the entry at the history cursor. `false` when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo().cloned() else {
            return false;
        };
        operations::apply_undo(&mut self.schematic, &entry);
        self.after_replay();
        true
    }

    /// Re-apply the entry past the history cursor. `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo().cloned() else {
            return false;
        };
        operations::apply_redo(&mut self.schematic, &entry);
        self.after_replay();
        true
    }

    /// Run `f` as one undoable step: individual recording is suspended for
    /// the duration and a single `batch` entry holding a before/after
    /// snapshot is pushed at the end.
    pub fn batch(&mut self, description: &str, f: impl FnOnce(&mut Self)) {
        let was_recording = self.history.is_recording();
        let before = Box::new(self.schematic.clone());
        self.history.stop_recording();
        f(self);
        if was_recording {
            self.history.start_recording();
            self.history.push(HistoryEntry::new(
                HistoryKind::Batch,
                description,
                HistoryPayload::Snapshot {
                    before,
                    after: Box::new(self.schematic.clone()),
                },
            ));
        }
        self.request_structural();
    }

    fn after_replay(&mut self) {
        self.selection.refresh(&mut self.schematic);
        self.request_structural();
    }

    // ────────────────────────────────────────────────────────────────────
    // Pointer / keyboard entry points (screen coordinates)
    // ────────────────────────────────────────────────────────────────────

    pub fn on_pointer_press(&mut self, x: f64, y: f64, button: PointerButton, mods: Modifiers) {
        if !self.running {
            return;
        }
        let pan = button == PointerButton::Middle
            || (button == PointerButton::Primary && mods.shift && self.tool == Tool::Select);
        if pan {
            self.pan_anchor = Some(Point::new(x, y));
        }
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        if !self.running {
            return;
        }
        if let Some(anchor) = self.pan_anchor {
            self.viewport.pan(x - anchor.x, y - anchor.y);
            self.pan_anchor = Some(Point::new(x, y));
            self.request_structural();
            return;
        }
        if self.wire_tool.is_wiring() {
            let p = self.viewport.screen_to_diagram(Point::new(x, y));
            self.wire_tool.update(&self.schematic, p);
            self.request_structural();
        }
    }

    pub fn on_pointer_release(&mut self) {
        self.pan_anchor = None;
    }

    pub fn on_click(&mut self, x: f64, y: f64, mods: Modifiers) {
        if !self.running {
            return;
        }
        let p = self.viewport.screen_to_diagram(Point::new(x, y));
        match self.tool {
            Tool::Select => {
                let previous: Vec<String> = self.selection.ids().map(String::from).collect();
                let hit =
                    operations::find_element_at(&self.schematic, p.x, p.y).map(|e| e.id().to_string());
                match hit {
                    Some(id) => {
                        self.selection.select(&mut self.schematic, &id, mods.shift);
                        self.mark_dirty(&id);
                    }
                    None => self.selection.clear(&mut self.schematic),
                }
                for id in previous {
                    self.mark_dirty(&id);
                }
            }
            Tool::Wire => {
                if !self.wire_tool.is_wiring() {
                    self.wire_tool.start(&self.schematic, p);
                } else if self.wire_tool.add_point(&self.schematic, p) {
                    let _ = self.finish_wire();
                }
                self.request_structural();
            }
            Tool::Component => {
                let id = self.add_component("IC", p.x, p.y);
                self.selection.select(&mut self.schematic, &id, false);
            }
        }
    }

    /// A double click finishes the in-progress wire.
    pub fn on_double_click(&mut self) {
        if !self.running {
            return;
        }
        if self.wire_tool.is_wiring() {
            let _ = self.finish_wire();
            self.request_structural();
        }
    }

    /// Wheel zoom: away from the user zooms in.
    pub fn on_wheel(&mut self, delta_y: f64) {
        if !self.running {
            return;
        }
        if delta_y < 0.0 {
            self.viewport.zoom_in();
        } else {
            self.viewport.zoom_out();
        }
        self.request_structural();
    }

    pub fn on_key(&mut self, key: Key) {
        if !self.running {
            return;
        }
        match key {
            Key::Delete | Key::Backspace => self.delete_selected(),
            Key::Escape => {
                if self.wire_tool.is_wiring() {
                    self.wire_tool.cancel();
                } else {
                    self.selection.clear(&mut self.schematic);
                }
                self.request_structural();
            }
        }
    }

    /// Commit the in-progress wire; a candidate with fewer than two points
    /// disappears silently.
    pub fn finish_wire(&mut self) -> Option<String> {
        let wire = self.wire_tool.finish()?;
        let (id, entry) = operations::add_wire(&mut self.schematic, wire)?;
        self.history.push(entry);
        self.request_structural();
        Some(id)
    }

    // ────────────────────────────────────────────────────────────────────
    // Rendering
    // ────────────────────────────────────────────────────────────────────

    /// Paint the pending frame, if one was requested. Returns whether a
    /// frame was painted.
    pub fn render(&mut self, surface: &mut dyn DrawSurface, width: f64, height: f64) -> bool {
        let Some(plan) = self.queue.begin_frame() else {
            return false;
        };
        render_frame(
            &plan,
            &self.schematic,
            &self.viewport,
            &self.wire_tool,
            surface,
            width,
            height,
        );
        true
    }

    fn mark_dirty(&mut self, id: &str) {
        if self.queue.mark_dirty(id) {
            self.notify_redraw();
        }
    }

    fn request_structural(&mut self) {
        if self.queue.mark_structural() {
            self.notify_redraw();
        }
    }

    fn notify_redraw(&mut self) {
        if let Some(hook) = &mut self.redraw_hook {
            hook();
        }
    }
}
