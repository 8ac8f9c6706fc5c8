//! Selection management for the editor.
//!
//! Tracks which element ids are selected and keeps the per-element
//! `selected` flags in sync so the renderer can highlight without consulting
//! the set.
//!
//! Re-selecting an already-selected id with the multi modifier is an
//! idempotent add (it stays selected); hosts that prefer Ctrl+click
//! deselection use [`Selection::toggle`] instead.

use std::collections::BTreeSet;

use crate::model::{Component, Schematic, Wire};

/// The set of selected element ids (components and/or wires).
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`. Without `multi` the set is replaced; with `multi` the id
    /// is added to the existing set.
    pub fn select(&mut self, schematic: &mut Schematic, id: &str, multi: bool) {
        if !multi {
            self.ids.clear();
        }
        self.ids.insert(id.to_string());
        self.sync_flags(schematic);
    }

    /// Add if absent, remove if present.
    pub fn toggle(&mut self, schematic: &mut Schematic, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
        self.sync_flags(schematic);
    }

    /// Empty the set and unset every flag.
    pub fn clear(&mut self, schematic: &mut Schematic) {
        self.ids.clear();
        self.sync_flags(schematic);
    }

    /// Drop ids that no longer resolve to an element (after deletions).
    pub fn retain_existing(&mut self, schematic: &Schematic) {
        self.ids
            .retain(|id| schematic.component(id).is_some() || schematic.wire(id).is_some());
    }

    /// Re-validate the set against the schematic and re-apply the flags.
    /// Used after undo/redo replays, which may add or remove elements.
    pub fn refresh(&mut self, schematic: &mut Schematic) {
        self.retain_existing(schematic);
        self.sync_flags(schematic);
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// The selected component, defined only for a single-element selection
    /// whose member is a component.
    pub fn selected_component<'a>(&self, schematic: &'a Schematic) -> Option<&'a Component> {
        if self.ids.len() != 1 {
            return None;
        }
        schematic.component(self.ids.iter().next()?)
    }

    /// The selected wire, defined only for a single-element selection whose
    /// member is a wire.
    pub fn selected_wire<'a>(&self, schematic: &'a Schematic) -> Option<&'a Wire> {
        if self.ids.len() != 1 {
            return None;
        }
        schematic.wire(self.ids.iter().next()?)
    }

    fn sync_flags(&self, schematic: &mut Schematic) {
        for c in &mut schematic.components {
            c.selected = self.ids.contains(&c.id);
        }
        for w in &mut schematic.wires {
            w.selected = self.ids.contains(&w.id);
        }
    }
}
