//! Interactive schematic capture core.
//!
//! This crate provides the editing engine behind a schematic design surface:
//! the in-memory diagram model, the pointer/keyboard interaction layer, the
//! smart-wiring assistant, the differential renderer, linear undo/redo
//! history, and a bounded symbol preview cache.
//!
//! Rendering targets the [`render::DrawSurface`] trait; the host supplies a
//! concrete surface (an egui-backed one is available behind the `egui`
//! feature). The binary `rustyschem` inspects saved schematic documents and
//! prints them as JSON.

pub mod cache;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod library;
pub mod model;
pub mod render;
pub mod style;
pub mod viewport;

// Optional egui integration lives behind the `egui` feature flag. It adapts
// an egui painter to the core's drawing-surface contract.
#[cfg(feature = "egui")]
pub mod egui_app;

pub use editor::EditorSession;
pub use error::EditorError;
pub use model::{Component, Connection, Pin, Point, Schematic, SchematicDoc, Wire};
