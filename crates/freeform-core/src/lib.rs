//! Freeform Core Library
//!
//! State engine for the free-form visual layout editor: a canvas of
//! absolutely positioned elements with per-breakpoint geometry
//! (desktop/tablet/mobile), lazy responsive-layout synthesis, and a bounded
//! undo/redo history. Rendering, persistence, and input handling live in the
//! host application.

pub mod breakpoint;
pub mod editor;
pub mod element;
pub mod history;
pub mod section;

pub use breakpoint::{
    PADDING, ParseViewportModeError, ROW_THRESHOLD, ViewportMode, reading_order, resolve_geometry,
    synthesize_mobile, synthesize_tablet,
};
pub use editor::{DeleteOutcome, EditorState, ViewportElement};
pub use element::{
    Element, ElementId, ElementKind, ElementOptions, ElementPatch, Geometry, create_element,
    estimate_text_height,
};
pub use history::{History, MAX_HISTORY, Snapshot};
pub use section::{Section, SectionId, SectionKind, SectionOptions};
