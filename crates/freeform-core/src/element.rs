//! Canvas elements and the element factory.

use crate::breakpoint::{PADDING, ViewportMode};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::section::SectionId;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Vertical padding baked into text height estimation.
const TEXT_PADDING: f64 = 16.0;

/// The fixed set of element kinds the editor can place.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Heading,
    Subheading,
    Text,
    Caption,
    Quote,
    Button,
    Image,
    Frame,
    Grid,
    Divider,
    Spacer,
    ContactForm,
    CustomForm,
}

impl ElementKind {
    /// Base size for the desktop canvas (1200 reference units wide).
    pub fn base_size(self) -> (f64, f64) {
        match self {
            ElementKind::Heading => (400.0, 60.0),
            ElementKind::Subheading => (350.0, 40.0),
            ElementKind::Text => (300.0, 100.0),
            ElementKind::Caption => (250.0, 30.0),
            ElementKind::Quote => (400.0, 120.0),
            ElementKind::Button => (160.0, 48.0),
            ElementKind::Image => (300.0, 200.0),
            ElementKind::Frame => (200.0, 200.0),
            ElementKind::Grid => (400.0, 300.0),
            ElementKind::Divider => (400.0, 20.0),
            ElementKind::Spacer => (100.0, 40.0),
            ElementKind::ContactForm => (400.0, 420.0),
            ElementKind::CustomForm => (400.0, 300.0),
        }
    }

    /// Whether this kind renders flowed text content.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            ElementKind::Heading
                | ElementKind::Subheading
                | ElementKind::Text
                | ElementKind::Caption
                | ElementKind::Quote
        )
    }

    /// Kinds whose font size follows interactive width resizing.
    pub fn scales_font(self) -> bool {
        matches!(
            self,
            ElementKind::Heading | ElementKind::Text | ElementKind::Button
        )
    }

    /// Default property bag for a freshly created element of this kind.
    pub fn default_properties(self) -> Map<String, Value> {
        let value = match self {
            ElementKind::Heading => json!({
                "content": "New Heading",
                "fontSize": 48,
                "fontWeight": 700,
                "fontFamily": "Inter",
                "color": "#1A1A1A",
                "textAlign": "left",
                "lineHeight": 1.2,
                "letterSpacing": 0,
            }),
            ElementKind::Subheading => json!({
                "content": "Subheading",
                "fontSize": 24,
                "fontWeight": 600,
                "fontFamily": "Inter",
                "color": "#374151",
                "textAlign": "left",
                "lineHeight": 1.3,
                "letterSpacing": 0,
            }),
            ElementKind::Text => json!({
                "content": "Click to edit text",
                "fontSize": 16,
                "fontWeight": 400,
                "fontFamily": "Inter",
                "color": "#6B7280",
                "textAlign": "left",
                "lineHeight": 1.5,
                "letterSpacing": 0,
            }),
            ElementKind::Caption => json!({
                "content": "Caption text",
                "fontSize": 12,
                "fontWeight": 400,
                "fontFamily": "Inter",
                "color": "#9CA3AF",
                "textAlign": "left",
                "lineHeight": 1.4,
                "letterSpacing": 0.5,
            }),
            ElementKind::Quote => json!({
                "content": "\"Your inspirational quote goes here\"",
                "fontSize": 20,
                "fontWeight": 400,
                "fontFamily": "Playfair Display",
                "fontStyle": "italic",
                "color": "#4B5563",
                "textAlign": "center",
                "lineHeight": 1.6,
                "showQuoteIcon": true,
                "quoteIconColor": "#3B82F6",
            }),
            ElementKind::Button => json!({
                "content": "Click Me",
                "fontSize": 16,
                "fontWeight": 600,
                "fontFamily": "Inter",
                "backgroundColor": "#3B82F6",
                "color": "#ffffff",
                "borderRadius": 8,
                "borderWidth": 0,
                "paddingX": 24,
                "paddingY": 12,
            }),
            ElementKind::Image => json!({
                "src": "",
                "alt": "Image",
                "objectFit": "cover",
                "objectPosition": "center",
                "borderRadius": 0,
                "borderWidth": 0,
                "opacity": 100,
            }),
            ElementKind::Frame => json!({
                "frameType": "circle",
                "imageSrc": "",
                "imageAlt": "Frame image",
                "objectFit": "cover",
                "borderColor": "#D1D5DB",
                "borderWidth": 0,
            }),
            ElementKind::Grid => json!({
                "gridType": "2-up",
                "gap": 8,
                "borderRadius": 8,
                "backgroundColor": "transparent",
                "cells": [],
            }),
            ElementKind::Divider => json!({
                "color": "#D1D5DB",
                "thickness": 1,
                "style": "solid",
            }),
            ElementKind::Spacer => json!({
                "height": 40,
            }),
            ElementKind::ContactForm => json!({
                "formTitle": "Get In Touch",
                "fields": [
                    { "id": "name", "type": "text", "label": "Name", "placeholder": "Your name", "required": true },
                    { "id": "email", "type": "email", "label": "Email", "placeholder": "your@email.com", "required": true },
                    { "id": "message", "type": "textarea", "label": "Message", "placeholder": "How can we help?", "required": true },
                ],
                "submitButtonText": "Send Message",
                "successMessage": "Thank you! We'll get back to you soon.",
                "backgroundColor": "#ffffff",
                "borderRadius": 12,
                "fontFamily": "Inter",
            }),
            ElementKind::CustomForm => json!({
                "formTitle": "Custom Form",
                "fields": [],
                "submitButtonText": "Submit",
                "successMessage": "Form submitted successfully!",
                "backgroundColor": "#ffffff",
                "borderRadius": 12,
                "fontFamily": "Inter",
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// A positional rectangle in canvas-local units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn contains(self, point: Point) -> bool {
        self.to_rect().contains(point)
    }
}

/// An absolutely positioned, typed object on the canvas.
///
/// Base `x`/`y`/`width`/`height` are authoritative for the desktop viewport;
/// `breakpoints` carries lazily populated per-mode overrides for the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, desktop only.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// When false, the element survives bulk deletion even if targeted.
    #[serde(default = "default_true")]
    pub deletable: bool,
    /// Type-specific attributes, opaque to the layout engine apart from
    /// `fontSize`/`lineHeight`/`content` on text kinds.
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Per-viewport geometry overrides.
    #[serde(default)]
    pub breakpoints: BTreeMap<ViewportMode, Geometry>,
    /// Logical owner; referential integrity is the host's concern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
}

fn default_true() -> bool {
    true
}

impl Element {
    /// New element of `kind` at the origin with its base size and default
    /// properties. Prefer [`create_element`] for canvas-fitted placement.
    pub fn with_defaults(kind: ElementKind) -> Self {
        let (width, height) = kind.base_size();
        Self {
            id: Uuid::new_v4(),
            kind,
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
            locked: false,
            visible: true,
            deletable: true,
            properties: kind.default_properties(),
            breakpoints: BTreeMap::new(),
            section_id: None,
        }
    }

    pub fn base_geometry(&self) -> Geometry {
        Geometry {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Numeric property lookup, e.g. `fontSize`.
    pub fn number_property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }

    /// String property lookup, e.g. `content`.
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// A partial update applied to an element's own fields (not its property
/// bag); `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub deletable: Option<bool>,
    /// `Some(None)` detaches the element from its section.
    pub section_id: Option<Option<SectionId>>,
}

impl Element {
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(deletable) = patch.deletable {
            self.deletable = deletable;
        }
        if let Some(section_id) = patch.section_id {
            self.section_id = section_id;
        }
    }
}

/// Caller-supplied extras for [`create_element`].
#[derive(Debug, Clone, Default)]
pub struct ElementOptions {
    /// Property overrides merged over the kind's defaults.
    pub properties: Map<String, Value>,
    /// Owning section, when the element is dropped inside one.
    pub section_id: Option<SectionId>,
}

/// Estimate the height a flowed text block needs for `content` at the given
/// font size, line height, and available width. A character-count heuristic;
/// the renderer owns exact metrics.
pub fn estimate_text_height(content: &str, font_size: f64, line_height: f64, width: f64) -> f64 {
    // Average character width is roughly 0.55x the font size for Inter.
    let avg_char_width = font_size * 0.55;
    let usable_width = width - TEXT_PADDING;
    if usable_width <= 0.0 {
        return font_size * line_height;
    }
    let chars_per_line = (usable_width / avg_char_width).floor().max(1.0);
    let line_count = (content.chars().count() as f64 / chars_per_line).ceil();
    let line_height_px = font_size * line_height;
    (line_count * line_height_px + TEXT_PADDING).max(line_height_px + TEXT_PADDING)
}

/// Build a new element of `kind`, auto-fitted to the canvas.
///
/// The base size is scaled down in two sequential passes, first against the
/// available canvas height, then against the viewport width. The passes are
/// not jointly solved, so extreme aspect ratios may still slightly exceed one
/// axis. The final position is clamped inside the canvas. The created
/// element carries base geometry plus a single breakpoint entry for `mode`.
pub fn create_element(
    kind: ElementKind,
    x: f64,
    y: f64,
    mode: ViewportMode,
    viewport_width: f64,
    canvas_height: f64,
    options: ElementOptions,
) -> Element {
    let (base_width, base_height) = kind.base_size();
    let mut width = base_width;
    let mut height = base_height;

    // Grow text elements up front to fit caller-supplied content.
    if kind.is_text() {
        if let Some(content) = options.properties.get("content").and_then(Value::as_str) {
            if !content.is_empty() {
                let defaults = kind.default_properties();
                let font_size = options
                    .properties
                    .get("fontSize")
                    .or_else(|| defaults.get("fontSize"))
                    .and_then(Value::as_f64)
                    .unwrap_or(16.0);
                let line_height = options
                    .properties
                    .get("lineHeight")
                    .or_else(|| defaults.get("lineHeight"))
                    .and_then(Value::as_f64)
                    .unwrap_or(1.5);
                let estimated = estimate_text_height(content, font_size, line_height, width);
                height = height.max(estimated.ceil());
            }
        }
    }

    let max_height = canvas_height - 2.0 * PADDING;
    if height > max_height {
        let scale = max_height / height;
        height = (height * scale).floor();
        width = (base_width * scale).floor();
    }

    let max_width = viewport_width - 2.0 * PADDING;
    if width > max_width {
        let scale = max_width / width;
        width = (width * scale).floor();
        height = (height * scale).floor();
    }

    let x = x.clamp(0.0, (viewport_width - width).max(0.0));
    let y = y.clamp(0.0, (canvas_height - height).max(0.0));

    let mut properties = kind.default_properties();
    for (key, value) in options.properties {
        properties.insert(key, value);
    }

    let geometry = Geometry {
        x,
        y,
        width,
        height,
    };
    let mut breakpoints = BTreeMap::new();
    breakpoints.insert(mode, geometry);

    Element {
        id: Uuid::new_v4(),
        kind,
        x,
        y,
        width,
        height,
        rotation: 0.0,
        locked: false,
        visible: true,
        deletable: true,
        properties,
        breakpoints,
        section_id: options.section_id,
    }
}
