//! Full-width page sections and the section factory.

use crate::element::ElementId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// Unique identifier for sections.
pub type SectionId = Uuid;

/// The fixed set of section kinds.
///
/// Only [`SectionKind::Blank`] is a container for free-form elements; the
/// widget kinds render self-contained content from their property bag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Blank,
    BookingWidget,
    GalleryWidget,
    ProductGrid,
    ReviewCarousel,
}

impl SectionKind {
    pub fn default_height(self) -> f64 {
        match self {
            SectionKind::Blank => 400.0,
            SectionKind::BookingWidget => 500.0,
            SectionKind::GalleryWidget => 500.0,
            SectionKind::ProductGrid => 450.0,
            SectionKind::ReviewCarousel => 400.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Blank => "Blank Section",
            SectionKind::BookingWidget => "Booking Calendar",
            SectionKind::GalleryWidget => "Photo Gallery",
            SectionKind::ProductGrid => "Services / Products",
            SectionKind::ReviewCarousel => "Reviews",
        }
    }

    /// Whether sections of this kind hold a free-form element list.
    pub fn is_container(self) -> bool {
        matches!(self, SectionKind::Blank)
    }

    pub fn default_properties(self) -> Map<String, Value> {
        let value = match self {
            SectionKind::Blank => json!({
                "backgroundColor": "transparent",
                "padding": { "top": 40, "right": 40, "bottom": 40, "left": 40 },
            }),
            SectionKind::BookingWidget => json!({
                "backgroundColor": "transparent",
                "heading": "Book an Appointment",
                "buttonText": "Book Now",
                "accentColor": "#3B82F6",
            }),
            SectionKind::GalleryWidget => json!({
                "backgroundColor": "transparent",
                "heading": "Our Gallery",
                "layout": "masonry",
                "columns": 3,
                "showCaptions": true,
                "lightbox": true,
                "maxPhotos": 9,
                "accentColor": "#1A1A1A",
            }),
            SectionKind::ProductGrid => json!({
                "backgroundColor": "transparent",
                "heading": "Our Services",
                "columns": 3,
                "showPrice": true,
                "accentColor": "#1A1A1A",
            }),
            SectionKind::ReviewCarousel => json!({
                "backgroundColor": "transparent",
                "heading": "What Our Clients Say",
                "autoPlay": true,
                "accentColor": "#1A1A1A",
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// A full-width vertical region of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub height: f64,
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Contained element ids; `None` marks a non-container kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ElementId>>,
    #[serde(default)]
    pub locked: bool,
}

/// Caller-supplied overrides for [`Section::new`].
#[derive(Debug, Clone, Default)]
pub struct SectionOptions {
    pub height: Option<f64>,
    pub properties: Map<String, Value>,
    pub locked: bool,
}

impl Section {
    /// New section of `kind` with type-specific defaults, overridden by
    /// `options`.
    pub fn new(kind: SectionKind, options: SectionOptions) -> Self {
        let mut properties = kind.default_properties();
        for (key, value) in options.properties {
            properties.insert(key, value);
        }
        Self {
            id: Uuid::new_v4(),
            kind,
            height: options.height.unwrap_or_else(|| kind.default_height()),
            properties,
            elements: kind.is_container().then(Vec::new),
            locked: options.locked,
        }
    }
}
