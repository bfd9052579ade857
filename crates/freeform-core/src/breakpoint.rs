//! Viewport modes and per-breakpoint geometry resolution.
//!
//! Elements carry their authoritative geometry in base (desktop) coordinates
//! plus an optional per-mode override map. Desktop always reads base geometry;
//! tablet and mobile read their override once one exists. Overrides are
//! synthesized lazily the first time a narrower viewport is shown.

use crate::element::{Element, ElementId, Geometry};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canvas padding in layout units, used by synthesis and factory auto-fit.
pub const PADDING: f64 = 20.0;

/// Elements whose desktop `y` differs by at most this are treated as the
/// same row when computing reading order.
pub const ROW_THRESHOLD: f64 = 50.0;

/// A named viewport the editor can lay out for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewportMode {
    Desktop,
    Tablet,
    Mobile,
}

impl ViewportMode {
    /// Reference canvas width for this mode, in layout units.
    pub fn reference_width(self) -> f64 {
        match self {
            ViewportMode::Desktop => 1200.0,
            ViewportMode::Tablet => 768.0,
            ViewportMode::Mobile => 375.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewportMode::Desktop => "desktop",
            ViewportMode::Tablet => "tablet",
            ViewportMode::Mobile => "mobile",
        }
    }
}

impl fmt::Display for ViewportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown viewport mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown viewport mode: {0:?}")]
pub struct ParseViewportModeError(pub String);

impl FromStr for ViewportMode {
    type Err = ParseViewportModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(ViewportMode::Desktop),
            "tablet" => Ok(ViewportMode::Tablet),
            "mobile" => Ok(ViewportMode::Mobile),
            other => Err(ParseViewportModeError(other.to_string())),
        }
    }
}

/// Effective geometry of an element for a viewport mode.
///
/// Desktop always resolves to base geometry, even when a stale
/// `breakpoints.desktop` entry exists. Other modes fall back to base
/// geometry until their override has been synthesized.
pub fn resolve_geometry(element: &Element, mode: ViewportMode) -> Geometry {
    if mode != ViewportMode::Desktop {
        if let Some(geometry) = element.breakpoints.get(&mode) {
            return *geometry;
        }
    }
    element.base_geometry()
}

/// Total order over `elements` approximating top-to-bottom, left-to-right
/// reading order of the desktop layout. Returns indices into `elements`.
///
/// Elements are sorted by `y`, then banded into rows: a new row starts when
/// an element's `y` is more than [`ROW_THRESHOLD`] below the row's first
/// (anchor) element. Within a row, elements order by ascending `x`. Pairwise
/// "same row" comparison is not transitive on staircase layouts, so banding
/// against a row anchor is what makes the order total and independent of
/// input order.
pub fn reading_order(elements: &[Element]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..elements.len()).collect();
    indices.sort_by(|&a, &b| {
        let (ea, eb) = (&elements[a], &elements[b]);
        ea.y.partial_cmp(&eb.y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| ea.x.partial_cmp(&eb.x).unwrap_or(Ordering::Equal))
    });

    let mut ordered = Vec::with_capacity(indices.len());
    let mut row: Vec<usize> = Vec::new();
    let mut anchor_y = 0.0;
    for index in indices {
        let y = elements[index].y;
        if !row.is_empty() && y - anchor_y > ROW_THRESHOLD {
            sort_row_by_x(&mut row, elements);
            ordered.append(&mut row);
        }
        if row.is_empty() {
            anchor_y = y;
        }
        row.push(index);
    }
    sort_row_by_x(&mut row, elements);
    ordered.append(&mut row);
    ordered
}

fn sort_row_by_x(row: &mut [usize], elements: &[Element]) {
    row.sort_by(|&a, &b| {
        let (ea, eb) = (&elements[a], &elements[b]);
        ea.x.partial_cmp(&eb.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| ea.y.partial_cmp(&eb.y).unwrap_or(Ordering::Equal))
    });
}

/// Derive a tablet override from base geometry: uniform horizontal scale,
/// clamped so the element never overflows the narrower viewport. `y` and
/// `height` are unchanged.
pub fn synthesize_tablet(element: &Element, target_width: f64) -> Geometry {
    let scale = target_width / ViewportMode::Desktop.reference_width();
    let width = (element.width * scale).min(target_width - 2.0 * PADDING);
    let max_x = (target_width - width - PADDING).max(PADDING);
    let x = (element.x * scale).clamp(PADDING, max_x);
    Geometry {
        x,
        y: element.y,
        width,
        height: element.height,
    }
}

/// Derive mobile overrides for every element that lacks one: a centered
/// single-column stack in reading order. Elements that already carry a
/// mobile override keep it but still occupy their slot in the stack.
///
/// Returns the `(id, geometry)` pairs to be written; existing overrides are
/// never returned, which makes a full pass idempotent.
pub fn synthesize_mobile(elements: &[Element], target_width: f64) -> Vec<(ElementId, Geometry)> {
    let max_width = target_width - 2.0 * PADDING;
    let mut cursor = PADDING;
    let mut synthesized = Vec::new();

    for index in reading_order(elements) {
        let element = &elements[index];
        let existing = element.breakpoints.get(&ViewportMode::Mobile).copied();
        let geometry = existing.unwrap_or_else(|| {
            let width = element.width.min(max_width);
            Geometry {
                x: PADDING.max((target_width - width) / 2.0),
                y: cursor,
                width,
                height: element.height,
            }
        });
        if existing.is_none() {
            synthesized.push((element.id, geometry));
        }
        cursor += PADDING + geometry.height;
    }

    synthesized
}
