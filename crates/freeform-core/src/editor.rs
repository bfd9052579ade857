//! Editor state controller: the stateful orchestrator over the canvas.
//!
//! Operations are either *live* (applied to in-memory state only, intended
//! for per-pointer-move calls) or *committed* (additionally recorded as an
//! undo snapshot). A drag gesture calls the live mutator on every move and
//! the matching commit exactly once on pointer-up, so the whole gesture
//! collapses into one history entry. An aborted gesture is the caller's
//! problem: there is no automatic rollback of uncommitted live changes.
//!
//! The controller is owned by exactly one editing session; it is
//! single-threaded and synchronous, and the current viewport mode/width are
//! threaded through every call rather than held as ambient state.

use crate::breakpoint::{ViewportMode, resolve_geometry, synthesize_mobile, synthesize_tablet};
use crate::element::{
    Element, ElementId, ElementKind, ElementOptions, ElementPatch, Geometry, create_element,
    estimate_text_height,
};
use crate::history::History;
use kurbo::{Point, Rect};
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;
use uuid::Uuid;

/// Offset applied to duplicated elements' base geometry.
const DUPLICATE_OFFSET: f64 = 20.0;

/// Per-id result of a bulk delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Matched but retained: the element is not deletable.
    Protected,
    NotFound,
}

/// An element paired with its geometry resolved for one viewport mode.
/// This is what renderers iterate over.
#[derive(Debug, Clone, Copy)]
pub struct ViewportElement<'a> {
    pub element: &'a Element,
    pub geometry: Geometry,
}

/// The canvas being edited: elements in z-order (later = on top), a
/// transient selection, and the undo history.
#[derive(Debug, Clone)]
pub struct EditorState {
    elements: Vec<Element>,
    selection: HashSet<ElementId>,
    history: History,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// Empty canvas.
    pub fn new() -> Self {
        Self::with_elements(Vec::new())
    }

    /// Canvas seeded with `elements`; they become the history baseline.
    pub fn with_elements(elements: Vec<Element>) -> Self {
        let history = History::new(elements.clone());
        Self {
            elements,
            selection: HashSet::new(),
            history,
        }
    }

    fn commit(&mut self) {
        self.history.push(self.elements.clone());
    }

    fn find_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    // ------------------------------------------------------------------
    // Element lifecycle
    // ------------------------------------------------------------------

    /// Append a new element built by the factory and select it alone.
    /// Committed.
    #[allow(clippy::too_many_arguments)]
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        x: f64,
        y: f64,
        mode: ViewportMode,
        viewport_width: f64,
        canvas_height: f64,
        options: ElementOptions,
    ) -> ElementId {
        let element = create_element(kind, x, y, mode, viewport_width, canvas_height, options);
        let id = element.id;
        self.elements.push(element);
        self.selection.clear();
        self.selection.insert(id);
        self.commit();
        debug!("added {kind:?} element {id} in {mode} viewport");
        id
    }

    /// Replace the whole canvas (page switching). Clears the selection and
    /// restarts history from the new baseline.
    pub fn set_page_elements(&mut self, elements: Vec<Element>) {
        self.history.reset(elements.clone());
        self.elements = elements;
        self.selection.clear();
    }

    /// Remove every targeted element whose `deletable` flag allows it.
    /// Protected elements are silently retained; the returned outcomes let
    /// callers tell retention apart from a miss. Clears the selection.
    /// Committed when anything was actually removed; a delete that only hit
    /// protected or missing ids spends no history slot.
    pub fn delete_elements(&mut self, ids: &[ElementId]) -> Vec<(ElementId, DeleteOutcome)> {
        let outcomes: Vec<(ElementId, DeleteOutcome)> = ids
            .iter()
            .map(|&id| {
                let outcome = match self.elements.iter().find(|el| el.id == id) {
                    None => DeleteOutcome::NotFound,
                    Some(el) if !el.deletable => DeleteOutcome::Protected,
                    Some(_) => DeleteOutcome::Deleted,
                };
                (id, outcome)
            })
            .collect();

        self.selection.clear();
        if outcomes.iter().any(|(_, o)| *o == DeleteOutcome::Deleted) {
            self.elements
                .retain(|el| !(ids.contains(&el.id) && el.deletable));
            self.commit();
        }

        let protected = outcomes
            .iter()
            .filter(|(_, o)| *o == DeleteOutcome::Protected)
            .count();
        if protected > 0 {
            debug!("delete retained {protected} protected element(s)");
        }
        outcomes
    }

    /// Clone each matched, non-protected element with a fresh id and a
    /// base-geometry offset, append the clones, and select them.
    /// Breakpoint overrides are copied unshifted. Committed.
    pub fn duplicate_elements(&mut self, ids: &[ElementId]) {
        let duplicated: Vec<Element> = self
            .elements
            .iter()
            .filter(|el| ids.contains(&el.id) && el.deletable)
            .map(|el| {
                let mut copy = el.clone();
                copy.id = Uuid::new_v4();
                copy.x += DUPLICATE_OFFSET;
                copy.y += DUPLICATE_OFFSET;
                copy.deletable = true;
                copy
            })
            .collect();
        if duplicated.is_empty() {
            return;
        }

        self.selection = duplicated.iter().map(|el| el.id).collect();
        self.elements.extend(duplicated);
        self.commit();
    }

    // ------------------------------------------------------------------
    // Geometry mutation
    // ------------------------------------------------------------------

    /// Overwrite the element's position for `mode`, creating the breakpoint
    /// entry from base geometry if absent. Desktop also mirrors into base
    /// `x`/`y`. Live: no history entry.
    pub fn update_position(&mut self, id: ElementId, x: f64, y: f64, mode: ViewportMode) {
        let Some(element) = self.elements.iter_mut().find(|el| el.id == id) else {
            return;
        };
        let base = element.base_geometry();
        let entry = element.breakpoints.entry(mode).or_insert(base);
        entry.x = x;
        entry.y = y;
        if mode == ViewportMode::Desktop {
            element.x = x;
            element.y = y;
        }
    }

    /// Record the state reached by a drag as one history entry. Committed.
    pub fn commit_position_change(&mut self) {
        self.commit();
    }

    /// Overwrite the element's size for `mode`, creating the breakpoint
    /// entry from base geometry if absent. Desktop also mirrors into base
    /// `width`/`height`. With `scale_font`, heading/text/button elements get
    /// their `fontSize` scaled by the width ratio, rounded and clamped to
    /// `[8, 200]`. Live: no history entry.
    pub fn update_size(
        &mut self,
        id: ElementId,
        width: f64,
        height: f64,
        scale_font: bool,
        mode: ViewportMode,
    ) {
        let Some(element) = self.elements.iter_mut().find(|el| el.id == id) else {
            return;
        };
        let width_before = element
            .breakpoints
            .get(&mode)
            .map(|g| g.width)
            .unwrap_or(element.width);
        let base = element.base_geometry();
        let entry = element.breakpoints.entry(mode).or_insert(base);
        entry.width = width;
        entry.height = height;
        if mode == ViewportMode::Desktop {
            element.width = width;
            element.height = height;
        }

        if scale_font && element.kind.scales_font() && width_before > 0.0 {
            if let Some(font_size) = element.number_property("fontSize") {
                let scaled = (font_size * (width / width_before)).round().clamp(8.0, 200.0);
                element
                    .properties
                    .insert("fontSize".to_string(), Value::from(scaled));
            }
        }
    }

    /// Record the state reached by a resize as one history entry. Committed.
    pub fn commit_size_change(&mut self) {
        self.commit();
    }

    // ------------------------------------------------------------------
    // Property mutation
    // ------------------------------------------------------------------

    /// Shallow-merge `updates` into the element's property bag. Text
    /// elements whose `content` changed grow (never shrink) to fit the new
    /// content, base height and existing breakpoint entries together.
    /// Committed.
    pub fn update_properties(&mut self, id: ElementId, updates: Map<String, Value>) {
        let Some(element) = self.elements.iter_mut().find(|el| el.id == id) else {
            return;
        };
        let new_content = updates
            .get("content")
            .and_then(Value::as_str)
            .map(str::to_owned);
        for (key, value) in updates {
            element.properties.insert(key, value);
        }

        if element.kind.is_text() {
            if let Some(content) = new_content {
                let font_size = element.number_property("fontSize").unwrap_or(16.0);
                let line_height = element.number_property("lineHeight").unwrap_or(1.5);
                let estimated =
                    estimate_text_height(&content, font_size, line_height, element.width).ceil();
                if estimated > element.height {
                    element.height = estimated;
                    for geometry in element.breakpoints.values_mut() {
                        geometry.height = estimated;
                    }
                }
            }
        }
        self.commit();
    }

    /// Apply a partial update to the element's own fields (lock state,
    /// section membership, geometry). Committed.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) {
        let Some(element) = self.find_mut(id) else {
            return;
        };
        element.apply_patch(patch);
        self.commit();
    }

    /// Flip the element's `locked` flag. Committed.
    pub fn toggle_lock(&mut self, id: ElementId) {
        let Some(element) = self.find_mut(id) else {
            return;
        };
        element.locked = !element.locked;
        self.commit();
    }

    // ------------------------------------------------------------------
    // Z-order
    // ------------------------------------------------------------------

    /// Move the element to the end of the array (painted last, on top).
    /// Committed.
    pub fn bring_to_front(&mut self, id: ElementId) {
        let Some(position) = self.elements.iter().position(|el| el.id == id) else {
            return;
        };
        let element = self.elements.remove(position);
        self.elements.push(element);
        self.commit();
    }

    /// Move the element to the start of the array (painted first, at the
    /// back). Committed.
    pub fn send_to_back(&mut self, id: ElementId) {
        let Some(position) = self.elements.iter().position(|el| el.id == id) else {
            return;
        };
        let element = self.elements.remove(position);
        self.elements.insert(0, element);
        self.commit();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Replace the selection with `{id}`, or toggle `id`'s membership when
    /// `add_to_selection`. Never recorded in history.
    pub fn select_element(&mut self, id: ElementId, add_to_selection: bool) {
        if add_to_selection {
            if !self.selection.remove(&id) {
                self.selection.insert(id);
            }
        } else {
            self.selection.clear();
            self.selection.insert(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all(&mut self) {
        self.selection = self.elements.iter().map(|el| el.id).collect();
    }

    pub fn selected_ids(&self) -> &HashSet<ElementId> {
        &self.selection
    }

    /// First selected element in canvas order, for the property inspector.
    pub fn selected_element(&self) -> Option<&Element> {
        self.elements
            .iter()
            .find(|el| self.selection.contains(&el.id))
    }

    /// All selected elements in canvas order.
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|el| self.selection.contains(&el.id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Breakpoint synthesis
    // ------------------------------------------------------------------

    /// Populate the `mode` breakpoint for every element that lacks one.
    /// Existing entries are never overwritten, so a repeated pass is a
    /// no-op. Desktop needs no synthesis. Viewport switching is not an
    /// undoable user action, so nothing is recorded in history.
    pub fn generate_breakpoint_positions(&mut self, mode: ViewportMode, target_width: f64) {
        match mode {
            ViewportMode::Desktop => {}
            ViewportMode::Tablet => {
                let mut synthesized = 0;
                for index in 0..self.elements.len() {
                    if self.elements[index].breakpoints.contains_key(&mode) {
                        continue;
                    }
                    let geometry = synthesize_tablet(&self.elements[index], target_width);
                    self.elements[index].breakpoints.insert(mode, geometry);
                    synthesized += 1;
                }
                debug!("synthesized {synthesized} tablet breakpoint(s)");
            }
            ViewportMode::Mobile => {
                let entries = synthesize_mobile(&self.elements, target_width);
                debug!("synthesized {} mobile breakpoint(s)", entries.len());
                for (id, geometry) in entries {
                    if let Some(element) = self.find_mut(id) {
                        element.breakpoints.insert(mode, geometry);
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Step back one snapshot; a no-op at the boundary.
    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            self.elements = snapshot.clone();
        } else {
            debug!("undo at history boundary");
        }
    }

    /// Step forward one snapshot; a no-op at the boundary.
    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo() {
            self.elements = snapshot.clone();
        } else {
            debug!("redo at history boundary");
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// The unprojected element array with all breakpoint data intact, for
    /// the persistence layer.
    pub fn raw_elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in z-order with geometry resolved for `mode`; what the
    /// renderer iterates over.
    pub fn elements_for_viewport(&self, mode: ViewportMode) -> Vec<ViewportElement<'_>> {
        self.elements
            .iter()
            .map(|element| ViewportElement {
                element,
                geometry: resolve_geometry(element, mode),
            })
            .collect()
    }

    /// Ids of elements under `point` in `mode`'s layout, front to back.
    pub fn elements_at_point(&self, point: Point, mode: ViewportMode) -> Vec<ElementId> {
        self.elements
            .iter()
            .rev()
            .filter(|el| resolve_geometry(el, mode).contains(point))
            .map(|el| el.id)
            .collect()
    }

    /// Ids of elements whose resolved bounds intersect `rect`, in z-order.
    /// Used for marquee selection.
    pub fn elements_in_rect(&self, rect: Rect, mode: ViewportMode) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|el| {
                let bounds = resolve_geometry(el, mode).to_rect();
                rect.intersect(bounds).area() > 0.0
            })
            .map(|el| el.id)
            .collect()
    }

    /// Bounding box of the whole canvas in `mode`'s layout.
    pub fn bounds(&self, mode: ViewportMode) -> Option<Rect> {
        self.elements
            .iter()
            .map(|el| resolve_geometry(el, mode).to_rect())
            .reduce(|acc, rect| acc.union(rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::PADDING;

    fn add_default(
        editor: &mut EditorState,
        kind: ElementKind,
        x: f64,
        y: f64,
    ) -> ElementId {
        editor.add_element(
            kind,
            x,
            y,
            ViewportMode::Desktop,
            1200.0,
            800.0,
            ElementOptions::default(),
        )
    }

    #[test]
    fn test_add_element_selects_and_commits() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Heading, 100.0, 100.0);

        assert_eq!(editor.len(), 1);
        assert_eq!(editor.selected_ids().len(), 1);
        assert_eq!(editor.selected_element().map(|el| el.id), Some(id));
        assert!(editor.can_undo());

        editor.undo();
        assert!(editor.is_empty());
        editor.redo();
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn test_position_round_trip_through_history() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Heading, 100.0, 100.0);

        editor.update_position(id, 10.0, 20.0, ViewportMode::Desktop);
        editor.commit_position_change();

        let el = editor.element(id).unwrap();
        assert_eq!((el.x, el.y), (10.0, 20.0));

        editor.undo();
        let el = editor.element(id).unwrap();
        assert_eq!((el.x, el.y), (100.0, 100.0));

        editor.redo();
        let el = editor.element(id).unwrap();
        assert_eq!((el.x, el.y), (10.0, 20.0));
    }

    #[test]
    fn test_live_update_writes_no_history() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Button, 100.0, 100.0);

        editor.undo();
        assert!(!editor.can_undo());
        editor.redo();

        // Sixty moves of a drag, no commit: still a single undoable step.
        for i in 0..60 {
            editor.update_position(id, 100.0 + f64::from(i), 100.0, ViewportMode::Desktop);
        }
        editor.undo();
        assert!(editor.is_empty());
    }

    #[test]
    fn test_desktop_moves_mirror_into_base_geometry() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Text, 100.0, 100.0);

        editor.update_position(id, 40.0, 50.0, ViewportMode::Desktop);
        let el = editor.element(id).unwrap();
        assert_eq!((el.x, el.y), (40.0, 50.0));
        let bp = el.breakpoints.get(&ViewportMode::Desktop).unwrap();
        assert_eq!((bp.x, bp.y), (40.0, 50.0));
    }

    #[test]
    fn test_mobile_moves_leave_base_geometry_alone() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Text, 100.0, 100.0);

        editor.update_position(id, 12.0, 700.0, ViewportMode::Mobile);
        let el = editor.element(id).unwrap();
        assert_eq!((el.x, el.y), (100.0, 100.0));
        let bp = el.breakpoints.get(&ViewportMode::Mobile).unwrap();
        assert_eq!((bp.x, bp.y), (12.0, 700.0));
        // Entry was created from base width/height.
        assert_eq!((bp.width, bp.height), (el.width, el.height));
    }

    #[test]
    fn test_resize_scales_font_with_width_ratio() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Heading, 0.0, 0.0);
        // Heading starts at 400 wide with fontSize 48.

        editor.update_size(id, 200.0, 60.0, true, ViewportMode::Desktop);
        let el = editor.element(id).unwrap();
        assert_eq!(el.number_property("fontSize"), Some(24.0));

        // Shrinking to a sliver clamps at the floor.
        editor.update_size(id, 10.0, 60.0, true, ViewportMode::Desktop);
        let el = editor.element(id).unwrap();
        assert_eq!(el.number_property("fontSize"), Some(8.0));
    }

    #[test]
    fn test_resize_without_font_scaling_keeps_font() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Heading, 0.0, 0.0);
        editor.update_size(id, 200.0, 60.0, false, ViewportMode::Desktop);
        let el = editor.element(id).unwrap();
        assert_eq!(el.number_property("fontSize"), Some(48.0));
        assert_eq!(el.width, 200.0);
    }

    #[test]
    fn test_update_properties_merges_and_commits() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Button, 0.0, 0.0);

        let mut updates = Map::new();
        updates.insert("backgroundColor".to_string(), Value::from("#000000"));
        editor.update_properties(id, updates);

        let el = editor.element(id).unwrap();
        assert_eq!(el.string_property("backgroundColor"), Some("#000000"));
        assert_eq!(el.string_property("content"), Some("Click Me"));

        editor.undo();
        let el = editor.element(id).unwrap();
        assert_eq!(el.string_property("backgroundColor"), Some("#3B82F6"));
    }

    #[test]
    fn test_content_growth_never_shrinks() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Text, 0.0, 0.0);
        let height_before = editor.element(id).unwrap().height;

        let mut updates = Map::new();
        updates.insert("content".to_string(), Value::from("long text ".repeat(80)));
        editor.update_properties(id, updates);
        let grown = editor.element(id).unwrap().height;
        assert!(grown > height_before);

        let mut updates = Map::new();
        updates.insert("content".to_string(), Value::from("x"));
        editor.update_properties(id, updates);
        assert_eq!(editor.element(id).unwrap().height, grown);
    }

    #[test]
    fn test_update_element_patch() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Image, 0.0, 0.0);
        let section = Uuid::new_v4();

        editor.update_element(
            id,
            &ElementPatch {
                locked: Some(true),
                section_id: Some(Some(section)),
                ..ElementPatch::default()
            },
        );
        let el = editor.element(id).unwrap();
        assert!(el.locked);
        assert_eq!(el.section_id, Some(section));

        editor.undo();
        let el = editor.element(id).unwrap();
        assert!(!el.locked);
        assert_eq!(el.section_id, None);
    }

    #[test]
    fn test_delete_respects_protection() {
        let mut editor = EditorState::new();
        let keeper = add_default(&mut editor, ElementKind::Heading, 0.0, 0.0);
        let goner = add_default(&mut editor, ElementKind::Button, 0.0, 200.0);
        editor.update_element(
            keeper,
            &ElementPatch {
                deletable: Some(false),
                ..ElementPatch::default()
            },
        );
        let ghost = Uuid::new_v4();

        let outcomes = editor.delete_elements(&[keeper, goner, ghost]);
        assert_eq!(
            outcomes,
            vec![
                (keeper, DeleteOutcome::Protected),
                (goner, DeleteOutcome::Deleted),
                (ghost, DeleteOutcome::NotFound),
            ]
        );
        assert_eq!(editor.len(), 1);
        assert!(editor.element(keeper).is_some());
        assert!(editor.selected_ids().is_empty());
    }

    #[test]
    fn test_delete_of_only_protected_changes_nothing() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Heading, 0.0, 0.0);
        editor.update_element(
            id,
            &ElementPatch {
                deletable: Some(false),
                ..ElementPatch::default()
            },
        );
        let before = editor.raw_elements().to_vec();

        editor.delete_elements(&[id]);
        assert_eq!(editor.raw_elements(), &before[..]);
    }

    #[test]
    fn test_noop_delete_spends_no_history_slot() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Heading, 0.0, 0.0);
        editor.update_element(
            id,
            &ElementPatch {
                deletable: Some(false),
                ..ElementPatch::default()
            },
        );

        editor.delete_elements(&[id, Uuid::new_v4()]);

        // One undo steps straight back over the protection patch; the
        // do-nothing delete recorded no snapshot of its own.
        editor.undo();
        assert!(editor.element(id).unwrap().deletable);
    }

    #[test]
    fn test_duplicate_offsets_base_only() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Heading, 100.0, 100.0);
        editor.generate_breakpoint_positions(ViewportMode::Mobile, 375.0);
        let source_mobile = editor
            .element(id)
            .unwrap()
            .breakpoints
            .get(&ViewportMode::Mobile)
            .copied()
            .unwrap();

        editor.duplicate_elements(&[id]);
        assert_eq!(editor.len(), 2);

        let copy_id = *editor.selected_ids().iter().next().unwrap();
        assert_ne!(copy_id, id);
        assert_eq!(editor.selected_ids().len(), 1);

        let copy = editor.element(copy_id).unwrap();
        assert_eq!(copy.x, 120.0);
        assert_eq!(copy.y, 120.0);
        assert!(copy.deletable);
        // Breakpoint overrides are copied unshifted.
        assert_eq!(
            copy.breakpoints.get(&ViewportMode::Mobile),
            Some(&source_mobile)
        );
    }

    #[test]
    fn test_duplicate_skips_protected() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Heading, 0.0, 0.0);
        editor.update_element(
            id,
            &ElementPatch {
                deletable: Some(false),
                ..ElementPatch::default()
            },
        );
        editor.duplicate_elements(&[id]);
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn test_z_order_operations() {
        let mut editor = EditorState::new();
        let a = add_default(&mut editor, ElementKind::Heading, 0.0, 0.0);
        let b = add_default(&mut editor, ElementKind::Text, 0.0, 100.0);
        let c = add_default(&mut editor, ElementKind::Button, 0.0, 200.0);

        editor.bring_to_front(a);
        let order: Vec<ElementId> = editor.raw_elements().iter().map(|el| el.id).collect();
        assert_eq!(order, vec![b, c, a]);

        editor.send_to_back(c);
        let order: Vec<ElementId> = editor.raw_elements().iter().map(|el| el.id).collect();
        assert_eq!(order, vec![c, b, a]);

        editor.undo();
        let order: Vec<ElementId> = editor.raw_elements().iter().map(|el| el.id).collect();
        assert_eq!(order, vec![b, c, a]);
    }

    #[test]
    fn test_selection_toggle() {
        let mut editor = EditorState::new();
        let a = add_default(&mut editor, ElementKind::Heading, 0.0, 0.0);
        let b = add_default(&mut editor, ElementKind::Text, 0.0, 100.0);

        editor.select_element(a, false);
        assert_eq!(editor.selected_ids().len(), 1);

        editor.select_element(b, true);
        assert_eq!(editor.selected_ids().len(), 2);
        assert_eq!(editor.selected_elements().len(), 2);

        editor.select_element(b, true);
        assert_eq!(editor.selected_ids().len(), 1);
        assert!(editor.selected_ids().contains(&a));

        editor.select_all();
        assert_eq!(editor.selected_ids().len(), 2);
        editor.clear_selection();
        assert!(editor.selected_ids().is_empty());
    }

    #[test]
    fn test_toggle_lock_is_undoable() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Image, 0.0, 0.0);

        editor.toggle_lock(id);
        assert!(editor.element(id).unwrap().locked);
        editor.undo();
        assert!(!editor.element(id).unwrap().locked);
    }

    #[test]
    fn test_breakpoint_generation_is_idempotent_and_unrecorded() {
        let mut editor = EditorState::new();
        add_default(&mut editor, ElementKind::Heading, 100.0, 100.0);
        add_default(&mut editor, ElementKind::Button, 100.0, 300.0);
        while editor.can_undo() {
            editor.undo();
        }
        editor.redo();
        editor.redo();

        editor.generate_breakpoint_positions(ViewportMode::Tablet, 768.0);
        let first = editor.raw_elements().to_vec();

        editor.generate_breakpoint_positions(ViewportMode::Tablet, 768.0);
        assert_eq!(editor.raw_elements(), &first[..]);

        // Viewport switching never lands in history: undo steps past it to
        // the element additions.
        editor.undo();
        assert_eq!(editor.len(), 1);
        assert!(editor
            .raw_elements()
            .iter()
            .all(|el| !el.breakpoints.contains_key(&ViewportMode::Tablet)));
    }

    #[test]
    fn test_desktop_generation_is_a_no_op() {
        let mut editor = EditorState::new();
        add_default(&mut editor, ElementKind::Heading, 100.0, 100.0);
        let before = editor.raw_elements().to_vec();
        editor.generate_breakpoint_positions(ViewportMode::Desktop, 1200.0);
        assert_eq!(editor.raw_elements(), &before[..]);
    }

    #[test]
    fn test_mobile_generation_end_to_end() {
        let mut editor = EditorState::new();
        let heading = add_default(&mut editor, ElementKind::Heading, 100.0, 100.0);
        let button = add_default(&mut editor, ElementKind::Button, 100.0, 300.0);

        editor.generate_breakpoint_positions(ViewportMode::Mobile, 375.0);

        let h = editor
            .element(heading)
            .unwrap()
            .breakpoints
            .get(&ViewportMode::Mobile)
            .copied()
            .unwrap();
        assert_eq!(h.y, PADDING);
        assert_eq!(h.width, 335.0);
        assert_eq!(h.x, 20.0);

        let b = editor
            .element(button)
            .unwrap()
            .breakpoints
            .get(&ViewportMode::Mobile)
            .copied()
            .unwrap();
        assert_eq!(b.y, PADDING + 60.0 + PADDING);
        assert_eq!(b.x, (375.0 - 160.0) / 2.0);

        // The projected view serves the synthesized geometry.
        let projected = editor.elements_for_viewport(ViewportMode::Mobile);
        assert_eq!(projected[0].geometry, h);
        assert_eq!(projected[1].geometry, b);
        // Desktop projection is untouched.
        let desktop = editor.elements_for_viewport(ViewportMode::Desktop);
        assert_eq!(desktop[0].geometry.x, 100.0);
    }

    #[test]
    fn test_set_page_elements_resets_history_and_selection() {
        let mut editor = EditorState::new();
        let id = add_default(&mut editor, ElementKind::Heading, 0.0, 0.0);
        editor.select_element(id, false);

        let replacement = vec![Element::with_defaults(ElementKind::Divider)];
        editor.set_page_elements(replacement.clone());

        assert_eq!(editor.raw_elements(), &replacement[..]);
        assert!(editor.selected_ids().is_empty());
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
    }

    #[test]
    fn test_spatial_queries_use_resolved_geometry() {
        let mut editor = EditorState::new();
        let below = add_default(&mut editor, ElementKind::Image, 100.0, 100.0);
        let above = add_default(&mut editor, ElementKind::Image, 150.0, 150.0);

        let hits = editor.elements_at_point(Point::new(200.0, 200.0), ViewportMode::Desktop);
        assert_eq!(hits, vec![above, below]);

        let hits = editor.elements_at_point(Point::new(120.0, 120.0), ViewportMode::Desktop);
        assert_eq!(hits, vec![below]);

        let marquee = editor.elements_in_rect(
            Rect::new(0.0, 0.0, 130.0, 130.0),
            ViewportMode::Desktop,
        );
        assert_eq!(marquee, vec![below]);

        let bounds = editor.bounds(ViewportMode::Desktop).unwrap();
        assert_eq!(bounds, Rect::new(100.0, 100.0, 450.0, 350.0));
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let mut editor = EditorState::new();
        add_default(&mut editor, ElementKind::Heading, 0.0, 0.0);
        let before = editor.raw_elements().to_vec();
        let ghost = Uuid::new_v4();

        editor.update_position(ghost, 1.0, 1.0, ViewportMode::Desktop);
        editor.update_size(ghost, 1.0, 1.0, true, ViewportMode::Desktop);
        editor.toggle_lock(ghost);
        editor.bring_to_front(ghost);
        editor.send_to_back(ghost);
        editor.update_properties(ghost, Map::new());
        editor.update_element(ghost, &ElementPatch::default());

        assert_eq!(editor.raw_elements(), &before[..]);
    }
}
