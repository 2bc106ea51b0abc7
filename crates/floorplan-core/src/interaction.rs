//! Pointer-driven interaction state machine.
//!
//! The [`Editor`] turns pointer events into plan mutations. It owns the
//! [`PlanDocument`], applies every mutation optimistically, and reports it
//! through an [`EditorListener`] so the surrounding application can forward
//! it to persistence.
//!
//! States: `Idle`, `ToolArmed(type)`, `Dragging` and `Resizing`. A drag or
//! resize is a gesture that holds a pointer capture for its whole
//! lifetime; dropping the gesture (commit, cancel, read-only switch or the
//! editor itself going away) always releases the capture.

use crate::config::EditorConfig;
use crate::input::{PointerButton, PointerEvent};
use crate::plan::{
    Element, ElementDraft, ElementId, ElementPatch, Plan, PlanDocument, PlanError, PlanResult,
    PlanSettings,
};
use crate::registry;
use crate::selection::{self, HitTarget};
use crate::snap::{snap_size, snap_to_grid};
use kurbo::{Point, Size, Vec2};
use std::borrow::Cow;
use std::cell::Cell;
use std::rc::Rc;

/// Callbacks fired after the editor has applied a local mutation.
///
/// Payloads are exactly what was applied: a draft for additions, the sparse
/// patch for updates. Remote mutations applied through the `apply_remote_*`
/// methods do not fire callbacks.
pub trait EditorListener {
    fn on_element_add(&mut self, _draft: &ElementDraft, _element: &Element) {}
    fn on_element_update(&mut self, _id: ElementId, _patch: &ElementPatch) {}
    fn on_element_delete(&mut self, _id: ElementId) {}
    fn on_plan_update(&mut self, _settings: &PlanSettings) {}
}

/// Listener that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl EditorListener for NoopListener {}

/// Shared pointer-capture flag.
///
/// The host routes global pointer moves to the editor only while the flag is
/// set. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture(Rc<Cell<bool>>);

impl PointerCapture {
    pub fn is_captured(&self) -> bool {
        self.0.get()
    }

    fn acquire(&self) -> CaptureGuard {
        self.0.set(true);
        CaptureGuard(Rc::clone(&self.0))
    }
}

/// Releases the pointer capture when dropped.
#[derive(Debug)]
struct CaptureGuard(Rc<Cell<bool>>);

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.0.set(false);
        log::trace!("pointer capture released");
    }
}

/// Public view of the controller state.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    ToolArmed(String),
    Dragging {
        element_id: ElementId,
        grab_offset: Vec2,
    },
    Resizing {
        element_id: ElementId,
        origin: Point,
    },
}

#[derive(Debug, Clone, Copy)]
enum GestureKind {
    Drag { grab_offset: Vec2, preview: Point },
    Resize { origin: Point, preview: Size },
}

/// One pointer-down to pointer-up interaction on an element.
#[derive(Debug)]
struct Gesture {
    element_id: ElementId,
    kind: GestureKind,
    /// The element as it was when the gesture started.
    start: Element,
    _capture: CaptureGuard,
}

impl Gesture {
    fn drag(start: Element, pointer: Point, capture: &PointerCapture) -> Self {
        let origin = start.position();
        Self {
            element_id: start.id,
            kind: GestureKind::Drag {
                grab_offset: pointer - origin,
                preview: origin,
            },
            start,
            _capture: capture.acquire(),
        }
    }

    fn resize(start: Element, capture: &PointerCapture) -> Self {
        Self {
            element_id: start.id,
            kind: GestureKind::Resize {
                origin: start.position(),
                preview: start.size(),
            },
            start,
            _capture: capture.acquire(),
        }
    }

    fn update(&mut self, pointer: Point, pitch: u32, min_size: f64) {
        match &mut self.kind {
            GestureKind::Drag {
                grab_offset,
                preview,
            } => {
                *preview = snap_to_grid(pointer - *grab_offset, pitch);
            }
            GestureKind::Resize { preview, .. } => {
                let local = selection::to_local(&self.start, pointer);
                *preview = snap_size(Size::new(local.x, local.y), pitch, min_size);
            }
        }
    }

    fn overlay(&self, element: &mut Element) {
        match self.kind {
            GestureKind::Drag { preview, .. } => {
                element.x = preview.x;
                element.y = preview.y;
            }
            GestureKind::Resize { preview, .. } => {
                element.width = preview.width;
                element.height = preview.height;
            }
        }
    }

    /// The patch to commit, or `None` when the preview equals the start value.
    fn pending_patch(&self) -> Option<ElementPatch> {
        match self.kind {
            GestureKind::Drag { preview, .. } => {
                (preview != self.start.position()).then(|| ElementPatch::position(preview))
            }
            GestureKind::Resize { preview, .. } => {
                (preview != self.start.size()).then(|| ElementPatch::size(preview))
            }
        }
    }

    fn state(&self) -> InteractionState {
        match self.kind {
            GestureKind::Drag { grab_offset, .. } => InteractionState::Dragging {
                element_id: self.element_id,
                grab_offset,
            },
            GestureKind::Resize { origin, .. } => InteractionState::Resizing {
                element_id: self.element_id,
                origin,
            },
        }
    }
}

#[derive(Debug, Default)]
enum Mode {
    #[default]
    Idle,
    ToolArmed(String),
    Gesture(Gesture),
}

/// The interactive editing core for a single plan.
pub struct Editor {
    document: PlanDocument,
    config: EditorConfig,
    selection: Option<ElementId>,
    read_only: bool,
    mode: Mode,
    capture: PointerCapture,
    listener: Box<dyn EditorListener>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("plan", &self.document.plan.id)
            .field("elements", &self.document.len())
            .field("selection", &self.selection)
            .field("read_only", &self.read_only)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Create an editor over a plan and its elements.
    pub fn new(plan: Plan, elements: Vec<Element>) -> PlanResult<Self> {
        Self::with_config(PlanDocument::with_elements(plan, elements)?, EditorConfig::default())
    }

    /// Fails if the plan has no extent or no grid pitch.
    pub fn with_config(document: PlanDocument, config: EditorConfig) -> PlanResult<Self> {
        document.plan.validate()?;
        Ok(Self {
            document,
            config,
            selection: None,
            read_only: false,
            mode: Mode::Idle,
            capture: PointerCapture::default(),
            listener: Box::new(NoopListener),
        })
    }

    pub fn set_listener(&mut self, listener: impl EditorListener + 'static) {
        self.listener = Box::new(listener);
    }

    pub fn document(&self) -> &PlanDocument {
        &self.document
    }

    pub fn plan(&self) -> &Plan {
        &self.document.plan
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    /// The selected element as currently displayed (live preview included).
    pub fn selected_element(&self) -> Option<Cow<'_, Element>> {
        self.selection.and_then(|id| self.element_view(id))
    }

    /// Select an element directly, or clear the selection with `None`.
    pub fn select_element(&mut self, id: Option<ElementId>) {
        self.selection = id.filter(|id| self.document.contains(*id));
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Toggle read-only mode. Entering it aborts any gesture and disarms the tool.
    pub fn set_read_only(&mut self, read_only: bool) {
        if read_only && !matches!(self.mode, Mode::Idle) {
            log::debug!("read-only: abandoning {:?}", self.state());
            self.mode = Mode::Idle;
        }
        self.read_only = read_only;
    }

    pub fn state(&self) -> InteractionState {
        match &self.mode {
            Mode::Idle => InteractionState::Idle,
            Mode::ToolArmed(element_type) => InteractionState::ToolArmed(element_type.clone()),
            Mode::Gesture(gesture) => gesture.state(),
        }
    }

    pub fn armed_tool(&self) -> Option<&str> {
        match &self.mode {
            Mode::ToolArmed(element_type) => Some(element_type),
            _ => None,
        }
    }

    /// Whether a gesture currently holds the pointer capture.
    pub fn has_pointer_capture(&self) -> bool {
        self.capture.is_captured()
    }

    /// A handle on the capture flag that outlives borrows of the editor.
    pub fn pointer_capture(&self) -> PointerCapture {
        self.capture.clone()
    }

    /// Arm a placement tool. Selecting the armed tool again disarms it.
    /// Only catalog types can be armed.
    pub fn select_tool(&mut self, element_type: &str) {
        if self.read_only {
            return;
        }
        if !registry::is_known(element_type) {
            log::warn!("no tool for element type '{element_type}'");
            return;
        }
        self.mode = match &self.mode {
            Mode::ToolArmed(armed) if armed == element_type => Mode::Idle,
            Mode::Gesture(_) => {
                log::trace!("tool selection ignored during a gesture");
                return;
            }
            _ => Mode::ToolArmed(element_type.to_string()),
        };
    }

    /// Route a raw pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: PointerButton::Primary,
            } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up {
                position,
                button: PointerButton::Primary,
            } => self.pointer_up(position),
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => {}
        }
    }

    pub fn pointer_down(&mut self, position: Point) {
        if self.read_only || matches!(self.mode, Mode::Gesture(_)) {
            return;
        }
        if !position.is_finite() {
            log::warn!("ignoring pointer down at {position:?}");
            return;
        }

        match selection::hit_test(&self.document, position, self.config.resize_hit_region) {
            Some(target) => self.begin_gesture(target, position),
            None => match std::mem::take(&mut self.mode) {
                Mode::ToolArmed(element_type) => self.place(&element_type, position),
                _ => self.selection = None,
            },
        }
    }

    pub fn pointer_move(&mut self, position: Point) {
        let pitch = self.document.grid_size();
        let min_size = self.config.min_element_size;
        if !position.is_finite() {
            log::trace!("ignoring pointer move to {position:?}");
            return;
        }
        if let Mode::Gesture(gesture) = &mut self.mode {
            gesture.update(position, pitch, min_size);
        }
    }

    /// Commit the current gesture. A release at a non-finite position aborts it.
    pub fn pointer_up(&mut self, position: Point) {
        let Some(mut gesture) = self.take_gesture() else {
            return;
        };
        if !position.is_finite() {
            log::warn!("aborting gesture on {}: release at {position:?}", gesture.element_id);
            return;
        }
        gesture.update(
            position,
            self.document.grid_size(),
            self.config.min_element_size,
        );
        let id = gesture.element_id;
        let patch = gesture.pending_patch();
        drop(gesture);

        match patch {
            Some(patch) => {
                log::debug!("committing gesture on {id}: {patch:?}");
                self.commit_update(id, patch);
            }
            None => log::trace!("gesture on {id} ended without change"),
        }
    }

    /// Abort the current gesture without committing its preview.
    pub fn cancel_gesture(&mut self) {
        if let Some(gesture) = self.take_gesture() {
            log::debug!("gesture on {} cancelled", gesture.element_id);
        }
    }

    /// End the current gesture, leaving an armed tool alone.
    fn take_gesture(&mut self) -> Option<Gesture> {
        if !matches!(self.mode, Mode::Gesture(_)) {
            return None;
        }
        match std::mem::take(&mut self.mode) {
            Mode::Gesture(gesture) => Some(gesture),
            _ => None,
        }
    }

    /// The element as it should be displayed, with any live preview applied.
    pub fn element_view(&self, id: ElementId) -> Option<Cow<'_, Element>> {
        self.document.get(id).map(|element| self.displayed(element))
    }

    /// Every element in paint order, with any live preview applied.
    pub fn displayed_elements(&self) -> impl Iterator<Item = Cow<'_, Element>> {
        self.document
            .elements()
            .iter()
            .map(|element| self.displayed(element))
    }

    fn displayed<'a>(&self, element: &'a Element) -> Cow<'a, Element> {
        match &self.mode {
            Mode::Gesture(gesture) if gesture.element_id == element.id => {
                let mut preview = element.clone();
                gesture.overlay(&mut preview);
                Cow::Owned(preview)
            }
            _ => Cow::Borrowed(element),
        }
    }

    /// Add `config.rotation_step` degrees to the selected element.
    ///
    /// Near the integer limit the stored angle is normalized first, which
    /// renders the same.
    pub fn rotate_selected(&mut self) -> Option<i64> {
        let element = self.editable_selection()?;
        let step = self.config.rotation_step;
        let rotation = element
            .rotation
            .checked_add(step)
            .unwrap_or_else(|| element.display_rotation().saturating_add(step));
        let id = element.id;
        self.commit_update(id, ElementPatch::rotation(rotation))
            .then_some(rotation)
    }

    /// Clone the selected element with an offset and a copy-suffixed name.
    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        let element = self.editable_selection()?;
        let mut draft = element.to_draft();
        draft.name.push_str(&self.config.copy_suffix);
        draft.x += self.config.duplicate_offset.x;
        draft.y += self.config.duplicate_offset.y;
        self.add_draft(draft)
    }

    /// Delete the selected element.
    pub fn delete_selected(&mut self) -> Option<Element> {
        let id = self.editable_selection()?.id;
        self.delete_element(id)
    }

    /// Delete any element. The selection is cleared only if it pointed at it.
    pub fn delete_element(&mut self, id: ElementId) -> Option<Element> {
        if self.read_only {
            return None;
        }
        match self.document.remove_element(id) {
            Ok(removed) => {
                if self.selection == Some(id) {
                    self.selection = None;
                }
                log::debug!("deleted element {id}");
                self.listener.on_element_delete(id);
                Some(removed)
            }
            Err(err) => {
                log::warn!("dropping delete: {err}");
                None
            }
        }
    }

    /// Apply a property edit from the selection panel.
    pub fn edit_element(&mut self, id: ElementId, patch: ElementPatch) -> PlanResult<()> {
        if self.read_only {
            return Err(PlanError::ReadOnly);
        }
        if patch.is_empty() {
            return Ok(());
        }
        self.document.update_element(id, &patch)?;
        self.listener.on_element_update(id, &patch);
        Ok(())
    }

    /// Edit plan settings. Invalid dimensions leave the plan untouched.
    pub fn update_plan_settings(&mut self, settings: &PlanSettings) -> PlanResult<()> {
        if self.read_only {
            return Err(PlanError::ReadOnly);
        }
        self.document.update_plan_settings(settings)?;
        self.listener.on_plan_update(settings);
        Ok(())
    }

    /// Replace a locally synthesized identifier with the persisted one.
    pub fn reconcile_element_id(&mut self, local: ElementId, server: ElementId) -> PlanResult<()> {
        self.document.replace_id(local, server)?;
        if self.selection == Some(local) {
            self.selection = Some(server);
        }
        if let Mode::Gesture(gesture) = &mut self.mode {
            if gesture.element_id == local {
                gesture.element_id = server;
                gesture.start.id = server;
            }
        }
        log::debug!("element {local} is now {server}");
        Ok(())
    }

    /// Replace the plan's metadata and settings with a persisted copy.
    /// Elements are left alone. No callback fires.
    pub fn apply_remote_plan(&mut self, plan: Plan) -> PlanResult<()> {
        plan.validate()?;
        self.document.plan = plan;
        Ok(())
    }

    /// Apply an element created elsewhere. No callback fires.
    pub fn apply_remote_add(&mut self, element: Element) -> PlanResult<()> {
        self.document
            .insert_element(element.id, element.to_draft())
            .map(|_| ())
    }

    /// Apply an update made elsewhere. No callback fires.
    pub fn apply_remote_update(&mut self, id: ElementId, patch: &ElementPatch) -> PlanResult<()> {
        self.document.update_element(id, patch).map(|_| ())
    }

    /// Apply a deletion made elsewhere. No callback fires.
    pub fn apply_remote_delete(&mut self, id: ElementId) -> PlanResult<Element> {
        let removed = self.document.remove_element(id)?;
        if self.selection == Some(id) {
            self.selection = None;
        }
        Ok(removed)
    }

    fn editable_selection(&self) -> Option<&Element> {
        if self.read_only {
            return None;
        }
        self.selection.and_then(|id| self.document.get(id))
    }

    fn begin_gesture(&mut self, target: HitTarget, position: Point) {
        let Some(element) = self.document.get(target.element_id()).cloned() else {
            return;
        };
        self.selection = Some(element.id);
        let gesture = match target {
            HitTarget::ResizeHandle(_) => Gesture::resize(element, &self.capture),
            HitTarget::Body(_) => Gesture::drag(element, position, &self.capture),
        };
        log::debug!("begin {:?}", gesture.state());
        self.mode = Mode::Gesture(gesture);
    }

    fn place(&mut self, element_type: &str, position: Point) {
        let descriptor = registry::describe(element_type);
        let name = format!("{} {}", descriptor.label, self.document.len() + 1);
        let at = snap_to_grid(position, self.document.grid_size());
        self.add_draft(ElementDraft::from_type(element_type, name, at));
    }

    fn add_draft(&mut self, draft: ElementDraft) -> Option<ElementId> {
        match self.document.add_element(draft.clone()) {
            Ok(element) => {
                log::debug!("added {} '{}' at ({}, {})", element.element_type, element.name, element.x, element.y);
                self.listener.on_element_add(&draft, element);
                Some(element.id)
            }
            Err(err) => {
                log::warn!("rejected new element: {err}");
                None
            }
        }
    }

    fn commit_update(&mut self, id: ElementId, patch: ElementPatch) -> bool {
        match self.document.update_element(id, &patch) {
            Ok(_) => {
                self.listener.on_element_update(id, &patch);
                true
            }
            Err(err) => {
                log::warn!("dropping update: {err}");
                false
            }
        }
    }
}
