//! Plan and element data model.
//!
//! [`PlanDocument`] is a passive store: it owns a [`Plan`] and its ordered
//! elements, applies field-by-field merges, and knows nothing about pointers
//! or grid pitch. Snapping is the caller's job.

use crate::color::SerializableColor;
use crate::registry::{self, ElementTypeDescriptor};
use crate::snap::DEFAULT_GRID_SIZE;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Errors produced by plan mutations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("element not found: {0}")]
    NotFound(ElementId),
    #[error("invalid {field}: {value} (must be greater than zero)")]
    InvalidDimension { field: &'static str, value: f64 },
    #[error("invalid {field}: {value} (must be finite)")]
    NotFinite { field: &'static str, value: f64 },
    #[error("plan is read-only")]
    ReadOnly,
}

/// Errors produced when reading a serialized [`PlanDocument`].
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Result type for plan mutations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Occupancy status of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

impl Status {
    /// Indicator color for this status.
    pub fn color(self) -> SerializableColor {
        match self {
            Status::Available => SerializableColor::rgb(0x10, 0xb9, 0x81),
            Status::Occupied => SerializableColor::rgb(0xef, 0x44, 0x44),
            Status::Reserved => SerializableColor::rgb(0xf5, 0x9e, 0x0b),
            Status::Maintenance => SerializableColor::rgb(0x6b, 0x72, 0x80),
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Status::Available => "Disponible",
            Status::Occupied => "Occupé",
            Status::Reserved => "Réservé",
            Status::Maintenance => "Maintenance",
        }
    }
}

/// Display properties attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementProperties {
    /// Overrides the catalog color when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SerializableColor>,
}

impl ElementProperties {
    pub fn with_color(color: SerializableColor) -> Self {
        Self { color: Some(color) }
    }
}

/// The bounded canvas and its global settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub background_color: SerializableColor,
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

fn default_grid_size() -> u32 {
    DEFAULT_GRID_SIZE
}

impl Default for Plan {
    fn default() -> Self {
        Self::new("Nouveau Plan")
    }
}

impl Plan {
    /// Create an unsaved plan with the product defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: format!("local-{}", Uuid::new_v4()),
            name: name.into(),
            description: String::new(),
            width: 1200,
            height: 800,
            background_color: SerializableColor::rgb(0xf8, 0xfa, 0xfc),
            grid_size: DEFAULT_GRID_SIZE,
            created_by: None,
        }
    }

    /// Check that the canvas has an extent and the grid a pitch.
    pub fn validate(&self) -> PlanResult<()> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("grid_size", self.grid_size),
        ] {
            if value == 0 {
                return Err(PlanError::InvalidDimension {
                    field,
                    value: f64::from(value),
                });
            }
        }
        Ok(())
    }

    /// Apply a settings patch. Either every field is applied or none is.
    pub fn apply_settings(&mut self, settings: &PlanSettings) -> PlanResult<()> {
        let width = settings.width.map(|v| positive("width", v)).transpose()?;
        let height = settings.height.map(|v| positive("height", v)).transpose()?;
        let grid_size = settings
            .grid_size
            .map(|v| positive("grid_size", v))
            .transpose()?;

        if let Some(name) = &settings.name {
            self.name.clone_from(name);
        }
        if let Some(description) = &settings.description {
            self.description.clone_from(description);
        }
        if let Some(width) = width {
            self.width = width;
        }
        if let Some(height) = height {
            self.height = height;
        }
        if let Some(color) = settings.background_color {
            self.background_color = color;
        }
        if let Some(grid_size) = grid_size {
            self.grid_size = grid_size;
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: i64) -> PlanResult<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or(PlanError::InvalidDimension {
            field,
            value: value as f64,
        })
}

/// Partial update of plan settings. Unset fields keep their value.
///
/// Dimensions are signed so that bad user input reaches validation instead
/// of failing to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<i64>,
}

/// Fields of an element that does not have an identifier yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub element_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: i64,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub properties: ElementProperties,
}

impl ElementDraft {
    /// A draft at `position` using the catalog defaults for `element_type`.
    pub fn from_type(element_type: &str, name: impl Into<String>, position: Point) -> Self {
        let descriptor = registry::describe(element_type);
        Self {
            name: name.into(),
            element_type: element_type.to_string(),
            x: position.x,
            y: position.y,
            width: descriptor.default_width,
            height: descriptor.default_height,
            rotation: 0,
            status: Status::Available,
            assigned_to: None,
            properties: ElementProperties::with_color(descriptor.color),
        }
    }
}

/// A placed, typed, positioned object on a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub name: String,
    #[serde(rename = "type")]
    pub element_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: i64,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub properties: ElementProperties,
}

impl Element {
    pub fn from_draft(id: ElementId, draft: ElementDraft) -> Self {
        Self {
            id,
            name: draft.name,
            element_type: draft.element_type,
            x: draft.x,
            y: draft.y,
            width: draft.width,
            height: draft.height,
            rotation: draft.rotation,
            status: draft.status,
            assigned_to: draft.assigned_to,
            properties: draft.properties,
        }
    }

    /// Every field except the identifier.
    pub fn to_draft(&self) -> ElementDraft {
        ElementDraft {
            name: self.name.clone(),
            element_type: self.element_type.clone(),
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            status: self.status,
            assigned_to: self.assigned_to.clone(),
            properties: self.properties,
        }
    }

    pub fn descriptor(&self) -> &'static ElementTypeDescriptor {
        registry::describe(&self.element_type)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Rotation normalized into `0..360` for display.
    pub fn display_rotation(&self) -> i64 {
        self.rotation.rem_euclid(360)
    }

    /// Properties color, else the catalog color.
    pub fn fill_color(&self) -> SerializableColor {
        self.properties
            .color
            .unwrap_or_else(|| self.descriptor().color)
    }

    /// Merge a patch into this element.
    fn apply(&mut self, patch: &ElementPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(element_type) = &patch.element_type {
            self.element_type.clone_from(element_type);
        }
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
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(assigned_to) = &patch.assigned_to {
            self.assigned_to = (!assigned_to.is_empty()).then(|| assigned_to.clone());
        }
        if let Some(properties) = patch.properties {
            self.properties = properties;
        }
    }
}

/// Sparse update for an element. Only present fields are applied.
///
/// An empty `assigned_to` clears the assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ElementProperties>,
}

impl ElementPatch {
    pub fn position(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Default::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
            ..Default::default()
        }
    }

    pub fn rotation(rotation: i64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn validate(&self) -> PlanResult<()> {
        for (field, value) in [("x", self.x), ("y", self.y)] {
            if let Some(value) = value {
                check_coordinate(field, value)?;
            }
        }
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if let Some(value) = value {
                check_extent(field, value)?;
            }
        }
        Ok(())
    }
}

fn check_coordinate(field: &'static str, value: f64) -> PlanResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PlanError::NotFinite { field, value })
    }
}

fn check_extent(field: &'static str, value: f64) -> PlanResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PlanError::InvalidDimension { field, value })
    }
}

/// A plan together with its elements in paint order (last = topmost).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub plan: Plan,
    #[serde(default)]
    elements: Vec<Element>,
}

impl Default for PlanDocument {
    fn default() -> Self {
        Self::new(Plan::default())
    }
}

impl PlanDocument {
    /// Create an empty document for a plan.
    pub fn new(plan: Plan) -> Self {
        Self {
            plan,
            elements: Vec::new(),
        }
    }

    /// Create a document from a plan and its already-persisted elements.
    pub fn with_elements(plan: Plan, elements: Vec<Element>) -> PlanResult<Self> {
        plan.validate()?;
        Ok(Self { plan, elements })
    }

    /// Elements in paint order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a new element on top, synthesizing an identifier.
    pub fn add_element(&mut self, draft: ElementDraft) -> PlanResult<&Element> {
        self.insert_element(Uuid::new_v4(), draft)
    }

    /// Append a new element on top with a caller-provided identifier.
    pub fn insert_element(&mut self, id: ElementId, draft: ElementDraft) -> PlanResult<&Element> {
        check_coordinate("x", draft.x)?;
        check_coordinate("y", draft.y)?;
        check_extent("width", draft.width)?;
        check_extent("height", draft.height)?;
        self.elements.push(Element::from_draft(id, draft));
        Ok(&self.elements[self.elements.len() - 1])
    }

    /// Merge `patch` into the element with `id`.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> PlanResult<&Element> {
        patch.validate()?;
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(PlanError::NotFound(id))?;
        element.apply(patch);
        Ok(&*element)
    }

    /// Remove the element with `id`.
    pub fn remove_element(&mut self, id: ElementId) -> PlanResult<Element> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or(PlanError::NotFound(id))?;
        Ok(self.elements.remove(index))
    }

    /// Replace an element's identifier, keeping its paint position.
    pub fn replace_id(&mut self, old: ElementId, new: ElementId) -> PlanResult<()> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id == old)
            .ok_or(PlanError::NotFound(old))?;
        element.id = new;
        Ok(())
    }

    /// Apply a settings patch to the plan; invalid dimensions leave it untouched.
    pub fn update_plan_settings(&mut self, settings: &PlanSettings) -> PlanResult<&Plan> {
        self.plan.apply_settings(settings)?;
        Ok(&self.plan)
    }

    /// Current grid pitch, read at the moment of use.
    pub fn grid_size(&self) -> u32 {
        self.plan.grid_size
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON, rejecting plans without an extent or pitch.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: Self = serde_json::from_str(json)?;
        document.plan.validate()?;
        Ok(document)
    }
}
