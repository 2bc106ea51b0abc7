//! Element geometry, hit testing and selection handles.
//!
//! Elements live in plan space with their top-left corner at `(x, y)` and
//! are rotated about that corner. Hit testing maps the pointer back into the
//! element's local frame, where the body is simply `0..width × 0..height`.

use crate::plan::{Element, ElementId, PlanDocument};
use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Side of a selection handle square, in plan pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Corner position in element-local coordinates.
    pub fn position(self, size: Size) -> Point {
        match self {
            Corner::TopLeft => Point::ZERO,
            Corner::TopRight => Point::new(size.width, 0.0),
            Corner::BottomLeft => Point::new(0.0, size.height),
            Corner::BottomRight => Point::new(size.width, size.height),
        }
    }
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Decorative corner marker.
    Corner(Corner),
    /// The resize grip at the bottom-right corner.
    Resize,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Center, in element-local coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// The handle square, in element-local coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, (HANDLE_SIZE, HANDLE_SIZE))
    }
}

/// Handles drawn around a selected element: four corners, then the resize grip.
pub fn handles(size: Size) -> Vec<Handle> {
    let mut handles: Vec<Handle> = Corner::ALL
        .iter()
        .map(|&corner| Handle::new(corner.position(size), HandleKind::Corner(corner)))
        .collect();
    handles.push(Handle::new(
        Corner::BottomRight.position(size),
        HandleKind::Resize,
    ));
    handles
}

/// Transform from element-local space to plan space: translate, then rotate
/// about the element's own origin.
pub fn element_transform(element: &Element) -> Affine {
    Affine::translate(element.position().to_vec2())
        * Affine::rotate((element.display_rotation() as f64).to_radians())
}

/// Map a plan-space point into the element's local frame.
pub fn to_local(element: &Element, point: Point) -> Point {
    element_transform(element).inverse() * point
}

/// Whether `point` (plan space) lies on the element's body, edges included.
pub fn contains(element: &Element, point: Point) -> bool {
    let local = to_local(element, point);
    (0.0..=element.width).contains(&local.x) && (0.0..=element.height).contains(&local.y)
}

/// Whether `point` falls within `radius` of the element's bottom-right corner
/// on both local axes.
pub fn in_resize_region(element: &Element, point: Point, radius: f64) -> bool {
    let local = to_local(element, point);
    (local.x - element.width).abs() <= radius && (local.y - element.height).abs() <= radius
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The resize grip of an element.
    ResizeHandle(ElementId),
    /// The body of an element.
    Body(ElementId),
}

impl HitTarget {
    pub fn element_id(self) -> ElementId {
        match self {
            HitTarget::ResizeHandle(id) | HitTarget::Body(id) => id,
        }
    }
}

/// Find the topmost element under `point`. The resize region of an element
/// takes precedence over its body.
pub fn hit_test(document: &PlanDocument, point: Point, resize_radius: f64) -> Option<HitTarget> {
    document.elements().iter().rev().find_map(|element| {
        if in_resize_region(element, point, resize_radius) {
            Some(HitTarget::ResizeHandle(element.id))
        } else if contains(element, point) {
            Some(HitTarget::Body(element.id))
        } else {
            None
        }
    })
}
