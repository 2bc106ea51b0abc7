//! Element shape rendering.
//!
//! [`render`] turns an element into a list of primitives in the element's
//! local frame (origin at its top-left corner, unrotated). It looks only at
//! the element's type, size, name, status and color, so the same element
//! always yields the same drawing regardless of selection or drag state.

mod areas;
mod furniture;
mod structure;

use crate::color::SerializableColor;
use crate::plan::{Element, Status};
use crate::registry::ShapeKey;
use crate::selection::{self, HandleKind};
use kurbo::{BezPath, Circle, Ellipse, Line, Point, Rect, RoundedRect, Size};

/// Corner radius of element bodies.
pub const BODY_RADIUS: f64 = 4.0;
/// Default outline of element bodies.
pub const OUTLINE_COLOR: SerializableColor = SerializableColor::rgb(0x64, 0x74, 0x8b);
/// Selection accent.
pub const SELECTION_COLOR: SerializableColor = SerializableColor::rgb(0x1d, 0x4e, 0xd8);
/// Font size of element labels.
pub const LABEL_FONT_SIZE: f64 = 12.0;

const STATUS_BADGE_RADIUS: f64 = 6.0;
const STATUS_BADGE_INSET: f64 = 10.0;
const RESIZE_HANDLE_SIZE: f64 = 10.0;

/// Something to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rect(RoundedRect),
    Ellipse(Ellipse),
    Circle(Circle),
    Line(Line),
    Path(BezPath),
    /// Text centered on `anchor`.
    Text {
        anchor: Point,
        content: String,
        font_size: f64,
        font_weight: u16,
    },
}

/// Outline style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: SerializableColor,
    pub width: f64,
    /// Dash and gap lengths.
    pub dash: Option<[f64; 2]>,
}

/// How a geometry is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub fill: Option<SerializableColor>,
    pub stroke: Option<Stroke>,
    pub opacity: f64,
}

impl Paint {
    pub fn fill(color: SerializableColor) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn stroke(color: SerializableColor, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(Stroke {
                color,
                width,
                dash: None,
            }),
            opacity: 1.0,
        }
    }

    pub fn with_stroke(mut self, color: SerializableColor, width: f64) -> Self {
        self.stroke = Some(Stroke {
            color,
            width,
            dash: None,
        });
        self
    }

    pub fn dashed(mut self, dash: [f64; 2]) -> Self {
        if let Some(stroke) = &mut self.stroke {
            stroke.dash = Some(dash);
        }
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// A geometry with its paint.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub geometry: Geometry,
    pub paint: Paint,
}

impl Primitive {
    pub fn new(geometry: Geometry, paint: Paint) -> Self {
        Self { geometry, paint }
    }

    fn rect(rect: Rect, radius: f64, paint: Paint) -> Self {
        Self::new(Geometry::Rect(rect.to_rounded_rect(radius)), paint)
    }

    fn circle(center: Point, radius: f64, paint: Paint) -> Self {
        Self::new(Geometry::Circle(Circle::new(center, radius)), paint)
    }

    fn line(p0: Point, p1: Point, paint: Paint) -> Self {
        Self::new(Geometry::Line(Line::new(p0, p1)), paint)
    }

    fn with_opacity(mut self, opacity: f64) -> Self {
        self.paint.opacity = opacity;
        self
    }
}

/// Inputs shared by every shape routine.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShapeContext {
    pub size: Size,
    pub color: SerializableColor,
}

impl ShapeContext {
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size)
    }

    /// The standard outlined, rounded body.
    pub fn body(&self) -> Primitive {
        Primitive::rect(
            self.bounds(),
            BODY_RADIUS,
            Paint::fill(self.color).with_stroke(OUTLINE_COLOR, 1.0),
        )
    }

    /// Inset that never collapses the rect.
    pub fn inset(&self, amount: f64) -> Rect {
        let amount = amount.min(self.size.width / 4.0).min(self.size.height / 4.0);
        self.bounds().inset(-amount)
    }
}

/// Complete drawing of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDrawing {
    pub body: Vec<Primitive>,
    pub label: Primitive,
    pub status_badge: Option<Primitive>,
}

impl ElementDrawing {
    /// All primitives in paint order.
    pub fn into_primitives(self) -> Vec<Primitive> {
        let mut primitives = self.body;
        primitives.push(self.label);
        primitives.extend(self.status_badge);
        primitives
    }
}

/// Opacity of an element body.
pub fn body_opacity(status: Status) -> f64 {
    if status == Status::Maintenance { 0.5 } else { 0.8 }
}

/// Render an element in its local frame.
pub fn render(element: &Element) -> ElementDrawing {
    let ctx = ShapeContext {
        size: element.size(),
        color: element.fill_color(),
    };
    let opacity = body_opacity(element.status);
    let body = shape_primitives(element.descriptor().shape, &ctx)
        .into_iter()
        .map(|p| p.with_opacity(opacity))
        .collect();

    ElementDrawing {
        body,
        label: label(element),
        status_badge: status_badge(element),
    }
}

fn shape_primitives(shape: ShapeKey, ctx: &ShapeContext) -> Vec<Primitive> {
    match shape {
        ShapeKey::Desk => furniture::desk(ctx),
        ShapeKey::Chair => furniture::chair(ctx),
        ShapeKey::MeetingTable => furniture::meeting_table(ctx),
        ShapeKey::Printer => furniture::printer(ctx),
        ShapeKey::Plant => furniture::plant(ctx),
        ShapeKey::Wall => structure::wall(ctx),
        ShapeKey::Door => structure::door(ctx),
        ShapeKey::Window => structure::window(ctx),
        ShapeKey::PhoneBooth => areas::phone_booth(ctx),
        ShapeKey::Lounge => areas::lounge(ctx),
        ShapeKey::Kitchen => areas::kitchen(ctx),
        ShapeKey::Generic => vec![ctx.body()],
    }
}

fn label(element: &Element) -> Primitive {
    Primitive::new(
        Geometry::Text {
            anchor: Point::new(element.width / 2.0, element.height / 2.0),
            content: element.name.clone(),
            font_size: LABEL_FONT_SIZE,
            font_weight: 500,
        },
        Paint::fill(SerializableColor::white()),
    )
}

fn status_badge(element: &Element) -> Option<Primitive> {
    if element.status == Status::Available {
        return None;
    }
    Some(Primitive::circle(
        Point::new(element.width - STATUS_BADGE_INSET, STATUS_BADGE_INSET),
        STATUS_BADGE_RADIUS,
        Paint::fill(element.status.color()).with_stroke(SerializableColor::white(), 2.0),
    ))
}

/// Selection decoration: a dashed outline, four corner handles and the
/// resize grip, in the element's local frame.
pub fn render_selection(size: Size) -> Vec<Primitive> {
    let outline = Primitive::rect(
        Rect::from_origin_size(Point::ZERO, size),
        0.0,
        Paint::stroke(SELECTION_COLOR, 2.0).dashed([4.0, 4.0]),
    );
    std::iter::once(outline)
        .chain(selection::handles(size).into_iter().map(|handle| match handle.kind {
            HandleKind::Corner(_) => Primitive::rect(
                handle.rect(),
                0.0,
                Paint::fill(SELECTION_COLOR).with_stroke(SerializableColor::white(), 1.0),
            ),
            HandleKind::Resize => Primitive::rect(
                Rect::from_center_size(handle.position, (RESIZE_HANDLE_SIZE, RESIZE_HANDLE_SIZE)),
                2.0,
                Paint::fill(SerializableColor::white()).with_stroke(SELECTION_COLOR, 2.0),
            ),
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ElementDraft;
    use uuid::Uuid;

    fn element(element_type: &str) -> Element {
        Element::from_draft(
            Uuid::new_v4(),
            ElementDraft::from_type(element_type, "Test", Point::new(60.0, 100.0)),
        )
    }

    fn count<F: Fn(&Geometry) -> bool>(drawing: &ElementDrawing, f: F) -> usize {
        drawing.body.iter().filter(|p| f(&p.geometry)).count()
    }

    #[test]
    fn test_render_is_idempotent() {
        for descriptor in crate::registry::all() {
            let e = element(descriptor.key);
            assert_eq!(render(&e), render(&e), "{}", descriptor.key);
            assert!(!render(&e).body.is_empty(), "{}", descriptor.key);
        }
    }

    #[test]
    fn test_desk_decomposition() {
        let drawing = render(&element("desk"));
        // Outer body, inset top and four legs.
        assert_eq!(drawing.body.len(), 6);
        assert!(matches!(drawing.body[0].geometry, Geometry::Rect(_)));
        assert_eq!(drawing.body[0].paint.fill.unwrap().to_hex(), "#3b82f6");
    }

    #[test]
    fn test_meeting_table_chairs() {
        let drawing = render(&element("meeting_table"));
        assert_eq!(count(&drawing, |g| matches!(g, Geometry::Ellipse(_))), 1);
        let chairs = count(&drawing, |g| matches!(g, Geometry::Circle(_)));
        assert!((4..=12).contains(&chairs), "{chairs} chairs");

        let mut huge = element("meeting_table");
        huge.width = 2000.0;
        huge.height = 2000.0;
        assert_eq!(count(&render(&huge), |g| matches!(g, Geometry::Circle(_))), 12);
    }

    #[test]
    fn test_plant_has_pot_and_two_leaves() {
        let drawing = render(&element("plant"));
        assert_eq!(count(&drawing, |g| matches!(g, Geometry::Path(_))), 3);
    }

    #[test]
    fn test_unknown_type_is_plain_rounded_rect() {
        let drawing = render(&element("hot_tub"));
        assert_eq!(drawing.body.len(), 1);
        let Geometry::Rect(rect) = &drawing.body[0].geometry else {
            panic!("expected a rect");
        };
        assert_eq!(rect.width(), 80.0);
    }

    #[test]
    fn test_status_badge_and_opacity() {
        let mut e = element("desk");
        assert!(render(&e).status_badge.is_none());
        assert_eq!(render(&e).body[0].paint.opacity, 0.8);

        e.status = Status::Maintenance;
        let drawing = render(&e);
        let badge = drawing.status_badge.unwrap();
        assert_eq!(badge.paint.fill.unwrap().to_hex(), "#6b7280");
        assert_eq!(badge.geometry, Geometry::Circle(Circle::new((110.0, 10.0), 6.0)));
        assert_eq!(drawing.body[0].paint.opacity, 0.5);
    }

    #[test]
    fn test_label_is_centered() {
        let drawing = render(&element("desk"));
        let Geometry::Text { anchor, content, .. } = &drawing.label.geometry else {
            panic!("expected text");
        };
        assert_eq!(*anchor, Point::new(60.0, 40.0));
        assert_eq!(content, "Test");
    }

    #[test]
    fn test_color_override() {
        let mut e = element("desk");
        e.properties.color = Some(SerializableColor::rgb(1, 2, 3));
        assert_eq!(render(&e).body[0].paint.fill, Some(SerializableColor::rgb(1, 2, 3)));
    }

    #[test]
    fn test_selection_decoration() {
        let primitives = render_selection(Size::new(120.0, 80.0));
        assert_eq!(primitives.len(), 6);
        assert_eq!(primitives[0].paint.stroke.unwrap().dash, Some([4.0, 4.0]));
        let grip = primitives.last().unwrap();
        assert_eq!(grip.paint.fill, Some(SerializableColor::white()));
    }

    #[test]
    fn test_tiny_elements_render() {
        for descriptor in crate::registry::all() {
            let mut e = element(descriptor.key);
            e.width = 1.0;
            e.height = 1.0;
            for p in render(&e).body {
                if let Geometry::Rect(r) = p.geometry {
                    assert!(r.width() >= 0.0 && r.height() >= 0.0, "{}", descriptor.key);
                }
            }
        }
    }
}
