//! Room and zone shapes.

use super::{BODY_RADIUS, OUTLINE_COLOR, Paint, Primitive, ShapeContext};
use crate::color::SerializableColor;
use kurbo::{Point, Rect};

/// Cabin with an inner acoustic shell and a seat.
pub(super) fn phone_booth(ctx: &ShapeContext) -> Vec<Primitive> {
    let shell = ctx.inset(8.0);
    let seat_radius = shell.width().min(shell.height()) / 5.0;
    vec![
        ctx.body(),
        Primitive::rect(
            shell,
            BODY_RADIUS,
            Paint::fill(ctx.color.lighten(0.4)).with_stroke(ctx.color.darken(0.2), 1.0),
        ),
        Primitive::circle(
            Point::new(shell.center().x, shell.y1 - seat_radius * 1.5),
            seat_radius,
            Paint::fill(ctx.color.darken(0.3)),
        ),
    ]
}

/// Floor area with a sofa along the top edge, armrests, and a coffee table.
pub(super) fn lounge(ctx: &ShapeContext) -> Vec<Primitive> {
    let area = ctx.inset(8.0);
    let depth = area.height() / 4.0;
    let arm = area.width() / 10.0;
    let sofa = ctx.color.darken(0.25);

    let back = Rect::new(area.x0, area.y0, area.x1, area.y0 + depth);
    let left_arm = Rect::new(area.x0, area.y0, area.x0 + arm, area.y0 + depth * 2.0);
    let right_arm = Rect::new(area.x1 - arm, area.y0, area.x1, area.y0 + depth * 2.0);
    let table_center = Point::new(area.center().x, area.y1 - depth);

    vec![
        ctx.body(),
        Primitive::rect(back, BODY_RADIUS, Paint::fill(sofa)),
        Primitive::rect(left_arm, BODY_RADIUS, Paint::fill(sofa)),
        Primitive::rect(right_arm, BODY_RADIUS, Paint::fill(sofa)),
        Primitive::circle(
            table_center,
            depth * 0.6,
            Paint::fill(ctx.color.lighten(0.5)).with_stroke(OUTLINE_COLOR, 1.0),
        ),
    ]
}

/// Counter along the top edge holding a sink and two burners.
pub(super) fn kitchen(ctx: &ShapeContext) -> Vec<Primitive> {
    let area = ctx.inset(6.0);
    let counter = Rect::new(area.x0, area.y0, area.x1, area.y0 + area.height() / 3.0);
    let unit = counter.height() * 0.6;
    let cy = counter.center().y;

    let sink = Rect::from_center_size(Point::new(counter.x0 + counter.width() * 0.25, cy), (unit * 1.5, unit));
    let burner_paint = Paint::stroke(SerializableColor::rgb(0x33, 0x41, 0x55), 1.5);

    vec![
        ctx.body(),
        Primitive::rect(counter, 2.0, Paint::fill(ctx.color.lighten(0.6)).with_stroke(OUTLINE_COLOR, 1.0)),
        Primitive::rect(sink, unit / 4.0, Paint::fill(SerializableColor::rgb(0xcb, 0xd5, 0xe1))),
        Primitive::circle(Point::new(counter.x0 + counter.width() * 0.6, cy), unit / 2.0, burner_paint),
        Primitive::circle(Point::new(counter.x0 + counter.width() * 0.8, cy), unit / 2.0, burner_paint),
    ]
}
