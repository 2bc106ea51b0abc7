//! Furniture shapes.

use super::{BODY_RADIUS, Geometry, OUTLINE_COLOR, Paint, Primitive, ShapeContext};
use kurbo::{BezPath, Ellipse, Point, Rect, Vec2};
use std::f64::consts::{FRAC_PI_2, TAU};

const DESK_TOP_INSET: f64 = 6.0;
const DESK_LEG_SIZE: f64 = 6.0;
const TABLE_MARGIN: f64 = 12.0;
const MIN_TABLE_CHAIRS: usize = 4;
const MAX_TABLE_CHAIRS: usize = 12;
const CHAIR_SPACING: f64 = 40.0;

/// Outer body, inset top surface, and four leg marks at the corners.
pub(super) fn desk(ctx: &ShapeContext) -> Vec<Primitive> {
    let top = ctx.inset(DESK_TOP_INSET);
    let leg = DESK_LEG_SIZE.min(ctx.size.width / 4.0).min(ctx.size.height / 4.0);
    let leg_paint = Paint::fill(ctx.color.darken(0.3));

    let mut primitives = vec![
        ctx.body(),
        Primitive::rect(top, BODY_RADIUS / 2.0, Paint::fill(ctx.color.lighten(0.25))),
    ];
    let bounds = ctx.bounds();
    primitives.extend(
        [
            Point::new(bounds.x0, bounds.y0),
            Point::new(bounds.x1 - leg, bounds.y0),
            Point::new(bounds.x0, bounds.y1 - leg),
            Point::new(bounds.x1 - leg, bounds.y1 - leg),
        ]
        .into_iter()
        .map(|origin| Primitive::rect(Rect::from_origin_size(origin, (leg, leg)), 0.0, leg_paint)),
    );
    primitives
}

/// Seat with a backrest along the top edge.
pub(super) fn chair(ctx: &ShapeContext) -> Vec<Primitive> {
    let bounds = ctx.bounds();
    let back_depth = ctx.size.height / 4.0;
    let back = Rect::new(bounds.x0, bounds.y0, bounds.x1, bounds.y0 + back_depth);
    vec![
        ctx.body(),
        Primitive::rect(back, BODY_RADIUS, Paint::fill(ctx.color.darken(0.25))),
    ]
}

/// Number of chairs drawn around a table of this size.
pub(super) fn table_chair_count(width: f64, height: f64) -> usize {
    let estimate = ((width + height) / CHAIR_SPACING).round();
    (estimate.max(0.0) as usize).clamp(MIN_TABLE_CHAIRS, MAX_TABLE_CHAIRS)
}

/// Ellipse with chairs spaced evenly by angle around it, starting at the top.
pub(super) fn meeting_table(ctx: &ShapeContext) -> Vec<Primitive> {
    let Vec2 { x: w, y: h } = ctx.size.to_vec2();
    let margin = TABLE_MARGIN.min(w / 4.0).min(h / 4.0);
    let center = Point::new(w / 2.0, h / 2.0);

    let table = Ellipse::new(center, (w / 2.0 - margin, h / 2.0 - margin), 0.0);
    let mut primitives = vec![Primitive::new(
        Geometry::Ellipse(table),
        Paint::fill(ctx.color).with_stroke(OUTLINE_COLOR, 1.0),
    )];

    let chairs = table_chair_count(w, h);
    let orbit = Vec2::new(w / 2.0 - margin / 2.0, h / 2.0 - margin / 2.0);
    let chair_paint = Paint::fill(ctx.color.darken(0.2)).with_stroke(OUTLINE_COLOR, 1.0);
    primitives.extend((0..chairs).map(|i| {
        let angle = TAU * i as f64 / chairs as f64 - FRAC_PI_2;
        let position = center + Vec2::new(orbit.x * angle.cos(), orbit.y * angle.sin());
        Primitive::circle(position, margin * 0.4, chair_paint)
    }));
    primitives
}

/// Body with a paper tray at the top and an output slot.
pub(super) fn printer(ctx: &ShapeContext) -> Vec<Primitive> {
    let bounds = ctx.bounds();
    let tray = Rect::new(
        bounds.x0 + bounds.width() * 0.2,
        bounds.y0,
        bounds.x1 - bounds.width() * 0.2,
        bounds.y0 + bounds.height() * 0.25,
    );
    let slot_y = bounds.y0 + bounds.height() * 0.65;
    vec![
        ctx.body(),
        Primitive::rect(tray, 1.0, Paint::fill(ctx.color.lighten(0.6))),
        Primitive::line(
            Point::new(bounds.x0 + bounds.width() * 0.25, slot_y),
            Point::new(bounds.x1 - bounds.width() * 0.25, slot_y),
            Paint::stroke(ctx.color.darken(0.4), 2.0),
        ),
    ]
}

/// A pot with two overlapping leaves rising from it.
pub(super) fn plant(ctx: &ShapeContext) -> Vec<Primitive> {
    let Vec2 { x: w, y: h } = ctx.size.to_vec2();
    let pot_top = h * 0.6;

    let mut pot = BezPath::new();
    pot.move_to((w * 0.25, pot_top));
    pot.line_to((w * 0.75, pot_top));
    pot.line_to((w * 0.65, h));
    pot.line_to((w * 0.35, h));
    pot.close_path();

    let stem = Point::new(w / 2.0, pot_top);
    let leaf = |tip: Point, bulge: f64| {
        let mut path = BezPath::new();
        path.move_to(stem);
        path.quad_to(Point::new(tip.x + bulge, (stem.y + tip.y) / 2.0), tip);
        path.quad_to(Point::new(tip.x - bulge, (stem.y + tip.y) / 2.0), stem);
        path.close_path();
        path
    };

    let pot_paint = Paint::fill(ctx.color.darken(0.5)).with_stroke(OUTLINE_COLOR, 1.0);
    vec![
        Primitive::new(Geometry::Path(pot), pot_paint),
        Primitive::new(
            Geometry::Path(leaf(Point::new(w * 0.25, 0.0), -w * 0.2)),
            Paint::fill(ctx.color),
        ),
        Primitive::new(
            Geometry::Path(leaf(Point::new(w * 0.75, h * 0.1), w * 0.2)),
            Paint::fill(ctx.color.lighten(0.2)),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_chair_count_clamped() {
        assert_eq!(table_chair_count(20.0, 20.0), 4);
        assert_eq!(table_chair_count(200.0, 150.0), 9);
        assert_eq!(table_chair_count(5000.0, 5000.0), 12);
    }

    #[test]
    fn test_chairs_sit_on_orbit() {
        let ctx = ShapeContext {
            size: kurbo::Size::new(160.0, 100.0),
            color: crate::color::SerializableColor::rgb(0xa7, 0x8b, 0xfa),
        };
        let primitives = meeting_table(&ctx);
        let Geometry::Circle(first) = primitives[1].geometry else {
            panic!("expected chair");
        };
        // First chair is at the top, centered horizontally.
        assert!((first.center.x - 80.0).abs() < 1e-9);
        assert!((first.center.y - 6.0).abs() < 1e-9);
    }
}
