//! Walls, doors and windows.

use super::{Geometry, OUTLINE_COLOR, Paint, Primitive, ShapeContext};
use crate::color::SerializableColor;
use kurbo::{Arc, Point, Shape as _, Vec2};
use std::f64::consts::FRAC_PI_2;

const PATH_TOLERANCE: f64 = 0.1;

/// Solid, square-cornered slab.
pub(super) fn wall(ctx: &ShapeContext) -> Vec<Primitive> {
    vec![Primitive::rect(
        ctx.bounds(),
        0.0,
        Paint::fill(ctx.color).with_stroke(ctx.color.darken(0.3), 1.0),
    )]
}

/// Door leaf hinged at the bottom-left corner with its swing arc.
pub(super) fn door(ctx: &ShapeContext) -> Vec<Primitive> {
    let Vec2 { x: w, y: h } = ctx.size.to_vec2();
    let hinge = Point::new(0.0, h);
    let swing = Arc {
        center: hinge,
        radii: Vec2::new(w, h),
        start_angle: -FRAC_PI_2,
        sweep_angle: FRAC_PI_2,
        x_rotation: 0.0,
    };
    vec![
        Primitive::rect(
            ctx.bounds(),
            0.0,
            Paint::fill(ctx.color.lighten(0.8)).with_stroke(OUTLINE_COLOR, 1.0),
        ),
        Primitive::line(hinge, Point::ZERO, Paint::stroke(ctx.color, 2.0)),
        Primitive::new(
            Geometry::Path(swing.to_path(PATH_TOLERANCE)),
            Paint::stroke(ctx.color, 1.0).dashed([3.0, 3.0]),
        ),
    ]
}

/// Frame with a glass pane line along the long axis.
pub(super) fn window(ctx: &ShapeContext) -> Vec<Primitive> {
    let bounds = ctx.bounds();
    let center = bounds.center();
    let (p0, p1) = if bounds.width() >= bounds.height() {
        (Point::new(bounds.x0, center.y), Point::new(bounds.x1, center.y))
    } else {
        (Point::new(center.x, bounds.y0), Point::new(center.x, bounds.y1))
    };
    vec![
        Primitive::rect(
            bounds,
            0.0,
            Paint::fill(SerializableColor::white()).with_stroke(ctx.color, 2.0),
        ),
        Primitive::line(p0, p1, Paint::stroke(ctx.color, 1.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{ParamCurve as _, PathEl, Size};

    fn ctx(width: f64, height: f64) -> ShapeContext {
        ShapeContext {
            size: Size::new(width, height),
            color: SerializableColor::rgb(0xa1, 0x62, 0x07),
        }
    }

    #[test]
    fn test_door_arc_spans_leaf_to_corner() {
        let primitives = door(&ctx(40.0, 40.0));
        let Geometry::Path(path) = &primitives[2].geometry else {
            panic!("expected swing arc");
        };
        let Some(PathEl::MoveTo(start)) = path.elements().first().copied() else {
            panic!("arc must start with a move");
        };
        assert!((start - Point::new(0.0, 0.0)).hypot() < 1e-6);
        let end = path.segments().last().unwrap().end();
        assert!((end - Point::new(40.0, 40.0)).hypot() < 1e-6);
    }

    #[test]
    fn test_window_pane_follows_long_axis() {
        let horizontal = window(&ctx(80.0, 10.0));
        assert_eq!(
            horizontal[1].geometry,
            Geometry::Line(kurbo::Line::new((0.0, 5.0), (80.0, 5.0)))
        );
        let vertical = window(&ctx(10.0, 80.0));
        assert_eq!(
            vertical[1].geometry,
            Geometry::Line(kurbo::Line::new((5.0, 0.0), (5.0, 80.0)))
        );
    }
}
