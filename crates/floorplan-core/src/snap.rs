//! Grid snapping for placement, drag and resize.
//!
//! Snapping is round-to-nearest on each axis independently. The pitch is
//! always passed in by the caller so that a change to the plan's grid takes
//! effect on the very next operation.

use kurbo::{Point, Size};

/// Default grid pitch in plan pixels.
pub const DEFAULT_GRID_SIZE: u32 = 20;

/// Snap a single coordinate to the nearest multiple of `pitch`.
///
/// Ties are broken the way `f64::round_ties_even` does, so a coordinate
/// exactly between two grid lines lands on the even multiple.
/// A pitch of zero is treated as "no grid" and returns the input unchanged.
pub fn snap(coordinate: f64, pitch: u32) -> f64 {
    if pitch == 0 {
        return coordinate;
    }
    let pitch = f64::from(pitch);
    let snapped = (coordinate / pitch).round_ties_even() * pitch;
    // Avoid handing out -0.0 for coordinates just left of the origin.
    if snapped == 0.0 { 0.0 } else { snapped }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, pitch: u32) -> Point {
    Point::new(snap(point.x, pitch), snap(point.y, pitch))
}

/// Snap a size to the grid, never returning less than `min` on either axis.
///
/// The candidate is clamped to `min` first and snapped afterwards. When the
/// pitch is coarser than `min` the snapped value can fall back below it, so
/// the floor is applied once more.
pub fn snap_size(size: Size, pitch: u32, min: f64) -> Size {
    let axis = |v: f64| snap(v.max(min), pitch).max(min);
    Size::new(axis(size.width), axis(size.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_to_nearest() {
        assert_eq!(snap(53.0, 20), 60.0);
        assert_eq!(snap(107.0, 20), 100.0);
        assert_eq!(snap(9.9, 20), 0.0);
        assert_eq!(snap(-11.0, 20), -20.0);
    }

    #[test]
    fn test_snap_ties_to_even_multiple() {
        assert_eq!(snap(10.0, 20), 0.0);
        assert_eq!(snap(30.0, 20), 40.0);
        assert_eq!(snap(50.0, 20), 40.0);
    }

    #[test]
    fn test_snap_properties_hold_for_many_inputs() {
        for pitch in [1_u32, 7, 10, 20, 25, 50] {
            let p = f64::from(pitch);
            let mut x = -500.0;
            while x <= 500.0 {
                let s = snap(x, pitch);
                assert_eq!(s.rem_euclid(p), 0.0, "snap({x}, {pitch}) = {s}");
                assert!((s - x).abs() <= p / 2.0, "snap({x}, {pitch}) = {s}");
                x += 3.7;
            }
        }
    }

    #[test]
    fn test_snap_to_grid_point() {
        let p = snap_to_grid(Point::new(53.0, 107.0), 20);
        assert_eq!(p, Point::new(60.0, 100.0));
    }

    #[test]
    fn test_zero_pitch_is_identity() {
        assert_eq!(snap(13.3, 0), 13.3);
    }

    #[test]
    fn test_snap_size_floor() {
        assert_eq!(snap_size(Size::new(-40.0, 5.0), 20, 20.0), Size::new(20.0, 20.0));
        assert_eq!(snap_size(Size::new(133.0, 71.0), 20, 20.0), Size::new(140.0, 80.0));
        // 20 / 50 rounds to zero; the floor keeps the size positive.
        assert_eq!(snap_size(Size::new(10.0, 10.0), 50, 20.0), Size::new(20.0, 20.0));
    }
}
