use serde::{Deserialize, Serialize};

/// A 2D position in frame pixel space (origin top-left, Y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Interior angle at `b` formed by the rays `b -> a` and `b -> c`, in degrees.
///
/// Always in `[0, 180]`. Returns `0.0` if any point is missing, so callers
/// must not read a zero angle next to undetected landmarks as a closed joint.
pub fn angle_degrees(a: Option<Point>, b: Option<Point>, c: Option<Point>) -> f32 {
    let (Some(a), Some(b), Some(c)) = (a, b, c) else {
        return 0.0;
    };

    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let angle = radians.to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn right_angle() {
        let angle = angle_degrees(
            Some(Point::new(0.0, 10.0)),
            Some(Point::new(0.0, 0.0)),
            Some(Point::new(10.0, 0.0)),
        );
        assert!((angle - 90.0).abs() < EPS, "got {angle}");
    }

    #[test]
    fn straight_line_is_180() {
        let angle = angle_degrees(
            Some(Point::new(-5.0, 0.0)),
            Some(Point::new(0.0, 0.0)),
            Some(Point::new(5.0, 0.0)),
        );
        assert!((angle - 180.0).abs() < EPS, "got {angle}");
    }

    #[test]
    fn reflex_difference_is_folded() {
        // Rays at +170 and -170 degrees differ by 340 raw, 20 interior.
        let b = Point::new(0.0, 0.0);
        let a = Point::new(
            170f32.to_radians().cos() * 10.0,
            170f32.to_radians().sin() * 10.0,
        );
        let c = Point::new(
            (-170f32).to_radians().cos() * 10.0,
            (-170f32).to_radians().sin() * 10.0,
        );
        let angle = angle_degrees(Some(a), Some(b), Some(c));
        assert!((angle - 20.0).abs() < EPS, "got {angle}");
    }

    #[test]
    fn missing_point_yields_zero() {
        let p = Some(Point::new(1.0, 2.0));
        assert_eq!(angle_degrees(None, p, p), 0.0);
        assert_eq!(angle_degrees(p, None, p), 0.0);
        assert_eq!(angle_degrees(p, p, None), 0.0);
    }

    #[test]
    fn symmetric_and_bounded() {
        let points = [
            Point::new(3.0, 7.0),
            Point::new(-4.0, 1.5),
            Point::new(12.0, -9.0),
            Point::new(0.5, 0.5),
            Point::new(-8.0, -8.0),
        ];
        for a in points {
            for b in points {
                for c in points {
                    let forward = angle_degrees(Some(a), Some(b), Some(c));
                    let reverse = angle_degrees(Some(c), Some(b), Some(a));
                    assert!((forward - reverse).abs() < EPS);
                    assert!((0.0..=180.0).contains(&forward), "out of range: {forward}");
                }
            }
        }
    }
}
