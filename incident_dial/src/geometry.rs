//! Geometry module - angle mapping, polar conversion, and the wedge primitive
//!
//! Pure functions shared by the ray pipeline, the drawing layer, and pointer
//! hit testing. Angles follow the dial convention: degrees increase clockwise
//! with -90 at the top of the face, so minute 0 (midnight) renders straight up.

use nannou::prelude::*;

/// Radius of the ring the wedge feet sit on, in board units
pub const INNER_RADIUS: f32 = 333.0;

/// Half-extent of the board in board units; the layout fits this to the window
pub const BOARD_RADIUS: f32 = 600.0;

/// Map a minute-of-day onto the dial
///
/// Linear over the 1440-minute day with a -90 degree phase so midnight is at
/// the top. Periodic: `angle_from_minutes(m + 1440) == angle_from_minutes(m)`.
pub fn angle_from_minutes(minutes: u32) -> f32 {
    ((minutes % 1440) as f32 / 1440.0) * 360.0 - 90.0
}

/// Convert polar coordinates around `center` to a Cartesian point
///
/// The y term is negated so that the day runs clockwise on nannou's y-up
/// canvas. Stable for radius 0 and any angle.
pub fn polar_point(center: Point2, radius: f32, angle_deg: f32) -> Point2 {
    let a = angle_deg.to_radians();
    pt2(center.x + radius * a.cos(), center.y - radius * a.sin())
}

/// Build the three-point wedge for a ray
///
/// Two feet on the inner ring at half a spread either side of the center
/// angle, and an apex pushed `length` beyond the ring. `spread_deg = 0`
/// collapses to a needle, which is valid.
pub fn make_ray_path(center: Point2, angle_deg: f32, length: f32, spread_deg: f32) -> [Point2; 3] {
    let p1 = polar_point(center, INNER_RADIUS, angle_deg - spread_deg / 2.0);
    let p2 = polar_point(center, INNER_RADIUS + length, angle_deg);
    let p3 = polar_point(center, INNER_RADIUS, angle_deg + spread_deg / 2.0);
    [p1, p2, p3]
}

/// Test whether a point lies inside a wedge
///
/// Sign-of-cross-product triangle test. Degenerate (zero-area) wedges report
/// no hit so needles never swallow pointer clicks.
pub fn point_in_wedge(p: Point2, wedge: [Point2; 3]) -> bool {
    fn cross(o: Point2, a: Point2, b: Point2) -> f32 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    }

    let [a, b, c] = wedge;
    if cross(a, b, c).abs() <= f32::EPSILON {
        return false;
    }

    let d1 = cross(p, a, b);
    let d2 = cross(p, b, c);
    let d3 = cross(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// Apply the whole-chart view transform (zoom about `center`, then pan)
pub fn apply_view_transform(point: Point2, offset: Vec2, zoom: f32, center: Point2) -> Point2 {
    let relative = point - center;
    center + (relative * zoom) + offset
}

/// Invert the view transform, mapping a window point back into board space
///
/// `zoom` is never zero in practice since the controller clamps scale well
/// above it.
pub fn unapply_view_transform(point: Point2, offset: Vec2, zoom: f32, center: Point2) -> Point2 {
    let relative = point - center - offset;
    center + relative / zoom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_midnight_at_top() {
        assert_eq!(angle_from_minutes(0), -90.0);
    }

    #[test]
    fn test_angle_quarter_points() {
        // 06:00 points right, 12:00 down, 18:00 left
        assert!((angle_from_minutes(360) - 0.0).abs() < 0.001);
        assert!((angle_from_minutes(720) - 90.0).abs() < 0.001);
        assert!((angle_from_minutes(1080) - 180.0).abs() < 0.001);
    }

    #[test]
    fn test_angle_monotonic_over_day() {
        let mut prev = angle_from_minutes(0);
        for m in 1..1440 {
            let a = angle_from_minutes(m);
            assert!(a > prev, "angle must increase within a day (minute {})", m);
            prev = a;
        }
    }

    #[test]
    fn test_angle_periodic() {
        for m in [0, 1, 359, 720, 1439] {
            assert_eq!(angle_from_minutes(m), angle_from_minutes(m + 1440));
        }
    }

    #[test]
    fn test_polar_point_zero_radius() {
        let center = pt2(10.0, -4.0);
        for angle in [-90.0, 0.0, 45.0, 720.0] {
            let p = polar_point(center, 0.0, angle);
            assert!((p.x - center.x).abs() < 0.001);
            assert!((p.y - center.y).abs() < 0.001);
        }
    }

    #[test]
    fn test_polar_point_top_of_face() {
        let p = polar_point(pt2(0.0, 0.0), 100.0, -90.0);
        assert!(p.x.abs() < 0.001);
        assert!((p.y - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_path_shape() {
        let center = pt2(0.0, 0.0);
        let [p1, apex, p3] = make_ray_path(center, 0.0, 100.0, 4.0);

        // Feet sit on the inner ring, apex beyond it
        assert!((p1.distance(center) - INNER_RADIUS).abs() < 0.01);
        assert!((p3.distance(center) - INNER_RADIUS).abs() < 0.01);
        assert!((apex.distance(center) - (INNER_RADIUS + 100.0)).abs() < 0.01);

        // Feet straddle the center angle
        assert!(p1.y > 0.0 && p3.y < 0.0);
    }

    #[test]
    fn test_ray_path_zero_spread_is_needle() {
        let [p1, _, p3] = make_ray_path(pt2(0.0, 0.0), 30.0, 50.0, 0.0);
        assert!((p1.x - p3.x).abs() < 0.001);
        assert!((p1.y - p3.y).abs() < 0.001);
    }

    #[test]
    fn test_point_in_wedge() {
        let wedge = make_ray_path(pt2(0.0, 0.0), 0.0, 100.0, 6.0);
        let centroid = pt2(
            (wedge[0].x + wedge[1].x + wedge[2].x) / 3.0,
            (wedge[0].y + wedge[1].y + wedge[2].y) / 3.0,
        );

        assert!(point_in_wedge(centroid, wedge));
        assert!(!point_in_wedge(pt2(0.0, 0.0), wedge));
        assert!(!point_in_wedge(pt2(-INNER_RADIUS, 0.0), wedge));
    }

    #[test]
    fn test_needle_reports_no_hit() {
        let needle = make_ray_path(pt2(0.0, 0.0), 0.0, 100.0, 0.0);
        // Point exactly on the needle line
        assert!(!point_in_wedge(pt2(INNER_RADIUS + 10.0, 0.0), needle));
    }

    #[test]
    fn test_view_transform_round_trip() {
        let center = pt2(0.0, 0.0);
        let offset = vec2(40.0, -12.0);
        let p = pt2(120.0, 80.0);

        let out = apply_view_transform(p, offset, 2.5, center);
        let back = unapply_view_transform(out, offset, 2.5, center);

        assert!((back.x - p.x).abs() < 0.001);
        assert!((back.y - p.y).abs() < 0.001);
    }
}
