// Math utilities for box geometry and mass properties

use rapier2d::prelude::{point, Point, Real};

/// Moment of inertia of a solid box about its centroid
pub fn moment_for_box(mass: Real, width: Real, height: Real) -> Real {
    mass * (width * width + height * height) / 12.0
}

/// Corner vertices of an origin-centred, axis-aligned box
///
/// Wound counter-clockwise starting at the bottom-left corner, which is the
/// order convex polylines expect.
pub fn box_vertices(width: Real, height: Real) -> [Point<Real>; 4] {
    let hw = width / 2.0;
    let hh = height / 2.0;
    [
        point![-hw, -hh],
        point![hw, -hh],
        point![hw, hh],
        point![-hw, hh],
    ]
}

/// Grow `value` by `delta`, never going below `min` when a floor is given
pub fn grow_clamped(value: Real, delta: Real, min: Option<Real>) -> Real {
    let grown = value + delta;
    match min {
        Some(min) => grown.max(min),
        None => grown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_moment_for_box() {
        // 10 * (400² + 50²) / 12
        let moment = moment_for_box(10.0, 400.0, 50.0);
        assert_relative_eq!(moment, 135_416.67, max_relative = 1e-6);
    }

    #[test]
    fn test_box_vertices_are_centred_rectangle() {
        let verts = box_vertices(400.0, 50.0);
        assert_eq!(verts[0], point![-200.0, -25.0]);
        assert_eq!(verts[1], point![200.0, -25.0]);
        assert_eq!(verts[2], point![200.0, 25.0]);
        assert_eq!(verts[3], point![-200.0, 25.0]);

        let centroid = verts.iter().fold(point![0.0, 0.0], |acc, p| acc + p.coords / 4.0);
        assert_abs_diff_eq!(centroid.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(centroid.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_box_vertices_winding_is_ccw() {
        let verts = box_vertices(3.0, 2.0);
        // Shoelace formula: positive area means counter-clockwise
        let mut area = 0.0;
        for i in 0..4 {
            let a = verts[i];
            let b = verts[(i + 1) % 4];
            area += a.x * b.y - b.x * a.y;
        }
        assert_relative_eq!(area / 2.0, 6.0);
    }

    #[test]
    fn test_grow_clamped() {
        assert_eq!(grow_clamped(60.0, -20.0, Some(50.0)), 50.0);
        assert_eq!(grow_clamped(60.0, 5.0, Some(50.0)), 65.0);
        assert_eq!(grow_clamped(60.0, -20.0, None), 40.0);
    }
}
