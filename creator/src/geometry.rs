//! Circumsphere and supporting-plane computations used by the hull
//! simplifier and the patch assembler. Everything here is pure geometry on
//! `f64` glam types.

use glam::{DMat2, DMat3, DMat4, DVec2, DVec3, DVec4};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Sphere { center, radius }
    }

    pub fn contains(&self, p: DVec3) -> bool {
        self.center.distance_squared(p) < self.radius * self.radius
    }
}

/// Orthonormal frame of the plane through three points, anchored at the
/// first of them.
#[derive(Debug, Clone, Copy)]
pub struct PlaneBasis {
    pub origin: DVec3,
    pub normal: DVec3,
    pub ex: DVec3,
    pub ey: DVec3,
}

impl PlaneBasis {
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Self {
        let normal = (b - a).cross(c - b).normalize();
        let ex = (b - a).cross(normal).normalize();
        let ey = normal.cross(ex);
        PlaneBasis {
            origin: a,
            normal,
            ex,
            ey,
        }
    }

    pub fn project(&self, p: DVec3) -> DVec2 {
        let v = p - self.origin;
        DVec2::new(v.dot(self.ex), v.dot(self.ey))
    }

    pub fn unproject(&self, p: DVec2) -> DVec3 {
        self.origin + p.x * self.ex + p.y * self.ey
    }
}

/// Circumcentre of three points in the plane, by Cramer's rule on the
/// general circle equation.
pub fn circumcircle_2d(a: DVec2, b: DVec2, c: DVec2) -> DVec2 {
    let norms = DVec3::new(a.length_squared(), b.length_squared(), c.length_squared());
    let xs = DVec3::new(a.x, b.x, c.x);
    let ys = DVec3::new(a.y, b.y, c.y);
    let ones = DVec3::ONE;

    let m11 = DMat3::from_cols(xs, ys, ones).determinant();
    let m12 = DMat3::from_cols(norms, ys, ones).determinant();
    let m13 = DMat3::from_cols(norms, xs, ones).determinant();

    DVec2::new(0.5 * m12 / m11, -0.5 * m13 / m11)
}

/// Circumsphere of a triangle in 3-space.
pub fn circumsphere_3(a: DVec3, b: DVec3, c: DVec3) -> Sphere {
    let v1 = b - a;
    let v2 = c - a;
    let v11 = v1.dot(v1);
    let v22 = v2.dot(v2);
    let v12 = v1.dot(v2);
    let num = v11 * v22 - v12 * v12;

    let k1 = 0.5 * v22 * (v11 - v12) / num;
    let k2 = 0.5 * v11 * (v22 - v12) / num;

    let center = a + k1 * v1 + k2 * v2;
    Sphere::new(center, center.distance(a))
}

/// Radius reported for a coplanar quadruple, whose true circumsphere is a
/// plane. Large enough to outrank every genuine circumradius on the heap.
const COPLANAR_RADIUS: f64 = 1e12;

/// Circumsphere of four points, by Cramer's rule on the general sphere
/// equation. When the points are coplanar the system determinant vanishes
/// (and for a concyclic quadruple the numerators vanish with it), so the
/// degenerate case is detected up front and reported as a finite, enormous
/// radius instead.
pub fn circumsphere_4(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> Sphere {
    let norms = DVec4::new(
        a.length_squared(),
        b.length_squared(),
        c.length_squared(),
        d.length_squared(),
    );
    let xs = DVec4::new(a.x, b.x, c.x, d.x);
    let ys = DVec4::new(a.y, b.y, c.y, d.y);
    let zs = DVec4::new(a.z, b.z, c.z, d.z);
    let ones = DVec4::ONE;

    let t = DMat4::from_cols(xs, ys, zs, ones).determinant();
    if t.abs() < 1e-10 {
        debug!("coplanar quadruple, circumsphere degenerates to a plane");
        return Sphere::new((a + b + c + d) / 4.0, COPLANAR_RADIUS);
    }

    let dd = DMat4::from_cols(norms, ys, zs, ones).determinant() / t;
    let e = -DMat4::from_cols(norms, xs, zs, ones).determinant() / t;
    let f = DMat4::from_cols(norms, xs, ys, ones).determinant() / t;
    let g = DMat4::from_cols(norms, xs, ys, zs).determinant() / t;

    let center = 0.5 * DVec3::new(dd, e, f);
    let radius = 0.5 * (dd * dd + e * e + f * f - 4.0 * g).sqrt();
    Sphere::new(center, radius)
}

/// Sphere of the given radius through three points, centred on the side the
/// plane normal of `(a, c, b)` points to. The centre is nudged `epsilon`
/// further out along that normal; when the triangle's circumradius already
/// exceeds the target radius the in-plane centre is kept and only the nudge
/// applies.
pub fn sphere_through_points(a: DVec3, b: DVec3, c: DVec3, radius: f64, epsilon: f64) -> Sphere {
    let basis = PlaneBasis::from_points(a, c, b);
    let b2d = basis.project(b);
    let c2d = basis.project(c);

    let center2d = circumcircle_2d(DVec2::ZERO, b2d, c2d);
    let circum = center2d.length();
    let offset = if circum > radius {
        0.0
    } else {
        (radius * radius - circum * circum).sqrt()
    };

    let center = basis.unproject(center2d) + (offset + epsilon) * basis.normal;
    Sphere::new(center, radius)
}

/// Whether the face `(a, b, c)` is wound counter-clockwise as seen from
/// outside the body: its supporting-sphere centre and the body centre must
/// both lie on the inner side of the face plane.
pub fn is_ccw(
    a: DVec3,
    b: DVec3,
    c: DVec3,
    body_center: DVec3,
    radius: f64,
    epsilon: f64,
) -> bool {
    let support = sphere_through_points(a, b, c, radius, epsilon);
    let basis = PlaneBasis::from_points(a, b, c);
    let b2d = basis.project(b);
    let c2d = basis.project(c);
    let det = DMat2::from_cols(b2d, c2d).determinant();

    !(det > 0.0
        && basis.normal.dot(a - support.center) > 0.0
        && basis.normal.dot(a - body_center) > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn circumcircle_of_right_triangle() {
        let c = circumcircle_2d(DVec2::ZERO, DVec2::new(2.0, 0.0), DVec2::new(0.0, 2.0));
        assert!(c.distance(DVec2::new(1.0, 1.0)) < TOL);
    }

    #[test]
    fn circumsphere_3_right_triangle() {
        let s = circumsphere_3(
            DVec3::ZERO,
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
        );
        assert!(s.center.distance(DVec3::new(1.0, 1.0, 0.0)) < TOL);
        assert!((s.radius - 2.0_f64.sqrt()).abs() < TOL);
    }

    #[test]
    fn circumsphere_4_of_corner_tetrahedron() {
        let s = circumsphere_4(
            DVec3::ZERO,
            DVec3::X,
            DVec3::Y,
            DVec3::Z,
        );
        assert!(s.center.distance(DVec3::splat(0.5)) < TOL);
        assert!((s.radius - 0.75_f64.sqrt()).abs() < TOL);
    }

    #[test]
    fn circumsphere_4_away_from_the_origin() {
        let s = circumsphere_4(
            DVec3::new(12.0, 0.0, 0.0),
            DVec3::new(8.0, 0.0, 0.0),
            DVec3::new(10.0, 2.0, 0.0),
            DVec3::new(10.0, 0.0, 2.0),
        );
        assert!(s.center.distance(DVec3::new(10.0, 0.0, 0.0)) < TOL);
        assert!((s.radius - 2.0).abs() < TOL);
    }

    #[test]
    fn circumsphere_4_enclosing_the_origin() {
        // four corners of the unit cube centred on the origin
        let s = circumsphere_4(
            DVec3::new(-0.5, -0.5, -0.5),
            DVec3::new(0.5, -0.5, -0.5),
            DVec3::new(0.5, 0.5, -0.5),
            DVec3::new(0.5, -0.5, 0.5),
        );
        assert!(s.center.distance(DVec3::ZERO) < TOL);
        assert!((s.radius - 0.75_f64.sqrt()).abs() < TOL);
    }

    #[test]
    fn circumsphere_4_coplanar_points_stay_finite() {
        // a concyclic square and a non-concyclic coplanar quadruple both
        // degenerate the same way
        let quads = [
            [
                DVec3::ZERO,
                DVec3::X,
                DVec3::Y,
                DVec3::new(1.0, 1.0, 0.0),
            ],
            [
                DVec3::ZERO,
                DVec3::X,
                DVec3::Y,
                DVec3::new(2.0, 2.0, 0.0),
            ],
        ];
        for [a, b, c, d] in quads {
            let s = circumsphere_4(a, b, c, d);
            assert!(s.radius.is_finite());
            assert!(s.radius > 1e6);
        }
    }

    #[test]
    fn plane_basis_is_orthonormal() {
        let basis = PlaneBasis::from_points(
            DVec3::new(1.0, 0.5, -2.0),
            DVec3::new(3.0, 1.0, 0.0),
            DVec3::new(-1.0, 2.0, 1.0),
        );
        assert!((basis.normal.length() - 1.0).abs() < TOL);
        assert!((basis.ex.length() - 1.0).abs() < TOL);
        assert!((basis.ey.length() - 1.0).abs() < TOL);
        assert!(basis.normal.dot(basis.ex).abs() < TOL);
        assert!(basis.normal.dot(basis.ey).abs() < TOL);
        assert!(basis.ex.dot(basis.ey).abs() < TOL);
    }

    #[test]
    fn plane_basis_projection_round_trip() {
        let a = DVec3::new(0.0, 0.0, 1.0);
        let b = DVec3::new(2.0, 0.0, 1.0);
        let c = DVec3::new(0.0, 3.0, 1.0);
        let basis = PlaneBasis::from_points(a, b, c);
        for p in [a, b, c] {
            assert!(basis.unproject(basis.project(p)).distance(p) < TOL);
        }
    }

    #[test]
    fn sphere_through_points_touches_all_three() {
        let a = DVec3::new(0.3, 0.0, 0.0);
        let b = DVec3::new(0.0, 0.4, 0.1);
        let c = DVec3::new(-0.2, -0.3, 0.05);
        let eps = 1e-8;
        let s = sphere_through_points(a, b, c, 2.0, eps);
        assert_eq!(s.radius, 2.0);
        for p in [a, b, c] {
            // the epsilon nudge pushes the centre slightly past the exact
            // supporting position
            assert!((s.center.distance(p) - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn sphere_through_points_clamps_under_target() {
        let a = DVec3::new(1.0, 0.0, 0.0);
        let b = DVec3::new(-0.5, 0.75_f64.sqrt(), 0.0);
        let c = DVec3::new(-0.5, -(0.75_f64.sqrt()), 0.0);
        // circumradius 1, target radius 0.5: no real offset exists
        let s = sphere_through_points(a, b, c, 0.5, 1e-8);
        assert!(s.center.z.abs() < 1e-6);
        assert!(s.radius == 0.5);
    }
}
