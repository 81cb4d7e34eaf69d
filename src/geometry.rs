/*

    Triangle utilities used by the software render host:
    face normals, degenerate triangle checks and the
    Möller-Trumbore ray/triangle intersection.

    @date: 9 Oct, 2025
*/


use crate::ray::Ray;
use crate::interval::Interval;
use crate::prelude::*;

/// Return true if any two corners of the triangle sit at the same position
pub fn is_degenerate_triangle(tri: &[Vector3; 3]) -> bool {
    let [a, b, c] = tri;
    approx_zero(a.distance_squared(*b))
        || approx_zero(b.distance_squared(*c))
        || approx_zero(c.distance_squared(*a))
        || approx_zero((b - a).cross(c - a).length_squared())
}

pub fn get_tri_normal(v1: &Vector3, v2: &Vector3, v3: &Vector3) -> Vector3{
    // WARNING: Assumes triangle indices are given in counter clockwise order 
    //
    //    v1
    //  /    \
    // v2 —— v3
    //
    let left = v1 - v2;
    let right = v3 - v2;
    let normal = right.cross(left).normalize();
    debug_assert!(normal.is_normalized());
    normal
}

pub fn moller_trumbore_intersection(ray: &Ray, t_interval: &Interval, tri: &[Vector3; 3]) -> Option<(Float, Float, Float)> {
    // Based on Möller-Trumbore algorithm
    //
    //     a (pivot)
    //    / \
    //  b  -  c
    // 
    const PARALLEL_EPSILON: Float = 1e-12;

    let [tri_pivot, tri_left, tri_right] = *tri;
    let edge_ab = tri_left - tri_pivot;
    let edge_ac = tri_right - tri_pivot;
    // Scalar triple product https://youtu.be/fK1RPmF_zjQ
    debug_assert!(ray.direction.is_normalized());
    let perp = ray.direction.cross(edge_ac);
    let determinant: Float = perp.dot(edge_ab);
    if determinant.abs() < PARALLEL_EPSILON {
        return None;
    }
    let inverse_determinant = 1.0 as Float / determinant;
    let dist = ray.origin - tri_pivot;
    let barycentric_u = dist.dot(perp) * inverse_determinant;
    if !(0.0..=1.0).contains(&barycentric_u) {
        return None;
    }
    let another_perp = dist.cross(edge_ab);
    let barycentric_v = ray.direction.dot(another_perp) * inverse_determinant;
    if (barycentric_v < 0.0) || ((barycentric_u + barycentric_v) > 1.0) {
        return None;
    }
    // Get ray t
    let t = edge_ac.dot(another_perp) * inverse_determinant;
    if !t_interval.contains(t) {
        return None;
    }
    Some((barycentric_u, barycentric_v, t))
}
