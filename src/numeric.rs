/*

    Declare numeric types used throughout this repo.

    WARNING: If you like to use f32 instead of f64
    during computations, you need to change all of these:
    pub type Float = f32;
    pub type Vector3 = Vec3;
    pub type Vector2 = Vec2;
    pub type Vector4 = Vec4;

    @date: 2 Oct, 2025
*/

use bevy_math::{DVec2, DVec3, DVec4};
pub type Float = f64; // WARNING: If you want to change it to f32, don't forget to update Vector types
pub type Vector3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector4 = DVec4; // RGBA colors

pub fn approx_zero(x: Float) -> bool {
    x.abs() < 1e-8
}

/// Round to the nearest pixel count, never going below a single pixel.
pub fn round_to_pixels(x: Float) -> usize {
    if !x.is_finite() || x < 1.0 {
        return 1;
    }
    x.round() as usize
}

/// Clamp every channel of a color to [0, 1]
pub fn saturate(c: Vector3) -> Vector3 {
    c.clamp(Vector3::ZERO, Vector3::ONE)
}
