use crate::{interval::FloatConst, numeric::*};

//////////////////////////////////////////////////////////////////////////
/// SAMPLING UTILS
//////////////////////////////////////////////////////////////////////////

pub fn random_float() -> Float {
    rand::random::<Float>()
}

/// Any two unit vectors u, v such that (u, v, n) is orthonormal
pub fn orthonormal_basis(n: &Vector3) -> (Vector3, Vector3) {
    debug_assert!(n.is_normalized());
    let u = n.any_orthonormal_vector();
    let v = n.cross(u);
    (u, v)
}

pub fn hemisphere_uniform_sample(u: &Vector3, v: &Vector3, n: &Vector3) -> Vector3 {
    // Assuming input vectors are orthonormal
    let psi_1 = random_float();
    let psi_2 = random_float();

    // Uniform sampling of a hemisphere: psi_1 is cos(theta)
    let sin_theta = (1. - psi_1.powf(2.)).sqrt();
    let phi = psi_2 * 2. * Float::PI;

    let u_coeff: Float = sin_theta * phi.cos();
    let v_coeff: Float = sin_theta * phi.sin();

    (u * u_coeff) + (v * v_coeff) + (n * psi_1)
}
