use crate::prelude::*;


#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {

    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        debug_assert!(direction.is_normalized());
        Self {
            origin,
            direction,
        }
    }

    #[inline]
    pub fn at(&self, t: Float) -> Vector3 {
        self.origin + self.direction * t // r(t) = o + dt
    }

    #[inline]
    pub fn is_front_face(&self, normal: Vector3) -> bool {
         self.direction.dot(normal) <= 0.0 
    }
}


// t is a single scalar telling how far the hit is from the ray origin,
// for primary rays of an orthographic camera that is exactly the depth.
//
// DISCLAIMER: This struct is based on the approach presented in Ray Tracing in One Weekend book.
#[derive(Debug, Default, Clone)]  
pub struct HitRecord {
    pub hit_point: Vector3,
    pub normal: Vector3,
    pub ray_t: Float,  // To check which HitRecord has smaller t 
    pub mesh: usize,   // Index of the mesh that was hit
}

impl HitRecord {
    pub fn new(hit_point: Vector3, normal: Vector3, ray_t: Float, mesh: usize) -> Self {
        Self {
            hit_point,
            normal,
            ray_t,
            mesh,
        }
    }
}
