/*

    Responsible for creating a struct that represents
    ranges from a to b and functionality to check if
    x is in range [a,b] or (a,b).

    Bounding boxes are built from one Interval per axis,
    and the depth pass is remapped from the camera's
    [min distance, max distance] interval.

    See also Interval::EMPTY: (inf, -inf), the
    starting point for expand()

    @date: Sept 2025

*/

use crate::numeric::{Float};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: Float,
    pub max: Float,
}

impl Interval {

    pub const EMPTY: Self = Self {
        min: FloatConst::INF,
        max: FloatConst::NEG_INF,
    };

    pub fn validate(&self) -> bool {
        self.max >= self.min
    }

    pub fn new(min: Float, max: Float) -> Self {
        Self {
            min,
            max,
        }
    }

    pub fn positive(epsilon: Float) -> Self {
        // [epsilon, inf)
        Self {
            min: epsilon,
            max: FloatConst::INF,
        }
    }

    pub fn size(&self) -> Float {
        self.max - self.min
    }

    pub fn contains(&self, x: Float) -> bool {
        self.min <= x && x <= self.max
    }

    pub fn expand(&mut self, x: Float) {
        if x < self.min { self.min = x; }
        if x > self.max { self.max = x; }
    }

    /// Smallest interval containing both intervals
    pub fn union(&self, other: &Interval) -> Interval {
        Interval::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Linearly map x from this interval onto [0, 1], clamped.
    /// A zero-sized interval maps everything at or above its min to 1.
    pub fn normalize(&self, x: Float) -> Float {
        let size = self.size();
        if size <= 0.0 {
            return if x < self.min { 0.0 } else { 1.0 };
        }
        ((x - self.min) / size).clamp(0.0, 1.0)
    }

}


pub trait FloatConst: Copy {
    const PI: Self;
    const INF: Self;
    const NEG_INF: Self;
}

impl FloatConst for f32 {
    const PI: Self = std::f32::consts::PI;
    const INF: Self = f32::INFINITY;
    const NEG_INF: Self = f32::NEG_INFINITY;
}

impl FloatConst for f64 {
    const PI: Self = std::f64::consts::PI;
    const INF: Self = f64::INFINITY;
    const NEG_INF: Self = f64::NEG_INFINITY;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_from_empty() {
        let mut int = Interval::EMPTY;
        assert!(!int.validate());
        int.expand(2.0);
        int.expand(-1.0);
        assert_eq!(int, Interval::new(-1.0, 2.0));
        assert_eq!(int.size(), 3.0);
    }

    #[test]
    fn test_union() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(-2.0, 0.5);
        assert_eq!(a.union(&b), Interval::new(-2.0, 1.0));
    }

    #[test]
    fn test_normalize() {
        let int = Interval::new(10.0, 20.0);
        assert_eq!(int.normalize(15.0), 0.5);
        assert_eq!(int.normalize(5.0), 0.0);
        assert_eq!(int.normalize(1e10), 1.0);

        let flat = Interval::new(3.0, 3.0);
        assert_eq!(flat.normalize(3.0), 1.0);
        assert_eq!(flat.normalize(2.0), 0.0);
    }
}
