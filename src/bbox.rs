/*

    Axis Aligned Bounding Box.

    Each render-visible mesh reports one BBox, the fitting
    code only ever looks at the union of those. The slab test
    is used by the software host to skip meshes a ray misses.

    @date: 9 Nov, 2025
*/


use crate::prelude::*;

use crate::error::{BakeError, BakeResult};
use crate::interval::Interval;
use crate::ray::Ray;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl BBox {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        debug_assert!(min.cmple(max).all(), "Invalid bbox, found max < min");
        Self { min, max }
    }

    pub fn new_from(xint: &Interval, yint: &Interval, zint: &Interval) -> Self {
        assert!(xint.validate() && yint.validate() && zint.validate(), "Invalid interval, found max < min");
        Self {
            min: Vector3::new(xint.min, yint.min, zint.min),
            max: Vector3::new(xint.max, yint.max, zint.max),
        }
    }

    /// Smallest box around all given points, None if there are no points
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vector3>,
    {
        let (mut xint, mut yint, mut zint) = (Interval::EMPTY, Interval::EMPTY, Interval::EMPTY);
        for p in points {
            xint.expand(p.x);
            yint.expand(p.y);
            zint.expand(p.z);
        }
        if !xint.validate() {
            return None;
        }
        Some(BBox::new_from(&xint, &yint, &zint))
    }

    /// Extents along each axis (max - min)
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn intersect(&self, ray: &Ray, t_interval: &Interval) -> bool {
        // Slab test: intersect the ray with X, Y, Z slabs and
        // keep the overlap of the three [t1, t2] ranges.
        let slab_intersect = |min: Float, max: Float, o: Float, d: Float| -> (Float, Float) {
            if approx_zero(d) {
                // Parallel to the slab, either always inside or never
                return if min <= o && o <= max {
                    (Float::NEG_INFINITY, Float::INFINITY)
                } else {
                    (Float::INFINITY, Float::NEG_INFINITY)
                };
            }
            let mut t1 = (min - o) / d;
            let mut t2 = (max - o) / d;
            if t2 < t1 {
                std::mem::swap(&mut t1, &mut t2);
            }
            (t1, t2)
        };

        let (t1x, t2x) = slab_intersect(self.min.x, self.max.x, ray.origin.x, ray.direction.x);
        let (t1y, t2y) = slab_intersect(self.min.y, self.max.y, ray.origin.y, ray.direction.y);
        let (t1z, t2z) = slab_intersect(self.min.z, self.max.z, ray.origin.z, ray.direction.z);

        let t1: Float = t1x.max(t1y).max(t1z).max(t_interval.min);
        let t2: Float = t2x.min(t2y).min(t2z).min(t_interval.max);
        t1 <= t2
    }
}

pub trait BBoxable {
    fn get_bbox(&self) -> Option<BBox>;
}

/// Axis-aligned union of all boxes.
pub fn combined_bounds(boxes: &[BBox]) -> BakeResult<BBox> {
    let (first, rest) = boxes.split_first().ok_or(BakeError::EmptyInput)?;
    let combined = rest.iter().fold(*first, |acc, b| acc.union(b));
    debug!("Combined bounds of {} boxes: {:?}", boxes.len(), combined);
    Ok(combined)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(min: [Float; 3], max: [Float; 3]) -> BBox {
        BBox::new(Vector3::from_array(min), Vector3::from_array(max))
    }

    #[test]
    fn test_combined_bounds_is_union() {
        let boxes = vec![
            bbox([0., 0., 0.], [1., 1., 1.]),
            bbox([-2., 0.5, 0.], [0.5, 3., 0.25]),
            bbox([0., -1., -4.], [0.1, 0., 2.]),
        ];
        let combined = combined_bounds(&boxes).unwrap();
        assert_eq!(combined, bbox([-2., -1., -4.], [1., 3., 2.]));
        for b in &boxes {
            assert!(combined.min.cmple(b.min).all() && combined.max.cmpge(b.max).all());
        }
    }

    #[test]
    fn test_combined_bounds_ignores_order() {
        let mut boxes = vec![
            bbox([5., 5., 5.], [6., 7., 8.]),
            bbox([-1., 2., 0.], [0., 3., 1.]),
            bbox([0., 0., 0.], [0., 0., 0.]),
        ];
        let forward = combined_bounds(&boxes).unwrap();
        boxes.reverse();
        assert_eq!(forward, combined_bounds(&boxes).unwrap());
        boxes.swap(0, 1);
        assert_eq!(forward, combined_bounds(&boxes).unwrap());
    }

    #[test]
    fn test_combined_bounds_empty() {
        assert!(matches!(combined_bounds(&[]), Err(BakeError::EmptyInput)));
    }

    #[test]
    fn test_from_points() {
        let pts = [Vector3::new(1., 2., 3.), Vector3::new(-1., 0., 5.)];
        let b = BBox::from_points(pts.iter()).unwrap();
        assert_eq!(b, bbox([-1., 0., 3.], [1., 2., 5.]));
        assert_eq!(b.size(), Vector3::new(2., 2., 2.));
        assert!(BBox::from_points(std::iter::empty::<&Vector3>()).is_none());
    }

    #[test]
    fn test_slab_intersect() {
        let b = bbox([0., 0., 0.], [1., 1., 1.]);
        let down = Vector3::new(0., 0., -1.);
        let hit = Ray::new(Vector3::new(0.5, 0.5, 10.), down);
        let miss = Ray::new(Vector3::new(1.5, 0.5, 10.), down);
        let t = Interval::positive(1e-6);
        assert!(b.intersect(&hit, &t));
        assert!(!b.intersect(&miss, &t));
        // Box is entirely behind the ray origin
        let above = Ray::new(Vector3::new(0.5, 0.5, -10.), down);
        assert!(!b.intersect(&above, &t));
    }
}
