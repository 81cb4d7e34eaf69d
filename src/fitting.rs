/*

    Fit an orthographic top-down camera and an output
    resolution to the combined bounds of the scene meshes.

    Everything in here is pure arithmetic: bounds and config
    go in as arguments, nothing reads scene state.

    Resolution fitting only handles the simple case where one
    XY extent is an integer multiple of the other (e.g. a 2:1
    plank). Anything else keeps the requested resolution, it is
    not worth wasting effort on arbitrary aspect ratios.

    @date: Oct, 2026
*/

use std::fmt;

use crate::prelude::*;
use crate::bbox::BBox;
use crate::error::{BakeError, BakeResult};
use crate::interval::Interval;

/// Relative tolerance for treating max/min extent ratio as an integer
pub const FIT_RATIO_TOLERANCE: Float = 0.01;

/// Distance kept between the top of the geometry and a derived camera height
pub const CAMERA_CLEARANCE: Float = 1.0;

pub const DEFAULT_RESOLUTION: usize = 512;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Resolution {
    pub fn new(width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self { width, height }
    }

    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn pixel_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn longest(&self) -> usize {
        self.width.max(self.height)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::square(DEFAULT_RESOLUTION)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}


#[derive(Debug, Clone, PartialEq, SmartDefault)]
pub struct FitConfig {
    pub xy_padding: Float,
    pub z_padding: Float,
    pub resolution: Resolution,
    /// None derives the height from the bounds
    pub camera_height: Option<Float>,
    #[default = true]
    pub shrink_resolution_when_fitting: bool,
}


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    pub height: Float,
    pub center: Vector2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub camera_height: Float,
    pub camera_center: Vector2,
    pub output_resolution: Resolution,
    /// World-space size covered by the longer image axis
    pub ortho_scale: Float,
    /// Camera distances to the highest and lowest (padded) geometry
    pub depth_range: Interval,
}


/// XY extents of the bounds grown by the padding on both sides
pub fn padded_extents(bounds: &BBox, config: &FitConfig) -> Vector2 {
    let size = bounds.size();
    let padding = 2.0 * config.xy_padding;
    Vector2::new(size.x + padding, size.y + padding)
}

pub fn compute_camera_placement(bounds: &BBox, config: &FitConfig) -> CameraPlacement {
    let center = (bounds.min.truncate() + bounds.max.truncate()) / 2.0;
    let height = match config.camera_height {
        Some(h) => h,
        None => bounds.max.z + config.z_padding + CAMERA_CLEARANCE,
    };
    CameraPlacement { height, center }
}

/// The integer n such that max/min extent is within tolerance of n,
/// None if the extents are not an integer multiple of each other.
pub fn fit_ratio(extent_x: Float, extent_y: Float) -> Option<Float> {
    if !(extent_x > 0.0 && extent_y > 0.0) || approx_zero(extent_x) || approx_zero(extent_y) {
        return None;
    }
    let ratio = extent_x.max(extent_y) / extent_x.min(extent_y);
    let nearest = ratio.round();
    if nearest >= 1.0 && (ratio - nearest).abs() <= FIT_RATIO_TOLERANCE * nearest {
        Some(nearest)
    } else {
        None
    }
}

pub fn compute_output_resolution(bounds: &BBox, config: &FitConfig) -> BakeResult<Resolution> {
    let extents = padded_extents(bounds, config);
    let base = config.resolution;

    if approx_zero(extents.x) && approx_zero(extents.y) {
        return Err(BakeError::DegenerateBounds);
    }

    let Some(ratio) = fit_ratio(extents.x, extents.y) else {
        debug!("Extents {:?} are not an integer multiple of each other, keeping {}", extents, base);
        return Ok(base);
    };

    let x_is_long = extents.x >= extents.y;
    let (long_base, short_base) = if x_is_long {
        (base.width, base.height)
    } else {
        (base.height, base.width)
    };

    let (long_px, short_px) = if config.shrink_resolution_when_fitting {
        (long_base, round_to_pixels(short_base as Float / ratio))
    } else {
        (round_to_pixels(long_base as Float * ratio), short_base)
    };

    let fitted = if x_is_long {
        Resolution::new(long_px, short_px)
    } else {
        Resolution::new(short_px, long_px)
    };
    debug!("Fitted resolution {} for extent ratio {}", fitted, ratio);
    Ok(fitted)
}

/// Camera distances to the top and bottom of the geometry, padded in Z.
/// Used to remap the depth pass into [0, 1].
pub fn compute_depth_range(bounds: &BBox, camera_height: Float, config: &FitConfig) -> Interval {
    let nearest = camera_height - bounds.max.z - config.z_padding;
    let farthest = camera_height - bounds.min.z + config.z_padding;
    Interval::new(nearest, farthest)
}

/// Frame size along the longer image axis so that, at the aspect of `resolution`,
/// the frame covers both padded extents. The other image axis spans
/// ortho_scale * short_px / long_px.
pub fn compute_ortho_scale(extents: Vector2, resolution: Resolution) -> Float {
    let longest = resolution.longest() as Float;
    let scale_for_x = extents.x * longest / resolution.width as Float;
    let scale_for_y = extents.y * longest / resolution.height as Float;
    scale_for_x.max(scale_for_y)
}

pub fn fit(bounds: &BBox, config: &FitConfig) -> BakeResult<FitResult> {
    let output_resolution = compute_output_resolution(bounds, config)?;
    let placement = compute_camera_placement(bounds, config);
    let extents = padded_extents(bounds, config);

    if let Some(h) = config.camera_height {
        if h <= bounds.max.z {
            warn!("Camera height {} is not above the geometry (top at {}), parts of the scene will be clipped", h, bounds.max.z);
        }
    }

    let result = FitResult {
        camera_height: placement.height,
        camera_center: placement.center,
        output_resolution,
        ortho_scale: compute_ortho_scale(extents, output_resolution),
        depth_range: compute_depth_range(bounds, placement.height, config),
    };
    info!("Camera at {:?} height {}, ortho scale {}, output {}",
        result.camera_center, result.camera_height, result.ortho_scale, result.output_resolution);
    Ok(result)
}
