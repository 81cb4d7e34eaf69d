/*

    Render passes and the per-pixel compositing applied
    before they are written to disk:

    - diffuse: brightness/contrast boost, multiplied by AO
    - normal:  [-1, 1] remapped to [0, 1], then gamma 2.2
    - depth:   camera distance remapped from the depth range
               to [0, 1] and inverted, so near is bright

    Output files are named <prefix><scene>_<pass>.png

    @date: Oct, 2026
*/

use std::fmt;

use crate::prelude::*;
use crate::config::RenderParameters;
use crate::fitting::FitResult;
use crate::interval::Interval;

/// Gamma applied to remapped normals
pub const NORMAL_GAMMA: Float = 2.2;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPass {
    Diffuse,
    Normal,
    Depth,
}

impl RenderPass {
    pub const ALL: [RenderPass; 3] = [RenderPass::Depth, RenderPass::Normal, RenderPass::Diffuse];

    pub fn file_suffix(&self) -> &'static str {
        match self {
            RenderPass::Diffuse => "diffuse",
            RenderPass::Normal => "normal",
            RenderPass::Depth => "depth",
        }
    }
}

impl fmt::Display for RenderPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_suffix())
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Boosts {
    /// In percent, like the compositor node inputs
    pub brightness: Float,
    pub contrast: Float,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientOcclusion {
    pub samples: usize,
    pub distance: Float,
}


#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSettings {
    pub targets: Vec<RenderPass>,
    pub boosts: Boosts,
    pub depth_range: Interval,
    pub ambient_occlusion: Option<AmbientOcclusion>,
    /// Prepended to every output file name, empty unless meshes are rendered one by one
    pub prefix: String,
}

impl CompositeSettings {
    pub fn new(params: &RenderParameters, fit: &FitResult, prefix: &str) -> Self {
        Self {
            targets: RenderPass::ALL.to_vec(),
            boosts: Boosts {
                brightness: params.brightness_boost,
                contrast: params.contrast_boost,
            },
            depth_range: fit.depth_range,
            ambient_occlusion: params.ambient_occlusion.then_some(AmbientOcclusion {
                samples: params.ao_samples,
                distance: params.ao_distance,
            }),
            prefix: prefix.to_string(),
        }
    }

    pub fn output_name(&self, scene_name: &str, pass: RenderPass) -> String {
        format!("{}{}_{}", self.prefix, scene_name, pass.file_suffix())
    }
}


/// Brightness/contrast the way the compositor's Bright/Contrast node does it:
/// out = a * c + b, with both inputs given in percent.
pub fn bright_contrast(color: Vector3, boosts: &Boosts) -> Vector3 {
    if boosts.brightness == 0.0 && boosts.contrast == 0.0 {
        return color;
    }
    let brightness = boosts.brightness / 100.0;
    // 100% contrast would divide by zero below
    let contrast = boosts.contrast.clamp(-100.0, 99.9) / 100.0;
    let mut delta = contrast / 2.0;
    let mut a = 1.0 - delta * 2.0;
    let b;
    if contrast > 0.0 {
        a = 1.0 / a;
        b = a * (brightness - delta);
    } else {
        delta *= -1.0;
        b = a * (brightness + delta);
    }
    color * a + Vector3::splat(b)
}

pub fn composite_diffuse(color: Vector3, ao: Float, boosts: &Boosts) -> Vector4 {
    let boosted = bright_contrast(color, boosts);
    saturate(boosted * ao).extend(1.0)
}

/// Map a unit normal to a color: (n + 1) / 2, then raised to NORMAL_GAMMA
pub fn composite_normal(normal: Vector3) -> Vector4 {
    let remapped = saturate((normal + Vector3::ONE) * 0.5);
    remapped.powf(NORMAL_GAMMA).extend(1.0)
}

/// Depth as 1 - (distance remapped from range to [0, 1]). Misses are transparent with depth 0.
pub fn composite_depth(distance: Option<Float>, range: &Interval) -> Vector4 {
    match distance {
        Some(t) => {
            let d = 1.0 - range.normalize(t);
            Vector4::new(d, d, d, 1.0)
        }
        None => Vector4::ZERO,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitting::Resolution;

    fn close(a: Vector3, b: Vector3) -> bool {
        (a - b).abs().max_element() < 1e-9
    }

    #[test]
    fn test_no_boost_is_identity() {
        let c = Vector3::new(0.1, 0.5, 0.9);
        assert_eq!(bright_contrast(c, &Boosts::default()), c);
    }

    #[test]
    fn test_brightness_shifts() {
        let c = Vector3::splat(0.5);
        let boosted = bright_contrast(c, &Boosts { brightness: 10.0, contrast: 0.0 });
        assert!(close(boosted, Vector3::splat(0.6)));
    }

    #[test]
    fn test_contrast_spreads_around_half() {
        let boosts = Boosts { brightness: 0.0, contrast: 50.0 };
        // a = 1 / 0.5 = 2, b = 2 * -0.25 = -0.5
        assert!(close(bright_contrast(Vector3::splat(0.5), &boosts), Vector3::splat(0.5)));
        assert!(close(bright_contrast(Vector3::splat(0.75), &boosts), Vector3::splat(1.0)));

        let flatten = Boosts { brightness: 0.0, contrast: -50.0 };
        // a = 1.5, b = 1.5 * 0.25
        assert!(close(bright_contrast(Vector3::splat(0.0), &flatten), Vector3::splat(0.375)));

        let maxed = bright_contrast(Vector3::splat(0.6), &Boosts { brightness: 0.0, contrast: 100.0 });
        assert!(maxed.is_finite());
    }

    #[test]
    fn test_composite_diffuse_applies_ao_and_clamps() {
        let c = composite_diffuse(Vector3::new(0.8, 0.4, 2.0), 0.5, &Boosts::default());
        assert_eq!(c, Vector4::new(0.4, 0.2, 1.0, 1.0));
    }

    #[test]
    fn test_composite_normal() {
        let up = composite_normal(Vector3::Z);
        assert!((up.x - 0.5f64.powf(2.2)).abs() < 1e-12);
        assert!((up.y - 0.5f64.powf(2.2)).abs() < 1e-12);
        assert_eq!(up.z, 1.0);
        assert_eq!(up.w, 1.0);
        assert_eq!(composite_normal(Vector3::NEG_X).x, 0.0);
    }

    #[test]
    fn test_composite_depth() {
        let range = Interval::new(1.0, 3.0);
        assert_eq!(composite_depth(Some(1.0), &range).x, 1.0);
        assert_eq!(composite_depth(Some(2.0), &range).x, 0.5);
        assert_eq!(composite_depth(Some(3.0), &range).x, 0.0);
        assert_eq!(composite_depth(Some(50.0), &range).x, 0.0);
        assert_eq!(composite_depth(None, &range).x, 0.0);
    }

    #[test]
    fn test_settings_from_parameters() {
        let mut params = RenderParameters { brightness_boost: 5.0, contrast_boost: 2.0, ..Default::default() };
        let fit = FitResult {
            camera_height: 3.0,
            camera_center: Vector2::ZERO,
            output_resolution: Resolution::square(8),
            ortho_scale: 1.0,
            depth_range: Interval::new(1.0, 2.0),
        };
        let settings = CompositeSettings::new(&params, &fit, "lid_");
        assert_eq!(settings.targets.len(), 3);
        assert_eq!(settings.boosts, Boosts { brightness: 5.0, contrast: 2.0 });
        assert_eq!(settings.depth_range, fit.depth_range);
        assert_eq!(settings.ambient_occlusion, Some(AmbientOcclusion { samples: 16, distance: 1.0 }));
        assert_eq!(settings.output_name("crate", RenderPass::Normal), "lid_crate_normal");

        params.ambient_occlusion = false;
        assert!(CompositeSettings::new(&params, &fit, "").ambient_occlusion.is_none());
    }
}
