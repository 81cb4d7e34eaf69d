/*

    Given a BakeScene and a fitted orthographic camera,
    render the bake passes and write them as PNGs.

    RenderHost is the seam the bake orchestration talks to,
    SoftwareHost is the CPU implementation of it:
        - one ray per pixel, straight down
        - closest hit among render-visible meshes
        - optional ambient occlusion from hemisphere samples

    @date: Oct 11, 2025
*/

use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use crate::bbox::BBox;
use crate::camera::{CameraHandle, OrthoCamera};
use crate::compositing::{self, CompositeSettings, RenderPass};
use crate::config::RenderParameters;
use crate::error::{BakeError, BakeResult};
use crate::fitting::{FitResult, Resolution};
use crate::image::ImageData;
use crate::interval::Interval;
use crate::prelude::*;
use crate::ray::{HitRecord, Ray};
use crate::sampler::{hemisphere_uniform_sample, orthonormal_basis};
use crate::scene::{BakeScene, SceneProvider};

/// Offset of secondary ray origins along the surface normal
pub const SHADOW_RAY_EPSILON: Float = 1e-6;
pub const INTERSECTION_TEST_EPSILON: Float = 1e-10;

/// Outputs above this many pixels get a memory warning before rendering
pub const PIXEL_BUDGET: usize = 8192 * 8192;

pub fn exceeds_pixel_budget(resolution: Resolution) -> bool {
    resolution.pixel_count() > PIXEL_BUDGET
}


pub trait RenderHost {
    /// Put the camera above the fitted center, looking down, covering the fitted extents
    fn place_camera(&mut self, camera: &CameraHandle, fit: &FitResult);

    fn set_output_resolution(&mut self, resolution: Resolution);

    fn configure_compositing_outputs(&mut self, settings: &CompositeSettings);

    /// Render every configured pass, returning the written files
    fn render(&mut self) -> BakeResult<Vec<PathBuf>>;
}


/// What a primary ray found, before compositing
#[derive(Debug, Clone, Copy)]
struct SurfaceSample {
    distance: Float,
    normal: Vector3,
    color: Vector3,
    occlusion: Float,
}


pub struct SoftwareHost {
    pub scene: BakeScene,
    output_dir: PathBuf,
    camera: Option<(CameraHandle, FitResult)>,
    resolution: Resolution,
    compositing: Option<CompositeSettings>,
}

impl SoftwareHost {
    pub fn new(scene: BakeScene, output_dir: PathBuf) -> Self {
        Self {
            scene,
            output_dir,
            camera: None,
            resolution: Resolution::default(),
            compositing: None,
        }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    fn ambient_occlusion(&self, hit_record: &HitRecord, samples: usize, distance: Float) -> Float {
        if samples == 0 {
            return 1.0;
        }
        let n = hit_record.normal;
        let (u, v) = orthonormal_basis(&n);
        let origin = hit_record.hit_point + n * SHADOW_RAY_EPSILON;
        let interval = Interval::new(0.0, distance);

        let unoccluded = (0..samples)
            .filter(|_| {
                let dir = hemisphere_uniform_sample(&u, &v, &n).normalize();
                let ray = Ray::new(origin, dir);
                self.scene.hit(&ray, &interval, true).is_none()
            })
            .count();
        unoccluded as Float / samples as Float
    }

    fn trace(&self, ray: &Ray, settings: &CompositeSettings) -> Option<SurfaceSample> {
        let t_interval = Interval::positive(INTERSECTION_TEST_EPSILON);
        let hit_record = self.scene.hit(ray, &t_interval, false)?;

        let occlusion = match settings.ambient_occlusion {
            Some(ao) => self.ambient_occlusion(&hit_record, ao.samples, ao.distance),
            None => 1.0,
        };
        Some(SurfaceSample {
            distance: hit_record.ray_t,
            normal: hit_record.normal,
            color: self.scene.meshes[hit_record.mesh].diffuse,
            occlusion,
        })
    }
}

fn composite(pass: RenderPass, sample: &Option<SurfaceSample>, settings: &CompositeSettings) -> Vector4 {
    match (pass, sample) {
        (RenderPass::Depth, s) => compositing::composite_depth(s.map(|s| s.distance), &settings.depth_range),
        (_, None) => Vector4::ZERO, // transparent background
        (RenderPass::Normal, Some(s)) => compositing::composite_normal(s.normal),
        (RenderPass::Diffuse, Some(s)) => compositing::composite_diffuse(s.color, s.occlusion, &settings.boosts),
    }
}

impl RenderHost for SoftwareHost {
    fn place_camera(&mut self, camera: &CameraHandle, fit: &FitResult) {
        debug!("Placing camera '{}' at height {} above {:?}", camera.name, fit.camera_height, fit.camera_center);
        self.camera = Some((camera.clone(), *fit));
    }

    fn set_output_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    fn configure_compositing_outputs(&mut self, settings: &CompositeSettings) {
        self.compositing = Some(settings.clone());
    }

    fn render(&mut self) -> BakeResult<Vec<PathBuf>> {
        let Some((handle, fit)) = &self.camera else {
            return Err(BakeError::NoCameraFound);
        };
        if self.scene.cameras.all().get(handle.index).is_none() {
            return Err(BakeError::NoCameraFound);
        }
        let settings = match &self.compositing {
            Some(settings) => settings.clone(),
            None => CompositeSettings::new(&RenderParameters::default(), fit, ""),
        };

        let pixel_count = self.resolution.pixel_count();
        if exceeds_pixel_budget(self.resolution) {
            warn!("Output {} has {} pixels (budget {}), expect heavy memory use. \
                   Consider shrink_resolution_when_fitting or a smaller resolution.",
                self.resolution, pixel_count, PIXEL_BUDGET);
        }

        let start = Instant::now();
        let cam = OrthoCamera::new(fit, self.resolution);
        let corners = cam.get_nearplane_corners();

        // --- Rayon Multithreading ---
        // Rays are made per pixel inside the workers, only the samples are kept
        let samples: Vec<Option<SurfaceSample>> = (0..pixel_count)
            .into_par_iter()
            .map(|i| self.trace(&cam.primary_ray_at(i, &corners), &settings))
            .collect();
        // -----------------------------
        info!("Tracing {} rays for '{}' took: {:?}", pixel_count, self.scene.name, start.elapsed());

        let Resolution { width, height } = self.resolution;
        let mut written = Vec::with_capacity(settings.targets.len());
        for &pass in settings.targets.iter() {
            let pixel_colors = samples.iter().map(|s| composite(pass, s, &settings)).collect();
            let im = ImageData::new(width, height, settings.output_name(&self.scene.name, pass), pixel_colors);
            written.push(im.save_png(&self.output_dir)?);
        }
        Ok(written)
    }
}

impl SceneProvider for SoftwareHost {
    fn mesh_bounds(&self) -> Vec<BBox> {
        self.scene.mesh_bounds()
    }

    fn mesh_names(&self) -> Vec<String> {
        self.scene.mesh_names()
    }

    fn first_camera(&self) -> BakeResult<CameraHandle> {
        self.scene.first_camera()
    }

    fn set_render_visibility(&mut self, mesh_name: &str, visible: bool) {
        self.scene.set_render_visibility(mesh_name, visible)
    }
}
