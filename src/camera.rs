/*

    Declare scene cameras and the orthographic camera
    used for baking.

    Scene files only name their cameras, placement always
    comes from fitting: the camera sits above the bounds
    center, looks straight down -Z and covers ortho_scale
    world units along the longer image axis.

    @date: Oct, 2025
*/


use crate::prelude::*;
use crate::fitting::{FitResult, Resolution};
use crate::image;
use crate::json_structs::SingleOrVec;
use crate::ray::Ray;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Cameras {
    #[serde(rename = "Camera", default)]
    camera: SingleOrVec<Camera>, // Allow either single cam or multiple cams
}

impl Cameras {
    pub fn all(&self) -> &[Camera] {
        match &self.camera {
            SingleOrVec::Empty => &[],
            SingleOrVec::Single(c) => std::slice::from_ref(c),
            SingleOrVec::Multiple(v) => v,
        }
    }
}

#[derive(Debug, Deserialize, Clone, SmartDefault)]
#[serde(default)]
pub struct Camera {
    #[default = "Camera"]
    #[serde(rename = "_name")]
    pub name: String,
}

/// Refers to one of the scene's cameras
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraHandle {
    pub name: String,
    pub index: usize,
}


#[derive(Debug, Clone)]
pub struct OrthoCamera {
    pub position: Vector3,
    pub ortho_scale: Float,
    pub resolution: Resolution,
}

impl OrthoCamera {
    pub fn new(fit: &FitResult, resolution: Resolution) -> Self {
        Self {
            position: fit.camera_center.extend(fit.camera_height),
            ortho_scale: fit.ortho_scale,
            resolution,
        }
    }

    /// World-space width and height of the frame
    pub fn frame_size(&self) -> Vector2 {
        let longest = self.resolution.longest() as Float;
        Vector2::new(
            self.ortho_scale * self.resolution.width as Float / longest,
            self.ortho_scale * self.resolution.height as Float / longest,
        )
    }

    /// Order: [top-left, top-right, bottom-left, bottom-right]
    /// Image rows go from +Y (top) to -Y (bottom), columns from -X to +X.
    pub fn get_nearplane_corners(&self) -> [Vector3; 4] {
        let half = self.frame_size() / 2.0;
        let p = self.position;
        [
            Vector3::new(p.x - half.x, p.y + half.y, p.z), // top-left
            Vector3::new(p.x + half.x, p.y + half.y, p.z), // top-right
            Vector3::new(p.x - half.x, p.y - half.y, p.z), // bottom-left
            Vector3::new(p.x + half.x, p.y - half.y, p.z), // bottom-right
        ]
    }

    /// Ray through the center of pixel (col, row), pointing down -Z
    pub fn primary_ray(&self, col: usize, row: usize, corners: &[Vector3; 4]) -> Ray {
        let Resolution { width, height } = self.resolution;
        let origin = image::get_pixel_center(col, row, width, height, corners);
        Ray::new(origin, Vector3::NEG_Z)
    }

    /// Ray for the pixel at a row-major index
    pub fn primary_ray_at(&self, index: usize, corners: &[Vector3; 4]) -> Ray {
        let width = self.resolution.width;
        self.primary_ray(index % width, index / width, corners)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;

    fn fit_result(scale: Float) -> FitResult {
        FitResult {
            camera_height: 10.0,
            camera_center: Vector2::new(1.0, 2.0),
            output_resolution: Resolution::square(4),
            ortho_scale: scale,
            depth_range: Interval::new(1.0, 5.0),
        }
    }

    #[test]
    fn test_frame_size_follows_aspect() {
        let cam = OrthoCamera::new(&fit_result(8.0), Resolution::new(512, 256));
        assert_eq!(cam.frame_size(), Vector2::new(8.0, 4.0));

        let cam = OrthoCamera::new(&fit_result(8.0), Resolution::new(128, 512));
        assert_eq!(cam.frame_size(), Vector2::new(2.0, 8.0));
    }

    #[test]
    fn test_primary_rays() {
        let cam = OrthoCamera::new(&fit_result(4.0), Resolution::new(2, 2));
        let corners = cam.get_nearplane_corners();
        let rays: Vec<_> = (0..4).map(|i| cam.primary_ray_at(i, &corners)).collect();
        assert_eq!(rays[1].origin, cam.primary_ray(1, 0, &corners).origin);
        // First pixel is top-left: -X, +Y from the center
        assert_eq!(rays[0].origin, Vector3::new(0.0, 3.0, 10.0));
        assert_eq!(rays[3].origin, Vector3::new(2.0, 1.0, 10.0));
        assert!(rays.iter().all(|r| r.direction == Vector3::NEG_Z));
    }

    #[test]
    fn test_cameras_single_or_list() {
        let single: Cameras = serde_json::from_str(r#"{"Camera": {"_name": "Top"}}"#).unwrap();
        assert_eq!(single.all().len(), 1);
        assert_eq!(single.all()[0].name, "Top");

        let none: Cameras = serde_json::from_str("{}").unwrap();
        assert!(none.all().is_empty());

        let unnamed: Cameras = serde_json::from_str(r#"{"Camera": [{}, {"_name": "B"}]}"#).unwrap();
        assert_eq!(unnamed.all()[0].name, "Camera");
    }
}
