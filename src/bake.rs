/*

    Bake one scene: fit the camera to the combined mesh
    bounds, then render either the whole scene or each
    mesh on its own.

    When meshes are rendered one by one the framing stays
    the same for every mesh, so the outputs line up when
    stacked on top of each other.

    @date: Oct, 2026
*/

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::bbox::combined_bounds;
use crate::compositing::CompositeSettings;
use crate::config::{self, RenderParameters};
use crate::error::BakeResult;
use crate::fitting::{self, FitResult};
use crate::prelude::*;
use crate::renderer::{RenderHost, SoftwareHost};
use crate::scene::{BakeScene, SceneProvider};

/// Folder created next to the scene file for the rendered passes
pub const OUTPUT_DIRECTORY: &str = "render";


/// Load a scene file and bake it with the software host.
///
/// Without overrides the config is the render.cfg next to the scene
/// and outputs go to the render/ folder next to it.
pub fn bake_scene_file(scene_path: &Path, config_path: Option<&Path>, output_dir: Option<&Path>) -> BakeResult<Vec<PathBuf>> {
    let span = tracing::info_span!("bake", scene = ?scene_path);
    let _enter = span.enter();

    let start = Instant::now();
    let scene = BakeScene::load(scene_path)?;
    let scene_dir = scene.directory().to_path_buf();

    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| scene_dir.join(config::CONFIG_FILE_NAME));
    let params = config::load_render_parameters(&config_path);

    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| scene_dir.join(OUTPUT_DIRECTORY));

    let mut host = SoftwareHost::new(scene, output_dir);
    let written = bake(&mut host, &params)?;
    info!("Baked {:?} into {} files in {:?}", scene_path, written.len(), start.elapsed());
    Ok(written)
}

pub fn bake<H>(host: &mut H, params: &RenderParameters) -> BakeResult<Vec<PathBuf>>
where
    H: SceneProvider + RenderHost,
{
    let bounds = combined_bounds(&host.mesh_bounds())?;
    debug!("Combined bounds: {:?}", bounds);

    let fit = fitting::fit(&bounds, &params.fit)?;
    let camera = host.first_camera()?;
    host.place_camera(&camera, &fit);
    host.set_output_resolution(fit.output_resolution);

    if params.split_meshes {
        render_split(host, params, &fit)
    } else {
        host.configure_compositing_outputs(&CompositeSettings::new(params, &fit, ""));
        host.render()
    }
}

/// Render each visible mesh alone, prefixing its outputs with the mesh name
fn render_split<H>(host: &mut H, params: &RenderParameters, fit: &FitResult) -> BakeResult<Vec<PathBuf>>
where
    H: SceneProvider + RenderHost,
{
    let names = host.mesh_names();
    info!("Rendering {} meshes separately", names.len());
    for name in names.iter() {
        host.set_render_visibility(name, false);
    }

    let mut render_each = || -> BakeResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for name in names.iter() {
            info!("Rendering mesh '{}'", name);
            host.set_render_visibility(name, true);
            host.configure_compositing_outputs(&CompositeSettings::new(params, fit, &format!("{}_", name)));
            let result = host.render();
            host.set_render_visibility(name, false);
            written.extend(result?);
        }
        Ok(written)
    };
    let result = render_each();

    // Leave the scene as it was, also when a render failed
    for name in names.iter() {
        host.set_render_visibility(name, true);
    }
    result
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;
    use crate::camera::CameraHandle;
    use crate::error::BakeError;
    use crate::fitting::Resolution;

    /// Records what the orchestration asks of a host
    #[derive(Default)]
    struct RecordingHost {
        meshes: Vec<(String, BBox, bool)>, // name, bounds, render visible
        has_camera: bool,
        fail_on: Option<String>,
        placed: Option<FitResult>,
        resolution: Option<Resolution>,
        prefix: String,
        renders: Vec<Vec<String>>, // visible meshes per render call
    }

    impl RecordingHost {
        fn with_meshes(boxes: &[(&str, BBox)]) -> Self {
            Self {
                meshes: boxes.iter().map(|(n, b)| (n.to_string(), *b, true)).collect(),
                has_camera: true,
                ..Default::default()
            }
        }
    }

    impl SceneProvider for RecordingHost {
        fn mesh_bounds(&self) -> Vec<BBox> {
            self.meshes.iter().map(|(_, b, _)| *b).collect()
        }

        fn mesh_names(&self) -> Vec<String> {
            self.meshes.iter().map(|(n, _, _)| n.clone()).collect()
        }

        fn first_camera(&self) -> BakeResult<CameraHandle> {
            if self.has_camera {
                Ok(CameraHandle { name: "Camera".into(), index: 0 })
            } else {
                Err(BakeError::NoCameraFound)
            }
        }

        fn set_render_visibility(&mut self, mesh_name: &str, visible: bool) {
            for m in self.meshes.iter_mut().filter(|m| m.0 == mesh_name) {
                m.2 = visible;
            }
        }
    }

    impl RenderHost for RecordingHost {
        fn place_camera(&mut self, _camera: &CameraHandle, fit: &FitResult) {
            self.placed = Some(*fit);
        }

        fn set_output_resolution(&mut self, resolution: Resolution) {
            self.resolution = Some(resolution);
        }

        fn configure_compositing_outputs(&mut self, settings: &CompositeSettings) {
            self.prefix = settings.prefix.clone();
        }

        fn render(&mut self) -> BakeResult<Vec<PathBuf>> {
            let visible: Vec<String> = self.meshes.iter().filter(|m| m.2).map(|m| m.0.clone()).collect();
            self.renders.push(visible.clone());
            if let Some(name) = &self.fail_on {
                if visible.contains(name) {
                    return Err(BakeError::invalid_mesh(name, "render failed"));
                }
            }
            Ok(vec![PathBuf::from(format!("{}scene_diffuse.png", self.prefix))])
        }
    }

    fn plank() -> BBox {
        BBox::new(Vector3::new(0., 0., 0.), Vector3::new(2., 1., 0.5))
    }

    fn block() -> BBox {
        BBox::new(Vector3::new(1., 0., 0.), Vector3::new(2., 1., 1.))
    }

    #[test]
    fn test_bake_whole_scene() {
        let mut host = RecordingHost::with_meshes(&[("plank", plank()), ("block", block())]);
        let paths = bake(&mut host, &RenderParameters::default()).unwrap();
        assert_eq!(paths, vec![PathBuf::from("scene_diffuse.png")]);
        assert_eq!(host.renders, vec![vec!["plank".to_string(), "block".to_string()]]);

        // 2:1 bounds shrink the short axis
        assert_eq!(host.resolution, Some(Resolution::new(512, 256)));
        let fit = host.placed.unwrap();
        assert_eq!(fit.camera_center, Vector2::new(1.0, 0.5));
        assert!(fit.camera_height > 1.0);
    }

    #[test]
    fn test_bake_split_meshes() {
        let mut host = RecordingHost::with_meshes(&[("plank", plank()), ("block", block())]);
        let params = RenderParameters { split_meshes: true, ..Default::default() };
        let paths = bake(&mut host, &params).unwrap();

        assert_eq!(paths, vec![
            PathBuf::from("plank_scene_diffuse.png"),
            PathBuf::from("block_scene_diffuse.png"),
        ]);
        assert_eq!(host.renders, vec![vec!["plank".to_string()], vec!["block".to_string()]]);
        assert!(host.meshes.iter().all(|m| m.2));
    }

    #[test]
    fn test_split_restores_visibility_on_failure() {
        let mut host = RecordingHost::with_meshes(&[("plank", plank()), ("block", block())]);
        host.fail_on = Some("plank".into());
        let params = RenderParameters { split_meshes: true, ..Default::default() };

        assert!(matches!(bake(&mut host, &params), Err(BakeError::InvalidMesh { .. })));
        assert_eq!(host.renders.len(), 1);
        assert!(host.meshes.iter().all(|m| m.2));
    }

    #[test]
    fn test_bake_errors() {
        let mut empty = RecordingHost { has_camera: true, ..Default::default() };
        assert!(matches!(bake(&mut empty, &RenderParameters::default()), Err(BakeError::EmptyInput)));

        let mut no_camera = RecordingHost::with_meshes(&[("plank", plank())]);
        no_camera.has_camera = false;
        assert!(matches!(bake(&mut no_camera, &RenderParameters::default()), Err(BakeError::NoCameraFound)));
        assert!(no_camera.renders.is_empty());

        let point = BBox::new(Vector3::ONE, Vector3::ONE);
        let mut degenerate = RecordingHost::with_meshes(&[("dot", point)]);
        assert!(matches!(bake(&mut degenerate, &RenderParameters::default()), Err(BakeError::DegenerateBounds)));
    }

    #[test]
    fn test_bake_scene_file() {
        let dir = std::env::temp_dir().join(format!("fury_baker_bake_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let scene = r#"{
            "Scene": {
                "Cameras": { "Camera": { "_name": "Camera" } },
                "Meshes": { "Mesh": { "_name": "plank", "VertexData": "0 0 0  2 0 0  2 1 0  0 1 0", "Faces": "0 1 2  0 2 3" } }
            }
        }"#;
        std::fs::write(dir.join("plank.json"), scene).unwrap();
        std::fs::write(dir.join(config::CONFIG_FILE_NAME), "[DEFAULT]\nresolution = 16\nambient_occlusion = no\n").unwrap();

        let paths = bake_scene_file(&dir.join("plank.json"), None, None).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.parent() == Some(dir.join(OUTPUT_DIRECTORY).as_path())));
        assert!(paths.contains(&dir.join(OUTPUT_DIRECTORY).join("plank_depth.png")));

        let decoder = png::Decoder::new(std::io::BufReader::new(std::fs::File::open(&paths[0]).unwrap()));
        let reader = decoder.read_info().unwrap();
        assert_eq!((reader.info().width, reader.info().height), (16, 8));

        let missing = bake_scene_file(&dir.join("unsaved.json"), None, None);
        assert!(matches!(missing, Err(BakeError::SceneLoad { .. })));
    }
}
