/*

    Declare the bake scene: cameras and triangle meshes
    read from a JSON file, e.g.

    {
      "Scene": {
        "Cameras": { "Camera": { "_name": "Camera" } },
        "Meshes": {
          "Mesh": [
            { "_name": "lid", "VertexData": "...", "Faces": "..." },
            { "_name": "body", "_plyFile": "body.ply", "Visible": "true" }
          ]
        }
      }
    }

    SceneProvider is what the bake orchestration needs
    from a scene: bounds, a camera and per-mesh render
    visibility.

    @date: 2 Oct, 2025
*/

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::bbox::{BBox, BBoxable};
use crate::camera::{CameraHandle, Cameras};
use crate::error::{BakeError, BakeResult};
use crate::interval::Interval;
use crate::json_structs::SingleOrVec;
use crate::mesh::Mesh;
use crate::prelude::*;
use crate::ray::{HitRecord, Ray};


pub trait SceneProvider {
    /// Bounds of every visible mesh that has geometry
    fn mesh_bounds(&self) -> Vec<BBox>;

    /// Names of the visible meshes, in scene order
    fn mesh_names(&self) -> Vec<String>;

    fn first_camera(&self) -> BakeResult<CameraHandle>;

    /// Include or exclude a mesh from renders without touching its viewport visibility
    fn set_render_visibility(&mut self, mesh_name: &str, visible: bool);
}


#[derive(Debug, Deserialize)]
pub struct RootScene {
    #[serde(rename = "Scene")]
    pub scene: SceneJSON,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct SceneJSON {
    pub cameras: Cameras,
    pub meshes: SceneMeshes,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SceneMeshes {
    #[serde(rename = "Mesh")]
    pub mesh: SingleOrVec<Mesh>,
}


#[derive(Debug)]
pub struct BakeScene {
    /// File stem of the scene, used in output file names
    pub name: String,
    pub path: PathBuf,
    pub cameras: Cameras,
    pub meshes: Vec<Mesh>,
}

impl BakeScene {

    pub fn load(path: &Path) -> BakeResult<Self> {
        if !path.is_file() {
            return Err(BakeError::scene_load(path, "file does not exist, the scene must be saved before baking"));
        }
        info!("Loading scene from {:?}", path);

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let root: RootScene = serde_json::from_reader(reader)
            .map_err(|e| BakeError::scene_load(path, e))?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scene".to_string());
        let scene_dir = path.parent().unwrap_or(Path::new("."));

        Self::new(name, path.to_path_buf(), root.scene.cameras, root.scene.meshes.mesh.into_vec(), scene_dir)
    }

    /// Name the meshes uniquely and set them up (PLY loading, triangles, bounds)
    pub fn new(name: String, path: PathBuf, cameras: Cameras, mut meshes: Vec<Mesh>, scene_dir: &Path) -> BakeResult<Self> {
        let mut seen: HashSet<String> = HashSet::new();
        for (i, mesh) in meshes.iter_mut().enumerate() {
            if mesh.name.trim().is_empty() {
                mesh.name = format!("Mesh.{:03}", i);
            }
            if seen.contains(&mesh.name) {
                let base = mesh.name.clone();
                let mut k = 1;
                while seen.contains(&format!("{}.{:03}", base, k)) {
                    k += 1;
                }
                mesh.name = format!("{}.{:03}", base, k);
                warn!("Duplicate mesh name '{}', renamed to '{}'", base, mesh.name);
            }
            seen.insert(mesh.name.clone());
            mesh.setup(scene_dir)?;
        }

        info!("Scene '{}' has {} cameras and {} meshes", name, cameras.all().len(), meshes.len());
        Ok(Self { name, path, cameras, meshes })
    }

    /// Folder the scene file is in
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Iterate over rendered meshes to find the closest hit
    pub fn hit(&self, ray: &Ray, t_interval: &Interval, early_break: bool) -> Option<HitRecord> {
        let mut rec: Option<HitRecord> = None;
        let mut interval = *t_interval;
        for (i, mesh) in self.meshes.iter().enumerate().filter(|(_, m)| m.is_rendered()) {
            if let Some((t, normal)) = mesh.intersects_with(ray, &interval) {
                if early_break {
                    return Some(HitRecord::new(ray.at(t), normal, t, i));
                }
                interval.max = t;
                rec = Some(HitRecord::new(ray.at(t), normal, t, i));
            }
        }
        rec
    }
}

impl SceneProvider for BakeScene {
    fn mesh_bounds(&self) -> Vec<BBox> {
        self.meshes
            .iter()
            .filter(|m| m.visible)
            .filter_map(|m| m.get_bbox())
            .collect()
    }

    fn mesh_names(&self) -> Vec<String> {
        self.meshes
            .iter()
            .filter(|m| m.visible)
            .map(|m| m.name.clone())
            .collect()
    }

    fn first_camera(&self) -> BakeResult<CameraHandle> {
        self.cameras
            .all()
            .first()
            .map(|cam| CameraHandle { name: cam.name.clone(), index: 0 })
            .ok_or(BakeError::NoCameraFound)
    }

    fn set_render_visibility(&mut self, mesh_name: &str, visible: bool) {
        match self.meshes.iter_mut().find(|m| m.name == mesh_name) {
            Some(mesh) => mesh.hide_render = !visible,
            None => warn!("No mesh named '{}' to change render visibility of", mesh_name),
        }
    }
}
