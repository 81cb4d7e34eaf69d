/*

    Triangle meshes of the bake scene.

    A mesh is given either inline in the scene JSON
    ("VertexData" + "Faces", 0-based indices) or as a
    .ply file relative to the scene file. Vertices are
    world-space, there are no transformations.

    @date: Oct-Nov 2025
*/

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::bbox::{BBox, BBoxable};
use crate::error::{BakeError, BakeResult};
use crate::geometry::{get_tri_normal, is_degenerate_triangle, moller_trumbore_intersection};
use crate::interval::Interval;
use crate::prelude::*;
use crate::ray::Ray;


#[derive(Debug, Clone)]
pub struct Triangle {
    pub corners: [Vector3; 3],
    pub normal: Vector3,
}

impl Triangle {
    pub fn new(corners: [Vector3; 3]) -> Self {
        let [a, b, c] = &corners;
        Self {
            normal: get_tri_normal(a, b, c),
            corners,
        }
    }
}


#[derive(Debug, Deserialize, Clone)]
#[derive(SmartDefault)]
#[serde(default)]
pub struct Mesh {
    #[serde(rename = "_name")]
    pub name: String,

    #[default(Vector3::splat(0.8))]
    #[serde(rename = "Diffuse", deserialize_with = "deser_vec3")]
    pub diffuse: Vector3,

    /// Hidden meshes neither count for the bounds nor show up in renders
    #[default = true]
    #[serde(rename = "Visible", deserialize_with = "deser_bool")]
    pub visible: bool,

    #[serde(rename = "VertexData", deserialize_with = "deser_vertex_data")]
    pub vertices: Vec<Vector3>,

    #[serde(rename = "Faces", deserialize_with = "deser_usize_vec")]
    pub faces: Vec<usize>,

    #[serde(rename = "_plyFile")]
    pub ply_file: Option<String>,

    /// Toggled while rendering meshes one by one
    #[serde(skip)]
    pub hide_render: bool,

    #[serde(skip)]
    pub triangles: Vec<Triangle>,

    #[serde(skip)]
    bbox: Option<BBox>,
}

// Layout of .ply files, only positions and faces are read
#[derive(Deserialize)]
struct PlyVertex {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize)]
struct PlyFace {
    vertex_indices: Vec<usize>,
}

#[derive(Deserialize)]
struct PlyMesh {
    vertex: Vec<PlyVertex>,
    face: Option<Vec<PlyFace>>,
}

impl Mesh {

    pub fn new(name: &str, vertices: Vec<Vector3>, faces: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            vertices,
            faces,
            ..Default::default()
        }
    }

    /// Load PLY data if any, then validate faces and build triangles.
    pub fn setup(&mut self, scene_dir: &Path) -> BakeResult<()> {
        if let Some(ply_file) = self.ply_file.clone() {
            self.load_ply(&scene_dir.join(ply_file))?;
        }

        if self.faces.len() % 3 != 0 {
            return Err(BakeError::invalid_mesh(&self.name, format!("{} face indices is not a multiple of 3", self.faces.len())));
        }
        if let Some(bad) = self.faces.iter().find(|&&i| i >= self.vertices.len()) {
            return Err(BakeError::invalid_mesh(&self.name, format!("face index {} out of range for {} vertices", bad, self.vertices.len())));
        }

        self.setup_triangles();
        self.bbox = BBox::from_points(self.vertices.iter());
        debug!("Mesh '{}' has {} vertices, {} triangles, bbox {:?}", self.name, self.vertices.len(), self.triangles.len(), self.bbox);
        Ok(())
    }

    fn setup_triangles(&mut self) {
        let mut degenerate = 0;
        self.triangles = self.faces
            .chunks_exact(3)
            .map(|f| [self.vertices[f[0]], self.vertices[f[1]], self.vertices[f[2]]])
            .filter(|corners| {
                let keep = !is_degenerate_triangle(corners);
                if !keep { degenerate += 1; }
                keep
            })
            .map(Triangle::new)
            .collect();
        if degenerate > 0 {
            debug!("Skipped {} degenerate triangles in mesh '{}'", degenerate, self.name);
        }
    }

    fn load_ply(&mut self, ply_path: &Path) -> BakeResult<()> {
        debug!("Loading mesh '{}' from PLY file path: {:?}", self.name, ply_path);
        if !self.vertices.is_empty() || !self.faces.is_empty() {
            warn!("Mesh '{}' has both inline data and a PLY file, PLY data is appended", self.name);
        }

        let file = File::open(ply_path)
            .map_err(|e| BakeError::invalid_mesh(&self.name, format!("cannot open {:?}: {}", ply_path, e)))?;
        let reader = BufReader::new(file);
        let plymesh: PlyMesh = serde_ply::from_reader(reader)
            .map_err(|e| BakeError::invalid_mesh(&self.name, format!("cannot parse {:?}: {}", ply_path, e)))?;

        let offset = self.vertices.len();
        self.vertices.extend(plymesh.vertex.iter().map(|v| Vector3::new(v.x as Float, v.y as Float, v.z as Float)));

        for face in plymesh.face.iter().flatten() {
            // Triangulate polygons as fans around their first corner
            let idx = &face.vertex_indices;
            if idx.len() < 3 {
                warn!("Skipping PLY face with {} vertices in mesh '{}'", idx.len(), self.name);
                continue;
            }
            for k in 1..idx.len() - 1 {
                self.faces.extend_from_slice(&[idx[0] + offset, idx[k] + offset, idx[k + 1] + offset]);
            }
        }
        Ok(())
    }

    /// Whether the mesh ends up in rendered images
    pub fn is_rendered(&self) -> bool {
        self.visible && !self.hide_render
    }

    /// Closest hit as (t, normal facing the ray)
    pub fn intersects_with(&self, ray: &Ray, t_interval: &Interval) -> Option<(Float, Vector3)> {
        if !self.bbox.is_some_and(|b| b.intersect(ray, t_interval)) {
            return None;
        }

        let mut closest: Option<(Float, Vector3)> = None;
        let mut interval = *t_interval;
        for tri in self.triangles.iter() {
            if let Some((_, _, t)) = moller_trumbore_intersection(ray, &interval, &tri.corners) {
                let normal = if ray.is_front_face(tri.normal) { tri.normal } else { -tri.normal };
                closest = Some((t, normal));
                interval.max = t; // only closer hits from now on
            }
        }
        closest
    }
}

impl BBoxable for Mesh {
    fn get_bbox(&self) -> Option<BBox> {
        self.bbox
    }
}
