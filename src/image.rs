use std::path::{Path, PathBuf};
use std::io::BufWriter;
use std::fs::File;

use crate::error::BakeResult;
use crate::prelude::*;


#[derive(Clone, Debug)]
pub struct ImageData {
    // WARNING: Currently width and height is assumed to represent number of pixels,
    // not accepting a measure like centimeters, that'd require DPI as well
    pixel_colors : Vec<Vector4>, // Vector of RGBA per pixel, in [0, 1]
    width : usize,
    height: usize,
    name: String, // File name without extension
}


impl ImageData {

    pub fn new(width: usize, height: usize, name: String, pixel_colors: Vec<Vector4>) -> Self {
        debug_assert_eq!(pixel_colors.len(), width * height);
        ImageData {
            pixel_colors,
            width,
            height,
            name,
        }
    }

    /// Clamp colors and return big-endian 16 bit R G B A values per pixel
    pub fn to_rgba16(&self) -> Vec<u8> {
        self.pixel_colors
            .iter()
            .flat_map(|c| c.to_array())
            .flat_map(|x| {
                let v = (x.clamp(0.0, 1.0) * u16::MAX as Float).round() as u16;
                v.to_be_bytes()
            })
            .collect()
    }

    pub fn get_png_fullpath(&self, folder: &Path) -> PathBuf {
        folder.join(format!("{}.png", self.name))
    }

    /// Write <folder>/<name>.png as 16 bit RGBA, creating the folder if needed
    /// and overwriting any existing file.
    ///
    /// DISCLAIMER: This function is based on https://docs.rs/png/0.18.0/png/
    pub fn save_png(&self, folder: &Path) -> BakeResult<PathBuf> {
        std::fs::create_dir_all(folder)?;
        let path: PathBuf = self.get_png_fullpath(folder);

        let file = File::create(&path)?;
        let w = &mut BufWriter::new(file);
        let mut encoder = png::Encoder::new(w, self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Sixteen);
        let mut writer = encoder.write_header()?;

        let data = self.to_rgba16();
        writer.write_image_data(&data)?; // Save
        writer.finish()?;
        info!("Image saved to {}", path.display());
        Ok(path)
    }
}


/// Center of pixel (col, row) on the near plane, interpolated between its corners.
/// Corners are [0]=top-left, [1]=top-right, [2]=bottom-left, [3]=bottom-right
pub fn get_pixel_center(col: usize, row: usize, width: usize, height: usize, near_plane_corners: &[Vector3; 4]) -> Vector3 {
    let u = (col as Float + 0.5) / width as Float; // pixel width
    let v = (row as Float + 0.5) / height as Float; // pixel height

    let top = near_plane_corners[0] * (1.0 - u) + near_plane_corners[1] * u;
    let bottom = near_plane_corners[2] * (1.0 - u) + near_plane_corners[3] * u;
    top * (1.0 - v) + bottom * v
}
