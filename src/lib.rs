pub mod ray;
pub mod bake;
pub mod bbox;
pub mod mesh;
pub mod image;
pub mod error;
pub mod scene;
pub mod camera;
pub mod config;
pub mod fitting;
pub mod numeric;
pub mod sampler;
pub mod interval;
pub mod renderer;
pub mod geometry;
pub mod compositing;
pub mod json_structs;
pub mod json_parser;

pub mod prelude;
