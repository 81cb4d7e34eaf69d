/*

    Bake top-down diffuse, normal and depth maps of
    a scene, with the camera fitted to the meshes.

    Usage:
        baker scenes/crate.json
        baker scenes/          (every scene .json below it)

    @date: Oct, 2025

*/

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use fury_baker::bake::{bake_scene_file, OUTPUT_DIRECTORY};

#[derive(Parser, Debug)]
#[command(name = "baker")]
#[command(about = "Bake top-down texture passes of mesh scenes", long_about = None)]
struct Args {
    /// Scene .json file, or a directory to search for scene files
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Config file to use instead of the render.cfg next to each scene
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Folder to write images to instead of render/ next to each scene
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
}

/// Scene files to bake: PATH itself, or every .json below it
fn collect_scenes(path: &Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }

    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")))
        // A render.json is a config, not a scene, and nothing inside render/ is a scene either
        .filter(|p| p.file_stem().is_some_and(|stem| stem != OUTPUT_DIRECTORY))
        .filter(|p| {
            let relative = p.strip_prefix(path).unwrap_or(p);
            !relative.components().any(|c| c.as_os_str() == OUTPUT_DIRECTORY)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {

    // Logging on console
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let start = Instant::now();

    let scenes = collect_scenes(&args.path);
    if scenes.is_empty() {
        warn!("No scene files found in {:?}", args.path);
    }

    let mut failed = 0;
    for scene_path in scenes.iter() {
        match bake_scene_file(scene_path, args.config.as_deref(), args.output.as_deref()) {
            Ok(paths) => {
                for p in paths.iter() {
                    info!("Wrote {}", p.display());
                }
            }
            Err(e) => {
                error!("Failed to bake {:?}: {}", scene_path, e);
                failed += 1;
            }
        }
    }

    info!("Finished {} scenes in {:?}", scenes.len(), start.elapsed());
    if failed > 0 {
        return Err(format!("{} of {} scenes failed", failed, scenes.len()).into());
    }
    Ok(())
}
