/*

    Load render parameters from the optional render.cfg
    that sits next to a scene file.

    The file is INI style, compatible with what Python's
    configparser reads:

        [DEFAULT]
        xy_padding = 0.1
        resolution = 1024
        split_meshes = yes

    Only the [DEFAULT] section (and lines before any section
    header) is read. A .json file with the same keys works too.
    Both are first turned into a serde_json map so values given
    as strings or numbers are handled the same way.

    Nothing in here is fatal: a missing file, an unreadable
    file or a malformed value all fall back to defaults.

    @date: Oct, 2026
*/

use std::path::Path;

use serde_json::{Map, Value};

use crate::prelude::*;
use crate::fitting::{FitConfig, Resolution};

pub const CONFIG_FILE_NAME: &str = "render.cfg";
const DEFAULT_SECTION: &str = "default";


#[derive(Debug, Clone, PartialEq, SmartDefault)]
pub struct RenderParameters {
    pub fit: FitConfig,
    pub brightness_boost: Float,
    pub contrast_boost: Float,
    /// Render each mesh on its own, framed by the combined bounds of all meshes
    pub split_meshes: bool,
    #[default = true]
    pub ambient_occlusion: bool,
    #[default = 16]
    pub ao_samples: usize,
    #[default = 1.0]
    pub ao_distance: Float,
}

/// Read parameters from `path`, falling back to defaults for anything missing or malformed
pub fn load_render_parameters(path: &Path) -> RenderParameters {
    let span = tracing::span!(tracing::Level::INFO, "load_config");
    let _enter = span.enter();

    if !path.exists() {
        info!("No config found at {:?}, using defaults", path);
        return RenderParameters::default();
    }

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read config {:?}: {}, using defaults", path, e);
            return RenderParameters::default();
        }
    };

    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let map = if is_json {
        match serde_json::from_str::<Map<String, Value>>(&text) {
            Ok(map) => map,
            Err(e) => {
                warn!("Config {:?} is not a JSON object ({}), using defaults", path, e);
                return RenderParameters::default();
            }
        }
    } else {
        parse_ini_defaults(&text)
    };

    let params = RenderParameters::from_map(&map);
    debug!("Loaded render parameters from {:?}:\n{:#?}", path, params);
    params
}

/// Collect `key = value` pairs of the DEFAULT section into a map of strings.
/// Keys are lowercased like configparser does.
pub fn parse_ini_defaults(text: &str) -> Map<String, Value> {
    let mut map = Map::new();
    let mut in_default = true; // lines before any header count as DEFAULT

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            match line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                Some(section) => in_default = section.trim().eq_ignore_ascii_case(DEFAULT_SECTION),
                None => warn!("Malformed section header on line {}: '{}'", lineno + 1, line),
            }
            continue;
        }

        if !in_default {
            continue;
        }

        // configparser splits on whichever delimiter comes first
        let Some(split_at) = line.find(['=', ':']) else {
            warn!("Ignoring line {} of config, expected 'key = value': '{}'", lineno + 1, line);
            continue;
        };
        let (key, value) = line.split_at(split_at);
        let key = key.trim().to_lowercase();
        let value = value[1..].trim();
        if key.is_empty() {
            warn!("Ignoring line {} of config, empty key", lineno + 1);
            continue;
        }
        map.insert(key, Value::String(value.to_string()));
    }
    map
}

impl RenderParameters {
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut params = RenderParameters::default();

        if let Some(v) = read_key(map, "xy_padding", float_from_value) {
            params.fit.xy_padding = non_negative("xy_padding", v, params.fit.xy_padding);
        }
        if let Some(v) = read_key(map, "z_padding", float_from_value) {
            params.fit.z_padding = non_negative("z_padding", v, params.fit.z_padding);
        }
        if let Some([w, h]) = read_key(map, "resolution", pair_from_value) {
            if w > 0 && h > 0 {
                params.fit.resolution = Resolution::new(w, h);
            } else {
                warn!("Resolution must be positive, found {}x{}, using {}", w, h, params.fit.resolution);
            }
        }
        if let Some(v) = read_key(map, "camera_height", float_from_value) {
            params.fit.camera_height = Some(v);
        }
        if let Some(v) = read_key(map, "shrink_resolution_when_fitting", bool_from_value) {
            params.fit.shrink_resolution_when_fitting = v;
        }
        if let Some(v) = read_key(map, "brightness_boost", float_from_value) {
            params.brightness_boost = v;
        }
        if let Some(v) = read_key(map, "contrast_boost", float_from_value) {
            params.contrast_boost = v;
        }
        if let Some(v) = read_key(map, "split_meshes", bool_from_value) {
            params.split_meshes = v;
        }
        if let Some(v) = read_key(map, "ambient_occlusion", bool_from_value) {
            params.ambient_occlusion = v;
        }
        if let Some(v) = read_key(map, "ao_samples", usize_from_value) {
            if v > 0 {
                params.ao_samples = v;
            } else {
                warn!("ao_samples must be positive, using {}", params.ao_samples);
            }
        }
        if let Some(v) = read_key(map, "ao_distance", float_from_value) {
            if v > 0.0 {
                params.ao_distance = v;
            } else {
                warn!("ao_distance must be positive, using {}", params.ao_distance);
            }
        }

        for key in map.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                debug!("Ignoring unrecognized config key '{}'", key);
            }
        }
        params
    }
}

const KNOWN_KEYS: [&str; 11] = [
    "xy_padding",
    "z_padding",
    "resolution",
    "camera_height",
    "brightness_boost",
    "contrast_boost",
    "split_meshes",
    "shrink_resolution_when_fitting",
    "ambient_occlusion",
    "ao_samples",
    "ao_distance",
];

fn read_key<T>(map: &Map<String, Value>, key: &str, parse: fn(&Value) -> Option<T>) -> Option<T> {
    let value = map.get(key)?;
    let parsed = parse(value);
    if parsed.is_none() {
        warn!("Malformed value {} for '{}' in config, using default", value, key);
    }
    parsed
}

fn non_negative(key: &str, v: Float, fallback: Float) -> Float {
    if v >= 0.0 {
        v
    } else {
        warn!("'{}' must not be negative, found {}, using {}", key, v, fallback);
        fallback
    }
}
