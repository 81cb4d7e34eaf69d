/*

    Provide utilities to parse scene and config values.

    This format currently assumes:
        - Scalars may be given as strings (e.g. "0.5") or as is
        - Vector3 data fields are in format "<a> <a> <a>" where <a> is integer or float

    e.g. In JSON file both
    "Visible": "false" and "Visible": false
    works as visible: bool in source code

    @date: 2 Oct, 2025
*/

use std::fmt::{self};
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde::de::{self, Visitor, SeqAccess};

use serde_json::Value;

use crate::numeric::{Float, Vector3};


/// Parse booleans the way configparser does:
/// 1/yes/true/on and 0/no/false/off, case-insensitive
pub fn parse_bool_str(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn deser_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoolVisitor;

    impl<'de> serde::de::Visitor<'de> for BoolVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a boolean or a string containing true/false")
        }

        fn visit_bool<E>(self, v: bool) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            Ok(v)
        }

        fn visit_str<E>(self, v: &str) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            parse_bool_str(v).ok_or_else(|| E::custom(format!("invalid bool '{}'", v)))
        }

        fn visit_string<E>(self, v: String) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            self.visit_str(&v)
        }

        fn visit_u64<E>(self, v: u64) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            Ok(v != 0)
        }
    }

    deserializer.deserialize_any(BoolVisitor)
}

pub(crate) fn deser_vec3<'de, D>(deserializer: D) -> Result<Vector3, D::Error>
where
    D: Deserializer<'de>,
{
    struct Vec3Visitor;

    impl<'de> Visitor<'de> for Vec3Visitor {
        type Value = Vector3;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a Vec3 as a string 'x y z' or an array [x, y, z]")
        }

        // Given "X Y Z"
        fn visit_str<E>(self, value: &str) -> Result<Vector3, E>
        where
            E: de::Error,
        {
            parse_vec3_str(value).map_err(de::Error::custom)
        }

        // Given [X, Y, Z]
        fn visit_seq<A>(self, mut seq: A) -> Result<Vector3, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let x: Float = seq
                .next_element()?
                .ok_or_else(|| de::Error::custom("Expected 3 elements in Vec3 array"))?;
            let y: Float = seq
                .next_element()?
                .ok_or_else(|| de::Error::custom("Expected 3 elements in Vec3 array"))?;
            let z: Float = seq
                .next_element()?
                .ok_or_else(|| de::Error::custom("Expected 3 elements in Vec3 array"))?;
            if seq.next_element::<Float>()?.is_some() {
                return Err(de::Error::custom("Expected only 3 elements in Vec3 array"));
            }
            Ok(Vector3::new(x, y, z))
        }
    }

    deserializer.deserialize_any(Vec3Visitor)
}

/// Parse a pair of positive integers given as "W H", "WxH", "[W, H]" or a single "N" (square)
pub fn parse_pair_str(s: &str) -> Option<[usize; 2]> {
    let cleaned = s.trim().trim_start_matches('[').trim_end_matches(']');
    let parts: Vec<&str> = cleaned
        .split(|c: char| c.is_whitespace() || c == 'x' || c == 'X' || c == ',' || c == '*')
        .filter(|p| !p.is_empty())
        .collect();
    let parsed = parts
        .iter()
        .map(|p| p.parse::<usize>().ok())
        .collect::<Option<Vec<_>>>()?;
    match parsed.as_slice() {
        [n] => Some([*n, *n]),
        [w, h] => Some([*w, *h]),
        _ => None,
    }
}

pub(crate) fn deser_numeric_vec<'de, D, N>(deserializer: D) -> Result<Vec<N>, D::Error>
where
    D: serde::Deserializer<'de>,
    N: FromStr,
    N::Err: fmt::Display,
{
    // Deserialize string of numbers separated by whitespace
    // into a vector of numbers, e.g. "0 2 3" in .json is deserialized
    // to Vec<N> where N is number-like (see deser_usize_vec and deser_vertex_data
    // wrappers).
    let s: String = Deserialize::deserialize(deserializer)?;
    let numbers = s
        .split_whitespace()
        .map(|x| x.parse::<N>().map_err(serde::de::Error::custom))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(numbers)
}


// Wrapper for deser_numeric_vec<usize>
pub(crate) fn deser_usize_vec<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deser_numeric_vec::<D, usize>(deserializer)
}

pub fn deser_vertex_data<'de, D>(deserializer: D) -> Result<Vec<Vector3>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_string_vecvec3(&s).map_err(serde::de::Error::custom)
}


/// Helper function: parse a string like "25 25 25" into Vector3
fn parse_vec3_str(s: &str) -> Result<Vector3, String> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(format!("Expected 3 values, got {}", parts.len()));
    }
    let x = parts[0].parse::<Float>().map_err(|e| e.to_string())?;
    let y = parts[1].parse::<Float>().map_err(|e| e.to_string())?;
    let z = parts[2].parse::<Float>().map_err(|e| e.to_string())?;
    Ok(Vector3::new(x, y, z))
}


pub fn parse_string_vecvec3(s: &str) -> Result<Vec<Vector3>, String> {
    let nums: Vec<Float> = s
        .split_whitespace()
        .map(|x| x.parse::<Float>().map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;

    if nums.len() % 3 != 0 {
        return Err(format!("Input length {} not divisible by 3", nums.len()));
    }

    Ok(nums.chunks(3).map(|c| Vector3::new(c[0], c[1], c[2])).collect())
}


/// Lenient scalars from a JSON value: numbers, or strings holding one.
/// Used for config maps, where INI values are always strings.
pub fn float_from_value(value: &Value) -> Option<Float> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<Float>().ok(),
        _ => None,
    };
    v.filter(|v| v.is_finite())
}

pub fn usize_from_value(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|v| v as usize),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    }
}

pub fn bool_from_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_u64().map(|v| v != 0),
        Value::String(s) => parse_bool_str(s),
        _ => None,
    }
}

pub fn pair_from_value(value: &Value) -> Option<[usize; 2]> {
    match value {
        Value::Number(n) => n.as_u64().map(|v| [v as usize, v as usize]),
        Value::String(s) => parse_pair_str(s),
        Value::Array(items) => match items.as_slice() {
            [w, h] => Some([usize_from_value(w)?, usize_from_value(h)?]),
            _ => None,
        },
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "deser_bool")]
        b: bool,
        #[serde(deserialize_with = "deser_vec3")]
        v: Vector3,
    }

    #[test]
    fn test_string_or_value() {
        let p: Probe = serde_json::from_str(r#"{"b": "Yes", "v": "1 2 3"}"#).unwrap();
        assert!(p.b);
        assert_eq!(p.v, Vector3::new(1., 2., 3.));

        let p: Probe = serde_json::from_str(r#"{"b": 0, "v": [0, 0.5, 1]}"#).unwrap();
        assert!(!p.b);
        assert_eq!(p.v, Vector3::new(0., 0.5, 1.));
    }

    #[test]
    fn test_scalars_from_value() {
        use serde_json::json;
        assert_eq!(float_from_value(&json!(" 0.25 ")), Some(0.25));
        assert_eq!(float_from_value(&json!(3)), Some(3.0));
        assert_eq!(float_from_value(&json!("NaN")), None);
        assert_eq!(usize_from_value(&json!("16")), Some(16));
        assert_eq!(usize_from_value(&json!(-1)), None);
        assert_eq!(bool_from_value(&json!("Off")), Some(false));
        assert_eq!(bool_from_value(&json!(1)), Some(true));
        assert_eq!(pair_from_value(&json!(256)), Some([256, 256]));
        assert_eq!(pair_from_value(&json!("128x64")), Some([128, 64]));
        assert_eq!(pair_from_value(&json!([64, "32"])), Some([64, 32]));
        assert_eq!(pair_from_value(&json!([1, 2, 3])), None);
    }

    #[test]
    fn test_parse_bool_str() {
        assert_eq!(parse_bool_str("ON"), Some(true));
        assert_eq!(parse_bool_str(" off "), Some(false));
        assert_eq!(parse_bool_str("maybe"), None);
    }

    #[test]
    fn test_parse_pair_str() {
        assert_eq!(parse_pair_str("512"), Some([512, 512]));
        assert_eq!(parse_pair_str("1024 512"), Some([1024, 512]));
        assert_eq!(parse_pair_str("1024x256"), Some([1024, 256]));
        assert_eq!(parse_pair_str("[64, 32]"), Some([64, 32]));
        assert_eq!(parse_pair_str("1 2 3"), None);
        assert_eq!(parse_pair_str("big"), None);
    }

    #[test]
    fn test_parse_string_vecvec3() {
        let v = parse_string_vecvec3("0 0 0  1 2 3").unwrap();
        assert_eq!(v, vec![Vector3::ZERO, Vector3::new(1., 2., 3.)]);
        assert!(parse_string_vecvec3("0 0").is_err());
    }
}
