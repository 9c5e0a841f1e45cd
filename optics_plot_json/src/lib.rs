//! Reading and writing optical scene descriptions as JSON.
//!
//! Two layouts are understood. The canonical one, shared with the simulator:
//!
//! ```json
//! {
//!     "ray": {
//!         "boundaries": [
//!             { "Line": { "opt_idx": 1.0, "midpoint": 0.0, "height": 5.0 } },
//!             { "Spherical": { "opt_idx": 1.5, "midpoint": 10.0, "radius": 5.0, "height": 3.0 } },
//!             { "Conic": { "opt_idx": 1.0, "midpoint": 20.0, "radius": -8.0, "conic_param": -1.0, "height": 3.0 } }
//!         ]
//!     }
//! }
//! ```
//!
//! and the legacy flat map, see [`legacy`].

use optics_plot::{Boundary, ConicSurface, Float, Label, LineSurface, Shape, SphericalSurface};
use std::{fs::File, io::BufReader, path::Path};

use core::ops::Deref;

pub use serde_json;

mod error;
pub mod legacy;

pub use error::ConfigError;

pub type Result<T> = core::result::Result<T, ConfigError>;

/// The number at `json[field]`.
pub fn get_float(json: &serde_json::Value, field: &'static str) -> Result<Float> {
    json.get(field)
        .ok_or(ConfigError::MissingField(field))?
        .as_f64()
        .ok_or(ConfigError::InvalidField {
            field,
            expected: "a number",
        })
}

/// The number at `json[field]`, or `default` if the field is absent.
pub fn get_float_or(
    json: &serde_json::Value,
    field: &'static str,
    default: Float,
) -> Result<Float> {
    match json.get(field) {
        None => Ok(default),
        Some(_) => get_float(json, field),
    }
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &serde_json::Value,
    field: &'static str,
    map: impl FnMut((usize, &serde_json::Value)) -> Result<T>,
) -> Result<C> {
    json.as_array()
        .ok_or(ConfigError::InvalidField {
            field,
            expected: "an array",
        })?
        .iter()
        .enumerate()
        .map(map)
        .collect()
}

pub trait JsonType {
    /// The tag identifying this type in a tagged boundary object.
    fn json_type() -> &'static str;
}

pub trait JsonSer {
    /// Serialize `self` into a JSON object.
    fn to_json(&self) -> serde_json::Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> serde_json::Value {
        self.deref().to_json()
    }
}

impl<'a, T: JsonSer + ?Sized> JsonSer for &'a T {
    fn to_json(&self) -> serde_json::Value {
        (*self).to_json()
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON object.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &serde_json::Value) -> Result<Self>
    where
        Self: Sized;
}

impl JsonSer for Label {
    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Integer(n) => serde_json::json!(n),
            Self::Number(n) => serde_json::json!(n),
            Self::Text(s) => serde_json::json!(s),
        }
    }
}

impl JsonDes for Label {
    fn from_json(json: &serde_json::Value) -> Result<Self> {
        match json {
            // `2` stays an integer, `2.0` stays a float, as written
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Label::Integer)
                .or_else(|| n.as_f64().map(Label::Number)),
            serde_json::Value::String(s) => Some(Label::Text(s.clone())),
            _ => None,
        }
        .ok_or(ConfigError::InvalidField {
            field: "opt_idx",
            expected: "a number or a string",
        })
    }
}

impl JsonType for LineSurface {
    fn json_type() -> &'static str {
        "Line"
    }
}

impl JsonSer for LineSurface {
    /// Serialize a line into a JSON object.
    ///
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "midpoint": self.x,
            "y": self.y,
            "height": self.height,
            "angle": self.angle,
        })
    }
}

impl JsonDes for LineSurface {
    /// Deserialize a line from a JSON object.
    ///
    /// ```json
    /// {
    ///     "midpoint": 3.0, // x position, "x" is also accepted
    ///     "y": 0.0, // optional, defaults to 0
    ///     "height": 5.0, // half length
    ///     "angle": 0.0, // optional tilt from the vertical in radians, defaults to 0
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self> {
        let x = if json.get("midpoint").is_some() {
            get_float(json, "midpoint")?
        } else {
            get_float(json, "x").map_err(|e| match e {
                ConfigError::MissingField(_) => ConfigError::MissingField("midpoint"),
                e => e,
            })?
        };

        Ok(Self {
            x,
            y: get_float_or(json, "y", 0.)?,
            height: get_float(json, "height")?,
            angle: get_float_or(json, "angle", 0.)?,
        })
    }
}

impl JsonType for SphericalSurface {
    fn json_type() -> &'static str {
        "Spherical"
    }
}

impl JsonSer for SphericalSurface {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "midpoint": self.midpoint,
            "radius": self.radius,
            "height": self.height,
        })
    }
}

impl JsonDes for SphericalSurface {
    /// Deserialize a spherical surface from a JSON object.
    ///
    /// ```json
    /// {
    ///     "midpoint": 10.0, // center of curvature on the optical axis
    ///     "radius": -5.0, // signed, the sign sets which way the surface opens
    ///     "height": 3.0, // maximum distance from the optical axis
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self> {
        Ok(Self {
            midpoint: get_float(json, "midpoint")?,
            radius: get_float(json, "radius")?,
            height: get_float(json, "height")?,
        })
    }
}

impl JsonType for ConicSurface {
    fn json_type() -> &'static str {
        "Conic"
    }
}

impl JsonSer for ConicSurface {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "midpoint": self.midpoint,
            "radius": self.radius,
            "conic_param": self.conic_param,
            "height": self.height,
        })
    }
}

impl JsonDes for ConicSurface {
    /// Deserialize a conic surface from a JSON object.
    ///
    /// ```json
    /// {
    ///     "midpoint": 20.0, // vertex position on the optical axis
    ///     "radius": -8.0,
    ///     "conic_param": -1.0,
    ///     "height": 3.0,
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self> {
        Ok(Self {
            midpoint: get_float(json, "midpoint")?,
            radius: get_float(json, "radius")?,
            conic_param: get_float(json, "conic_param")?,
            height: get_float(json, "height")?,
        })
    }
}

impl JsonSer for Boundary {
    /// Serialize into the tagged form, `{"<Type>": {"opt_idx": ..., <surface fields>}}`
    fn to_json(&self) -> serde_json::Value {
        let (tag, mut fields) = match &self.shape {
            Shape::Line(l) => (LineSurface::json_type(), l.to_json()),
            Shape::Spherical(s) => (SphericalSurface::json_type(), s.to_json()),
            Shape::Conic(c) => (ConicSurface::json_type(), c.to_json()),
        };

        if let Some(map) = fields.as_object_mut() {
            map.insert("opt_idx".into(), self.opt_idx.to_json());
        }

        let mut tagged = serde_json::Map::new();
        tagged.insert(tag.into(), fields);
        serde_json::Value::Object(tagged)
    }
}

impl JsonDes for Boundary {
    /// Deserialize a boundary from its tagged form: an object with a single key,
    /// the surface type, whose value holds `opt_idx` and the surface's fields.
    fn from_json(json: &serde_json::Value) -> Result<Self> {
        let mut entries = json.as_object().into_iter().flatten();

        let (Some((tag, fields)), None) = (entries.next(), entries.next()) else {
            return Err(ConfigError::InvalidField {
                field: "boundaries",
                expected: "a list of objects with a single surface type key",
            });
        };

        let opt_idx = fields
            .get("opt_idx")
            .ok_or(ConfigError::MissingField("opt_idx"))
            .and_then(Label::from_json)?;

        let shape = match tag.as_str() {
            "Line" => Shape::Line(LineSurface::from_json(fields)?),
            "Spherical" => Shape::Spherical(SphericalSurface::from_json(fields)?),
            "Conic" => Shape::Conic(ConicSurface::from_json(fields)?),
            other => return Err(ConfigError::UnknownBoundaryType(other.into())),
        };

        Ok(Self { opt_idx, shape })
    }
}

/// Which of the supported layouts a config was written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaVersion {
    /// `{"ray": {"boundaries": [{"<Type>": {...}}, ...]}}`
    Tagged,
    /// `{"<id>": {"type": "line" | "spherical", ...}, ...}`
    LegacyFlat,
}

impl SchemaVersion {
    pub fn detect(json: &serde_json::Value) -> Result<Self> {
        let map = json.as_object().ok_or(ConfigError::UnrecognizedSchema)?;

        if map.contains_key("ray") {
            return Ok(Self::Tagged);
        }

        let is_flat = !map.is_empty()
            && map
                .values()
                .all(|v| v.get("type").is_some_and(serde_json::Value::is_string));

        if is_flat {
            Ok(Self::LegacyFlat)
        } else {
            Err(ConfigError::UnrecognizedSchema)
        }
    }
}

/// The boundaries of a scene, in the order they are to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub schema: SchemaVersion,
    pub boundaries: Vec<Boundary>,
}

pub fn deserialize_scene(json: &serde_json::Value) -> Result<Scene> {
    let schema = SchemaVersion::detect(json)?;

    let boundaries = match schema {
        SchemaVersion::Tagged => {
            let boundaries = json
                .get("ray")
                .and_then(|ray| ray.get("boundaries"))
                .ok_or(ConfigError::MissingField("ray.boundaries"))?;

            map_json_array(boundaries, "ray.boundaries", |(i, boundary)| {
                Boundary::from_json(boundary).map_err(|e| e.at(i))
            })?
        }
        SchemaVersion::LegacyFlat => legacy::deserialize_boundaries(json)?,
    };

    Ok(Scene { schema, boundaries })
}

/// Serialize boundaries into the canonical layout.
pub fn serialize_scene(boundaries: &[Boundary]) -> serde_json::Value {
    serde_json::json!({
        "ray": {
            "boundaries": boundaries.to_json(),
        }
    })
}

pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(File::open(path)?))?;

    let scene = deserialize_scene(&json)?;

    log::info!(
        "loaded {} boundaries from {} ({:?} layout)",
        scene.boundaries.len(),
        path.display(),
        scene.schema,
    );

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_scene() {
        let json = json!({
            "mode": { "RayFan": { "n_rays": 10, "min_angle": -5, "max_angle": 5, "in_deg": true } },
            "ray": {
                "x": -10, "y": 0, "angle": 0, "o_idx": 1,
                "boundaries": [
                    { "Line": { "opt_idx": 1.0, "midpoint": 0, "height": 5 } },
                    { "Spherical": { "opt_idx": 1.5, "midpoint": 10, "radius": 5, "height": 3 } },
                    { "Conic": { "opt_idx": "N-BK7", "midpoint": 20, "radius": -8, "conic_param": -1, "height": 3 } },
                ]
            }
        });

        let scene = deserialize_scene(&json).unwrap();
        assert_eq!(scene.schema, SchemaVersion::Tagged);
        assert_eq!(
            scene.boundaries,
            [
                Boundary::line(1., LineSurface::vertical(0., 5.)),
                Boundary::spherical(
                    1.5,
                    SphericalSurface {
                        midpoint: 10.,
                        radius: 5.,
                        height: 3.
                    }
                ),
                Boundary::conic(
                    "N-BK7",
                    ConicSurface {
                        midpoint: 20.,
                        radius: -8.,
                        conic_param: -1.,
                        height: 3.
                    }
                ),
            ]
        );
    }

    #[test]
    fn tilted_line_fields() {
        let json = json!({ "Line": { "opt_idx": 1, "x": 2, "y": -1, "height": 4, "angle": 0.1 } });
        let boundary = Boundary::from_json(&json).unwrap();
        assert_eq!(
            boundary.shape,
            Shape::Line(LineSurface {
                x: 2.,
                y: -1.,
                height: 4.,
                angle: 0.1
            })
        );
    }

    #[test]
    fn integer_and_float_labels_stay_distinct() {
        let label = |json: serde_json::Value| Boundary::from_json(&json).unwrap().opt_idx;

        let int = label(json!({ "Line": { "opt_idx": 2, "midpoint": 0, "height": 1 } }));
        assert_eq!(int, Label::Integer(2));
        assert_eq!(int.to_string(), "2");

        let float = label(json!({ "Line": { "opt_idx": 1.0, "midpoint": 0, "height": 1 } }));
        assert_eq!(float, Label::Number(1.));
        assert_eq!(float.to_string(), "1.0");

        // and serializing keeps the difference
        assert_eq!(int.to_json().to_string(), "2");
        assert_eq!(float.to_json().to_string(), "1.0");
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let json = json!({ "ray": { "boundaries": [
            { "Line": { "opt_idx": 1, "midpoint": 0, "height": 5 } },
            { "Toric": { "opt_idx": 1, "midpoint": 0, "height": 5 } },
        ] } });

        let err = deserialize_scene(&json).unwrap_err();
        assert!(matches!(err, ConfigError::Boundary { ref at, .. } if at == "1"));
        assert!(matches!(err.root(), ConfigError::UnknownBoundaryType(t) if t == "Toric"));
    }

    #[test]
    fn missing_and_mistyped_fields() {
        let missing = json!({ "Spherical": { "opt_idx": 1, "midpoint": 0, "height": 5 } });
        assert!(matches!(
            Boundary::from_json(&missing),
            Err(ConfigError::MissingField("radius"))
        ));

        let mistyped = json!({
            "Conic": { "opt_idx": 1, "midpoint": 0, "radius": "big", "conic_param": 0, "height": 5 }
        });
        assert!(matches!(
            Boundary::from_json(&mistyped),
            Err(ConfigError::InvalidField { field: "radius", .. })
        ));

        let no_label = json!({ "Line": { "midpoint": 0, "height": 5 } });
        assert!(matches!(
            Boundary::from_json(&no_label),
            Err(ConfigError::MissingField("opt_idx"))
        ));
    }

    #[test]
    fn unrecognized_layouts() {
        for json in [json!([]), json!({}), json!({ "boundaries": [] }), json!({ "1": 3 })] {
            assert!(matches!(
                deserialize_scene(&json),
                Err(ConfigError::UnrecognizedSchema)
            ));
        }

        assert!(matches!(
            deserialize_scene(&json!({ "ray": {} })),
            Err(ConfigError::MissingField("ray.boundaries"))
        ));
    }

    #[test]
    fn serialized_scene_reads_back() {
        let boundaries = vec![
            Boundary::line(
                1.,
                LineSurface {
                    x: 1.,
                    y: 0.5,
                    height: 2.,
                    angle: -0.2,
                },
            ),
            Boundary::conic(
                "glass",
                ConicSurface {
                    midpoint: 4.,
                    radius: 3.,
                    conic_param: -0.5,
                    height: 1.,
                },
            ),
        ];

        let json = serialize_scene(&boundaries);
        assert_eq!(json["ray"]["boundaries"][1]["Conic"]["opt_idx"], "glass");

        let scene = deserialize_scene(&json).unwrap();
        assert_eq!(scene.schema, SchemaVersion::Tagged);
        assert_eq!(scene.boundaries, boundaries);
    }
}
