//! The flat boundary map written by older tooling:
//!
//! ```json
//! {
//!     "0": { "type": "line", "opt_idx": 1.0, "midpoint": 0.0, "radius": 5.0 },
//!     "1": { "type": "spherical", "opt_idx": 1.5, "midpoint": 10.0, "radius": 5.0, "height": 3.0 }
//! }
//! ```
//!
//! A legacy `line` is always vertical and centered on the optical axis, its
//! `radius` is the half length. Entries are taken in file order.

use super::*;

fn deserialize_entry(json: &serde_json::Value) -> Result<Boundary> {
    let opt_idx = json
        .get("opt_idx")
        .ok_or(ConfigError::MissingField("opt_idx"))
        .and_then(Label::from_json)?;

    let shape = match json.get("type").and_then(serde_json::Value::as_str) {
        Some("line") => Shape::Line(LineSurface::vertical(
            get_float(json, "midpoint")?,
            get_float(json, "radius")?,
        )),
        Some("spherical") => Shape::Spherical(SphericalSurface::from_json(json)?),
        Some(other) => return Err(ConfigError::UnknownBoundaryType(other.into())),
        None => {
            return Err(ConfigError::InvalidField {
                field: "type",
                expected: "a string",
            })
        }
    };

    Ok(Boundary { opt_idx, shape })
}

pub fn deserialize_boundaries(json: &serde_json::Value) -> Result<Vec<Boundary>> {
    json.as_object()
        .ok_or(ConfigError::UnrecognizedSchema)?
        .iter()
        .map(|(id, entry)| deserialize_entry(entry).map_err(|e| e.at(id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_map_in_file_order() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{
                "2": { "type": "spherical", "opt_idx": 1.5, "midpoint": 10, "radius": -5, "height": 3 },
                "0": { "type": "line", "opt_idx": 1, "midpoint": -4, "radius": 6 }
            }"#,
        )
        .unwrap();

        assert_eq!(SchemaVersion::detect(&json).unwrap(), SchemaVersion::LegacyFlat);

        let scene = deserialize_scene(&json).unwrap();
        assert_eq!(
            scene.boundaries,
            [
                Boundary::spherical(
                    1.5,
                    SphericalSurface {
                        midpoint: 10.,
                        radius: -5.,
                        height: 3.
                    }
                ),
                Boundary::line(1i64, LineSurface::vertical(-4., 6.)),
            ]
        );
    }

    #[test]
    fn legacy_and_tagged_layouts_agree() {
        let legacy = json!({
            "a": { "type": "line", "opt_idx": 1.0, "midpoint": 0, "radius": 5 },
            "b": { "type": "spherical", "opt_idx": 1.5, "midpoint": 10, "radius": 5, "height": 3 },
        });
        let tagged = json!({ "ray": { "boundaries": [
            { "Line": { "opt_idx": 1.0, "midpoint": 0, "height": 5 } },
            { "Spherical": { "opt_idx": 1.5, "midpoint": 10, "radius": 5, "height": 3 } },
        ] } });

        assert_eq!(
            deserialize_scene(&legacy).unwrap().boundaries,
            deserialize_scene(&tagged).unwrap().boundaries
        );
    }

    #[test]
    fn conic_is_not_a_legacy_type() {
        let json = json!({
            "0": { "type": "conic", "opt_idx": 1, "midpoint": 0, "radius": 1, "height": 1 }
        });

        let err = deserialize_scene(&json).unwrap_err();
        assert!(matches!(err, ConfigError::Boundary { ref at, .. } if at == "0"));
        assert!(matches!(err.root(), ConfigError::UnknownBoundaryType(t) if t == "conic"));
    }
}
