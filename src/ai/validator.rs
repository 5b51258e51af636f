//! Turns an untrusted parsed object into a well-formed `AvatarCommand`.
//!
//! Nothing here fails. Out-of-range weights are clamped; malformed fields
//! are dropped; an empty or nonsensical object yields an empty command.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use super::command::{AvatarCommand, Vec3};

pub fn validate(obj: &Map<String, Value>) -> AvatarCommand {
    AvatarCommand {
        look_at: obj.get("lookAt").and_then(parse_look_at),
        blendshapes: obj.get("blendshapes").and_then(parse_blendshapes),
        viseme: obj.get("viseme").and_then(Value::as_str).map(str::to_string),
        raw: obj.get("raw").and_then(Value::as_str).map(str::to_string),
    }
}

/// First three elements of an array of at least three numbers.
/// World space, so no bound is imposed on magnitude.
fn parse_look_at(value: &Value) -> Option<Vec3> {
    let items = value.as_array()?;
    if items.len() < 3 {
        debug!("[Validate] lookAt has {} elements, dropping", items.len());
        return None;
    }
    let x = items[0].as_f64()?;
    let y = items[1].as_f64()?;
    let z = items[2].as_f64()?;
    Some([x, y, z])
}

fn parse_blendshapes(value: &Value) -> Option<BTreeMap<String, f64>> {
    let map = value.as_object()?;
    let weights = map
        .iter()
        .filter_map(|(name, weight)| match weight.as_f64() {
            Some(w) => Some((name.clone(), clamp_weight(w))),
            None => {
                debug!("[Validate] Dropping non-numeric weight for '{}'", name);
                None
            }
        })
        .collect();
    Some(weights)
}

/// Pin a weight to [0, 1]. In-range values come back unchanged; NaN reads as 0.
pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        return 0.0;
    }
    weight.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn validate_value(value: Value) -> AvatarCommand {
        match value {
            Value::Object(map) => validate(&map),
            other => panic!("test input must be an object, got {other}"),
        }
    }

    #[test]
    fn weights_are_clamped_not_rejected() {
        let cmd = validate_value(json!({"blendshapes": {"Joy": -5, "Angry": 3.2, "Fun": 0.4}}));
        let weights = cmd.blendshapes.unwrap();
        assert_eq!(weights["Joy"], 0.0);
        assert_eq!(weights["Angry"], 1.0);
        assert!((weights["Fun"] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn in_range_weights_are_kept_exactly() {
        let cmd = validate_value(json!({"blendshapes": {"Joy": 0.8, "Fun": 0.3}}));
        let weights = cmd.blendshapes.unwrap();
        assert_eq!(weights["Joy"], 0.8);
        assert_eq!(weights["Fun"], 0.3);
    }

    #[test]
    fn nan_weight_clamps_to_zero() {
        assert_eq!(clamp_weight(f64::NAN), 0.0);
        assert_eq!(clamp_weight(f64::INFINITY), 1.0);
    }

    #[test]
    fn non_numeric_weights_are_dropped_per_key() {
        let cmd = validate_value(json!({
            "blendshapes": {"Joy": "lots", "Sorrow": null, "Blink": true, "A": 0.5}
        }));
        let weights = cmd.blendshapes.unwrap();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights["A"], 0.5);
    }

    #[test]
    fn non_object_blendshapes_are_dropped() {
        let cmd = validate_value(json!({"blendshapes": ["Joy", 0.5]}));
        assert!(cmd.blendshapes.is_none());
    }

    #[test]
    fn short_look_at_is_dropped() {
        let cmd = validate_value(json!({"lookAt": [1, 2]}));
        assert!(cmd.look_at.is_none());
    }

    #[test]
    fn long_look_at_uses_first_three() {
        let cmd = validate_value(json!({"lookAt": [1, 2, 3, 4]}));
        assert_eq!(cmd.look_at, Some([1.0, 2.0, 3.0]));
    }

    #[test]
    fn look_at_is_not_bounded() {
        let cmd = validate_value(json!({"lookAt": [-1000.5, 0, 1e6]}));
        assert_eq!(cmd.look_at, Some([-1000.5, 0.0, 1e6]));
    }

    #[test]
    fn non_numeric_look_at_is_dropped() {
        assert!(validate_value(json!({"lookAt": [1, "up", 3]})).look_at.is_none());
        assert!(validate_value(json!({"lookAt": "left"})).look_at.is_none());
        assert!(validate_value(json!({"lookAt": {"x": 1, "y": 2, "z": 3}}))
            .look_at
            .is_none());
    }

    #[test]
    fn viseme_passes_through_unvalidated() {
        let cmd = validate_value(json!({"viseme": "not-a-real-viseme"}));
        assert_eq!(cmd.viseme.as_deref(), Some("not-a-real-viseme"));
        assert!(validate_value(json!({"viseme": 3})).viseme.is_none());
    }

    #[test]
    fn raw_passes_through() {
        let cmd = validate_value(json!({"raw": "model said no"}));
        assert_eq!(cmd.raw.as_deref(), Some("model said no"));
        assert!(cmd.is_noop());
    }

    #[test]
    fn empty_object_is_an_empty_command() {
        assert_eq!(validate_value(json!({})), AvatarCommand::default());
        assert_eq!(
            validate_value(json!({"mood": "happy", "extra": [1, 2]})),
            AvatarCommand::default()
        );
    }

    proptest! {
        #[test]
        fn every_weight_lands_in_unit_interval(weights in prop::collection::btree_map("[A-Za-z_]{1,12}", -1.0e6f64..1.0e6f64, 0..16)) {
            let mut shapes = Map::new();
            for (name, w) in &weights {
                shapes.insert(name.clone(), json!(w));
            }
            let mut obj = Map::new();
            obj.insert("blendshapes".to_string(), Value::Object(shapes));

            let cmd = validate(&obj);
            let validated = cmd.blendshapes.unwrap();
            prop_assert_eq!(validated.len(), weights.len());
            for w in validated.values() {
                prop_assert!((0.0..=1.0).contains(w));
            }
        }
    }
}
