//! Color scale expansion.
//!
//! A scale is a 12-step ramp plus a 12-step alpha ramp, each defined per mode:
//!
//! ```json
//! "teal": {
//!   "steps": { "light": { "1": "#fafefd", "2": "#f3fbf9" }, "dark": [...] },
//!   "alpha": { "light": { "1": "#00cc9905" }, "dark": [...] }
//! }
//! ```
//!
//! Step tables are either objects keyed `"1"`..`"12"` or arrays (index `i`
//! is step `i + 1`). Expansion yields `{scale}-{n}` and `{scale}-a{n}`
//! entries. A scale without a step table for the requested mode is skipped;
//! reporting that is the validator's job.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::document::{literal, Mode, MAX_SCALES, SCALE_STEPS};
use crate::reference::is_reference;
use crate::variables::{Stage, VariableMap};

/// Expands every scale for `mode` into a flat variable map.
///
/// Order: scales in document order, then ascending step, then ascending
/// alpha step.
pub fn expand(scales: &Map<String, Value>, mode: Mode) -> VariableMap {
    let mut out = VariableMap::new();

    if scales.len() > MAX_SCALES {
        warn!(
            count = scales.len(),
            limit = MAX_SCALES,
            "too many scales; extra scales are ignored"
        );
    }

    for (name, scale) in scales.iter().take(MAX_SCALES) {
        let Some(steps) = step_table(scale, "steps", mode) else {
            debug!(scale = %name, %mode, "scale has no step table for mode; skipped");
            continue;
        };
        for (step, value) in steps {
            out.insert(format!("{name}-{step}"), value, Stage::Scale);
        }
        if let Some(alpha) = step_table(scale, "alpha", mode) {
            for (step, value) in alpha {
                out.insert(format!("{name}-a{step}"), value, Stage::Scale);
            }
        }
    }

    out
}

/// Names of all scales that define at least one mode, in document order.
pub fn scale_names(scales: &Map<String, Value>) -> Vec<String> {
    scales
        .iter()
        .take(MAX_SCALES)
        .filter(|(_, scale)| Mode::ALL.iter().any(|m| step_table(scale, "steps", *m).is_some()))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Reads `scale.{table}.{mode}` as `(step, literal)` pairs sorted by step.
///
/// Steps must be literals; pointers and other structures are skipped.
pub(crate) fn step_table(scale: &Value, table: &str, mode: Mode) -> Option<Vec<(usize, String)>> {
    let raw = scale.get(table)?.get(mode.as_str())?;
    let step_literal = |step: usize, value: &Value| {
        let text = literal(value);
        if text.is_none() {
            let pointer = is_reference(value);
            debug!(table, %mode, step, pointer, "scale step is not a literal; skipped");
        }
        text
    };
    let mut steps: Vec<(usize, String)> = match raw {
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| {
                let step = k.trim().parse::<usize>().ok()?;
                Some((step, step_literal(step, v)?))
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(i, v)| Some((i + 1, step_literal(i + 1, v)?)))
            .collect(),
        _ => return None,
    };
    steps.retain(|(step, _)| (1..=SCALE_STEPS).contains(step));
    steps.sort_by_key(|(step, _)| *step);
    steps.dedup_by_key(|(step, _)| *step);
    Some(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_table(prefix: &str) -> Value {
        let map: Map<String, Value> = (1..=12)
            .map(|i| (i.to_string(), json!(format!("{prefix}{i}"))))
            .collect();
        Value::Object(map)
    }

    fn teal() -> Map<String, Value> {
        json!({
            "teal": {
                "steps": { "light": full_table("L"), "dark": full_table("D") },
                "alpha": { "light": full_table("LA"), "dark": full_table("DA") }
            }
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_full_scale_yields_48_entries_over_both_modes() {
        let scales = teal();
        let light = expand(&scales, Mode::Light);
        let dark = expand(&scales, Mode::Dark);
        assert_eq!(light.len() + dark.len(), 48);
        assert_eq!(light.get("teal-1"), Some("L1"));
        assert_eq!(light.get("teal-a12"), Some("LA12"));
        assert_eq!(dark.get("teal-7"), Some("D7"));
    }

    #[test]
    fn test_key_order_is_steps_then_alpha() {
        let scales = teal();
        let keys: Vec<_> = expand(&scales, Mode::Light)
            .keys()
            .map(str::to_string)
            .collect();
        assert_eq!(keys[0], "teal-1");
        assert_eq!(keys[1], "teal-2");
        assert_eq!(keys[9], "teal-10");
        assert_eq!(keys[11], "teal-12");
        assert_eq!(keys[12], "teal-a1");
        assert_eq!(keys[23], "teal-a12");
    }

    #[test]
    fn test_missing_mode_is_skipped() {
        let scales = json!({
            "teal": { "steps": { "light": ["#1", "#2"] } },
            "sand": { "steps": { "dark": ["#3"] } }
        });
        let light = expand(scales.as_object().unwrap(), Mode::Light);
        assert_eq!(light.keys().collect::<Vec<_>>(), vec!["teal-1", "teal-2"]);
    }

    #[test]
    fn test_out_of_range_and_non_literal_steps_are_dropped() {
        let scales = json!({
            "teal": { "steps": { "light": { "0": "#0", "1": "#1", "13": "#13", "2": {"x": 1}, "x": "#x" } } }
        });
        let light = expand(scales.as_object().unwrap(), Mode::Light);
        assert_eq!(light.keys().collect::<Vec<_>>(), vec!["teal-1"]);
    }

    #[test]
    fn test_pointer_steps_are_skipped() {
        let scales = json!({
            "teal": { "steps": { "light": [{ "$ref": "scales.sand.steps.light.0" }, "#2"] } }
        });
        let light = expand(scales.as_object().unwrap(), Mode::Light);
        assert_eq!(light.keys().collect::<Vec<_>>(), vec!["teal-2"]);
    }

    #[test]
    fn test_arrays_longer_than_twelve_are_truncated() {
        let items: Vec<Value> = (1..=15).map(|i| json!(format!("#{i}"))).collect();
        let scales = json!({ "gray": { "steps": { "dark": items } } });
        let dark = expand(scales.as_object().unwrap(), Mode::Dark);
        assert_eq!(dark.len(), 12);
        assert_eq!(dark.get("gray-12"), Some("#12"));
    }

    #[test]
    fn test_scale_names() {
        let scales = json!({
            "teal": { "steps": { "light": ["#1"] } },
            "broken": { "alpha": {} },
            "sand": { "steps": { "dark": ["#3"] } }
        });
        assert_eq!(scale_names(scales.as_object().unwrap()), vec!["teal", "sand"]);
    }
}
