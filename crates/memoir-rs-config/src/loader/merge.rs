//! Deep merge of config layers expressed as JSON values.

use serde_json::Value;

/// Overlay `upper` onto `lower`. Objects merge key by key; any other value
/// in `upper` replaces what `lower` held.
pub(super) fn merge_json_values(lower: &mut Value, upper: &Value) {
    match (lower, upper) {
        (Value::Object(lower_map), Value::Object(upper_map)) => {
            for (key, value) in upper_map {
                let slot = lower_map.entry(key.clone()).or_insert(Value::Null);
                merge_json_values(slot, value);
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}
