//! Pure deep-merge primitives over JSON values.
//!
//! Two directions are needed: `deep_defaults` fills gaps (a key already
//! present is never overwritten), `deep_extend` overlays (the overlay wins).
//! In both, plain nested objects merge key-by-key recursively while arrays
//! and scalars move wholesale.

use serde_json::{Map, Value};

/// Fill gaps in `original` from `defaults`, recursing into nested objects.
/// Keys already present in `original` keep their value; arrays and scalars
/// are never merged element-wise.
pub fn deep_defaults(original: &mut Value, defaults: &Value) {
    let Some(defaults) = defaults.as_object() else {
        return;
    };
    if !original.is_object() {
        *original = Value::Object(Map::new());
    }
    let target = original.as_object_mut().expect("coerced to object above");
    for (key, default_value) in defaults {
        if default_value.is_object() {
            let slot = target.entry(key.clone()).or_insert(Value::Object(Map::new()));
            // An authored scalar where the schema expects a record is left
            // untouched rather than replaced by the default record.
            if slot.is_object() {
                deep_defaults(slot, default_value);
            }
            continue;
        }
        if !target.contains_key(key) {
            target.insert(key.clone(), default_value.clone());
        }
    }
}

/// Overlay `overlay` onto `target`: overlay values win, nested objects merge
/// key-by-key, arrays and scalars replace wholesale.
pub fn deep_extend(target: &mut Value, overlay: &Value) {
    let Some(overlay) = overlay.as_object() else {
        *target = overlay.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let out = target.as_object_mut().expect("coerced to object above");
    for (key, value) in overlay {
        if value.is_object() {
            let slot = out.entry(key.clone()).or_insert(Value::Object(Map::new()));
            deep_extend(slot, value);
            continue;
        }
        out.insert(key.clone(), value.clone());
    }
}

/// Overlay for raw extra-key maps.
pub fn extend_extra(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        if value.is_object() {
            if let Some(existing) = base.get_mut(key) {
                if existing.is_object() {
                    deep_extend(existing, value);
                    continue;
                }
            }
        }
        base.insert(key.clone(), value.clone());
    }
}
