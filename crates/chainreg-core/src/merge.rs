//! Deep merge of key-value trees.
//!
//! Objects are merged key by key, recursing on collisions. Any other pair
//! (scalars, arrays, null, or an object meeting a non-object) resolves to
//! the later value.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use chainreg_protocols::RegistryError;

/// Merge `overlay` onto `base`; `overlay` wins on leaf collisions.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => {
                        let existing = std::mem::take(slot);
                        *slot = deep_merge(existing, value);
                    }
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

/// Merge typed values left to right through their JSON form.
///
/// Starts from `T::default()`, so an empty input yields the default.
pub fn merge_all<T, I>(items: I) -> Result<T, RegistryError>
where
    T: Serialize + DeserializeOwned + Default,
    I: IntoIterator<Item = T>,
{
    let mut merged = Value::Object(Map::new());
    for item in items {
        merged = deep_merge(merged, serde_json::to_value(item)?);
    }
    if merged.as_object().is_some_and(Map::is_empty) {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(merged)?)
}
