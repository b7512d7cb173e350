//! JSON option merging.
//!
//! Two policies are used when building request bodies:
//! - [`shallow_merge`]: top-level keys from the override replace the base
//!   value wholesale. Model settings and call-time provider options combine
//!   this way.
//! - [`deep_merge`]: objects merge recursively and everything else is
//!   replaced. Escape-hatch bodies are applied this way, last.

use crate::ai_sdk_types::v2 as v2t;
use serde_json::{Map, Value};

/// Deep-merge `b` into `a`.
pub fn deep_merge(a: &mut Value, b: &Value) {
    match (a, b) {
        (Value::Object(a_map), Value::Object(b_map)) => {
            for (k, v) in b_map {
                if let Some(av) = a_map.get_mut(k) {
                    deep_merge(av, v);
                } else {
                    a_map.insert(k.clone(), v.clone());
                }
            }
        }
        (a_slot, b_val) => {
            *a_slot = b_val.clone();
        }
    }
}

/// Shallow-merge `overrides` into `base`: identical keys are replaced, not merged.
pub fn shallow_merge(base: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (k, v) in overrides {
        base.insert(k.clone(), v.clone());
    }
}

/// Provider options under `scope` as a JSON object (empty when absent).
pub fn scoped_options(options: &v2t::ProviderOptions, scope: &str) -> Map<String, Value> {
    options
        .get(scope)
        .map(|inner| inner.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

/// Merge provider default options into `target` without overriding explicit
/// values. Nested objects are filled in key by key.
pub fn merge_provider_defaults(target: &mut v2t::ProviderOptions, defaults: &v2t::ProviderOptions) {
    for (scope, defs) in defaults {
        let entry = target.entry(scope.clone()).or_default();
        for (key, val) in defs {
            match entry.get_mut(key) {
                Some(existing) => fill_missing(existing, val),
                None => {
                    entry.insert(key.clone(), val.clone());
                }
            }
        }
    }
}

fn fill_missing(target: &mut Value, defaults: &Value) {
    if let (Value::Object(target_map), Value::Object(defaults_map)) = (target, defaults) {
        for (k, v) in defaults_map {
            match target_map.get_mut(k) {
                Some(existing) => fill_missing(existing, v),
                None => {
                    target_map.insert(k.clone(), v.clone());
                }
            }
        }
    }
}
