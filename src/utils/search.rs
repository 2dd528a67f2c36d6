//! Key lookup in nested JSON documents (label headers, report output).

use serde_json::Value;

/// Depth-first search for `key` anywhere in a nested object tree.
///
/// Returns the first match in document order; arrays are not descended.
pub fn find_in_value<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    if let Some(found) = map.get(key) {
        return Some(found);
    }
    for child in map.values() {
        if child.is_object() {
            if let Some(found) = find_in_value(child, key) {
                return Some(found);
            }
        }
    }
    None
}

/// Traverse an ordered key path into a nested object tree.
pub fn find_nested<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}
