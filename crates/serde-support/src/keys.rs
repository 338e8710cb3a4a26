//! Key naming for FHIR JSON and XML.
//!
//! A choice element `value[x]` carrying a `string` is written as
//! `valueString`; the metadata of a primitive `status` lives under `_status`.

/// `_name`, the key holding a primitive's id and extensions.
pub fn meta_key(name: &str) -> String {
    format!("_{name}")
}

/// `name` followed by the type suffix, e.g. `("value", "String")` gives
/// `valueString`.
pub fn choice_key(name: &str, suffix: &str) -> String {
    let mut key = String::with_capacity(name.len() + suffix.len());
    key.push_str(name);
    key.push_str(suffix);
    key
}

/// The type suffix of `key` relative to the choice base name, ignoring a
/// leading `_`. Returns `None` when `key` does not belong to the choice.
pub fn choice_suffix<'k>(name: &str, key: &'k str) -> Option<&'k str> {
    let bare = key.strip_prefix('_').unwrap_or(key);
    let suffix = bare.strip_prefix(name)?;
    if suffix.starts_with(|c: char| c.is_ascii_uppercase()) {
        Some(suffix)
    } else {
        None
    }
}
