//! The JSON half of the field codec.
//!
//! A containing type never knows how its fields are spelled on the wire: it
//! offers every incoming key to each field's [`FhirJson::read_one`] /
//! [`FhirJson::read_many`] in declaration order and the first one that claims
//! the key consumes its value. This is what lets a primitive merge `f` and
//! `_f` in either order and lets a choice field claim `fString`, `_fString`
//! and `fCoding` while rejecting a second variant.

use crate::DecodeError;
use serde::de::{DeserializeOwned, MapAccess};
use serde::ser::SerializeMap;
use serde_json::Value;

/// The field being decoded and the type that owns it, for routing and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// Rust type name of the containing type.
    pub owner: &'static str,
    /// FHIR element name, including the type suffix for choice variants.
    pub name: &'a str,
}

impl<'a> Field<'a> {
    pub const fn new(owner: &'static str, name: &'a str) -> Self {
        Self { owner, name }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads the value of a repeating field, which must be a JSON array.
pub fn next_array<'de, A>(map: &mut A, field: Field<'_>) -> Result<Vec<Value>, A::Error>
where
    A: MapAccess<'de>,
{
    match map.next_value::<Value>()? {
        Value::Array(items) => Ok(items),
        other => Err(<A::Error as serde::de::Error>::custom(
            DecodeError::unexpected_token(field, json_kind(&other), "array"),
        )),
    }
}

/// Like [`next_array`], with every item decoded as `T`.
pub fn next_items<'de, A, T>(map: &mut A, field: Field<'_>) -> Result<Vec<T>, A::Error>
where
    A: MapAccess<'de>,
    T: DeserializeOwned,
{
    next_array(map, field)?
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(<A::Error as serde::de::Error>::custom))
        .collect()
}

pub trait FhirJson: Sized {
    /// Writes the entries for one value of field `name`.
    fn write_one<M>(&self, name: &str, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap;

    /// Writes the entries for a repeating field `name`.
    fn write_many<M>(items: &[Self], name: &str, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap;

    /// Consumes the value of `key` into `slot` if the key belongs to `field`.
    ///
    /// Returns `Ok(false)` without touching the map when it does not.
    fn read_one<'de, A>(
        slot: &mut Option<Self>,
        field: Field<'_>,
        key: &str,
        map: &mut A,
    ) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>;

    fn read_many<'de, A>(
        slot: &mut Option<Vec<Self>>,
        field: Field<'_>,
        key: &str,
        map: &mut A,
    ) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>;
}

/// Plain strings are element `id`s and extension `url`s; they have no `_`
/// companion.
impl FhirJson for String {
    fn write_one<M>(&self, name: &str, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap,
    {
        map.serialize_entry(name, self)
    }

    fn write_many<M>(items: &[Self], name: &str, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap,
    {
        map.serialize_entry(name, items)
    }

    fn read_one<'de, A>(
        slot: &mut Option<Self>,
        field: Field<'_>,
        key: &str,
        map: &mut A,
    ) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>,
    {
        if key != field.name {
            return Ok(false);
        }
        *slot = Some(map.next_value()?);
        Ok(true)
    }

    fn read_many<'de, A>(
        slot: &mut Option<Vec<Self>>,
        field: Field<'_>,
        key: &str,
        map: &mut A,
    ) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>,
    {
        if key != field.name {
            return Ok(false);
        }
        *slot = Some(next_items(map, field)?);
        Ok(true)
    }
}

impl<T: FhirJson + Clone> FhirJson for Box<T> {
    fn write_one<M>(&self, name: &str, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap,
    {
        (**self).write_one(name, map)
    }

    fn write_many<M>(items: &[Self], name: &str, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap,
    {
        let unboxed: Vec<T> = items.iter().map(|item| (**item).clone()).collect();
        T::write_many(&unboxed, name, map)
    }

    fn read_one<'de, A>(
        slot: &mut Option<Self>,
        field: Field<'_>,
        key: &str,
        map: &mut A,
    ) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut inner = slot.take().map(|boxed| *boxed);
        let claimed = T::read_one(&mut inner, field, key, map)?;
        *slot = inner.map(Box::new);
        Ok(claimed)
    }

    fn read_many<'de, A>(
        slot: &mut Option<Vec<Self>>,
        field: Field<'_>,
        key: &str,
        map: &mut A,
    ) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut inner = slot
            .take()
            .map(|items| items.into_iter().map(|boxed| *boxed).collect());
        let claimed = T::read_many(&mut inner, field, key, map)?;
        *slot = inner.map(|items| items.into_iter().map(Box::new).collect());
        Ok(claimed)
    }
}
