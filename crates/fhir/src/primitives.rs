//! FHIR primitive types.
//!
//! Every primitive is a `{id, extension, value}` triple where each part is
//! optional. In JSON the value lives under `f` and the id/extensions under
//! `_f`; in XML the value is the `value` attribute and the extensions are
//! child elements.
//!
//! Note that [`String`] here is the FHIR `string` type and shadows
//! `std::string::String` inside this module.

use crate::datatypes::Extension;
use crate::serde_helpers::json_kind;
use crate::{DecodeError, Field, FhirJson, FhirXml, MemSize, next_array, next_items};
use fhirbind_fhirpath_support::{
    FhirPathElement, PrecisionDate, PrecisionDateTime, PrecisionTime, SystemValue,
    TypeInfoResult,
};
use fhirbind_serde_support::{IdAndExtensionHelper, IdAndExtensionOwned, XmlElement, meta_key};
use serde::de::MapAccess;
use serde::ser::SerializeMap;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A primitive value that does not fit its FHIR type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    Token {
        found: &'static str,
        expected: &'static str,
    },

    #[error("invalid value {value}: {reason}")]
    Invalid {
        value: std::string::String,
        reason: &'static str,
    },
}

impl ValueError {
    fn token(found: &Value, expected: &'static str) -> Self {
        ValueError::Token {
            found: json_kind(found),
            expected,
        }
    }

    fn invalid(value: impl fmt::Display, reason: &'static str) -> Self {
        ValueError::Invalid {
            value: value.to_string(),
            reason,
        }
    }

    fn into_decode(self, field: Field<'_>, fhir_type: &str) -> DecodeError {
        match self {
            ValueError::Token { found, expected } => {
                DecodeError::unexpected_token(field, found, expected)
            }
            ValueError::Invalid { value, reason } => {
                DecodeError::invalid_value(field, fhir_type, value, reason)
            }
        }
    }
}

/// The Rust value type behind a FHIR primitive and its lexical forms.
pub trait PrimitiveValue: Sized {
    fn to_json(&self) -> Value;

    fn from_json(value: Value) -> Result<Self, ValueError>;

    /// The XML `value` attribute, which is also the FHIR lexical form.
    fn to_xml(&self) -> std::string::String;

    fn from_xml(text: &str) -> Result<Self, ValueError>;

    fn system_value(&self) -> SystemValue;
}

impl PrimitiveValue for bool {
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_json(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ValueError::token(&other, "boolean")),
        }
    }

    fn to_xml(&self) -> std::string::String {
        self.to_string()
    }

    fn from_xml(text: &str) -> Result<Self, ValueError> {
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ValueError::invalid(text, "expected true or false")),
        }
    }

    fn system_value(&self) -> SystemValue {
        SystemValue::Boolean(*self)
    }
}

macro_rules! integer_value {
    ($ty:ty) => {
        impl PrimitiveValue for $ty {
            fn to_json(&self) -> Value {
                Value::from(*self)
            }

            fn from_json(value: Value) -> Result<Self, ValueError> {
                match &value {
                    Value::Number(n) => n
                        .as_i64()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| ValueError::invalid(n, "not an integer in range")),
                    other => Err(ValueError::token(other, "number")),
                }
            }

            fn to_xml(&self) -> std::string::String {
                self.to_string()
            }

            fn from_xml(text: &str) -> Result<Self, ValueError> {
                text.parse()
                    .map_err(|_| ValueError::invalid(text, "not an integer in range"))
            }

            fn system_value(&self) -> SystemValue {
                SystemValue::Integer(i64::from(*self))
            }
        }
    };
}

integer_value!(i32);
integer_value!(u32);

/// `integer64` is a JSON string so it survives parsers that read numbers as
/// doubles.
impl PrimitiveValue for i64 {
    fn to_json(&self) -> Value {
        Value::String(self.to_string())
    }

    fn from_json(value: Value) -> Result<Self, ValueError> {
        match &value {
            Value::String(text) => Self::from_xml(text),
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| ValueError::invalid(n, "not a 64-bit integer")),
            other => Err(ValueError::token(other, "string")),
        }
    }

    fn to_xml(&self) -> std::string::String {
        self.to_string()
    }

    fn from_xml(text: &str) -> Result<Self, ValueError> {
        text.parse()
            .map_err(|_| ValueError::invalid(text, "not a 64-bit integer"))
    }

    fn system_value(&self) -> SystemValue {
        SystemValue::Integer(*self)
    }
}

impl PrimitiveValue for rust_decimal::Decimal {
    fn to_json(&self) -> Value {
        // Number keeps the text as written, so 1.50 stays 1.50.
        let text = self.to_string();
        serde_json::Number::from_str(&text)
            .map(Value::Number)
            .unwrap_or(Value::String(text))
    }

    fn from_json(value: Value) -> Result<Self, ValueError> {
        match &value {
            Value::Number(n) => Self::from_xml(&n.to_string()),
            other => Err(ValueError::token(other, "number")),
        }
    }

    fn to_xml(&self) -> std::string::String {
        self.to_string()
    }

    fn from_xml(text: &str) -> Result<Self, ValueError> {
        rust_decimal::Decimal::from_str(text)
            .or_else(|_| rust_decimal::Decimal::from_scientific(text))
            .map_err(|_| ValueError::invalid(text, "not a decimal"))
    }

    fn system_value(&self) -> SystemValue {
        SystemValue::Decimal(*self)
    }
}

impl PrimitiveValue for std::string::String {
    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_json(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(text) => Ok(text),
            other => Err(ValueError::token(&other, "string")),
        }
    }

    fn to_xml(&self) -> std::string::String {
        self.clone()
    }

    fn from_xml(text: &str) -> Result<Self, ValueError> {
        Ok(text.to_string())
    }

    fn system_value(&self) -> SystemValue {
        SystemValue::String(self.clone())
    }
}

macro_rules! temporal_value {
    ($ty:ty, $variant:ident, $parse:ident, $reason:literal) => {
        impl PrimitiveValue for $ty {
            fn to_json(&self) -> Value {
                Value::String(self.as_str().to_string())
            }

            fn from_json(value: Value) -> Result<Self, ValueError> {
                match &value {
                    Value::String(text) => Self::from_xml(text),
                    other => Err(ValueError::token(other, "string")),
                }
            }

            fn to_xml(&self) -> std::string::String {
                self.as_str().to_string()
            }

            fn from_xml(text: &str) -> Result<Self, ValueError> {
                <$ty>::$parse(text).ok_or_else(|| ValueError::invalid(text, $reason))
            }

            fn system_value(&self) -> SystemValue {
                SystemValue::$variant(self.clone())
            }
        }
    };
}

temporal_value!(PrecisionDate, Date, parse, "not a date");
temporal_value!(PrecisionDateTime, DateTime, parse, "not a dateTime");
temporal_value!(PrecisionTime, Time, parse_full, "not a time");

fn decode_json<V: PrimitiveValue>(
    raw: Value,
    field: Field<'_>,
    fhir_type: &str,
) -> Result<Option<V>, DecodeError> {
    if raw.is_null() {
        return Ok(None);
    }
    V::from_json(raw)
        .map(Some)
        .map_err(|err| err.into_decode(field, fhir_type))
}

fn is_meta_key(key: &str, name: &str) -> bool {
    key.strip_prefix('_') == Some(name)
}

macro_rules! fhir_primitive {
    (@core $(#[$meta:meta])* $name:ident, $value:ty, $fhir:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            pub id: Option<std::string::String>,
            pub extension: Option<Vec<Extension>>,
            pub value: Option<$value>,
        }

        impl $name {
            /// FHIR type name.
            pub const FHIR_TYPE: &'static str = $fhir;

            pub fn new(value: $value) -> Self {
                Self {
                    id: None,
                    extension: None,
                    value: Some(value),
                }
            }
        }

        impl From<$value> for $name {
            fn from(value: $value) -> Self {
                Self::new(value)
            }
        }

        /// Parses the FHIR lexical form.
        impl FromStr for $name {
            type Err = ValueError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                <$value as PrimitiveValue>::from_xml(text).map(Self::new)
            }
        }

        impl FhirJson for $name {
            fn write_one<M>(&self, name: &str, map: &mut M) -> Result<(), M::Error>
            where
                M: SerializeMap,
            {
                if let Some(value) = &self.value {
                    map.serialize_entry(name, &value.to_json())?;
                }
                let meta = IdAndExtensionHelper::new(&self.id, &self.extension);
                if !meta.is_empty() {
                    map.serialize_entry(&meta_key(name), &meta)?;
                }
                Ok(())
            }

            fn write_many<M>(items: &[Self], name: &str, map: &mut M) -> Result<(), M::Error>
            where
                M: SerializeMap,
            {
                if items.iter().any(|item| item.value.is_some()) {
                    let values: Vec<Value> = items
                        .iter()
                        .map(|item| item.value.as_ref().map_or(Value::Null, PrimitiveValue::to_json))
                        .collect();
                    map.serialize_entry(name, &values)?;
                }
                if items.iter().any(|item| item.id.is_some() || item.extension.is_some()) {
                    let metas: Vec<Option<IdAndExtensionHelper<'_, Extension>>> = items
                        .iter()
                        .map(|item| {
                            let meta = IdAndExtensionHelper::new(&item.id, &item.extension);
                            (!meta.is_empty()).then_some(meta)
                        })
                        .collect();
                    map.serialize_entry(&meta_key(name), &metas)?;
                }
                Ok(())
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
                if key == field.name {
                    let raw: Value = map.next_value()?;
                    let value = decode_json::<$value>(raw, field, $fhir)
                        .map_err(<A::Error as serde::de::Error>::custom)?;
                    // A bare null carries nothing; only a present value creates the slot.
                    if let Some(value) = value {
                        slot.get_or_insert_with(Self::default).value = Some(value);
                    }
                    Ok(true)
                } else if is_meta_key(key, field.name) {
                    let meta: Option<IdAndExtensionOwned<Extension>> = map.next_value()?;
                    if let Some(meta) = meta.filter(|m| m.id.is_some() || m.extension.is_some()) {
                        let target = slot.get_or_insert_with(Self::default);
                        target.id = meta.id;
                        target.extension = meta.extension;
                    }
                    Ok(true)
                } else {
                    Ok(false)
                }
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
                if key == field.name {
                    let raw = next_array(map, field)?;
                    let items = slot.get_or_insert_with(Vec::new);
                    if items.len() < raw.len() {
                        items.resize_with(raw.len(), Self::default);
                    }
                    for (item, raw) in items.iter_mut().zip(raw) {
                        item.value = decode_json::<$value>(raw, field, $fhir)
                            .map_err(<A::Error as serde::de::Error>::custom)?;
                    }
                    Ok(true)
                } else if is_meta_key(key, field.name) {
                    let metas: Vec<Option<IdAndExtensionOwned<Extension>>> =
                        next_items(map, Field::new(field.owner, key))?;
                    let items = slot.get_or_insert_with(Vec::new);
                    if items.len() < metas.len() {
                        items.resize_with(metas.len(), Self::default);
                    }
                    for (item, meta) in items.iter_mut().zip(metas) {
                        if let Some(meta) = meta {
                            item.id = meta.id;
                            item.extension = meta.extension;
                        }
                    }
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }

        impl FhirPathElement for $name {
            fn type_info(&self) -> TypeInfoResult {
                TypeInfoResult::fhir($fhir)
            }

            fn fields(&self) -> Vec<(&'static str, &dyn FhirPathElement)> {
                let mut fields: Vec<(&'static str, &dyn FhirPathElement)> = Vec::new();
                if let Some(id) = &self.id {
                    fields.push(("id", id as &dyn FhirPathElement));
                }
                if let Some(extensions) = &self.extension {
                    for extension in extensions {
                        fields.push(("extension", extension as &dyn FhirPathElement));
                    }
                }
                fields
            }

            fn system_value(&self) -> Option<SystemValue> {
                self.value.as_ref().map(PrimitiveValue::system_value)
            }
        }

        impl MemSize for $name {
            fn heap_size(&self) -> usize {
                self.id.heap_size() + self.extension.heap_size() + self.value.heap_size()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match &self.value {
                    Some(value) => f.write_str(&value.to_xml()),
                    None => Ok(()),
                }
            }
        }
    };

    ($(#[$meta:meta])* $name:ident, $value:ty, $fhir:literal) => {
        fhir_primitive!(@core $(#[$meta])* $name, $value, $fhir);

        impl FhirXml for $name {
            fn write_xml(&self, name: &str, parent: &mut XmlElement) {
                let mut element = XmlElement::new(name);
                if let Some(id) = &self.id {
                    element.push_attribute("id", id.clone());
                }
                if let Some(value) = &self.value {
                    element.push_attribute("value", value.to_xml());
                }
                if let Some(extensions) = &self.extension {
                    for extension in extensions {
                        extension.write_xml("extension", &mut element);
                    }
                }
                if !element.is_empty() {
                    parent.push_child(element);
                }
            }

            fn read_xml(
                slot: &mut Option<Self>,
                field: Field<'_>,
                element: &XmlElement,
            ) -> Result<bool, DecodeError> {
                if element.name != field.name {
                    return Ok(false);
                }
                if let Some((name, _)) = element
                    .attributes
                    .iter()
                    .find(|(name, _)| name != "id" && name != "value")
                {
                    return Err(DecodeError::unknown_field(name.clone(), stringify!($name)));
                }
                let value = match element.attribute("value") {
                    Some(text) => Some(
                        <$value as PrimitiveValue>::from_xml(text)
                            .map_err(|err| err.into_decode(field, $fhir))?,
                    ),
                    None => None,
                };
                let mut extension = None;
                for child in &element.children {
                    if Extension::read_xml_many(
                        &mut extension,
                        Field::new(stringify!($name), "extension"),
                        child,
                    )? {
                        continue;
                    }
                    return Err(DecodeError::unknown_field(child.name.clone(), stringify!($name)));
                }
                let id = element.attribute("id").map(ToOwned::to_owned);
                // `<f/>` claims the element but leaves the field unset.
                if value.is_some() || id.is_some() || extension.is_some() {
                    *slot = Some(Self { id, extension, value });
                }
                Ok(true)
            }
        }
    };
}

macro_rules! from_str_slice {
    ($($name:ident),* $(,)?) => {
        $(
            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self::new(value.to_string())
                }
            }
        )*
    };
}

fhir_primitive!(Boolean, bool, "boolean");
fhir_primitive!(Integer, i32, "integer");
fhir_primitive!(Integer64, i64, "integer64");
fhir_primitive!(UnsignedInt, u32, "unsignedInt");
fhir_primitive!(PositiveInt, u32, "positiveInt");
fhir_primitive!(Decimal, rust_decimal::Decimal, "decimal");
fhir_primitive!(String, std::string::String, "string");
fhir_primitive!(Code, std::string::String, "code");
fhir_primitive!(Id, std::string::String, "id");
fhir_primitive!(Markdown, std::string::String, "markdown");
fhir_primitive!(Uri, std::string::String, "uri");
fhir_primitive!(Url, std::string::String, "url");
fhir_primitive!(Canonical, std::string::String, "canonical");
fhir_primitive!(Oid, std::string::String, "oid");
fhir_primitive!(Uuid, std::string::String, "uuid");
fhir_primitive!(Base64Binary, std::string::String, "base64Binary");
fhir_primitive!(Date, PrecisionDate, "date");
fhir_primitive!(DateTime, PrecisionDateTime, "dateTime");
fhir_primitive!(Instant, PrecisionDateTime, "instant");
fhir_primitive!(Time, PrecisionTime, "time");
fhir_primitive!(@core
    /// Narrative XHTML, carried verbatim including the outer `div`.
    Xhtml, std::string::String, "xhtml");

from_str_slice!(
    String, Code, Id, Markdown, Uri, Url, Canonical, Oid, Uuid, Base64Binary, Xhtml,
);

/// In XML the narrative is a raw XHTML `div` subtree rather than an element
/// with a `value` attribute.
impl FhirXml for Xhtml {
    fn write_xml(&self, name: &str, parent: &mut XmlElement) {
        if let Some(markup) = &self.value {
            let mut element = XmlElement::new(name);
            element.xhtml = Some(markup.clone());
            parent.push_child(element);
        }
    }

    fn read_xml(
        slot: &mut Option<Self>,
        field: Field<'_>,
        element: &XmlElement,
    ) -> Result<bool, DecodeError> {
        if element.name != field.name {
            return Ok(false);
        }
        *slot = Some(Self {
            id: None,
            extension: None,
            value: element.xhtml.clone(),
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_keeps_scale() {
        let value = Decimal::new(dec!(1.50));
        assert_eq!(value.to_string(), "1.50");
        let parsed: Decimal = "0.0100".parse().unwrap();
        assert_eq!(parsed.value.map(|d| d.scale()), Some(4));
    }

    #[test]
    fn test_lexical_parsing() {
        assert_eq!("true".parse::<Boolean>().unwrap().value, Some(true));
        assert!("yes".parse::<Boolean>().is_err());
        assert!("2020-13-01".parse::<Date>().is_err());
        let instant: Instant = "2024-03-01T10:00:00.123Z".parse().unwrap();
        assert_eq!(instant.to_string(), "2024-03-01T10:00:00.123Z");
        assert_eq!("-3".parse::<Integer>().unwrap().value, Some(-3));
        assert!("-3".parse::<UnsignedInt>().is_err());
        assert!("09:15".parse::<Time>().is_err());
        assert_eq!(
            "09:15:00".parse::<Time>().unwrap().to_string(),
            "09:15:00"
        );
    }

    #[test]
    fn test_integer64_is_a_json_string() {
        assert_eq!(9007199254740993i64.to_json(), Value::String("9007199254740993".into()));
        assert_eq!(i64::from_json(Value::String("42".into())), Ok(42));
    }

    #[test]
    fn test_wrong_json_kind_is_a_token_error() {
        let err = bool::from_json(Value::String("true".into())).unwrap_err();
        assert_eq!(
            err,
            ValueError::Token {
                found: "string",
                expected: "boolean"
            }
        );
        let decode = err.into_decode(Field::new("Coding", "userSelected"), "boolean");
        assert_eq!(
            decode.to_string(),
            "unexpected string for \"userSelected\" in Coding, expected boolean"
        );
    }

    #[test]
    fn test_system_values() {
        let code = Code::from("final");
        assert_eq!(code.system_value(), Some(SystemValue::String("final".into())));
        assert_eq!(code.type_info(), TypeInfoResult::fhir("code"));
        assert_eq!(Code::default().system_value(), None);
        assert_eq!(PositiveInt::new(5).to_integer(false), Ok(Some(5)));
    }
}
