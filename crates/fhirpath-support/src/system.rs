use crate::error::ConversionError;
use crate::temporal::{PrecisionDate, PrecisionDateTime, PrecisionTime};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A FHIRPath quantity: a decimal value with a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemQuantity {
    pub value: Decimal,
    pub unit: String,
}

impl SystemQuantity {
    pub fn new(value: Decimal, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Parses `5`, `5 'mg'` or `5.0 mg`.
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (number, unit) = match text.split_once(' ') {
            Some((number, unit)) => (number, unit.trim()),
            None => (text, "1"),
        };
        let value = Decimal::from_str(number).ok()?;
        let unit = unit.trim_matches('\'');
        if unit.is_empty() {
            return None;
        }
        Some(Self::new(value, unit))
    }
}

impl fmt::Display for SystemQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.value, self.unit)
    }
}

/// A value of one of the FHIRPath system types.
///
/// FHIR primitives surface their `value` as one of these, and the conversion
/// methods implement the FHIRPath `toX()` / `convertsToX()` rules.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemValue {
    Boolean(bool),
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Date(PrecisionDate),
    DateTime(PrecisionDateTime),
    Time(PrecisionTime),
    Quantity(SystemQuantity),
}

impl SystemValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            SystemValue::Boolean(_) => "Boolean",
            SystemValue::String(_) => "String",
            SystemValue::Integer(_) => "Integer",
            SystemValue::Decimal(_) => "Decimal",
            SystemValue::Date(_) => "Date",
            SystemValue::DateTime(_) => "DateTime",
            SystemValue::Time(_) => "Time",
            SystemValue::Quantity(_) => "Quantity",
        }
    }

    /// FHIRPath `=`. `None` is the empty result.
    pub fn equal(&self, other: &SystemValue) -> Option<bool> {
        use SystemValue::*;
        match (self, other) {
            (Boolean(a), Boolean(b)) => Some(a == b),
            (String(a), String(b)) => Some(a == b),
            (Integer(a), Integer(b)) => Some(a == b),
            (Decimal(a), Decimal(b)) => Some(a == b),
            (Integer(a), Decimal(b)) | (Decimal(b), Integer(a)) => {
                Some(rust_decimal::Decimal::from(*a) == *b)
            }
            (Date(a), Date(b)) => a.equal(b),
            (DateTime(a), DateTime(b)) => a.equal(b),
            (Date(a), DateTime(b)) | (DateTime(b), Date(a)) => {
                PrecisionDateTime::from(a.clone()).equal(b)
            }
            (Time(a), Time(b)) => a.equal(b),
            (Quantity(a), Quantity(b)) => {
                if a.unit == b.unit {
                    Some(a.value == b.value)
                } else {
                    None
                }
            }
            _ => Some(false),
        }
    }

    /// FHIRPath `~`.
    ///
    /// Strings compare case-insensitively with whitespace collapsed and
    /// decimals compare at the precision of the less precise operand.
    pub fn equivalent(&self, other: &SystemValue) -> bool {
        use SystemValue::*;
        match (self, other) {
            (String(a), String(b)) => normalize_string(a) == normalize_string(b),
            (Decimal(a), Decimal(b)) => decimal_equivalent(*a, *b),
            (Integer(a), Decimal(b)) | (Decimal(b), Integer(a)) => {
                decimal_equivalent(rust_decimal::Decimal::from(*a), *b)
            }
            (Date(a), Date(b)) => a.equivalent(b),
            (DateTime(a), DateTime(b)) => a.equivalent(b),
            (Time(a), Time(b)) => a.equivalent(b),
            (Quantity(a), Quantity(b)) => a.unit == b.unit && decimal_equivalent(a.value, b.value),
            _ => self.equal(other) == Some(true),
        }
    }

    pub fn to_boolean(&self, explicit: bool) -> Result<Option<bool>, ConversionError> {
        if let SystemValue::Boolean(value) = self {
            return Ok(Some(*value));
        }
        self.require_explicit(explicit, "Boolean")?;
        match self {
            SystemValue::String(text) => Ok(match text.to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" | "1.0" => Some(true),
                "false" | "f" | "no" | "n" | "0" | "0.0" => Some(false),
                _ => None,
            }),
            SystemValue::Integer(value) => Ok(match value {
                1 => Some(true),
                0 => Some(false),
                _ => None,
            }),
            SystemValue::Decimal(value) => Ok(if *value == Decimal::ONE {
                Some(true)
            } else if value.is_zero() {
                Some(false)
            } else {
                None
            }),
            _ => Err(self.not_convertible("Boolean")),
        }
    }

    /// FHIRPath `toString()`. Every system value has a string form.
    pub fn to_string_value(&self, explicit: bool) -> Result<Option<String>, ConversionError> {
        if let SystemValue::String(value) = self {
            return Ok(Some(value.clone()));
        }
        self.require_explicit(explicit, "String")?;
        Ok(Some(match self {
            SystemValue::Boolean(value) => value.to_string(),
            SystemValue::Integer(value) => value.to_string(),
            SystemValue::Decimal(value) => value.to_string(),
            SystemValue::Date(value) => value.to_string(),
            SystemValue::DateTime(value) => value.to_string(),
            SystemValue::Time(value) => value.to_string(),
            SystemValue::Quantity(value) => value.to_string(),
            SystemValue::String(value) => value.clone(),
        }))
    }

    pub fn to_integer(&self, explicit: bool) -> Result<Option<i64>, ConversionError> {
        if let SystemValue::Integer(value) = self {
            return Ok(Some(*value));
        }
        self.require_explicit(explicit, "Integer")?;
        match self {
            SystemValue::Boolean(value) => Ok(Some(i64::from(*value))),
            SystemValue::String(text) => {
                let trimmed = text.strip_prefix('+').unwrap_or(text);
                Ok(trimmed.parse().ok())
            }
            _ => Err(self.not_convertible("Integer")),
        }
    }

    /// Integers widen to decimals implicitly.
    pub fn to_decimal(&self, explicit: bool) -> Result<Option<Decimal>, ConversionError> {
        match self {
            SystemValue::Decimal(value) => return Ok(Some(*value)),
            SystemValue::Integer(value) => return Ok(Some(Decimal::from(*value))),
            _ => {}
        }
        self.require_explicit(explicit, "Decimal")?;
        match self {
            SystemValue::Boolean(value) => Ok(Some(if *value { Decimal::ONE } else { Decimal::ZERO })),
            SystemValue::String(text) => Ok(Decimal::from_str(text).ok()),
            _ => Err(self.not_convertible("Decimal")),
        }
    }

    pub fn to_date(&self, explicit: bool) -> Result<Option<PrecisionDate>, ConversionError> {
        if let SystemValue::Date(value) = self {
            return Ok(Some(value.clone()));
        }
        self.require_explicit(explicit, "Date")?;
        match self {
            SystemValue::DateTime(value) => Ok(Some(value.date().clone())),
            SystemValue::String(text) => Ok(PrecisionDate::parse(text)),
            _ => Err(self.not_convertible("Date")),
        }
    }

    /// Dates widen to date-times implicitly.
    pub fn to_date_time(&self, explicit: bool) -> Result<Option<PrecisionDateTime>, ConversionError> {
        match self {
            SystemValue::DateTime(value) => return Ok(Some(value.clone())),
            SystemValue::Date(value) => return Ok(Some(PrecisionDateTime::from(value.clone()))),
            _ => {}
        }
        self.require_explicit(explicit, "DateTime")?;
        match self {
            SystemValue::String(text) => Ok(PrecisionDateTime::parse(text)),
            _ => Err(self.not_convertible("DateTime")),
        }
    }

    pub fn to_time(&self, explicit: bool) -> Result<Option<PrecisionTime>, ConversionError> {
        if let SystemValue::Time(value) = self {
            return Ok(Some(value.clone()));
        }
        self.require_explicit(explicit, "Time")?;
        match self {
            SystemValue::String(text) => Ok(PrecisionTime::parse(text)),
            _ => Err(self.not_convertible("Time")),
        }
    }

    /// Integers and decimals widen to quantities with unit `'1'` implicitly.
    pub fn to_quantity(&self, explicit: bool) -> Result<Option<SystemQuantity>, ConversionError> {
        match self {
            SystemValue::Quantity(value) => return Ok(Some(value.clone())),
            SystemValue::Integer(value) => {
                return Ok(Some(SystemQuantity::new(Decimal::from(*value), "1")));
            }
            SystemValue::Decimal(value) => return Ok(Some(SystemQuantity::new(*value, "1"))),
            _ => {}
        }
        self.require_explicit(explicit, "Quantity")?;
        match self {
            SystemValue::Boolean(value) => Ok(Some(SystemQuantity::new(
                if *value { Decimal::ONE } else { Decimal::ZERO },
                "1",
            ))),
            SystemValue::String(text) => Ok(SystemQuantity::parse(text)),
            _ => Err(self.not_convertible("Quantity")),
        }
    }

    fn require_explicit(&self, explicit: bool, to: &'static str) -> Result<(), ConversionError> {
        if explicit {
            Ok(())
        } else {
            Err(ConversionError::not_implicit(
                format!("System.{}", self.type_name()),
                to,
            ))
        }
    }

    fn not_convertible(&self, to: &'static str) -> ConversionError {
        ConversionError::not_convertible(format!("System.{}", self.type_name()), to)
    }
}

impl fmt::Display for SystemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemValue::Boolean(value) => write!(f, "{value}"),
            SystemValue::String(value) => f.write_str(value),
            SystemValue::Integer(value) => write!(f, "{value}"),
            SystemValue::Decimal(value) => write!(f, "{value}"),
            SystemValue::Date(value) => write!(f, "{value}"),
            SystemValue::DateTime(value) => write!(f, "{value}"),
            SystemValue::Time(value) => write!(f, "{value}"),
            SystemValue::Quantity(value) => write!(f, "{value}"),
        }
    }
}

fn normalize_string(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn decimal_equivalent(a: Decimal, b: Decimal) -> bool {
    let scale = a.scale().min(b.scale());
    a.round_dp(scale) == b.round_dp(scale)
}
