use crate::error::ConversionError;
use crate::system::{SystemQuantity, SystemValue};
use crate::temporal::{PrecisionDate, PrecisionDateTime, PrecisionTime};
use crate::type_info::TypeInfoResult;
use rust_decimal::Decimal;
use std::fmt::Debug;

/// Reflection surface a FHIRPath evaluator walks.
///
/// Model types implement `type_info`, `fields` and (for primitives)
/// `system_value`; everything else has a generic default built on those three.
/// The trait is object safe so heterogeneous children can be returned as
/// `&dyn FhirPathElement`.
pub trait FhirPathElement: Debug {
    fn type_info(&self) -> TypeInfoResult;

    /// Populated child elements in declaration order, keyed by FHIR element
    /// name. Repeating elements contribute one entry per item and choice
    /// elements appear under their base name (`value`, not `valueString`).
    fn fields(&self) -> Vec<(&'static str, &dyn FhirPathElement)>;

    /// The system value of a primitive element, if it has one.
    fn system_value(&self) -> Option<SystemValue> {
        None
    }

    /// Children with one of the given names, or all children when `names` is
    /// empty.
    fn children(&self, names: &[&str]) -> Vec<&dyn FhirPathElement> {
        self.fields()
            .into_iter()
            .filter(|(name, _)| names.is_empty() || names.contains(name))
            .map(|(_, element)| element)
            .collect()
    }

    fn equal(&self, other: &dyn FhirPathElement) -> Option<bool> {
        element_equal(self, other)
    }

    fn equivalent(&self, other: &dyn FhirPathElement) -> bool {
        element_equivalent(self, other)
    }

    fn to_boolean(&self, explicit: bool) -> Result<Option<bool>, ConversionError> {
        match self.system_value() {
            Some(value) => value.to_boolean(explicit),
            None => Err(composite_error(&self.type_info(), "Boolean")),
        }
    }

    fn to_string_value(&self, explicit: bool) -> Result<Option<String>, ConversionError> {
        match self.system_value() {
            Some(value) => value.to_string_value(explicit),
            None => Err(composite_error(&self.type_info(), "String")),
        }
    }

    fn to_integer(&self, explicit: bool) -> Result<Option<i64>, ConversionError> {
        match self.system_value() {
            Some(value) => value.to_integer(explicit),
            None => Err(composite_error(&self.type_info(), "Integer")),
        }
    }

    fn to_decimal(&self, explicit: bool) -> Result<Option<Decimal>, ConversionError> {
        match self.system_value() {
            Some(value) => value.to_decimal(explicit),
            None => Err(composite_error(&self.type_info(), "Decimal")),
        }
    }

    fn to_date(&self, explicit: bool) -> Result<Option<PrecisionDate>, ConversionError> {
        match self.system_value() {
            Some(value) => value.to_date(explicit),
            None => Err(composite_error(&self.type_info(), "Date")),
        }
    }

    fn to_time(&self, explicit: bool) -> Result<Option<PrecisionTime>, ConversionError> {
        match self.system_value() {
            Some(value) => value.to_time(explicit),
            None => Err(composite_error(&self.type_info(), "Time")),
        }
    }

    fn to_date_time(&self, explicit: bool) -> Result<Option<PrecisionDateTime>, ConversionError> {
        match self.system_value() {
            Some(value) => value.to_date_time(explicit),
            None => Err(composite_error(&self.type_info(), "DateTime")),
        }
    }

    fn to_quantity(&self, explicit: bool) -> Result<Option<SystemQuantity>, ConversionError> {
        match self.system_value() {
            Some(value) => value.to_quantity(explicit),
            None => Err(composite_error(&self.type_info(), "Quantity")),
        }
    }
}

fn composite_error(type_info: &TypeInfoResult, to: &'static str) -> ConversionError {
    ConversionError::not_convertible(type_info.to_string(), to)
}

/// FHIRPath `=` over two elements.
///
/// Primitives compare by system value. Complex elements are equal when they
/// have the same type and the same children pairwise; any empty child
/// comparison makes the whole result empty.
pub fn element_equal<A>(left: &A, right: &dyn FhirPathElement) -> Option<bool>
where
    A: FhirPathElement + ?Sized,
{
    match (left.system_value(), right.system_value()) {
        (Some(l), Some(r)) => l.equal(&r),
        (None, None) => {
            if left.type_info() != right.type_info() {
                return Some(false);
            }
            let left_fields = left.fields();
            let right_fields = right.fields();
            if left_fields.len() != right_fields.len() {
                return Some(false);
            }
            let mut result = Some(true);
            for ((left_name, left_child), (right_name, right_child)) in
                left_fields.iter().zip(right_fields.iter())
            {
                if left_name != right_name {
                    return Some(false);
                }
                match left_child.equal(*right_child) {
                    Some(true) => {}
                    Some(false) => return Some(false),
                    None => result = None,
                }
            }
            result
        }
        _ => Some(false),
    }
}

/// FHIRPath `~` over two elements.
pub fn element_equivalent<A>(left: &A, right: &dyn FhirPathElement) -> bool
where
    A: FhirPathElement + ?Sized,
{
    match (left.system_value(), right.system_value()) {
        (Some(l), Some(r)) => l.equivalent(&r),
        (None, None) => {
            let left_fields = left.fields();
            let right_fields = right.fields();
            left.type_info() == right.type_info()
                && left_fields.len() == right_fields.len()
                && left_fields
                    .iter()
                    .zip(right_fields.iter())
                    .all(|((ln, lc), (rn, rc))| ln == rn && lc.equivalent(*rc))
        }
        _ => false,
    }
}

impl FhirPathElement for String {
    fn type_info(&self) -> TypeInfoResult {
        TypeInfoResult::system("String")
    }

    fn fields(&self) -> Vec<(&'static str, &dyn FhirPathElement)> {
        Vec::new()
    }

    fn system_value(&self) -> Option<SystemValue> {
        Some(SystemValue::String(self.clone()))
    }
}

impl<T: FhirPathElement + ?Sized> FhirPathElement for Box<T> {
    fn type_info(&self) -> TypeInfoResult {
        (**self).type_info()
    }

    fn fields(&self) -> Vec<(&'static str, &dyn FhirPathElement)> {
        (**self).fields()
    }

    fn system_value(&self) -> Option<SystemValue> {
        (**self).system_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Pair {
        first: String,
        second: Option<String>,
    }

    impl FhirPathElement for Pair {
        fn type_info(&self) -> TypeInfoResult {
            TypeInfoResult::fhir("Pair")
        }

        fn fields(&self) -> Vec<(&'static str, &dyn FhirPathElement)> {
            let mut out: Vec<(&'static str, &dyn FhirPathElement)> =
                vec![("first", &self.first as &dyn FhirPathElement)];
            if let Some(second) = &self.second {
                out.push(("second", second as &dyn FhirPathElement));
            }
            out
        }
    }

    fn pair(first: &str, second: Option<&str>) -> Pair {
        Pair {
            first: first.to_string(),
            second: second.map(str::to_string),
        }
    }

    #[test]
    fn test_children_filter_by_name() {
        let value = pair("a", Some("b"));
        assert_eq!(value.children(&[]).len(), 2);
        let seconds = value.children(&["second"]);
        assert_eq!(seconds.len(), 1);
        assert_eq!(
            seconds[0].system_value(),
            Some(SystemValue::String("b".to_string()))
        );
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(pair("a", Some("b")).equal(&pair("a", Some("b"))), Some(true));
        assert_eq!(pair("a", Some("b")).equal(&pair("a", Some("c"))), Some(false));
        assert_eq!(pair("a", None).equal(&pair("a", Some("b"))), Some(false));
        assert!(pair("A", None).equivalent(&pair("a", None)));
    }

    #[test]
    fn test_composite_conversion_errors() {
        let err = pair("a", None).to_integer(true).unwrap_err();
        assert_eq!(err.to_string(), "cannot convert FHIR.Pair to Integer");
        assert_eq!(
            "x".to_string().to_string_value(false),
            Ok(Some("x".to_string()))
        );
    }
}
