use fhirbind_fhir::MemSize;
use fhirbind_fhir::fhirpath::{
    ConversionError, FhirPathElement, SystemQuantity, SystemValue, TypeInfoResult,
};
use fhirbind_fhir::r5::*;
use rust_decimal_macros::dec;
use serde_json::json;

fn evidence() -> Evidence {
    serde_json::from_value(json!({
        "resourceType": "Evidence",
        "id": "ev-1",
        "status": "active",
        "versionAlgorithmString": "semver",
        "useContext": [
            {"code": {"code": "age"}, "valueQuantity": {"value": 18, "code": "a"}},
            {"code": {"code": "focus"}, "valueCodeableConcept": {"text": "adults"}}
        ],
        "certainty": [{
            "rating": {"text": "moderate"},
            "subcomponent": [
                {"type": {"text": "risk of bias"}, "rating": {"text": "no concern"}},
                {"type": {"text": "imprecision"}, "rating": {"text": "serious concern"}}
            ]
        }]
    }))
    .unwrap()
}

#[test]
fn test_type_info() {
    let evidence = evidence();
    assert_eq!(evidence.type_info(), TypeInfoResult::fhir("Evidence"));
    let certainty = &evidence.certainty.as_ref().unwrap()[0];
    assert_eq!(certainty.type_info(), TypeInfoResult::fhir("BackboneElement"));
    assert_eq!(
        Coding::default().type_info().to_string(),
        "FHIR.Coding"
    );
    assert_eq!(Date::default().type_info(), TypeInfoResult::fhir("date"));
}

#[test]
fn test_children_in_declaration_order() {
    let evidence = evidence();
    let names: Vec<&str> = evidence.fields().iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        vec![
            "id",
            "versionAlgorithm",
            "status",
            "useContext",
            "useContext",
            "certainty"
        ]
    );
}

#[test]
fn test_choice_children_use_base_name() {
    let evidence = evidence();
    let algorithm = evidence.children(&["versionAlgorithm"]);
    assert_eq!(algorithm.len(), 1);
    assert_eq!(algorithm[0].type_info(), TypeInfoResult::fhir("string"));
    assert_eq!(
        algorithm[0].system_value(),
        Some(SystemValue::String("semver".to_string()))
    );

    let contexts = evidence.children(&["useContext"]);
    let values: Vec<TypeInfoResult> = contexts
        .iter()
        .flat_map(|context| context.children(&["value"]))
        .map(|value| value.type_info())
        .collect();
    assert_eq!(
        values,
        vec![
            TypeInfoResult::fhir("Quantity"),
            TypeInfoResult::fhir("CodeableConcept")
        ]
    );
}

#[test]
fn test_recursive_children() {
    let evidence = evidence();
    let certainty = evidence.children(&["certainty"]);
    let subcomponents = certainty[0].children(&["subcomponent"]);
    assert_eq!(subcomponents.len(), 2);
    let all = subcomponents[1].children(&[]);
    assert_eq!(all.len(), 2);
}

#[test]
fn test_equal_and_equivalent_on_complex_types() {
    let a = Coding {
        system: Some(Uri::from("http://loinc.org")),
        code: Some(Code::from("29463-7")),
        display: Some(String::from("Body Weight")),
        ..Default::default()
    };
    let mut b = a.clone();
    assert_eq!(a.equal(&b), Some(true));

    b.display = Some(String::from("body   weight"));
    assert_eq!(a.equal(&b), Some(false));
    assert!(a.equivalent(&b));

    let concept = CodeableConcept::default();
    assert_eq!(a.equal(&concept), Some(false));
}

#[test]
fn test_primitive_equality_by_precision() {
    let day: DateTime = "2024-03-01".parse().unwrap();
    let instant: DateTime = "2024-03-01T10:00:00Z".parse().unwrap();
    assert_eq!(day.equal(&instant), None);
    assert!(!day.equivalent(&instant));

    let utc: DateTime = "2024-03-01T10:00:00Z".parse().unwrap();
    let offset: DateTime = "2024-03-01T12:00:00+02:00".parse().unwrap();
    assert_eq!(utc.equal(&offset), Some(true));

    let integer = Integer::new(2);
    let decimal = Decimal::new(dec!(2.0));
    assert_eq!(integer.equal(&decimal), Some(true));
}

#[test]
fn test_primitive_conversions() {
    assert_eq!(Boolean::new(true).to_boolean(false), Ok(Some(true)));
    assert_eq!(Code::from("true").to_boolean(true), Ok(Some(true)));
    assert_eq!(
        Integer::new(7).to_decimal(false),
        Ok(Some(dec!(7)))
    );
    assert_eq!(
        UnsignedInt::new(4).to_string_value(true),
        Ok(Some("4".to_string()))
    );
    let date: Date = "2024-03".parse().unwrap();
    assert_eq!(
        date.to_date_time(false).unwrap().map(|dt| dt.as_str().to_string()),
        Some("2024-03".to_string())
    );
}

#[test]
fn test_quantity_conversion() {
    let quantity = Quantity {
        value: Some(Decimal::new(dec!(7.5))),
        unit: Some(String::from("milliliter")),
        code: Some(Code::from("mL")),
        ..Default::default()
    };
    assert_eq!(
        quantity.to_quantity(false),
        Ok(Some(SystemQuantity::new(dec!(7.5), "mL")))
    );
    assert_eq!(
        Decimal::new(dec!(3)).to_quantity(false),
        Ok(Some(SystemQuantity::new(dec!(3), "1")))
    );
}

#[test]
fn test_composite_conversions_fail() {
    let evidence = evidence();
    assert_eq!(
        evidence.to_boolean(true),
        Err(ConversionError::not_convertible("FHIR.Evidence", "Boolean"))
    );
    let reference = Reference::default();
    assert!(reference.to_string_value(true).is_err());
    assert!(reference.to_date_time(false).is_err());
    let resource = Resource::from(evidence);
    assert!(resource.to_integer(true).is_err());
}

#[test]
fn test_mem_size_grows_with_content() {
    let empty = Evidence::default();
    let full = evidence();
    assert_eq!(empty.heap_size(), 0);
    assert!(full.mem_size() > empty.mem_size());
    assert!(full.heap_size() > 0);

    let resource = Resource::from(full.clone());
    assert_eq!(
        resource.mem_size(),
        std::mem::size_of::<Resource>() + std::mem::size_of::<Evidence>() + full.heap_size()
    );
}
