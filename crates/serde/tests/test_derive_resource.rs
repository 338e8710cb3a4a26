//! A resource defined outside the model crate goes through the same JSON and
//! XML codecs as the built-in ones.

use fhirbind_fhir::FhirSerde;
use fhirbind_fhir::r5::{Boolean, CodeableConcept, Date, Decimal, Id, String, Uri};
use fhirbind_serde::{from_json_str, from_xml_str, to_json_string, to_xml_string};
use rust_decimal_macros::dec;

#[derive(Debug, Clone, PartialEq, Default, FhirSerde)]
#[fhir_serde(resource = "TestResource")]
struct TestResource {
    id: Option<Id>,
    name: Option<Vec<String>>,
    birth_date: Option<Date>,
    is_active: Option<Boolean>,
    score: Option<Decimal>,
    #[fhir_serde(rename = "class")]
    category: Option<CodeableConcept>,
    alias: Option<Vec<Uri>>,
    reading: Option<TestReading>,
}

#[derive(Debug, Clone, PartialEq, FhirSerde)]
enum TestReading {
    Boolean(Boolean),
    String(String),
}

fn sample() -> TestResource {
    TestResource {
        id: Some(Id::from("t1")),
        name: Some(vec![String::from("Ada"), String::from("Lovelace")]),
        birth_date: Some("1815-12-10".parse().unwrap()),
        is_active: Some(Boolean::new(true)),
        score: Some(Decimal::new(dec!(12.50))),
        category: Some(CodeableConcept {
            text: Some(String::from("mathematician")),
            ..Default::default()
        }),
        alias: None,
        reading: Some(TestReading::String(String::from("high"))),
    }
}

#[test]
fn test_custom_resource_json() {
    let json = to_json_string(&sample()).unwrap();
    assert_eq!(
        json,
        r#"{"resourceType":"TestResource","id":"t1","name":["Ada","Lovelace"],"birthDate":"1815-12-10","isActive":true,"score":12.50,"class":{"text":"mathematician"},"readingString":"high"}"#
    );
    let back: TestResource = from_json_str(&json).unwrap();
    assert_eq!(back, sample());
}

#[test]
fn test_custom_resource_xml() {
    let xml = to_xml_string(&sample()).unwrap();
    assert_eq!(
        xml,
        concat!(
            r#"<TestResource xmlns="http://hl7.org/fhir"><id value="t1"/>"#,
            r#"<name value="Ada"/><name value="Lovelace"/>"#,
            r#"<birthDate value="1815-12-10"/><isActive value="true"/><score value="12.50"/>"#,
            r#"<class><text value="mathematician"/></class>"#,
            r#"<readingString value="high"/></TestResource>"#
        )
    );
    let back: TestResource = from_xml_str(&xml).unwrap();
    assert_eq!(back, sample());
}

#[test]
fn test_custom_resource_rejects_other_types() {
    let err = from_json_str::<TestResource>(r#"{"resourceType":"Evidence"}"#).unwrap_err();
    assert!(
        err.to_string()
            .contains("resourceType \"Evidence\" does not match expected \"TestResource\"")
    );

    let err = from_xml_str::<TestResource>(
        r#"<TestResource xmlns="http://hl7.org/fhir"><readingBoolean value="true"/><readingString value="x"/></TestResource>"#,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "decode error: multiple values for field \"reading[x]\" in TestResource"
    );
}

#[test]
fn test_custom_resource_display_is_pretty_json() {
    let resource = TestResource {
        id: Some(Id::from("t2")),
        ..Default::default()
    };
    assert_eq!(
        resource.to_string(),
        "{\n  \"resourceType\": \"TestResource\",\n  \"id\": \"t2\"\n}"
    );
}
