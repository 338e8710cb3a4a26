//! XML codec tests over the R5 resources: element-tree shape, primitive
//! `id`/`extension` attributes, repeated primitives, choices, `contained`,
//! narrative XHTML and error reporting.

use fhirbind_fhir::DecodeError;
use fhirbind_fhir::r5::*;
use fhirbind_serde::{
    SerdeError, XmlWriteOptions, from_json_str, from_xml_reader, from_xml_slice, from_xml_str,
    to_json_value, to_xml_string, to_xml_string_with,
};
use rust_decimal_macros::dec;
use serde_json::json;

const NARRATIVE: &str =
    r#"<div xmlns="http://www.w3.org/1999/xhtml"><p>Serum &amp; plasma, <b>fasting</b></p></div>"#;

fn specimen_definition_xml() -> std::string::String {
    format!(
        concat!(
            r#"<SpecimenDefinition xmlns="http://hl7.org/fhir">"#,
            r#"<id value="serum"/>"#,
            r#"<text><status value="generated"/>{}</text>"#,
            r#"<versionAlgorithmString value="semver"/>"#,
            r#"<derivedFromUri value="http://example.org/a"/>"#,
            r#"<derivedFromUri id="u2"><extension url="http://example.org/reason"><valueString value="withdrawn"/></extension></derivedFromUri>"#,
            r#"<derivedFromUri value="http://example.org/c"/>"#,
            r#"<status value="active"/>"#,
            r#"<subjectCodeableConcept><text value="human"/></subjectCodeableConcept>"#,
            r#"<typeTested><isDerived value="false"/><type><text value="serum"/></type><preference value="preferred"/>"#,
            r#"<container><minimumVolumeQuantity><value value="0.50"/><unit value="mL"/></minimumVolumeQuantity>"#,
            r#"<additive><additiveReference><reference value="Substance/gel"/></additiveReference></additive>"#,
            r#"</container></typeTested>"#,
            r#"</SpecimenDefinition>"#,
        ),
        NARRATIVE
    )
}

#[test]
fn test_specimen_definition_from_xml() {
    let spec: SpecimenDefinition = from_xml_str(&specimen_definition_xml()).unwrap();

    assert_eq!(spec.id, Some(Id::from("serum")));
    assert_eq!(
        spec.text.as_ref().and_then(|t| t.div.as_ref()).and_then(|d| d.value.as_deref()),
        Some(NARRATIVE)
    );
    assert_eq!(
        spec.version_algorithm,
        Some(SpecimenDefinitionVersionAlgorithm::String(String::from("semver")))
    );

    let uris = spec.derived_from_uri.as_ref().unwrap();
    assert_eq!(uris.len(), 3);
    assert_eq!(uris[0].value.as_deref(), Some("http://example.org/a"));
    assert_eq!(uris[1].value, None);
    assert_eq!(uris[1].id.as_deref(), Some("u2"));
    assert_eq!(uris[1].extension.as_ref().map(Vec::len), Some(1));
    assert_eq!(uris[2].value.as_deref(), Some("http://example.org/c"));

    let tested = &spec.type_tested.as_ref().unwrap()[0];
    assert_eq!(tested.is_derived, Some(Boolean::new(false)));
    let container = tested.container.as_ref().unwrap();
    match &container.minimum_volume {
        Some(SpecimenDefinitionTypeTestedContainerMinimumVolume::Quantity(quantity)) => {
            assert_eq!(quantity.value, Some(Decimal::new(dec!(0.50))));
        }
        other => panic!("unexpected minimumVolume: {:?}", other),
    }
    assert!(matches!(
        container.additive.as_ref().unwrap()[0].additive,
        Some(SpecimenDefinitionTypeTestedContainerAdditiveAdditive::Reference(_))
    ));
}

#[test]
fn test_xml_round_trip_is_byte_identical() {
    let xml = specimen_definition_xml();
    let spec: SpecimenDefinition = from_xml_str(&xml).unwrap();
    assert_eq!(to_xml_string(&spec).unwrap(), xml);
}

#[test]
fn test_repeated_primitives_match_json_arrays() {
    let spec: SpecimenDefinition = from_xml_str(&specimen_definition_xml()).unwrap();
    let value = to_json_value(&spec).unwrap();
    assert_eq!(
        value["derivedFromUri"],
        json!(["http://example.org/a", null, "http://example.org/c"])
    );
    assert_eq!(
        value["_derivedFromUri"],
        json!([
            null,
            {
                "id": "u2",
                "extension": [{"url": "http://example.org/reason", "valueString": "withdrawn"}]
            },
            null
        ])
    );
}

#[test]
fn test_primitive_id_and_extension_are_attributes_and_children() {
    let evidence = Evidence {
        date: Some(DateTime {
            id: Some("d1".to_string()),
            extension: Some(vec![Extension {
                url: Some("http://example.org/certainty".to_string()),
                value: Some(ExtensionValue::Boolean(Boolean::new(true))),
                ..Default::default()
            }]),
            value: "2024-03-01".parse::<DateTime>().unwrap().value,
        }),
        ..Default::default()
    };
    let xml = to_xml_string(&evidence).unwrap();
    assert_eq!(
        xml,
        concat!(
            r#"<Evidence xmlns="http://hl7.org/fhir">"#,
            r#"<date id="d1" value="2024-03-01">"#,
            r#"<extension url="http://example.org/certainty"><valueBoolean value="true"/></extension>"#,
            r#"</date></Evidence>"#
        )
    );
    let back: Evidence = from_xml_str(&xml).unwrap();
    assert_eq!(back, evidence);
}

#[test]
fn test_contained_resources_are_wrapped() {
    let evidence: Evidence = from_json_str(
        r#"{
            "resourceType": "Evidence",
            "id": "ev",
            "contained": [
                {"resourceType": "SpecimenDefinition", "id": "spec", "status": "draft"},
                {"resourceType": "RegulatedAuthorization", "id": "auth"}
            ],
            "status": "active"
        }"#,
    )
    .unwrap();

    let xml = to_xml_string(&evidence).unwrap();
    assert_eq!(
        xml,
        concat!(
            r#"<Evidence xmlns="http://hl7.org/fhir"><id value="ev"/>"#,
            r#"<contained><SpecimenDefinition><id value="spec"/><status value="draft"/></SpecimenDefinition></contained>"#,
            r#"<contained><RegulatedAuthorization><id value="auth"/></RegulatedAuthorization></contained>"#,
            r#"<status value="active"/></Evidence>"#
        )
    );

    let back: Evidence = from_xml_str(&xml).unwrap();
    let contained = back.contained.as_ref().unwrap();
    assert!(matches!(&contained[0], Resource::SpecimenDefinition(_)));
    assert!(matches!(&contained[1], Resource::RegulatedAuthorization(_)));
    assert_eq!(back, evidence);
}

#[test]
fn test_resource_enum_dispatches_on_root_element() {
    let resource: Resource = from_xml_str(
        r#"<RegulatedAuthorization xmlns="http://hl7.org/fhir"><id value="ra"/></RegulatedAuthorization>"#,
    )
    .unwrap();
    assert_eq!(resource.resource_type(), "RegulatedAuthorization");
    assert_eq!(resource.resource_id(), Some("ra"));

    let err = from_xml_str::<Resource>(r#"<Patient xmlns="http://hl7.org/fhir"/>"#).unwrap_err();
    assert!(matches!(
        err,
        SerdeError::Decode(DecodeError::UnknownResourceType(ref name)) if name == "Patient"
    ));
}

#[test]
fn test_recursive_case_round_trip() {
    let xml = concat!(
        r#"<RegulatedAuthorization xmlns="http://hl7.org/fhir">"#,
        r#"<case><type><text value="initial"/></type><dateDateTime value="2021-05-03"/>"#,
        r#"<application><type><text value="variation"/></type>"#,
        r#"<datePeriod><start value="2022-01-01"/></datePeriod>"#,
        r#"<application><type><text value="renewal"/></type></application>"#,
        r#"</application></case>"#,
        r#"</RegulatedAuthorization>"#
    );
    let auth: RegulatedAuthorization = from_xml_str(xml).unwrap();
    let case = auth.case.as_ref().unwrap();
    assert!(matches!(case.date, Some(RegulatedAuthorizationCaseDate::DateTime(_))));
    let nested = &case.application.as_ref().unwrap()[0];
    assert!(matches!(nested.date, Some(RegulatedAuthorizationCaseDate::Period(_))));
    assert_eq!(nested.application.as_ref().map(Vec::len), Some(1));
    assert_eq!(to_xml_string(&auth).unwrap(), xml);
}

#[test]
fn test_duplicate_choice_is_rejected() {
    let err = from_xml_str::<RegulatedAuthorization>(concat!(
        r#"<RegulatedAuthorization xmlns="http://hl7.org/fhir"><case>"#,
        r#"<dateDateTime value="2021-05-03"/>"#,
        r#"<datePeriod><start value="2021-05-03"/></datePeriod>"#,
        r#"</case></RegulatedAuthorization>"#
    ))
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "decode error: multiple values for field \"date[x]\" in RegulatedAuthorizationCase"
    );
    assert!(matches!(err, SerdeError::Decode(DecodeError::MultipleValues { .. })));
}

#[test]
fn test_decimal_text_is_preserved() {
    let xml = concat!(
        r#"<Evidence xmlns="http://hl7.org/fhir"><statistic>"#,
        r#"<quantity><value value="0.950"/></quantity>"#,
        r#"<attributeEstimate><level value="1.10"/></attributeEstimate>"#,
        r#"</statistic></Evidence>"#
    );
    let evidence: Evidence = from_xml_str(xml).unwrap();
    let statistic = &evidence.statistic.as_ref().unwrap()[0];
    assert_eq!(
        statistic.quantity.as_ref().and_then(|q| q.value.clone()),
        Some(Decimal::new(dec!(0.950)))
    );
    assert_eq!(to_xml_string(&evidence).unwrap(), xml);
}

#[test]
fn test_unknown_element_is_rejected() {
    let err = from_xml_str::<Evidence>(
        r#"<Evidence xmlns="http://hl7.org/fhir"><id value="x"/><bogus value="1"/></Evidence>"#,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "decode error: unknown field \"bogus\" in Evidence"
    );

    let err = from_xml_str::<SpecimenDefinition>(
        r#"<SpecimenDefinition xmlns="http://hl7.org/fhir"><typeTested><container><lid/></container></typeTested></SpecimenDefinition>"#,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "decode error: unknown field \"lid\" in SpecimenDefinitionTypeTestedContainer"
    );
}

#[test]
fn test_unknown_attribute_is_rejected() {
    let err = from_xml_str::<Evidence>(
        r#"<Evidence xmlns="http://hl7.org/fhir"><status foo="x" value="active"/></Evidence>"#,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "decode error: unknown field \"foo\" in Code");

    let err = from_xml_str::<Evidence>(
        r#"<Evidence xmlns="http://hl7.org/fhir"><certainty lang="en"/></Evidence>"#,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "decode error: unknown field \"lang\" in EvidenceCertainty"
    );

    let err = from_xml_str::<Evidence>(r#"<Evidence xmlns="http://hl7.org/fhir" version="5"/>"#)
        .unwrap_err();
    assert_eq!(err.to_string(), "decode error: unknown field \"version\" in Evidence");
}

#[test]
fn test_empty_primitive_element_leaves_field_unset() {
    let evidence: Evidence = from_xml_str(
        r#"<Evidence xmlns="http://hl7.org/fhir"><title/><versionAlgorithmString/></Evidence>"#,
    )
    .unwrap();
    assert_eq!(evidence.title, None);
    assert_eq!(evidence.version_algorithm, None);
    assert_eq!(to_xml_string(&evidence).unwrap(), r#"<Evidence xmlns="http://hl7.org/fhir"/>"#);
}

#[test]
fn test_invalid_primitive_value() {
    let err = from_xml_str::<Evidence>(
        r#"<Evidence xmlns="http://hl7.org/fhir"><approvalDate value="2021-13-01"/></Evidence>"#,
    )
    .unwrap_err();
    assert!(matches!(err, SerdeError::Decode(DecodeError::InvalidValue { .. })));
}

#[test]
fn test_resource_type_mismatch() {
    let err = from_xml_str::<Evidence>(r#"<SpecimenDefinition xmlns="http://hl7.org/fhir"/>"#)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "decode error: resourceType \"SpecimenDefinition\" does not match expected \"Evidence\""
    );
}

#[test]
fn test_malformed_xml_is_an_xml_error() {
    let err = from_xml_str::<Evidence>(r#"<Evidence xmlns="http://hl7.org/fhir"><id value="x"></Evidence>"#)
        .unwrap_err();
    assert!(matches!(err, SerdeError::Xml(_)));
}

#[test]
fn test_json_and_xml_agree() {
    let json = json!({
        "resourceType": "Evidence",
        "id": "ev-1",
        "url": "http://example.org/Evidence/ev-1",
        "versionAlgorithmCoding": {"system": "http://hl7.org/fhir/version-algorithm", "code": "semver"},
        "status": "active",
        "_status": {"id": "s1"},
        "experimental": false,
        "citeAsMarkdown": "Doe J. *Trial*",
        "useContext": [{"code": {"code": "focus"}, "valueCodeableConcept": {"text": "adults"}}],
        "certainty": [{
            "rating": {"text": "moderate"},
            "subcomponent": [{"type": {"text": "risk of bias"}}]
        }]
    });
    let from_json: Evidence = serde_json::from_value(json.clone()).unwrap();

    let xml = to_xml_string_with(&from_json, XmlWriteOptions::pretty()).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Evidence"));
    assert!(xml.contains("<status id=\"s1\" value=\"active\"/>"));
    assert!(xml.contains("<experimental value=\"false\"/>"));

    let from_xml: Evidence = from_xml_slice(xml.as_bytes()).unwrap();
    assert_eq!(from_xml, from_json);
    assert_eq!(to_json_value(&from_xml).unwrap(), json);

    let from_reader: Evidence = from_xml_reader(xml.as_bytes()).unwrap();
    assert_eq!(from_reader, from_json);
}
