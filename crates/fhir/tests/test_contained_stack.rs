/// Deep `contained` nesting must not blow small thread stacks.
///
/// `Resource` is recursive through `contained: Option<Vec<Resource>>`, and
/// resource structs carry dozens of inline fields. Each variant is boxed, so
/// the enum itself stays pointer sized and decoding a contained resource
/// only costs a heap allocation.
use fhirbind_fhir::FhirResource;
use fhirbind_fhir::r5::*;

const EVIDENCE_WITH_CONTAINED: &str = r##"{
  "resourceType": "Evidence",
  "id": "ev-aspirin",
  "contained": [
    {
      "resourceType": "SpecimenDefinition",
      "id": "serum",
      "typeCollected": {
        "coding": [{
          "system": "http://snomed.info/sct",
          "code": "119364003",
          "display": "Serum specimen"
        }]
      }
    }
  ],
  "text": {
    "status": "generated",
    "div": "<div xmlns=\"http://www.w3.org/1999/xhtml\">Aspirin evidence summary</div>"
  },
  "status": "active",
  "statistic": [{
    "statisticType": {"text": "Relative risk"},
    "quantity": {"value": 0.75, "unit": "ratio"}
  }],
  "variableDefinition": [{
    "variableRole": {"text": "exposure"},
    "observed": {"reference": "#serum"}
  }]
}"##;

#[test]
fn test_resource_enum_size_is_reasonable() {
    let size = std::mem::size_of::<Resource>();
    assert!(
        size <= 16,
        "Resource enum is {} bytes, expected a boxed pointer plus tag",
        size
    );
}

#[test]
fn test_deserialize_contained_resource_small_stack() {
    let stack_size = 2 * 1024 * 1024;

    let handle = std::thread::Builder::new()
        .name("small-stack-test".into())
        .stack_size(stack_size)
        .spawn(|| {
            let resource: Resource = serde_json::from_str(EVIDENCE_WITH_CONTAINED)
                .expect("Failed to deserialize Evidence with contained SpecimenDefinition");

            if let Resource::Evidence(evidence) = &resource {
                let contained = evidence.contained.as_ref().unwrap();
                assert_eq!(contained.len(), 1);
                assert!(matches!(&contained[0], Resource::SpecimenDefinition(_)));
                assert_eq!(contained[0].resource_id(), Some("serum"));
            } else {
                panic!("Expected Evidence resource, got {:?}", resource);
            }
        })
        .expect("Failed to spawn thread");

    handle
        .join()
        .expect("Thread panicked, likely a stack overflow decoding contained resources");
}

#[test]
fn test_deeply_nested_contained_small_stack() {
    let mut json = serde_json::json!({"resourceType": "RegulatedAuthorization", "id": "leaf"});
    for depth in 0..8 {
        json = serde_json::json!({
            "resourceType": "Evidence",
            "id": format!("level-{depth}"),
            "contained": [json]
        });
    }
    let text = json.to_string();

    let handle = std::thread::Builder::new()
        .name("small-stack-nested".into())
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            let resource: Resource = serde_json::from_str(&text).expect("nested decode");
            let mut current = &resource;
            let mut depth = 0;
            while let Resource::Evidence(evidence) = current {
                current = &evidence.contained.as_ref().unwrap()[0];
                depth += 1;
            }
            assert_eq!(depth, 8);
            assert_eq!(current.resource_type(), "RegulatedAuthorization");
        })
        .expect("Failed to spawn thread");

    handle.join().expect("Thread panicked decoding nested contained resources");
}
