use oav_core::config::ViewOptions;
use oav_core::operation_views;
use oav_core::parse;
use oav_core::parse::operation::HttpMethod;
use oav_core::parse::parameter::ParameterLocation;
use oav_core::parse::security::SecuritySchemeType;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

#[test]
fn parse_petstore_yaml() {
    let spec = parse::from_yaml(PETSTORE).expect("should parse petstore");
    assert_eq!(spec.openapi, "3.0.3");
    assert_eq!(spec.info.title, "Petstore");
    assert_eq!(spec.paths.len(), 3);
    assert_eq!(spec.servers.len(), 2);

    let components = spec.components.as_ref().expect("should have components");
    assert_eq!(components.security_schemes.len(), 2);
    assert_eq!(components.parameters.len(), 1);
}

#[test]
fn document_from_yaml_matches_typed_spec() {
    let doc = parse::document_from_yaml(PETSTORE).expect("should load document");
    assert_eq!(doc.spec().info.title, "Petstore");

    let scheme = doc.security_scheme("oauth").expect("oauth declared");
    assert_eq!(scheme.scheme_type, SecuritySchemeType::OAuth2);
}

#[test]
fn document_operations_in_order() {
    let doc = parse::document_from_yaml(PETSTORE).unwrap();
    let ops: Vec<(String, HttpMethod)> = doc.operations().map(|f| (f.path, f.verb)).collect();
    assert_eq!(
        ops,
        vec![
            ("/pets".to_string(), HttpMethod::Get),
            ("/pets".to_string(), HttpMethod::Post),
            ("/pets/{petId}".to_string(), HttpMethod::Get),
            ("/pets/{petId}".to_string(), HttpMethod::Delete),
            ("/health".to_string(), HttpMethod::Head),
        ]
    );
}

#[test]
fn document_from_json() {
    let json = r#"{
        "openapi": "3.1.0",
        "info": { "title": "Tiny", "version": "0.1" },
        "paths": { "/ping": { "get": { "responses": { "204": {} } } } }
    }"#;
    let doc = parse::document_from_json(json).unwrap();
    assert_eq!(doc.operations().count(), 1);
}

#[test]
fn unquoted_status_codes_are_accepted() {
    let yaml = r#"
openapi: 3.0.0
info:
  title: Unquoted
  version: "1"
paths:
  /ping:
    get:
      responses:
        200:
          description: pong
"#;
    let doc = parse::document_from_yaml(yaml).unwrap();
    let op = doc.operations().next().unwrap();
    assert!(op.operation.responses.contains_key("200"));
}

#[test]
fn parse_invalid_version() {
    let yaml = r#"
openapi: "2.0.0"
info:
  title: Test
  version: "1.0"
paths: {}
"#;
    assert!(parse::from_yaml(yaml).is_err());
    assert!(parse::document_from_yaml(yaml).is_err());
}

#[test]
fn malformed_entries_do_not_fail_the_document() {
    let yaml = r#"
openapi: 3.0.0
info:
  title: Legacy
  version: "1"
security:
  - legacy: []
paths:
  /upload:
    parameters:
      - name: trace
    post:
      parameters:
        - name: body
          in: body
      responses:
        "200":
          description: ok
components:
  parameters:
    Broken:
      name: broken
      in: query
      required: "sometimes"
  securitySchemes:
    legacy:
      type: basic
    key:
      type: apiKey
      name: X-Key
      in: header
"#;
    let doc = parse::document_from_yaml(yaml).expect("should load despite bad entries");
    let legacy = doc.security_scheme("legacy").expect("legacy kept");
    assert_eq!(legacy.scheme_type, SecuritySchemeType::Unknown);
    assert!(doc.security_scheme("key").is_some());

    let options = ViewOptions::default();
    let views = operation_views(&doc, None, &options).unwrap();
    let params: Vec<(&str, ParameterLocation)> = views[0]
        .parameters()
        .iter()
        .map(|p| (p.name.as_str(), p.location))
        .collect();
    assert_eq!(
        params,
        vec![
            ("trace", ParameterLocation::Unknown),
            ("body", ParameterLocation::Unknown),
        ]
    );
    assert!(views[0].security()[0].schemes[0].scheme.is_some());
}
