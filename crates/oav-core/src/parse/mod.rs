pub mod components;
pub mod document;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod request_body;
pub mod response;
pub mod security;
pub mod server;
pub mod spec;

use crate::error::ParseError;
use spec::OpenApiSpec;

pub use document::ApiDocument;

/// Parse an OpenAPI spec from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI spec from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Load a document from YAML, keeping the raw tree around for `$ref` lookups.
pub fn document_from_yaml(input: &str) -> Result<ApiDocument, ParseError> {
    // Going through the YAML value lets unquoted status codes (`200:`) become
    // string keys instead of failing to parse.
    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
    let raw = serde_json::to_value(yaml)?;
    ApiDocument::from_value(raw)
}

/// Load a document from JSON, keeping the raw tree around for `$ref` lookups.
pub fn document_from_json(input: &str) -> Result<ApiDocument, ParseError> {
    let raw: serde_json::Value = serde_json::from_str(input)?;
    ApiDocument::from_value(raw)
}

pub(crate) fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}
