use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid spec URL {url}: {source}")]
    SpecUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("circular reference detected: {0}")]
    CircularRef(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    #[error("malformed entry: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("reference target {ref_path} has an unexpected shape: {source}")]
    Deserialize {
        ref_path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Fatal problems with an operation fragment. Anything softer than a missing
/// verb or path is tolerated by the view layer.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("invalid operation fragment: {0}")]
    InvalidFragment(#[from] serde_json::Error),

    #[error("operation fragment is missing required field: {0}")]
    MissingField(&'static str),
}
