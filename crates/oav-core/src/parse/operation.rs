use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::security::SecurityRequirement;
use super::server::Server;
use super::spec::ExternalDocs;
use crate::error::ViewError;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// All methods in the order a path item declares them.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Lowercase form, as used for path item keys and pointers.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// A code sample attached through the `x-codeSamples` extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSample {
    pub lang: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub source: String,
}

/// An API operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Parameters, the request body and responses are kept raw and decoded
    /// entry by entry when the view needs them; a malformed entry degrades to
    /// an empty one instead of failing the operation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<serde_json::Value>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<serde_json::Value>,

    /// Vendor extensions and typos live next to real status codes and are
    /// only filtered out when the view classifies responses.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    #[serde(rename = "x-codeSamples", skip_serializing_if = "Option::is_none")]
    pub code_samples: Option<Vec<CodeSample>>,

    #[serde(rename = "x-code-samples", skip_serializing_if = "Option::is_none")]
    pub legacy_code_samples: Option<Vec<CodeSample>>,
}

/// A path item, containing operations keyed by HTTP method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    /// Declared operations in method order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(|method| self.operation(method).map(|op| (method, op)))
    }
}

/// One operation together with everything it inherits from its path item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationFragment {
    #[serde(rename = "pathName")]
    pub path: String,

    #[serde(rename = "httpVerb")]
    pub verb: HttpMethod,

    #[serde(rename = "pathParameters", default, skip_serializing_if = "Vec::is_empty")]
    pub path_parameters: Vec<serde_json::Value>,

    #[serde(rename = "pathServers", skip_serializing_if = "Option::is_none")]
    pub path_servers: Option<Vec<Server>>,

    #[serde(flatten)]
    pub operation: Operation,
}

impl OperationFragment {
    pub fn new(path: &str, verb: HttpMethod, item: &PathItem, operation: &Operation) -> Self {
        Self {
            path: path.to_string(),
            verb,
            path_parameters: item.parameters.clone(),
            path_servers: item.servers.clone(),
            operation: operation.clone(),
        }
    }

    /// Build a fragment from raw JSON. `pathName` and `httpVerb` are the only
    /// fields whose absence is fatal.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ViewError> {
        let fragment: OperationFragment = serde_json::from_value(value)?;
        fragment.validate()?;
        Ok(fragment)
    }

    pub(crate) fn validate(&self) -> Result<(), ViewError> {
        if self.path.is_empty() {
            return Err(ViewError::MissingField("pathName"));
        }
        Ok(())
    }

    /// Code samples, preferring `x-codeSamples` over the legacy spelling.
    pub fn code_samples(&self) -> &[CodeSample] {
        self.operation
            .code_samples
            .as_deref()
            .or(self.operation.legacy_code_samples.as_deref())
            .unwrap_or_default()
    }
}
