use indexmap::IndexMap;
use serde::Serialize;

use crate::parse::media_type::MediaType;
use crate::parse::request_body::RequestBody;

/// A resolved request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBodyView {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub required: bool,
    pub content: IndexMap<String, MediaType>,
}

impl RequestBodyView {
    pub fn new(body: RequestBody) -> Self {
        Self {
            description: body.description.unwrap_or_default(),
            required: body.required,
            content: body.content,
        }
    }

    /// Media types in declaration order.
    pub fn media_types(&self) -> impl Iterator<Item = &str> {
        self.content.keys().map(String::as_str)
    }
}
