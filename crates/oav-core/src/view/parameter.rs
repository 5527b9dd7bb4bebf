use std::collections::HashMap;

use log::warn;
use serde::Serialize;

use crate::parse::ApiDocument;
use crate::parse::parameter::{Parameter, ParameterKey, ParameterLocation};
use crate::pointer;

/// A resolved parameter ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterView {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Serialization style, defaulted per location when omitted.
    pub style: String,
    pub explode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
    /// Pointer of the operation the parameter was collected for.
    #[serde(skip)]
    pub operation_pointer: String,
}

impl ParameterView {
    pub fn new(param: Parameter, operation_pointer: &str) -> Self {
        let style = param
            .style
            .unwrap_or_else(|| default_style(param.location).to_string());
        let explode = param.explode.unwrap_or(style == "form");
        Self {
            name: param.name,
            location: param.location,
            required: param.required,
            deprecated: param.deprecated.unwrap_or(false),
            description: param.description.unwrap_or_default(),
            style,
            explode,
            schema: param.schema,
            example: param.example,
            operation_pointer: operation_pointer.to_string(),
        }
    }

    pub fn key(&self) -> ParameterKey {
        ParameterKey {
            name: self.name.clone(),
            location: self.location,
        }
    }
}

fn default_style(location: ParameterLocation) -> &'static str {
    match location {
        ParameterLocation::Query | ParameterLocation::Cookie => "form",
        ParameterLocation::Path | ParameterLocation::Header | ParameterLocation::Unknown => {
            "simple"
        }
    }
}

/// Merge path-level parameters with operation-level ones.
///
/// Parameters are identified by name and location. An operation parameter
/// replaces the inherited one with the same identity at its original
/// position; anything new is appended. References are resolved against the
/// document; one that cannot be resolved keeps its slot as a placeholder
/// named after the last segment of its pointer.
pub fn merge_params(
    document: &ApiDocument,
    path_params: &[serde_json::Value],
    operation_params: &[serde_json::Value],
) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = Vec::with_capacity(path_params.len() + operation_params.len());
    let mut positions: HashMap<ParameterKey, usize> = HashMap::new();

    for param in path_params {
        if let Some(param) = resolve(document, param) {
            positions.entry(param.key()).or_insert(merged.len());
            merged.push(param);
        }
    }

    for param in operation_params {
        let Some(param) = resolve(document, param) else {
            continue;
        };
        match positions.get(&param.key()) {
            Some(&idx) => merged[idx] = param,
            None => {
                positions.insert(param.key(), merged.len());
                merged.push(param);
            }
        }
    }

    merged
}

fn resolve(document: &ApiDocument, raw: &serde_json::Value) -> Option<Parameter> {
    match document.resolve_parameter(raw) {
        Ok(p) => Some(p),
        Err(e) => {
            warn!("parameter could not be resolved: {e}");
            placeholder(raw)
        }
    }
}

/// Entries that are neither a reference nor carry a name have nothing to
/// show and are skipped.
fn placeholder(raw: &serde_json::Value) -> Option<Parameter> {
    let name = match raw.get("$ref").and_then(|r| r.as_str()) {
        Some(ref_path) => pointer::parse(ref_path).pop().unwrap_or_default(),
        None => raw.get("name")?.as_str()?.to_string(),
    };
    Some(Parameter::placeholder(name))
}

/// Stable reorder putting required parameters first.
pub fn sort_by_required(params: &mut [ParameterView]) {
    params.sort_by_key(|p| !p.required);
}
