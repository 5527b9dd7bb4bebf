use std::collections::HashSet;

use indexmap::IndexMap;
use log::warn;
use serde::de::DeserializeOwned;
use url::Url;

use super::operation::OperationFragment;
use super::parameter::{Parameter, ParameterOrRef};
use super::request_body::{RequestBody, RequestBodyOrRef};
use super::response::{Response, ResponseOrRef};
use super::security::{SecurityScheme, SecuritySchemeOrRef};
use super::spec::OpenApiSpec;
use crate::error::{ParseError, ResolveError};
use crate::pointer;

/// A loaded OpenAPI document. Keeps the typed spec for structured access and
/// the raw tree so any local `$ref` pointer can be followed.
///
/// Views borrow the document immutably; it must not change once views exist.
#[derive(Debug, Clone)]
pub struct ApiDocument {
    spec: OpenApiSpec,
    raw: serde_json::Value,
    spec_url: Option<Url>,
    security_schemes: IndexMap<String, SecurityScheme>,
}

impl ApiDocument {
    pub fn from_value(raw: serde_json::Value) -> Result<Self, ParseError> {
        let spec: OpenApiSpec = serde_json::from_value(raw.clone())?;
        super::validate_version(&spec)?;
        let mut document = Self {
            spec,
            raw,
            spec_url: None,
            security_schemes: IndexMap::new(),
        };
        document.security_schemes = document.collect_security_schemes();
        Ok(document)
    }

    /// Record where the document was loaded from. Relative server URLs are
    /// resolved against it.
    pub fn with_spec_url(mut self, spec_url: &str) -> Result<Self, ParseError> {
        let url = Url::parse(spec_url).map_err(|source| ParseError::SpecUrl {
            url: spec_url.to_string(),
            source,
        })?;
        self.spec_url = Some(url);
        Ok(self)
    }

    pub fn spec(&self) -> &OpenApiSpec {
        &self.spec
    }

    pub fn spec_url(&self) -> Option<&Url> {
        self.spec_url.as_ref()
    }

    /// Every operation in the document, in path order and then method order.
    pub fn operations(&self) -> impl Iterator<Item = OperationFragment> + '_ {
        self.spec.paths.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, op)| OperationFragment::new(path, method, item, op))
        })
    }

    /// Follow a local `$ref` (and any chain of refs behind it) and decode the
    /// target.
    pub fn deref<T: DeserializeOwned>(&self, ref_path: &str) -> Result<T, ResolveError> {
        let mut visited = HashSet::new();
        let mut current = ref_path.to_string();
        loop {
            if !visited.insert(current.clone()) {
                return Err(ResolveError::CircularRef(ref_path.to_string()));
            }
            let target = self.lookup(&current)?;
            match target.get("$ref").and_then(|r| r.as_str()) {
                Some(next) => current = next.to_string(),
                None => {
                    return serde_json::from_value(target.clone()).map_err(|source| {
                        ResolveError::Deserialize {
                            ref_path: ref_path.to_string(),
                            source,
                        }
                    });
                }
            }
        }
    }

    fn lookup(&self, ref_path: &str) -> Result<&serde_json::Value, ResolveError> {
        if !ref_path.starts_with('#') {
            return Err(ResolveError::InvalidRefFormat(ref_path.to_string()));
        }
        let mut node = &self.raw;
        for segment in pointer::parse(ref_path) {
            let next = match node {
                serde_json::Value::Object(map) => map.get(&segment),
                serde_json::Value::Array(items) => {
                    segment.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                _ => None,
            };
            node = next.ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))?;
        }
        Ok(node)
    }

    /// Decode a raw parameter list entry, following its `$ref` if it has one.
    pub fn resolve_parameter(&self, raw: &serde_json::Value) -> Result<Parameter, ResolveError> {
        match decode(raw)? {
            ParameterOrRef::Ref { ref_path } => self.deref(&ref_path),
            ParameterOrRef::Parameter(p) => Ok(p),
        }
    }

    pub fn resolve_request_body(
        &self,
        raw: &serde_json::Value,
    ) -> Result<RequestBody, ResolveError> {
        match decode(raw)? {
            RequestBodyOrRef::Ref { ref_path } => self.deref(&ref_path),
            RequestBodyOrRef::RequestBody(rb) => Ok(rb),
        }
    }

    pub fn resolve_response(&self, raw: &serde_json::Value) -> Result<Response, ResolveError> {
        match decode(raw)? {
            ResponseOrRef::Ref { ref_path } => self.deref(&ref_path),
            ResponseOrRef::Response(r) => Ok(r),
        }
    }

    /// A declared security scheme, with any `$ref` already followed.
    pub fn security_scheme(&self, name: &str) -> Option<&SecurityScheme> {
        self.security_schemes.get(name)
    }

    fn collect_security_schemes(&self) -> IndexMap<String, SecurityScheme> {
        let Some(components) = self.spec.components.as_ref() else {
            return IndexMap::new();
        };
        components
            .security_schemes
            .iter()
            .filter_map(|(name, raw)| {
                let resolved = decode(raw).and_then(|scheme| match scheme {
                    SecuritySchemeOrRef::SecurityScheme(s) => Ok(s),
                    SecuritySchemeOrRef::Ref { ref_path } => self.deref(&ref_path),
                });
                match resolved {
                    Ok(s) => Some((name.clone(), s)),
                    Err(e) => {
                        warn!("security scheme {name} could not be resolved: {e}");
                        None
                    }
                }
            })
            .collect()
    }
}

fn decode<T: DeserializeOwned>(raw: &serde_json::Value) -> Result<T, ResolveError> {
    serde_json::from_value(raw.clone()).map_err(ResolveError::Malformed)
}
