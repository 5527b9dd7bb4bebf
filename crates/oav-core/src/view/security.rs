use log::warn;
use serde::Serialize;

use crate::parse::ApiDocument;
use crate::parse::security::{SecurityRequirement, SecurityScheme};

/// Prefix of the section each scheme is documented under.
pub const SECURITY_SCHEMES_SECTION_PREFIX: &str = "section/Authentication/";

/// One scheme referenced by a requirement, joined with its declaration.
#[derive(Debug, Clone, Serialize)]
pub struct SecuritySchemeView<'a> {
    pub id: String,
    pub section_id: String,
    pub scopes: Vec<String>,
    /// `None` when the document never declares a scheme by this name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<&'a SecurityScheme>,
}

/// A security requirement: every listed scheme must be satisfied together.
/// An empty requirement (`{}`) means anonymous access is allowed.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityRequirementView<'a> {
    pub schemes: Vec<SecuritySchemeView<'a>>,
}

impl<'a> SecurityRequirementView<'a> {
    pub fn new(requirement: &SecurityRequirement, document: &'a ApiDocument) -> Self {
        let schemes = requirement
            .iter()
            .map(|(id, scopes)| {
                let scheme = document.security_scheme(id);
                if scheme.is_none() {
                    warn!("non existing security scheme referenced: {id}");
                }
                SecuritySchemeView {
                    id: id.clone(),
                    section_id: format!("{SECURITY_SCHEMES_SECTION_PREFIX}{id}"),
                    scopes: scopes.clone(),
                    scheme,
                }
            })
            .collect();
        Self { schemes }
    }
}

/// Resolve the requirements that apply to an operation.
///
/// The operation's own list replaces the document's whenever it is present,
/// even if it is empty: `security: []` turns authentication off.
pub fn resolve_security<'a>(
    document: &'a ApiDocument,
    operation_security: Option<&[SecurityRequirement]>,
) -> Vec<SecurityRequirementView<'a>> {
    let requirements = operation_security
        .or(document.spec().security.as_deref())
        .unwrap_or_default();
    requirements
        .iter()
        .map(|requirement| SecurityRequirementView::new(requirement, document))
        .collect()
}
