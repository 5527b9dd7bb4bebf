use std::cell::{Cell, OnceCell};

use log::{debug, warn};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::menu::{GroupContext, MenuItem, MenuItemKind};
use super::parameter::{ParameterView, merge_params, sort_by_required};
use super::request_body::RequestBodyView;
use super::response::{ResponseView, classify_responses};
use super::security::{SecurityRequirementView, resolve_security};
use super::server::{NormalizedServer, normalize_servers, select_servers};
use crate::config::ViewOptions;
use crate::error::ViewError;
use crate::parse::ApiDocument;
use crate::parse::operation::{CodeSample, HttpMethod, OperationFragment};
use crate::parse::request_body::RequestBody;
use crate::parse::spec::ExternalDocs;
use crate::pointer;

const SUMMARY_FROM_DESCRIPTION_LEN: usize = 50;

/// Whether the menu currently highlights an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivationState {
    #[default]
    Inactive,
    Active,
}

/// An operation ready for display.
///
/// Cheap fields are derived when the view is built. Parameters, responses
/// and the request body are derived on first access and cached for the
/// lifetime of the view.
#[derive(Debug)]
pub struct OperationView<'a> {
    document: &'a ApiDocument,
    options: &'a ViewOptions,
    fragment: OperationFragment,

    id: String,
    pointer: String,
    name: String,
    depth: usize,
    servers: Vec<NormalizedServer>,
    security: Vec<SecurityRequirementView<'a>>,

    state: Cell<ActivationState>,

    request_body: OnceCell<Option<RequestBodyView>>,
    parameters: OnceCell<Vec<ParameterView>>,
    responses: OnceCell<Vec<ResponseView>>,
}

impl<'a> OperationView<'a> {
    pub fn new(
        document: &'a ApiDocument,
        fragment: OperationFragment,
        parent: Option<&GroupContext>,
        options: &'a ViewOptions,
    ) -> Result<Self, ViewError> {
        fragment.validate()?;

        let pointer = pointer::compile(["paths", fragment.path.as_str(), fragment.verb.as_str()]);
        let id = match (&fragment.operation.operation_id, parent) {
            (Some(operation_id), _) => format!("operation/{operation_id}"),
            (None, Some(parent)) => format!("{}{}", parent.id, pointer),
            (None, None) => pointer.clone(),
        };
        let name = operation_name(&fragment);
        let depth = parent.map_or(1, |p| p.depth + 1);

        let servers = normalize_servers(
            document.spec_url(),
            select_servers(
                fragment.operation.servers.as_deref(),
                fragment.path_servers.as_deref(),
                &document.spec().servers,
            ),
        );
        let security = resolve_security(document, fragment.operation.security.as_deref());

        Ok(Self {
            document,
            options,
            fragment,
            id,
            pointer,
            name,
            depth,
            servers,
            security,
            state: Cell::new(ActivationState::Inactive),
            request_body: OnceCell::new(),
            parameters: OnceCell::new(),
            responses: OnceCell::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.fragment.operation.operation_id.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.fragment.operation.description.as_deref()
    }

    pub fn external_docs(&self) -> Option<&ExternalDocs> {
        self.fragment.operation.external_docs.as_ref()
    }

    pub fn deprecated(&self) -> bool {
        self.fragment.operation.deprecated.unwrap_or(false)
    }

    pub fn verb(&self) -> HttpMethod {
        self.fragment.verb
    }

    pub fn path(&self) -> &str {
        &self.fragment.path
    }

    pub fn tags(&self) -> &[String] {
        &self.fragment.operation.tags
    }

    pub fn code_samples(&self) -> &[CodeSample] {
        self.fragment.code_samples()
    }

    pub fn servers(&self) -> &[NormalizedServer] {
        &self.servers
    }

    pub fn security(&self) -> &[SecurityRequirementView<'a>] {
        &self.security
    }

    pub fn state(&self) -> ActivationState {
        self.state.get()
    }

    pub fn activate(&self) {
        self.state.set(ActivationState::Active);
    }

    pub fn deactivate(&self) {
        self.state.set(ActivationState::Inactive);
    }

    pub fn is_active(&self) -> bool {
        self.state.get() == ActivationState::Active
    }

    /// `None` iff the operation declares no request body.
    pub fn request_body(&self) -> Option<&RequestBodyView> {
        self.request_body
            .get_or_init(|| {
                let body = self.fragment.operation.request_body.as_ref()?;
                debug!("resolving request body for {}", self.id);
                let body = self
                    .document
                    .resolve_request_body(body)
                    .unwrap_or_else(|e| {
                        warn!("request body of {} could not be resolved: {e}", self.id);
                        RequestBody::default()
                    });
                Some(RequestBodyView::new(body))
            })
            .as_ref()
    }

    /// Path-level and operation-level parameters, merged.
    pub fn parameters(&self) -> &[ParameterView] {
        self.parameters.get_or_init(|| {
            debug!("merging parameters for {}", self.id);
            let mut params: Vec<ParameterView> = merge_params(
                self.document,
                &self.fragment.path_parameters,
                &self.fragment.operation.parameters,
            )
            .into_iter()
            .map(|p| ParameterView::new(p, &self.pointer))
            .collect();
            if self.options.required_props_first {
                sort_by_required(&mut params);
            }
            params
        })
    }

    /// Responses keyed by a valid status code or `default`, in declaration order.
    pub fn responses(&self) -> &[ResponseView] {
        self.responses.get_or_init(|| {
            debug!("classifying responses for {}", self.id);
            classify_responses(
                self.document,
                &self.fragment.operation.responses,
                self.options,
            )
        })
    }
}

/// Display name: the summary, else the operation id, else the start of the
/// description, else the path.
fn operation_name(fragment: &OperationFragment) -> String {
    let op = &fragment.operation;
    let non_empty = |s: &Option<String>| s.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

    non_empty(&op.summary)
        .or_else(|| non_empty(&op.operation_id))
        .or_else(|| {
            non_empty(&op.description)
                .map(|d| d.chars().take(SUMMARY_FROM_DESCRIPTION_LEN).collect())
        })
        .or_else(|| Some(fragment.path.clone()).filter(|p| !p.is_empty()))
        .unwrap_or_else(|| "<no summary>".to_string())
}

impl MenuItem for OperationView<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn kind(&self) -> MenuItemKind {
        MenuItemKind::Operation
    }

    fn is_active(&self) -> bool {
        OperationView::is_active(self)
    }

    fn activate(&self) {
        OperationView::activate(self)
    }

    fn deactivate(&self) {
        OperationView::deactivate(self)
    }
}

impl Serialize for OperationView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("OperationView", 14)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("verb", &self.verb())?;
        s.serialize_field("path", self.path())?;
        s.serialize_field("pointer", &self.pointer)?;
        s.serialize_field("operation_id", &self.operation_id())?;
        s.serialize_field("description", &self.description())?;
        s.serialize_field("deprecated", &self.deprecated())?;
        s.serialize_field("external_docs", &self.external_docs())?;
        s.serialize_field("servers", &self.servers)?;
        s.serialize_field("security", &self.security)?;
        s.serialize_field("request_body", &self.request_body())?;
        s.serialize_field("parameters", self.parameters())?;
        s.serialize_field("responses", self.responses())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parameter::ParameterLocation;
    use serde_json::json;

    fn document() -> ApiDocument {
        ApiDocument::from_value(json!({
            "openapi": "3.0.3",
            "info": { "title": "Pets", "version": "1" },
            "servers": [{ "url": "/v1" }],
            "paths": {}
        }))
        .unwrap()
        .with_spec_url("https://pets.example.com/docs/openapi.json")
        .unwrap()
    }

    fn fragment(value: serde_json::Value) -> OperationFragment {
        OperationFragment::from_value(value).unwrap()
    }

    #[test]
    fn test_id_from_operation_id() {
        let doc = document();
        let options = ViewOptions::default();
        let parent = GroupContext::new("tag/pets", 1);
        let view = OperationView::new(
            &doc,
            fragment(json!({ "pathName": "/pets", "httpVerb": "get", "operationId": "listPets" })),
            Some(&parent),
            &options,
        )
        .unwrap();
        assert_eq!(view.id(), "operation/listPets");
        assert_eq!(view.pointer(), "/paths/~1pets/get");
        assert_eq!(view.depth, 2);
    }

    #[test]
    fn test_id_from_parent_and_pointer() {
        let doc = document();
        let options = ViewOptions::default();
        let parent = GroupContext::new("tag/pets", 1);
        let frag = fragment(json!({ "pathName": "/pets/{id}", "httpVerb": "delete" }));

        let with_parent = OperationView::new(&doc, frag.clone(), Some(&parent), &options).unwrap();
        assert_eq!(with_parent.id(), "tag/pets/paths/~1pets~1{id}/delete");

        let orphan = OperationView::new(&doc, frag, None, &options).unwrap();
        assert_eq!(orphan.id(), "/paths/~1pets~1{id}/delete");
        assert_eq!(orphan.depth, 1);
    }

    #[test]
    fn test_name_fallbacks() {
        let name = |value| operation_name(&fragment(value));
        assert_eq!(
            name(json!({ "pathName": "/a", "httpVerb": "get", "summary": "Sum", "operationId": "op" })),
            "Sum"
        );
        assert_eq!(
            name(json!({ "pathName": "/a", "httpVerb": "get", "summary": "", "operationId": "op" })),
            "op"
        );
        let long = "x".repeat(80);
        assert_eq!(
            name(json!({ "pathName": "/a", "httpVerb": "get", "description": long })),
            "x".repeat(50)
        );
        assert_eq!(name(json!({ "pathName": "/a", "httpVerb": "get" })), "/a");
    }

    #[test]
    fn test_activation() {
        let doc = document();
        let options = ViewOptions::default();
        let view = OperationView::new(
            &doc,
            fragment(json!({ "pathName": "/pets", "httpVerb": "get" })),
            None,
            &options,
        )
        .unwrap();
        assert_eq!(view.state(), ActivationState::Inactive);
        view.deactivate();
        assert!(!view.is_active());
        view.activate();
        view.activate();
        assert!(view.is_active());
        view.deactivate();
        assert_eq!(view.state(), ActivationState::Inactive);
    }

    #[test]
    fn test_servers_fallback_chain() {
        let doc = document();
        let options = ViewOptions::default();
        let from_doc = OperationView::new(
            &doc,
            fragment(json!({ "pathName": "/pets", "httpVerb": "get" })),
            None,
            &options,
        )
        .unwrap();
        assert_eq!(from_doc.servers()[0].url, "https://pets.example.com/v1");

        let from_path = OperationView::new(
            &doc,
            fragment(json!({
                "pathName": "/pets",
                "httpVerb": "get",
                "pathServers": [{ "url": "https://path.example.com" }]
            })),
            None,
            &options,
        )
        .unwrap();
        assert_eq!(from_path.servers()[0].url, "https://path.example.com");

        let from_op = OperationView::new(
            &doc,
            fragment(json!({
                "pathName": "/pets",
                "httpVerb": "get",
                "pathServers": [{ "url": "https://path.example.com" }],
                "servers": [{ "url": "beta", "description": "Beta" }]
            })),
            None,
            &options,
        )
        .unwrap();
        assert_eq!(from_op.servers().len(), 1);
        assert_eq!(from_op.servers()[0].url, "https://pets.example.com/docs/beta");
        assert_eq!(from_op.servers()[0].description, "Beta");
    }

    #[test]
    fn test_missing_request_body() {
        let doc = document();
        let options = ViewOptions::default();
        let view = OperationView::new(
            &doc,
            fragment(json!({ "pathName": "/pets", "httpVerb": "get" })),
            None,
            &options,
        )
        .unwrap();
        assert!(view.request_body().is_none());
        assert!(view.parameters().is_empty());
        assert!(view.responses().is_empty());
    }

    #[test]
    fn test_unresolvable_request_body_is_empty() {
        let doc = document();
        let options = ViewOptions::default();
        let view = OperationView::new(
            &doc,
            fragment(json!({
                "pathName": "/pets",
                "httpVerb": "post",
                "requestBody": { "$ref": "#/components/requestBodies/Missing" }
            })),
            None,
            &options,
        )
        .unwrap();
        let body = view.request_body().unwrap();
        assert!(body.content.is_empty());
        assert!(!body.required);
    }

    #[test]
    fn test_unresolvable_parameter_ref_is_kept() {
        let doc = document();
        let options = ViewOptions::default();
        let view = OperationView::new(
            &doc,
            fragment(json!({
                "pathName": "/pets",
                "httpVerb": "get",
                "parameters": [{ "$ref": "#/components/parameters/Missing" }]
            })),
            None,
            &options,
        )
        .unwrap();
        let params = view.parameters();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "Missing");
        assert_eq!(params[0].location, ParameterLocation::Unknown);
        assert_eq!(params[0].description, "");
    }

    #[test]
    fn test_malformed_parameters_do_not_fail_the_view() {
        let doc = document();
        let options = ViewOptions::default();
        let view = OperationView::new(
            &doc,
            fragment(json!({
                "pathName": "/pets",
                "httpVerb": "post",
                "pathParameters": [{ "name": "x" }],
                "parameters": [{ "name": "payload", "in": "body" }]
            })),
            None,
            &options,
        )
        .unwrap();
        let names: Vec<&str> = view.parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "payload"]);
    }

    #[test]
    fn test_menu_item_capabilities() {
        let doc = document();
        let options = ViewOptions::default();
        let view = OperationView::new(
            &doc,
            fragment(json!({ "pathName": "/pets", "httpVerb": "get", "summary": "List" })),
            None,
            &options,
        )
        .unwrap();
        let item: &dyn MenuItem = &view;
        assert_eq!(item.kind(), MenuItemKind::Operation);
        assert_eq!(item.name(), "List");
        assert!(item.items().is_empty());
        item.activate();
        assert!(view.is_active());
    }
}
