use indexmap::IndexMap;
use log::warn;
use serde::Serialize;

use crate::config::ViewOptions;
use crate::parse::ApiDocument;
use crate::parse::media_type::MediaType;
use crate::parse::response::Response;

/// The five numeric ranges HTTP status codes fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFamily {
    Informational,
    Success,
    Redirect,
    ClientError,
    ServerError,
}

/// How a response is presented. Client and server errors collapse into one
/// kind, and `default` takes a kind depending on its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Info,
    Success,
    Redirect,
    Error,
}

impl From<StatusFamily> for ResponseKind {
    fn from(family: StatusFamily) -> Self {
        match family {
            StatusFamily::Informational => ResponseKind::Info,
            StatusFamily::Success => ResponseKind::Success,
            StatusFamily::Redirect => ResponseKind::Redirect,
            StatusFamily::ClientError | StatusFamily::ServerError => ResponseKind::Error,
        }
    }
}

/// `true` for `default`, a three-digit code in `100..=599`, or a range such
/// as `2XX`.
pub fn is_status_code(code: &str) -> bool {
    code == "default" || status_family(code).is_some()
}

/// Family of a status code or range. `None` for `default` and for anything
/// that is not a status code at all.
pub fn status_family(code: &str) -> Option<StatusFamily> {
    let bytes = code.as_bytes();
    if bytes.len() != 3 {
        return None;
    }
    let is_range = bytes[1..].iter().all(|b| b.eq_ignore_ascii_case(&b'x'));
    let is_numeric = bytes[1..].iter().all(u8::is_ascii_digit);
    if !is_range && !is_numeric {
        return None;
    }
    match bytes[0] {
        b'1' => Some(StatusFamily::Informational),
        b'2' => Some(StatusFamily::Success),
        b'3' => Some(StatusFamily::Redirect),
        b'4' => Some(StatusFamily::ClientError),
        b'5' => Some(StatusFamily::ServerError),
        _ => None,
    }
}

/// A classified, resolved response.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseView {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<StatusFamily>,
    /// Whether the operation declares any success response at all.
    pub has_success: bool,
    pub kind: ResponseKind,
    pub expanded: bool,
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

impl ResponseView {
    pub fn new(code: &str, has_success: bool, response: Response, options: &ViewOptions) -> Self {
        let family = status_family(code);
        let kind = match family {
            Some(family) => family.into(),
            None if has_success => ResponseKind::Success,
            None => ResponseKind::Error,
        };
        let (summary, description) = match response.summary {
            Some(summary) => (summary, response.description),
            None => (response.description, String::new()),
        };
        Self {
            code: code.to_string(),
            family,
            has_success,
            kind,
            expanded: options.expand_responses.is_expanded(code),
            summary,
            description,
            headers: response.headers.into_keys().collect(),
            content: response.content,
        }
    }
}

/// Keep only real status codes (and `default`), in declaration order, and
/// resolve each response. Other keys are dropped without complaint.
pub fn classify_responses(
    document: &ApiDocument,
    responses: &IndexMap<String, serde_json::Value>,
    options: &ViewOptions,
) -> Vec<ResponseView> {
    let retained: Vec<(&String, &serde_json::Value)> = responses
        .iter()
        .filter(|(code, _)| is_status_code(code))
        .collect();
    let has_success = retained
        .iter()
        .any(|(code, _)| status_family(code) == Some(StatusFamily::Success));

    retained
        .into_iter()
        .map(|(code, raw)| {
            let response = resolve(document, code, raw);
            ResponseView::new(code, has_success, response, options)
        })
        .collect()
}

fn resolve(document: &ApiDocument, code: &str, raw: &serde_json::Value) -> Response {
    match document.resolve_response(raw) {
        Ok(response) => response,
        Err(e) => {
            warn!("response {code} could not be resolved: {e}");
            Response::default()
        }
    }
}
