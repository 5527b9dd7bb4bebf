use indexmap::IndexMap;
use serde::Serialize;
use url::{Position, Url};

use crate::parse::server::{Server, ServerVariable};

/// A server whose URL has been made absolute against the document location.
/// `{variable}` placeholders are left for the renderer to substitute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedServer {
    pub url: String,
    pub description: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

/// Pick the most specific server list: the operation's own, then the path
/// item's, then the document's. A more specific list replaces the others.
pub fn select_servers<'s>(
    operation: Option<&'s [Server]>,
    path_item: Option<&'s [Server]>,
    document: &'s [Server],
) -> &'s [Server] {
    operation.or(path_item).unwrap_or(document)
}

/// Resolve every server URL against the directory of `spec_url`. An empty
/// list yields a single server at `/`.
pub fn normalize_servers(spec_url: Option<&Url>, servers: &[Server]) -> Vec<NormalizedServer> {
    let base = spec_url.map(base_dir).unwrap_or_default();
    let root = [Server::new("/")];
    let servers = if servers.is_empty() { &root[..] } else { servers };

    servers
        .iter()
        .map(|server| NormalizedServer {
            url: resolve_url(&base, &server.url),
            description: server.description.clone().unwrap_or_default(),
            variables: server.variables.clone(),
        })
        .collect()
}

/// Directory part of a document URL, without query, fragment or trailing slash.
fn base_dir(spec_url: &Url) -> String {
    let mut url = spec_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    let s = url.as_str();
    match s.rfind('/') {
        Some(idx) if idx >= url[..Position::BeforePath].len() => s[..idx].to_string(),
        _ => s.to_string(),
    }
}

/// Resolve `to` against `base`.
///
/// Joined as strings rather than with `Url::join`, which would percent-encode
/// `{variable}` placeholders; `.` and `..` segments are collapsed by hand.
pub fn resolve_url(base: &str, to: &str) -> String {
    if base.is_empty() {
        return strip_trailing_slash(to);
    }
    let parsed_base = Url::parse(base).ok();

    let resolved = if let Some(rest) = to.strip_prefix("//") {
        let scheme = parsed_base.as_ref().map(|u| u.scheme()).unwrap_or("https");
        format!("{scheme}://{rest}")
    } else if is_absolute_url(to) {
        to.to_string()
    } else {
        match parsed_base {
            Some(ref u) => {
                let path = if to.starts_with('/') {
                    to.to_string()
                } else {
                    format!("{}/{}", u.path().trim_end_matches('/'), to)
                };
                format!("{}{}", &u[..Position::BeforePath], remove_dot_segments(&path))
            }
            None if to.starts_with('/') => to.to_string(),
            None => format!("{}/{}", base.trim_end_matches('/'), to),
        }
    };
    strip_trailing_slash(&resolved)
}

/// RFC 3986 dot-segment removal for an absolute path. `..` never climbs
/// above the root.
fn remove_dot_segments(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "." => {}
            ".." => {
                if out.len() > 1 {
                    out.pop();
                }
            }
            s => out.push(s),
        }
    }
    if out.len() == 1 {
        return "/".to_string();
    }
    out.join("/")
}

/// `scheme:` prefix per RFC 3986, or a templated scheme such as `{proto}://`.
fn is_absolute_url(url: &str) -> bool {
    if url.contains("://") {
        return true;
    }
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn strip_trailing_slash(url: &str) -> String {
    match url.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => url.to_string(),
    }
}
