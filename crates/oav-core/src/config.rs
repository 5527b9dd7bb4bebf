use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};

/// Top-level project configuration loaded from `.oav.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OavConfig {
    pub input: String,
    /// URL the document is served from; relative server URLs resolve against it.
    pub spec_url: Option<String>,
    pub options: ViewOptions,
}

impl Default for OavConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            spec_url: None,
            options: ViewOptions::default(),
        }
    }
}

/// Options that change how operation views are derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Move required parameters ahead of optional ones.
    pub required_props_first: bool,
    pub expand_responses: ExpandResponses,
}

/// Which responses start out expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExpandResponses {
    #[default]
    None,
    All,
    Codes(Vec<String>),
}

impl ExpandResponses {
    /// Parse `"all"` or a comma-separated list of codes such as `"200,201"`.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == "all" {
            return ExpandResponses::All;
        }
        let codes: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if codes.is_empty() {
            ExpandResponses::None
        } else {
            ExpandResponses::Codes(codes)
        }
    }

    pub fn is_expanded(&self, code: &str) -> bool {
        match self {
            ExpandResponses::None => false,
            ExpandResponses::All => true,
            ExpandResponses::Codes(codes) => codes.iter().any(|c| c == code),
        }
    }
}

impl<'de> Deserialize<'de> for ExpandResponses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| ExpandResponses::parse(&s)).unwrap_or_default())
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oav.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OavConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: OavConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oav configuration
input: openapi.yaml
# spec_url: https://api.example.com/docs/openapi.yaml

options:
  required_props_first: false
  expand_responses: ""      # "all" or a comma-separated list, e.g. "200,201"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OavConfig::default();
        assert_eq!(config.input, "openapi.yaml");
        assert!(config.spec_url.is_none());
        assert!(!config.options.required_props_first);
        assert_eq!(config.options.expand_responses, ExpandResponses::None);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: spec.yaml
spec_url: https://example.com/docs/openapi.yaml
options:
  required_props_first: true
  expand_responses: "200, 201"
"#;
        let config: OavConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "spec.yaml");
        assert_eq!(
            config.spec_url.as_deref(),
            Some("https://example.com/docs/openapi.yaml")
        );
        assert!(config.options.required_props_first);
        assert_eq!(
            config.options.expand_responses,
            ExpandResponses::Codes(vec!["200".to_string(), "201".to_string()])
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.yaml\n";
        let config: OavConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.yaml");
        assert_eq!(config.options, ViewOptions::default());
    }

    #[test]
    fn test_default_content_parses() {
        let config: OavConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.input, "openapi.yaml");
        assert_eq!(config.options.expand_responses, ExpandResponses::None);
    }

    #[test]
    fn test_expand_responses() {
        assert!(ExpandResponses::parse("all").is_expanded("404"));
        assert!(ExpandResponses::parse("200,404").is_expanded("404"));
        assert!(!ExpandResponses::parse("200").is_expanded("404"));
        assert!(!ExpandResponses::parse("").is_expanded("200"));
    }

    #[test]
    fn test_load_missing_config() {
        let result = load_config(Path::new("/nonexistent/.oav.yaml")).unwrap();
        assert!(result.is_none());
    }
}
