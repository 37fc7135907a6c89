//! YAML helpers shared by the registry backends.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use chainreg_protocols::RegistryError;

fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

/// Parse a YAML document into a JSON tree. Empty documents parse as `null`.
pub fn parse_yaml(text: &str) -> Result<Value, RegistryError> {
    if is_blank(text) {
        return Ok(Value::Null);
    }
    serde_yml::from_str(text).map_err(|e| RegistryError::Yaml(e.to_string()))
}

/// Parse a YAML document straight into `T`.
pub fn parse_yaml_as<T: DeserializeOwned>(text: &str) -> Result<T, RegistryError> {
    let value = parse_yaml(text)?;
    Ok(serde_json::from_value(value)?)
}

pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, RegistryError> {
    serde_yml::to_string(value).map_err(|e| RegistryError::Yaml(e.to_string()))
}

/// The comment block at the top of a document, if any.
pub fn leading_comments(text: &str) -> Option<String> {
    let header: Vec<&str> = text
        .lines()
        .take_while(|line| line.trim_start().starts_with('#'))
        .collect();
    if header.is_empty() {
        None
    } else {
        Some(header.join("\n"))
    }
}

/// Prefix `body` with a comment header.
pub fn with_header(header: &str, body: &str) -> String {
    format!("{}\n{}", header.trim_end(), body)
}
