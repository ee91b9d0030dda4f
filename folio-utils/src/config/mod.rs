//! Configuration loading and merging
//!
//! Documents are read as TOML, JSON or YAML depending on the file
//! extension, then deserialised into the caller's type. Layering is done
//! through `serde_json::Value`: the override document replaces scalars and
//! arrays and merges tables key by key.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{DocumentFormat, UtilError};

/// Parse a document of the given format into an untyped JSON value
pub fn parse_document(content: &str, format: DocumentFormat) -> crate::Result<serde_json::Value> {
    match format {
        DocumentFormat::Toml => {
            let toml_value: toml::Value = toml::from_str(content)
                .map_err(|e| UtilError::Config(format!("TOML parse error: {}", e)))?;
            serde_json::to_value(toml_value)
                .map_err(|e| UtilError::Config(format!("TOML conversion error: {}", e)))
        }
        DocumentFormat::Json => serde_json::from_str(content)
            .map_err(|e| UtilError::Config(format!("JSON parse error: {}", e))),
        DocumentFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| UtilError::Config(format!("YAML parse error: {}", e))),
    }
}

/// Deserialize a document held in memory
pub fn from_str<T>(content: &str, format: DocumentFormat) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    match format {
        DocumentFormat::Toml => toml::from_str(content)
            .map_err(|e| UtilError::Config(format!("TOML deserialization error: {}", e))),
        DocumentFormat::Json => serde_json::from_str(content)
            .map_err(|e| UtilError::Config(format!("JSON parse error: {}", e))),
        DocumentFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| UtilError::Config(format!("YAML parse error: {}", e))),
    }
}

/// Load configuration from file (format chosen by extension)
pub fn load_config<T>(path: &Path) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let format = DocumentFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    from_str(&content, format)
}

/// Merge two JSON values (second overrides first)
fn merge_json_values(base: &mut serde_json::Value, override_value: serde_json::Value) {
    match (base, override_value) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(override_obj)) => {
            for (key, value) in override_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, override_value) => {
            *base_value = override_value;
        }
    }
}

/// Merge two configurations (second overrides first)
pub fn merge_configs<T>(base: &mut T, override_config: T) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let override_value = serde_json::to_value(override_config)
        .map_err(|e| UtilError::Serialization(format!("Override serialization error: {}", e)))?;
    merge_value(base, override_value)
}

/// Merge a partial, untyped document over a typed configuration
fn merge_value<T>(base: &mut T, override_value: serde_json::Value) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let mut base_value = serde_json::to_value(&*base)
        .map_err(|e| UtilError::Serialization(format!("Base serialization error: {}", e)))?;

    merge_json_values(&mut base_value, override_value);

    *base = serde_json::from_value(base_value)
        .map_err(|e| UtilError::Serialization(format!("Result deserialization error: {}", e)))?;

    Ok(())
}

/// Check that a configuration survives a serialisation round through JSON
pub fn validate_config<T>(config: &T) -> crate::Result<()>
where
    T: Serialize,
{
    serde_json::to_value(config)
        .map(|_| ())
        .map_err(|e| UtilError::Config(format!("Config validation error: {}", e)))
}

/// Configuration builder: defaults first, then files and overrides on top
#[derive(Debug)]
pub struct ConfigBuilder<T> {
    config: T,
}

impl<T> ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    /// Create new config builder with defaults
    pub fn new() -> Self {
        Self {
            config: T::default(),
        }
    }

    /// Load from file and merge.
    ///
    /// The file may be partial: keys it omits keep their current values.
    pub fn load_file(mut self, path: &Path) -> crate::Result<Self> {
        let format = DocumentFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let file_value = parse_document(&content, format)?;
        merge_value(&mut self.config, file_value)?;
        Ok(self)
    }

    /// Load from file when a path is given
    pub fn load_optional(self, path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => self.load_file(path),
            None => Ok(self),
        }
    }

    /// Merge with another config
    pub fn merge(mut self, other: T) -> crate::Result<Self> {
        merge_configs(&mut self.config, other)?;
        Ok(self)
    }

    /// Validate and build final config
    pub fn build(self) -> crate::Result<T> {
        validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl<T> Default for ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestConfig {
        name: String,
        frame_ms: u64,
        enabled: bool,
        items: Vec<String>,
        nested: Nested,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Nested {
        level: String,
        file: Option<String>,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                name: "default".to_string(),
                frame_ms: 16,
                enabled: true,
                items: vec!["a".to_string()],
                nested: Nested {
                    level: "info".to_string(),
                    file: None,
                },
            }
        }
    }

    #[test]
    fn test_load_toml() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("test.toml");

        std::fs::write(
            &config_path,
            r#"
name = "test"
frame_ms = 33
enabled = false
items = ["x", "y", "z"]

[nested]
level = "debug"
            "#,
        )?;

        let config: TestConfig = load_config(&config_path)?;

        assert_eq!(config.name, "test");
        assert_eq!(config.frame_ms, 33);
        assert!(!config.enabled);
        assert_eq!(config.items, vec!["x", "y", "z"]);
        assert_eq!(config.nested.level, "debug");

        Ok(())
    }

    #[test]
    fn test_load_unsupported_extension() {
        let result: crate::Result<TestConfig> = load_config(Path::new("settings.ini"));
        assert!(matches!(result, Err(UtilError::Config(_))));
    }

    #[test]
    fn test_merge_configs() -> crate::Result<()> {
        let mut base = TestConfig::default();

        let override_config = TestConfig {
            name: "override".to_string(),
            frame_ms: 8,
            enabled: false,
            items: vec!["x".to_string(), "y".to_string()],
            nested: Nested {
                level: "warn".to_string(),
                file: Some("folio.log".to_string()),
            },
        };

        merge_configs(&mut base, override_config)?;

        assert_eq!(base.name, "override");
        assert_eq!(base.frame_ms, 8);
        assert!(!base.enabled);
        assert_eq!(base.items, vec!["x", "y"]);
        assert_eq!(base.nested.file.as_deref(), Some("folio.log"));

        Ok(())
    }

    #[test]
    fn test_builder_partial_yaml_keeps_defaults() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("partial.yaml");

        std::fs::write(
            &config_path,
            r#"
frame_ms: 50
nested:
  file: trace.log
            "#,
        )?;

        let config: TestConfig = ConfigBuilder::new().load_file(&config_path)?.build()?;

        assert_eq!(config.frame_ms, 50);
        assert_eq!(config.name, "default");
        assert!(config.enabled);
        assert_eq!(config.nested.level, "info");
        assert_eq!(config.nested.file.as_deref(), Some("trace.log"));

        Ok(())
    }

    #[test]
    fn test_builder_without_file() -> crate::Result<()> {
        let config: TestConfig = ConfigBuilder::new().load_optional(None)?.build()?;
        assert_eq!(config, TestConfig::default());
        Ok(())
    }

    #[test]
    fn test_parse_json_document() -> crate::Result<()> {
        let value = parse_document(r#"{"a": {"b": 1}}"#, DocumentFormat::Json)?;
        assert_eq!(value["a"]["b"], 1);
        Ok(())
    }

    #[test]
    fn test_merge_json_values_nested() {
        let mut base = serde_json::json!({"scroll": {"lookahead": 2, "smooth_ms": 300}});
        merge_json_values(&mut base, serde_json::json!({"scroll": {"lookahead": 5}}));
        assert_eq!(base["scroll"]["lookahead"], 5);
        assert_eq!(base["scroll"]["smooth_ms"], 300);
    }
}
