//! Exchange configuration.

use std::num::NonZeroUsize;
use std::str::FromStr;

use displaydoc::Display;
use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use schemars::schema::RootSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// could not deserialize configuration: {0}
    DeserializeConfigError(#[from] serde_yaml::Error),
}

/// The configuration of a [`ScalarExchange`](crate::ScalarExchange).
///
/// Can be created through `serde::Deserialize` from various formats, YAML
/// through [`FromStr`], or inline in Rust code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Caching of the scalar paths resolved for each query.
    #[serde(default)]
    pub cache: Cache,
}

/// Scalar paths cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Cache {
    /// Keep the scalar paths of recent queries instead of resolving them for
    /// every response.
    /// enabled by default
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Number of queries to keep.
    /// Defaults to 512
    #[serde(default = "default_cache_limit")]
    pub limit: NonZeroUsize,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_limit() -> NonZeroUsize {
    NonZeroUsize::new(512).unwrap_or(NonZeroUsize::MIN)
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            limit: default_cache_limit(),
        }
    }
}

impl Configuration {
    /// Parses a YAML configuration. An empty document is the default configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigurationError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let configuration: Self = serde_yaml::from_str(yaml)?;
        if !configuration.cache.enabled && configuration.cache.limit != default_cache_limit() {
            tracing::warn!(
                limit = configuration.cache.limit.get(),
                "scalar paths cache limit is set but the cache is disabled"
            );
        }
        Ok(configuration)
    }
}

impl FromStr for Configuration {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yaml(s)
    }
}

/// JSON schema of the configuration, for editor support and validation.
pub fn generate_config_schema() -> RootSchema {
    let settings = SchemaSettings::draft07().with(|s| {
        s.option_nullable = true;
        s.option_add_null_type = false;
        s.inline_subschemas = true;
    });
    settings.into_generator().into_root_schema_for::<Configuration>()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults() {
        let configuration = Configuration::from_yaml("").unwrap();
        assert_eq!(configuration, Configuration::default());
        assert!(configuration.cache.enabled);
        assert_eq!(configuration.cache.limit.get(), 512);

        let configuration: Configuration = "cache: {}".parse().unwrap();
        assert_eq!(configuration, Configuration::default());
    }

    #[test]
    fn reads_yaml() {
        let configuration = Configuration::from_yaml(
            r#"
cache:
  enabled: false
  limit: 10
"#,
        )
        .unwrap();
        assert!(!configuration.cache.enabled);
        assert_eq!(configuration.cache.limit.get(), 10);
    }

    #[test]
    fn rejects_unknown_fields_and_zero_limit() {
        assert!(matches!(
            Configuration::from_yaml("caching: {}"),
            Err(ConfigurationError::DeserializeConfigError(_))
        ));
        assert!(Configuration::from_yaml("cache: { size: 3 }").is_err());
        assert!(Configuration::from_yaml("cache: { limit: 0 }").is_err());
    }

    #[test]
    fn schema_lists_every_option() {
        let schema = generate_config_schema();
        let root = schema.schema.object.as_ref().unwrap();
        assert!(root.properties.contains_key("cache"));

        let text = serde_json::to_string(&schema).unwrap();
        assert!(text.contains(r#""enabled""#));
        assert!(text.contains(r#""limit""#));
        assert!(text.contains(r#""additionalProperties":false"#));
    }
}
