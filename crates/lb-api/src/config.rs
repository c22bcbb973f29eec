//! Cloud credential resolution.
//!
//! A cloud is either the `envvars` profile, built from `OS_*` environment
//! variables, or a named entry in a `clouds.yaml` file.

use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Profile name that resolves credentials from `OS_*` environment variables
pub const DEFAULT_CLOUD: &str = "envvars";

const CLOUDS_YAML: &str = "clouds.yaml";
const DEFAULT_INTERFACE: &str = "public";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No clouds.yaml found (searched: {0})")]
    CloudsFileNotFound(String),

    #[error("Cloud '{0}' not found in clouds.yaml")]
    CloudNotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// The `auth` section of a cloud
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AuthConfig {
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, alias = "tenant_id")]
    pub project_id: Option<String>,
    #[serde(default, alias = "tenant_name")]
    pub project_name: Option<String>,
    #[serde(default)]
    pub user_domain_name: Option<String>,
    #[serde(default)]
    pub user_domain_id: Option<String>,
    #[serde(default)]
    pub project_domain_name: Option<String>,
    #[serde(default)]
    pub project_domain_id: Option<String>,
    #[serde(default)]
    pub application_credential_id: Option<String>,
    #[serde(default)]
    pub application_credential_secret: Option<String>,
}

impl AuthConfig {
    fn has_application_credential(&self) -> bool {
        self.application_credential_id.is_some() || self.application_credential_secret.is_some()
    }
}

/// Keystone authentication method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthType {
    #[default]
    Password,
    ApplicationCredential,
}

impl AuthType {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "password" | "v3password" => Ok(AuthType::Password),
            "v3applicationcredential" | "applicationcredential" => {
                Ok(AuthType::ApplicationCredential)
            }
            other => Err(ConfigError::InvalidValue {
                field: "auth_type".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// One entry under `clouds:` in clouds.yaml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudEntry {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub auth_type: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub verify: Option<bool>,
    #[serde(default)]
    pub cacert: Option<String>,
    #[serde(default)]
    pub load_balancer_endpoint_override: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CloudsFile {
    #[serde(default)]
    clouds: HashMap<String, CloudEntry>,
}

/// Fully resolved connection settings for one cloud
#[derive(Debug, Clone, PartialEq)]
pub struct CloudConfig {
    pub name: String,
    pub auth: AuthConfig,
    pub auth_type: AuthType,
    pub region_name: Option<String>,
    pub interface: String,
    pub verify: bool,
    pub cacert: Option<PathBuf>,
    pub endpoint_override: Option<String>,
}

impl CloudConfig {
    /// Resolve a cloud by name, `envvars` meaning the process environment.
    pub fn load(cloud: &str) -> Result<Self> {
        if cloud == DEFAULT_CLOUD {
            debug!("Resolving credentials from OS_* environment variables");
            return Self::from_env();
        }

        let path = find_clouds_yaml()?;
        debug!("Resolving cloud '{}' from {}", cloud, path.display());
        Self::from_clouds_file(&path, cloud)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_env_lookup(|key| std::env::var(key).ok())
    }

    /// Build the `envvars` cloud from any variable lookup.
    pub fn from_env_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let first = |keys: &[&str]| keys.iter().find_map(|&key| var(key));

        let auth = AuthConfig {
            auth_url: var("OS_AUTH_URL"),
            username: var("OS_USERNAME"),
            user_id: var("OS_USER_ID"),
            password: var("OS_PASSWORD"),
            project_id: first(&["OS_PROJECT_ID", "OS_TENANT_ID"]),
            project_name: first(&["OS_PROJECT_NAME", "OS_TENANT_NAME"]),
            user_domain_name: var("OS_USER_DOMAIN_NAME"),
            user_domain_id: var("OS_USER_DOMAIN_ID"),
            project_domain_name: var("OS_PROJECT_DOMAIN_NAME"),
            project_domain_id: var("OS_PROJECT_DOMAIN_ID"),
            application_credential_id: var("OS_APPLICATION_CREDENTIAL_ID"),
            application_credential_secret: var("OS_APPLICATION_CREDENTIAL_SECRET"),
        };

        let insecure = match var("OS_INSECURE") {
            Some(value) => parse_bool("OS_INSECURE", &value)?,
            None => false,
        };

        let entry = CloudEntry {
            auth,
            auth_type: var("OS_AUTH_TYPE"),
            region_name: var("OS_REGION_NAME"),
            interface: first(&["OS_INTERFACE", "OS_ENDPOINT_TYPE"]),
            verify: Some(!insecure),
            cacert: var("OS_CACERT"),
            load_balancer_endpoint_override: None,
        };

        Self::from_entry(DEFAULT_CLOUD, entry)
    }

    pub fn from_clouds_file(path: &Path, cloud: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_clouds_yaml(&content, cloud)
    }

    pub fn from_clouds_yaml(content: &str, cloud: &str) -> Result<Self> {
        let mut file: CloudsFile = serde_yaml::from_str(content)?;
        let entry = file
            .clouds
            .remove(cloud)
            .ok_or_else(|| ConfigError::CloudNotFound(cloud.to_string()))?;
        Self::from_entry(cloud, entry)
    }

    fn from_entry(name: &str, entry: CloudEntry) -> Result<Self> {
        let auth_type = match entry.auth_type.as_deref() {
            Some(value) => AuthType::parse(value)?,
            None if entry.auth.has_application_credential() => AuthType::ApplicationCredential,
            None => AuthType::Password,
        };

        let config = CloudConfig {
            name: name.to_string(),
            auth: entry.auth,
            auth_type,
            region_name: entry.region_name,
            interface: normalize_interface(entry.interface.as_deref()),
            verify: entry.verify.unwrap_or(true),
            cacert: entry.cacert.map(PathBuf::from),
            endpoint_override: entry.load_balancer_endpoint_override,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let missing = |field: &str| ConfigError::MissingField(format!("auth.{}", field));

        if self.auth.auth_url.is_none() {
            return Err(missing("auth_url"));
        }

        match self.auth_type {
            AuthType::Password => {
                if self.auth.username.is_none() && self.auth.user_id.is_none() {
                    return Err(missing("username"));
                }
                if self.auth.password.is_none() {
                    return Err(missing("password"));
                }
            }
            AuthType::ApplicationCredential => {
                if self.auth.application_credential_id.is_none() {
                    return Err(missing("application_credential_id"));
                }
                if self.auth.application_credential_secret.is_none() {
                    return Err(missing("application_credential_secret"));
                }
            }
        }

        Ok(())
    }
}

/// `publicURL` and friends are the v2 spellings of the same interfaces
fn normalize_interface(interface: Option<&str>) -> String {
    let interface = interface.unwrap_or(DEFAULT_INTERFACE);
    interface
        .strip_suffix("URL")
        .unwrap_or(interface)
        .to_lowercase()
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Locations searched for clouds.yaml, in priority order
pub fn clouds_yaml_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = std::env::var("OS_CLIENT_CONFIG_FILE") {
        if !path.is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    candidates.push(PathBuf::from(CLOUDS_YAML));

    if let Some(home) = home::home_dir() {
        candidates.push(home.join(".config").join("openstack").join(CLOUDS_YAML));
    }

    candidates.push(PathBuf::from("/etc/openstack").join(CLOUDS_YAML));
    candidates
}

pub fn find_clouds_yaml() -> Result<PathBuf> {
    let candidates = clouds_yaml_candidates();
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| {
            let searched: Vec<String> = candidates
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            ConfigError::CloudsFileNotFound(searched.join(", "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_password_cloud() {
        let config = CloudConfig::from_env_lookup(env(&[
            ("OS_AUTH_URL", "https://keystone.example.com:5000/v3"),
            ("OS_USERNAME", "admin"),
            ("OS_PASSWORD", "secret"),
            ("OS_PROJECT_NAME", "ops"),
            ("OS_USER_DOMAIN_NAME", "Default"),
            ("OS_REGION_NAME", "RegionOne"),
        ]))
        .unwrap();

        assert_eq!(config.name, DEFAULT_CLOUD);
        assert_eq!(config.auth_type, AuthType::Password);
        assert_eq!(config.auth.project_name.as_deref(), Some("ops"));
        assert_eq!(config.region_name.as_deref(), Some("RegionOne"));
        assert_eq!(config.interface, "public");
        assert!(config.verify);
    }

    #[test]
    fn test_env_application_credential_is_inferred() {
        let config = CloudConfig::from_env_lookup(env(&[
            ("OS_AUTH_URL", "https://keystone.example.com/v3"),
            ("OS_APPLICATION_CREDENTIAL_ID", "abc"),
            ("OS_APPLICATION_CREDENTIAL_SECRET", "xyz"),
            ("OS_INTERFACE", "internalURL"),
            ("OS_INSECURE", "true"),
        ]))
        .unwrap();

        assert_eq!(config.auth_type, AuthType::ApplicationCredential);
        assert_eq!(config.interface, "internal");
        assert!(!config.verify);
    }

    #[test]
    fn test_env_missing_auth_url() {
        let result = CloudConfig::from_env_lookup(env(&[("OS_USERNAME", "admin")]));
        assert!(matches!(result, Err(ConfigError::MissingField(f)) if f == "auth.auth_url"));
    }

    #[test]
    fn test_env_empty_values_are_ignored() {
        let result = CloudConfig::from_env_lookup(env(&[
            ("OS_AUTH_URL", "https://keystone.example.com/v3"),
            ("OS_USERNAME", "admin"),
            ("OS_PASSWORD", ""),
        ]));
        assert!(matches!(result, Err(ConfigError::MissingField(f)) if f == "auth.password"));
    }

    #[test]
    fn test_env_invalid_insecure_flag() {
        let result = CloudConfig::from_env_lookup(env(&[
            ("OS_AUTH_URL", "https://keystone.example.com/v3"),
            ("OS_USERNAME", "admin"),
            ("OS_PASSWORD", "secret"),
            ("OS_INSECURE", "maybe"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_parse_clouds_yaml() {
        let yaml = r#"
clouds:
  prod:
    auth:
      auth_url: https://keystone.prod.example.com:5000
      username: operator
      password: hunter2
      project_id: 0123456789abcdef
      user_domain_name: Default
    region_name: RegionTwo
    interface: internal
    verify: false
    load_balancer_endpoint_override: https://octavia.prod.example.com:9876
  dev:
    auth_type: v3applicationcredential
    auth:
      auth_url: https://keystone.dev.example.com
      application_credential_id: id
      application_credential_secret: secret
"#;
        let prod = CloudConfig::from_clouds_yaml(yaml, "prod").unwrap();
        assert_eq!(prod.name, "prod");
        assert_eq!(prod.auth.project_id.as_deref(), Some("0123456789abcdef"));
        assert_eq!(prod.interface, "internal");
        assert!(!prod.verify);
        assert_eq!(
            prod.endpoint_override.as_deref(),
            Some("https://octavia.prod.example.com:9876")
        );

        let dev = CloudConfig::from_clouds_yaml(yaml, "dev").unwrap();
        assert_eq!(dev.auth_type, AuthType::ApplicationCredential);
        assert!(dev.verify);
    }

    #[test]
    fn test_unknown_cloud_and_auth_type() {
        let yaml = r#"
clouds:
  odd:
    auth_type: token
    auth:
      auth_url: https://keystone.example.com
"#;
        assert!(matches!(
            CloudConfig::from_clouds_yaml(yaml, "missing"),
            Err(ConfigError::CloudNotFound(name)) if name == "missing"
        ));
        assert!(matches!(
            CloudConfig::from_clouds_yaml(yaml, "odd"),
            Err(ConfigError::InvalidValue { field, .. }) if field == "auth_type"
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "clouds:\n  lab:\n    auth:\n      auth_url: http://10.0.0.1/identity\n      user_id: u-1\n      password: pw\n"
        )
        .unwrap();

        let config = CloudConfig::from_clouds_file(file.path(), "lab").unwrap();
        assert_eq!(config.auth.user_id.as_deref(), Some("u-1"));
        assert_eq!(config.auth_type, AuthType::Password);
    }

    #[test]
    fn test_candidates_include_user_and_system_paths() {
        let candidates = clouds_yaml_candidates();
        assert!(candidates.contains(&PathBuf::from("clouds.yaml")));
        assert!(candidates.contains(&PathBuf::from("/etc/openstack/clouds.yaml")));
    }
}
