use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Represents the full CLI configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Config {
    /// Load configuration from the provided path or the default config file.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(Config::default_path);

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Unable to read config file at {}", path.display()))?;

        serde_yaml::from_str(&raw)
            .with_context(|| format!("Malformed YAML in config file {}", path.display()))
    }

    /// Persist the configuration to disk, creating parent directories if needed.
    pub fn save<P: AsRef<Path>>(&self, path: Option<P>) -> Result<()> {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(Config::default_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create config directory {}", parent.display())
            })?;
        }

        let serialized = serde_yaml::to_string(self)?;
        fs::write(&path, serialized)
            .with_context(|| format!("Unable to write config file {}", path.display()))?;

        debug!(path = %path.display(), "Config saved");
        Ok(())
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Returns either the requested profile or falls back to the default one.
    pub fn resolve_profile<'a>(
        &'a self,
        requested: Option<&'a str>,
    ) -> Option<(&'a str, &'a Profile)> {
        if let Some(name) = requested {
            self.profiles.get(name).map(|profile| (name, profile))
        } else if let Some(default_name) = self.default_profile.as_deref() {
            self.profiles
                .get(default_name)
                .map(|profile| (default_name, profile))
        } else {
            self.profiles
                .iter()
                .next()
                .map(|(name, profile)| (name.as_str(), profile))
        }
    }

    /// Removes a profile; if it was the default, the first remaining one takes over.
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        let removed = self.profiles.remove(name);
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = self.profiles.keys().next().cloned();
        }
        removed
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".edusoho");
        path.push("config.yaml");
        path
    }
}

/// Connection settings for one EduSoho site. Tokens are kept in the
/// credential store, not here.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Profile {
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn profile(url: &str) -> Profile {
        Profile {
            base_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.default_profile.is_none());
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let config = Config::load(Some("/nonexistent/config.yaml")).unwrap();
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let mut config = Config {
            default_profile: Some("school".to_string()),
            ..Default::default()
        };
        config.profiles.insert(
            "school".to_string(),
            Profile {
                base_url: Some("https://school.example.com/api/".to_string()),
                username: Some("alice".to_string()),
                debug: true,
            },
        );

        let temp_file = NamedTempFile::new().unwrap();
        config.save(Some(temp_file.path())).unwrap();
        let loaded = Config::load(Some(temp_file.path())).unwrap();

        assert_eq!(loaded.default_profile, Some("school".to_string()));
        let school = loaded.profile("school").unwrap();
        assert_eq!(
            school.base_url.as_deref(),
            Some("https://school.example.com/api/")
        );
        assert_eq!(school.username.as_deref(), Some("alice"));
        assert!(school.debug);
    }

    #[test]
    fn test_load_malformed_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "invalid: yaml: [unclosed").unwrap();

        let result = Config::load(Some(temp_file.path()));
        assert!(result.unwrap_err().to_string().contains("Malformed YAML"));
    }

    #[test]
    fn test_debug_defaults_to_false() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            "profiles:\n  school:\n    base_url: https://school.example.com/api/\n"
        )
        .unwrap();

        let config = Config::load(Some(temp_file.path())).unwrap();
        let school = config.profile("school").unwrap();
        assert!(!school.debug);
        assert!(school.username.is_none());
    }

    #[test]
    fn test_resolve_profile_requested() {
        let mut config = Config {
            default_profile: Some("default".to_string()),
            ..Default::default()
        };
        config
            .profiles
            .insert("default".to_string(), profile("https://a.example.com/api/"));
        config
            .profiles
            .insert("work".to_string(), profile("https://b.example.com/api/"));

        let (name, resolved) = config.resolve_profile(Some("work")).unwrap();
        assert_eq!(name, "work");
        assert_eq!(
            resolved.base_url.as_deref(),
            Some("https://b.example.com/api/")
        );
    }

    #[test]
    fn test_resolve_profile_default() {
        let mut config = Config {
            default_profile: Some("default".to_string()),
            ..Default::default()
        };
        config
            .profiles
            .insert("default".to_string(), profile("https://a.example.com/api/"));
        config
            .profiles
            .insert("aaa".to_string(), profile("https://b.example.com/api/"));

        let (name, _) = config.resolve_profile(None).unwrap();
        assert_eq!(name, "default");
    }

    #[test]
    fn test_resolve_profile_first_available() {
        let mut config = Config::default();
        config
            .profiles
            .insert("only".to_string(), profile("https://only.example.com/api/"));

        let (name, _) = config.resolve_profile(None).unwrap();
        assert_eq!(name, "only");
    }

    #[test]
    fn test_resolve_profile_none_available() {
        let config = Config::default();
        assert!(config.resolve_profile(None).is_none());
        assert!(config.resolve_profile(Some("missing")).is_none());
    }

    #[test]
    fn test_remove_default_profile_promotes_next() {
        let mut config = Config {
            default_profile: Some("a".to_string()),
            ..Default::default()
        };
        config
            .profiles
            .insert("a".to_string(), profile("https://a.example.com/api/"));
        config
            .profiles
            .insert("b".to_string(), profile("https://b.example.com/api/"));

        assert!(config.remove_profile("a").is_some());
        assert_eq!(config.default_profile.as_deref(), Some("b"));
        assert!(config.remove_profile("a").is_none());
    }

    #[test]
    fn test_yaml_serialization() {
        let mut config = Config {
            default_profile: Some("prod".to_string()),
            ..Default::default()
        };
        config
            .profiles
            .insert("prod".to_string(), profile("https://prod.example.com/api/"));

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("default_profile: prod"));
        assert!(yaml.contains("https://prod.example.com/api/"));
        assert!(!yaml.contains("username"));
    }
}
