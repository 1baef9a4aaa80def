//! Service configuration

use sentiscope_analytics::AnalyticsSettings;
use sentiscope_classifiers::ClassifierConfig;
use sentiscope_collectors::{CollectorSettings, Credentials};
use sentiscope_core::{Error, Platform, Result};
use sentiscope_store::{SearchStore, StoreSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Environment variables that override configured credentials
pub const CREDENTIAL_ENV_VARS: [(&str, Platform); 4] = [
    ("SENTISCOPE_YOUTUBE_KEY", Platform::YouTube),
    ("SENTISCOPE_TWITTER_TOKEN", Platform::Twitter),
    ("SENTISCOPE_FACEBOOK_TOKEN", Platform::Facebook),
    ("SENTISCOPE_INSTAGRAM_TOKEN", Platform::Instagram),
];

/// Top-level configuration, usually read from `sentiscope.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub collection: CollectorSettings,

    /// Platform key -> secret
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

impl ServiceConfig {
    /// Load from a YAML file, or defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }

    /// Apply credential overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply credential overrides from an arbitrary lookup
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (var, platform) in &CREDENTIAL_ENV_VARS {
            if let Some(secret) = lookup(var).filter(|s| !s.trim().is_empty()) {
                debug!(platform = %platform, "Credential taken from environment");
                self.credentials.insert(platform.key(), secret);
            }
        }
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials
            .iter()
            .map(|(key, secret)| (Platform::from(key.as_str()), secret.clone()))
            .collect()
    }

    /// Copy configured credentials into the store so they persist and take
    /// part in collector selection
    pub async fn seed_credentials(&self, store: &dyn SearchStore) -> Result<usize> {
        let mut seeded = 0;
        for (key, secret) in &self.credentials {
            if secret.trim().is_empty() {
                continue;
            }
            store.set_credential(&Platform::from(key.as_str()), secret).await?;
            seeded += 1;
        }
        Ok(seeded)
    }
}
