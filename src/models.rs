//! Data models and configuration
//!
//! Defines credentials, client configuration and the per-file outcome record
//! produced by the batch walker.

use crate::{Error, Result};
use ini::Ini;
use std::fmt;
use std::path::Path;

pub const ACCESS_KEY_VAR: &str = "VOLC_ACCESSKEY";
pub const SECRET_KEY_VAR: &str = "VOLC_SECRETKEY";
pub const REGION_VAR: &str = "VOLC_REGION";
pub const HOST_VAR: &str = "VOLC_VOD_HOST";

pub const DEFAULT_REGION: &str = "cn-north-1";
pub const DEFAULT_BASE_URL: &str = "https://vod.volcengineapi.com";

/// File read by the single-file uploader from the working directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";
pub const CONFIG_SECTION: &str = "default";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Read `VOLC_ACCESSKEY` / `VOLC_SECRETKEY` from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve both keys through `lookup`; empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::Config(format!("{} not set", name)))
        };

        Ok(Self {
            access_key: read(ACCESS_KEY_VAR)?,
            secret_key: read(SECRET_KEY_VAR)?,
        })
    }

    /// Read the `default` section of an INI credentials file.
    pub fn from_ini_file(path: &Path) -> Result<Self> {
        let conf = Ini::load_from_file(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let section = conf.section(Some(CONFIG_SECTION)).ok_or_else(|| {
            Error::Config(format!(
                "Section [{}] missing in {}",
                CONFIG_SECTION,
                path.display()
            ))
        })?;

        Self::from_lookup(|name| section.get(name).map(str::to_string))
    }
}

/// Connection settings for the VOD OpenAPI.
#[derive(Debug, Clone)]
pub struct VodConfig {
    pub credentials: Credentials,
    pub region: String,
    pub base_url: String,
}

impl VodConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            region: DEFAULT_REGION.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Credentials, region and host all taken from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Credentials::from_env()?).with_env_overrides())
    }

    /// Apply `VOLC_REGION` / `VOLC_VOD_HOST` when they are set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(region) = std::env::var(REGION_VAR) {
            if !region.is_empty() {
                self.region = region;
            }
        }
        if let Ok(host) = std::env::var(HOST_VAR) {
            if !host.is_empty() {
                self.base_url = host;
            }
        }
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

/// Result of processing one video in batch mode.
#[derive(Debug)]
pub struct UploadOutcome {
    pub file_name: String,
    /// Empty when the upload itself failed.
    pub vid: String,
    pub published: bool,
    pub error: Option<Error>,
}

impl UploadOutcome {
    pub fn upload_failed(file_name: String, error: Error) -> Self {
        Self {
            file_name,
            vid: String::new(),
            published: false,
            error: Some(error),
        }
    }

    pub fn uploaded(file_name: String, vid: String, publish: Result<bool>) -> Self {
        let (published, error) = match publish {
            Ok(published) => (published, None),
            Err(e) => (false, Some(e)),
        };
        Self {
            file_name,
            vid,
            published,
            error,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|e| e.to_string())
            .filter(|m| !m.is_empty())
    }
}
