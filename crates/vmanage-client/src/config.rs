//! Client Configuration
//!
//! Controller address, account and per-session transport settings, loaded
//! from TOML and overlaid with `VMANAGE_*` environment variables.

use crate::session::Credentials;
use crate::{Result, VManageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

pub const ENV_URL: &str = "VMANAGE_URL";
pub const ENV_USERNAME: &str = "VMANAGE_USERNAME";
pub const ENV_PASSWORD: &str = "VMANAGE_PASSWORD";
pub const ENV_SKIP_TLS_VERIFY: &str = "VMANAGE_SKIP_TLS_VERIFY";

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct VManageConfig {
    /// Controller base URL, e.g. `https://vmanage.example.com:8443`
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub transport: TransportConfig,
}

/// HTTP transport settings scoped to a single session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Accept self-signed or otherwise invalid controller certificates
    pub skip_tls_verify: bool,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            skip_tls_verify: false,
            user_agent: format!("vmanage-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    pub fn insecure() -> Self {
        Self {
            skip_tls_verify: true,
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for VManageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VManageConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("transport", &self.transport)
            .finish()
    }
}

impl Drop for VManageConfig {
    fn drop(&mut self) {
        if let Some(password) = self.password.as_mut() {
            password.zeroize();
        }
    }
}

impl VManageConfig {
    /// Load a config file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| VManageError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Load `~/.vmanage/config.toml`, or `config.<profile>.toml` for a profile
    pub fn load_default(profile: Option<&str>) -> Result<Self> {
        Self::load(Self::config_path(profile)?)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| VManageError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VManageError::Config(e.to_string()))
    }

    pub fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| VManageError::Config("Cannot find home directory".to_string()))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".vmanage").join(filename))
    }

    /// Overlay values from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_URL) {
            self.base_url = url;
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.username = username;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            if let Some(previous) = self.password.as_mut() {
                previous.zeroize();
            }
            self.password = Some(password);
        }
        if let Some(flag) = lookup(ENV_SKIP_TLS_VERIFY) {
            self.transport.skip_tls_verify = parse_flag(&flag).ok_or_else(|| {
                VManageError::Config(format!(
                    "{} must be true or false, got '{}'",
                    ENV_SKIP_TLS_VERIFY, flag
                ))
            })?;
        }
        Ok(self)
    }

    /// Credentials for [`Session::establish`](crate::Session::establish)
    pub fn credentials(&self) -> Result<Credentials> {
        if self.username.is_empty() {
            return Err(VManageError::Config("username is not set".to_string()));
        }
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| VManageError::Config("password is not set".to_string()))?;
        Ok(Credentials::new(self.username.clone(), password))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
