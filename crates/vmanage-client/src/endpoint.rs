//! Controller URL handling
//!
//! Every entry point validates its URL here before touching the network.

use crate::{Result, VManageError};
use url::Url;

const SECURE_SCHEME: &str = "https";

/// Login endpoint, relative to the base URL
pub const LOGIN_PATH: &str = "j_security_check";
/// Anti-forgery token endpoint
pub const TOKEN_PATH: &str = "dataservice/client/token";
/// Event log endpoint
pub const EVENT_PATH: &str = "dataservice/event";
/// Interface reset endpoint prefix; the system IP is appended
pub const RESET_INTERFACE_PATH: &str = "dataservice/device/tools/reset/interface";

/// Validated vManage base URL, always `https` and always ending with `/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parse and validate a controller base URL
    pub fn parse(input: &str) -> Result<Self> {
        let url = parse_secure(input)?;
        Ok(Self::normalize(url))
    }

    /// Accepts plain `http` so tests can point at a local mock server
    #[cfg(test)]
    pub(crate) fn for_test(input: &str) -> Self {
        Self::normalize(Url::parse(input).expect("test URL"))
    }

    fn normalize(mut url: Url) -> Self {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        Self(url)
    }

    /// Resolve a path relative to the base
    pub fn join(&self, path: &str) -> Result<Url> {
        self.0
            .join(path.trim_start_matches('/'))
            .map_err(|e| VManageError::UrlValidation(format!("{}: {}", path, e)))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Parse a full request URL and reject anything but `https`
pub fn parse_secure(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim())
        .map_err(|e| VManageError::UrlValidation(format!("{}: {}", input, e)))?;

    if url.scheme() != SECURE_SCHEME {
        return Err(VManageError::UrlValidation(format!(
            "{} must use the https scheme, got '{}'",
            input,
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(VManageError::UrlValidation(format!("{} has no host", input)));
    }

    Ok(url)
}
