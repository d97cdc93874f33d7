//! vManage Session
//!
//! Form login, anti-forgery token retrieval and the header set that every
//! later request on the session carries.

use crate::config::{TransportConfig, VManageConfig};
use crate::endpoint::{self, BaseUrl};
use crate::error::transport_message;
use crate::{Result, VManageError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::sync::{Arc, Once};
use tracing::{debug, info, warn};
use url::Url;
use zeroize::Zeroizing;

/// Anti-forgery header name expected by `dataservice` endpoints
pub const XSRF_TOKEN_HEADER: &str = "x-xsrf-token";

static INSECURE_TLS_WARN_ONCE: Once = Once::new();

/// Login credentials; the password buffer is wiped when dropped
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated vManage session
///
/// Holds its own HTTP transport (cookie jar and TLS policy) plus the
/// `X-XSRF-TOKEN`, `Authorization` and `Cookie` headers. It is immutable once
/// established and stays valid until the controller rejects it.
pub struct Session {
    pub(crate) http: Client,
    pub(crate) headers: HeaderMap,
    base_url: BaseUrl,
    username: String,
}

impl Session {
    /// Log in to the controller at `base_url`
    pub async fn establish(
        base_url: &str,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self> {
        let base_url = BaseUrl::parse(base_url)?;
        Self::establish_at(base_url, credentials, transport).await
    }

    /// Log in using a loaded [`VManageConfig`]
    pub async fn from_config(config: &VManageConfig) -> Result<Self> {
        let base_url = BaseUrl::parse(&config.base_url)?;
        let credentials = config.credentials()?;
        Self::establish_at(base_url, credentials, &config.transport).await
    }

    pub(crate) async fn establish_at(
        base_url: BaseUrl,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let http = build_transport(transport, jar.clone())?;

        let login_url = base_url.join(endpoint::LOGIN_PATH)?;
        let token_url = base_url.join(endpoint::TOKEN_PATH)?;

        let Credentials { username, password } = credentials;
        let authorization = basic_authorization(&username, &password)?;

        debug!("POST {}", login_url);
        let response = http
            .post(login_url)
            .form(&[("j_username", username.as_str()), ("j_password", password.as_str())])
            .send()
            .await
            .map_err(|e| auth_error("login request failed", &e))?;
        drop(password);

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| auth_error("reading login response failed", &e))?;
        if !status.is_success() {
            return Err(VManageError::Authentication(format!(
                "login rejected with status {}",
                status
            )));
        }
        if is_login_page(&body) {
            return Err(VManageError::Authentication(
                "login rejected: controller returned its login page".to_string(),
            ));
        }

        debug!("GET {}", token_url);
        let response = http
            .get(token_url.clone())
            .header(header::AUTHORIZATION, authorization.clone())
            .send()
            .await
            .map_err(|e| auth_error("token request failed", &e))?;

        let status = response.status();
        let token = response
            .text()
            .await
            .map_err(|e| auth_error("reading token response failed", &e))?;
        if !status.is_success() {
            return Err(VManageError::Authentication(format!(
                "token request rejected with status {}",
                status
            )));
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(VManageError::Authentication(
                "controller returned an empty token".to_string(),
            ));
        }
        if is_login_page(token) {
            return Err(VManageError::Authentication(
                "token request returned the login page".to_string(),
            ));
        }
        let xsrf = HeaderValue::from_str(token).map_err(|e| {
            VManageError::Authentication(format!("token is not a valid header value: {}", e))
        })?;

        let cookie = session_cookie(jar.as_ref(), &token_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(XSRF_TOKEN_HEADER), xsrf);
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(header::COOKIE, cookie);

        info!("Established vManage session for {} at {}", username, base_url);

        Ok(Self {
            http,
            headers,
            base_url,
            username,
        })
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Anti-forgery token sent as `X-XSRF-TOKEN`
    pub fn xsrf_token(&self) -> &str {
        self.header_str(XSRF_TOKEN_HEADER)
    }

    /// Session cookie sent as `Cookie`
    pub fn cookie_header(&self) -> &str {
        self.header_str(header::COOKIE.as_str())
    }

    /// `{base}dataservice/{path}`
    pub fn dataservice_url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        let path = path.strip_prefix("dataservice/").unwrap_or(path);
        self.base_url.join(&format!("dataservice/{}", path))
    }

    fn header_str(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("headers", &"<redacted>")
            .finish()
    }
}

fn build_transport(config: &TransportConfig, jar: Arc<Jar>) -> Result<Client> {
    if config.skip_tls_verify {
        INSECURE_TLS_WARN_ONCE.call_once(|| {
            warn!("TLS certificate verification disabled for vManage session (insecure)")
        });
    }

    Client::builder()
        .cookie_provider(jar)
        .danger_accept_invalid_certs(config.skip_tls_verify)
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| auth_error("failed to build HTTP client", &e))
}

fn basic_authorization(username: &str, password: &str) -> Result<HeaderValue> {
    let pair = Zeroizing::new(format!("{}:{}", username, password));
    let value = Zeroizing::new(format!("Basic {}", BASE64.encode(pair.as_bytes())));
    let mut header = HeaderValue::from_str(&value).map_err(|e| {
        VManageError::Authentication(format!("credentials are not a valid header value: {}", e))
    })?;
    header.set_sensitive(true);
    Ok(header)
}

fn session_cookie(jar: &Jar, url: &Url) -> Result<HeaderValue> {
    let mut cookie = jar
        .cookies(url)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            VManageError::Authentication(format!("no session cookie set for {}", url.path()))
        })?;
    cookie.set_sensitive(true);
    Ok(cookie)
}

fn is_login_page(body: &str) -> bool {
    body.to_ascii_lowercase().contains("<html")
}

fn auth_error(context: &str, err: &reqwest::Error) -> VManageError {
    VManageError::Authentication(format!("{}: {}", context, transport_message(err)))
}
