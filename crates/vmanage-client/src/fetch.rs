//! Authenticated reads against `dataservice` endpoints

use crate::endpoint;
use crate::error::{collapse_whitespace, transport_message};
use crate::session::Session;
use crate::{Result, VManageError};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

impl Session {
    /// GET a fully formed `https` URL and unwrap its `data` envelope
    ///
    /// The payload is always returned as a list: a single object becomes a
    /// one-element list and an empty, blank or `null` payload an empty one.
    pub async fn fetch_data(&self, url: &str) -> Result<Vec<Value>> {
        let url = endpoint::parse_secure(url)?;
        self.fetch_url(url).await
    }

    /// GET `{base}dataservice/{path}` on this session's controller
    pub async fn fetch_path(&self, path: &str) -> Result<Vec<Value>> {
        let url = self.dataservice_url(path)?;
        self.fetch_url(url).await
    }

    pub(crate) async fn fetch_url(&self, url: Url) -> Result<Vec<Value>> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| VManageError::Fetch(transport_message(&e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| VManageError::Fetch(transport_message(&e)))?;

        if !status.is_success() {
            return Err(VManageError::Fetch(format!(
                "{} returned {}: {}",
                url.path(),
                status,
                collapse_whitespace(&String::from_utf8_lossy(&body))
            )));
        }

        let envelope: Value = serde_json::from_slice(&body).map_err(|e| {
            VManageError::Fetch(format!("{} returned invalid JSON: {}", url.path(), e))
        })?;

        unwrap_data(envelope, url.path())
    }
}

fn unwrap_data(envelope: Value, source: &str) -> Result<Vec<Value>> {
    let mut envelope = match envelope {
        Value::Object(map) => map,
        _ => {
            return Err(VManageError::Fetch(format!(
                "{} returned a response that is not a JSON object",
                source
            )))
        }
    };

    match envelope.remove("data") {
        None => Err(VManageError::Fetch(format!(
            "{} response has no data field",
            source
        ))),
        Some(data) if is_empty_payload(&data) => {
            warn!("No data returned from {}", source);
            Ok(Vec::new())
        }
        Some(Value::Array(items)) => Ok(items),
        Some(single) => Ok(vec![single]),
    }
}

/// `null`, `[]`, `{}` and blank strings all mean "no results"
fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}
