//! Device interface reset

use crate::endpoint::{self, BaseUrl};
use crate::error::{collapse_whitespace, transport_message};
use crate::session::Session;
use crate::{Result, VManageError};
use reqwest::StatusCode;
use serde::Serialize;
use std::net::IpAddr;
use tracing::{debug, info};

/// Marker vManage embeds in HTML error responses that still carry HTTP 200
pub const ERROR_DIALOG_MARKER: &str = "error-dialog";

/// Interface reset request for one device interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceReset {
    #[serde(skip)]
    pub system_ip: String,
    #[serde(rename = "vpnId")]
    pub vpn_id: String,
    pub ifname: String,
}

impl InterfaceReset {
    pub fn new(
        system_ip: impl Into<String>,
        vpn_id: impl ToString,
        ifname: impl Into<String>,
    ) -> Self {
        Self {
            system_ip: system_ip.into(),
            vpn_id: vpn_id.to_string(),
            ifname: ifname.into(),
        }
    }
}

impl Session {
    /// Reset `ifname` in VPN `vpn_id` on the device with `system_ip`
    ///
    /// Returns `true` once the controller accepted the action.
    pub async fn reset_interface(
        &self,
        base_url: &str,
        system_ip: &str,
        vpn_id: impl ToString,
        ifname: &str,
    ) -> Result<bool> {
        let base_url = BaseUrl::parse(base_url)?;
        let request = InterfaceReset::new(system_ip, vpn_id, ifname);
        self.reset_interface_at(&base_url, &request).await
    }

    /// Send `request` to the controller this session logged in to
    pub async fn send_interface_reset(&self, request: &InterfaceReset) -> Result<bool> {
        self.reset_interface_at(self.base_url(), request).await
    }

    async fn reset_interface_at(
        &self,
        base_url: &BaseUrl,
        request: &InterfaceReset,
    ) -> Result<bool> {
        let system_ip: IpAddr = request.system_ip.trim().parse().map_err(|_| {
            VManageError::UrlValidation(format!(
                "system IP '{}' is not an IP address",
                request.system_ip
            ))
        })?;
        let url = base_url.join(&format!("{}/{}", endpoint::RESET_INTERFACE_PATH, system_ip))?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| VManageError::Reset {
                status: 0,
                body: transport_message(&e),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| VManageError::Reset {
            status: status.as_u16(),
            body: transport_message(&e),
        })?;

        if status == StatusCode::OK && !body.contains(ERROR_DIALOG_MARKER) {
            info!(
                "Reset interface {} (VPN {}) on {}",
                request.ifname, request.vpn_id, system_ip
            );
            return Ok(true);
        }

        Err(VManageError::Reset {
            status: status.as_u16(),
            body: collapse_whitespace(&body),
        })
    }
}
