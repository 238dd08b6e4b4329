//! REST client for the backend node/device/teleop-group API.
//!
//! All calls are same-origin under `/api`. Non-2xx responses surface the
//! backend's `{message}` body when it sends one; transport and decode
//! failures come through `gloo-net`. Nothing here retries: every failure
//! is terminal for that one operation and handled at the call site.

use std::collections::BTreeMap;

use gloo_net::http::{Request, Response};
use serde::Serialize;
use thiserror::Error;
use web_common::{
    ApiMessage, Device, DevicesPayload, DeviceTypeCatalog, Node, TeleopGroup, TeleopTypeCatalog,
};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or unexpected response body.
    #[error("network error: {0}")]
    Network(#[from] gloo_net::Error),
    /// Non-2xx response, with the backend's message when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },
}

/// Create/update payload for a device, config exactly as collected from
/// the schema form.
#[derive(Debug, Clone, Serialize)]
pub struct NewDevice {
    pub node_id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub config: BTreeMap<String, String>,
}

/// Create/update payload for a teleop group; config maps role names to
/// device ids.
#[derive(Debug, Clone, Serialize)]
pub struct NewTeleopGroup {
    pub node_id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub config: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApiClient;

impl ApiClient {
    async fn check(response: Response) -> Result<Response, ApiError> {
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let message = match response.json::<ApiMessage>().await {
            Ok(body) => body.message,
            Err(_) => format!("request failed with status {status}"),
        };
        Err(ApiError::Status { status, message })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ApiError> {
        let response = Self::check(Request::get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn post_empty(url: &str) -> Result<(), ApiError> {
        Self::check(Request::post(url).send().await?).await?;
        Ok(())
    }

    pub async fn nodes(self) -> Result<Vec<Node>, ApiError> {
        Self::get_json("/api/nodes").await
    }

    /// Raw devices payload; the backend returns either a flat list or a
    /// per-node mapping.
    pub async fn devices(self) -> Result<DevicesPayload, ApiError> {
        Self::get_json("/api/devices").await
    }

    /// Devices normalized to a flat list.
    pub async fn device_list(self) -> Result<Vec<Device>, ApiError> {
        Ok(self.devices().await?.into_devices())
    }

    pub async fn device_types(self, node_id: i64) -> Result<DeviceTypeCatalog, ApiError> {
        Self::get_json(&format!("/api/device/types?node_id={node_id}")).await
    }

    pub async fn create_device(self, device: &NewDevice) -> Result<(), ApiError> {
        let request = Request::post("/api/devices").json(device)?;
        Self::check(request.send().await?).await?;
        Ok(())
    }

    pub async fn update_device(self, id: i64, device: &NewDevice) -> Result<(), ApiError> {
        let request = Request::put(&format!("/api/devices/{id}")).json(device)?;
        Self::check(request.send().await?).await?;
        Ok(())
    }

    pub async fn start_device(self, id: i64) -> Result<(), ApiError> {
        Self::post_empty(&format!("/api/devices/{id}/start")).await
    }

    pub async fn stop_device(self, id: i64) -> Result<(), ApiError> {
        Self::post_empty(&format!("/api/devices/{id}/stop")).await
    }

    pub async fn delete_device(self, id: i64) -> Result<(), ApiError> {
        Self::check(Request::delete(&format!("/api/devices/{id}")).send().await?).await?;
        Ok(())
    }

    pub async fn teleop_groups(self) -> Result<Vec<TeleopGroup>, ApiError> {
        Self::get_json("/api/teleop-groups").await
    }

    pub async fn node_teleop_groups(self, node_id: i64) -> Result<Vec<TeleopGroup>, ApiError> {
        Self::get_json(&format!("/api/teleop-groups?node_id={node_id}")).await
    }

    pub async fn teleop_group(self, id: i64) -> Result<TeleopGroup, ApiError> {
        Self::get_json(&format!("/api/teleop-groups/{id}")).await
    }

    pub async fn teleop_group_types(self, node_id: i64) -> Result<TeleopTypeCatalog, ApiError> {
        Self::get_json(&format!("/api/teleop-groups/types?node_id={node_id}")).await
    }

    pub async fn create_teleop_group(self, group: &NewTeleopGroup) -> Result<(), ApiError> {
        let request = Request::post("/api/teleop-groups").json(group)?;
        Self::check(request.send().await?).await?;
        Ok(())
    }

    pub async fn update_teleop_group(self, id: i64, group: &NewTeleopGroup) -> Result<(), ApiError> {
        let request = Request::put(&format!("/api/teleop-groups/{id}")).json(group)?;
        Self::check(request.send().await?).await?;
        Ok(())
    }

    pub async fn start_teleop_group(self, id: i64) -> Result<(), ApiError> {
        Self::post_empty(&format!("/api/teleop-groups/{id}/start")).await
    }

    pub async fn stop_teleop_group(self, id: i64) -> Result<(), ApiError> {
        Self::post_empty(&format!("/api/teleop-groups/{id}/stop")).await
    }

    pub async fn delete_teleop_group(self, id: i64) -> Result<(), ApiError> {
        Self::check(
            Request::delete(&format!("/api/teleop-groups/{id}")).send().await?,
        )
        .await?;
        Ok(())
    }
}
