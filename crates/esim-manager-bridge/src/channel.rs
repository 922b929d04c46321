// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON call contract with the native side.
//
// Every native call takes a method name plus a JSON payload and returns a
// JSON envelope:
//
//   {"ok": true,  "value": <result>}
//   {"ok": false, "code": "PERMISSION_DENIED", "message": "..."}
//
// The same contract is spoken by the Android (JNI) and iOS (objc) glue, so
// the decoding below is shared and testable off-device.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::trace;

use esim_manager_core::error::{EsimError, Result};
use esim_manager_core::{
    CellularPlan, EsimInfo, EsimInstallationData, PermissionRationale, PermissionStatus,
};

use crate::traits::{EsimModule, NativeChannel, PermissionRequester};

/// Method names on the wire.
pub mod method {
    pub const REQUEST_PERMISSION: &str = "requestPermission";
    pub const IS_ESIM_SUPPORTED: &str = "isEsimSupported";
    pub const IS_ESIM_ENABLED: &str = "isEsimEnabled";
    pub const GET_ESIM_INFO: &str = "getEsimInfo";
    pub const INSTALL_ESIM_PROFILE: &str = "installEsimProfile";
    pub const GET_CELLULAR_PLANS: &str = "getCellularPlans";
}

/// Code used when the native side rejects without one.
const DEFAULT_ERROR_CODE: &str = "ERROR";

#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    value: Value,
    code: Option<String>,
    message: Option<String>,
}

/// Decode a native envelope into `T`, or into `EsimError::Native` when the
/// native side rejected the call.
pub fn decode_envelope<T: DeserializeOwned>(method: &str, raw: &str) -> Result<T> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    if envelope.ok {
        Ok(serde_json::from_value(envelope.value)?)
    } else {
        Err(EsimError::Native {
            method: method.to_string(),
            code: envelope
                .code
                .unwrap_or_else(|| DEFAULT_ERROR_CODE.to_string()),
            message: envelope.message.unwrap_or_default(),
        })
    }
}

/// Run a blocking channel call on tokio's blocking pool.
async fn call<C, T>(channel: &Arc<C>, method: &'static str, payload: String) -> Result<T>
where
    C: NativeChannel,
    T: DeserializeOwned,
{
    let channel = Arc::clone(channel);
    let raw = tokio::task::spawn_blocking(move || channel.invoke(method, &payload))
        .await
        .map_err(|e| EsimError::Bridge(format!("native call `{method}` aborted: {e}")))??;
    trace!(method, bytes = raw.len(), "native call returned");
    decode_envelope(method, &raw)
}

/// [`EsimModule`] backed by a [`NativeChannel`].
pub struct ChannelModule<C> {
    name: String,
    channel: Arc<C>,
}

impl<C: NativeChannel> ChannelModule<C> {
    pub fn new(channel: C) -> Self {
        Self::shared(Arc::new(channel))
    }

    pub fn shared(channel: Arc<C>) -> Self {
        let name = format!("EsimManager ({})", channel.transport());
        Self { name, channel }
    }
}

#[async_trait]
impl<C: NativeChannel> EsimModule for ChannelModule<C> {
    fn module_name(&self) -> &str {
        &self.name
    }

    async fn is_esim_supported(&self) -> Result<bool> {
        call(&self.channel, method::IS_ESIM_SUPPORTED, "null".into()).await
    }

    async fn is_esim_enabled(&self) -> Result<bool> {
        call(&self.channel, method::IS_ESIM_ENABLED, "null".into()).await
    }

    async fn get_esim_info(&self) -> Result<EsimInfo> {
        call(&self.channel, method::GET_ESIM_INFO, "null".into()).await
    }

    async fn install_esim_profile(&self, data: &EsimInstallationData) -> Result<bool> {
        let payload = serde_json::to_string(data)?;
        call(&self.channel, method::INSTALL_ESIM_PROFILE, payload).await
    }

    async fn get_cellular_plans(&self) -> Result<Vec<CellularPlan>> {
        call(&self.channel, method::GET_CELLULAR_PLANS, "null".into()).await
    }
}

/// [`PermissionRequester`] backed by a [`NativeChannel`].
///
/// The envelope value is the platform's result constant (`"granted"`,
/// `"denied"`, `"never_ask_again"`).
pub struct ChannelPermissions<C> {
    channel: Arc<C>,
}

impl<C: NativeChannel> ChannelPermissions<C> {
    pub fn new(channel: C) -> Self {
        Self::shared(Arc::new(channel))
    }

    pub fn shared(channel: Arc<C>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl<C: NativeChannel> PermissionRequester for ChannelPermissions<C> {
    async fn request(
        &self,
        permission: &str,
        rationale: &PermissionRationale,
    ) -> Result<PermissionStatus> {
        let payload = json!({ "permission": permission, "rationale": rationale }).to_string();
        let status: String = call(&self.channel, method::REQUEST_PERMISSION, payload)
            .await
            .map_err(|e| EsimError::PermissionRequest(e.to_string()))?;
        Ok(PermissionStatus::from_native(&status))
    }
}
