// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the native eSIM capability.
//
// The native module itself (TelephonyManager / EuiccManager on Android,
// CoreTelephony on iOS) lives outside this crate. These traits are the seam
// it plugs into.

use async_trait::async_trait;

use esim_manager_core::error::Result;
use esim_manager_core::{
    CellularPlan, EsimInfo, EsimInstallationData, PermissionRationale, PermissionStatus,
};

/// The five capability operations a native module must implement.
///
/// Errors returned here reach the caller of the facade unchanged.
#[async_trait]
pub trait EsimModule: Send + Sync {
    /// Name the module reports for diagnostics (e.g. "EsimManager (JNI)").
    fn module_name(&self) -> &str;

    /// Whether the hardware can host an eSIM profile at all.
    async fn is_esim_supported(&self) -> Result<bool>;

    /// Whether an embedded subscription is currently active.
    async fn is_esim_enabled(&self) -> Result<bool>;

    async fn get_esim_info(&self) -> Result<EsimInfo>;

    /// Start profile installation.
    ///
    /// iOS installs directly from the activation code; Android hands over
    /// to the system eSIM settings. `Ok(false)` means the platform declined
    /// without raising an error.
    async fn install_esim_profile(&self, data: &EsimInstallationData) -> Result<bool>;

    /// Active subscriptions, possibly empty.
    async fn get_cellular_plans(&self) -> Result<Vec<CellularPlan>>;
}

/// The platform's runtime permission-request primitive.
#[async_trait]
pub trait PermissionRequester: Send + Sync {
    /// Ask the user for `permission`, showing `rationale` where the platform
    /// supports it. Resolves with the platform's decision.
    async fn request(
        &self,
        permission: &str,
        rationale: &PermissionRationale,
    ) -> Result<PermissionStatus>;
}

/// Raw string-in/string-out call into the native side.
///
/// Implementations block until the native method returns; callers are
/// expected to move them off the async executor.
pub trait NativeChannel: Send + Sync + 'static {
    /// Short description of the transport (e.g. "JNI", "objc").
    fn transport(&self) -> &str;

    /// Invoke `method` with a JSON `payload`, returning the JSON envelope.
    fn invoke(&self, method: &str, payload: &str) -> Result<String>;
}
