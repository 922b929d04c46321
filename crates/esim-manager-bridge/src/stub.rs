// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub glue for builds without a native eSIM module (desktop, CI) and for
// platforms that have no runtime permission primitive.

use async_trait::async_trait;
use esim_manager_core::error::{EsimError, Result};
use esim_manager_core::{BridgeConfig, PermissionRationale, PermissionStatus};

use crate::registry::ModuleRegistry;
use crate::traits::PermissionRequester;

/// Register nothing: there is no native side to talk to.
pub fn install(_registry: &ModuleRegistry, config: &BridgeConfig) {
    tracing::debug!(
        capability = %config.capability_name,
        "no native eSIM glue on this platform"
    );
}

/// Permission primitive for platforms without one.
pub struct StubPermissions;

#[async_trait]
impl PermissionRequester for StubPermissions {
    async fn request(
        &self,
        permission: &str,
        _rationale: &PermissionRationale,
    ) -> Result<PermissionStatus> {
        tracing::warn!(permission, "PermissionRequester::request called on stub bridge");
        Err(EsimError::PlatformUnavailable)
    }
}
