// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runtime permission negotiation.
//
// Only Android gates phone-state access behind a runtime dialog. Every other
// platform is treated as already granted. Every outcome collapses to a
// boolean: denial, "never ask again", unknown result constants, and a
// failing request primitive are all `false`.

use esim_manager_core::{PermissionRationale, Platform, READ_PHONE_STATE};
use tracing::{debug, warn};

use crate::traits::PermissionRequester;

/// Negotiate access to phone state on `platform`.
///
/// Starts fresh on every call; a previous grant is never remembered. Never
/// returns an error: a failure of the request primitive is logged as a
/// warning and reported as `false`.
pub async fn negotiate(
    platform: Platform,
    requester: &dyn PermissionRequester,
    rationale: &PermissionRationale,
) -> bool {
    if !platform.requires_runtime_consent() {
        debug!(%platform, "no runtime consent model; permission implied");
        return true;
    }

    match requester.request(READ_PHONE_STATE, rationale).await {
        Ok(status) => {
            debug!(%platform, status = status.as_native(), "permission request answered");
            status.is_granted()
        }
        Err(e) => {
            warn!(%platform, error = %e, "permission request failed");
            false
        }
    }
}
