// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Value shapes exchanged with the native eSIM module.
//
// Field names on the wire are camelCase so that the same JSON works against
// both the Android and iOS native sides.

use serde::{Deserialize, Serialize};

/// Snapshot of the device's eSIM state, produced fresh on every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsimInfo {
    pub is_esim_supported: bool,
    pub is_esim_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iccid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_network_code: Option<String>,
}

/// Input for a profile installation.
///
/// Opaque to the bridge: the activation code (commonly `LPA:1$...`) is
/// passed to the native side exactly as given, without any syntax check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsimInstallationData {
    pub activation_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<String>,
}

impl EsimInstallationData {
    pub fn new(activation_code: impl Into<String>) -> Self {
        Self {
            activation_code: activation_code.into(),
            confirmation_code: None,
        }
    }

    pub fn with_confirmation_code(mut self, code: impl Into<String>) -> Self {
        self.confirmation_code = Some(code.into());
        self
    }
}

/// One cellular subscription known to the device.
///
/// Optional fields are platform-conditional: `slot_id` is only reported by
/// iOS, `subscription_id` and `is_embedded` only by Android (the latter on
/// API 28+). Never assume any of them is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellularPlan {
    pub carrier_name: String,
    pub mobile_country_code: String,
    pub mobile_network_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_embedded: Option<bool>,
}
