// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runtime permission vocabulary (Android consent model).

use serde::{Deserialize, Serialize};

/// The one permission the bridge negotiates.
pub const READ_PHONE_STATE: &str = "android.permission.READ_PHONE_STATE";

/// Outcome reported by the platform permission-request primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user ticked "don't ask again"; further requests are auto-denied.
    NeverAskAgain,
    /// A result constant this bridge does not know.
    Unrecognised(String),
}

impl PermissionStatus {
    /// Map a platform result constant (`"granted"`, `"denied"`,
    /// `"never_ask_again"`) onto a status.
    pub fn from_native(value: &str) -> Self {
        match value {
            "granted" => Self::Granted,
            "denied" => Self::Denied,
            "never_ask_again" => Self::NeverAskAgain,
            other => Self::Unrecognised(other.to_string()),
        }
    }

    pub fn as_native(&self) -> &str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::NeverAskAgain => "never_ask_again",
            Self::Unrecognised(s) => s,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Text shown by the system consent dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermissionRationale {
    pub title: String,
    pub message: String,
    pub button_neutral: String,
    pub button_negative: String,
    pub button_positive: String,
}

impl Default for PermissionRationale {
    fn default() -> Self {
        Self {
            title: "Phone State Permission".into(),
            message: "This app needs access to phone state to detect eSIM information".into(),
            button_neutral: "Ask Me Later".into(),
            button_negative: "Cancel".into(),
            button_positive: "OK".into(),
        }
    }
}
