// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the eSIM bridge.

use thiserror::Error;

use crate::platform::Platform;

/// Top-level error type for all bridge operations.
#[derive(Debug, Error)]
pub enum EsimError {
    // -- Resolution --
    #[error(transparent)]
    NotLinked(#[from] LinkingError),

    // -- Native module --
    #[error("native `{method}` failed [{code}]: {message}")]
    Native {
        method: String,
        code: String,
        message: String,
    },

    #[error("permission request failed: {0}")]
    PermissionRequest(String),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EsimError>;

/// Raised lazily when no native module could be resolved.
///
/// Cloneable so that every call through an unlinked binding reports the
/// same diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LinkingError {
    pub package: String,
    pub platform: Platform,
    pub message: String,
}

impl LinkingError {
    pub fn new(package: &str, platform: Platform) -> Self {
        let mut message =
            format!("The package '{package}' doesn't seem to be linked. Make sure: \n\n");
        message.push_str(remediation_for(platform));
        message.push_str("- You rebuilt the app after installing the package\n");
        message.push_str("- You are not using Expo Go\n");
        Self {
            package: package.to_string(),
            platform,
            message,
        }
    }
}

/// The single platform-specific line of the linking diagnostic.
fn remediation_for(platform: Platform) -> &'static str {
    match platform {
        Platform::Ios => "- You have run 'cd ios && pod install'\n",
        _ => "",
    }
}
