// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EsimError, Result};
use crate::permission::PermissionRationale;

/// Names the native side registers under, plus the consent dialog text.
///
/// Missing keys in a config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Distribution name reported in the linking diagnostic.
    pub package_name: String,
    /// Key in the modern capability registry.
    pub capability_name: String,
    /// Legacy module-table key for the current package.
    pub module_name: String,
    /// Legacy module-table key used by the package before it was renamed.
    pub legacy_module_name: String,
    /// Dialog text for the phone-state permission request.
    pub permission_rationale: PermissionRationale,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            package_name: "esim-manager".into(),
            capability_name: "EsimManager".into(),
            module_name: "EsimManager".into(),
            legacy_module_name: "ReactNativeEsimManager".into(),
            permission_rationale: PermissionRationale::default(),
        }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("package_name", &self.package_name),
            ("capability_name", &self.capability_name),
            ("module_name", &self.module_name),
            ("legacy_module_name", &self.legacy_module_name),
        ] {
            if value.trim().is_empty() {
                return Err(EsimError::Config(format!("`{key}` must not be empty")));
            }
        }
        Ok(())
    }
}
