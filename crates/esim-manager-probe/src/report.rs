// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Probe report: one entry per bridge operation.

use esim_manager_bridge::{EsimManager, ResolutionStrategy};
use esim_manager_core::error::Result;
use esim_manager_core::{CellularPlan, EsimInfo, EsimInstallationData, Platform};
use serde::Serialize;

/// Result of a single operation, as `{"ok": ...}` or `{"error": "..."}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok(T),
    Error(String),
}

impl<T> Outcome<T> {
    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(v) => Outcome::Ok(v),
            Err(e) => Outcome::Error(e.to_string()),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProbeOptions {
    pub request_permissions: bool,
    pub install: Option<EsimInstallationData>,
}

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub platform: Platform,
    /// Lookup strategy that found the native module; `null` when unlinked.
    pub binding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions_granted: Option<bool>,
    pub is_esim_supported: Outcome<bool>,
    pub is_esim_enabled: Outcome<bool>,
    pub esim_info: Outcome<EsimInfo>,
    pub cellular_plans: Outcome<Vec<CellularPlan>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<Outcome<bool>>,
}

impl ProbeReport {
    /// True when no capability call produced a value.
    pub fn all_failed(&self) -> bool {
        self.is_esim_supported.is_err()
            && self.is_esim_enabled.is_err()
            && self.esim_info.is_err()
            && self.cellular_plans.is_err()
            && self.install.as_ref().is_none_or(Outcome::is_err)
    }
}

fn strategy_name(strategy: ResolutionStrategy) -> &'static str {
    match strategy {
        ResolutionStrategy::Capability => "capability",
        ResolutionStrategy::LegacyModule => "legacy_module",
        ResolutionStrategy::LegacyAlternate => "legacy_alternate",
    }
}

/// Run the operations one after another, in the order an app would.
pub async fn run_probe(
    manager: &EsimManager,
    platform: Platform,
    options: &ProbeOptions,
) -> ProbeReport {
    let permissions_granted = if options.request_permissions {
        Some(manager.request_permissions().await)
    } else {
        None
    };

    let is_esim_supported = manager.is_esim_supported().await.into();
    let is_esim_enabled = manager.is_esim_enabled().await.into();
    let esim_info = manager.get_esim_info().await.into();
    let cellular_plans = manager.get_cellular_plans().await.into();
    let install = match &options.install {
        Some(data) => Some(manager.install_esim_profile(data).await.into()),
        None => None,
    };

    ProbeReport {
        platform,
        binding: manager
            .binding_strategy()
            .map(|s| strategy_name(s).to_string()),
        permissions_granted,
        is_esim_supported,
        is_esim_enabled,
        esim_info,
        cellular_plans,
        install,
    }
}
