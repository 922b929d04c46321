// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide tables that native glue registers eSIM modules into.
//
// Two tables exist side by side: the capability registry (structured
// bindings, looked up by capability name) and the legacy module table
// (looked up by package/module name). The resolver reads both; nothing in
// this crate removes entries.
//
// The platform glue is installed on demand by the resolver, once per
// capability name, so building a registry or a facade never touches the
// native side.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock, Mutex, RwLock};

use esim_manager_core::BridgeConfig;
use tracing::debug;

use crate::traits::EsimModule;

type ModuleTable = RwLock<HashMap<String, Arc<dyn EsimModule>>>;

static GLOBAL: LazyLock<Arc<ModuleRegistry>> = LazyLock::new(|| Arc::new(ModuleRegistry::new()));

/// Named lookup tables for native eSIM modules.
#[derive(Default)]
pub struct ModuleRegistry {
    capabilities: ModuleTable,
    legacy: ModuleTable,
    installed: Mutex<HashSet<String>>,
}

impl ModuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.
    ///
    /// Starts empty. The platform glue registers into it the first time a
    /// resolver over it resolves; host code may register modules at any time.
    pub fn global() -> Arc<ModuleRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Run the platform glue for `config`'s capability name, at most once
    /// per name.
    pub fn ensure_platform_modules(&self, config: &BridgeConfig) {
        let first = self
            .installed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(config.capability_name.clone());
        if first {
            crate::install_platform_modules(self, config);
        }
    }

    /// Register a structured binding. Replaces any entry with the same name.
    pub fn register_capability(&self, name: &str, module: Arc<dyn EsimModule>) {
        debug!(name, module = module.module_name(), "registering eSIM capability");
        write(&self.capabilities).insert(name.to_string(), module);
    }

    /// Register a module in the legacy table. Replaces any entry with the
    /// same name.
    pub fn register_legacy(&self, name: &str, module: Arc<dyn EsimModule>) {
        debug!(name, module = module.module_name(), "registering legacy eSIM module");
        write(&self.legacy).insert(name.to_string(), module);
    }

    pub fn capability(&self, name: &str) -> Option<Arc<dyn EsimModule>> {
        read(&self.capabilities).get(name).cloned()
    }

    pub fn legacy_module(&self, name: &str) -> Option<Arc<dyn EsimModule>> {
        read(&self.legacy).get(name).cloned()
    }
}

// A poisoned table only means a writer panicked mid-insert; the map itself
// is still consistent, so keep serving it.
fn read(
    table: &ModuleTable,
) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<dyn EsimModule>>> {
    table.read().unwrap_or_else(|e| e.into_inner())
}

fn write(
    table: &ModuleTable,
) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<dyn EsimModule>>> {
    table.write().unwrap_or_else(|e| e.into_inner())
}
