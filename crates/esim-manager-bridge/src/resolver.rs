// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native module resolution.
//
// The resolver probes a fixed, ordered list of lookup strategies and keeps
// the first module found for the rest of the process. When nothing is
// found the binding is `Unlinked`: resolution itself still succeeds, and
// the linking diagnostic only surfaces once a capability is called.

use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock};

use esim_manager_core::error::{EsimError, Result};
use esim_manager_core::{BridgeConfig, LinkingError, Platform};
use tracing::{debug, warn};

use crate::registry::ModuleRegistry;
use crate::traits::EsimModule;

static GLOBAL: LazyLock<Arc<ModuleResolver>> =
    LazyLock::new(|| Arc::new(ModuleResolver::for_platform(BridgeConfig::default())));

/// One way of locating the native module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Structured binding in the capability registry, keyed by capability name.
    Capability,
    /// Legacy module table, keyed by the current package's module name.
    LegacyModule,
    /// Legacy module table, keyed by the pre-rename module name.
    LegacyAlternate,
}

impl ResolutionStrategy {
    /// Probe order. The first strategy that yields a module wins.
    pub const PRIORITY: [ResolutionStrategy; 3] = [
        ResolutionStrategy::Capability,
        ResolutionStrategy::LegacyModule,
        ResolutionStrategy::LegacyAlternate,
    ];

    /// Look the module up in `registry` using this strategy's key.
    pub fn probe(
        self,
        registry: &ModuleRegistry,
        config: &BridgeConfig,
    ) -> Option<Arc<dyn EsimModule>> {
        match self {
            Self::Capability => registry.capability(&config.capability_name),
            Self::LegacyModule => registry.legacy_module(&config.module_name),
            Self::LegacyAlternate => registry.legacy_module(&config.legacy_module_name),
        }
    }
}

/// Outcome of resolution.
#[derive(Clone)]
pub enum Binding {
    Resolved {
        strategy: ResolutionStrategy,
        module: Arc<dyn EsimModule>,
    },
    /// No module was found; every capability call reports this error.
    Unlinked(LinkingError),
}

impl Binding {
    /// The resolved module, or the linking error for an unlinked binding.
    pub fn module(&self) -> Result<&Arc<dyn EsimModule>> {
        match self {
            Self::Resolved { module, .. } => Ok(module),
            Self::Unlinked(err) => Err(EsimError::NotLinked(err.clone())),
        }
    }

    pub fn strategy(&self) -> Option<ResolutionStrategy> {
        match self {
            Self::Resolved { strategy, .. } => Some(*strategy),
            Self::Unlinked(_) => None,
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { strategy, module } => f
                .debug_struct("Resolved")
                .field("strategy", strategy)
                .field("module", &module.module_name())
                .finish(),
            Self::Unlinked(err) => f
                .debug_tuple("Unlinked")
                .field(&err.package)
                .finish(),
        }
    }
}

/// Run every strategy in [`ResolutionStrategy::PRIORITY`] order.
pub fn resolve(registry: &ModuleRegistry, config: &BridgeConfig, platform: Platform) -> Binding {
    let found = ResolutionStrategy::PRIORITY
        .into_iter()
        .find_map(|strategy| strategy.probe(registry, config).map(|m| (strategy, m)));

    match found {
        Some((strategy, module)) => {
            debug!(?strategy, module = module.module_name(), "eSIM module resolved");
            Binding::Resolved { strategy, module }
        }
        None => {
            warn!(
                package = %config.package_name,
                %platform,
                "no native eSIM module registered; capability calls will fail"
            );
            Binding::Unlinked(LinkingError::new(&config.package_name, platform))
        }
    }
}

/// Owns the process's binding: resolved on first use, fixed afterwards.
pub struct ModuleResolver {
    registry: Arc<ModuleRegistry>,
    config: BridgeConfig,
    platform: Platform,
    install_glue: bool,
    binding: OnceLock<Binding>,
}

impl ModuleResolver {
    /// Create a resolver over `registry`. Nothing is probed until
    /// [`binding`](Self::binding) is first called.
    pub fn new(registry: Arc<ModuleRegistry>, config: BridgeConfig) -> Self {
        Self {
            registry,
            config,
            platform: Platform::current(),
            install_glue: false,
            binding: OnceLock::new(),
        }
    }

    /// Resolve against [`ModuleRegistry::global`], running the platform glue
    /// under `config`'s capability name right before the first probe.
    pub fn for_platform(config: BridgeConfig) -> Self {
        Self {
            install_glue: true,
            ..Self::new(ModuleRegistry::global(), config)
        }
    }

    /// Platform used for the linking diagnostic.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// The process-wide resolver over [`ModuleRegistry::global`].
    pub fn global() -> Arc<ModuleResolver> {
        Arc::clone(&GLOBAL)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn binding(&self) -> &Binding {
        self.binding.get_or_init(|| {
            if self.install_glue {
                self.registry.ensure_platform_modules(&self.config);
            }
            resolve(&self.registry, &self.config, self.platform)
        })
    }
}
