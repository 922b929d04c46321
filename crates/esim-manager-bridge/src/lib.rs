// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! eSIM Manager: native capability resolution and permission negotiation.
//!
//! The crate finds the native eSIM module through an ordered list of lookup
//! strategies, negotiates the Android runtime permission, and exposes the
//! whole thing through [`EsimManager`], a small async facade that forwards
//! each call verbatim to the native side.
//!
//! iOS talks to the native module through `objc2`, Android through `jni`.
//! Desktop/CI builds get a stub that registers nothing, so every capability
//! call reports the linking diagnostic.

pub mod channel;
pub mod facade;
pub mod permissions;
pub mod registry;
pub mod resolver;
pub mod stub;
pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use esim_manager_core::BridgeConfig;

pub use facade::EsimManager;
pub use registry::ModuleRegistry;
pub use resolver::{Binding, ModuleResolver, ResolutionStrategy};
pub use traits::{EsimModule, NativeChannel, PermissionRequester};

/// Register this platform's native module(s) into `registry`.
///
/// Called through [`ModuleRegistry::ensure_platform_modules`], once per
/// capability name. Registers nothing when the native side is absent;
/// resolution then falls through to `Unlinked`.
pub fn install_platform_modules(registry: &ModuleRegistry, config: &BridgeConfig) {
    #[cfg(target_os = "ios")]
    {
        // iOS: Objective-C class looked up through the objc runtime.
        ios::install(registry, config)
    }
    #[cfg(target_os = "android")]
    {
        // Android: Java class loaded through the Activity's class loader.
        android::install(registry, config)
    }
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        stub::install(registry, config)
    }
}

/// The permission-request primitive for the target operating system.
pub fn platform_permissions() -> Arc<dyn PermissionRequester> {
    #[cfg(target_os = "android")]
    {
        Arc::new(channel::ChannelPermissions::new(android::JniChannel::new()))
    }
    #[cfg(not(target_os = "android"))]
    {
        // No runtime consent model; negotiation never reaches the primitive.
        Arc::new(stub::StubPermissions)
    }
}
