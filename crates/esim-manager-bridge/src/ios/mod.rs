// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS native channel via objc2.
//
// Requires compilation with the iOS SDK (Xcode). The CoreTelephony work
// (CTCellularPlanProvisioning, CTTelephonyNetworkInfo) is done by the
// Objective-C class `EsimManagerBridge`, linked into the host app. It must
// expose:
//
//   + (NSString *)invoke:(NSString *)method payload:(NSString *)payload;
//
// returning the JSON envelope described in `channel.rs`. Rejections must be
// reported through the envelope: an Objective-C exception unwinding into
// Rust aborts the process.

#![cfg(target_os = "ios")]

use std::ffi::CStr;
use std::sync::Arc;

use objc2::msg_send;
use objc2::rc::Retained;
use objc2::runtime::AnyClass;
use objc2_foundation::NSString;

use esim_manager_core::BridgeConfig;
use esim_manager_core::error::{EsimError, Result};

use crate::channel::ChannelModule;
use crate::registry::ModuleRegistry;
use crate::traits::NativeChannel;

/// Objective-C half of the bridge.
pub const BRIDGE_CLASS: &CStr = c"EsimManagerBridge";

/// [`NativeChannel`] over `+[EsimManagerBridge invoke:payload:]`.
pub struct ObjcChannel {
    class_name: &'static CStr,
}

impl Default for ObjcChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjcChannel {
    pub fn new() -> Self {
        Self::for_class(BRIDGE_CLASS)
    }

    pub fn for_class(class_name: &'static CStr) -> Self {
        Self { class_name }
    }

    fn class(&self) -> Result<&'static AnyClass> {
        AnyClass::get(self.class_name).ok_or_else(|| {
            EsimError::Bridge(format!(
                "Objective-C class {} is not registered",
                self.class_name.to_string_lossy()
            ))
        })
    }

    /// Whether the class is registered with the objc runtime.
    pub fn is_available(&self) -> bool {
        self.class().is_ok()
    }
}

impl NativeChannel for ObjcChannel {
    fn transport(&self) -> &str {
        "objc"
    }

    fn invoke(&self, method: &str, payload: &str) -> Result<String> {
        let class = self.class()?;
        let ns_method = NSString::from_str(method);
        let ns_payload = NSString::from_str(payload);

        // SAFETY: `invoke:payload:` is a class method taking two NSString
        // arguments and returning an autoreleased (possibly nil) NSString;
        // the signature is part of the bridge contract documented above.
        let envelope: Option<Retained<NSString>> =
            unsafe { msg_send![class, invoke: &*ns_method, payload: &*ns_payload] };

        envelope.map(|s| s.to_string()).ok_or_else(|| {
            EsimError::Bridge(format!("EsimManagerBridge returned nil for `{method}`"))
        })
    }
}

/// Register the objc-backed module under the capability name when the
/// class is linked into the app.
pub fn install(registry: &ModuleRegistry, config: &BridgeConfig) {
    let channel = ObjcChannel::new();
    if channel.is_available() {
        tracing::info!("iOS eSIM bridge found");
        registry.register_capability(
            &config.capability_name,
            Arc::new(ChannelModule::new(channel)),
        );
    } else {
        tracing::debug!("iOS eSIM bridge class not registered");
    }
}
