// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android native channel via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. The eSIM work itself (TelephonyManager,
// SubscriptionManager, EuiccManager, the READ_PHONE_STATE dialog) is done
// by the Java class `com.esimmanager.EsimManagerBridge`, which the host app
// ships. It must expose:
//
//   public static String invoke(Context context, String method, String payload)
//
// returning the JSON envelope described in `channel.rs`. The class is loaded
// through the Activity's class loader because `FindClass` on a native-attached
// thread only sees system classes.

#![cfg(target_os = "android")]

use std::sync::Arc;

use jni::objects::{JClass, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};
use ndk_context::AndroidContext;

use esim_manager_core::BridgeConfig;
use esim_manager_core::error::{EsimError, Result};

use crate::channel::ChannelModule;
use crate::registry::ModuleRegistry;
use crate::traits::NativeChannel;

/// Binary name of the Java half of the bridge.
pub const BRIDGE_CLASS: &str = "com.esimmanager.EsimManagerBridge";

/// JNI signature of `EsimManagerBridge.invoke`.
const INVOKE_SIG: &str =
    "(Landroid/content/Context;Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;";

/// Local references one bridge call creates: class loader, class name,
/// class, method and payload strings, envelope, and a possible throwable.
const LOCAL_FRAME_CAPACITY: i32 = 16;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// The global Android context set by `android_main` /
/// `ANativeActivity_onCreate`.
///
/// `ndk_context` panics when the host never initialised it; that is turned
/// into a bridge error so a misconfigured host only loses the eSIM module.
fn android_context() -> Result<AndroidContext> {
    std::panic::catch_unwind(ndk_context::android_context)
        .map_err(|_| EsimError::Bridge("Android context not initialised".into()))
}

/// Attach the current thread to the JVM and run `f` with the hosting
/// Activity.
///
/// `f` runs inside its own local frame. On a thread the JVM already knows
/// the attach guard never detaches, so local references would otherwise
/// pile up across calls.
fn with_activity<T>(f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
    let ctx = android_context()?;
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| EsimError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| EsimError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(EsimError::Bridge(
            "Android context is null; native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    let activity = unsafe { JObject::from_raw(ptr.cast()) };
    env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| {
        Ok::<_, jni::errors::Error>(f(env, &activity))
    })
    .map_err(|e| EsimError::Bridge(format!("failed to push JNI local frame: {e}")))?
}

/// Clear a pending Java exception and return its `toString()`.
fn take_exception(env: &mut JNIEnv<'_>) -> Option<String> {
    if !env.exception_check().unwrap_or(false) {
        return None;
    }
    let throwable = env.exception_occurred().ok()?;
    env.exception_clear().ok()?;
    let text = env
        .call_method(&throwable, "toString", "()Ljava/lang/String;", &[])
        .ok()?
        .l()
        .ok()?;
    env.get_string(&JString::from(text)).ok().map(Into::into)
}

/// Map a `jni::errors::Error`, clearing any pending exception so the
/// thread stays usable.
fn jni_err(env: &mut JNIEnv<'_>, context: &str, e: jni::errors::Error) -> EsimError {
    match take_exception(env) {
        Some(exception) => EsimError::Bridge(format!("{context}: {exception}")),
        None => EsimError::Bridge(format!("{context}: {e}")),
    }
}

fn load_bridge_class<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject<'_>,
    class_name: &str,
) -> Result<JClass<'local>> {
    let loader = match env
        .call_method(activity, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .and_then(|v| v.l())
    {
        Ok(loader) => loader,
        Err(e) => return Err(jni_err(env, "getClassLoader", e)),
    };
    let j_name = match env.new_string(class_name) {
        Ok(s) => s,
        Err(e) => return Err(jni_err(env, "new_string(class_name)", e)),
    };
    match env
        .call_method(
            &loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&j_name)],
        )
        .and_then(|v| v.l())
    {
        Ok(class) => Ok(JClass::from(class)),
        Err(e) => Err(jni_err(env, "ClassLoader.loadClass", e)),
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// [`NativeChannel`] over the static `EsimManagerBridge.invoke` method.
///
/// Zero state beyond the class name; the class is looked up on every call
/// so that the channel can be built before the Activity exists.
pub struct JniChannel {
    class_name: String,
}

impl Default for JniChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl JniChannel {
    pub fn new() -> Self {
        Self::for_class(BRIDGE_CLASS)
    }

    pub fn for_class(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
        }
    }

    /// Check that the Java half is present without calling into it.
    pub fn probe(&self) -> Result<()> {
        with_activity(|env, activity| load_bridge_class(env, activity, &self.class_name).map(|_| ()))
    }
}

impl NativeChannel for JniChannel {
    fn transport(&self) -> &str {
        "JNI"
    }

    fn invoke(&self, method: &str, payload: &str) -> Result<String> {
        with_activity(|env, activity| {
            let class = load_bridge_class(env, activity, &self.class_name)?;
            let j_method = match env.new_string(method) {
                Ok(s) => s,
                Err(e) => return Err(jni_err(env, "new_string(method)", e)),
            };
            let j_payload = match env.new_string(payload) {
                Ok(s) => s,
                Err(e) => return Err(jni_err(env, "new_string(payload)", e)),
            };

            let result = env
                .call_static_method(
                    &class,
                    "invoke",
                    INVOKE_SIG,
                    &[
                        JValue::Object(activity),
                        JValue::Object(&j_method),
                        JValue::Object(&j_payload),
                    ],
                )
                .and_then(|v| v.l());
            let envelope = match result {
                Ok(obj) => obj,
                Err(e) => {
                    // A throwing bridge is a native rejection, not a glue fault.
                    return Err(match take_exception(env) {
                        Some(message) => EsimError::Native {
                            method: method.to_string(),
                            code: "ERROR".into(),
                            message,
                        },
                        None => EsimError::Bridge(format!("EsimManagerBridge.invoke: {e}")),
                    });
                }
            };
            if envelope.is_null() {
                return Err(EsimError::Bridge(format!(
                    "EsimManagerBridge.invoke returned null for `{method}`"
                )));
            }

            let j_envelope = JString::from(envelope);
            match env.get_string(&j_envelope) {
                Ok(s) => Ok(s.into()),
                Err(e) => Err(jni_err(env, "get_string(envelope)", e)),
            }
        })
    }
}

/// Register the JNI-backed module under the capability name when the Java
/// half is loadable.
pub fn install(registry: &ModuleRegistry, config: &BridgeConfig) {
    let channel = JniChannel::new();
    match channel.probe() {
        Ok(()) => {
            tracing::info!(class = BRIDGE_CLASS, "Android eSIM bridge found");
            registry.register_capability(
                &config.capability_name,
                Arc::new(ChannelModule::new(channel)),
            );
        }
        Err(e) => {
            tracing::debug!(class = BRIDGE_CLASS, error = %e, "Android eSIM bridge not loadable");
        }
    }
}
