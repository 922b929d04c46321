// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted native doubles shared by the unit tests.

use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use esim_manager_core::error::{EsimError, Result};
use esim_manager_core::{
    CellularPlan, EsimInfo, EsimInstallationData, PermissionRationale, PermissionStatus,
};

use crate::traits::{EsimModule, PermissionRequester};

/// How a scripted operation answers.
#[derive(Clone)]
pub enum Reply<T> {
    Value(T),
    Reject { code: &'static str, message: &'static str },
}

impl<T: Clone> Reply<T> {
    fn answer(&self, method: &str) -> Result<T> {
        match self {
            Reply::Value(v) => Ok(v.clone()),
            Reply::Reject { code, message } => Err(EsimError::Native {
                method: method.to_string(),
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// Native module whose answers are fixed up front.
pub struct FakeModule {
    name: String,
    pub supported: Reply<bool>,
    pub enabled: Reply<bool>,
    pub info: Reply<EsimInfo>,
    pub install: Reply<bool>,
    pub plans: Reply<Vec<CellularPlan>>,
    calls: AtomicUsize,
    installs: Mutex<Vec<EsimInstallationData>>,
}

impl FakeModule {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            supported: Reply::Value(true),
            enabled: Reply::Value(true),
            info: Reply::Value(EsimInfo::default()),
            install: Reply::Value(true),
            plans: Reply::Value(Vec::new()),
            calls: AtomicUsize::new(0),
            installs: Mutex::new(Vec::new()),
        }
    }

    pub fn into_arc(self) -> Arc<dyn EsimModule> {
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Installation data exactly as the module received it.
    pub fn installs(&self) -> Vec<EsimInstallationData> {
        self.installs.lock().unwrap().clone()
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl EsimModule for FakeModule {
    fn module_name(&self) -> &str {
        &self.name
    }

    async fn is_esim_supported(&self) -> Result<bool> {
        self.record();
        self.supported.answer("isEsimSupported")
    }

    async fn is_esim_enabled(&self) -> Result<bool> {
        self.record();
        self.enabled.answer("isEsimEnabled")
    }

    async fn get_esim_info(&self) -> Result<EsimInfo> {
        self.record();
        self.info.answer("getEsimInfo")
    }

    async fn install_esim_profile(&self, data: &EsimInstallationData) -> Result<bool> {
        self.record();
        self.installs.lock().unwrap().push(data.clone());
        // Yield so concurrent installs interleave.
        tokio::task::yield_now().await;
        self.install.answer("installEsimProfile")
    }

    async fn get_cellular_plans(&self) -> Result<Vec<CellularPlan>> {
        self.record();
        self.plans.answer("getCellularPlans")
    }
}

/// Permission primitive with a fixed answer.
pub struct FakePermissions {
    answer: std::result::Result<PermissionStatus, String>,
    requests: Mutex<Vec<(String, PermissionRationale)>>,
}

impl FakePermissions {
    pub fn answering(status: PermissionStatus) -> Self {
        Self {
            answer: Ok(status),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<(String, PermissionRationale)> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PermissionRequester for FakePermissions {
    async fn request(
        &self,
        permission: &str,
        rationale: &PermissionRationale,
    ) -> Result<PermissionStatus> {
        self.requests
            .lock()
            .unwrap()
            .push((permission.to_string(), rationale.clone()));
        self.answer
            .clone()
            .map_err(EsimError::PermissionRequest)
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
///
/// Relies on the current-thread runtime of `#[tokio::test]` so the future
/// is polled on the thread holding the subscriber.
pub async fn capture_logs<F, Fut, T>(f: F) -> (T, String)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let guard = tracing::subscriber::set_default(subscriber);
    let out = f().await;
    drop(guard);

    let logs = String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned();
    (out, logs)
}
