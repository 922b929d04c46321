// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The public eSIM API.
//
// `EsimManager` is stateless apart from references to the resolver and the
// permission primitive. The five capability calls forward to the resolved
// native module and hand its result or error back untouched. None of them
// negotiates permissions; callers invoke `request_permissions` themselves.

use std::sync::Arc;

use esim_manager_core::error::Result;
use esim_manager_core::{
    BridgeConfig, CellularPlan, EsimInfo, EsimInstallationData, PermissionRationale, Platform,
};

use crate::permissions;
use crate::resolver::{ModuleResolver, ResolutionStrategy};
use crate::traits::{EsimModule, PermissionRequester};

/// Uniform async access to the device's eSIM capability.
///
/// Cheap to clone. Building one never probes for the native module and
/// never fails; an unlinked environment only shows up when a capability is
/// called.
#[derive(Clone)]
pub struct EsimManager {
    resolver: Arc<ModuleResolver>,
    permissions: Arc<dyn PermissionRequester>,
    platform: Option<Platform>,
    rationale: PermissionRationale,
}

impl Default for EsimManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EsimManager {
    /// Use the process-wide resolver and this platform's permission primitive.
    pub fn new() -> Self {
        Self::with_parts(ModuleResolver::global(), crate::platform_permissions())
    }

    /// Resolve against the global registry using custom lookup keys and
    /// dialog text. The platform glue registers under `config`'s capability
    /// name on the first capability call.
    pub fn from_config(config: BridgeConfig) -> Self {
        let resolver = Arc::new(ModuleResolver::for_platform(config));
        Self::with_parts(resolver, crate::platform_permissions())
    }

    pub fn with_parts(
        resolver: Arc<ModuleResolver>,
        permissions: Arc<dyn PermissionRequester>,
    ) -> Self {
        let rationale = resolver.config().permission_rationale.clone();
        Self {
            resolver,
            permissions,
            platform: None,
            rationale,
        }
    }

    /// Pin the platform identity instead of reading it on every call.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_rationale(mut self, rationale: PermissionRationale) -> Self {
        self.rationale = rationale;
        self
    }

    /// Which lookup strategy produced the native module, if any.
    pub fn binding_strategy(&self) -> Option<ResolutionStrategy> {
        self.resolver.binding().strategy()
    }

    /// Ask for phone-state access where the platform requires it.
    ///
    /// `true` when access is available. Denial, "never ask again" and a
    /// failing request are all `false`; this never returns an error.
    pub async fn request_permissions(&self) -> bool {
        let platform = self.platform.unwrap_or_else(Platform::current);
        permissions::negotiate(platform, self.permissions.as_ref(), &self.rationale).await
    }

    /// Check if the device supports eSIM.
    pub async fn is_esim_supported(&self) -> Result<bool> {
        self.module()?.is_esim_supported().await
    }

    /// Check if an eSIM is currently enabled/active.
    pub async fn is_esim_enabled(&self) -> Result<bool> {
        self.module()?.is_esim_enabled().await
    }

    pub async fn get_esim_info(&self) -> Result<EsimInfo> {
        self.module()?.get_esim_info().await
    }

    /// Install an eSIM profile.
    ///
    /// iOS installs directly from the activation code; Android opens the
    /// system eSIM settings. `data` is forwarded as given.
    pub async fn install_esim_profile(&self, data: &EsimInstallationData) -> Result<bool> {
        self.module()?.install_esim_profile(data).await
    }

    pub async fn get_cellular_plans(&self) -> Result<Vec<CellularPlan>> {
        self.module()?.get_cellular_plans().await
    }

    fn module(&self) -> Result<&Arc<dyn EsimModule>> {
        self.resolver.binding().module()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ModuleRegistry;
    use crate::test_support::{FakeModule, FakePermissions, Reply, capture_logs};
    use esim_manager_core::{EsimError, PermissionStatus};

    fn manager_over(module: Arc<FakeModule>) -> EsimManager {
        let registry = Arc::new(ModuleRegistry::new());
        registry.register_capability("EsimManager", module);
        let resolver = Arc::new(ModuleResolver::new(registry, BridgeConfig::default()));
        EsimManager::with_parts(
            resolver,
            Arc::new(FakePermissions::answering(PermissionStatus::Granted)),
        )
    }

    fn unlinked_manager() -> EsimManager {
        let resolver = Arc::new(
            ModuleResolver::new(Arc::new(ModuleRegistry::new()), BridgeConfig::default())
                .with_platform(Platform::Ios),
        );
        EsimManager::with_parts(
            resolver,
            Arc::new(FakePermissions::answering(PermissionStatus::Granted)),
        )
    }

    fn assert_not_linked<T>(result: Result<T>) {
        match result {
            Err(EsimError::NotLinked(e)) => {
                assert!(e.message.contains("'esim-manager'"));
                assert!(e.message.contains("You rebuilt the app"));
                assert!(e.message.contains("pod install"));
            }
            Err(other) => panic!("expected linking error, got {other}"),
            Ok(_) => panic!("expected linking error, got a value"),
        }
    }

    #[tokio::test]
    async fn unlinked_manager_builds_but_every_capability_fails() {
        let manager = unlinked_manager();

        assert_not_linked(manager.is_esim_supported().await);
        assert_not_linked(manager.is_esim_enabled().await);
        assert_not_linked(manager.get_esim_info().await);
        assert_not_linked(
            manager
                .install_esim_profile(&EsimInstallationData::new("LPA:1$x$y"))
                .await,
        );
        assert_not_linked(manager.get_cellular_plans().await);
        assert_eq!(manager.binding_strategy(), None);
    }

    fn assert_desktop_not_linked<T>(result: Result<T>, package: &str) {
        match result {
            Err(EsimError::NotLinked(e)) => {
                assert!(e.message.contains(&format!("'{package}'")));
                assert!(e.message.contains("You are not using Expo Go"));
            }
            Err(other) => panic!("expected linking error, got {other}"),
            Ok(_) => panic!("expected linking error, got a value"),
        }
    }

    #[tokio::test]
    async fn default_manager_builds_quietly_and_reports_unlinked() {
        let (manager, logs) = capture_logs(|| async { EsimManager::new() }).await;
        assert!(!logs.contains("no native eSIM glue"));
        assert!(!logs.contains("no native eSIM module registered"));

        assert_desktop_not_linked(manager.is_esim_supported().await, "esim-manager");
        assert_desktop_not_linked(manager.is_esim_enabled().await, "esim-manager");
        assert_desktop_not_linked(manager.get_esim_info().await, "esim-manager");
        assert_desktop_not_linked(
            manager
                .install_esim_profile(&EsimInstallationData::new("LPA:1$x$y"))
                .await,
            "esim-manager",
        );
        assert_desktop_not_linked(manager.get_cellular_plans().await, "esim-manager");
        assert_eq!(manager.binding_strategy(), None);
    }

    #[tokio::test]
    async fn configured_manager_installs_glue_under_its_own_capability_name() {
        let config = BridgeConfig {
            package_name: "carrier-esim".into(),
            capability_name: "CarrierEsimFacade".into(),
            ..BridgeConfig::default()
        };

        let (manager, built) = capture_logs(|| async { EsimManager::from_config(config) }).await;
        assert!(!built.contains("no native eSIM glue"));

        let (result, first_call) = capture_logs(|| manager.get_esim_info()).await;
        assert!(first_call.contains("capability=CarrierEsimFacade"));
        assert_desktop_not_linked(result, "carrier-esim");
    }

    #[tokio::test]
    async fn permissions_work_without_a_native_module() {
        let manager = unlinked_manager().with_platform(Platform::Android);
        assert!(manager.request_permissions().await);
    }

    #[tokio::test]
    async fn values_pass_through_unchanged() {
        let info = EsimInfo {
            is_esim_supported: true,
            is_esim_enabled: true,
            carrier_name: Some("Test Carrier".into()),
            iccid: Some("1234567890123456789".into()),
            mobile_country_code: Some("310".into()),
            mobile_network_code: Some("260".into()),
        };
        let plans = vec![CellularPlan {
            carrier_name: "Test Carrier 1".into(),
            mobile_country_code: "310".into(),
            mobile_network_code: "260".into(),
            slot_id: Some("0001".into()),
            subscription_id: None,
            is_embedded: Some(true),
        }];
        let mut fake = FakeModule::named("fake");
        fake.enabled = Reply::Value(false);
        fake.info = Reply::Value(info.clone());
        fake.plans = Reply::Value(plans.clone());
        let fake = Arc::new(fake);
        let manager = manager_over(Arc::clone(&fake));

        assert!(manager.is_esim_supported().await.unwrap());
        assert!(!manager.is_esim_enabled().await.unwrap());
        assert_eq!(manager.get_esim_info().await.unwrap(), info);
        assert_eq!(manager.get_cellular_plans().await.unwrap(), plans);
        assert_eq!(fake.calls(), 4);
        assert_eq!(manager.binding_strategy(), Some(ResolutionStrategy::Capability));
    }

    #[tokio::test]
    async fn empty_plan_list_is_returned_as_is() {
        let manager = manager_over(Arc::new(FakeModule::named("fake")));
        assert!(manager.get_cellular_plans().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn declined_install_forwards_data_verbatim() {
        let mut fake = FakeModule::named("fake");
        fake.install = Reply::Value(false);
        let fake = Arc::new(fake);
        let manager = manager_over(Arc::clone(&fake));

        let data = EsimInstallationData::new("LPA:1$x$y");
        assert!(!manager.install_esim_profile(&data).await.unwrap());
        assert_eq!(fake.installs(), vec![data]);
    }

    #[tokio::test]
    async fn confirmation_code_is_forwarded() {
        let fake = Arc::new(FakeModule::named("fake"));
        let manager = manager_over(Arc::clone(&fake));

        let data = EsimInstallationData::new("LPA:1$test$code").with_confirmation_code("confirm");
        assert!(manager.install_esim_profile(&data).await.unwrap());
        assert_eq!(fake.installs()[0].confirmation_code.as_deref(), Some("confirm"));
    }

    #[tokio::test]
    async fn native_errors_pass_through_unchanged() {
        let mut fake = FakeModule::named("fake");
        fake.supported = Reply::Reject { code: "ERROR", message: "Native error" };
        fake.enabled = Reply::Reject {
            code: "PERMISSION_DENIED",
            message: "read_phone_state permission is required",
        };
        fake.install = Reply::Reject { code: "NO_ACTIVITY", message: "Installation failed" };
        fake.plans = Reply::Reject { code: "ERROR", message: "Native error" };
        let manager = manager_over(Arc::new(fake));

        match manager.is_esim_supported().await {
            Err(EsimError::Native { method, code, message }) => {
                assert_eq!(method, "isEsimSupported");
                assert_eq!(code, "ERROR");
                assert_eq!(message, "Native error");
            }
            other => panic!("unexpected: {:?}", other.map_err(|e| e.to_string())),
        }
        let err = manager.is_esim_enabled().await.unwrap_err();
        assert!(matches!(err, EsimError::Native { ref code, .. } if code == "PERMISSION_DENIED"));
        let err = manager
            .install_esim_profile(&EsimInstallationData::new("LPA:1$test$code"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Installation failed"));
        assert!(manager.get_cellular_plans().await.is_err());
    }

    #[tokio::test]
    async fn capability_calls_do_not_negotiate_permissions() {
        let permissions = Arc::new(FakePermissions::answering(PermissionStatus::Denied));
        let registry = Arc::new(ModuleRegistry::new());
        registry.register_capability("EsimManager", Arc::new(FakeModule::named("fake")));
        let resolver = Arc::new(ModuleResolver::new(registry, BridgeConfig::default()));
        let manager = EsimManager::with_parts(resolver, permissions.clone())
            .with_platform(Platform::Android);

        manager.is_esim_supported().await.unwrap();
        manager.get_cellular_plans().await.unwrap();
        assert_eq!(permissions.calls(), 0);
    }

    #[tokio::test]
    async fn concurrent_installs_are_both_forwarded() {
        let fake = Arc::new(FakeModule::named("fake"));
        let manager = manager_over(Arc::clone(&fake));
        let a = EsimInstallationData::new("LPA:1$a$1");
        let b = EsimInstallationData::new("LPA:1$b$2");

        let (ra, rb) = tokio::join!(
            manager.install_esim_profile(&a),
            manager.install_esim_profile(&b)
        );
        assert!(ra.unwrap() && rb.unwrap());
        let installs = fake.installs();
        assert_eq!(installs.len(), 2);
        assert!(installs.contains(&a) && installs.contains(&b));
    }

    #[tokio::test]
    async fn android_denial_and_failure_are_false() {
        let resolver = Arc::new(ModuleResolver::new(
            Arc::new(ModuleRegistry::new()),
            BridgeConfig::default(),
        ));
        let denied = EsimManager::with_parts(
            Arc::clone(&resolver),
            Arc::new(FakePermissions::answering(PermissionStatus::NeverAskAgain)),
        )
        .with_platform(Platform::Android);
        assert!(!denied.request_permissions().await);

        let broken = EsimManager::with_parts(
            resolver,
            Arc::new(FakePermissions::failing("PermissionsAndroid unavailable")),
        )
        .with_platform(Platform::Android);
        let (granted, logs) = capture_logs(|| broken.request_permissions()).await;
        assert!(!granted);
        assert!(logs.contains("PermissionsAndroid unavailable"));
    }

    #[tokio::test]
    async fn ios_never_calls_the_permission_primitive() {
        let permissions = Arc::new(FakePermissions::failing("must not be called"));
        let manager = EsimManager::with_parts(
            Arc::new(ModuleResolver::new(
                Arc::new(ModuleRegistry::new()),
                BridgeConfig::default(),
            )),
            permissions.clone(),
        )
        .with_platform(Platform::Ios);

        assert!(manager.request_permissions().await);
        assert_eq!(permissions.calls(), 0);
    }

    #[tokio::test]
    async fn custom_rationale_reaches_the_primitive() {
        let permissions = Arc::new(FakePermissions::answering(PermissionStatus::Granted));
        let rationale = PermissionRationale {
            title: "SIM access".into(),
            ..PermissionRationale::default()
        };
        let manager = EsimManager::with_parts(
            Arc::new(ModuleResolver::new(
                Arc::new(ModuleRegistry::new()),
                BridgeConfig::default(),
            )),
            permissions.clone(),
        )
        .with_platform(Platform::Android)
        .with_rationale(rationale);

        assert!(manager.request_permissions().await);
        assert_eq!(permissions.last_request().unwrap().1.title, "SIM access");
    }
}
