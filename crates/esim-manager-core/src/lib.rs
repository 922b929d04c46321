// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// eSIM Manager: core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod permission;
pub mod platform;
pub mod types;

pub use config::BridgeConfig;
pub use error::{EsimError, LinkingError};
pub use permission::{PermissionRationale, PermissionStatus, READ_PHONE_STATE};
pub use platform::Platform;
pub use types::*;
