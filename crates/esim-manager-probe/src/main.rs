// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// esim-probe: exercise the eSIM bridge on the current device.
//
// Entry point. Initialises logging, loads the bridge config, runs every
// operation once, and prints the JSON report on stdout.

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use esim_manager_bridge::EsimManager;
use esim_manager_core::{BridgeConfig, EsimInstallationData, Platform};

use report::{ProbeOptions, run_probe};

#[derive(Parser)]
#[command(name = "esim-probe")]
#[command(about = "Run every eSIM bridge operation and print a JSON report")]
struct Args {
    /// Path to a JSON bridge configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat the host as this platform for permission negotiation
    #[arg(long)]
    platform: Option<Platform>,

    /// Activation code to install (e.g. "LPA:1$smdp.example.com$CODE")
    #[arg(long)]
    install: Option<String>,

    /// Confirmation code sent along with the activation code
    #[arg(long, requires = "install")]
    confirmation: Option<String>,

    /// Do not request the phone-state permission first
    #[arg(long)]
    skip_permissions: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match BridgeConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to load config");
                return ExitCode::from(2);
            }
        },
        None => BridgeConfig::default(),
    };

    let platform = args.platform.unwrap_or_else(Platform::current);
    let manager = EsimManager::from_config(config).with_platform(platform);
    tracing::info!(%platform, "esim-probe starting");

    let options = ProbeOptions {
        request_permissions: !args.skip_permissions,
        install: args.install.map(|code| {
            let data = EsimInstallationData::new(code);
            match args.confirmation {
                Some(confirmation) => data.with_confirmation_code(confirmation),
                None => data,
            }
        }),
    };

    let report = run_probe(&manager, platform, &options).await;
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialise report");
            return ExitCode::FAILURE;
        }
    }

    if report.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
