//! Vitrine display client for development machines.
//!
//! Same client as the Pi build, but frames land as PNG files instead of on
//! hardware. Point it at a portal, watch the output directory.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};
use tokio::sync::watch;
use vitrine_common::Config;
use vitrine_core::RefreshLoop;

mod panel;

use crate::panel::SimulatorPanel;

const ENV_OUTPUT_DIR: &str = "VITRINE_SIM_OUTPUT";
const DEFAULT_OUTPUT_DIR: &str = "./frames";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("configuration error: {err}");
            return ExitCode::from(1);
        }
    };
    info!("configuration loaded: {config:?}");

    let output_dir =
        PathBuf::from(env::var(ENV_OUTPUT_DIR).unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.into()));
    let panel = SimulatorPanel::new(output_dir);
    let shutdown = spawn_signal_listener();

    match RefreshLoop::new(&config, panel, shutdown).run().await {
        Ok(()) => {
            info!("exiting");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("fatal: {err}");
            ExitCode::from(1)
        }
    }
}

fn spawn_signal_listener() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down after the current cycle");
        }
        let _ = tx.send(true);
    });
    rx
}
