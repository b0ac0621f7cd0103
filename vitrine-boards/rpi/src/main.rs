//! Vitrine display client for the Raspberry Pi with the Waveshare
//! 7.5" V2 e-paper HAT.

use std::process::ExitCode;

use log::{error, info, warn};
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::watch;
use vitrine_common::Config;
use vitrine_core::RefreshLoop;

mod panel;

use crate::panel::WaveshareEpd;

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
    // The Debug impl masks the password.
    info!("configuration loaded: {config:?}");

    let shutdown = spawn_signal_listener();
    let panel = WaveshareEpd::new();

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

/// SIGINT and SIGTERM both raise the shutdown flag; the loop honors it at
/// its next interval wait.
fn spawn_signal_listener() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = term.recv() => {}
                }
            }
            Err(err) => {
                warn!("SIGTERM handler unavailable: {err}");
                let _ = ctrl_c.await;
            }
        }
        info!("interrupt received, shutting down after the current cycle");
        let _ = tx.send(true);
    });
    rx
}
