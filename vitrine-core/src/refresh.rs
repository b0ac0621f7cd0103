//! The refresh cycle state machine and its driver.

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::watch;
use vitrine_common::{Config, Panel};

use crate::acquire::ImageAcquirer;
use crate::device::DeviceController;
use crate::error::RunError;
use crate::fallback::FallbackRenderer;
use crate::normalize::normalize;
use crate::session::SessionManager;

/// Loop states. `ShuttingDown` is reachable from every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Authenticating,
    Fetching,
    Rendering,
    Sleeping,
    ShuttingDown,
}

/// What moved the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    DeviceReady,
    DeviceFailed,
    AuthSucceeded,
    AuthFailed,
    FrameAcquired,
    AcquireFailed,
    FrameDisplayed,
    IntervalElapsed,
    Interrupted,
}

impl State {
    /// Process an event and return the next state.
    pub fn transition(self, event: Event) -> State {
        use Event::*;
        use State::*;

        match (self, event) {
            (_, Interrupted) => ShuttingDown,
            (Idle, DeviceReady) => Authenticating,
            (Idle, DeviceFailed) => ShuttingDown,
            (Authenticating, AuthSucceeded) => Fetching,
            (Authenticating, AuthFailed) => ShuttingDown,
            // A failed acquisition still renders: the fallback frame goes
            // out instead, so the cycle is never skipped.
            (Fetching, FrameAcquired | AcquireFailed) => Rendering,
            (Rendering, FrameDisplayed) => Sleeping,
            (Sleeping, IntervalElapsed) => Fetching,
            _ => self,
        }
    }
}

/// What a single cycle delivered to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The portal's frame was displayed.
    Delivered,
    /// The locally drawn placeholder was displayed.
    DeliveredFallback,
    /// The frame write failed; nothing reached the panel this cycle.
    Skipped,
}

/// Drives the acquire, normalize, display cycle on a fixed cadence.
///
/// Owns the panel controller, the session and the HTTP client exclusively
/// for the process lifetime; exactly one cycle runs at a time.
pub struct RefreshLoop<P: Panel> {
    device: DeviceController<P>,
    sessions: SessionManager,
    acquirer: ImageAcquirer,
    fallback: FallbackRenderer,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
    state: State,
}

impl<P: Panel> RefreshLoop<P> {
    /// Wires the whole client together from the immutable configuration.
    pub fn new(config: &Config, panel: P, shutdown: watch::Receiver<bool>) -> Self {
        let http = reqwest::Client::new();
        Self {
            device: DeviceController::new(panel),
            sessions: SessionManager::new(http.clone(), config),
            acquirer: ImageAcquirer::new(http, config),
            fallback: FallbackRenderer,
            interval: config.refresh_interval,
            shutdown,
            state: State::Idle,
        }
    }

    /// Runs until interrupted.
    ///
    /// Returns `Ok(())` on a graceful interrupt. The only error paths are
    /// the two fatal startup failures; every steady-state failure degrades
    /// to the fallback frame and the loop keeps going.
    pub async fn run(mut self) -> Result<(), RunError> {
        if let Err(err) = self.device.init().await {
            self.advance(Event::DeviceFailed);
            return Err(RunError::Device(err));
        }
        self.advance(Event::DeviceReady);

        if let Err(err) = self.sessions.login().await {
            self.advance(Event::AuthFailed);
            error!("initial authentication failed: {err}");
            self.shut_down_panel().await;
            return Err(RunError::Auth(err));
        }
        self.advance(Event::AuthSucceeded);

        info!(
            "starting refresh loop (interval {}s)",
            self.interval.as_secs()
        );
        loop {
            let outcome = self.run_cycle().await;
            info!("cycle outcome: {outcome:?}");

            if self.interrupted() || !self.wait_interval().await {
                self.advance(Event::Interrupted);
                break;
            }
            self.advance(Event::IntervalElapsed);
        }

        self.shut_down_panel().await;
        Ok(())
    }

    async fn run_cycle(&mut self) -> CycleOutcome {
        let (width, height) = (self.device.width(), self.device.height());

        let (frame, from_portal) = match self.acquirer.fetch(&mut self.sessions).await {
            Ok(raw) => {
                self.advance(Event::FrameAcquired);
                (normalize(&raw, width, height), true)
            }
            Err(err) => {
                warn!("image acquisition failed ({err}), rendering local fallback");
                self.advance(Event::AcquireFailed);
                (self.fallback.render(width, height), false)
            }
        };

        let outcome = match self.device.display(&frame).await {
            Ok(()) if from_portal => CycleOutcome::Delivered,
            Ok(()) => CycleOutcome::DeliveredFallback,
            Err(err) => {
                error!("frame write failed: {err}");
                CycleOutcome::Skipped
            }
        };
        self.advance(Event::FrameDisplayed);
        outcome
    }

    fn advance(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next != self.state {
            debug!("{:?} -> {next:?} on {event:?}", self.state);
        }
        self.state = next;
    }

    fn interrupted(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Waits out the refresh interval. This is the one point where an
    /// interrupt is honored immediately. Returns `false` when interrupted
    /// or when the shutdown channel closed.
    async fn wait_interval(&mut self) -> bool {
        let sleep = tokio::time::sleep(self.interval);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return true,
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        return false;
                    }
                }
            }
        }
    }

    /// Final frames: best-effort closing notice, then panel sleep, then
    /// the session is released.
    async fn shut_down_panel(&mut self) {
        info!("shutting down");
        let closing = self
            .fallback
            .render_closed(self.device.width(), self.device.height());
        if let Err(err) = self.device.display(&closing).await {
            warn!("could not display the closing frame: {err}");
        }
        self.device.sleep().await;
        self.sessions.invalidate();
    }
}
