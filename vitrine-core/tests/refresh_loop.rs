//! End-to-end refresh loop scenarios with a mock panel and the portal stub.

mod support;

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use support::{ImageBody, spawn_portal};
use tokio::sync::watch;
use tokio::time::timeout;
use vitrine_core::testing::{MockPanel, MockPanelState};
use vitrine_core::{RefreshLoop, RunError};

async fn wait_for_frames(state: &Arc<Mutex<MockPanelState>>, count: usize) {
    for _ in 0..400 {
        if state.lock().unwrap().frames.len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("panel never received {count} frames");
}

#[tokio::test]
async fn steady_state_delivers_portal_frames() {
    let (portal, config) = spawn_portal().await;
    let (tx, rx) = watch::channel(false);
    let panel = MockPanel::new(800, 480);
    let state = panel.state();

    let handle = tokio::spawn(RefreshLoop::new(&config, panel, rx).run());
    wait_for_frames(&state, 2).await;
    tx.send(true).unwrap();
    timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let state = state.lock().unwrap();
    assert!(state.frames.len() >= 3, "cycles plus the closing frame");
    for frame in &state.frames {
        assert_eq!((frame.width(), frame.height()), (800, 480));
    }
    assert_eq!(state.sleeps, 1);
    assert_eq!(portal.logins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn oversized_portal_image_is_normalized_to_the_panel() {
    let (portal, config) = spawn_portal().await;
    portal.set_image(ImageBody::Png {
        width: 1000,
        height: 600,
    });
    let (tx, rx) = watch::channel(false);
    let panel = MockPanel::new(800, 480);
    let state = panel.state();

    let handle = tokio::spawn(RefreshLoop::new(&config, panel, rx).run());
    wait_for_frames(&state, 1).await;
    tx.send(true).unwrap();
    timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let state = state.lock().unwrap();
    assert_eq!(
        (state.frames[0].width(), state.frames[0].height()),
        (800, 480)
    );
}

#[tokio::test]
async fn persistent_fetch_failure_delivers_fallback_every_cycle() {
    let (portal, config) = spawn_portal().await;
    portal.set_image(ImageBody::Status(500));
    let (tx, rx) = watch::channel(false);
    let panel = MockPanel::new(800, 480);
    let state = panel.state();

    let handle = tokio::spawn(RefreshLoop::new(&config, panel, rx).run());
    wait_for_frames(&state, 5).await;

    // Five failed cycles in and the loop is still alive.
    assert!(!handle.is_finished());
    assert!(portal.image_requests.load(Ordering::SeqCst) >= 5);

    tx.send(true).unwrap();
    timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let state = state.lock().unwrap();
    assert!(state.frames.len() >= 6, "five fallback frames plus closing");
    for frame in &state.frames {
        assert_eq!((frame.width(), frame.height()), (800, 480));
        assert!(frame.ink_pixels() > 0);
    }
    assert_eq!(state.sleeps, 1);
    // The fallback path never burned extra logins.
    assert_eq!(portal.logins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn interrupt_during_the_wait_shuts_down_cleanly() {
    let (_portal, mut config) = spawn_portal().await;
    config.refresh_interval = Duration::from_secs(300);
    let (tx, rx) = watch::channel(false);
    let panel = MockPanel::new(800, 480);
    let state = panel.state();

    let handle = tokio::spawn(RefreshLoop::new(&config, panel, rx).run());
    wait_for_frames(&state, 1).await;

    // The loop is now parked in its five-minute wait.
    tx.send(true).unwrap();
    timeout(Duration::from_secs(5), handle)
        .await
        .expect("interrupt was not honored during the wait")
        .unwrap()
        .unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.frames.len(), 2, "first cycle plus the closing frame");
    assert!(state.frames[1].ink_pixels() > 0);
    assert_eq!(state.sleeps, 1);
}

#[tokio::test]
async fn device_init_failure_is_fatal_before_any_network_call() {
    let (portal, config) = spawn_portal().await;
    let (_tx, rx) = watch::channel(false);
    let panel = MockPanel::new(800, 480);
    let state = panel.state();
    state.lock().unwrap().fail_init = true;

    let err = RefreshLoop::new(&config, panel, rx).run().await.unwrap_err();
    assert!(matches!(err, RunError::Device(_)));

    assert_eq!(portal.logins.load(Ordering::SeqCst), 0);
    assert_eq!(portal.image_requests.load(Ordering::SeqCst), 0);
    let state = state.lock().unwrap();
    assert!(state.frames.is_empty());
    assert_eq!(state.sleeps, 0);
}

#[tokio::test]
async fn initial_auth_failure_is_fatal_but_parks_the_panel() {
    let (portal, config) = spawn_portal().await;
    portal.deny_logins.store(true, Ordering::SeqCst);
    let (_tx, rx) = watch::channel(false);
    let panel = MockPanel::new(800, 480);
    let state = panel.state();

    let err = RefreshLoop::new(&config, panel, rx).run().await.unwrap_err();
    assert!(matches!(err, RunError::Auth(_)));

    assert_eq!(portal.image_requests.load(Ordering::SeqCst), 0);
    let state = state.lock().unwrap();
    assert_eq!(state.frames.len(), 1, "only the closing frame");
    assert_eq!(state.sleeps, 1);
}

#[tokio::test]
async fn write_failures_do_not_stop_the_loop() {
    let (portal, config) = spawn_portal().await;
    let (tx, rx) = watch::channel(false);
    let panel = MockPanel::new(800, 480);
    let state = panel.state();
    state.lock().unwrap().fail_display = true;

    let handle = tokio::spawn(RefreshLoop::new(&config, panel, rx).run());

    // Cycles are skipped but the process stays up and keeps fetching.
    for _ in 0..400 {
        if portal.image_requests.load(Ordering::SeqCst) >= 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert!(portal.image_requests.load(Ordering::SeqCst) >= 3);
    assert!(!handle.is_finished());

    tx.send(true).unwrap();
    timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let state = state.lock().unwrap();
    assert!(state.frames.is_empty());
    assert_eq!(state.sleeps, 1);
}
