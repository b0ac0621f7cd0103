//! Test doubles shared by the unit and integration tests.

use std::sync::{Arc, Mutex};

use vitrine_common::{DeviceError, Frame, Panel};

/// Everything a [`MockPanel`] has been asked to do, plus its fault
/// switches. Shared behind a handle so tests can inspect it after the
/// refresh loop has consumed the panel.
#[derive(Default)]
pub struct MockPanelState {
    pub frames: Vec<Frame>,
    pub clears: usize,
    pub sleeps: usize,
    pub fail_init: bool,
    pub fail_clear: bool,
    pub fail_display: bool,
}

/// In-memory panel recording every frame it receives.
pub struct MockPanel {
    width: u32,
    height: u32,
    shared: Arc<Mutex<MockPanelState>>,
}

impl MockPanel {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shared: Arc::new(Mutex::new(MockPanelState::default())),
        }
    }

    /// Handle to the recorded state; stays usable after the panel has been
    /// moved into a controller or loop.
    pub fn state(&self) -> Arc<Mutex<MockPanelState>> {
        Arc::clone(&self.shared)
    }
}

impl Panel for MockPanel {
    async fn init(&mut self) -> Result<(u32, u32), DeviceError> {
        if self.shared.lock().unwrap().fail_init {
            return Err(DeviceError::InitFailed("mock init failure".into()));
        }
        Ok((self.width, self.height))
    }

    async fn clear(&mut self) -> Result<(), DeviceError> {
        let mut state = self.shared.lock().unwrap();
        if state.fail_clear {
            return Err(DeviceError::WriteFailed("mock clear failure".into()));
        }
        state.clears += 1;
        Ok(())
    }

    async fn display(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        let mut state = self.shared.lock().unwrap();
        if state.fail_display {
            return Err(DeviceError::WriteFailed("mock display failure".into()));
        }
        state.frames.push(frame.clone());
        Ok(())
    }

    async fn sleep(&mut self) -> Result<(), DeviceError> {
        self.shared.lock().unwrap().sleeps += 1;
        Ok(())
    }
}
