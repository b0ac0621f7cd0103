//! Controller over the panel capability trait.

use log::{info, warn};
use vitrine_common::{DeviceError, Frame, Panel};

/// Owns the panel handle for the process lifetime.
///
/// Exactly one controller exists; the refresh loop holds it exclusively,
/// so the panel is never written concurrently.
pub struct DeviceController<P: Panel> {
    panel: P,
    width: u32,
    height: u32,
    asleep: bool,
}

impl<P: Panel> DeviceController<P> {
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            width: 0,
            height: 0,
            asleep: false,
        }
    }

    /// Power the panel on and record its dimensions.
    ///
    /// Does not clear: the native clear has been seen to hang on this
    /// hardware, and the first frame overwrites the previous image anyway.
    pub async fn init(&mut self) -> Result<(u32, u32), DeviceError> {
        let (width, height) = self.panel.init().await?;
        self.width = width;
        self.height = height;
        info!("panel initialized: {width}x{height}");
        Ok((width, height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Best-effort clear: the native command first, an all-white frame if
    /// that fails. Never propagates failure.
    pub async fn clear(&mut self) {
        if let Err(err) = self.panel.clear().await {
            warn!("native clear failed ({err}), writing a white frame instead");
            let white = Frame::white(self.width, self.height);
            if let Err(err) = self.panel.display(&white).await {
                warn!("white-frame clear failed too: {err}");
            }
        }
    }

    /// Write one frame. Blocks for the physical refresh.
    pub async fn display(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        debug_assert_eq!((frame.width(), frame.height()), (self.width, self.height));
        self.panel.display(frame).await
    }

    /// Put the panel into low-power mode. The second and later calls are
    /// no-ops; errors are logged, not returned.
    pub async fn sleep(&mut self) {
        if self.asleep {
            return;
        }
        self.asleep = true;
        if let Err(err) = self.panel.sleep().await {
            warn!("panel sleep failed: {err}");
        } else {
            info!("panel sleeping");
        }
    }
}
