use crate::types::{DeviceError, Frame};

/// Capability interface over one e-paper panel.
///
/// Board crates implement this over their transport (spidev + sysfs GPIO on
/// the Pi, PNG files in the simulator); everything above it is
/// hardware-agnostic. The implementation owns whatever handles it needs and
/// is used from a single task only.
pub trait Panel {
    /// Power the panel on and report its fixed width and height in pixels.
    async fn init(&mut self) -> Result<(u32, u32), DeviceError>;

    /// Run the controller's native full-screen clear.
    ///
    /// Advisory: callers treat a failure as non-fatal and fall back to
    /// writing an all-white frame.
    async fn clear(&mut self) -> Result<(), DeviceError>;

    /// Write one panel-sized frame.
    ///
    /// Blocks for the duration of the physical refresh, typically several
    /// seconds on real hardware. The duration is not bounded here: the
    /// refresh cannot be abandoned mid-transfer, and the caller is strictly
    /// serialized with nothing else to do.
    async fn display(&mut self, frame: &Frame) -> Result<(), DeviceError>;

    /// Enter low-power mode. Safe to call on a panel that is already
    /// sleeping.
    async fn sleep(&mut self) -> Result<(), DeviceError>;
}
