//! Panel stand-in writing frames to disk.

use std::fs;
use std::path::PathBuf;

use image::GrayImage;
use log::info;
use vitrine_common::{DeviceError, Frame, Panel};

// Same geometry as the Waveshare 7.5" V2 the portal renders for.
const WIDTH: u32 = 800;
const HEIGHT: u32 = 480;

pub struct SimulatorPanel {
    output_dir: PathBuf,
    counter: usize,
}

impl SimulatorPanel {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            counter: 0,
        }
    }
}

impl Panel for SimulatorPanel {
    async fn init(&mut self) -> Result<(u32, u32), DeviceError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|err| DeviceError::InitFailed(err.to_string()))?;
        info!("writing frames to {}", self.output_dir.display());
        Ok((WIDTH, HEIGHT))
    }

    async fn clear(&mut self) -> Result<(), DeviceError> {
        info!("panel cleared");
        Ok(())
    }

    async fn display(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        let png = GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
            let white = frame.pixel(x, y).unwrap_or(true);
            image::Luma([if white { 255u8 } else { 0u8 }])
        });

        let path = self.output_dir.join(format!("frame-{:04}.png", self.counter));
        self.counter += 1;
        png.save(&path)
            .map_err(|err| DeviceError::WriteFailed(err.to_string()))?;

        info!(
            "frame written to {} ({} ink pixels)",
            path.display(),
            frame.ink_pixels()
        );
        Ok(())
    }

    async fn sleep(&mut self) -> Result<(), DeviceError> {
        info!("panel sleeping");
        Ok(())
    }
}
