//! Conversion of a decoded portal image into the panel's exact format.

use image::imageops::{self, BiLevel, FilterType};
use image::{DynamicImage, GrayImage};
use log::debug;
use vitrine_common::Frame;

use crate::acquire::RawImage;

/// Normalizes any decoded image to a panel-sized 1-bit frame.
///
/// Resamples with Lanczos when the dimensions differ and error-diffuses
/// grayscale down to two levels. An image that is already panel-sized
/// strict black-and-white passes through unchanged. There is no error
/// path: anything that decoded will normalize.
pub fn normalize(raw: &RawImage, panel_width: u32, panel_height: u32) -> Frame {
    let resized;
    let source: &DynamicImage = if raw.width != panel_width || raw.height != panel_height {
        debug!(
            "resampling {}x{} -> {panel_width}x{panel_height}",
            raw.width, raw.height
        );
        resized = raw
            .image
            .resize_exact(panel_width, panel_height, FilterType::Lanczos3);
        &resized
    } else {
        &raw.image
    };

    let mut luma = source.to_luma8();
    if !is_binary(&luma) {
        debug!("dithering {:?} image down to 1-bit", raw.color);
        imageops::dither(&mut luma, &BiLevel);
    }

    pack(&luma, panel_width, panel_height)
}

/// True when every sample is already full black or full white.
fn is_binary(luma: &GrayImage) -> bool {
    luma.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255)
}

fn pack(luma: &GrayImage, panel_width: u32, panel_height: u32) -> Frame {
    let mut frame = Frame::white(panel_width, panel_height);
    for (x, y, pixel) in luma.enumerate_pixels() {
        if pixel.0[0] < 128 {
            frame.set_pixel(x, y, false);
        }
    }
    frame
}
