//! The panel's native frame representation.

use core::convert::Infallible;
use core::fmt;

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};

/// Packed 1 bpp frame, exactly panel-sized.
///
/// Bit 7 of each row byte is the leftmost pixel of that byte; a set bit is
/// a white pixel (the Waveshare buffer convention). Rows are padded to a
/// whole byte and the padding bits stay white.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl Frame {
    /// Creates an all-white frame.
    pub fn white(width: u32, height: u32) -> Self {
        let bytes = vec![0xFF; Self::bytes_per_row(width) * height as usize];
        Self {
            width,
            height,
            bytes,
        }
    }

    fn bytes_per_row(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The packed buffer, row-major, ready for the panel controller.
    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    /// Sets one pixel. Out-of-bounds coordinates are ignored.
    ///
    /// Returns `true` when the pixel was in bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, white: bool) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }

        let index = y as usize * Self::bytes_per_row(self.width) + x as usize / 8;
        let mask = 1u8 << (7 - (x % 8));
        if white {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }
        true
    }

    /// Reads one pixel; `true` is white.
    pub fn pixel(&self, x: u32, y: u32) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let index = y as usize * Self::bytes_per_row(self.width) + x as usize / 8;
        let mask = 1u8 << (7 - (x % 8));
        Some(self.bytes[index] & mask != 0)
    }

    /// Number of black pixels, padding excluded.
    pub fn ink_pixels(&self) -> usize {
        let mut ink = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixel(x, y) == Some(false) {
                    ink += 1;
                }
            }
        }
        ink
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("ink_pixels", &self.ink_pixels())
            .finish()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                // BinaryColor::On is ink, which is a cleared bit.
                self.set_pixel(point.x as u32, point.y as u32, color == BinaryColor::Off);
            }
        }
        Ok(())
    }
}
