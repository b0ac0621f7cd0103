//! Waveshare 7.5" V2 panel over spidev and sysfs GPIO.

use epd_waveshare::epd7in5_v2::Epd7in5;
use epd_waveshare::prelude::WaveshareDisplay;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{Delay, SpidevDevice, SysfsPin};
use log::info;
use vitrine_common::{DeviceError, Frame, Panel};

// HAT wiring, BCM numbering. Chip select is handled by spidev itself.
const PIN_RST: u64 = 17;
const PIN_DC: u64 = 25;
const PIN_BUSY: u64 = 24;
const SPI_DEV: &str = "/dev/spidev0.0";
const SPI_SPEED_HZ: u32 = 4_000_000;

type Driver = Epd7in5<SpidevDevice, SysfsPin, SysfsPin, SysfsPin, Delay>;

struct Hw {
    spi: SpidevDevice,
    delay: Delay,
    epd: Driver,
}

/// The real panel. Hardware handles exist only between `init` and process
/// exit.
pub struct WaveshareEpd {
    hw: Option<Hw>,
}

impl WaveshareEpd {
    pub fn new() -> Self {
        Self { hw: None }
    }

    fn open() -> Result<Hw, DeviceError> {
        let busy = init_gpio(PIN_BUSY, Direction::In)?;
        let dc = init_gpio(PIN_DC, Direction::Out)?;
        let rst = init_gpio(PIN_RST, Direction::Out)?;

        let mut spi = SpidevDevice::open(SPI_DEV)
            .map_err(|err| DeviceError::InitFailed(format!("{SPI_DEV}: {err}")))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(SPI_SPEED_HZ)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.0
            .configure(&options)
            .map_err(|err| DeviceError::InitFailed(format!("spi configure: {err}")))?;

        let mut delay = Delay;
        let epd = Epd7in5::new(&mut spi, busy, dc, rst, &mut delay, None)
            .map_err(|err| DeviceError::InitFailed(format!("{err:?}")))?;

        Ok(Hw { spi, delay, epd })
    }

    fn hw(&mut self) -> Result<&mut Hw, DeviceError> {
        self.hw
            .as_mut()
            .ok_or_else(|| DeviceError::WriteFailed("panel not initialized".into()))
    }
}

fn init_gpio(pin: u64, direction: Direction) -> Result<SysfsPin, DeviceError> {
    let gpio = SysfsPin::new(pin);
    gpio.export()
        .map_err(|err| DeviceError::InitFailed(format!("export gpio {pin}: {err}")))?;

    while !gpio.is_exported() {}

    gpio.set_direction(direction)
        .map_err(|err| DeviceError::InitFailed(format!("direction gpio {pin}: {err}")))?;

    if direction == Direction::Out {
        gpio.set_value(1)
            .map_err(|err| DeviceError::InitFailed(format!("set gpio {pin}: {err}")))?;
    }

    Ok(gpio)
}

impl Panel for WaveshareEpd {
    async fn init(&mut self) -> Result<(u32, u32), DeviceError> {
        let hw = Self::open()?;
        let size = (hw.epd.width(), hw.epd.height());
        info!("e-paper ready on {SPI_DEV}");
        self.hw = Some(hw);
        Ok(size)
    }

    async fn clear(&mut self) -> Result<(), DeviceError> {
        let hw = self.hw()?;
        hw.epd
            .clear_frame(&mut hw.spi, &mut hw.delay)
            .map_err(|err| DeviceError::WriteFailed(format!("{err:?}")))
    }

    async fn display(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        let hw = self.hw()?;
        // The frame's packed layout is the controller's own (MSB-first
        // rows, set bit = white), so the bytes go through untouched.
        hw.epd
            .update_frame(&mut hw.spi, frame.data(), &mut hw.delay)
            .map_err(|err| DeviceError::WriteFailed(format!("{err:?}")))?;
        hw.epd
            .display_frame(&mut hw.spi, &mut hw.delay)
            .map_err(|err| DeviceError::WriteFailed(format!("{err:?}")))
    }

    async fn sleep(&mut self) -> Result<(), DeviceError> {
        if let Some(hw) = self.hw.as_mut() {
            hw.epd
                .sleep(&mut hw.spi, &mut hw.delay)
                .map_err(|err| DeviceError::WriteFailed(format!("{err:?}")))?;
        }
        Ok(())
    }
}
