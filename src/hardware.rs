use esp_hal::gpio::AnyPin;
use esp_hal::{
    delay::Delay,
    i2c::master::{Config as I2cConfig, I2c},
    peripherals::I2C0,
    time::Rate,
};

use crate::traits::{DelayMs, SensorBus};

const I2C_FREQ_KHZ: u32 = 100;

/// Blocking I2C master wired to the sensor bus pins.
pub struct SensorBusHardware<'a> {
    i2c: I2c<'a, esp_hal::Blocking>,
}

impl<'a> SensorBusHardware<'a> {
    pub fn new<SDA, SCL>(i2c_periph: I2C0<'a>, sda: SDA, scl: SCL) -> Self
    where
        SDA: Into<AnyPin<'a>>,
        SCL: Into<AnyPin<'a>>,
    {
        let i2c = I2c::new(
            i2c_periph,
            I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQ_KHZ)),
        )
        .unwrap()
        .with_sda(sda.into())
        .with_scl(scl.into());

        Self { i2c }
    }
}

impl SensorBus for SensorBusHardware<'_> {
    fn write_reg(&mut self, addr: u8, reg: u8, payload: &[u8]) -> Result<(), &'static str> {
        let mut frame = [0u8; 8];
        if payload.len() + 1 > frame.len() {
            return Err("write payload too long");
        }
        frame[0] = reg;
        frame[1..=payload.len()].copy_from_slice(payload);
        self.i2c
            .write(addr, &frame[..=payload.len()])
            .map_err(|_| "i2c write failed")
    }

    fn read_reg(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<usize, &'static str> {
        self.i2c
            .write_read(addr, &[reg], buf)
            .map_err(|_| "i2c read failed")?;
        Ok(buf.len())
    }
}

/// esp-hal blocking delay behind the `DelayMs` seam.
pub struct HardwareDelay {
    delay: Delay,
}

impl HardwareDelay {
    pub fn new() -> Self {
        Self {
            delay: Delay::new(),
        }
    }
}

impl DelayMs for HardwareDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_millis(ms);
    }
}
