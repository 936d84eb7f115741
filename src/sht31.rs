//! SHT31 humidity/temperature sensor driver (single-shot mode)

use crate::model::Measurement;
use crate::traits::{DelayMs, SensorBus};

/// Bus address with the ADDR pin tied low.
pub const ADDRESS_PRIMARY: u8 = 0x44;
/// Bus address with the ADDR pin tied high.
pub const ADDRESS_SECONDARY: u8 = 0x45;

// Command 0x2400: single-shot acquisition, high repeatability, no clock
// stretching.
const CMD_MEASURE: u8 = 0x24;
const CMD_MEASURE_ARG: u8 = 0x00;
const REG_RESULT: u8 = 0x00;

/// Worst-case conversion time for a high-repeatability measurement.
const CONVERSION_DELAY_MS: u32 = 18;

/// A complete result frame: T MSB, T LSB, T CRC, RH MSB, RH LSB, RH CRC.
/// The CRC bytes are not checked.
const FRAME_LEN: usize = 6;
/// Frames shorter than this cannot carry both data words.
const MIN_FRAME_LEN: usize = 5;

pub struct Sht31<B> {
    bus: B,
    address: u8,
    last: Measurement,
}

impl<B: SensorBus> Sht31<B> {
    pub fn new(bus: B, address: u8) -> Self {
        Self {
            bus,
            address,
            last: Measurement::default(),
        }
    }

    /// Run one single-shot conversion and decode the result frame.
    ///
    /// A short result frame is not decoded; the previous measurement is
    /// returned unchanged (the zero-initialized default on the first cycle).
    /// Bus errors propagate to the caller.
    pub fn measure(&mut self, delay: &mut impl DelayMs) -> Result<Measurement, &'static str> {
        self.bus
            .write_reg(self.address, CMD_MEASURE, &[CMD_MEASURE_ARG])?;
        delay.delay_ms(CONVERSION_DELAY_MS);

        let mut frame = [0u8; FRAME_LEN];
        let received = self.bus.read_reg(self.address, REG_RESULT, &mut frame)?;
        if received < MIN_FRAME_LEN {
            return Ok(self.last);
        }

        let raw_temp = u16::from_be_bytes([frame[0], frame[1]]);
        let raw_hum = u16::from_be_bytes([frame[3], frame[4]]);
        self.last = Measurement {
            temperature: decode_temperature(raw_temp),
            humidity: decode_humidity(raw_hum),
        };
        Ok(self.last)
    }

    /// Last successfully decoded measurement.
    pub fn last_measurement(&self) -> Measurement {
        self.last
    }
}

/// Raw 16-bit temperature word to degrees Celsius.
pub fn decode_temperature(raw: u16) -> f32 {
    f32::from(raw) / 65535.0 * 175.0 - 45.0
}

/// Raw 16-bit humidity word to %RH.
pub fn decode_humidity(raw: u16) -> f32 {
    f32::from(raw) / 65535.0 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoDelay;

    impl DelayMs for NoDelay {
        fn delay_ms(&mut self, _ms: u32) {}
    }

    /// Bus double returning a canned frame of configurable length.
    struct ScriptedBus {
        frame: [u8; FRAME_LEN],
        frame_len: usize,
        last_write: Option<(u8, u8, u8)>,
        last_read_reg: Option<(u8, u8)>,
    }

    impl ScriptedBus {
        fn new(frame: [u8; FRAME_LEN], frame_len: usize) -> Self {
            Self {
                frame,
                frame_len,
                last_write: None,
                last_read_reg: None,
            }
        }
    }

    impl SensorBus for ScriptedBus {
        fn write_reg(&mut self, addr: u8, reg: u8, payload: &[u8]) -> Result<(), &'static str> {
            self.last_write = Some((addr, reg, payload[0]));
            Ok(())
        }

        fn read_reg(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<usize, &'static str> {
            self.last_read_reg = Some((addr, reg));
            let n = self.frame_len.min(buf.len());
            buf[..n].copy_from_slice(&self.frame[..n]);
            Ok(n)
        }
    }

    struct FaultyBus;

    impl SensorBus for FaultyBus {
        fn write_reg(&mut self, _: u8, _: u8, _: &[u8]) -> Result<(), &'static str> {
            Err("i2c write failed")
        }

        fn read_reg(&mut self, _: u8, _: u8, _: &mut [u8]) -> Result<usize, &'static str> {
            Err("i2c read failed")
        }
    }

    #[test]
    fn issues_measurement_command_then_reads_result() {
        let bus = ScriptedBus::new([0; FRAME_LEN], FRAME_LEN);
        let mut sensor = Sht31::new(bus, ADDRESS_PRIMARY);
        sensor.measure(&mut NoDelay).unwrap();
        assert_eq!(sensor.bus.last_write, Some((0x44, 0x24, 0x00)));
        assert_eq!(sensor.bus.last_read_reg, Some((0x44, 0x00)));
    }

    #[test]
    fn decodes_full_frame_exactly() {
        let bus = ScriptedBus::new([0x68, 0x3A, 0x00, 0xAD, 0x70, 0x00], FRAME_LEN);
        let mut sensor = Sht31::new(bus, ADDRESS_PRIMARY);
        let m = sensor.measure(&mut NoDelay).unwrap();
        // Exact arithmetic, not approximate: 0x683A and 0xAD70 big-endian.
        assert_eq!(m.temperature, 26682.0 / 65535.0 * 175.0 - 45.0);
        assert_eq!(m.humidity, 44400.0 / 65535.0 * 100.0);
        assert!((m.temperature - 26.2497).abs() < 0.001);
        assert!((m.humidity - 67.7501).abs() < 0.001);
    }

    #[test]
    fn short_frame_keeps_stale_measurement() {
        let bus = ScriptedBus::new([0x68, 0x3A, 0x00, 0xAD, 0x70, 0x00], FRAME_LEN);
        let mut sensor = Sht31::new(bus, ADDRESS_PRIMARY);
        let first = sensor.measure(&mut NoDelay).unwrap();

        sensor.bus.frame = [0xFF, 0xFF, 0xFF, 0xFF, 0, 0];
        sensor.bus.frame_len = 4;
        let second = sensor.measure(&mut NoDelay).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn short_frame_on_first_cycle_yields_default() {
        let bus = ScriptedBus::new([0xFF; FRAME_LEN], 4);
        let mut sensor = Sht31::new(bus, ADDRESS_PRIMARY);
        let m = sensor.measure(&mut NoDelay).unwrap();
        assert_eq!(m, Measurement::default());
    }

    #[test]
    fn bus_fault_propagates() {
        let mut sensor = Sht31::new(FaultyBus, ADDRESS_PRIMARY);
        assert!(sensor.measure(&mut NoDelay).is_err());
    }

    #[test]
    fn decode_is_monotonic_and_bounded() {
        let mut prev_t = decode_temperature(0);
        let mut prev_h = decode_humidity(0);
        for raw in (1..=0xFFFFu32).step_by(257) {
            let t = decode_temperature(raw as u16);
            let h = decode_humidity(raw as u16);
            assert!(t > prev_t);
            assert!(h > prev_h);
            prev_t = t;
            prev_h = h;
        }
        assert_eq!(decode_temperature(0), -45.0);
        assert_eq!(decode_temperature(u16::MAX), 130.0);
        assert_eq!(decode_humidity(0), 0.0);
        assert_eq!(decode_humidity(u16::MAX), 100.0);
    }
}
