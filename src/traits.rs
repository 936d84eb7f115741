//! Hardware abstraction traits

/// Trait for the sensor's two-wire bus
pub trait SensorBus {
    /// Write `payload` to a device register
    fn write_reg(&mut self, addr: u8, reg: u8, payload: &[u8]) -> Result<(), &'static str>;

    /// Read from a device register into `buf`; returns the number of bytes
    /// actually received, which may be shorter than the buffer
    fn read_reg(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<usize, &'static str>;
}

/// Trait for blocking millisecond delays
pub trait DelayMs {
    fn delay_ms(&mut self, ms: u32);
}

/// Trait for the status indicator LED
pub trait StatusLed {
    fn set_on(&mut self);

    fn set_off(&mut self);

    fn toggle(&mut self);
}
