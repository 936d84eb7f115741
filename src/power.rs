//! Power sequencing: sensor rails, radio rail, status LED, deep sleep

use esp_hal::gpio::{AnyPin, Level, Output, OutputConfig};
use esp_hal::peripherals::LPWR;
use esp_hal::rtc_cntl::{Rtc, sleep::TimerWakeupSource};

use crate::traits::StatusLed;

/// Sensor supply pins. The breakout is powered from two GPIOs so the whole
/// rail can be cut while the node sleeps.
pub struct SensorRails<'a> {
    vdd: Output<'a>,
    #[allow(dead_code)]
    gnd: Output<'a>,
}

impl<'a> SensorRails<'a> {
    /// Claim both pins and drive them to the powered state: ground
    /// reference low first, then the supply high.
    pub fn power_up<VDD, GND>(vdd_gpio: VDD, gnd_gpio: GND) -> Self
    where
        VDD: Into<AnyPin<'a>>,
        GND: Into<AnyPin<'a>>,
    {
        let gnd = Output::new(gnd_gpio.into(), Level::Low, OutputConfig::default());
        let vdd = Output::new(vdd_gpio.into(), Level::High, OutputConfig::default());
        Self { vdd, gnd }
    }

    fn power_down(&mut self) {
        self.vdd.set_low();
    }
}

/// GPIO gating the radio power domain.
pub struct RadioRail<'a> {
    pin: Output<'a>,
    enabled: bool,
}

impl<'a> RadioRail<'a> {
    /// Claims the gate pin; the rail starts de-asserted.
    pub fn new<P: Into<AnyPin<'a>>>(gpio: P) -> Self {
        Self {
            pin: Output::new(gpio.into(), Level::Low, OutputConfig::default()),
            enabled: false,
        }
    }

    pub fn enable(&mut self) {
        self.pin.set_high();
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.pin.set_low();
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Status indicator LED.
pub struct Led<'a> {
    pin: Output<'a>,
}

impl<'a> Led<'a> {
    pub fn new<P: Into<AnyPin<'a>>>(gpio: P) -> Self {
        Self {
            pin: Output::new(gpio.into(), Level::Low, OutputConfig::default()),
        }
    }
}

impl StatusLed for Led<'_> {
    fn set_on(&mut self) {
        self.pin.set_high();
    }

    fn set_off(&mut self) {
        self.pin.set_low();
    }

    fn toggle(&mut self) {
        self.pin.toggle();
    }
}

/// Power everything down and suspend the node for `interval_s` seconds.
///
/// Consumes the rails and the LED so nothing can touch them afterwards.
/// Ordering invariant: the radio rail is de-asserted before the sleep
/// request, which may itself cut power domains the radio depends on.
/// Execution resumes from the reset vector; no runtime state survives.
pub fn deep_sleep<'a>(
    lpwr: LPWR<'a>,
    mut rails: SensorRails<'a>,
    mut radio: RadioRail<'a>,
    mut led: Led<'a>,
    interval_s: u64,
) -> ! {
    led.set_off();
    if radio.is_enabled() {
        radio.disable();
    }
    rails.power_down();

    let mut rtc = Rtc::new(lpwr);
    let timer = TimerWakeupSource::new(core::time::Duration::from_secs(interval_s));
    rtc.sleep_deep(&[&timer])
}
