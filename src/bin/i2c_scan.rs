//! Sensor bus scan
//!
//! Bring-up helper: powers the sensor rails and walks the I2C address
//! space. An AE-SHT31 breakout shows up at 0x44 (ADDR low) or 0x45
//! (ADDR high); set `config::SHT31_ADDRESS` accordingly.
//!
//! Following pins are used:
//! - V+  => GPIO3
//! - SDA => GPIO4
//! - SCL => GPIO5
//! - GND => GPIO6

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::{
    delay::Delay,
    i2c::master::{Config, I2c},
    time::Rate,
    timer::timg::TimerGroup,
};

use wbgt_node::power::SensorRails;

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(_spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let _rails = SensorRails::power_up(peripherals.GPIO3, peripherals.GPIO6);
    // Give the sensor a moment on the freshly raised rail.
    let delay = Delay::new();
    delay.delay_millis(10);

    let mut i2c = I2c::new(
        peripherals.I2C0,
        Config::default().with_frequency(Rate::from_khz(100)),
    )
    .unwrap()
    .with_sda(peripherals.GPIO4)
    .with_scl(peripherals.GPIO5);

    esp_println::println!("I2C scan start");
    for address in 0x03..0x78u8 {
        if i2c.write(address, &[]).is_ok() {
            esp_println::println!("Found device at 0x{:02X}", address);
        }
    }
    esp_println::println!("I2C scan done");

    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}
