#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Runner, StackResources};
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::{rng::Rng, timer::timg::TimerGroup};
use esp_println::println;
use esp_radio::wifi::{Config as WifiConfig, WifiDevice};
use static_cell::StaticCell;

use wbgt_node::{
    config,
    cycle::{Cycle, Event, Phase},
    hardware::{HardwareDelay, SensorBusHardware},
    net,
    power::{self, Led, RadioRail, SensorRails},
    sht31::Sht31,
    telemetry,
    traits::StatusLed,
    wbgt::{self, WbgtConfig},
};

// Pin map (AE-SHT31 breakout powered directly from GPIOs):
// - GPIO3  -> sensor V+
// - GPIO4  -> I2C SDA
// - GPIO5  -> I2C SCL
// - GPIO6  -> sensor GND
// - GPIO7  -> radio rail enable
// - GPIO8  -> status LED

esp_bootloader_esp_idf::esp_app_desc!();

/// Console flush wait before the node disappears into deep sleep.
const SERIAL_FLUSH_MS: u64 = 100;

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

#[esp_rtos::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());
    esp_alloc::heap_allocator!(size: 72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    println!("=== wbgt-node ===");

    let networking = !config::WIFI_SSID.is_empty();
    let mut cycle = Cycle::new(networking);

    // Power envelope up: rails first, then the status indicator.
    let rails = SensorRails::power_up(peripherals.GPIO3, peripherals.GPIO6);
    let mut radio_rail = RadioRail::new(peripherals.GPIO7);
    let mut led = Led::new(peripherals.GPIO8);
    led.set_on();
    cycle.advance(Event::RailsUp);

    // Acquire
    let bus = SensorBusHardware::new(peripherals.I2C0, peripherals.GPIO4, peripherals.GPIO5);
    let mut sensor = Sht31::new(bus, config::SHT31_ADDRESS);
    let mut delay = HardwareDelay::new();

    let measurement = match sensor.measure(&mut delay) {
        Ok(m) => {
            cycle.advance(Event::Measured);
            Some(m)
        }
        Err(err) => {
            // A dead bus must not strand the node awake.
            println!("sensor bus fault: {}", err);
            cycle.advance(Event::SensorFault);
            None
        }
    };

    // Compute
    let mut report = None;
    if let Some(m) = measurement {
        let formula = WbgtConfig {
            version: config::WBGT_VERSION,
            wide: config::WBGT_WIDE,
        };
        match wbgt::compute(m.temperature, m.humidity, formula) {
            Ok(index) => {
                cycle.advance(Event::IndexReady);
                println!(
                    "Temperature = {:.1}, Humidity = {:.1}, WBGT = {:.1}",
                    m.temperature, m.humidity, index
                );
                report = Some((m, index));
            }
            Err(_) => {
                println!(
                    "ERROR: unsupported WBGT configuration (version={}, wide={})",
                    config::WBGT_VERSION,
                    config::WBGT_WIDE
                );
                cycle.advance(Event::IndexUnsupported);
                Timer::after(Duration::from_secs(config::GRACE_DELAY_SECONDS)).await;
            }
        }
    }

    // Join + Transmit, only when the scheduler actually entered Join.
    if let (Phase::Join, Some((m, index))) = (cycle.phase(), report) {
        radio_rail.enable();

        static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
        static RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();

        match esp_radio::init() {
            Ok(radio_ctrl) => match esp_radio::wifi::new(
                RADIO.init(radio_ctrl),
                peripherals.WIFI,
                WifiConfig::default(),
            ) {
                Ok((mut controller, interfaces)) => {
                    let mut rng = Rng::new();
                    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
                    let (stack, runner) = embassy_net::new(
                        interfaces.sta,
                        NetConfig::dhcpv4(Default::default()),
                        RESOURCES.init(StackResources::new()),
                        seed,
                    );
                    if let Err(e) = spawner.spawn(net_task(runner)) {
                        println!("[ERROR] Failed to spawn task: {:?}", e);
                    }

                    match net::join(
                        &mut controller,
                        stack,
                        &mut led,
                        config::WIFI_SSID,
                        config::WIFI_PASSWORD,
                        Duration::from_secs(config::JOIN_TIMEOUT_SECONDS),
                    )
                    .await
                    {
                        Ok(address) => {
                            println!("{}", address);
                            led.set_on();
                            cycle.advance(Event::Joined);

                            let line = telemetry::format_line(
                                config::DEVICE_ID,
                                m.temperature,
                                m.humidity,
                                index,
                            );
                            match net::send_report(
                                stack,
                                line.as_bytes(),
                                config::UDP_DESTINATION,
                                config::UDP_PORT,
                            )
                            .await
                            {
                                Ok(()) => {
                                    cycle.advance(Event::Sent);
                                }
                                Err(err) => {
                                    println!("telemetry send failed: {:?}", err);
                                    cycle.advance(Event::SendFailed);
                                }
                            }
                        }
                        Err(err) => {
                            println!("wifi join failed: {:?}", err);
                            cycle.advance(Event::JoinFailed);
                        }
                    }

                    net::shutdown(&mut controller).await;
                }
                Err(err) => {
                    println!("wifi driver error: {:?}", err);
                    cycle.advance(Event::JoinFailed);
                }
            },
            Err(err) => {
                println!("radio init failed: {:?}", err);
                cycle.advance(Event::JoinFailed);
            }
        }
    } else if cycle.phase() == Phase::Idle {
        cycle.advance(Event::Done);
    }

    // Shutdown -> Sleep. The radio rail drops before the sleep request.
    println!("deep sleep for {} s", config::SLEEP_INTERVAL_SECONDS);
    Timer::after(Duration::from_millis(SERIAL_FLUSH_MS)).await;
    cycle.advance(Event::Done);
    power::deep_sleep(
        peripherals.LPWR,
        rails,
        radio_rail,
        led,
        config::SLEEP_INTERVAL_SECONDS,
    )
}
