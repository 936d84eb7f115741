//! On-target self-test for the pure cycle logic.
//!
//! Runs without a sensor or an access point attached: the bus is mocked,
//! everything else under test is hardware-independent.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;

use wbgt_node::{
    cycle::{Cycle, Event, Phase},
    model::Measurement,
    sht31::{self, Sht31},
    telemetry,
    traits::{DelayMs, SensorBus},
    wbgt::{self, UnsupportedConfig, WbgtConfig},
};

esp_bootloader_esp_idf::esp_app_desc!();

// Test result tracking
struct TestResults {
    passed: u32,
    failed: u32,
    total: u32,
}

impl TestResults {
    fn new() -> Self {
        Self {
            passed: 0,
            failed: 0,
            total: 0,
        }
    }

    fn assert(&mut self, condition: bool, test_name: &str) {
        self.total += 1;
        if condition {
            self.passed += 1;
            esp_println::println!("  ✓ {}", test_name);
        } else {
            self.failed += 1;
            esp_println::println!("  ✗ {} FAILED", test_name);
        }
    }

    fn assert_eq<T: PartialEq + core::fmt::Debug>(&mut self, left: T, right: T, test_name: &str) {
        self.total += 1;
        if left == right {
            self.passed += 1;
            esp_println::println!("  ✓ {}", test_name);
        } else {
            self.failed += 1;
            esp_println::println!("  ✗ {} FAILED: {:?} != {:?}", test_name, left, right);
        }
    }

    fn assert_close(&mut self, value: f32, expected: f32, tolerance: f32, test_name: &str) {
        self.total += 1;
        if (value - expected).abs() < tolerance {
            self.passed += 1;
            esp_println::println!("  ✓ {}", test_name);
        } else {
            self.failed += 1;
            esp_println::println!(
                "  ✗ {} FAILED: {:.4} not close to {:.4} (tolerance: {:.4})",
                test_name,
                value,
                expected,
                tolerance
            );
        }
    }

    fn print_summary(&self) {
        esp_println::println!("\n==========================================");
        esp_println::println!("Test Summary:");
        esp_println::println!("  Total:  {}", self.total);
        esp_println::println!("  Passed: {}", self.passed);
        esp_println::println!("  Failed: {}", self.failed);
        if self.failed == 0 {
            esp_println::println!("\n✓ ALL TESTS PASSED!");
        } else {
            esp_println::println!("\n✗ SOME TESTS FAILED");
        }
        esp_println::println!("==========================================");
    }
}

struct NoDelay;

impl DelayMs for NoDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

/// Bus double returning a canned result frame of configurable length.
struct MockBus {
    frame: [u8; 6],
    frame_len: usize,
}

impl SensorBus for MockBus {
    fn write_reg(&mut self, _addr: u8, _reg: u8, _payload: &[u8]) -> Result<(), &'static str> {
        Ok(())
    }

    fn read_reg(&mut self, _addr: u8, _reg: u8, buf: &mut [u8]) -> Result<usize, &'static str> {
        let n = self.frame_len.min(buf.len());
        buf[..n].copy_from_slice(&self.frame[..n]);
        Ok(n)
    }
}

fn test_decode(results: &mut TestResults) {
    esp_println::println!("\n[TEST] Frame Decode Tests");

    results.assert_eq(sht31::decode_temperature(0), -45.0, "temperature at raw 0");
    results.assert_eq(
        sht31::decode_temperature(u16::MAX),
        130.0,
        "temperature at raw 65535",
    );
    results.assert_eq(sht31::decode_humidity(0), 0.0, "humidity at raw 0");
    results.assert_eq(
        sht31::decode_humidity(u16::MAX),
        100.0,
        "humidity at raw 65535",
    );

    let mut monotonic = true;
    let mut prev = sht31::decode_temperature(0);
    for raw in (1..=0xFFFFu32).step_by(257) {
        let t = sht31::decode_temperature(raw as u16);
        if t <= prev {
            monotonic = false;
        }
        prev = t;
    }
    results.assert(monotonic, "temperature decode is monotonic");

    let bus = MockBus {
        frame: [0x68, 0x3A, 0x00, 0xAD, 0x70, 0x00],
        frame_len: 6,
    };
    let mut sensor = Sht31::new(bus, sht31::ADDRESS_PRIMARY);
    match sensor.measure(&mut NoDelay) {
        Ok(m) => {
            results.assert_close(m.temperature, 26.2497, 0.001, "reference frame temperature");
            results.assert_close(m.humidity, 67.7501, 0.001, "reference frame humidity");
        }
        Err(e) => {
            esp_println::println!("    measure failed: {}", e);
            results.assert(false, "reference frame decode");
        }
    }
}

/// Bus double answering one full frame, then only short reads.
struct DegradingBus {
    reads: usize,
}

impl SensorBus for DegradingBus {
    fn write_reg(&mut self, _addr: u8, _reg: u8, _payload: &[u8]) -> Result<(), &'static str> {
        Ok(())
    }

    fn read_reg(&mut self, _addr: u8, _reg: u8, buf: &mut [u8]) -> Result<usize, &'static str> {
        self.reads += 1;
        if self.reads == 1 {
            buf[..6].copy_from_slice(&[0x68, 0x3A, 0x00, 0xAD, 0x70, 0x00]);
            Ok(6)
        } else {
            buf[..4].copy_from_slice(&[0xFF; 4]);
            Ok(4)
        }
    }
}

fn test_stale_policy(results: &mut TestResults) {
    esp_println::println!("\n[TEST] Stale-On-Short-Read Tests");

    let bus = MockBus {
        frame: [0xFF; 6],
        frame_len: 4,
    };
    let mut short_sensor = Sht31::new(bus, sht31::ADDRESS_PRIMARY);
    results.assert_eq(
        short_sensor.measure(&mut NoDelay).unwrap(),
        Measurement::default(),
        "short frame on first cycle yields default",
    );

    let mut sensor = Sht31::new(DegradingBus { reads: 0 }, sht31::ADDRESS_PRIMARY);
    let first = sensor.measure(&mut NoDelay).unwrap();
    results.assert_eq(
        sensor.measure(&mut NoDelay).unwrap(),
        first,
        "short frame keeps previous measurement",
    );
    results.assert_eq(
        sensor.last_measurement(),
        first,
        "stale value is carried as driver state",
    );
}

fn test_wbgt(results: &mut TestResults) {
    esp_println::println!("\n[TEST] WBGT Index Tests");

    let cases = [
        (3, false, 28.0199),
        (3, true, 27.9402),
        (4, false, 26.1897),
        (4, true, 26.1220),
    ];
    for (version, wide, expected) in cases {
        let config = WbgtConfig { version, wide };
        match wbgt::compute(29.2, 70.0, config) {
            Ok(index) => results.assert_close(index, expected, 0.01, "coefficient table row"),
            Err(_) => results.assert(false, "coefficient table row (rejected)"),
        }
    }

    let config = WbgtConfig {
        version: 3,
        wide: true,
    };
    let a = wbgt::compute(31.6, 55.4, config).unwrap();
    let b = wbgt::compute(31.6, 55.4, config).unwrap();
    results.assert_eq(a.to_bits(), b.to_bits(), "compute is pure");

    results.assert_eq(
        wbgt::compute(
            29.2,
            70.0,
            WbgtConfig {
                version: 5,
                wide: false,
            },
        ),
        Err(UnsupportedConfig),
        "version 5 is rejected",
    );
}

fn test_telemetry(results: &mut TestResults) {
    esp_println::println!("\n[TEST] Telemetry Line Tests");

    let line = telemetry::format_line("humid_3", 29.2, 70.0, 27.9);
    results.assert_eq(
        line.as_str(),
        "humid_3,29.2,70.0,27.9\n",
        "reference line formats exactly",
    );

    let line = telemetry::format_line("humid_3", 26.2497, 67.7501, 27.9402);
    results.assert_eq(
        line.as_str(),
        "humid_3,26.2,67.8,27.9\n",
        "fields round to one decimal",
    );
}

fn test_cycle(results: &mut TestResults) {
    esp_println::println!("\n[TEST] Cycle Scheduler Tests");

    let mut cycle = Cycle::new(true);
    cycle.advance(Event::RailsUp);
    cycle.advance(Event::Measured);
    results.assert_eq(
        cycle.advance(Event::IndexReady),
        Phase::Join,
        "networked cycle enters join",
    );
    cycle.advance(Event::Joined);
    cycle.advance(Event::Sent);
    results.assert_eq(
        cycle.advance(Event::Done),
        Phase::Sleep,
        "networked cycle reaches sleep",
    );

    let mut cycle = Cycle::new(false);
    cycle.advance(Event::RailsUp);
    cycle.advance(Event::Measured);
    results.assert_eq(
        cycle.advance(Event::IndexReady),
        Phase::Idle,
        "empty ssid skips join",
    );
    cycle.advance(Event::Done);
    results.assert_eq(
        cycle.advance(Event::Done),
        Phase::Sleep,
        "idle cycle reaches sleep",
    );

    let mut cycle = Cycle::new(true);
    cycle.advance(Event::RailsUp);
    cycle.advance(Event::Measured);
    results.assert_eq(
        cycle.advance(Event::IndexUnsupported),
        Phase::Shutdown,
        "unsupported config skips join and transmit",
    );

    let mut cycle = Cycle::new(true);
    cycle.advance(Event::RailsUp);
    cycle.advance(Event::Measured);
    cycle.advance(Event::IndexReady);
    cycle.advance(Event::Joined);
    results.assert_eq(
        cycle.advance(Event::SendFailed),
        Phase::Shutdown,
        "send failure still shuts down",
    );

    let mut cycle = Cycle::new(true);
    cycle.advance(Event::RailsUp);
    cycle.advance(Event::Measured);
    cycle.advance(Event::IndexReady);
    results.assert_eq(
        cycle.advance(Event::JoinFailed),
        Phase::Shutdown,
        "join timeout skips transmit",
    );
}

#[esp_rtos::main]
async fn main(_spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    esp_println::println!("=== wbgt-node logic self-test ===");

    let mut results = TestResults::new();
    test_decode(&mut results);
    test_stale_policy(&mut results);
    test_wbgt(&mut results);
    test_telemetry(&mut results);
    test_cycle(&mut results);
    results.print_summary();

    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}
