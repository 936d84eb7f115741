//! Node configuration, fixed at build/flash time. There is no runtime
//! configuration surface; a config change means reflashing.

/// Access point SSID. Leave empty to run the node without networking:
/// the radio is never powered and the cycle goes straight from the
/// measurement to deep sleep.
pub const WIFI_SSID: &str = "1234ABCD";
pub const WIFI_PASSWORD: &str = "password";

/// Telemetry destination. The default is a subnet broadcast.
pub const UDP_DESTINATION: [u8; 4] = [255, 255, 255, 255];
pub const UDP_PORT: u16 = 1024;

/// Device identifier leading every telemetry line.
pub const DEVICE_ID: &str = "humid_3";

/// Deep-sleep duration between wake cycles, in seconds.
pub const SLEEP_INTERVAL_SECONDS: u64 = 30;

/// Upper bound on the association + DHCP wait. On expiry the cycle skips
/// transmission and sleeps.
pub const JOIN_TIMEOUT_SECONDS: u64 = 60;

/// Hold-off after reporting an unsupported WBGT configuration, so the
/// message is visible on the console before the node disappears into sleep.
pub const GRACE_DELAY_SECONDS: u64 = 30;

/// WBGT coefficient-set selection: version 3 or 4, with the wide-range
/// extension of the fit.
pub const WBGT_VERSION: u8 = 3;
pub const WBGT_WIDE: bool = true;

/// SHT31 bus address: 0x44 with the ADDR pin low, 0x45 with it high.
pub const SHT31_ADDRESS: u8 = crate::sht31::ADDRESS_PRIMARY;
