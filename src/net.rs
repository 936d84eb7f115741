//! Wireless association and telemetry transport

use core::net::Ipv4Addr;

use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, IpEndpoint, Stack};
use embassy_time::{Duration, Timer, with_timeout};
use esp_println::println;
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController};

use crate::traits::StatusLed;

/// Association poll period; the status LED toggles once per poll.
const JOIN_POLL_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
    /// The driver rejected configuration or startup.
    Radio,
    /// No association with a DHCPv4 lease inside the configured window.
    Timeout,
}

/// Datagram transmission failure. Non-fatal: telemetry is sampled again one
/// sleep interval later, so loss is self-healing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    Bind,
    Send,
}

/// Associate to the access point and wait for a DHCPv4 lease, toggling the
/// status LED once per second while waiting.
///
/// The wait is bounded by `timeout`: an unreachable access point must not
/// strand the node awake past its power budget. On expiry the caller skips
/// transmission and proceeds to sleep.
pub async fn join(
    controller: &mut WifiController<'static>,
    stack: Stack<'static>,
    led: &mut impl StatusLed,
    ssid: &str,
    password: &str,
    timeout: Duration,
) -> Result<Ipv4Addr, JoinError> {
    let client = ClientConfig::default()
        .with_ssid(ssid.into())
        .with_password(password.into());
    controller
        .set_config(&ModeConfig::Client(client))
        .map_err(|err| {
            println!("wifi: station config rejected: {:?}", err);
            JoinError::Radio
        })?;
    controller.start_async().await.map_err(|err| {
        println!("wifi: driver start failed: {:?}", err);
        JoinError::Radio
    })?;

    match with_timeout(timeout, associate(controller, stack, led)).await {
        Ok(address) => Ok(address),
        Err(_) => Err(JoinError::Timeout),
    }
}

async fn associate(
    controller: &mut WifiController<'static>,
    stack: Stack<'static>,
    led: &mut impl StatusLed,
) -> Ipv4Addr {
    let mut associated = false;
    loop {
        if !associated {
            match controller.connect_async().await {
                Ok(()) => associated = true,
                Err(err) => println!("wifi: connect error: {:?}", err),
            }
        }
        if associated {
            if !matches!(controller.is_connected(), Ok(true)) {
                // Association dropped; try again on the next pass.
                associated = false;
            } else if let Some(config) = stack.config_v4() {
                return config.address.address();
            }
        }
        led.toggle();
        Timer::after(JOIN_POLL_PERIOD).await;
    }
}

/// Disassociate and stop the radio driver. Runs before the radio rail is
/// cut; failures only get logged, shutdown continues regardless.
pub async fn shutdown(controller: &mut WifiController<'static>) {
    if let Err(err) = controller.disconnect_async().await {
        println!("wifi: disconnect error: {:?}", err);
    }
    if let Err(err) = controller.stop_async().await {
        println!("wifi: stop error: {:?}", err);
    }
}

/// Send one telemetry line as a single best-effort datagram.
///
/// The socket lives for exactly one send and is dropped regardless of the
/// outcome. No retry, no acknowledgment.
pub async fn send_report(
    stack: Stack<'static>,
    payload: &[u8],
    destination: [u8; 4],
    port: u16,
) -> Result<(), SendError> {
    let mut rx_meta = [PacketMetadata::EMPTY; 1];
    let mut rx_buffer = [0u8; 64];
    let mut tx_meta = [PacketMetadata::EMPTY; 1];
    let mut tx_buffer = [0u8; 256];

    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket.bind(0).map_err(|_| SendError::Bind)?;

    let endpoint = IpEndpoint::new(IpAddress::Ipv4(Ipv4Addr::from(destination)), port);
    socket
        .send_to(payload, endpoint)
        .await
        .map_err(|_| SendError::Send)
}
