//! Soft Access Point
//!
//! Brings up the CYW43439 on the Pico W as a WPA2 access point and starts
//! the embassy-net stack on a static address. Clients get their
//! addresses from [`super::dhcp::dhcp_task`].
//!
//! # Startup Flow
//!
//! ```text
//! 1. Power the CYW43439 and attach it over PIO SPI
//! 2. Spawn the radio driver task
//! 3. Create the network stack with a static IPv4 config
//! 4. Spawn the network stack task
//! 5. Load the CLM blob and start the access point
//! ```
//!
//! The firmware blobs are not redistributed with this crate; see
//! `cyw43-firmware/README.md`.

use cyw43::Control;
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use embassy_executor::{SpawnError, Spawner};
use embassy_net::{Config as NetConfig, Ipv4Address, Ipv4Cidr, Stack, StackResources, StaticConfigV4};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use static_cell::StaticCell;

use crate::config::network::{
    AP_ADDRESS, AP_CHANNEL, AP_PASSPHRASE, AP_PREFIX_LEN, AP_SSID, STACK_SEED, STACK_SOCKETS,
};

bind_interrupts!(struct PioIrqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Peripherals wired to the on-module radio
pub struct RadioPins {
    /// Power enable
    pub pwr: PIN_23,
    /// SPI data
    pub dio: PIN_24,
    /// SPI chip select
    pub cs: PIN_25,
    /// SPI clock
    pub clk: PIN_29,
    /// PIO block driving the SPI
    pub pio: PIO0,
    /// DMA channel for the SPI
    pub dma: DMA_CH0,
}

/// Access point bring-up failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum WifiError {
    /// A background task could not be spawned
    Spawn,
}

impl From<SpawnError> for WifiError {
    fn from(_: SpawnError) -> Self {
        Self::Spawn
    }
}

/// Panel network configuration: static address, no upstream gateway
#[must_use]
pub fn ap_net_config() -> NetConfig {
    let [a, b, c, d] = AP_ADDRESS;
    NetConfig::ipv4_static(StaticConfigV4 {
        address: Ipv4Cidr::new(Ipv4Address::new(a, b, c, d), AP_PREFIX_LEN),
        gateway: None,
        dns_servers: heapless::Vec::new(),
    })
}

/// Start the access point and network stack
///
/// # Errors
///
/// `WifiError::Spawn` if the driver or stack task cannot be spawned.
pub async fn start_access_point(
    spawner: Spawner,
    pins: RadioPins,
) -> Result<(Stack<'static>, &'static mut Control<'static>), WifiError> {
    let fw = include_bytes!("../../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../../cyw43-firmware/43439A0_clm.bin");

    let pwr = Output::new(pins.pwr, Level::Low);
    let cs = Output::new(pins.cs, Level::High);
    let mut pio = Pio::new(pins.pio, PioIrqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        pins.dio,
        pins.clk,
        pins.dma,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(wifi_task(runner))?;

    static RESOURCES: StaticCell<StackResources<STACK_SOCKETS>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        ap_net_config(),
        RESOURCES.init(StackResources::new()),
        STACK_SEED,
    );
    spawner.spawn(net_task(runner))?;

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    log_info!("starting access point {} on channel {}", AP_SSID, AP_CHANNEL);
    control.start_ap_wpa2(AP_SSID, AP_PASSPHRASE, AP_CHANNEL).await;

    static CONTROL: StaticCell<Control<'static>> = StaticCell::new();
    Ok((stack, CONTROL.init(control)))
}

/// CYW43 driver task
#[embassy_executor::task]
async fn wifi_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

/// Network stack task
#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
