//! RF Panel Main Application
//!
//! Entry point for the Pico W based 433 MHz RF panel firmware.
//! Brings up the access point, spawns the DHCP and HTTP servers and runs
//! the scheduler loop, pausing 1 ms after every tick.

#![no_std]
#![no_main]

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use rf_panel::control::scheduler::Scheduler;
use rf_panel::hal::gpio::StatusLed;
use rf_panel::hal::transmitter::RfTransmitter;
use rf_panel::net::dhcp::dhcp_task;
use rf_panel::net::http::http_task;
use rf_panel::net::link::ChannelRequests;
use rf_panel::net::wifi::{start_access_point, RadioPins};
use rf_panel::prelude::*;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("RF Panel Firmware v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    info!("Peripherals initialized");

    // Outputs first so the transmitter is quiet while the radio boots
    let mut tx = RfTransmitter::new(Output::new(p.PIN_12, Level::Low), Delay, TX_REPEAT_COUNT);
    let mut led = StatusLed::new(Output::new(p.PIN_15, Level::Low), INDICATOR_ACTIVE_LIT);

    let radio = RadioPins {
        pwr: p.PIN_23,
        dio: p.PIN_24,
        cs: p.PIN_25,
        clk: p.PIN_29,
        pio: p.PIO0,
        dma: p.DMA_CH0,
    };
    let stack = match start_access_point(spawner, radio).await {
        Ok((stack, _control)) => stack,
        Err(e) => {
            // Without the network there is nothing to schedule
            error!("access point failed: {}", e);
            return;
        }
    };

    if spawner.spawn(dhcp_task(stack)).is_err() {
        error!("failed to spawn dhcp task");
        return;
    }
    if spawner.spawn(http_task(stack)).is_err() {
        error!("failed to spawn http task");
        return;
    }

    info!("Tasks spawned, entering scheduler loop");

    let mut scheduler = Scheduler::new(now());
    let mut requests = ChannelRequests;
    loop {
        scheduler.tick(now(), &mut requests, &mut tx, &mut led);
        // A transmission blocks for its whole airtime. Always sleep after the
        // tick, never catch up, so the server tasks get to run in between.
        Timer::after(Duration::from_millis(TICK_INTERVAL_MS)).await;
    }
}

/// Current scheduler time
fn now() -> Timestamp {
    Timestamp::from_uptime_ms(Instant::now().as_millis())
}
