//! ANT heart-rate receiver firmware
//!
//! Drives an ANT network processor over UART0 from an RP2040, opens the
//! receive channel described in radio.toml and logs the broadcasts.
//!
//! Wiring (board-specific):
//! - GPIO0 / GPIO1: UART0 TX / RX to the radio's RXD / TXD
//! - GPIO2: RESET (active low)
//! - GPIO3: SLEEP
//! - GPIO4: SUSPEND (active low)
//! - GPIO5: RTS from the radio

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use antlink_core::{AntDriver, PinControl};
use antlink_hal_rp2040::{uart_config, EmbassyClock, RpOutput, RpSerial};

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("antlink firmware starting...");

    let p = embassy_rp::init(Default::default());

    info!(
        "Radio link: {} baud, stall threshold {}",
        config::SERIAL.baudrate,
        config::LINK.stall_threshold
    );

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        tx_buf,
        rx_buf,
        uart_config(&config::SERIAL),
    );

    // Lines start in their inactive state until the driver takes over
    let reset = RpOutput::new(Output::new(p.PIN_2, Level::High));
    let sleep = RpOutput::new(Output::new(p.PIN_3, Level::Low));
    let suspend = RpOutput::new(Output::new(p.PIN_4, Level::High));
    let rts = Input::new(p.PIN_5, Pull::Down);

    let control = PinControl::new(reset, sleep, suspend, &channels::RTS_LEVEL, Delay);
    let driver = AntDriver::begin(
        RpSerial::new(uart),
        EmbassyClock,
        control,
        &channels::READY,
        config::LINK,
    );

    info!("Radio driver initialized");

    // The edge task must be watching RTS before the radio is reset
    spawner.spawn(tasks::rts_task(rts)).unwrap();
    spawner
        .spawn(tasks::radio_task(driver, config::CHANNEL))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
