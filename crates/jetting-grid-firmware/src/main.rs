#![no_std]
#![no_main]
#![feature(type_alias_impl_trait)]

#[macro_use]
mod config;
mod drivers;
mod types;

use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Timer};

use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    gpio::{Level, Output, OutputConfig},
    i2c::master::{Config as I2cConfig, I2c},
    spi::{
        Mode as SpiMode,
        master::{Config as SpiConfig, Spi},
    },
    time::{Duration as HalDuration, Rate},
    timer::timg::{MwdtStage, TimerGroup},
    uart::{Config as UartConfig, Uart},
};
use static_cell::ConstStaticCell;

use jetting_grid_core::{
    Controller, ControllerState, Every, Peripherals, Protocol, Translator, config::TIMING,
    tables::WIRING,
};

use crate::config::{BUS, EXPANDER, FIRMWARE, SERIAL, WATCHDOG};
use crate::drivers::{EspLedDriver, Mcp23017Bank, RClickBank, SerialLink};
use crate::types::{ControlLink, GridController};

esp_bootloader_esp_idf::esp_app_desc!();

// Too large for any stack, lives in .data from the start
static PROTOCOL: ConstStaticCell<Protocol> = ConstStaticCell::new(Protocol::new());

// static_cell::make_static! in main causes a compiler error
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    log::info!("jetting grid firmware {}", FIRMWARE.version);

    // Initialize hardware
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let mut wdt = timg0.wdt;
    esp_rtos::start(timg0.timer0);

    // A wiring table mistake must never reach the valves
    let translator = Translator::new(&WIRING).unwrap_or_else(|fault| panic!("{}", fault));

    // Valves
    let (sda, scl) = i2c_gpio!(peripherals);
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(BUS.i2c_khz)),
    )
    .unwrap_or_else(|err| panic!("i2c: {:?}", err))
    .with_sda(sda)
    .with_scl(scl);
    let expander = Mcp23017Bank::new(i2c, EXPANDER.base_address, EXPANDER.n_ports);

    // Pressure sensors
    let (sck, mosi, miso) = spi_gpio!(peripherals);
    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_khz(BUS.spi_khz))
            .with_mode(SpiMode::_0),
    )
    .unwrap_or_else(|err| panic!("spi: {:?}", err))
    .with_sck(sck)
    .with_mosi(mosi)
    .with_miso(miso);
    let (cs1, cs2, cs3, cs4) = r_click_cs_gpio!(peripherals);
    let sensors = RClickBank::new(
        spi,
        [
            Output::new(cs1, Level::High, OutputConfig::default()),
            Output::new(cs2, Level::High, OutputConfig::default()),
            Output::new(cs3, Level::High, OutputConfig::default()),
            Output::new(cs4, Level::High, OutputConfig::default()),
        ],
    );

    let led_driver = EspLedDriver::new(peripherals.RMT, led_gpio!(peripherals))
        .unwrap_or_else(|err| panic!("rmt: {:?}", err));
    let safety_pin = Output::new(
        safety_pulse_gpio!(peripherals),
        Level::Low,
        OutputConfig::default(),
    );

    // Control link
    let (tx, rx) = uart_gpio!(peripherals);
    let uart = Uart::new(
        peripherals.UART0,
        UartConfig::default().with_baudrate(SERIAL.baudrate),
    )
    .unwrap_or_else(|err| panic!("uart: {:?}", err))
    .with_tx(tx)
    .with_rx(rx);
    let serial = mk_static!(ControlLink, SerialLink::new(uart));

    let hardware = Peripherals {
        expander,
        led_driver,
        safety_pin,
        sensors,
    };
    let controller = mk_static!(
        GridController,
        Controller::new(PROTOCOL.take(), translator, hardware)
    );
    controller.start(&mut *serial);

    let mut rx_buf = [0u8; SERIAL.rx_chunk];
    let mut command_poll = Every::new(TIMING.command_poll);

    // Fed once per pass, a stuck loop resets the chip with the safety pulse
    // line quiet
    wdt.set_timeout(
        MwdtStage::Stage0,
        HalDuration::from_millis(WATCHDOG.timeout_ms),
    );
    wdt.enable();
    let mut watchdog_shortened = false;

    loop {
        let now = Instant::now();

        // Downloads stream in at full line rate, commands are only checked
        // every poll period
        let rx: &[u8] =
            if controller.state() == ControllerState::Loading || command_poll.ready(now) {
                serial.receive(&mut rx_buf)
            } else {
                &[]
            };
        controller.poll(now, rx, &mut *serial);

        if !watchdog_shortened && matches!(controller.state(), ControllerState::Halted(_)) {
            wdt.set_timeout(
                MwdtStage::Stage0,
                HalDuration::from_millis(WATCHDOG.halted_timeout_ms),
            );
            watchdog_shortened = true;
        }
        wdt.feed();

        if controller.reset_requested() {
            // Let "Resetting..." leave the UART first
            Timer::after(Duration::from_millis(10)).await;
            esp_hal::system::software_reset();
        }

        Timer::after(Duration::from_millis(1)).await;
    }
}
