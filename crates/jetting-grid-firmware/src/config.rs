#![allow(clippy::unreadable_literal)]

use jetting_grid_core::config::N_PORTS;

pub(crate) struct SerialConfig {
    pub baudrate: u32,
    /// Bytes drained from the UART per loop pass
    pub rx_chunk: usize,
}

pub(crate) struct BusConfig {
    pub i2c_khz: u32,
    pub spi_khz: u32,
}

pub(crate) struct ExpanderConfig {
    /// I2C address of the MCP23017 driving port 0
    pub base_address: u8,
    pub n_ports: u8,
}

pub(crate) struct WatchdogConfig {
    pub timeout_ms: u64,
    /// Shorter timeout once halted, the halt loop is light
    pub halted_timeout_ms: u64,
}

pub(crate) struct FirmwareConfig {
    pub version: &'static str,
}

pub(crate) const SERIAL: SerialConfig = SerialConfig {
    baudrate: 115200,
    rx_chunk: 128,
};

pub(crate) const BUS: BusConfig = BusConfig {
    i2c_khz: 1000,
    spi_khz: 1000,
};

// Both Centipede boards, addresses 0x20 to 0x27
#[allow(clippy::cast_possible_truncation)]
pub(crate) const EXPANDER: ExpanderConfig = ExpanderConfig {
    base_address: 0x20,
    n_ports: N_PORTS as u8,
};

pub(crate) const WATCHDOG: WatchdogConfig = WatchdogConfig {
    timeout_ms: 8000,
    halted_timeout_ms: 1000,
};

pub(crate) const FIRMWARE: FirmwareConfig = FirmwareConfig {
    version: env!("BUILD_VERSION"),
};

macro_rules! led_gpio {
    ($p:expr) => {
        $p.GPIO25
    };
}

macro_rules! safety_pulse_gpio {
    ($p:expr) => {
        $p.GPIO26
    };
}

/// SDA, SCL
macro_rules! i2c_gpio {
    ($p:expr) => {
        ($p.GPIO21, $p.GPIO22)
    };
}

/// SCK, MOSI, MISO
macro_rules! spi_gpio {
    ($p:expr) => {
        ($p.GPIO18, $p.GPIO23, $p.GPIO19)
    };
}

/// Chip selects of R Click 1 to 4
macro_rules! r_click_cs_gpio {
    ($p:expr) => {
        ($p.GPIO5, $p.GPIO17, $p.GPIO16, $p.GPIO4)
    };
}

/// TX, RX of the USB bridge
macro_rules! uart_gpio {
    ($p:expr) => {
        ($p.GPIO1, $p.GPIO3)
    };
}
