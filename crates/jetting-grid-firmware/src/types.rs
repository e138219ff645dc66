use esp_hal::{Blocking, gpio::Output, i2c::master::I2c, spi::master::Spi, uart::Uart};

use jetting_grid_core::Controller;

use crate::drivers::{EspLedDriver, Mcp23017Bank, RClickBank, SerialLink};

pub(crate) type ValveExpander = Mcp23017Bank<I2c<'static, Blocking>>;
pub(crate) type MatrixDriver = EspLedDriver<'static>;
pub(crate) type PressureBank = RClickBank<Spi<'static, Blocking>, Output<'static>>;
pub(crate) type ControlLink = SerialLink<Uart<'static, Blocking>>;

pub(crate) type GridController =
    Controller<'static, ValveExpander, MatrixDriver, Output<'static>, PressureBank>;
