mod led_ws2812;
mod mcp23017;
mod r_click;
mod serial;

pub(crate) use led_ws2812::EspLedDriver;
pub(crate) use mcp23017::Mcp23017Bank;
pub(crate) use r_click::RClickBank;
pub(crate) use serial::SerialLink;
