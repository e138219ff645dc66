//! Hardware abstraction layer
//!
//! Trait seams for everything the core drives or samples. The firmware crate
//! implements these on top of the ESP32 peripherals; tests use small mocks.

use smart_leds::RGB8;

/// Bank of 16-bit output ports, one bit per valve channel
pub trait PortExpander {
    type Error: core::fmt::Debug;

    /// Set every pin of every port to output mode
    fn configure_outputs(&mut self) -> Result<(), Self::Error>;

    /// Drive all 16 pins of `port` at once
    fn write_port(&mut self, port: u8, value: u16) -> Result<(), Self::Error>;
}

/// Sink for the status matrix frames
///
/// Colors arrive already scaled to the matrix brightness, in strip order.
pub trait LedDriver<const N: usize> {
    /// Push one full frame of `N` pixels out to the strip
    fn write(&mut self, colors: &[RGB8; N]);
}

/// Four 4-20 mA current loop inputs
pub trait PressureSensors {
    /// Raw 12-bit ADC values, one per channel
    fn read_bitvals(&mut self) -> [u16; 4];
}
