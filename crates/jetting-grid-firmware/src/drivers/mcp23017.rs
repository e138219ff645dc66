use embedded_hal::i2c::I2c;

use jetting_grid_core::PortExpander;

/// I/O direction register of port A, port B follows at `IODIRA + 1`
const IODIRA: u8 = 0x00;
/// GPIO register of port A, port B follows at `GPIOA + 1`
const GPIOA: u8 = 0x12;

/// MCP23017 expanders on one I2C bus at consecutive addresses
///
/// Each chip serves one 16-bit output port: port A carries the low byte and
/// port B the high byte. With the power-on register layout (`IOCON.BANK = 0`)
/// the A and B registers sit next to each other, so both bytes go out in a
/// single sequential write.
pub(crate) struct Mcp23017Bank<I> {
    i2c: I,
    base_address: u8,
    n_ports: u8,
}

impl<I: I2c> Mcp23017Bank<I> {
    /// # Arguments
    /// * `i2c` - Bus the expanders hang on
    /// * `base_address` - 7-bit address of the chip serving port 0
    /// * `n_ports` - Number of chips, port `n` lives at `base_address + n`
    pub(crate) fn new(i2c: I, base_address: u8, n_ports: u8) -> Self {
        Self {
            i2c,
            base_address,
            n_ports,
        }
    }

    fn address(&self, port: u8) -> u8 {
        self.base_address + port
    }
}

impl<I: I2c> PortExpander for Mcp23017Bank<I> {
    type Error = I::Error;

    fn configure_outputs(&mut self) -> Result<(), Self::Error> {
        for port in 0..self.n_ports {
            let address = self.address(port);
            self.i2c.write(address, &[IODIRA, 0x00, 0x00])?;
        }
        log::info!("mcp23017: {} ports set to output", self.n_ports);
        Ok(())
    }

    fn write_port(&mut self, port: u8, value: u16) -> Result<(), Self::Error> {
        let [lo, hi] = value.to_le_bytes();
        let address = self.address(port);
        self.i2c.write(address, &[GPIOA, lo, hi])
    }
}
