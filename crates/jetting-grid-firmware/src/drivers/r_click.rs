use embedded_hal::{digital::OutputPin, spi::SpiBus};

use jetting_grid_core::{PressureSensors, pressure::N_SENSORS};

/// MIKROE 4-20 mA R Click boards sharing one SPI bus
///
/// Each board carries an MCP3201 12-bit ADC behind its own chip select. A
/// conversion is clocked out as two bytes: two sample bits, a null bit, the
/// twelve data bits MSB first and one trailing bit.
pub(crate) struct RClickBank<B, C> {
    spi: B,
    cs: [C; N_SENSORS],
    last: [u16; N_SENSORS],
}

impl<B, C> RClickBank<B, C>
where
    B: SpiBus,
    C: OutputPin,
{
    pub(crate) fn new(spi: B, mut cs: [C; N_SENSORS]) -> Self {
        for pin in &mut cs {
            let _ = pin.set_high();
        }
        Self {
            spi,
            cs,
            last: [0; N_SENSORS],
        }
    }

    fn read_one(&mut self, idx: usize) -> Result<u16, B::Error> {
        let mut buf = [0xFF; 2];

        let _ = self.cs[idx].set_low();
        let result = self
            .spi
            .transfer_in_place(&mut buf)
            .and_then(|()| self.spi.flush());
        let _ = self.cs[idx].set_high();
        result?;

        Ok((u16::from(buf[0] & 0x1F) << 7) | (u16::from(buf[1]) >> 1))
    }
}

impl<B, C> PressureSensors for RClickBank<B, C>
where
    B: SpiBus,
    C: OutputPin,
{
    /// Channels that fail to read repeat their previous value
    fn read_bitvals(&mut self) -> [u16; N_SENSORS] {
        for idx in 0..N_SENSORS {
            match self.read_one(idx) {
                Ok(bitval) => self.last[idx] = bitval,
                Err(err) => log::warn!("r_click: channel {} read failed: {:?}", idx + 1, err),
            }
        }
        self.last
    }
}
