use static_cell::make_static;

use esp_hal::xtensa_lx::interrupt;
use esp_hal::{gpio::interconnect::PeripheralOutput, peripherals::RMT, rmt::Rmt, time::Rate};
use esp_hal_smartled::{SmartLedsAdapter, buffer_size, smart_led_buffer};
use smart_leds::{RGB8, SmartLedsWrite};

use jetting_grid_core::{LedDriver, config::N_LEDS};

/// WS2812 matrix driven by the RMT peripheral
///
/// The RMT (Remote Control) peripheral generates the precise timing signals
/// required by WS2812B LEDs, the CPU only fills the pulse buffer.
pub(crate) struct EspLedDriver<'a> {
    adapter: SmartLedsAdapter<'a, { buffer_size(N_LEDS) }>,
}

impl<'a> EspLedDriver<'a> {
    /// Create a new ESP LED driver
    ///
    /// # Arguments
    /// * `rmt` - RMT peripheral
    /// * `pin` - GPIO pin connected to the LED data line
    pub(crate) fn new<O>(rmt: RMT<'a>, pin: O) -> Result<Self, esp_hal::rmt::Error>
    where
        O: PeripheralOutput<'a>,
    {
        let rmt = Rmt::new(rmt, Rate::from_mhz(80))?;

        // Lives for the entire program
        let rmt_buffer = make_static!(smart_led_buffer!(N_LEDS));
        let adapter = SmartLedsAdapter::new(rmt.channel0, pin, rmt_buffer);

        Ok(Self { adapter })
    }
}

impl LedDriver<N_LEDS> for EspLedDriver<'static> {
    fn write(&mut self, colors: &[RGB8; N_LEDS]) {
        // ~8 ms for the full matrix, no interrupts while the pulses go out
        let mut result = Ok(());
        interrupt::free(|| {
            result = self.adapter.write(colors.iter().copied());
        });
        if let Err(err) = result {
            log::warn!("led: write failed: {:?}", err);
        }
    }
}
