//! LED matrix frame buffer
//!
//! 16x16 WS2812 matrix mirroring the valve grid. Active valves are red,
//! released valves turn blue and fade out, grid points without a valve are
//! grey. Pixel 255 blinks in the color of the controller state.

use smart_leds::{
    RGB8, brightness,
    hsv::{Hsv, hsv2rgb},
};

use crate::{
    config::{LEDS, N_LEDS, X_MAX, X_MIN, Y_MAX, Y_MIN},
    fault::Fault,
    grid::GridPoint,
    ports::LedDriver,
    translate::Translator,
};

pub const BLACK: RGB8 = RGB8::new(0, 0, 0);
pub const RED: RGB8 = RGB8::new(255, 0, 0);
pub const GREEN: RGB8 = RGB8::new(0, 128, 0);
pub const BLUE: RGB8 = RGB8::new(0, 0, 255);
pub const YELLOW: RGB8 = RGB8::new(255, 255, 0);

pub const ACTIVE_COLOR: RGB8 = RED;
pub const RELEASED_COLOR: RGB8 = BLUE;
const FIXED_GRID_COLOR: RGB8 = RGB8::new(64, 64, 64);
const CENTER_COLOR: RGB8 = RGB8::new(0, 32, 0);

const ALIVE_PIXEL: usize = N_LEDS - 1;

const HALT_BAR_LEN: usize = 32;
const HALT_ID_START: usize = 177;
#[rustfmt::skip]
const HALT_TEXT: [u8; 37] = [
     81,  83,  85,  86,  87,  89,  92,  93,  94,  98,
    102, 104, 106, 108, 110, 113, 114, 115, 117, 118,
    119, 121, 125, 130, 134, 136, 138, 140, 142, 145,
    147, 149, 151, 153, 154, 155, 157,
];

pub struct LedMatrix {
    pixels: [RGB8; N_LEDS],
    brightness: u8,
    alive_color: RGB8,
    alive_on: bool,
}

impl LedMatrix {
    pub const fn new() -> Self {
        Self {
            pixels: [BLACK; N_LEDS],
            brightness: LEDS.brightness,
            alive_color: YELLOW,
            alive_on: false,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [BLACK; N_LEDS];
    }

    /// Rainbow shown while booting
    #[allow(clippy::cast_possible_truncation)]
    pub fn fill_rainbow(&mut self) {
        for (i, px) in self.pixels.iter_mut().enumerate() {
            *px = hsv2rgb(Hsv {
                hue: (i % 256) as u8,
                sat: 255,
                val: 255,
            });
        }
    }

    /// Paint the grid points without a valve, and the center
    pub fn paint_fixed_grid(&mut self, translator: &Translator) -> Result<(), Fault> {
        for x in X_MIN..=X_MAX {
            for y in Y_MIN..=Y_MAX {
                let p = GridPoint::new(x, y);
                if !p.is_valve_site() {
                    self.set_point(translator, p, FIXED_GRID_COLOR)?;
                }
            }
        }
        self.set_point(translator, GridPoint::new(0, 0), CENTER_COLOR)
    }

    /// Black out every valve pixel
    pub fn clear_valves(&mut self, translator: &Translator) -> Result<(), Fault> {
        for x in X_MIN..=X_MAX {
            for y in Y_MIN..=Y_MAX {
                let p = GridPoint::new(x, y);
                if p.is_valve_site() {
                    self.set_point(translator, p, BLACK)?;
                }
            }
        }
        Ok(())
    }

    pub fn set_point(
        &mut self,
        translator: &Translator,
        p: GridPoint,
        color: RGB8,
    ) -> Result<(), Fault> {
        let idx = translator.gridpoint_to_led(p)?;
        self.pixels[usize::from(idx)] = color;
        Ok(())
    }

    /// Dim every pure blue pixel one step
    pub fn fade_released(&mut self) {
        for px in &mut self.pixels {
            if px.b != 0 && px.r == 0 && px.g == 0 {
                px.b = scale8(px.b, LEDS.fade_scale);
            }
        }
    }

    pub fn set_alive_color(&mut self, color: RGB8) {
        self.alive_color = color;
    }

    pub fn blink_alive(&mut self) {
        self.alive_on = !self.alive_on;
        self.pixels[ALIVE_PIXEL] = if self.alive_on { self.alive_color } else { BLACK };
    }

    /// Red bars, the word 'HALT' and `id` pixels underneath
    pub fn paint_halt(&mut self, id: u8) {
        self.clear();
        self.pixels[..HALT_BAR_LEN].fill(RED);
        self.pixels[N_LEDS - HALT_BAR_LEN..].fill(RED);
        for &idx in &HALT_TEXT {
            self.pixels[usize::from(idx)] = RED;
        }
        let end = (HALT_ID_START + usize::from(id)).min(N_LEDS - HALT_BAR_LEN);
        self.pixels[HALT_ID_START..end].fill(RED);
    }

    pub fn set_brightness(&mut self, value: u8) {
        self.brightness = value;
    }

    pub fn pixels(&self) -> &[RGB8; N_LEDS] {
        &self.pixels
    }

    /// Push the frame, scaled to the current brightness
    pub fn show<D: LedDriver<N_LEDS>>(&self, driver: &mut D) {
        let mut frame = [BLACK; N_LEDS];
        for (dst, src) in frame
            .iter_mut()
            .zip(brightness(self.pixels.iter().copied(), self.brightness))
        {
            *dst = src;
        }
        driver.write(&frame);
    }
}

impl Default for LedMatrix {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn scale8(value: u8, scale: u8) -> u8 {
    ((u16::from(value) * u16::from(scale)) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::WIRING;

    struct Capture(Vec<RGB8>);

    impl LedDriver<N_LEDS> for Capture {
        fn write(&mut self, colors: &[RGB8; N_LEDS]) {
            self.0 = colors.to_vec();
        }
    }

    fn count(matrix: &LedMatrix, color: RGB8) -> usize {
        matrix.pixels().iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn fixed_grid() {
        let translator = Translator::new(&WIRING).unwrap();
        let mut matrix = LedMatrix::new();
        matrix.paint_fixed_grid(&translator).unwrap();
        // 113 even parity points, minus the center
        assert_eq!(count(&matrix, FIXED_GRID_COLOR), 112);
        assert_eq!(matrix.pixels()[119], CENTER_COLOR);
    }

    #[test]
    fn fade_only_touches_pure_blue() {
        let mut matrix = LedMatrix::new();
        matrix.pixels[0] = BLUE;
        matrix.pixels[1] = RED;
        matrix.pixels[2] = RGB8::new(0, 10, 255);
        matrix.fade_released();
        assert_eq!(matrix.pixels()[0], RGB8::new(0, 0, 244));
        assert_eq!(matrix.pixels()[1], RED);
        assert_eq!(matrix.pixels()[2], RGB8::new(0, 10, 255));

        for _ in 0..200 {
            matrix.fade_released();
        }
        assert_eq!(matrix.pixels()[0], BLACK);
    }

    #[test]
    fn alive_pixel_blinks() {
        let mut matrix = LedMatrix::new();
        matrix.set_alive_color(GREEN);
        matrix.blink_alive();
        assert_eq!(matrix.pixels()[255], GREEN);
        matrix.blink_alive();
        assert_eq!(matrix.pixels()[255], BLACK);
    }

    #[test]
    fn halt_screen_shows_id() {
        let mut matrix = LedMatrix::new();
        matrix.paint_halt(3);
        assert_eq!(count(&matrix, RED), 32 + 32 + 37 + 3);
        assert_eq!(matrix.pixels()[179], RED);
        assert_eq!(matrix.pixels()[180], BLACK);
    }

    #[test]
    fn show_applies_brightness() {
        let mut matrix = LedMatrix::new();
        matrix.pixels[0] = RGB8::new(255, 255, 255);
        matrix.set_brightness(0);
        let mut capture = Capture(Vec::new());
        matrix.show(&mut capture);
        assert_eq!(capture.0.len(), N_LEDS);
        assert_eq!(capture.0[0], BLACK);
    }

    #[test]
    fn rainbow_lights_every_pixel() {
        let mut matrix = LedMatrix::new();
        matrix.fill_rainbow();
        assert_eq!(count(&matrix, BLACK), 0);
        assert_ne!(matrix.pixels()[0], matrix.pixels()[128]);
    }
}
