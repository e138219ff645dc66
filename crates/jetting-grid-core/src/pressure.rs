//! Pressure readings of the four Omega sensors behind the R Click boards
//!
//! The raw ADC values are oversampled and smoothed by a one-pole low-pass
//! filter. Conversion to mA and bar happens on request only.

use core::fmt;

use embassy_time::{Duration, Instant};

use crate::{
    config::{
        OMEGA_CALIBRATIONS, OmegaCalibration, PRESSURE_LOW_PASS_HZ, R_CLICK_CALIBRATIONS,
        R_CLICK_FAULT_MA, RClickCalibration, TIMING,
    },
    ports::PressureSensors,
};

pub const N_SENSORS: usize = 4;

/// Linear two-point conversion of an ADC value to a loop current [mA]
///
/// NaN when the current is at or below [`R_CLICK_FAULT_MA`], i.e. a broken
/// loop or a disconnected sensor.
pub fn bitval_to_ma(cal: &RClickCalibration, bitval: f32) -> f32 {
    let slope = (cal.p2_ma - cal.p1_ma) / (f32::from(cal.p2_bitval) - f32::from(cal.p1_bitval));
    let ma = cal.p1_ma + (bitval - f32::from(cal.p1_bitval)) * slope;
    if ma > R_CLICK_FAULT_MA { ma } else { f32::NAN }
}

/// Loop current [mA] to gauge pressure [bar]
pub fn ma_to_bar(cal: &OmegaCalibration, ma: f32) -> f32 {
    (ma - cal.balance_ma) / cal.sensitivity_ma * cal.full_range_bar
}

/// Smoothing factor for a sample taken `dt` after the previous one
#[allow(clippy::cast_precision_loss)]
fn smoothing_factor(dt: Duration) -> f32 {
    1.0 - libm::expf(-(dt.as_micros() as f32) * 1e-6 * PRESSURE_LOW_PASS_HZ)
}

/// Exponential moving average over all four channels
pub struct PressureMonitor {
    ema: [f32; N_SENSORS],
    started: bool,
    last: Instant,
}

impl PressureMonitor {
    pub const fn new() -> Self {
        Self {
            ema: [0.0; N_SENSORS],
            started: false,
            last: Instant::from_ticks(0),
        }
    }

    /// Take a sample once per sample period. Returns true when a sample was
    /// taken.
    pub fn poll<S: PressureSensors>(&mut self, now: Instant, sensors: &mut S) -> bool {
        let dt = now.saturating_duration_since(self.last);
        if self.started && dt < TIMING.pressure_sample {
            return false;
        }
        let raw = sensors.read_bitvals();
        if self.started {
            let alpha = smoothing_factor(dt);
            for (ema, &bitval) in self.ema.iter_mut().zip(&raw) {
                *ema += alpha * (f32::from(bitval) - *ema);
            }
        } else {
            self.ema = raw.map(f32::from);
            self.started = true;
        }
        self.last = now;
        true
    }

    /// Smoothed raw ADC values
    pub fn bitvals(&self) -> [f32; N_SENSORS] {
        self.ema
    }

    pub fn readings(&self) -> Readings {
        let mut readings = Readings::default();
        for i in 0..N_SENSORS {
            readings.ma[i] = bitval_to_ma(&R_CLICK_CALIBRATIONS[i], self.ema[i]);
            readings.bar[i] = ma_to_bar(&OMEGA_CALIBRATIONS[i], readings.ma[i]);
        }
        readings
    }
}

impl Default for PressureMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    pub ma: [f32; N_SENSORS],
    pub bar: [f32; N_SENSORS],
}

impl fmt::Display for Readings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ma in &self.ma {
            write!(f, "{:.2}\t", ma)?;
        }
        for (i, bar) in self.bar.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            write!(f, "{:.3}", bar)?;
        }
        Ok(())
    }
}
