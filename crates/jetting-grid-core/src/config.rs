#![allow(clippy::unreadable_literal)]

use embassy_time::Duration;

/// Minimum x-coordinate of the protocol coordinate system
pub const X_MIN: i8 = -7;
/// Maximum x-coordinate of the protocol coordinate system
pub const X_MAX: i8 = 7;
/// Minimum y-coordinate of the protocol coordinate system
pub const Y_MIN: i8 = -7;
/// Maximum y-coordinate of the protocol coordinate system
pub const Y_MAX: i8 = 7;

/// Number of grid positions along one axis
#[allow(clippy::cast_sign_loss)]
pub const AXIS_LEN: usize = (X_MAX - X_MIN + 1) as usize;

/// Valves are numbered 1 to 112, 0 means 'no valve'
pub const N_VALVES: u8 = 112;

/// MCP23017 ports over both Centipede boards, 16 channels each
pub const N_PORTS: usize = 8;

pub const LED_AXIS_LEN: usize = 16;
pub const N_LEDS: usize = LED_AXIS_LEN * LED_AXIS_LEN;

/// Make it as large as free RAM allows.
pub const PROTOCOL_MAX_LINES: usize = 5000;

/// Sized for the full lattice instead of `N_VALVES`, so any list of in-bounds
/// points fits.
pub const MAX_POINTS_PER_LINE: usize = AXIS_LEN * AXIS_LEN;

pub const PROTOCOL_NAME_LEN: usize = 64;

pub const IDENTITY: &str = "ESP32, TWT jetting grid";

pub struct TimingConfig {
    pub command_poll: Duration,
    pub led_fade: Duration,
    pub led_show: Duration,
    pub alive_blink: Duration,
    /// Full period of the square wave sent to the safety MCU. The safety MCU
    /// drops the pump relay after 100 ms without a rising edge.
    pub safety_pulse_period: Duration,
    pub load_timeout: Duration,
    pub halt_blink: Duration,
    pub pressure_sample: Duration,
}

pub const TIMING: TimingConfig = TimingConfig {
    command_poll: Duration::from_millis(10),
    led_fade: Duration::from_millis(20),
    led_show: Duration::from_millis(20),
    alive_blink: Duration::from_millis(500),
    safety_pulse_period: Duration::from_millis(20),
    load_timeout: Duration::from_millis(4000),
    halt_blink: Duration::from_millis(1000),
    pressure_sample: Duration::from_millis(10),
};

pub struct LedConfig {
    pub brightness: u8,
    pub halt_brightness_high: u8,
    pub halt_brightness_low: u8,
    /// Scale applied to released (pure blue) pixels every fade step
    pub fade_scale: u8,
}

pub const LEDS: LedConfig = LedConfig {
    brightness: 30,
    halt_brightness_high: 30,
    halt_brightness_low: 5,
    fade_scale: 255 - 10,
};

/// Low-pass cut-off of the pressure readings [Hz]
pub const PRESSURE_LOW_PASS_HZ: f32 = 10.0;

/// Loop currents at or below this mean a broken 4-20 mA loop [mA]
pub const R_CLICK_FAULT_MA: f32 = 3.8;

/// Two-point calibration of a MIKROE 4-20 mA R Click board
#[derive(Debug, Clone, Copy)]
pub struct RClickCalibration {
    pub p1_ma: f32,
    pub p2_ma: f32,
    pub p1_bitval: u16,
    pub p2_bitval: u16,
}

/// Calibration sheet values of an Omega PXM309 pressure sensor
#[derive(Debug, Clone, Copy)]
pub struct OmegaCalibration {
    pub balance_ma: f32,
    pub sensitivity_ma: f32,
    pub full_range_bar: f32,
}

// Calibrated against a multimeter @ 14-07-2022
pub const R_CLICK_CALIBRATIONS: [RClickCalibration; 4] = [
    RClickCalibration { p1_ma: 3.99, p2_ma: 20.00, p1_bitval: 791, p2_bitval: 3971 },
    RClickCalibration { p1_ma: 3.98, p2_ma: 19.57, p1_bitval: 784, p2_bitval: 3881 },
    RClickCalibration { p1_ma: 3.96, p2_ma: 19.68, p1_bitval: 774, p2_bitval: 3908 },
    RClickCalibration { p1_ma: 3.98, p2_ma: 19.83, p1_bitval: 828, p2_bitval: 3981 },
];

// Serials BG042821D030, D032, D034 and D041
pub const OMEGA_CALIBRATIONS: [OmegaCalibration; 4] = [
    OmegaCalibration { balance_ma: 4.035, sensitivity_ma: 16.015, full_range_bar: 7.0 },
    OmegaCalibration { balance_ma: 4.024, sensitivity_ma: 16.002, full_range_bar: 7.0 },
    OmegaCalibration { balance_ma: 4.004, sensitivity_ma: 16.057, full_range_bar: 7.0 },
    OmegaCalibration { balance_ma: 3.995, sensitivity_ma: 16.001, full_range_bar: 7.0 },
];
