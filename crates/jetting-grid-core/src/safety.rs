//! Safety pulses for the pump safety MCU
//!
//! The safety MCU only keeps the jetting pump running while it receives a
//! square wave. No valves open means no pulses, which makes the safety MCU
//! drop the pump after its own timeout.

use embassy_time::Instant;
use embedded_hal::digital::{OutputPin, PinState};

use crate::{config::TIMING, interval::Every};

pub struct SafetyPulse<P: OutputPin> {
    pin: P,
    level: bool,
    gate: Every,
    overridden: bool,
}

impl<P: OutputPin> SafetyPulse<P> {
    pub fn new(mut pin: P) -> Self {
        if pin.set_low().is_err() {
            log::warn!("safety: could not drive pulse pin low");
        }
        Self {
            pin,
            level: false,
            gate: Every::new(TIMING.safety_pulse_period / 2),
            overridden: false,
        }
    }

    /// Force the pump to be allowed regardless of the valves. Troubleshooting
    /// only.
    pub fn set_override(&mut self, overridden: bool) {
        if overridden {
            log::warn!("safety: pump safety overridden");
        }
        self.overridden = overridden;
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    pub fn pump_allowed(&self, all_valves_closed: bool) -> bool {
        self.overridden || !all_valves_closed
    }

    /// Toggle the pin every half period while the pump is allowed. Returns
    /// whether the pump is allowed.
    pub fn update(&mut self, now: Instant, all_valves_closed: bool) -> bool {
        let allowed = self.pump_allowed(all_valves_closed);
        if allowed && self.gate.ready(now) {
            self.level = !self.level;
            if self.pin.set_state(PinState::from(self.level)).is_err() {
                log::warn!("safety: could not toggle pulse pin");
            }
        }
        allowed
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_time::Duration;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct Pin {
        high: bool,
        edges: usize,
    }

    impl ErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if !self.high {
                self.edges += 1;
            }
            self.high = true;
            Ok(())
        }
    }

    fn run(pulse: &mut SafetyPulse<Pin>, closed: bool, until_ms: u64) {
        for ms in 0..=until_ms {
            pulse.update(Instant::from_millis(1000 + ms), closed);
        }
    }

    #[test]
    fn no_pulses_with_valves_closed() {
        let mut pulse = SafetyPulse::new(Pin::default());
        run(&mut pulse, true, 200);
        assert_eq!(pulse.pin.edges, 0);
        assert!(!pulse.pump_allowed(true));
    }

    #[test]
    fn pulses_while_valves_open() {
        let mut pulse = SafetyPulse::new(Pin::default());
        run(&mut pulse, false, 199);
        // One rising edge per 20 ms period
        assert_eq!(pulse.pin.edges, 10);
    }

    #[test]
    fn override_forces_pulses() {
        let mut pulse = SafetyPulse::new(Pin::default());
        pulse.set_override(true);
        assert!(pulse.update(Instant::from_millis(0) + Duration::from_secs(1), true));
        assert!(pulse.level());
        pulse.set_override(false);
        assert!(!pulse.update(Instant::from_millis(2000), true));
        assert!(pulse.level());
    }
}
