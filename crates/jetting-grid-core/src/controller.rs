//! Application state machine
//!
//! ```text
//!            on              load
//!   Idle ◄──────► Running    Idle ──► Loading ──► Idle
//!            off
//!   any ── Fault ──► Halted ── reset ──► (firmware restarts the chip)
//! ```
//!
//! The firmware calls [`Controller::poll`] from its main loop with whatever
//! bytes arrived on the control link since the previous call. Everything else
//! runs off the clock passed in.

use core::fmt::Write;

use embassy_time::Instant;
use embedded_hal::digital::OutputPin;

use crate::{
    channels::OutputChannels,
    command::Command,
    config::{IDENTITY, LEDS, N_LEDS, PROTOCOL_MAX_LINES, TIMING},
    fault::Fault,
    framing::{Framer, Mode},
    interval::Every,
    leds::{BLUE, GREEN, LedMatrix, YELLOW},
    loader::{Loader, Status},
    playback::{Jump, Player},
    ports::{LedDriver, PortExpander, PressureSensors},
    presets,
    pressure::PressureMonitor,
    protocol::Protocol,
    safety::SafetyPulse,
    translate::Translator,
    wire::MAX_FRAME_LEN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Running,
    Loading,
    Halted(Fault),
}

/// Hardware the controller drives
pub struct Peripherals<E, D, P, S> {
    pub expander: E,
    pub led_driver: D,
    pub safety_pin: P,
    pub sensors: S,
}

struct Gates {
    led_fade: Every,
    led_show: Every,
    alive_blink: Every,
    halt_blink: Every,
}

pub struct Controller<'a, E, D, P, S, const N: usize = PROTOCOL_MAX_LINES>
where
    E: PortExpander,
    D: LedDriver<N_LEDS>,
    P: OutputPin,
    S: PressureSensors,
{
    state: ControllerState,
    protocol: &'a mut Protocol<N>,
    player: Player<E>,
    leds: LedMatrix,
    led_driver: D,
    safety: SafetyPulse<P>,
    sensors: S,
    pressure: PressureMonitor,
    framer: Framer<MAX_FRAME_LEN>,
    loader: Loader,
    gates: Gates,
    halt_blink_on: bool,
    reset_requested: bool,
}

impl<'a, E, D, P, S, const N: usize> Controller<'a, E, D, P, S, N>
where
    E: PortExpander,
    D: LedDriver<N_LEDS>,
    P: OutputPin,
    S: PressureSensors,
{
    pub fn new(
        protocol: &'a mut Protocol<N>,
        translator: Translator,
        peripherals: Peripherals<E, D, P, S>,
    ) -> Self {
        Self {
            state: ControllerState::Idle,
            protocol,
            player: Player::new(translator, OutputChannels::new(peripherals.expander)),
            leds: LedMatrix::new(),
            led_driver: peripherals.led_driver,
            safety: SafetyPulse::new(peripherals.safety_pin),
            sensors: peripherals.sensors,
            pressure: PressureMonitor::new(),
            framer: Framer::new(),
            loader: Loader::new(),
            gates: Gates {
                led_fade: Every::new(TIMING.led_fade),
                led_show: Every::new(TIMING.led_show),
                alive_blink: Every::new(TIMING.alive_blink),
                halt_blink: Every::new(TIMING.halt_blink),
            },
            halt_blink_on: false,
            reset_requested: false,
        }
    }

    /// Close all valves, load preset 0 and go idle
    pub fn start(&mut self, out: &mut dyn Write) {
        self.leds.fill_rainbow();
        self.leds.show(&mut self.led_driver);

        if let Err(fault) = self.boot(out) {
            self.halt(fault);
        }
    }

    fn boot(&mut self, out: &mut dyn Write) -> Result<(), Fault> {
        self.player.init()?;
        presets::load_preset(0, self.protocol, self.player.translator())?;
        self.leds.clear();
        self.leds.paint_fixed_grid(self.player.translator())?;
        self.leds.show(&mut self.led_driver);
        self.enter(ControllerState::Idle, out)
    }

    /// Run one pass of the control loop
    pub fn poll(&mut self, now: Instant, rx: &[u8], out: &mut dyn Write) {
        if let ControllerState::Halted(fault) = self.state {
            self.poll_halted(fault, now, rx, out);
            return;
        }
        if let Err(fault) = self.step(now, rx, out) {
            self.halt(fault);
        }
    }

    fn step(&mut self, now: Instant, rx: &[u8], out: &mut dyn Write) -> Result<(), Fault> {
        for &byte in rx {
            if self.framer.push(byte)? {
                self.handle_frame(now, out)?;
            }
        }

        self.pressure.poll(now, &mut self.sensors);

        // Keep in front of any other color assignments
        if self.gates.led_fade.ready(now) {
            self.leds.fade_released();
        }

        match self.state {
            ControllerState::Running => {
                self.player.update(self.protocol, &mut self.leds, now)?;
            }
            ControllerState::Loading => {
                let status = self.loader.poll(now, out);
                if status != Status::Pending {
                    self.finish_loading(status, out)?;
                }
            }
            ControllerState::Idle | ControllerState::Halted(_) => {}
        }

        if self.gates.alive_blink.ready(now) {
            self.leds.blink_alive();
        }
        if self.gates.led_show.ready(now) {
            self.leds.show(&mut self.led_driver);
        }

        self.safety.update(now, self.player.channels().all_zero());
        Ok(())
    }

    fn handle_frame(&mut self, now: Instant, out: &mut dyn Write) -> Result<(), Fault> {
        if self.state == ControllerState::Loading {
            let Some(frame) = self.framer.frame() else {
                return Ok(());
            };
            let status = self.loader.feed(frame, self.protocol, out)?;
            if status == Status::Pending {
                if self.framer.mode() != self.loader.mode() {
                    self.framer.set_mode(self.loader.mode());
                }
            } else {
                self.finish_loading(status, out)?;
            }
            return Ok(());
        }

        let Some(text) = self.framer.command() else {
            log::warn!("controller: dropped non-text command");
            return Ok(());
        };
        match Command::parse(text) {
            Ok(cmd) => self.execute(cmd, now, out),
            Err(err) => {
                log::warn!("controller: {} '{}'", err, text);
                Ok(())
            }
        }
    }

    fn execute(&mut self, cmd: Command, now: Instant, out: &mut dyn Write) -> Result<(), Fault> {
        match cmd {
            Command::Identify => {
                let _ = writeln!(out, "{}", IDENTITY);
            }
            Command::On => self.enter(ControllerState::Running, out)?,
            Command::Off => self.enter(ControllerState::Idle, out)?,
            Command::Load => {
                self.player.release(self.protocol, &mut self.leds)?;
                self.enter(ControllerState::Loading, out)?;
                self.loader.begin(self.protocol, now);
            }
            Command::Preset(index) => {
                self.player.release(self.protocol, &mut self.leds)?;
                presets::load_preset(index, self.protocol, self.player.translator())?;
            }
            Command::StepBack => self.jump(Jump::Back, now)?,
            Command::StepForward => self.jump(Jump::Forward, now)?,
            Command::Goto(line_no) => self.jump(Jump::To(line_no), now)?,
            Command::Position => {
                let _ = writeln!(
                    out,
                    "{} of {}",
                    self.protocol.position().unwrap_or(0),
                    self.protocol.len().saturating_sub(1)
                );
            }
            Command::DumpBuffer => {
                let _ = writeln!(
                    out,
                    "#{}\t{}",
                    self.protocol.position().unwrap_or(0),
                    self.protocol.current_line()
                );
            }
            Command::DumpProgram => {
                let _ = writeln!(out, "{}\n{}", self.protocol.name(), self.protocol.len());
            }
            Command::OverrideSafety => self.safety.set_override(true),
            Command::RestoreSafety => self.safety.set_override(false),
            Command::Halt => return Err(Fault::UserHalt),
            Command::Pressure => {
                let _ = writeln!(out, "{}", self.pressure.readings());
            }
            Command::Reset => log::warn!("controller: reset ignored, not halted"),
        }
        Ok(())
    }

    fn jump(&mut self, jump: Jump, now: Instant) -> Result<(), Fault> {
        self.player.jump(self.protocol, &mut self.leds, jump, now)
    }

    fn finish_loading(&mut self, status: Status, out: &mut dyn Write) -> Result<(), Fault> {
        self.framer.set_mode(Mode::Ascii);
        if let Status::Failed(err) = status {
            log::warn!("controller: download failed ({}), installing fallback", err);
            presets::install_fallback(self.protocol, self.player.translator())?;
        } else {
            self.protocol.prime_start();
        }
        self.enter(ControllerState::Idle, out)
    }

    fn enter(&mut self, state: ControllerState, out: &mut dyn Write) -> Result<(), Fault> {
        let (banner, color) = match state {
            ControllerState::Idle => ("State: Idling...", YELLOW),
            ControllerState::Running => ("State: Running protocol program...", GREEN),
            ControllerState::Loading => ("State: Loading in protocol program...", BLUE),
            ControllerState::Halted(fault) => return Err(fault),
        };
        if state == ControllerState::Running {
            // Valves stay as they are until the next line activates, an empty
            // protocol has none to activate
            self.leds.clear_valves(self.player.translator())?;
            if self.protocol.is_empty() {
                self.player.close_all()?;
            }
        }
        log::info!("controller: {:?} -> {:?}", self.state, state);
        let _ = writeln!(out, "{}", banner);
        self.leds.set_alive_color(color);
        self.state = state;
        Ok(())
    }

    fn halt(&mut self, fault: Fault) {
        log::error!("controller: halted, id {}: {}", fault.id(), fault);
        self.state = ControllerState::Halted(fault);
        self.framer.set_mode(Mode::Ascii);
        if self.player.close_all().is_err() {
            log::error!("controller: could not close the valves");
        }
        self.leds.paint_halt(fault.id());
        self.leds.set_brightness(LEDS.halt_brightness_high);
        self.leds.show(&mut self.led_driver);
    }

    /// No safety pulses go out while halted, the safety MCU drops the pump
    fn poll_halted(&mut self, fault: Fault, now: Instant, rx: &[u8], out: &mut dyn Write) {
        for &byte in rx {
            if matches!(self.framer.push(byte), Ok(true)) && self.framer.command() == Some("reset") {
                let _ = writeln!(out, "Resetting...");
                self.reset_requested = true;
            }
        }

        if self.gates.halt_blink.ready(now) {
            self.halt_blink_on = !self.halt_blink_on;
            if self.halt_blink_on {
                let _ = writeln!(out, "EXECUTION HALTED, ID: {}\n{}", fault.id(), fault);
                self.leds.set_brightness(LEDS.halt_brightness_high);
            } else {
                self.leds.set_brightness(LEDS.halt_brightness_low);
            }
            self.leds.show(&mut self.led_driver);
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Set after a `reset` command while halted, the firmware restarts the
    /// chip
    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }

    pub fn protocol(&self) -> &Protocol<N> {
        self.protocol
    }

    pub fn player(&self) -> &Player<E> {
        &self.player
    }

    pub fn safety(&self) -> &SafetyPulse<P> {
        &self.safety
    }

    pub fn led_driver(&self) -> &D {
        &self.led_driver
    }
}
