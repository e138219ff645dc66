#![cfg_attr(not(test), no_std)]

//! Jetting grid core - protocol storage and playback
//!
//! Architecture layers:
//! - `grid`, `translate` - Protocol coordinate system and wiring look-ups
//! - `line`, `protocol` - Line packing and the protocol store with its cursor
//! - `channels` - Port expander bitmask accumulation
//! - `ports` - Hardware abstraction (`[PortExpander]`, `[LedDriver]`, ...)
//! - `wire`, `framing`, `command`, `loader` - Serial control link
//! - `leds`, `playback`, `safety`, `pressure` - Everything driven per loop tick
//! - `controller` - Idle / run / load / halted state machine
//!
//! Nothing in here touches hardware directly, the firmware crate supplies
//! implementations of the `ports` traits.

pub mod channels;
pub mod command;
pub mod config;
pub mod controller;
pub mod fault;
pub mod framing;
pub mod grid;
pub mod interval;
pub mod leds;
pub mod line;
pub mod loader;
pub mod playback;
pub mod ports;
pub mod presets;
pub mod pressure;
pub mod protocol;
pub mod safety;
pub mod tables;
pub mod translate;
pub mod wire;

pub use channels::{OutputAddress, OutputChannels};
pub use command::{Command, CommandError};
pub use controller::{Controller, ControllerState, Peripherals};
pub use fault::Fault;
pub use grid::GridPoint;
pub use interval::Every;
pub use leds::LedMatrix;
pub use line::{Line, PackedLine};
pub use loader::{LoadError, Loader};
pub use playback::Player;
pub use ports::{LedDriver, PortExpander, PressureSensors};
pub use protocol::Protocol;
pub use safety::SafetyPulse;
pub use translate::{Translator, Valve};
