//! Output channel manager
//!
//! Accumulates the valves of one line as bitmasks per port expander port and
//! pushes them to the hardware in one go.

use core::fmt;

use crate::{config::N_PORTS, fault::Fault, ports::PortExpander};

/// Port and bit of the port expander channel driving one valve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputAddress {
    pub port: u8,
    pub bit: u8,
}

pub struct OutputChannels<E: PortExpander> {
    expander: E,
    masks: [u16; N_PORTS],
}

impl<E: PortExpander> OutputChannels<E> {
    pub fn new(expander: E) -> Self {
        Self {
            expander,
            masks: [0; N_PORTS],
        }
    }

    /// Configure all ports as outputs and drive every channel low
    pub fn init(&mut self) -> Result<(), Fault> {
        self.expander.configure_outputs().map_err(bus_fault)?;
        self.clear();
        self.commit()
    }

    /// Zero all masks without touching the hardware
    pub fn clear(&mut self) {
        self.masks = [0; N_PORTS];
    }

    pub fn add(&mut self, addr: OutputAddress) -> Result<(), Fault> {
        let Some(mask) = self.masks.get_mut(usize::from(addr.port)) else {
            return Err(Fault::PortOutOfRange(addr.port));
        };
        if addr.bit > 15 {
            return Err(Fault::BitOutOfRange(addr.bit));
        }
        // Bits 14 and 15 are spare channels, but addressable all the same
        *mask |= 1 << addr.bit;
        Ok(())
    }

    /// Write every mask to its port, verbatim
    #[allow(clippy::cast_possible_truncation)]
    pub fn commit(&mut self) -> Result<(), Fault> {
        for (port, &mask) in self.masks.iter().enumerate() {
            self.expander
                .write_port(port as u8, mask)
                .map_err(bus_fault)?;
        }
        Ok(())
    }

    pub fn all_zero(&self) -> bool {
        self.masks.iter().all(|&m| m == 0)
    }

    pub fn masks(&self) -> &[u16; N_PORTS] {
        &self.masks
    }

    pub fn expander(&self) -> &E {
        &self.expander
    }
}

fn bus_fault<T: fmt::Debug>(err: T) -> Fault {
    log::error!("channels: port expander write failed: {:?}", err);
    Fault::OutputBus
}
