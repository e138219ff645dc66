//! Unrecoverable faults
//!
//! A fault means a corrupted protocol, a coding defect or a wiring table
//! mismatch. None of these are safe to continue from with pressurized valves
//! attached, so every fault ends in the controller's `Halted` state.
//! The numeric id is shown on the LED matrix underneath the 'HALT' text.

use core::fmt;

use crate::grid::GridPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Halt requested over the control link
    UserHalt,
    /// Grid point out of bounds in the valve look-up
    PointToValve(GridPoint),
    /// Grid point out of bounds in the LED look-up
    PointToLed(GridPoint),
    /// Valve number out of bounds in the reverse look-up
    ValveToPoint(u8),
    /// Valve number missing from the grid table
    ValveUnaccounted(u8),
    /// Grid point out of bounds while packing a line
    PackOutOfBounds(GridPoint),
    /// Valve number out of bounds in the output address look-up
    ValveToAddress(u8),
    /// Output port beyond the configured port count
    PortOutOfRange(u8),
    /// Output bit beyond the 16 channels of a port
    BitOutOfRange(u8),
    /// Incoming binary frame did not fit the stream buffer
    StreamOverrun,
    /// Packed line carries bits outside of the axis
    CorruptPackedLine(u8),
    /// Port expander did not accept a write
    OutputBus,
}

impl Fault {
    /// Numeric halt id
    pub fn id(&self) -> u8 {
        match self {
            Self::UserHalt => 0,
            Self::PointToValve(_) => 1,
            Self::PointToLed(_) => 2,
            Self::ValveToPoint(_) => 3,
            Self::ValveUnaccounted(_) => 4,
            Self::PackOutOfBounds(_) => 5,
            Self::ValveToAddress(_) => 6,
            Self::PortOutOfRange(_) => 7,
            Self::StreamOverrun => 8,
            Self::CorruptPackedLine(_) => 9,
            Self::OutputBus => 10,
            Self::BitOutOfRange(_) => 11,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserHalt => write!(f, "Halted by user command."),
            Self::PointToValve(p) => {
                write!(f, "CRITICAL: Out-of-bounds index {} in point to valve", p)
            }
            Self::PointToLed(p) => write!(f, "CRITICAL: Out-of-bounds index {} in point to LED", p),
            Self::ValveToPoint(v) => {
                write!(f, "CRITICAL: Out-of-bounds valve number {} in valve to point", v)
            }
            Self::ValveUnaccounted(v) => {
                write!(f, "CRITICAL: Valve number {} is not accounted for", v)
            }
            Self::PackOutOfBounds(p) => write!(f, "CRITICAL: Out-of-bounds index {} in pack", p),
            Self::ValveToAddress(v) => {
                write!(f, "CRITICAL: Out-of-bounds valve number {} in valve to address", v)
            }
            Self::PortOutOfRange(port) => {
                write!(f, "CRITICAL: Out-of-bounds port number {} in output channels", port)
            }
            Self::BitOutOfRange(bit) => {
                write!(f, "CRITICAL: Out-of-bounds bit number {} in output channels", bit)
            }
            Self::StreamOverrun => write!(f, "Stream command buffer overrun while loading"),
            Self::CorruptPackedLine(row) => {
                write!(f, "CRITICAL: Packed line row {} has bits outside the axis", row)
            }
            Self::OutputBus => write!(f, "CRITICAL: Port expander write failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        let p = GridPoint::new(8, 8);
        let faults = [
            Fault::UserHalt,
            Fault::PointToValve(p),
            Fault::PointToLed(p),
            Fault::ValveToPoint(0),
            Fault::ValveUnaccounted(1),
            Fault::PackOutOfBounds(p),
            Fault::ValveToAddress(0),
            Fault::PortOutOfRange(8),
            Fault::StreamOverrun,
            Fault::CorruptPackedLine(0),
            Fault::OutputBus,
            Fault::BitOutOfRange(16),
        ];
        for (i, a) in faults.iter().enumerate() {
            for b in &faults[i + 1..] {
                assert_ne!(a.id(), b.id());
            }
        }
    }

    #[test]
    fn message_names_the_point() {
        let msg = Fault::PackOutOfBounds(GridPoint::new(8, 8)).to_string();
        assert_eq!(msg, "CRITICAL: Out-of-bounds index (8, 8) in pack");
    }
}
