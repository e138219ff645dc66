//! ASCII commands of the control link

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `id?`
    Identify,
    /// `on`: play the protocol
    On,
    /// `off`: pause the protocol
    Off,
    /// `load`: receive a new protocol over the link
    Load,
    /// `presetN` or `preset N`
    Preset(u8),
    /// `,`
    StepBack,
    /// `.`
    StepForward,
    /// `goto N`
    Goto(usize),
    /// `pos?`
    Position,
    /// `b?`: current line buffer
    DumpBuffer,
    /// `p?`: protocol name and line count
    DumpProgram,
    /// `override_safety`: force the pump on regardless of open valves
    OverrideSafety,
    /// `restore_safety`
    RestoreSafety,
    Halt,
    /// `?`: pressure readings
    Pressure,
    /// `reset`, only honored while halted
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    Unknown,
    InvalidValue,
}

impl Command {
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        let cmd = match input {
            "id?" => Self::Identify,
            "on" => Self::On,
            "off" => Self::Off,
            "load" => Self::Load,
            "," => Self::StepBack,
            "." => Self::StepForward,
            "pos?" => Self::Position,
            "b?" => Self::DumpBuffer,
            "p?" => Self::DumpProgram,
            "override_safety" => Self::OverrideSafety,
            "restore_safety" => Self::RestoreSafety,
            "halt" => Self::Halt,
            "?" => Self::Pressure,
            "reset" => Self::Reset,
            _ => {
                if let Some(arg) = input.strip_prefix("preset") {
                    Self::Preset(parse_arg(arg)?)
                } else if let Some(arg) = input.strip_prefix("goto") {
                    Self::Goto(parse_arg(arg)?)
                } else {
                    return Err(CommandError::Unknown);
                }
            }
        };
        Ok(cmd)
    }
}

fn parse_arg<T: core::str::FromStr>(arg: &str) -> Result<T, CommandError> {
    arg.trim().parse().map_err(|_| CommandError::InvalidValue)
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown command"),
            Self::InvalidValue => write!(f, "Invalid value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_commands() {
        assert_eq!(Command::parse("id?"), Ok(Command::Identify));
        assert_eq!(Command::parse(" on "), Ok(Command::On));
        assert_eq!(Command::parse(","), Ok(Command::StepBack));
        assert_eq!(Command::parse("."), Ok(Command::StepForward));
        assert_eq!(Command::parse("?"), Ok(Command::Pressure));
        assert_eq!(Command::parse("override_safety"), Ok(Command::OverrideSafety));
    }

    #[test]
    fn arguments_with_or_without_space() {
        assert_eq!(Command::parse("preset3"), Ok(Command::Preset(3)));
        assert_eq!(Command::parse("preset 4"), Ok(Command::Preset(4)));
        assert_eq!(Command::parse("goto 120"), Ok(Command::Goto(120)));
        assert_eq!(Command::parse("goto7"), Ok(Command::Goto(7)));
    }

    #[test]
    fn bad_input() {
        assert_eq!(Command::parse("goto"), Err(CommandError::InvalidValue));
        assert_eq!(Command::parse("goto -1"), Err(CommandError::InvalidValue));
        assert_eq!(Command::parse("preset x"), Err(CommandError::InvalidValue));
        assert_eq!(Command::parse("jump"), Err(CommandError::Unknown));
        assert_eq!(Command::parse("ON"), Err(CommandError::Unknown));
    }
}
