//! Protocol download over the control link
//!
//! Stage 0 receives the protocol name as ASCII, stage 1 the promised number of
//! lines as ASCII, and stage 2 the lines themselves as binary frames until an
//! empty end-of-protocol frame. The whole download has to finish within
//! [`TIMING.load_timeout`](crate::config::TIMING).

use core::fmt::{self, Write};

use embassy_time::Instant;

use crate::{
    config::TIMING,
    fault::Fault,
    framing::Mode,
    protocol::Protocol,
    wire::{Frame, WireError, decode_line_frame},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// Promised line count does not fit the protocol store
    TooManyLines { requested: usize, capacity: usize },
    /// Promised line count is not a number
    InvalidLineCount,
    /// Number of received lines differs from the promise. The received
    /// protocol is kept.
    LineCountMismatch { promised: usize, received: usize },
    Timeout,
    Wire(WireError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyLines { requested, capacity } => write!(
                f,
                "Protocol program exceeds maximum number of lines. \
                 Requested was {}, but maximum is {}.",
                requested, capacity
            ),
            Self::InvalidLineCount => write!(f, "Protocol program line count is not a number."),
            Self::LineCountMismatch { promised, received } => write!(
                f,
                "Protocol program received incorrect number of lines. \
                 Promised was {}, but received {}.",
                promised, received
            ),
            Self::Timeout => write!(f, "Loading in protocol program timed out."),
            Self::Wire(err) => write!(f, "Protocol program line rejected: {}.", err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Name,
    LineCount,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    /// The received protocol is in place
    Loaded,
    /// The protocol must be replaced by the fallback
    Failed(LoadError),
}

pub struct Loader {
    stage: Stage,
    promised: usize,
    started: Instant,
}

impl Loader {
    pub const fn new() -> Self {
        Self {
            stage: Stage::Name,
            promised: 0,
            started: Instant::from_ticks(0),
        }
    }

    /// Start a download, clearing the protocol store
    pub fn begin<const N: usize>(&mut self, protocol: &mut Protocol<N>, now: Instant) {
        self.stage = Stage::Name;
        self.promised = 0;
        self.started = now;
        protocol.clear();
    }

    /// Framing expected for the next incoming frame
    pub fn mode(&self) -> Mode {
        match self.stage {
            Stage::Name | Stage::LineCount => Mode::Ascii,
            Stage::Lines => Mode::Binary,
        }
    }

    /// Handle one complete frame. Responses for the PC go to `out`.
    pub fn feed<const N: usize>(
        &mut self,
        frame: &[u8],
        protocol: &mut Protocol<N>,
        out: &mut dyn Write,
    ) -> Result<Status, Fault> {
        match self.stage {
            Stage::Name => {
                let name = core::str::from_utf8(frame).unwrap_or("unnamed");
                protocol.set_name(name.trim());
                let _ = writeln!(out, "{}", protocol.name());
                self.stage = Stage::LineCount;
                Ok(Status::Pending)
            }
            Stage::LineCount => {
                let promised = core::str::from_utf8(frame)
                    .ok()
                    .and_then(|s| s.trim().parse::<usize>().ok());
                match promised {
                    Some(promised) if promised <= protocol.capacity() => {
                        self.promised = promised;
                        self.stage = Stage::Lines;
                        let _ = writeln!(out, "Loading stage 1: Success");
                        Ok(Status::Pending)
                    }
                    Some(requested) => Ok(fail(
                        LoadError::TooManyLines {
                            requested,
                            capacity: protocol.capacity(),
                        },
                        out,
                    )),
                    None => Ok(fail(LoadError::InvalidLineCount, out)),
                }
            }
            Stage::Lines => match decode_line_frame(frame) {
                Ok(Frame::Line(line)) => {
                    if !protocol.add_line(&line)? {
                        log::warn!("loader: protocol full, line dropped");
                    }
                    Ok(Status::Pending)
                }
                Ok(Frame::EndOfProtocol) => {
                    if protocol.len() == self.promised {
                        let _ = writeln!(out, "Loading stage 2: Success");
                    } else {
                        let err = LoadError::LineCountMismatch {
                            promised: self.promised,
                            received: protocol.len(),
                        };
                        log::warn!("loader: {}", err);
                        let _ = writeln!(out, "ERROR: {}", err);
                    }
                    log::info!(
                        "loader: loaded '{}' with {} lines",
                        protocol.name(),
                        protocol.len()
                    );
                    Ok(Status::Loaded)
                }
                Err(err) => Ok(fail(LoadError::Wire(err), out)),
            },
        }
    }

    /// Check the download deadline
    pub fn poll(&self, now: Instant, out: &mut dyn Write) -> Status {
        if now.saturating_duration_since(self.started) > TIMING.load_timeout {
            fail(LoadError::Timeout, out)
        } else {
            Status::Pending
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn fail(err: LoadError, out: &mut dyn Write) -> Status {
    log::warn!("loader: {}", err);
    let _ = writeln!(out, "ERROR: {}", err);
    Status::Failed(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_time::Duration;

    fn start() -> (Loader, Protocol<8>, String) {
        let mut loader = Loader::new();
        let mut protocol = Protocol::new();
        loader.begin(&mut protocol, Instant::from_millis(0));
        (loader, protocol, String::new())
    }

    #[test]
    fn stages_switch_framing() {
        let (mut loader, mut protocol, mut out) = start();
        assert_eq!(loader.mode(), Mode::Ascii);
        loader.feed(b"my protocol", &mut protocol, &mut out).unwrap();
        assert_eq!(loader.mode(), Mode::Ascii);
        loader.feed(b"2", &mut protocol, &mut out).unwrap();
        assert_eq!(loader.mode(), Mode::Binary);
        assert_eq!(out, "my protocol\nLoading stage 1: Success\n");
    }

    #[test]
    fn promised_count_over_capacity() {
        let (mut loader, mut protocol, mut out) = start();
        loader.feed(b"big", &mut protocol, &mut out).unwrap();
        let status = loader.feed(b"9", &mut protocol, &mut out).unwrap();
        assert_eq!(
            status,
            Status::Failed(LoadError::TooManyLines {
                requested: 9,
                capacity: 8
            })
        );
        assert!(out.ends_with("Requested was 9, but maximum is 8.\n"));
    }

    #[test]
    fn garbage_count() {
        let (mut loader, mut protocol, mut out) = start();
        loader.feed(b"x", &mut protocol, &mut out).unwrap();
        let status = loader.feed(b"many", &mut protocol, &mut out).unwrap();
        assert_eq!(status, Status::Failed(LoadError::InvalidLineCount));
    }

    #[test]
    fn count_mismatch_keeps_protocol() {
        let (mut loader, mut protocol, mut out) = start();
        loader.feed(b"short", &mut protocol, &mut out).unwrap();
        loader.feed(b"3", &mut protocol, &mut out).unwrap();
        loader.feed(&[0x00, 0x64, 0x78], &mut protocol, &mut out).unwrap();
        let status = loader.feed(&[], &mut protocol, &mut out).unwrap();
        assert_eq!(status, Status::Loaded);
        assert_eq!(protocol.len(), 1);
        assert!(out.ends_with("Promised was 3, but received 1.\n"));
    }

    #[test]
    fn bad_line_fails() {
        let (mut loader, mut protocol, mut out) = start();
        loader.feed(b"bad", &mut protocol, &mut out).unwrap();
        loader.feed(b"1", &mut protocol, &mut out).unwrap();
        let status = loader.feed(&[0x00], &mut protocol, &mut out).unwrap();
        assert_eq!(status, Status::Failed(LoadError::Wire(WireError::Truncated)));
    }

    #[test]
    fn times_out() {
        let (loader, _, mut out) = start();
        let deadline = Instant::from_millis(0) + TIMING.load_timeout;
        assert_eq!(loader.poll(deadline, &mut out), Status::Pending);
        assert_eq!(
            loader.poll(deadline + Duration::from_millis(1), &mut out),
            Status::Failed(LoadError::Timeout)
        );
        assert_eq!(out, "ERROR: Loading in protocol program timed out.\n");
    }
}
