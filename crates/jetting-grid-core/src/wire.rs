//! Binary line frames of the protocol download
//!
//! ```text
//! [duration_hi] [duration_lo] [point] [point] ... EOL
//! ```
//!
//! Each point byte carries `x - X_MIN` in the upper nibble and `y - Y_MIN` in
//! the lower nibble. A frame with an empty payload marks the end of the
//! protocol.

use core::fmt;

use crate::{config::MAX_POINTS_PER_LINE, grid::GridPoint, line::Line};

/// End-of-line sentinel terminating every binary frame
pub const EOL: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Big-endian line duration in front of the point bytes
pub const DURATION_LEN: usize = 2;

/// Largest binary frame, EOL included
pub const MAX_FRAME_LEN: usize = DURATION_LEN + MAX_POINTS_PER_LINE + EOL.len();

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Line(Line),
    EndOfProtocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// Payload shorter than the duration field
    Truncated,
    TooManyPoints,
    /// Point byte outside of the grid
    OutOfRange(u8),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "line frame is missing its duration"),
            Self::TooManyPoints => {
                write!(f, "line frame exceeds {} points", MAX_POINTS_PER_LINE)
            }
            Self::OutOfRange(byte) => write!(f, "point byte 0x{:02X} is off the grid", byte),
        }
    }
}

/// Decode one frame payload, EOL already stripped
pub fn decode_line_frame(payload: &[u8]) -> Result<Frame, WireError> {
    let (duration, points) = match payload {
        [] => return Ok(Frame::EndOfProtocol),
        [hi, lo, points @ ..] => (u16::from_be_bytes([*hi, *lo]), points),
        [_] => return Err(WireError::Truncated),
    };
    if points.len() > MAX_POINTS_PER_LINE {
        return Err(WireError::TooManyPoints);
    }

    let mut line = Line::new(duration);
    for &byte in points {
        let p = GridPoint::from_byte(byte);
        if !p.in_bounds() {
            return Err(WireError::OutOfRange(byte));
        }
        line.push(p);
    }
    Ok(Frame::Line(line))
}

/// Encode a line into `buf`, EOL included. Returns the frame length, `None`
/// when `buf` is too small.
pub fn encode_line_frame(line: &Line, buf: &mut [u8]) -> Option<usize> {
    let len = 2 + line.len() + EOL.len();
    let frame = buf.get_mut(..len)?;
    frame[..2].copy_from_slice(&line.duration.to_be_bytes());
    for (slot, p) in frame[2..].iter_mut().zip(line.points()) {
        *slot = p.to_byte();
    }
    frame[len - EOL.len()..].copy_from_slice(&EOL);
    Some(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_ends_protocol() {
        assert_eq!(decode_line_frame(&[]), Ok(Frame::EndOfProtocol));
    }

    #[test]
    fn decodes_duration_and_points() {
        let Ok(Frame::Line(line)) = decode_line_frame(&[0x01, 0xF4, 0x78, 0x00]) else {
            panic!("expected a line");
        };
        assert_eq!(line.duration, 500);
        let points: Vec<_> = line.points().collect();
        assert_eq!(points, vec![GridPoint::new(0, 1), GridPoint::new(-7, -7)]);
    }

    #[test]
    fn duration_only_is_an_empty_line() {
        let Ok(Frame::Line(line)) = decode_line_frame(&[0x00, 0x0A]) else {
            panic!("expected a line");
        };
        assert_eq!(line.duration, 10);
        assert!(line.is_empty());
    }

    #[test]
    fn rejects_malformed_frames() {
        assert_eq!(decode_line_frame(&[0x01]), Err(WireError::Truncated));
        assert_eq!(
            decode_line_frame(&[0x00, 0x10, 0x78, 0xF0]),
            Err(WireError::OutOfRange(0xF0))
        );
        let long = [0x00; 2 + MAX_POINTS_PER_LINE + 1];
        assert_eq!(decode_line_frame(&long), Err(WireError::TooManyPoints));
    }

    #[test]
    fn encode_appends_eol() {
        let line = Line::from_points(500, &[GridPoint::new(0, 1)]).unwrap();
        let mut buf = [0u8; 16];
        let len = encode_line_frame(&line, &mut buf).unwrap();
        assert_eq!(&buf[..len], &[0x01, 0xF4, 0x78, 0xFF, 0xFF, 0xFF]);
        assert_eq!(encode_line_frame(&line, &mut buf[..4]), None);
    }
}
