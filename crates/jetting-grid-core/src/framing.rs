//! Splits the control link byte stream into frames
//!
//! ASCII commands end in `\n`, binary line frames end in [`EOL`]. The framer
//! is switched to binary mode only while a protocol download is receiving
//! lines.

use heapless::Vec;

use crate::{
    fault::Fault,
    wire::{DURATION_LEN, EOL},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ascii,
    Binary,
}

pub struct Framer<const N: usize> {
    buf: Vec<u8, N>,
    mode: Mode,
    complete: bool,
    /// Skipping the rest of an over-long ASCII command
    discarding: bool,
}

impl<const N: usize> Framer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            mode: Mode::Ascii,
            complete: false,
            discarding: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch the framing mode, dropping any partial frame
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.complete = false;
        self.discarding = false;
    }

    /// Feed one byte. Returns true when it completed a frame, available
    /// through [`Self::frame`] until the next call.
    ///
    /// A binary frame that does not fit the buffer is a
    /// [`Fault::StreamOverrun`].
    pub fn push(&mut self, byte: u8) -> Result<bool, Fault> {
        if self.complete {
            self.buf.clear();
            self.complete = false;
        }
        match self.mode {
            Mode::Ascii => Ok(self.push_ascii(byte)),
            Mode::Binary => self.push_binary(byte),
        }
    }

    fn push_ascii(&mut self, byte: u8) -> bool {
        if byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                return false;
            }
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
            self.complete = !self.buf.is_empty();
            return self.complete;
        }
        if self.discarding {
            return false;
        }
        if self.buf.push(byte).is_err() {
            log::warn!("framing: command longer than {} bytes dropped", N);
            self.buf.clear();
            self.discarding = true;
        }
        false
    }

    fn push_binary(&mut self, byte: u8) -> Result<bool, Fault> {
        if self.buf.push(byte).is_err() {
            self.buf.clear();
            return Err(Fault::StreamOverrun);
        }
        // A line frame starts with a 2 byte duration that may itself end in
        // 0xFF, so only a bare EOL or one after the duration terminates
        let payload = self.buf.len().saturating_sub(EOL.len());
        if self.buf.ends_with(&EOL) && (payload == 0 || payload >= DURATION_LEN) {
            self.buf.truncate(payload);
            self.complete = true;
        }
        Ok(self.complete)
    }

    /// The completed frame, terminator stripped
    pub fn frame(&self) -> Option<&[u8]> {
        self.complete.then_some(self.buf.as_slice())
    }

    /// The completed frame as ASCII command text
    pub fn command(&self) -> Option<&str> {
        self.frame().and_then(|f| core::str::from_utf8(f).ok())
    }
}

impl<const N: usize> Default for Framer<N> {
    fn default() -> Self {
        Self::new()
    }
}
