//! Protocol store and playback cursor
//!
//! Lifecycle: [`Protocol::clear`] → [`Protocol::add_line`] up to capacity →
//! [`Protocol::prime_start`] → repeated [`Protocol::advance_and_decode`],
//! wrapping back to line 0 after the last line.

use heapless::String;

use crate::{
    config::{PROTOCOL_MAX_LINES, PROTOCOL_NAME_LEN},
    fault::Fault,
    line::{Line, PackedLine},
};

pub struct Protocol<const N: usize = PROTOCOL_MAX_LINES> {
    lines: [PackedLine; N],
    count: usize,
    name: String<PROTOCOL_NAME_LEN>,
    /// `None` while primed, the next advance lands on line 0
    cursor: Option<usize>,
    current: Line,
    last_activated: Line,
}

impl<const N: usize> Protocol<N> {
    pub const fn new() -> Self {
        Self {
            lines: [PackedLine::EMPTY; N],
            count: 0,
            name: String::new(),
            cursor: None,
            current: Line::new(0),
            last_activated: Line::new(0),
        }
    }

    pub fn clear(&mut self) {
        self.count = 0;
        self.cursor = None;
        self.current.clear();
        self.current.duration = 0;
        self.last_activated.clear();
        self.last_activated.duration = 0;
        self.set_name("cleared");
    }

    /// Set the name, cut short at the name capacity
    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        for c in name.chars() {
            if self.name.push(c).is_err() {
                break;
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Pack and append a line.
    ///
    /// Returns `Ok(false)` when the protocol is full, leaving it untouched.
    pub fn add_line(&mut self, line: &Line) -> Result<bool, Fault> {
        let Some(slot) = self.lines.get_mut(self.count) else {
            return Ok(false);
        };
        slot.clear();
        line.pack_into(slot)?;
        self.count += 1;
        Ok(true)
    }

    /// Have the next advance land on line 0 without any delay
    pub fn prime_start(&mut self) {
        self.cursor = None;
        self.current.clear();
        self.current.duration = 0;
    }

    /// Record the current line as last activated, move the cursor forward by
    /// one line (wrapping) and decode that line.
    pub fn advance_and_decode(&mut self) -> Result<(), Fault> {
        if self.count == 0 {
            return Ok(());
        }
        self.last_activated.clone_from(&self.current);
        let next = match self.cursor {
            Some(pos) if pos + 1 < self.count => pos + 1,
            _ => 0,
        };
        self.decode(next)
    }

    /// Jump to a line, clamped to the last line. Leaves the last activated
    /// record alone.
    pub fn goto_line(&mut self, line_no: usize) -> Result<(), Fault> {
        if self.count == 0 {
            return Ok(());
        }
        self.decode(line_no.min(self.count - 1))
    }

    pub fn step_forward(&mut self) -> Result<(), Fault> {
        let next = match self.cursor {
            Some(pos) if pos + 1 < self.count => pos + 1,
            _ => 0,
        };
        self.goto_line(next)
    }

    pub fn step_back(&mut self) -> Result<(), Fault> {
        let prev = match self.cursor {
            Some(pos) if pos > 0 => pos - 1,
            _ => self.count.saturating_sub(1),
        };
        self.goto_line(prev)
    }

    fn decode(&mut self, pos: usize) -> Result<(), Fault> {
        self.cursor = Some(pos);
        self.lines[pos].unpack_into(&mut self.current)
    }

    /// Line index of the decoded line, `None` while primed
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_line(&self) -> &Line {
        &self.current
    }

    pub fn last_activated_line(&self) -> &Line {
        &self.last_activated
    }
}

impl<const N: usize> Default for Protocol<N> {
    fn default() -> Self {
        Self::new()
    }
}
