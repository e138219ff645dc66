use core::fmt;

use embedded_io::{Read, ReadReady, Write};

/// Control link to the host PC
///
/// Replies go out through [`fmt::Write`], so the controller can `writeln!`
/// straight onto the wire.
pub(crate) struct SerialLink<U> {
    uart: U,
}

impl<U> SerialLink<U>
where
    U: Read + ReadReady + Write,
{
    pub(crate) fn new(uart: U) -> Self {
        Self { uart }
    }

    /// Drain whatever has arrived into `buf` without blocking
    pub(crate) fn receive<'b>(&mut self, buf: &'b mut [u8]) -> &'b [u8] {
        let mut n = 0;
        while n < buf.len() {
            match self.uart.read_ready() {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    log::warn!("serial: {:?}", err);
                    break;
                }
            }
            match self.uart.read(&mut buf[n..]) {
                Ok(0) => break,
                Ok(read) => n += read,
                Err(err) => {
                    log::warn!("serial: rx failed: {:?}", err);
                    break;
                }
            }
        }
        &buf[..n]
    }
}

impl<U: Write> fmt::Write for SerialLink<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.uart.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
