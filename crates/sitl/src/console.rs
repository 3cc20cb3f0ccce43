//! Host console: text sink over `std::io::Write` and line-ending translation
//!
//! The router ends a line on carriage return. Host input ends lines with
//! `\n` (pipes, files) or `\r\n` (some terminals), so `\n` becomes `\r` and
//! any `\r` read from the host is dropped.

use std::fmt;
use std::io::{self, Stdout, Write};

/// Map one host input byte to a router symbol
pub fn console_symbol(byte: u8) -> Option<u8> {
    match byte {
        b'\r' => None,
        b'\n' => Some(b'\r'),
        other => Some(other),
    }
}

/// Console sink writing behavior output to a byte stream
pub struct StdoutConsole<W: Write = Stdout> {
    writer: W,
    last_error: Option<io::Error>,
}

impl StdoutConsole<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for StdoutConsole<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutConsole<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            last_error: None,
        }
    }

    /// Flush buffered output, reporting any write failure since the last call
    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(error) = self.last_error.take() {
            return Err(error);
        }
        self.writer.flush()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> fmt::Write for StdoutConsole<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_all(s.as_bytes()).map_err(|error| {
            self.last_error = Some(error);
            fmt::Error
        })
    }
}
