//! UART interface trait
//!
//! The operator console runs over a byte-oriented serial port.

use crate::parameters::rover::DEFAULT_CONSOLE_BAUD;
use crate::platform::Result;

/// UART configuration
#[derive(Debug, Clone, Copy)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baud_rate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_CONSOLE_BAUD,
        }
    }
}

/// UART interface trait
///
/// Both directions are non-blocking: `read` returns whatever has arrived
/// and `write` accepts as much as fits.
pub trait UartInterface {
    /// Write bytes, returning how many were accepted
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read available bytes into `buffer`, returning the count
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Whether received bytes are waiting
    fn available(&self) -> bool;

    /// Block until queued output has been sent
    fn flush(&mut self) -> Result<()>;
}
