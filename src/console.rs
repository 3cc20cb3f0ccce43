//! Operator console over a UART
//!
//! [`UartConsole`] is the text sink handed to every behavior and the byte
//! source for the command router. Incoming bytes are read in small chunks
//! and fed to the controller one symbol at a time.

use core::fmt;

use crate::core::Controller;
use crate::platform::{PlatformError, UartInterface};

/// Bytes read from the UART per pass of [`UartConsole::pump`]
const READ_CHUNK: usize = 16;

/// Console sink and command source backed by a UART
pub struct UartConsole<U: UartInterface> {
    uart: U,
    /// Expand `\n` to `\r\n` for serial terminals
    crlf: bool,
    last_error: Option<PlatformError>,
}

impl<U: UartInterface> UartConsole<U> {
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            crlf: false,
            last_error: None,
        }
    }

    /// Translate line feeds into carriage return + line feed
    pub fn with_crlf(mut self) -> Self {
        self.crlf = true;
        self
    }

    /// Feed every waiting byte to `controller`
    ///
    /// Returns the number of complete lines dispatched.
    pub fn pump<const N: usize>(&mut self, controller: &mut Controller<'_, N>) -> usize {
        let mut lines = 0;
        let mut chunk = [0u8; READ_CHUNK];
        while self.uart.available() {
            let count = match self.uart.read(&mut chunk) {
                Ok(0) => break,
                Ok(count) => count,
                Err(e) => {
                    crate::log_warn!("console read failed: {:?}", e);
                    self.last_error = Some(e);
                    break;
                }
            };
            for &symbol in &chunk[..count] {
                if controller.feed(symbol, self) {
                    lines += 1;
                }
            }
        }
        lines
    }

    /// Most recent UART failure, cleared on read
    pub fn take_error(&mut self) -> Option<PlatformError> {
        self.last_error.take()
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    pub fn into_inner(self) -> U {
        self.uart
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> fmt::Result {
        while !bytes.is_empty() {
            match self.uart.write(bytes) {
                Ok(0) => return Err(fmt::Error),
                Ok(written) => bytes = &bytes[written..],
                Err(e) => {
                    self.last_error = Some(e);
                    return Err(fmt::Error);
                }
            }
        }
        Ok(())
    }
}

impl<U: UartInterface> fmt::Write for UartConsole<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if !self.crlf {
            return self.write_all(s.as_bytes());
        }
        for (i, line) in s.split('\n').enumerate() {
            if i > 0 {
                self.write_all(b"\r\n")?;
            }
            self.write_all(line.as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockUart;
    use crate::platform::traits::UartConfig;
    use core::fmt::Write;

    #[test]
    fn test_write_plain_and_crlf() {
        let mut console = UartConsole::new(MockUart::new(UartConfig::default()));
        write!(console, "a\nb").unwrap();
        assert_eq!(console.uart().tx_str(), "a\nb");

        let mut console = UartConsole::new(MockUart::new(UartConfig::default())).with_crlf();
        writeln!(console, "Director Started").unwrap();
        assert_eq!(console.uart().tx_str(), "Director Started\r\n");
    }

    #[test]
    fn test_pump_dispatches_lines_to_controller() {
        let mut controller: Controller<'_, 2> = Controller::new(20, 0);
        let mut console = UartConsole::new(MockUart::new(UartConfig::default()));
        console.uart_mut().inject_rx_data(b"DI 50\rDG\rDS");

        assert_eq!(console.pump(&mut controller), 2);
        assert_eq!(controller.scheduler().interval_ms(), 50);
        assert!(!controller.scheduler().is_inhibited());
        assert!(console.uart().tx_str().contains("Director Started"));
        assert_eq!(controller.router().pending(), "DS");
        assert_eq!(console.take_error(), None);
    }
}
