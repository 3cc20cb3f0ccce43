//! Mock UART implementation for testing

use crate::platform::{
    error::{PlatformError, UartError},
    traits::{UartConfig, UartInterface},
    Result,
};
use heapless::{Deque, Vec};

/// Bytes each direction of a [`MockUart`] can hold
pub const MOCK_UART_CAPACITY: usize = 512;

/// Mock serial port with fixed-size transmit and receive buffers
///
/// # Example
///
/// ```
/// use subsumption_rover::platform::mock::MockUart;
/// use subsumption_rover::platform::traits::UartInterface;
///
/// let mut uart = MockUart::new(Default::default());
/// uart.inject_rx_data(b"DG\r");
/// let mut buf = [0u8; 8];
/// assert_eq!(uart.read(&mut buf).unwrap(), 3);
///
/// uart.write(b"Director Started").unwrap();
/// assert_eq!(uart.tx_buffer(), b"Director Started");
/// ```
#[derive(Debug)]
pub struct MockUart {
    config: UartConfig,
    tx: Vec<u8, MOCK_UART_CAPACITY>,
    rx: Deque<u8, MOCK_UART_CAPACITY>,
}

impl MockUart {
    pub fn new(config: UartConfig) -> Self {
        Self {
            config,
            tx: Vec::new(),
            rx: Deque::new(),
        }
    }

    /// Everything written so far
    pub fn tx_buffer(&self) -> &[u8] {
        &self.tx
    }

    /// Written bytes as text, empty if not UTF-8
    pub fn tx_str(&self) -> &str {
        core::str::from_utf8(&self.tx).unwrap_or("")
    }

    pub fn clear_tx_buffer(&mut self) {
        self.tx.clear();
    }

    /// Queue bytes for `read`; bytes beyond capacity are dropped
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        for &byte in data {
            if self.rx.push_back(byte).is_err() {
                break;
            }
        }
    }

    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }
}

impl UartInterface for MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let room = MOCK_UART_CAPACITY - self.tx.len();
        if room == 0 && !data.is_empty() {
            return Err(PlatformError::Uart(UartError::Overrun));
        }
        let accepted = data.len().min(room);
        self.tx
            .extend_from_slice(&data[..accepted])
            .map_err(|_| PlatformError::Uart(UartError::WriteFailed))?;
        Ok(accepted)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut count = 0;
        for slot in buffer.iter_mut() {
            match self.rx.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    fn available(&self) -> bool {
        !self.rx.is_empty()
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_drains_in_order() {
        let mut uart = MockUart::new(UartConfig::default());
        uart.inject_rx_data(b"NG 10 20\r");
        let mut buffer = [0u8; 4];
        assert_eq!(uart.read(&mut buffer).unwrap(), 4);
        assert_eq!(&buffer, b"NG 1");
        let mut rest = [0u8; 16];
        assert_eq!(uart.read(&mut rest).unwrap(), 5);
        assert_eq!(&rest[..5], b"0 20\r");
        assert!(!uart.available());
    }

    #[test]
    fn test_write_overrun() {
        let mut uart = MockUart::new(UartConfig { baud_rate: 9600 });
        let block = [b'x'; MOCK_UART_CAPACITY];
        assert_eq!(uart.write(&block).unwrap(), MOCK_UART_CAPACITY);
        assert_eq!(
            uart.write(b"y"),
            Err(PlatformError::Uart(UartError::Overrun))
        );
        uart.clear_tx_buffer();
        assert_eq!(uart.write(b"ok").unwrap(), 2);
        assert_eq!(uart.tx_str(), "ok");
        assert_eq!(uart.baud_rate(), 9600);
    }
}
