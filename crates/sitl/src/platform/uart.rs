//! Simulated UART peripheral for SITL.
//!
//! In-memory buffers stand in for the serial line: the host injects
//! keystrokes into RX and drains console output from TX.

use std::collections::VecDeque;

use subsumption_rover::platform::error::UartError;
use subsumption_rover::platform::traits::UartConfig;
use subsumption_rover::platform::{PlatformError, Result, UartInterface};

/// Simulated UART with in-memory buffers.
#[derive(Debug)]
pub struct SitlUart {
    config: UartConfig,
    tx_buffer: VecDeque<u8>,
    rx_buffer: VecDeque<u8>,
    capacity: usize,
}

impl SitlUart {
    /// Default buffer capacity in bytes.
    pub const DEFAULT_CAPACITY: usize = 4096;

    pub fn new(config: UartConfig) -> Self {
        Self::with_capacity(config, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(config: UartConfig, capacity: usize) -> Self {
        Self {
            config,
            tx_buffer: VecDeque::with_capacity(capacity),
            rx_buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Queue received bytes; bytes past capacity are lost.
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        let room = self.capacity.saturating_sub(self.rx_buffer.len());
        self.rx_buffer.extend(data.iter().take(room));
    }

    /// Take everything transmitted so far.
    pub fn drain_tx(&mut self) -> Vec<u8> {
        self.tx_buffer.drain(..).collect()
    }

    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }
}

impl UartInterface for SitlUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let room = self.capacity.saturating_sub(self.tx_buffer.len());
        if room == 0 && !data.is_empty() {
            return Err(PlatformError::Uart(UartError::Overrun));
        }
        let accepted = data.len().min(room);
        self.tx_buffer.extend(&data[..accepted]);
        Ok(accepted)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let count = buffer.len().min(self.rx_buffer.len());
        for (slot, byte) in buffer.iter_mut().zip(self.rx_buffer.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }

    fn available(&self) -> bool {
        !self.rx_buffer.is_empty()
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
