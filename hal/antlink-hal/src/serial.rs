//! Serial byte stream abstraction
//!
//! The link driver polls its transport one byte at a time and never blocks
//! waiting for input, so the trait exposes availability separately from the
//! read itself.

/// Polled duplex byte stream
pub trait ByteTransport {
    /// Error type for transport operations
    type Error;

    /// Number of bytes that can be read without blocking
    fn bytes_available(&mut self) -> usize;

    /// Read one byte
    ///
    /// Only called after [`bytes_available`](Self::bytes_available) reported
    /// at least one byte.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Write one byte
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write a complete buffer
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Flush any buffered output
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Serial port configuration for the radio's asynchronous interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second (set by the radio's strapping pins)
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baudrate: 9600 }
    }
}
