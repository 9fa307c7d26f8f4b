//! Buffered UART as a polled byte transport
//!
//! The interrupt-driven ring buffers of `BufferedUart` let the driver poll
//! for bytes without losing any while it is busy elsewhere.

use antlink_hal::{ByteTransport, SerialConfig};
use embassy_rp::uart::{self, BufferedUart};
use embedded_io::{Read, ReadReady, Write};

/// Radio serial port
pub struct RpSerial {
    uart: BufferedUart,
}

impl RpSerial {
    pub fn new(uart: BufferedUart) -> Self {
        Self { uart }
    }
}

/// embassy-rp UART settings for the radio link (8N1)
pub fn uart_config(serial: &SerialConfig) -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = serial.baudrate;
    config
}

impl ByteTransport for RpSerial {
    type Error = uart::Error;

    fn bytes_available(&mut self) -> usize {
        match self.uart.read_ready() {
            Ok(true) => 1,
            _ => 0,
        }
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        self.uart.read_exact(&mut byte).map_err(|e| match e {
            embedded_io::ReadExactError::Other(e) => e,
            embedded_io::ReadExactError::UnexpectedEof => uart::Error::Break,
        })?;
        Ok(byte[0])
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write_all(&[byte])
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        Write::write_all(&mut self.uart, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Write::flush(&mut self.uart)
    }
}
