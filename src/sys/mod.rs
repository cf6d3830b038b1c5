use crate::Error;
use crate::atten::Buttons;

/// Display geometry, in character cells.
pub const DISPLAY_COLUMNS: usize = 16;
pub const DISPLAY_ROWS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Log-detector output.
    Power,
    /// Ambient temperature sensor.
    Temperature,
}

/// Everything the measurement loop needs from the board: the 10-bit ADC, the
/// attenuation byte in NVM, the pushbuttons, the character display, and the
/// restart line.
pub trait Bench {
    /// Read one 10-bit conversion, in [0, 1023].
    fn read_channel(&mut self, channel: Channel) -> Result<u16, Error>;

    fn read_nvm(&mut self) -> Result<u8, Error>;
    fn write_nvm(&mut self, value: u8) -> Result<(), Error>;

    fn read_buttons(&mut self) -> Result<Buttons, Error>;

    fn set_cursor(&mut self, column: usize, row: usize) -> Result<(), Error>;
    fn print(&mut self, text: &str) -> Result<(), Error>;
    fn commit_frame(&mut self) -> Result<(), Error>;

    /// Restart the whole device. On real hardware this does not return
    /// except on failure.
    fn restart(&mut self) -> Result<(), Error>;
}

#[cfg(feature = "hardware")]
#[path = "linux.rs"]
pub mod imp;

pub mod sim;
