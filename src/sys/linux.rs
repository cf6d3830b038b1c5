//! Hardware bench for the Raspberry Pi front end: MCP3008 ADC on SPI0,
//! pushbuttons on GPIO, the attenuation byte in a state file, and a
//! cursor-addressed panel on the controlling terminal.

use std::ffi::CString;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use rppal::gpio::{Gpio, InputPin};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

use crate::Error;
use crate::Result;
use crate::atten::Buttons;
use super::{Bench, Channel, DISPLAY_COLUMNS, DISPLAY_ROWS};

impl From<rppal::spi::Error> for Error {
    fn from(error: rppal::spi::Error) -> Self {
        Error::Other(error.into())
    }
}

impl From<rppal::gpio::Error> for Error {
    fn from(error: rppal::gpio::Error) -> Self {
        Error::Other(error.into())
    }
}

// BCM pin numbers, upper/middle/lower on the panel.
const BUTTON_PINS: [u8; 3] = [17, 27, 22];
const BUTTON_MASKS: [Buttons; 3] = [Buttons::UPPER, Buttons::MIDDLE, Buttons::LOWER];

const NVM_PATH: &str = "/var/lib/wattmeter/atten";

pub struct HardwareBench {
    spi: Spi,
    buttons: [InputPin; 3],
    nvm_path: PathBuf,
    staged: [[char; DISPLAY_COLUMNS]; DISPLAY_ROWS],
    cursor: (usize, usize),
}

impl HardwareBench {
    pub fn open() -> Result<HardwareBench> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, 1_000_000, Mode::Mode0)?;
        let gpio = Gpio::new()?;
        let mut pins = Vec::new();
        for &pin_number in BUTTON_PINS.iter() {
            pins.push(gpio.get(pin_number)?.into_input_pulldown());
        }
        log::debug!("ADC on SPI0.0, buttons on GPIO {:?}", BUTTON_PINS);
        let buttons = match <[InputPin; 3]>::try_from(pins) {
            Ok(buttons) => buttons,
            Err(_) => unreachable!(), // three pins requested above
        };
        Ok(HardwareBench {
            spi,
            buttons,
            nvm_path: PathBuf::from(NVM_PATH),
            staged: [[' '; DISPLAY_COLUMNS]; DISPLAY_ROWS],
            cursor: (0, 0),
        })
    }
}

fn mcp3008_channel(channel: Channel) -> u8 {
    match channel {
        Channel::Power => 0,
        Channel::Temperature => 1,
    }
}

impl Bench for HardwareBench {
    fn read_channel(&mut self, channel: Channel) -> Result<u16> {
        // MCP3008 single-ended conversion: start bit, SGL|channel, clocks
        let tx_buffer = [0x01, (0x08 | mcp3008_channel(channel)) << 4, 0x00];
        let mut rx_buffer = [0u8; 3];
        self.spi.transfer(&mut rx_buffer, &tx_buffer)?;
        let sample = ((rx_buffer[1] & 0x03) as u16) << 8 | rx_buffer[2] as u16;
        log::trace!("read_channel({:?}) = {}", channel, sample);
        Ok(sample)
    }

    fn read_nvm(&mut self) -> Result<u8> {
        match fs::read(&self.nvm_path) {
            Ok(bytes) => Ok(bytes.first().copied().unwrap_or(0)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(error) => Err(error.into()),
        }
    }

    fn write_nvm(&mut self, value: u8) -> Result<()> {
        log::trace!("write_nvm({})", value);
        if let Some(parent) = self.nvm_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.nvm_path, [value])?;
        Ok(())
    }

    fn read_buttons(&mut self) -> Result<Buttons> {
        let mut mask = Buttons::empty();
        for (pin, &bit) in self.buttons.iter().zip(BUTTON_MASKS.iter()) {
            if pin.is_high() {
                mask |= bit;
            }
        }
        Ok(mask)
    }

    fn set_cursor(&mut self, column: usize, row: usize) -> Result<()> {
        self.cursor = (column.min(DISPLAY_COLUMNS), row.min(DISPLAY_ROWS - 1));
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<()> {
        let (mut column, row) = self.cursor;
        for glyph in text.chars() {
            if column >= DISPLAY_COLUMNS {
                break;
            }
            self.staged[row][column] = glyph;
            column += 1;
        }
        self.cursor = (column, row);
        Ok(())
    }

    fn commit_frame(&mut self) -> Result<()> {
        let mut frame = String::from("\x1b[H");
        for row in self.staged.iter() {
            frame.extend(row.iter());
            frame.push_str("\x1b[K\r\n");
        }
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(frame.as_bytes())?;
        handle.flush()?;
        Ok(())
    }

    fn restart(&mut self) -> Result<()> {
        log::info!("restarting");
        let exe = CString::new("/proc/self/exe").unwrap();
        let argv = [exe.as_ptr(), std::ptr::null()];
        // SAFETY: argv is NULL-terminated and `exe` outlives the call;
        // execv only ever returns on failure.
        unsafe { libc::execv(exe.as_ptr(), argv.as_ptr()) };
        Err(Error::BenchIo(io::Error::last_os_error()))
    }
}
