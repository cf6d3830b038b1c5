//! Software bench: deterministic samples, in-memory NVM, captured frames.

use std::collections::VecDeque;

use crate::Result;
use crate::atten::Buttons;
use super::{Bench, Channel, DISPLAY_COLUMNS, DISPLAY_ROWS};

/// Simulated board. Each channel returns scripted samples first and then
/// settles on a steady level, so filters can be driven through transients.
#[derive(Debug)]
pub struct SimBench {
    levels: [u16; 2],
    scripted: [VecDeque<u16>; 2],
    nvm: u8,
    nvm_writes: usize,
    buttons: Buttons,
    cursor: (usize, usize),
    staged: [[char; DISPLAY_COLUMNS]; DISPLAY_ROWS],
    committed: [[char; DISPLAY_COLUMNS]; DISPLAY_ROWS],
    restarted: bool,
}

impl SimBench {
    pub fn new() -> SimBench {
        SimBench {
            // defaults: mid-scale power, room temperature
            levels: [400, 245],
            scripted: [VecDeque::new(), VecDeque::new()],
            nvm: 0,
            nvm_writes: 0,
            buttons: Buttons::empty(),
            cursor: (0, 0),
            staged: [[' '; DISPLAY_COLUMNS]; DISPLAY_ROWS],
            committed: [[' '; DISPLAY_COLUMNS]; DISPLAY_ROWS],
            restarted: false,
        }
    }

    pub fn set_level(&mut self, channel: Channel, level: u16) {
        self.levels[channel_index(channel)] = level;
    }

    /// Queue samples to be returned before the steady level.
    pub fn push_samples(&mut self, channel: Channel, samples: &[u16]) {
        self.scripted[channel_index(channel)].extend(samples);
    }

    pub fn set_nvm(&mut self, value: u8) {
        self.nvm = value;
    }

    pub fn nvm_byte(&self) -> u8 {
        self.nvm
    }

    /// Number of NVM writes since construction; the write-minimization tests
    /// key on this.
    pub fn nvm_writes(&self) -> usize {
        self.nvm_writes
    }

    /// Hold the given buttons down until the next call.
    pub fn press(&mut self, buttons: Buttons) {
        self.buttons = buttons;
    }

    pub fn restarted(&self) -> bool {
        self.restarted
    }

    pub fn clear_restarted(&mut self) {
        self.restarted = false;
    }

    /// Last committed frame as one string per display row.
    pub fn frame(&self) -> Vec<String> {
        self.committed.iter().map(|row| row.iter().collect()).collect()
    }
}

fn channel_index(channel: Channel) -> usize {
    match channel {
        Channel::Power => 0,
        Channel::Temperature => 1,
    }
}

impl Bench for SimBench {
    fn read_channel(&mut self, channel: Channel) -> Result<u16> {
        let index = channel_index(channel);
        let sample = self.scripted[index].pop_front().unwrap_or(self.levels[index]);
        log::trace!("read_channel({:?}) = {}", channel, sample);
        Ok(sample)
    }

    fn read_nvm(&mut self) -> Result<u8> {
        Ok(self.nvm)
    }

    fn write_nvm(&mut self, value: u8) -> Result<()> {
        log::trace!("write_nvm({})", value);
        self.nvm = value;
        self.nvm_writes += 1;
        Ok(())
    }

    fn read_buttons(&mut self) -> Result<Buttons> {
        Ok(self.buttons)
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
        self.committed = self.staged;
        Ok(())
    }

    fn restart(&mut self) -> Result<()> {
        self.restarted = true;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scripted_then_steady() {
        let mut bench = SimBench::new();
        bench.set_level(Channel::Power, 300);
        bench.push_samples(Channel::Power, &[10, 20]);
        assert_eq!(bench.read_channel(Channel::Power).unwrap(), 10);
        assert_eq!(bench.read_channel(Channel::Power).unwrap(), 20);
        assert_eq!(bench.read_channel(Channel::Power).unwrap(), 300);
        assert_eq!(bench.read_channel(Channel::Power).unwrap(), 300);
    }

    #[test]
    fn test_frame_updates_only_on_commit() {
        let mut bench = SimBench::new();
        bench.set_cursor(2, 1).unwrap();
        bench.print("ab").unwrap();
        assert_eq!(bench.frame()[1], " ".repeat(DISPLAY_COLUMNS));
        bench.commit_frame().unwrap();
        assert_eq!(bench.frame()[1], "  ab            ");
    }

    #[test]
    fn test_print_clipped_at_right_edge() {
        let mut bench = SimBench::new();
        bench.set_cursor(14, 0).unwrap();
        bench.print("xyz").unwrap();
        bench.commit_frame().unwrap();
        assert_eq!(bench.frame()[0], "              xy");
    }
}
