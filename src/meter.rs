//! The control loop: one pass from raw conversions to a committed frame.

use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::Result;
use crate::atten::{Action, AttenuationController};
use crate::cal;
use crate::filter::{SampleFilter, WINDOW};
use crate::format;
use crate::sys::{Bench, Channel};

const LOOP_PERIOD: Duration = Duration::from_millis(25);

// Panel layout, (column, row) in display cells.
const POS_DBM: (usize, usize) = (0, 0);
const POS_ATTEN: (usize, usize) = (11, 0);
const POS_WATTS: (usize, usize) = (0, 1);
const POS_TEMP: (usize, usize) = (0, 2);
#[cfg(debug_assertions)]
const POS_VOLTS: (usize, usize) = (0, 4);
#[cfg(debug_assertions)]
const POS_BUTTONS: (usize, usize) = (0, 5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Rendered,
    /// The operator chorded a restart; all meter state is gone.
    Restarted,
}

#[derive(Debug)]
pub struct Meter<B: Bench> {
    bench: B,
    power_filter: SampleFilter,
    temp_filter: SampleFilter,
    atten: AttenuationController,
}

impl<B: Bench> Meter<B> {
    /// Restore the attenuation offset and prime both filters with a full
    /// window of real samples, so the very first frame shows an unbiased
    /// reading.
    pub fn new(mut bench: B) -> Result<Meter<B>> {
        let atten = AttenuationController::restore(&mut bench)?;
        let mut power_filter = SampleFilter::new();
        let mut temp_filter = SampleFilter::new();
        for _ in 0..WINDOW {
            power_filter.insert(bench.read_channel(Channel::Power)?);
            temp_filter.insert(bench.read_channel(Channel::Temperature)?);
        }
        log::info!("meter ready, attenuation {} dB", atten.value());
        Ok(Meter { bench, power_filter, temp_filter, atten })
    }

    pub fn attenuation_db(&self) -> u8 {
        self.atten.value()
    }

    pub fn bench(&self) -> &B {
        &self.bench
    }

    pub fn bench_mut(&mut self) -> &mut B {
        &mut self.bench
    }

    pub fn into_bench(self) -> B {
        self.bench
    }

    /// Run one iteration of the measurement pipeline at time `now`.
    pub fn step(&mut self, now: Instant) -> Result<Step> {
        let buttons = self.bench.read_buttons()?;
        if let Action::Restart = self.atten.step(buttons, now, &mut self.bench)? {
            log::info!("restart chord pressed");
            self.bench.restart()?;
            return Ok(Step::Restarted);
        }

        let power_avg = {
            let raw = self.bench.read_channel(Channel::Power)?;
            self.power_filter.insert(raw)
        };
        let temp_avg = {
            let raw = self.bench.read_channel(Channel::Temperature)?;
            self.temp_filter.insert(raw)
        };
        let power = cal::power_dbm(power_avg, self.atten.value());
        let temp = cal::temperature(temp_avg);
        log::trace!("power {} -> {:?}, temp {} -> {:?}", power_avg, power, temp_avg, temp);

        let (dbm_text, watts_text) = format::format_power(power);
        self.print_at(POS_DBM, &dbm_text)?;
        self.print_at(POS_ATTEN, &format::format_attenuation(self.atten.value()))?;
        self.print_at(POS_WATTS, &watts_text)?;
        self.print_at(POS_TEMP, &format::format_temperature(temp))?;

        #[cfg(debug_assertions)]
        {
            let volts_text = format!("{:.3}V {:.3}V",
                cal::sample_to_volts(power_avg), cal::sample_to_volts(temp_avg));
            self.print_at(POS_VOLTS, &volts_text)?;
            self.print_at(POS_BUTTONS, &format!("BTN {:03b}", buttons.bits()))?;
        }

        self.bench.commit_frame()?;
        Ok(Step::Rendered)
    }

    fn print_at(&mut self, position: (usize, usize), text: &str) -> Result<()> {
        self.bench.set_cursor(position.0, position.1)?;
        self.bench.print(text)
    }

    /// Run until the operator restarts the device. On real hardware the
    /// restart does not return here at all.
    pub fn run(&mut self) -> Result<()> {
        loop {
            if let Step::Restarted = self.step(Instant::now())? {
                return Ok(());
            }
            sleep(LOOP_PERIOD);
        }
    }
}
