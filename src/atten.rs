//! Operator attenuation offset: button handling, clamping, and NVM write-back.

use std::time::{Duration, Instant};

use bitflags::bitflags;

use crate::Result;
use crate::sys::Bench;

/// Largest attenuation offset the panel accepts, in dB.
pub const ATTEN_MAX_DB: u8 = 49;

/// Minimum spacing between two accepted button evaluations. Presses arriving
/// faster than this are coalesced into one step; a held button repeats once
/// per window.
const STEP_WINDOW: Duration = Duration::from_millis(200);

bitflags! {
    /// Currently-pressed front panel buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const UPPER  = 1 << 0;
        const MIDDLE = 1 << 1;
        const LOWER  = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// All three buttons held: the operator requested a device restart.
    Restart,
}

#[derive(Debug)]
pub struct AttenuationController {
    value: u8,
    persisted: u8,
    window_opened: Option<Instant>,
}

impl AttenuationController {
    /// Restore the attenuation offset from the NVM byte. A byte outside
    /// [0, `ATTEN_MAX_DB`] is treated as corrupt and rewritten as 0.
    pub fn restore<B: Bench>(bench: &mut B) -> Result<AttenuationController> {
        let stored = bench.read_nvm()?;
        let value = if stored > ATTEN_MAX_DB {
            log::warn!("stored attenuation {} out of range, resetting to 0", stored);
            bench.write_nvm(0)?;
            0
        } else {
            stored
        };
        Ok(AttenuationController {
            value,
            persisted: value,
            window_opened: None,
        })
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Evaluate one iteration's button mask at time `now`. The caller passes
    /// the clock in so the rate limiter can be driven from tests.
    pub fn step<B: Bench>(&mut self, buttons: Buttons, now: Instant, bench: &mut B)
            -> Result<Action> {
        match self.window_opened {
            Some(opened) if now.duration_since(opened) < STEP_WINDOW =>
                return Ok(Action::None),
            _ => self.window_opened = Some(now),
        }
        if buttons == Buttons::UPPER {
            self.value = (self.value + 1).min(ATTEN_MAX_DB);
        } else if buttons == Buttons::MIDDLE {
            self.value = self.value.saturating_sub(1);
        } else if buttons == Buttons::all() {
            // terminal: the in-memory value is deliberately not persisted
            return Ok(Action::Restart);
        }
        if self.value != self.persisted {
            log::debug!("persisting attenuation {} dB", self.value);
            bench.write_nvm(self.value)?;
            self.persisted = self.value;
        }
        Ok(Action::None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sys::sim::SimBench;

    fn controller(bench: &mut SimBench) -> AttenuationController {
        AttenuationController::restore(bench).unwrap()
    }

    #[test]
    fn test_restore_adopts_stored_value() {
        let mut bench = SimBench::new();
        bench.set_nvm(17);
        let ctrl = controller(&mut bench);
        assert_eq!(ctrl.value(), 17);
        assert_eq!(bench.nvm_writes(), 0);
    }

    #[test]
    fn test_restore_resets_corrupt_byte() {
        let mut bench = SimBench::new();
        bench.set_nvm(200);
        let ctrl = controller(&mut bench);
        assert_eq!(ctrl.value(), 0);
        assert_eq!(bench.nvm_byte(), 0);
        assert_eq!(bench.nvm_writes(), 1);
    }

    #[test]
    fn test_burst_within_window_is_one_step() {
        let mut bench = SimBench::new();
        let mut ctrl = controller(&mut bench);
        let t0 = Instant::now();
        for millis in [0u64, 30, 60, 90, 120, 150, 180] {
            let now = t0 + Duration::from_millis(millis);
            ctrl.step(Buttons::UPPER, now, &mut bench).unwrap();
        }
        assert_eq!(ctrl.value(), 1);
        assert_eq!(bench.nvm_writes(), 1);
        assert_eq!(bench.nvm_byte(), 1);
        // the window closes 200 ms after the accepted evaluation
        ctrl.step(Buttons::UPPER, t0 + Duration::from_millis(200), &mut bench).unwrap();
        assert_eq!(ctrl.value(), 2);
        assert_eq!(bench.nvm_writes(), 2);
    }

    #[test]
    fn test_clamped_to_range() {
        let mut bench = SimBench::new();
        bench.set_nvm(48);
        let mut ctrl = controller(&mut bench);
        let t0 = Instant::now();
        for count in 0..10u64 {
            let now = t0 + Duration::from_millis(200 * count);
            ctrl.step(Buttons::UPPER, now, &mut bench).unwrap();
        }
        assert_eq!(ctrl.value(), ATTEN_MAX_DB);

        for count in 0..60u64 {
            let now = t0 + Duration::from_millis(2000 + 200 * count);
            ctrl.step(Buttons::MIDDLE, now, &mut bench).unwrap();
        }
        assert_eq!(ctrl.value(), 0);
        assert_eq!(bench.nvm_byte(), 0);
    }

    #[test]
    fn test_other_masks_ignored() {
        let mut bench = SimBench::new();
        bench.set_nvm(10);
        let mut ctrl = controller(&mut bench);
        let t0 = Instant::now();
        let masks = [
            Buttons::empty(),
            Buttons::LOWER,
            Buttons::UPPER | Buttons::MIDDLE,
            Buttons::UPPER | Buttons::LOWER,
            Buttons::MIDDLE | Buttons::LOWER,
        ];
        for (count, &mask) in masks.iter().enumerate() {
            let now = t0 + Duration::from_millis(200 * count as u64);
            assert_eq!(ctrl.step(mask, now, &mut bench).unwrap(), Action::None);
        }
        assert_eq!(ctrl.value(), 10);
        assert_eq!(bench.nvm_writes(), 0);
    }

    #[test]
    fn test_chord_requests_restart() {
        let mut bench = SimBench::new();
        let mut ctrl = controller(&mut bench);
        let action = ctrl.step(Buttons::all(), Instant::now(), &mut bench).unwrap();
        assert_eq!(action, Action::Restart);
        assert_eq!(bench.nvm_writes(), 0);
    }

    #[test]
    fn test_chord_rate_limited_like_any_step() {
        let mut bench = SimBench::new();
        let mut ctrl = controller(&mut bench);
        let t0 = Instant::now();
        ctrl.step(Buttons::UPPER, t0, &mut bench).unwrap();
        let action = ctrl.step(Buttons::all(), t0 + Duration::from_millis(50), &mut bench)
            .unwrap();
        assert_eq!(action, Action::None);
    }
}
