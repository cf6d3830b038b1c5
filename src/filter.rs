/// Number of samples averaged per channel.
pub const WINDOW: usize = 20;

/// Rolling-average filter over the last [`WINDOW`] raw ADC samples.
///
/// The buffer starts zeroed; callers must prime it by inserting [`WINDOW`]
/// real samples before trusting the returned mean, or the first readings are
/// biased toward zero.
#[derive(Debug, Clone)]
pub struct SampleFilter {
    slots: [u16; WINDOW],
    write_at: usize,
}

impl SampleFilter {
    pub fn new() -> SampleFilter {
        SampleFilter {
            slots: [0; WINDOW],
            write_at: 0,
        }
    }

    /// Insert `raw` at the write position and return the integer mean of all
    /// slots. The division truncates, matching the fixed-point scale of
    /// the raw samples.
    pub fn insert(&mut self, raw: u16) -> u16 {
        self.slots[self.write_at] = raw;
        self.write_at = (self.write_at + 1) % WINDOW;
        let sum = self.slots.iter().map(|&slot| slot as u32).sum::<u32>();
        (sum / WINDOW as u32) as u16
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_converges_to_steady_input() {
        let mut filter = SampleFilter::new();
        let mut mean = 0;
        for _ in 0..WINDOW {
            mean = filter.insert(737);
        }
        assert_eq!(mean, 737);
    }

    #[test]
    fn test_mean_truncates() {
        let mut filter = SampleFilter::new();
        // 19 slots of 1000 and one of 999: mean 999.95, truncated to 999
        for _ in 0..WINDOW - 1 {
            filter.insert(1000);
        }
        assert_eq!(filter.insert(999), 999);
    }

    #[test]
    fn test_oldest_sample_evicted_on_wrap() {
        let mut filter = SampleFilter::new();
        for _ in 0..WINDOW {
            filter.insert(100);
        }
        // one more insert displaces exactly one slot of 100
        let mean = filter.insert(100 + WINDOW as u16);
        assert_eq!(mean, 101);
    }

    #[test]
    fn test_unprimed_filter_biased_low() {
        let mut filter = SampleFilter::new();
        assert_eq!(filter.insert(1000), 1000 / WINDOW as u16);
    }
}
