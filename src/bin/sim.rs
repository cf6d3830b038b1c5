//! Exercise the measurement pipeline against the software bench and dump the
//! committed frames, one per scenario.

use std::time::{Duration, Instant};

use wattmeter::{Buttons, Channel, Meter, SimBench};

fn dump_frame(label: &str, frame: &[String]) {
    println!("{}:", label);
    for row in frame {
        println!("  |{}|", row);
    }
}

fn main() -> wattmeter::Result<()> {
    env_logger::init();

    let mut bench = SimBench::new();
    bench.set_level(Channel::Power, 400);
    bench.set_level(Channel::Temperature, 245);
    bench.set_nvm(10);
    let mut meter = Meter::new(bench)?;
    let t0 = Instant::now();

    meter.step(t0)?;
    dump_frame("steady signal, 10 dB pad", &meter.bench().frame());

    // dial in three more dB, one accepted step per window
    meter.bench_mut().press(Buttons::UPPER);
    for window in 1..=3u64 {
        meter.step(t0 + Duration::from_millis(200 * window))?;
    }
    meter.bench_mut().press(Buttons::empty());
    meter.step(t0 + Duration::from_millis(800))?;
    dump_frame("after three upper presses", &meter.bench().frame());

    // drop the input below the detector floor and let the filter settle
    meter.bench_mut().set_level(Channel::Power, 700);
    for iteration in 0..wattmeter::WINDOW as u64 {
        meter.step(t0 + Duration::from_millis(1000 + 25 * iteration))?;
    }
    dump_frame("input below sensitivity floor", &meter.bench().frame());

    Ok(())
}
