fn main() -> wattmeter::Result<()> {
    env_logger::init();
    let bench = wattmeter::HardwareBench::open()?;
    let mut meter = wattmeter::PanelMeter::new(bench)?;
    meter.run()
}
