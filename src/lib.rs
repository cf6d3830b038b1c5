mod atten;
mod cal;
mod filter;
mod format;
mod meter;
mod sys;

#[derive(Debug)]
pub enum Error {
    BenchIo(std::io::Error),
    Other(Box<dyn std::error::Error + Sync + Send + 'static>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::BenchIo(io_error) =>
                write!(f, "bench I/O error: {}", io_error),
            Self::Other(error) =>
                write!(f, "{}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            &Self::BenchIo(ref io_error) => Some(io_error),
            _ => None
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::BenchIo(error)
    }
}

pub type Result<T> =
    core::result::Result<T, Error>;

pub use filter::{
    SampleFilter,
    WINDOW,
};

pub use cal::{
    PowerReading,
    TempReading,
    sample_to_volts,
    power_dbm,
    temperature,
};

pub use format::{
    format_power,
    format_temperature,
    format_attenuation,
};

pub use atten::{
    Buttons,
    Action,
    AttenuationController,
    ATTEN_MAX_DB,
};

pub use meter::{
    Meter,
    Step,
};

pub use sys::{
    Bench,
    Channel,
    sim::SimBench,
};

#[cfg(feature = "hardware")]
pub use sys::imp::HardwareBench;

#[cfg(feature = "hardware")]
pub type PanelMeter =
    meter::Meter<sys::imp::HardwareBench>;
