//! Fixed-width display strings for every panel field.
//!
//! The display buffer persists between frames, so every field is padded to
//! one constant width per field; a new rendering always overwrites every
//! cell the previous state of that field could have occupied.

use crate::cal::{PowerReading, TempReading};

const DBM_PLACEHOLDER: &str = "--.- dBm";
const MARKER_LOW: &str = "RF low!";
const MARKER_OVERLOAD: &str = "RF ovl!";

// Field widths, in display cells: the widest rendering of each field.
const DBM_WIDTH: usize = 9;
const WATTS_WIDTH: usize = 8;
const TEMP_WIDTH: usize = 7;

fn pad(text: &str, width: usize) -> String {
    format!("{:<1$}", text, width)
}

/// Produce the dBm line and the autoranged wattage line for one reading.
pub fn format_power(reading: PowerReading) -> (String, String) {
    let dbm = match reading {
        PowerReading::BelowFloor =>
            return (pad(DBM_PLACEHOLDER, DBM_WIDTH), pad(MARKER_LOW, WATTS_WIDTH)),
        PowerReading::Overload =>
            return (pad(DBM_PLACEHOLDER, DBM_WIDTH), pad(MARKER_OVERLOAD, WATTS_WIDTH)),
        PowerReading::Dbm(dbm) => dbm,
    };
    let milliwatts = 10f32.powf(dbm / 10.0);
    // boundary values land in the lower-magnitude bucket
    let (magnitude, unit) = if dbm < -30.0 {
        (milliwatts * 1e6, "nW")
    } else if dbm < 0.0 {
        (milliwatts * 1e3, "\u{b5}W")
    } else if dbm < 30.0 {
        (milliwatts, "mW")
    } else {
        (milliwatts * 1e-3, "W")
    };
    (pad(&format!("{:>5.1} dBm", dbm), DBM_WIDTH),
     pad(&format!("{:>5.1} {}", magnitude, unit), WATTS_WIDTH))
}

pub fn format_temperature(reading: TempReading) -> String {
    match reading {
        TempReading::BelowRange => pad("<-55 \u{b0}C", TEMP_WIDTH),
        TempReading::AboveRange => pad(">100 \u{b0}C", TEMP_WIDTH),
        TempReading::Celsius(celsius) =>
            pad(&format!("{:>3} \u{b0}C", celsius.round() as i32), TEMP_WIDTH),
    }
}

pub fn format_attenuation(atten_db: u8) -> String {
    format!("{:>2} dB", atten_db)
}
