//! Calibration of the analog front end in terms of physical qualities.
//!
//! Both channels are straight lines fit through two (voltage, value) points
//! taken from the AD8318 datasheet curves at the operating frequency. Moving
//! to a different detector means re-measuring `VREF_VOLTS` and replacing the
//! two point pairs per channel; no logic changes.

/// ADC reference voltage, measured on this board revision.
pub const VREF_VOLTS: f32 = 2.542;

// Log-detector output: the slope is negative (more power, less voltage).
const PWR_HI_VOLTS: f32 = 0.54;  // +5 dBm
const PWR_HI_DBM: f32 = 5.0;
const PWR_LO_VOLTS: f32 = 1.88;  // -50 dBm
const PWR_LO_DBM: f32 = -50.0;

const PWR_SLOPE: f32 = (PWR_HI_DBM - PWR_LO_DBM) / (PWR_HI_VOLTS - PWR_LO_VOLTS);
const PWR_OFFSET: f32 = PWR_HI_DBM - PWR_SLOPE * PWR_HI_VOLTS;

// Temperature sensor output, ~2.13 mV/degree.
const TMP_LO_VOLTS: f32 = 0.44;  // -55 degC
const TMP_LO_CELSIUS: f32 = -55.0;
const TMP_HI_VOLTS: f32 = 0.77;  // +100 degC
const TMP_HI_CELSIUS: f32 = 100.0;

const TMP_SLOPE: f32 = (TMP_HI_CELSIUS - TMP_LO_CELSIUS) / (TMP_HI_VOLTS - TMP_LO_VOLTS);
const TMP_OFFSET: f32 = TMP_LO_CELSIUS - TMP_SLOPE * TMP_LO_VOLTS;

// Valid power-detection window, in the ADC sample domain. Samples above
// SENSITIVITY_FLOOR sit below the detector's sensitivity floor (remember the
// negative slope); samples below OVERLOAD_CEILING exceed its safe input.
const SENSITIVITY_FLOOR: u16 = 583;
const OVERLOAD_CEILING: u16 = 167;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerReading {
    /// Calibrated power with the operator's attenuation offset applied.
    Dbm(f32),
    /// Input below the detector's sensitivity floor.
    BelowFloor,
    /// Input above the detector's safe ceiling.
    Overload,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TempReading {
    Celsius(f32),
    BelowRange,
    AboveRange,
}

/// Reconstruct the channel voltage from a filtered sample. The half-LSB
/// offset centers the code on its quantization interval.
pub fn sample_to_volts(filtered: u16) -> f32 {
    (filtered as f32 + 0.5) * (VREF_VOLTS / 1024.0)
}

/// Map a filtered power-channel sample to dBm, adding the attenuation offset.
/// Validity is judged on the sample itself, not the computed dBm.
pub fn power_dbm(filtered: u16, atten_db: u8) -> PowerReading {
    if filtered > SENSITIVITY_FLOOR {
        return PowerReading::BelowFloor;
    }
    if filtered < OVERLOAD_CEILING {
        return PowerReading::Overload;
    }
    let dbm = PWR_SLOPE * sample_to_volts(filtered) + PWR_OFFSET;
    PowerReading::Dbm(dbm + atten_db as f32)
}

/// Map a filtered temperature-channel sample to degrees Celsius. Values
/// outside the sensor's calibrated span are reported as range markers.
pub fn temperature(filtered: u16) -> TempReading {
    let celsius = TMP_SLOPE * sample_to_volts(filtered) + TMP_OFFSET;
    if celsius < TMP_LO_CELSIUS {
        TempReading::BelowRange
    } else if celsius > TMP_HI_CELSIUS {
        TempReading::AboveRange
    } else {
        TempReading::Celsius(celsius)
    }
}
