//! Unit conversions and the profile normalizer.
//!
//! The report carries temperatures in tenths of °C and heights in meters; the
//! charts want °F and feet. All helpers are pure and `NaN` passes through.

use crate::domain::{NormalizedRecord, SoundingProfile};

/// Feet per meter, as used for every height conversion in the crate.
pub const FEET_PER_METER: f64 = 3.28084;

pub fn tenths_to_celsius(tenths: f64) -> f64 {
    tenths / 10.0
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet / FEET_PER_METER
}

/// Attach °C, °F and feet to every record, preserving order.
pub fn normalize(profile: &SoundingProfile) -> Vec<NormalizedRecord> {
    profile
        .records()
        .iter()
        .map(|&record| {
            let temperature_c = tenths_to_celsius(record.temperature);
            NormalizedRecord {
                record,
                temperature_c,
                temperature_f: celsius_to_fahrenheit(temperature_c),
                height_ft: meters_to_feet(record.height),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReportHeader, SoundingRecord};

    #[test]
    fn known_conversions() {
        assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < 1e-12);
        assert!((celsius_to_fahrenheit(-40.0) + 40.0).abs() < 1e-12);
        assert!((celsius_to_fahrenheit(tenths_to_celsius(150.0)) - 59.0).abs() < 1e-12);
        assert!((meters_to_feet(8000.0) - 26246.72).abs() < 1e-9);
    }

    #[test]
    fn conversions_round_trip() {
        for &x in &[-273.15, -56.5, -0.1, 0.0, 1e-9, 15.0, 37.77, 4000.0, 1.0e6] {
            let c = fahrenheit_to_celsius(celsius_to_fahrenheit(x));
            assert!((c - x).abs() <= 1e-9 * x.abs().max(1.0), "temperature {x} -> {c}");

            let m = feet_to_meters(meters_to_feet(x));
            assert!((m - x).abs() <= 1e-9 * x.abs().max(1.0), "height {x} -> {m}");
        }
    }

    #[test]
    fn normalize_propagates_nan() {
        let records = vec![
            SoundingRecord {
                record_type: Some(9),
                pressure: 10020.0,
                height: 93.0,
                temperature: 147.0,
                dew_point: 69.0,
                wind_direction: 180.0,
                wind_speed: 4.0,
            },
            SoundingRecord {
                record_type: Some(6),
                pressure: f64::NAN,
                height: 1000.0,
                temperature: f64::NAN,
                dew_point: f64::NAN,
                wind_direction: 200.0,
                wind_speed: 12.0,
            },
        ];
        let profile = SoundingProfile::new(ReportHeader::default(), records).unwrap();
        let levels = normalize(&profile);

        assert_eq!(levels.len(), 2);
        assert!((levels[0].temperature_c - 14.7).abs() < 1e-12);
        assert!((levels[0].temperature_f - 58.46).abs() < 1e-9);
        assert!((levels[0].height_ft - 305.11812).abs() < 1e-9);
        assert!(levels[1].temperature_f.is_nan());
        assert!((levels[1].height_ft - 3280.84).abs() < 1e-9);
    }
}
