//! Presentation helpers: unit conversion, rounding and the prompt shown
//! for each measurement phase. Stored distances are never rounded; these
//! functions are applied once when a value is read for display.

use crate::session::MeasurementState;
use constants::measurement::{CENTIMETERS_PER_METER, INCHES_PER_METER};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Meters,
    Centimeters,
    Inches,
}

impl DisplayUnit {
    /// Parse a unit name as sent by a frontend.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "m" | "meters" | "metres" => Some(Self::Meters),
            "cm" | "centimeters" | "centimetres" => Some(Self::Centimeters),
            "in" | "inches" => Some(Self::Inches),
            _ => None,
        }
    }

    pub fn convert(self, meters: f32) -> f32 {
        match self {
            Self::Meters => meters,
            Self::Centimeters => meters * CENTIMETERS_PER_METER,
            Self::Inches => meters * INCHES_PER_METER,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Centimeters => "cm",
            Self::Inches => "in",
        }
    }
}

/// Round half away from zero to `decimal_places`.
pub fn round_to(value: f32, decimal_places: u32) -> f32 {
    let scale = 10f32.powi(decimal_places as i32);
    (value * scale).round() / scale
}

/// Format a distance in meters for display, e.g. `"0.42 m"`.
pub fn format_distance(meters: f32, unit: DisplayUnit, decimal_places: u32) -> String {
    let value = round_to(unit.convert(meters), decimal_places);
    format!(
        "{:.*} {}",
        decimal_places as usize,
        value,
        unit.suffix()
    )
}

/// Instruction or result line for the current state.
pub fn prompt(
    state: &MeasurementState,
    surface_detected: bool,
    unit: DisplayUnit,
    decimal_places: u32,
) -> String {
    match state {
        MeasurementState::Ready if !surface_detected => "Move camera to detect surfaces".to_string(),
        MeasurementState::Ready => "Tap to set first point".to_string(),
        MeasurementState::FirstPointSet { .. } => "Tap to set second point".to_string(),
        MeasurementState::Complete(measurement) => format!(
            "Diameter: {}",
            format_distance(measurement.distance, unit, decimal_places)
        ),
    }
}
