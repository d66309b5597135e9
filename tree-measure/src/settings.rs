//! Measurement settings, loaded from JSON.
//!
//! Every field has a default, so a settings file only needs the values it
//! overrides.

use crate::display::DisplayUnit;
use crate::error::SettingsError;
use constants::measurement::{DEFAULT_GROUND_HEIGHT, DISPLAY_DECIMAL_PLACES, MAX_DECIMAL_PLACES};
use constants::render_settings::{MARKER_RADIUS, SEGMENT_THICKNESS};
use serde::{Deserialize, Serialize};

/// What happens to captured points when tracking is interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterruptionPolicy {
    /// Keep the points; tracking resumes without resetting the world origin.
    Preserve,
    /// Clear the measurement; tracking resumes with a full reset.
    #[default]
    Discard,
}

/// Which surface orientations the tracker should detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneDetection {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Default for PlaneDetection {
    fn default() -> Self {
        Self {
            horizontal: true,
            vertical: true,
        }
    }
}

/// Configuration handed to the tracking backend whenever it is (re)armed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub plane_detection: PlaneDetection,
    /// Request scene reconstruction when the backend supports it.
    pub scene_reconstruction: bool,
    /// Height of the tracked ground plane for backends that assume one.
    pub ground_height: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            plane_detection: PlaneDetection::default(),
            scene_reconstruction: true,
            ground_height: DEFAULT_GROUND_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureSettings {
    pub decimal_places: u32,
    pub display_unit: DisplayUnit,
    pub marker_radius: f32,
    pub segment_thickness: f32,
    /// Skip the ray-cast entirely until a surface has been detected.
    pub require_surface_before_capture: bool,
    pub interruption_policy: InterruptionPolicy,
    pub tracking: TrackingConfig,
}

impl Default for MeasureSettings {
    fn default() -> Self {
        Self {
            decimal_places: DISPLAY_DECIMAL_PLACES,
            display_unit: DisplayUnit::default(),
            marker_radius: MARKER_RADIUS,
            segment_thickness: SEGMENT_THICKNESS,
            require_surface_before_capture: true,
            interruption_policy: InterruptionPolicy::default(),
            tracking: TrackingConfig::default(),
        }
    }
}

impl MeasureSettings {
    /// Parse and validate settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(SettingsError::invalid(format!(
                "decimal_places must be at most {MAX_DECIMAL_PLACES}, got {}",
                self.decimal_places
            )));
        }
        if !(self.marker_radius.is_finite() && self.marker_radius > 0.0) {
            return Err(SettingsError::invalid(format!(
                "marker_radius must be positive, got {}",
                self.marker_radius
            )));
        }
        if !(self.segment_thickness.is_finite() && self.segment_thickness > 0.0) {
            return Err(SettingsError::invalid(format!(
                "segment_thickness must be positive, got {}",
                self.segment_thickness
            )));
        }
        if !self.tracking.ground_height.is_finite() {
            return Err(SettingsError::invalid("tracking.ground_height must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let settings = MeasureSettings::from_json("{}").unwrap();
        assert_eq!(settings, MeasureSettings::default());
        assert_eq!(settings.decimal_places, 2);
        assert_eq!(settings.interruption_policy, InterruptionPolicy::Discard);
        assert!(settings.tracking.plane_detection.horizontal);
        assert!(settings.tracking.plane_detection.vertical);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let settings = MeasureSettings::from_json(
            r#"{
                "display_unit": "inches",
                "interruption_policy": "preserve",
                "tracking": { "plane_detection": { "vertical": false } }
            }"#,
        )
        .unwrap();
        assert_eq!(settings.display_unit, DisplayUnit::Inches);
        assert_eq!(settings.interruption_policy, InterruptionPolicy::Preserve);
        assert!(settings.tracking.plane_detection.horizontal);
        assert!(!settings.tracking.plane_detection.vertical);
        assert!(settings.tracking.scene_reconstruction);
    }

    #[test]
    fn rejects_non_positive_marker_radius() {
        let err = MeasureSettings::from_json(r#"{ "marker_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn rejects_excessive_precision() {
        let err = MeasureSettings::from_json(r#"{ "decimal_places": 12 }"#).unwrap_err();
        assert!(err.to_string().contains("decimal_places"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = MeasureSettings::from_json("{ decimal_places: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
