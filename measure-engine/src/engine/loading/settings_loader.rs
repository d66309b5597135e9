use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::SETTINGS_PATH;
use serde::Deserialize;
use tree_measure::MeasureSettings;

use crate::engine::core::app_state::AppState;
use crate::tools::measure::MeasureTool;

/// Measurement settings loaded as a JSON asset.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct MeasureSettingsAsset(pub MeasureSettings);

#[derive(Resource, Default)]
pub struct SettingsLoader {
    handle: Option<Handle<MeasureSettingsAsset>>,
}

pub fn start_loading(mut settings_loader: ResMut<SettingsLoader>, asset_server: Res<AssetServer>) {
    info!("Loading measurement settings from: {}", SETTINGS_PATH);
    settings_loader.handle = Some(asset_server.load(SETTINGS_PATH));
}

/// Create the measure tool once settings are available. A missing or
/// invalid settings file falls back to defaults.
pub fn load_settings_system(
    settings_loader: Res<SettingsLoader>,
    asset_server: Res<AssetServer>,
    settings_assets: Res<Assets<MeasureSettingsAsset>>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(handle) = settings_loader.handle.as_ref() else {
        return;
    };

    let settings = if let Some(MeasureSettingsAsset(settings)) = settings_assets.get(handle) {
        match settings.validate() {
            Ok(()) => {
                info!("✓ Measurement settings loaded");
                settings.clone()
            }
            Err(e) => {
                warn!("{}; using default settings", e);
                MeasureSettings::default()
            }
        }
    } else if let Some(LoadState::Failed(e)) = asset_server.get_load_state(handle.id()) {
        warn!("Could not load {}: {}; using default settings", SETTINGS_PATH, e);
        MeasureSettings::default()
    } else {
        return;
    };

    commands.insert_resource(MeasureTool::new(settings));
    next_state.set(AppState::Running);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_reads_the_same_document_as_settings() {
        let json = r#"{ "display_unit": "centimeters", "decimal_places": 1 }"#;
        let MeasureSettingsAsset(settings) = serde_json::from_str(json).unwrap();
        assert_eq!(settings, MeasureSettings::from_json(json).unwrap());
    }
}
