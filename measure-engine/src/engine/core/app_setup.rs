use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Crate engine modules
use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::app_state::{AppState, start_tracking_session};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::settings_loader::{
    MeasureSettingsAsset, SettingsLoader, load_settings_system, start_loading,
};
use crate::engine::scene::ground::{spawn_environment, update_ground_grid};
// Crate tools and RPC modules
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::measure::MeasureToolPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::{PromptText, update_prompt_text};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers the settings document as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<MeasureSettingsAsset>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(MeasureToolPlugin);

    app.init_resource::<SettingsLoader>()
        .init_resource::<ViewportCamera>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            load_settings_system.run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            OnEnter(AppState::Running),
            (spawn_environment, start_tracking_session),
        )
        .add_systems(
            Update,
            (camera_controller, update_ground_grid).run_if(in_state(AppState::Running)),
        );

    // Overlay text only for native builds; the web frontend renders its own.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, update_prompt_text);
    }

    app
}

fn spawn_viewport_camera(commands: &mut Commands, viewport_camera: &ViewportCamera) {
    commands.spawn((Camera3d::default(), viewport_camera.transform()));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands, viewport_camera: Res<ViewportCamera>) {
    spawn_viewport_camera(&mut commands, &viewport_camera);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading…"),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(24.0),
                    left: Val::Px(24.0),
                    ..default()
                },
                PromptText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
