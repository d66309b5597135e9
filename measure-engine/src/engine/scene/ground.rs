use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::viewport::{GROUND_EXTENT, REFERENCE_TRUNK_HEIGHT, REFERENCE_TRUNK_RADIUS};

use crate::engine::tracking::ground_tracker::GroundTracker;
use crate::tools::measure::MeasureTool;

/// Grid drawn over the ground once tracking has detected it.
#[derive(Component)]
pub struct GroundGrid;

// Lifted slightly to avoid z-fighting with the ground mesh.
const GRID_LIFT: f32 = 0.002;
const GRID_CELL_SIZE: f32 = 0.5;

/// Spawn the ground, the hidden grid, a trunk to measure and lighting.
pub fn spawn_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    measure_tool: Res<MeasureTool>,
) {
    let ground_height = measure_tool.controller.settings().tracking.ground_height;

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_EXTENT, GROUND_EXTENT))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.32, 0.38, 0.24),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, ground_height, 0.0),
    ));

    commands.spawn((
        Mesh3d(meshes.add(create_grid_mesh(GROUND_EXTENT, GRID_CELL_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.5),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(0.0, ground_height + GRID_LIFT, 0.0),
        Visibility::Hidden,
        GroundGrid,
    ));

    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(REFERENCE_TRUNK_RADIUS, REFERENCE_TRUNK_HEIGHT))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.36, 0.25, 0.16),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, ground_height + REFERENCE_TRUNK_HEIGHT * 0.5, 0.0),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

/// Show the grid while the ground plane is detected.
pub fn update_ground_grid(
    tracker: Res<GroundTracker>,
    mut grids: Query<&mut Visibility, With<GroundGrid>>,
) {
    let visible = tracker.plane().detected;
    for mut visibility in &mut grids {
        *visibility = if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

/// Square line grid centred on the origin in the XZ plane.
fn create_grid_mesh(extent: f32, cell_size: f32) -> Mesh {
    let line_count = (extent / cell_size).round().max(1.0) as u32;
    let half = extent * 0.5;
    let spacing = extent / line_count as f32;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for i in 0..=line_count {
        let offset = -half + i as f32 * spacing;
        for (start, end) in [
            ([offset, 0.0, -half], [offset, 0.0, half]),
            ([-half, 0.0, offset], [half, 0.0, offset]),
        ] {
            let base = vertices.len() as u32;
            vertices.push(start);
            vertices.push(end);
            indices.extend_from_slice(&[base, base + 1]);
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
