use bevy::prelude::*;
use constants::render_settings::{MARKER_COLOUR, RETICLE_COLOUR, RETICLE_RADIUS, SEGMENT_COLOUR};
use tree_measure::Visualizer;

/// Tag for captured point markers.
#[derive(Component)]
pub struct MeasureMarker;

/// Tag for the segment joining the two markers.
#[derive(Component)]
pub struct MeasureSegment;

/// Live preview of where a tap would land.
#[derive(Component)]
pub struct MeasureReticle;

fn unlit_material(colour: [f32; 3]) -> StandardMaterial {
    let [r, g, b] = colour;
    StandardMaterial {
        base_color: Color::srgb(r, g, b),
        emissive: LinearRgba::new(r, g, b, 1.0),
        unlit: true,
        ..default()
    }
}

/// Spawns markers and the segment as mesh entities. Handles are the spawned
/// `Entity` ids; removal despawns them.
pub struct EntityVisualizer<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    marker_radius: f32,
    segment_thickness: f32,
}

impl<'a, 'w, 's> EntityVisualizer<'a, 'w, 's> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a mut Assets<Mesh>,
        materials: &'a mut Assets<StandardMaterial>,
        marker_radius: f32,
        segment_thickness: f32,
    ) -> Self {
        Self {
            commands,
            meshes,
            materials,
            marker_radius,
            segment_thickness,
        }
    }
}

impl Visualizer for EntityVisualizer<'_, '_, '_> {
    type Marker = Entity;
    type Segment = Entity;

    fn place_marker(&mut self, at: Vec3) -> Entity {
        self.commands
            .spawn((
                Mesh3d(self.meshes.add(Sphere::new(self.marker_radius))),
                MeshMaterial3d(self.materials.add(unlit_material(MARKER_COLOUR))),
                Transform::from_translation(at),
                MeasureMarker,
            ))
            .id()
    }

    fn remove_marker(&mut self, marker: Entity) {
        self.commands.entity(marker).despawn();
    }

    fn place_segment(&mut self, at: Vec3, rotation: Quat, length: f32) -> Entity {
        // Long edge on Z, the segment's reference axis.
        let thickness = self.segment_thickness;
        self.commands
            .spawn((
                Mesh3d(self.meshes.add(Cuboid::new(thickness, thickness, length))),
                MeshMaterial3d(self.materials.add(unlit_material(SEGMENT_COLOUR))),
                Transform::from_translation(at).with_rotation(rotation),
                MeasureSegment,
            ))
            .id()
    }

    fn remove_segment(&mut self, segment: Entity) {
        self.commands.entity(segment).despawn();
    }
}

/// Spawn the hidden capture reticle.
pub fn spawn_capture_reticle(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(RETICLE_RADIUS))),
        MeshMaterial3d(materials.add(unlit_material(RETICLE_COLOUR))),
        Transform::default(),
        Visibility::Hidden,
        MeasureReticle,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<Assets<Mesh>>();
        app.init_resource::<Assets<StandardMaterial>>();
        app
    }

    fn place_and_remove(
        mut commands: Commands,
        mut meshes: ResMut<Assets<Mesh>>,
        mut materials: ResMut<Assets<StandardMaterial>>,
    ) {
        let mut visuals =
            EntityVisualizer::new(&mut commands, &mut meshes, &mut materials, 0.01, 0.005);
        let kept = visuals.place_marker(Vec3::ZERO);
        let removed = visuals.place_marker(Vec3::X);
        visuals.place_segment(Vec3::new(0.5, 0.0, 0.0), Quat::IDENTITY, 1.0);
        visuals.remove_marker(removed);
        assert_ne!(kept, removed);
    }

    #[test]
    fn markers_and_segment_become_entities() {
        let mut app = test_app();
        app.world_mut().run_system_once(place_and_remove).unwrap();

        let markers = app
            .world_mut()
            .query_filtered::<&Transform, With<MeasureMarker>>()
            .iter(app.world())
            .count();
        let segments: Vec<_> = app
            .world_mut()
            .query_filtered::<&Transform, With<MeasureSegment>>()
            .iter(app.world())
            .copied()
            .collect();

        assert_eq!(markers, 1);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].translation, Vec3::new(0.5, 0.0, 0.0));
    }
}
