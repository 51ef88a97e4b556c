use bevy::prelude::*;

/// Body whose surface the profiles follow. Radius in metres.
#[derive(Component, Debug, Clone)]
#[require(Transform, Visibility)]
pub struct ReferenceBody {
    pub name: String,
    pub radius: f64,
}

/// Spawn an opaque sphere for the body so the depth capture has a surface
/// to occlude profiles against.
pub fn spawn_reference_body(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    name: &str,
    radius: f64,
) -> Entity {
    let mesh = meshes.add(Sphere::new(radius as f32).mesh().uv(128, 64));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.62, 0.38, 0.24),
        perceptual_roughness: 0.95,
        ..default()
    });

    commands
        .spawn((
            Name::new(name.to_string()),
            ReferenceBody {
                name: name.to_string(),
                radius,
            },
            Mesh3d(mesh),
            MeshMaterial3d(material),
        ))
        .id()
}
