//! CPU-side packing of scene, object and snow uniforms

use snowfall_core::{Entity, Light, MaterialKind, SnowField, World};
use snowfall_math::mat4;

use crate::camera::Camera;
use crate::pipeline::types::{
    ObjectUniforms, SceneUniforms, SnowUniforms, SHADING_BASIC, SHADING_LAMBERT, SHADING_PHONG,
};

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 4] {
    [color[0] * intensity, color[1] * intensity, color[2] * intensity, 0.0]
}

/// Scene uniforms for the current camera, lights and fog
///
/// Ambient lights add up; for the other kinds the first placed light wins.
pub fn frame_uniforms(world: &World, camera: &Camera) -> SceneUniforms {
    let mut uniforms = SceneUniforms {
        view: camera.view_matrix(),
        projection: camera.projection_matrix(),
        camera_position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        ..SceneUniforms::default()
    };

    if let Some(fog) = world.fog() {
        uniforms.fog = [fog.color[0], fog.color[1], fog.color[2], fog.density];
    }

    let (mut directional, mut point, mut hemisphere) = (false, false, false);
    for light in world.lights().lights() {
        match *light {
            Light::Ambient { color, intensity } => {
                for i in 0..3 {
                    uniforms.ambient[i] += color[i] * intensity;
                }
            }
            Light::Directional { color, intensity, position } if !directional => {
                directional = true;
                let dir = position.normalized();
                uniforms.directional_color = scaled(color, intensity);
                uniforms.directional_direction = [dir.x, dir.y, dir.z, 0.0];
            }
            Light::Point { color, intensity, position, distance } if !point => {
                point = true;
                let mut c = scaled(color, intensity);
                c[3] = distance.max(0.0);
                uniforms.point_color = c;
                uniforms.point_position = [position.x, position.y, position.z, 1.0];
            }
            Light::Hemisphere { sky_color, ground_color, intensity, position } if !hemisphere => {
                hemisphere = true;
                let up = position.normalized();
                uniforms.hemisphere_sky = scaled(sky_color, intensity);
                uniforms.hemisphere_ground = scaled(ground_color, intensity);
                uniforms.hemisphere_direction = [up.x, up.y, up.z, 0.0];
            }
            _ => log::trace!("Ignoring extra {:?} light", light.kind()),
        }
    }

    uniforms
}

/// Object uniforms for an entity's transform and material
pub fn object_uniforms(entity: &Entity, has_map: bool) -> ObjectUniforms {
    let model = entity.transform.matrix();
    let m = &entity.material;
    let shading = match m.kind {
        MaterialKind::Basic => SHADING_BASIC,
        MaterialKind::Lambert => SHADING_LAMBERT,
        MaterialKind::Phong => SHADING_PHONG,
    };
    let offset_repeat = m
        .map
        .as_ref()
        .filter(|_| has_map)
        .map_or([0.0, 0.0, 1.0, 1.0], |slot| slot.offset_repeat());

    ObjectUniforms {
        model,
        normal_matrix: mat4::normal_matrix(model),
        color: [m.color[0], m.color[1], m.color[2], m.opacity],
        emissive: [m.emissive[0], m.emissive[1], m.emissive[2], m.shininess],
        offset_repeat,
        flags: [shading, has_map as u32, 0, 0],
    }
}

/// Snow uniforms for the field's clock and the viewport size in pixels
pub fn snow_uniforms(field: &SnowField, camera: &Camera, viewport: (u32, u32)) -> SnowUniforms {
    let p = &field.parameters;
    let rgb = p.color_rgb();
    SnowUniforms {
        view: camera.view_matrix(),
        projection: camera.projection_matrix(),
        offset_time: [field.offset.x, field.offset.y, field.offset.z, field.elapsed_time()],
        color: [rgb[0], rgb[1], rgb[2], p.opacity],
        motion: [p.height, p.radius_x, p.radius_z, p.speed_h],
        sizing: [p.speed_v, p.size, p.scale, 0.0],
        viewport: [viewport.0.max(1) as f32, viewport.1.max(1) as f32, 0.0, 0.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use snowfall_core::{FogExp2, LightRig, LightSettings, Material, MeshData, SeededRandom, SnowSettings, Vec3};

    fn lit_world() -> World {
        let settings = LightSettings {
            placed: vec!["ambient".into(), "directional".into(), "hemi".into()],
            ..LightSettings::default()
        };
        let mut rig = LightRig::new(settings);
        rig.place_configured();
        World::new()
            .with_lights(rig)
            .with_fog(Some(FogExp2::new(0x444444, 0.0008)))
    }

    #[test]
    fn test_frame_uniforms_pack_lights_and_fog() {
        let world = lit_world();
        let camera = Camera::default();
        let u = frame_uniforms(&world, &camera);

        // Ambient is disabled by default, so it contributes nothing
        assert_eq!(u.ambient, [0.0; 4]);
        assert!(u.directional_color[0] > 0.0);
        let d = u.directional_direction;
        assert!(((d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt() - 1.0).abs() < 1e-5);
        assert!(u.hemisphere_sky[0] > 0.0);
        assert_eq!(u.point_color, [0.0; 4]);
        assert_eq!(u.fog[3], 0.0008);
        assert_eq!(u.camera_position[1], 30.0);
    }

    #[test]
    fn test_frame_uniforms_without_fog() {
        let world = World::new();
        let u = frame_uniforms(&world, &Camera::default());
        assert_eq!(u.fog, [0.0; 4]);
    }

    #[test]
    fn test_object_uniforms_from_entity() {
        let mut entity = snowfall_core::Entity::with_material(
            Arc::new(MeshData::cuboid(1.0, 1.0, 1.0)),
            Material::phong_shader(Some("uv_grid")),
        );
        entity.set_position(Vec3::new(1.0, 2.0, 3.0));

        let u = object_uniforms(&entity, true);
        assert_eq!(u.model[3][0..3], [1.0, 2.0, 3.0]);
        assert_eq!(u.emissive[3], 100.0);
        assert_eq!(u.offset_repeat, [0.0, 0.0, 4.0, 4.0]);
        assert_eq!(u.flags, [SHADING_PHONG, 1, 0, 0]);

        // No texture bound yet: sample the white fallback untiled
        let u = object_uniforms(&entity, false);
        assert_eq!(u.offset_repeat, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(u.flags[1], 0);
    }

    #[test]
    fn test_snow_uniforms_carry_clock() {
        let mut field = SnowField::new(&SnowSettings::default(), &mut SeededRandom::new(1));
        field.advance(2.5);
        let u = snow_uniforms(&field, &Camera::default(), (800, 600));
        assert_eq!(u.offset_time[3], 2.5);
        assert_eq!(u.offset_time[1], -50.0);
        assert_eq!(u.viewport[0..2], [800.0, 600.0]);
        assert_eq!(u.color[3], 0.4);
    }
}
