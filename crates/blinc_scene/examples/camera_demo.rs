//! Camera Demo
//!
//! Headless tick loop: a player walking forward, a lantern mounted on the
//! player's hand socket and a camera that switches through the built-in
//! presets. Poses are logged every half second.
//!
//! Run with: RUST_LOG=blinc_scene=debug cargo run -p blinc_scene --example camera_demo

use blinc_scene::camera::{
    FIRST_PERSON_PRESET, GOD_VIEW_PRESET, SIDE_SCROLL_PRESET, THIRD_PERSON_PRESET,
};
use blinc_scene::prelude::*;
use blinc_scene::Result;

const DT: f32 = 1.0 / 60.0;

struct LoggingRenderCamera;

impl RenderCamera for LoggingRenderCamera {
    fn apply_pose(&mut self, pose: &CameraPose) {
        tracing::trace!(?pose, "render camera updated");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = SceneConfig::from_toml_str(
        r#"
        context = "experience"

        [camera]
        rotate_sensitivity = 0.2
        max_distance = 40.0
        "#,
    )?;

    let input = InputState::new().with_action(actions::MOVE_FORWARD);
    let services = SceneServices::new(config.context, Box::new(input));
    let mut scene = Scene::new(config, services);

    let player = scene.create_entity("Player");
    scene.add_component(player, TransformComponent::new(Vec3::ZERO));
    scene.add_component(player, CharacterComponent::default().with_move_speed(3.0));
    scene
        .entities_mut()
        .add_socket(player, Socket::new("hand", Vec3::new(0.4, 1.2, 0.0)));

    let lantern = scene.create_entity("Lantern");
    scene.add_component(lantern, TransformComponent::new(Vec3::new(0.0, 0.1, 0.0)));
    scene.set_parent(lantern, Some(player), Some("hand"));

    let camera = scene.create_entity("Camera");
    scene.add_component(camera, TransformComponent::default());
    scene.add_component(camera, CameraComponent::default());
    scene.bind_render_camera(camera, Box::new(LoggingRenderCamera));

    for preset in [THIRD_PERSON_PRESET, FIRST_PERSON_PRESET, SIDE_SCROLL_PRESET, GOD_VIEW_PRESET] {
        scene.apply_camera_preset(camera, preset)?;
        tracing::info!(preset, "preset applied");

        for frame in 0..60 {
            scene.tick(DT);
            if frame % 30 == 29 {
                log_state(&scene, player, lantern, camera);
            }
        }
    }

    // Losing the target during the experience falls back to the safe preset
    scene.apply_camera_preset(camera, THIRD_PERSON_PRESET)?;
    scene.tick(DT);
    scene.destroy_entity(player);
    scene.tick(DT);
    if let Some(cam) = scene.entities().get_component::<CameraComponent>(camera) {
        tracing::info!(mode = %cam.mode, target = ?cam.target_entity_id, "after target loss");
    }

    tracing::info!(json = %scene.to_json()?, "final scene");
    scene.shutdown();
    Ok(())
}

fn log_state(scene: &Scene, player: EntityId, lantern: EntityId, camera: EntityId) {
    let entities = scene.entities();
    let Some(cam) = entities.get_component::<CameraComponent>(camera) else {
        return;
    };
    tracing::info!(
        mode = %cam.mode,
        player = ?entities.world_position(player),
        lantern = ?entities.world_position(lantern),
        camera = ?cam.current_pose().map(|p| p.position),
        "tick"
    );
}
