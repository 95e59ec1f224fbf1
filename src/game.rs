//! World setup, tick schedule, and spawn helpers.
//!
//! [`setup_world`] inserts every resource and observer the simulation needs.
//! [`build_tick_schedule`] returns the single chained schedule run once per
//! tick:
//!
//! ```text
//! update_input_state → process_physics_lifecycle → physics_step →
//! dispatch_contacts → sync_transforms → input_action_system →
//! dispatch_triggers → process_physics_lifecycle → update_minigames
//! ```
//!
//! The second lifecycle pass realizes bodies for entities spawned by trigger
//! handlers, so they exist before the next physics step.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;
use serde_json::json;

use crate::components::maptrigger::{MapTrigger, TriggerKind, TriggerProperties};
use crate::components::physicsbody::{FixedRotation, PhysicsBody, Shape};
use crate::components::playercontrolled::{Bindings, Player, PlayerControlled};
use crate::components::transform::Transform;
use crate::events::lifecycle::{
    PhysicsLifecycle, observe_physics_tag_added, observe_physics_tag_removed,
};
use crate::resources::contacts::ContactAggregator;
use crate::resources::exitrequest::ExitRequest;
use crate::resources::gameconfig::GameConfig;
use crate::resources::groundcontacts::GroundContacts;
use crate::resources::input::InputState;
use crate::resources::maploader::MapLoaderHandle;
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::worldtime::WorldTime;
use crate::systems::contacts::{GroundContactTracker, dispatch_contacts};
use crate::systems::input::update_input_state;
use crate::systems::inputaction::input_action_system;
use crate::systems::minigame::update_minigames;
use crate::systems::physics::{physics_step, process_physics_lifecycle, sync_transforms};
use crate::systems::time::update_world_time;
use crate::systems::triggers::{TriggerContactListener, dispatch_triggers};
use crate::triggers::{PendingTriggers, TriggerRegistry};

const PLAYER_HALF_WIDTH: f32 = 0.5;
const PLAYER_HALF_HEIGHT: f32 = 0.9;
const PLAYER_FRICTION: f32 = 0.2;

/// Insert resources, contact listeners and lifecycle observers.
///
/// Resources that already exist (e.g. a `MapLoaderHandle` or a custom
/// `TriggerRegistry` inserted by the host) are kept.
pub fn setup_world(world: &mut World, config: &GameConfig) {
    world.insert_resource(config.clone());
    world.init_resource::<WorldTime>();
    world.init_resource::<InputState>();
    world.init_resource::<ExitRequest>();
    world.init_resource::<GroundContacts>();
    world.init_resource::<PendingTriggers>();
    world.init_resource::<PhysicsLifecycle>();
    world.init_resource::<MapLoaderHandle>();
    world.init_resource::<TriggerRegistry>();
    world.insert_resource(PhysicsWorld::new(config.gravity));

    // Ground tracking first: a trigger handler must see this step's counters.
    world.insert_resource(
        ContactAggregator::new()
            .with_listener(GroundContactTracker)
            .with_listener(TriggerContactListener),
    );

    world.add_observer(observe_physics_tag_added::<PhysicsBody>);
    world.add_observer(observe_physics_tag_added::<Transform>);
    world.add_observer(observe_physics_tag_removed::<PhysicsBody>);
    world.add_observer(observe_physics_tag_removed::<Transform>);
    world.flush();

    info!(
        "world ready: gravity=({}, {})",
        config.gravity.x, config.gravity.y
    );
}

/// The per-tick schedule.
pub fn build_tick_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            update_input_state,
            process_physics_lifecycle,
            physics_step,
            dispatch_contacts,
            sync_transforms,
            input_action_system,
            dispatch_triggers,
            process_physics_lifecycle,
            update_minigames,
        )
            .chain(),
    );
    schedule
}

/// Advance the world by one tick with frame delta `dt`.
pub fn run_tick(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
    world.clear_trackers();
}

/// Spawn a controllable player at `position`.
pub fn spawn_player(world: &mut World, position: Vec2, bindings: Bindings) -> Entity {
    world
        .spawn((
            Player,
            PlayerControlled::new(bindings),
            FixedRotation,
            Transform::from_position(position),
            PhysicsBody::dynamic(Shape::rect(PLAYER_HALF_WIDTH, PLAYER_HALF_HEIGHT))
                .with_friction(PLAYER_FRICTION),
        ))
        .id()
}

/// Spawn a static box centered at `position`.
pub fn spawn_ground(world: &mut World, position: Vec2, half_extents: Vec2) -> Entity {
    world
        .spawn((
            Transform::from_position(position),
            PhysicsBody::fixed(Shape::rect(half_extents.x, half_extents.y)).with_friction(0.6),
        ))
        .id()
}

/// Spawn a trigger area. Its body is realized as a sensor.
pub fn spawn_trigger(
    world: &mut World,
    position: Vec2,
    half_extents: Vec2,
    trigger: MapTrigger,
) -> Entity {
    world
        .spawn((
            trigger,
            Transform::from_position(position),
            PhysicsBody::fixed(Shape::rect(half_extents.x, half_extents.y)),
        ))
        .id()
}

fn properties(value: serde_json::Value) -> TriggerProperties {
    match value {
        serde_json::Value::Object(map) => map,
        _ => TriggerProperties::new(),
    }
}

/// Small level used by the headless runner: a floor, a player standing on
/// it, a tutorial marker under the spawn point and a memory minigame
/// trigger to the right.
pub fn spawn_demo_level(world: &mut World, bindings: Bindings) -> Entity {
    spawn_ground(world, Vec2::new(0.0, -0.5), Vec2::new(40.0, 0.5));
    spawn_trigger(
        world,
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        MapTrigger::new(
            TriggerKind::Tutorial,
            properties(json!({"tutorial_type": "start"})),
        ),
    );
    spawn_trigger(
        world,
        Vec2::new(10.0, 1.5),
        Vec2::new(1.0, 1.5),
        MapTrigger::new(
            TriggerKind::Minigame,
            properties(json!({"minigame_type": "memory", "pairs": 4})),
        ),
    );
    spawn_player(world, Vec2::new(0.0, 1.1), bindings)
}
