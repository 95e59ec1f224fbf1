//! Input/action integration tests: jump gating, horizontal clamp, anti-float,
//! exclusions, and exit requests.
//!
//! Gravity is zero so that velocities change only through input impulses.

use bevy_ecs::prelude::*;
use glam::Vec2;

use emberleap::components::playercontrolled::{
    Bindings, Dead, DisableInput, GameAction, PlayerControlled,
};
use emberleap::game::{setup_world, spawn_player};
use emberleap::resources::exitrequest::ExitRequest;
use emberleap::resources::gameconfig::GameConfig;
use emberleap::resources::groundcontacts::GroundContacts;
use emberleap::resources::input::{InputState, KeyCode};
use emberleap::resources::physicsworld::PhysicsWorld;
use emberleap::systems::input::update_input_state;
use emberleap::systems::inputaction::{
    JUMP_FALL_IMPULSE, JUMP_IMPULSE, MAX_HORIZONTAL_VELOCITY, input_action_system,
};
use emberleap::systems::physics::process_physics_lifecycle;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> (World, Entity) {
    let mut world = World::new();
    let mut config = GameConfig::new();
    config.gravity = Vec2::ZERO;
    setup_world(&mut world, &config);
    let player = spawn_player(&mut world, Vec2::ZERO, Bindings::default());
    tick_lifecycle(&mut world);
    (world, player)
}

fn tick_lifecycle(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(process_physics_lifecycle);
    schedule.run(world);
}

fn tick_input(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems((update_input_state, input_action_system).chain());
    schedule.run(world);
}

fn mass(world: &World, entity: Entity) -> f32 {
    world
        .resource::<PhysicsWorld>()
        .rigid_body(entity)
        .unwrap()
        .mass()
}

fn velocity(world: &World, entity: Entity) -> Vec2 {
    world
        .resource::<PhysicsWorld>()
        .linear_velocity(entity)
        .unwrap()
}

fn set_velocity(world: &mut World, entity: Entity, v: Vec2) {
    world
        .resource_mut::<PhysicsWorld>()
        .set_linear_velocity(entity, v);
}

fn set_ground_contacts(world: &mut World, entity: Entity, count: u32) {
    let mut ground = world.resource_mut::<GroundContacts>();
    ground.forget(entity);
    for _ in 0..count {
        ground.begin(entity);
    }
}

fn hold(world: &mut World, key: KeyCode) {
    world.resource_mut::<InputState>().press(key);
}

#[test]
fn jump_requires_ground_contact() {
    let (mut world, player) = make_world();
    hold(&mut world, KeyCode::Space);

    tick_input(&mut world);
    assert_eq!(velocity(&world, player), Vec2::ZERO);
}

#[test]
fn jump_applies_impulse_and_resets_counter() {
    let (mut world, player) = make_world();
    set_ground_contacts(&mut world, player, 2);
    hold(&mut world, KeyCode::Space);

    tick_input(&mut world);
    let m = mass(&world, player);
    assert!(m > 0.0);
    assert!(approx_eq(velocity(&world, player).y, JUMP_IMPULSE.y / m));
    assert_eq!(world.resource::<GroundContacts>().count(player), 0);

    // Still held, but no longer grounded: no second jump.
    tick_input(&mut world);
    assert!(approx_eq(velocity(&world, player).y, JUMP_IMPULSE.y / m));
}

#[test]
fn move_right_is_clamped_with_one_overshoot() {
    let (mut world, player) = make_world();
    let m = mass(&world, player);
    set_velocity(&mut world, player, Vec2::new(7.9, 0.0));
    hold(&mut world, KeyCode::D);

    tick_input(&mut world);
    let vx = velocity(&world, player).x;
    assert!(approx_eq(vx, 7.9 + 1.0 / m));
    assert!(vx > MAX_HORIZONTAL_VELOCITY);

    tick_input(&mut world);
    assert!(approx_eq(velocity(&world, player).x, vx));
}

#[test]
fn move_left_stops_at_limit() {
    let (mut world, player) = make_world();
    set_velocity(&mut world, player, Vec2::new(-MAX_HORIZONTAL_VELOCITY, 0.0));
    hold(&mut world, KeyCode::A);

    tick_input(&mut world);
    assert!(approx_eq(
        velocity(&world, player).x,
        -MAX_HORIZONTAL_VELOCITY
    ));
}

#[test]
fn move_left_accelerates_below_limit() {
    let (mut world, player) = make_world();
    let m = mass(&world, player);
    hold(&mut world, KeyCode::A);

    tick_input(&mut world);
    tick_input(&mut world);
    assert!(approx_eq(velocity(&world, player).x, -2.0 / m));
}

#[test]
fn anti_float_pushes_slow_falls_only() {
    let (mut world, player) = make_world();
    let m = mass(&world, player);

    set_velocity(&mut world, player, Vec2::new(0.0, -5.0));
    tick_input(&mut world);
    assert!(approx_eq(
        velocity(&world, player).y,
        -5.0 + JUMP_FALL_IMPULSE.y / m
    ));

    for vy in [-20.0, -15.0, -1.0, -0.5, 3.0] {
        set_velocity(&mut world, player, Vec2::new(0.0, vy));
        tick_input(&mut world);
        assert!(approx_eq(velocity(&world, player).y, vy), "vy = {}", vy);
    }
}

#[test]
fn anti_float_skipped_when_grounded() {
    let (mut world, player) = make_world();
    set_ground_contacts(&mut world, player, 1);
    set_velocity(&mut world, player, Vec2::new(0.0, -5.0));

    tick_input(&mut world);
    assert!(approx_eq(velocity(&world, player).y, -5.0));
}

#[test]
fn dead_and_disabled_entities_ignore_input() {
    let (mut world, player) = make_world();
    set_ground_contacts(&mut world, player, 1);
    hold(&mut world, KeyCode::Space);
    hold(&mut world, KeyCode::D);
    hold(&mut world, KeyCode::Escape);

    world.entity_mut(player).insert(Dead);
    tick_input(&mut world);
    assert_eq!(velocity(&world, player), Vec2::ZERO);
    assert!(!world.resource::<ExitRequest>().requested);

    world.entity_mut(player).remove::<Dead>().insert(DisableInput);
    tick_input(&mut world);
    assert_eq!(velocity(&world, player), Vec2::ZERO);
    assert_eq!(world.resource::<GroundContacts>().count(player), 1);

    world.entity_mut(player).remove::<DisableInput>();
    tick_input(&mut world);
    assert!(velocity(&world, player).y > 0.0);
}

#[test]
fn quit_sets_exit_request() {
    let (mut world, _player) = make_world();
    hold(&mut world, KeyCode::Escape);

    tick_input(&mut world);
    assert!(world.resource::<ExitRequest>().requested);
}

#[test]
fn use_is_a_noop() {
    let (mut world, player) = make_world();
    set_ground_contacts(&mut world, player, 1);
    hold(&mut world, KeyCode::E);

    tick_input(&mut world);
    assert_eq!(velocity(&world, player), Vec2::ZERO);
    assert_eq!(world.resource::<GroundContacts>().count(player), 1);
    assert!(!world.resource::<ExitRequest>().requested);
}

#[test]
fn custom_bindings_are_respected() {
    let (mut world, player) = make_world();
    set_ground_contacts(&mut world, player, 1);
    world.entity_mut(player).insert(PlayerControlled::new(
        Bindings::empty().with(GameAction::Jump, KeyCode::W),
    ));

    hold(&mut world, KeyCode::Space);
    tick_input(&mut world);
    assert_eq!(velocity(&world, player), Vec2::ZERO);

    hold(&mut world, KeyCode::W);
    tick_input(&mut world);
    assert!(velocity(&world, player).y > 0.0);
}
