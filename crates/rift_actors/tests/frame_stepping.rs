//! Whole frames through the world stepper

use rift_actors::prelude::*;
use rift_math::Aabb;

const DT: f32 = 1.0 / 60.0;

fn world() -> World {
    World::new(PhysicsConfig::default(), 2024)
}

#[test]
fn test_enemy_engages_an_idle_player() {
    let mut world = world();
    let player = world.spawn_player(ActorProfile::player(), Vec3::ZERO);
    let enemy = world.spawn_enemy(ActorProfile::normal_enemy(), Vec3::new(60.0, 0.0, 0.0));

    world.step(DT);
    world.step(DT);
    assert_eq!(world.state_of(enemy), Some("Attack"));

    for _ in 0..60 {
        world.step(DT);
    }

    let hits: Vec<_> = world.hit_log().copied().collect();
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|h| h.attacker == enemy && h.target == player));
    let health = world.player().map(|p| p.health().current);
    assert!(health.map_or(false, |h| h < 100.0));
}

#[test]
fn test_player_kills_weak_enemy_and_corpse_is_dropped() {
    let mut world = world();
    let player = world.spawn_player(ActorProfile::player(), Vec3::ZERO);
    let enemy = world.spawn_enemy(
        ActorProfile::normal_enemy().with_max_health(15.0),
        Vec3::new(60.0, 0.0, 0.0),
    );

    if let Some(p) = world.player_mut() {
        p.attack_light();
    }

    let mut killed_at = None;
    for frame in 0..200 {
        world.step(DT);
        if killed_at.is_none() && world.enemy(enemy).map_or(false, |e| e.is_dead()) {
            killed_at = Some(frame);
        }
    }

    // The swing lands before the enemy's own hit time
    assert!(killed_at.map_or(false, |f| f < 18));
    assert!(world.enemy(enemy).is_none());
    assert!(world.enemies().is_empty());
    assert!(world.hit_log().any(|h| h.attacker == player && h.target == enemy));
    assert!(world.player().map_or(false, |p| p.health().current == 100.0));
}

#[test]
fn test_dead_player_is_left_alone() {
    let mut world = world();
    let player = world.spawn_player(ActorProfile::player(), Vec3::ZERO);
    let enemy = world.spawn_enemy(ActorProfile::normal_enemy(), Vec3::new(60.0, 0.0, 0.0));
    if let Some(p) = world.player_mut() {
        p.health_mut().take_damage(1000.0, None);
    }

    for _ in 0..240 {
        world.step(DT);
    }

    assert_eq!(world.state_of(player), Some("Dead"));
    assert!(world.player().map_or(false, Player::death_sequence_done));
    // A dead target counts as no target: the enemy walks back home
    assert_ne!(world.state_of(enemy), Some("Attack"));
    assert_ne!(world.state_of(enemy), Some("Chase"));
    assert_eq!(world.hit_log().count(), 0);
}

#[test]
fn test_boss_fight_lands_radius_hits() {
    let mut world = world();
    let player = world.spawn_player(ActorProfile::player(), Vec3::ZERO);
    let boss = world.spawn_enemy(ActorProfile::boss(), Vec3::new(150.0, 0.0, 0.0));

    let mut attacked = false;
    for _ in 0..600 {
        world.step(DT);
        attacked |= world.state_of(boss) == Some("Attack");
    }

    assert!(attacked);
    let boss_hits: Vec<_> = world.hit_log().filter(|h| h.attacker == boss).collect();
    assert!(!boss_hits.is_empty());
    assert!(boss_hits.iter().all(|h| h.target == player && !h.critical));
}

#[test]
fn test_actors_follow_terrain() {
    let config = PhysicsConfig::default();
    let model = TerrainModel::new(Aabb::new(Vec3::new(-1000.0, 20.0, -1000.0), Vec3::new(1000.0, 40.0, 1000.0)));
    let terrain = TerrainCollider::from_model(&model, None, &config);
    let mut world = World::new(config, 5).with_terrain(terrain);

    let player = world.spawn_player(ActorProfile::player(), Vec3::new(0.0, 0.0, 0.0));
    if let Some(p) = world.player_mut() {
        p.set_intent(MoveIntent::walk(Vec3::Z));
    }
    for _ in 0..60 {
        world.step(DT);
    }

    let position = world.position_of(player).unwrap_or(Vec3::NAN);
    assert!((position.y - 20.0).abs() < 1e-3);
    assert!((position.z - 140.0).abs() < 3.0);
    assert_eq!(world.frame_count(), 60);
    assert!((world.elapsed() - 1.0).abs() < 1e-3);
}
