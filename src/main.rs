//! Tile Physics Demo
//!
//! Walks a collider through a small level twice and checks that both runs
//! end with the same state hash.
//!
//! Usage: `tile-physics [physics-config.json]`

use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tile_physics::{
    core::hash::{StateHash, StateHasher},
    world::Cell,
    Aabb, ActorId, Collider, ColliderConfig, CollisionData, CollisionFlags, Direction, FixedSingle, PhysicsConfig,
    TileMap, Vector, World, VERSION,
};

/// One scripted input.
#[derive(Debug, Clone, Copy)]
enum Step {
    Fall(i32),
    Walk(i32),
    Rise(i32),
    Settle,
}

const SCRIPT: &[Step] = &[
    Step::Fall(96),
    Step::Walk(40),
    Step::Walk(40),
    Step::Settle,
    Step::Walk(40),
    Step::Rise(-24),
    Step::Fall(48),
    Step::Walk(-120),
    Step::Settle,
];

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::default().add_directive(Level::INFO.into()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    info!("Tile Physics v{}", VERSION);

    let physics = match std::env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            PhysicsConfig::from_json_str(&json).with_context(|| format!("parsing {path}"))?
        }
        None => PhysicsConfig::default(),
    };
    info!(step = %physics.step_size, coarse = %physics.coarse_sweep_step, "physics config");

    let world = level()?;

    info!("=== First run ===");
    let first = run(&world, physics);
    info!("State hash: {}", hex::encode(first));

    info!("=== Replay ===");
    let replay = run(&world, physics);
    info!("State hash: {}", hex::encode(replay));

    if first == replay {
        info!("DETERMINISM VERIFIED: hashes match");
    } else {
        warn!("DETERMINISM FAILURE: hashes differ");
    }
    Ok(())
}

/// 8x12 map cells: walls on both ends, a floor, and a ramp up to a step.
fn level() -> Result<World> {
    let mut map = TileMap::new(8, 12)?;
    for col in 0..12 {
        map.set_collision_data(Cell::new(6, col), CollisionData::SOLID);
    }
    for row in 0..6 {
        map.set_collision_data(Cell::new(row, 0), CollisionData::UNCLIMBABLE_SOLID);
        map.set_collision_data(Cell::new(row, 11), CollisionData::UNCLIMBABLE_SOLID);
    }
    map.set_collision_data(Cell::new(5, 6), CollisionData::SLOPE_16_8);
    map.set_collision_data(Cell::new(5, 7), CollisionData::SLOPE_8_0);
    map.set_collision_data(Cell::new(5, 8), CollisionData::SOLID);
    map.set_collision_data(Cell::new(5, 9), CollisionData::SOLID);
    Ok(World::new(map))
}

fn run(world: &World, physics: PhysicsConfig) -> StateHash {
    let hitbox = Aabb::from_size(Vector::from_ints(24, 16), FixedSingle::from_int(14), FixedSingle::from_int(30));
    let mut collider = Collider::new(ActorId(1), hitbox, ColliderConfig::default(), physics);
    let mut hasher = StateHasher::for_replay();

    for (i, step) in SCRIPT.iter().enumerate() {
        let flags = match *step {
            Step::Fall(dy) | Step::Rise(dy) => {
                collider.move_contact_solid_vertical(world, FixedSingle::from_int(dy), Direction::UPDOWN, CollisionFlags::NONE)
            }
            Step::Walk(dx) => {
                let flags = collider.move_contact_solid_horizontal(
                    world,
                    FixedSingle::from_int(dx),
                    Direction::LEFTRIGHT,
                    CollisionFlags::NONE,
                );
                if !collider.landed(world) {
                    collider.move_contact_floor(world, physics.query_max_distance, CollisionFlags::NONE);
                }
                flags
            }
            Step::Settle => {
                collider.adjust_on_the_floor(world, physics.query_max_distance, CollisionFlags::NONE);
                CollisionFlags::NONE
            }
        };

        let landed = collider.landed(world);
        let position = collider.hitbox().left_top();
        info!(step = i, ?step, ?flags, landed, x = %position.x, y = %position.y, "step done");

        hasher.update_bytes(&collider.state_hash(world));
    }

    hasher.finalize()
}
