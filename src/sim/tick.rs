//! Fixed timestep simulation tick
//!
//! One call advances the whole round by one tick: fuse input, move ships,
//! age bullets and particles, move asteroids, resolve collisions, regenerate
//! the field. The shell calls this from the frame loop accumulator and never
//! mutates entity state itself.

use rand::Rng;

use super::collision::{bullet_hits_asteroid, ship_hits_asteroid};
use super::input::{TickInput, fuse, pause_requested};
use super::state::{Bullet, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::renderer::colors;
use crate::{heading_vec, wrap_position};

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Pause bookkeeping runs in every phase; the debounce window keeps a held
    // button from machine-gunning the toggle. The toggle itself is a no-op
    // outside Playing/Paused.
    if state.pause_debounce > 0 {
        state.pause_debounce -= 1;
    }
    if pause_requested(input) && state.pause_debounce == 0 {
        state.toggle_pause();
        state.pause_debounce = PAUSE_DEBOUNCE_TICKS;
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    step_ships(state, input);
    step_bullets(state);
    step_particles(state);
    step_asteroids(state);
    resolve_ship_collisions(state);
    resolve_bullet_collisions(state);
    regenerate_field(state);
}

/// Rotation, thrust, integration, wraparound, immunity countdown, and firing
/// for every live ship
fn step_ships(state: &mut GameState, input: &TickInput) {
    for i in 0..state.ships.len() {
        let controls = fuse(input, i, state.multiplayer);

        // Dual-ship fire is edge-triggered: the trigger must come back up
        // before it can fire again. Single-ship fire is level-triggered and
        // only gated by the cooldown.
        let fire_requested = if state.multiplayer {
            controls.fire_held && !state.fire_was_held[i]
        } else {
            controls.fire_held
        };
        state.fire_was_held[i] = controls.fire_held;

        if !state.ships[i].alive() {
            state.ships[i].thrusting = false;
            continue;
        }

        {
            let ship = &mut state.ships[i];
            ship.rot += controls.rotate * SHIP_ROTATION_SPEED;
            ship.thrusting = controls.thrust;
            if ship.thrusting {
                ship.vel += heading_vec(ship.rot) * SHIP_THRUST;
            }
            ship.pos += ship.vel;
            ship.vel *= SHIP_FRICTION;
            ship.pos = wrap_position(ship.pos, 0.0);
            if ship.invulnerable > 0 {
                ship.invulnerable -= 1;
            }
        }

        if state.ships[i].thrusting && state.rng.random_bool(0.5) {
            let (pos, rot, radius) = {
                let ship = &state.ships[i];
                (ship.pos, ship.rot, ship.radius)
            };
            state.spawn_exhaust(pos, rot, radius);
        }

        if state.fire_cooldown[i] > 0 {
            state.fire_cooldown[i] -= 1;
        }
        if fire_requested && state.fire_cooldown[i] == 0 {
            fire_bullet(state, i);
        }
    }
}

/// Spawn a bullet at the ship's nose and reset the cooldown.
///
/// Single-ship bullets inherit the ship's momentum; dual-ship bullets fly at
/// the fixed muzzle speed regardless of ship motion.
fn fire_bullet(state: &mut GameState, ship_index: usize) {
    let (pos, vel) = {
        let ship = &state.ships[ship_index];
        let heading = heading_vec(ship.rot);
        let muzzle = ship.pos + heading * ship.radius;
        let inherited = if state.multiplayer { glam::Vec2::ZERO } else { ship.vel };
        (muzzle, heading * BULLET_SPEED + inherited)
    };
    state.bullets.push(Bullet {
        pos,
        vel,
        owner: ship_index,
        life: BULLET_LIFE_TICKS,
    });
    state.fire_cooldown[ship_index] = BULLET_COOLDOWN_TICKS;
    state.push_event(GameEvent::BulletFired { owner: ship_index });
}

/// Integrate, wrap, and age bullets; drop them when the budget runs out
fn step_bullets(state: &mut GameState) {
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel;
        bullet.pos = wrap_position(bullet.pos, 0.0);
        bullet.life -= 1;
    }
    state.bullets.retain(|b| b.life > 0);
}

/// Particles drift, age, and expire; they never wrap
fn step_particles(state: &mut GameState) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life -= 1;
    }
    state.particles.retain(|p| p.life > 0);
}

/// Asteroids drift, spin, and wrap on radius-padded bounds so they slide off
/// one edge while emerging from the other
fn step_asteroids(state: &mut GameState) {
    for asteroid in &mut state.asteroids {
        asteroid.pos += asteroid.vel;
        asteroid.pos = wrap_position(asteroid.pos, asteroid.radius);
        asteroid.rot += asteroid.spin;
    }
}

/// Ship-asteroid hits: lose a life, burst, recenter with a fresh immunity
/// window. Multiple ships can be hit in the same tick independently.
fn resolve_ship_collisions(state: &mut GameState) {
    for i in 0..state.ships.len() {
        {
            let ship = &state.ships[i];
            if !ship.alive() || ship.invulnerable > 0 {
                continue;
            }
            if !state.asteroids.iter().any(|a| ship_hits_asteroid(ship, a)) {
                continue;
            }
        }

        let burst_pos = state.ships[i].pos;
        let color = colors::ship_color(i);
        state.spawn_burst(burst_pos, color, 20);
        let multiplayer = state.multiplayer;
        let ship = &mut state.ships[i];
        ship.lives -= 1;
        ship.recenter(multiplayer);
        state.push_event(GameEvent::ShipHit { ship: i });
    }

    if !state.ships.is_empty() && state.ships.iter().all(|s| s.lives == 0) {
        let score = state.total_score();
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver { score });
        log::info!("game over: score={score}");
    }
}

/// Bullet-asteroid hits: the earliest-fired bullet in range consumes the
/// asteroid, at most one bullet per asteroid per tick. Destruction awards
/// points to the bullet's owner and splits the rock.
fn resolve_bullet_collisions(state: &mut GameState) {
    let mut bullet_used = vec![false; state.bullets.len()];
    let mut kills: Vec<(usize, usize)> = Vec::new();

    for (ai, asteroid) in state.asteroids.iter().enumerate() {
        for (bi, bullet) in state.bullets.iter().enumerate() {
            if bullet_used[bi] {
                continue;
            }
            if bullet_hits_asteroid(bullet.pos, asteroid) {
                bullet_used[bi] = true;
                kills.push((ai, bi));
                break;
            }
        }
    }

    if kills.is_empty() {
        return;
    }

    // Capture what the removals will invalidate
    let awards: Vec<_> = kills
        .iter()
        .map(|&(ai, bi)| {
            let asteroid = &state.asteroids[ai];
            (state.bullets[bi].owner, asteroid.size, asteroid.pos)
        })
        .collect();

    let mut dead_asteroids: Vec<usize> = kills.iter().map(|&(ai, _)| ai).collect();
    dead_asteroids.sort_unstable_by(|a, b| b.cmp(a));
    for ai in dead_asteroids {
        state.asteroids.remove(ai);
    }
    let mut dead_bullets: Vec<usize> = kills.iter().map(|&(_, bi)| bi).collect();
    dead_bullets.sort_unstable_by(|a, b| b.cmp(a));
    for bi in dead_bullets {
        state.bullets.remove(bi);
    }

    let accent = state.sector.accent;
    for (owner, size, pos) in awards {
        state.spawn_burst(pos, accent, 10);
        let points = size.points();
        if let Some(ship) = state.ships.get_mut(owner) {
            ship.score += points;
        }
        state.push_event(GameEvent::ScoreChanged { points });
        state.push_event(GameEvent::AsteroidDestroyed { size });
        state.spawn_children(pos, size);
    }
}

/// When the field transitions to empty, bump the level and spawn the next
/// wave, sized 4 + level
fn regenerate_field(state: &mut GameState) {
    if !state.asteroids.is_empty() {
        return;
    }
    state.level += 1;
    let level = state.level;
    state.push_event(GameEvent::LevelUp { level });
    state.spawn_field(4 + level as usize);
    log::info!("wave cleared: level={} field={}", level, state.asteroids.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::SectorId;
    use crate::sim::input::{BUTTON_RIGHT_TRIGGER, PadSnapshot};
    use crate::sim::state::{AsteroidSize, Ship};
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing(multiplayer: bool) -> GameState {
        let mut state = GameState::new(1234);
        state.start_round(multiplayer, SectorId::Orion.config());
        // Park the field far away so tests control every collision; one rock
        // in a corner keeps wave regeneration from triggering.
        state.asteroids.clear();
        state.spawn_asteroid(AsteroidSize::Small, Vec2::new(30.0, 30.0), 0.0);
        state.ships[0].invulnerable = 0;
        state.drain_events();
        state
    }

    fn rock(state: &mut GameState, size: AsteroidSize, pos: Vec2) {
        state.spawn_asteroid(size, pos, 0.0);
    }

    fn fire_input() -> TickInput {
        let mut input = TickInput::default();
        input.keyboard.fire = true;
        input
    }

    #[test]
    fn test_bullet_life_strictly_decreases_until_removal() {
        let mut state = playing(false);
        state.bullets.push(Bullet {
            pos: Vec2::new(600.0, 400.0),
            vel: Vec2::ZERO,
            owner: 0,
            life: 3,
        });
        let mut last: u32 = 3;
        for _ in 0..2 {
            tick(&mut state, &TickInput::default());
            assert_eq!(state.bullets[0].life, last - 1);
            last -= 1;
        }
        tick(&mut state, &TickInput::default());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_no_bullet_outlives_its_budget() {
        let mut state = playing(false);
        tick(&mut state, &fire_input());
        assert_eq!(state.bullets.len(), 1);
        for _ in 0..BULLET_LIFE_TICKS {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_large_splits_into_two_medium() {
        let mut state = playing(false);
        let pos = Vec2::new(600.0, 200.0);
        rock(&mut state, AsteroidSize::Large, pos);
        state.bullets.push(Bullet { pos, vel: Vec2::ZERO, owner: 0, life: 10 });

        tick(&mut state, &TickInput::default());

        let children: Vec<_> = state
            .asteroids
            .iter()
            .filter(|a| a.size == AsteroidSize::Medium)
            .collect();
        assert_eq!(children.len(), 2);
        // Children spawn at the parent's position with their own fresh velocity
        for child in &children {
            assert_eq!(child.pos, pos);
        }
    }

    #[test]
    fn test_medium_splits_small_splits_nothing() {
        let mut state = playing(false);
        let pos = Vec2::new(600.0, 200.0);
        rock(&mut state, AsteroidSize::Medium, pos);
        state.bullets.push(Bullet { pos, vel: Vec2::ZERO, owner: 0, life: 10 });
        tick(&mut state, &TickInput::default());
        assert_eq!(
            state.asteroids.iter().filter(|a| a.size == AsteroidSize::Small).count(),
            3 // two children + the parked corner rock
        );

        // Shoot one of the smalls: no further children
        let before = state.asteroids.len();
        let target = state.asteroids[1].pos;
        state.bullets.push(Bullet { pos: target, vel: Vec2::ZERO, owner: 0, life: 10 });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.asteroids.len(), before - 1);
    }

    #[test]
    fn test_points_awarded_by_size() {
        for (size, expected) in [
            (AsteroidSize::Large, 20),
            (AsteroidSize::Medium, 50),
            (AsteroidSize::Small, 100),
        ] {
            let mut state = playing(false);
            let pos = Vec2::new(600.0, 200.0);
            rock(&mut state, size, pos);
            state.bullets.push(Bullet { pos, vel: Vec2::ZERO, owner: 0, life: 10 });
            tick(&mut state, &TickInput::default());
            assert_eq!(state.total_score(), expected);
            let events = state.drain_events();
            assert!(events.contains(&GameEvent::ScoreChanged { points: expected }));
            assert!(events.contains(&GameEvent::AsteroidDestroyed { size }));
        }
    }

    #[test]
    fn test_invulnerable_ship_takes_no_hit() {
        let mut state = playing(false);
        state.ships[0].invulnerable = 10;
        let ship_pos = state.ships[0].pos;
        rock(&mut state, AsteroidSize::Large, ship_pos);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ships[0].lives, SHIP_LIVES);
        // The window is monotonically non-increasing
        assert_eq!(state.ships[0].invulnerable, 9);
    }

    #[test]
    fn test_hit_resets_ship_and_restarts_immunity() {
        let mut state = playing(false);
        state.ships[0].pos = Vec2::new(300.0, 300.0);
        state.ships[0].vel = Vec2::new(3.0, 0.0);
        rock(&mut state, AsteroidSize::Large, Vec2::new(300.0, 300.0));

        tick(&mut state, &TickInput::default());

        let ship = &state.ships[0];
        assert_eq!(ship.lives, SHIP_LIVES - 1);
        assert_eq!(ship.pos, Ship::spawn_pos(0, false));
        assert_eq!(ship.vel, Vec2::ZERO);
        assert_eq!(ship.invulnerable, SHIP_INVULN_TICKS);
        assert!(state.drain_events().contains(&GameEvent::ShipHit { ship: 0 }));
    }

    #[test]
    fn test_last_life_hit_fires_game_over_with_score() {
        let mut state = playing(false);
        state.ships[0].lives = 1;
        state.ships[0].score = 750;
        let ship_pos = state.ships[0].pos;
        rock(&mut state, AsteroidSize::Large, ship_pos);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.ships[0].lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().contains(&GameEvent::GameOver { score: 750 }));
    }

    #[test]
    fn test_dual_mode_game_over_waits_for_both_ships() {
        let mut state = playing(true);
        state.ships[1].invulnerable = 0;
        state.ships[0].lives = 1;
        let ship_pos = state.ships[0].pos;
        rock(&mut state, AsteroidSize::Large, ship_pos);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ships[0].lives, 0);
        assert_eq!(state.phase, GamePhase::Playing);

        // Dead ship is out of the collision set: a rock on its spawn point
        // must not re-hit it
        rock(&mut state, AsteroidSize::Large, Ship::spawn_pos(0, true));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);

        state.ships[1].lives = 1;
        let ship_pos = state.ships[1].pos;
        rock(&mut state, AsteroidSize::Large, ship_pos);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_one_bullet_kills_only_first_asteroid_in_range() {
        let mut state = playing(false);
        let pos = Vec2::new(600.0, 200.0);
        rock(&mut state, AsteroidSize::Medium, pos);
        rock(&mut state, AsteroidSize::Medium, pos + Vec2::new(5.0, 0.0));
        state.bullets.push(Bullet { pos, vel: Vec2::ZERO, owner: 0, life: 10 });

        tick(&mut state, &TickInput::default());

        // One consumed (plus its two children), the overlapping second survives
        let mediums = state.asteroids.iter().filter(|a| a.size == AsteroidSize::Medium).count();
        assert_eq!(mediums, 1);
        assert_eq!(state.total_score(), 50);
    }

    #[test]
    fn test_wave_regenerates_at_four_plus_level() {
        let mut state = playing(false);
        state.asteroids.clear();
        let pos = Vec2::new(900.0, 200.0);
        rock(&mut state, AsteroidSize::Small, pos);
        state.bullets.push(Bullet { pos, vel: Vec2::ZERO, owner: 0, life: 10 });

        tick(&mut state, &TickInput::default());

        assert_eq!(state.level, 2);
        assert_eq!(state.asteroids.len(), 6);
        assert!(state.drain_events().contains(&GameEvent::LevelUp { level: 2 }));

        // No regeneration while rocks remain
        let count = state.asteroids.len();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.level, 2);
        assert!(state.asteroids.len() >= count);
    }

    #[test]
    fn test_fire_cooldown_gates_spawns() {
        let mut state = playing(false);
        let input = fire_input();
        tick(&mut state, &input);
        assert_eq!(state.bullets.len(), 1);
        // Held fire does nothing until the cooldown expires
        for _ in 0..BULLET_COOLDOWN_TICKS - 1 {
            tick(&mut state, &input);
            assert_eq!(state.bullets.len(), 1);
        }
        tick(&mut state, &input);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_dual_mode_fire_is_edge_triggered() {
        let mut state = playing(true);
        let mut input = TickInput::default();
        input.pads[1] = PadSnapshot { connected: true, ..Default::default() };
        input.pads[1].buttons[BUTTON_RIGHT_TRIGGER].pressed = true;

        for _ in 0..30 {
            tick(&mut state, &input);
        }
        // Held the whole time: exactly one shot
        let from_ship1 = state.bullets.iter().filter(|b| b.owner == 1).count();
        assert_eq!(from_ship1, 1);

        // Release, then press again: second shot allowed
        input.pads[1].buttons[BUTTON_RIGHT_TRIGGER].pressed = false;
        tick(&mut state, &input);
        input.pads[1].buttons[BUTTON_RIGHT_TRIGGER].pressed = true;
        tick(&mut state, &input);
        assert!(state.drain_events().iter().filter(|e| matches!(e, GameEvent::BulletFired { owner: 1 })).count() >= 2);
    }

    #[test]
    fn test_bullet_momentum_inherited_in_single_mode_only() {
        let mut state = playing(false);
        state.ships[0].vel = Vec2::new(4.0, 0.0);
        state.ships[0].rot = 0.0;
        tick(&mut state, &fire_input());
        let bullet = &state.bullets[0];
        // Muzzle speed along +x plus the ship's own 4 px/tick (pre-friction)
        assert!((bullet.vel.x - (BULLET_SPEED + 4.0)).abs() < 0.2);

        let mut state = playing(true);
        state.ships[0].vel = Vec2::new(4.0, 0.0);
        state.ships[0].rot = 0.0;
        tick(&mut state, &fire_input());
        let bullet = &state.bullets[0];
        assert!((bullet.vel.x - BULLET_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_asteroids_spin_in_both_modes() {
        for multiplayer in [false, true] {
            let mut state = playing(multiplayer);
            let before = state.asteroids[0].rot;
            tick(&mut state, &TickInput::default());
            assert!(state.asteroids[0].rot > before);
        }
    }

    #[test]
    fn test_thrust_accelerates_and_friction_decays() {
        let mut state = playing(false);
        state.ships[0].rot = 0.0;
        let mut input = TickInput::default();
        input.keyboard.thrust = true;
        tick(&mut state, &input);
        assert!(state.ships[0].vel.x > 0.0);
        assert!(state.ships[0].thrusting);

        let after_thrust = state.ships[0].vel.x;
        tick(&mut state, &TickInput::default());
        // No clamp, only decay
        assert!(state.ships[0].vel.x < after_thrust);
        assert!(!state.ships[0].thrusting);
    }

    #[test]
    fn test_pause_toggle_with_debounce() {
        let mut state = playing(false);
        let mut pause = TickInput::default();
        pause.pause_key = true;

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);

        // Still inside the debounce window: ignored
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);

        // Let the window lapse, then toggle back
        for _ in 0..PAUSE_DEBOUNCE_TICKS {
            tick(&mut state, &TickInput::default());
        }
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_in_menu_is_a_no_op() {
        let mut state = GameState::new(9);
        let mut pause = TickInput::default();
        pause.pause_key = true;
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_nothing_moves_while_paused() {
        let mut state = playing(false);
        rock(&mut state, AsteroidSize::Large, Vec2::new(200.0, 200.0));
        state.asteroids.last_mut().unwrap().vel = Vec2::new(2.0, 0.0);
        state.toggle_pause();
        let pos = state.asteroids.last().unwrap().pos;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.asteroids.last().unwrap().pos, pos);
    }

    proptest! {
        #[test]
        fn prop_wrapped_entities_stay_in_padded_bounds(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let mut state = playing(false);
            state.asteroids[0].pos = Vec2::new(x, y).clamp(
                Vec2::splat(-60.0),
                Vec2::new(BOARD_WIDTH + 60.0, BOARD_HEIGHT + 60.0),
            );
            state.asteroids[0].vel = Vec2::new(vx, vy);
            let pad = state.asteroids[0].radius;
            tick(&mut state, &TickInput::default());
            let p = state.asteroids[0].pos;
            prop_assert!(p.x >= -pad - 10.0 && p.x <= BOARD_WIDTH + pad + 10.0);
            prop_assert!(p.y >= -pad - 10.0 && p.y <= BOARD_HEIGHT + pad + 10.0);
        }

        #[test]
        fn prop_bullet_life_monotonic(life in 1u32..=BULLET_LIFE_TICKS, ticks in 1u32..80) {
            let mut state = playing(false);
            state.bullets.push(Bullet {
                pos: Vec2::new(600.0, 400.0),
                vel: Vec2::new(1.0, 1.0),
                owner: 0,
                life,
            });
            let mut previous = life;
            for _ in 0..ticks {
                tick(&mut state, &TickInput::default());
                match state.bullets.first() {
                    Some(b) => {
                        prop_assert!(b.life < previous);
                        previous = b.life;
                    }
                    None => break,
                }
            }
        }
    }
}
