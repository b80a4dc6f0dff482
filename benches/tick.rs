//! Tick benchmarks for the blob arena simulation
//!
//! Measures the brute-force collision passes and full ticks at room sizes
//! well beyond the default occupancy, to show where a broad phase would
//! start paying off.
//!
//! Run with: cargo bench --bench tick

use blob_arena_server::config::RoomConfig;
use blob_arena_server::game::game_loop::Simulation;
use blob_arena_server::game::spawner;
use blob_arena_server::game::state::{Intent, WorldState};
use blob_arena_server::game::systems::{ai, collision, movement};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Create a world with `count` bots (all moving) and the default food population
fn create_state_with_players(
    count: usize,
    config: &RoomConfig,
    rng: &mut ChaCha12Rng,
) -> WorldState {
    let mut state = WorldState::new();
    spawner::populate_food(&mut state, config, rng);

    for _ in 0..count {
        let mut bot = spawner::spawn_bot(&mut state, config, rng);
        bot.latest_input = Some(Intent::new(rng.gen(), rng.gen(), rng.gen(), rng.gen()));
        state.upsert_player(bot);
    }

    state
}

fn bench_movement(c: &mut Criterion) {
    let mut group = c.benchmark_group("movement");
    let config = RoomConfig::default();
    let mut rng = ChaCha12Rng::seed_from_u64(1);

    for count in [10, 100, 500, 1000] {
        let mut state = create_state_with_players(count, &config, &mut rng);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("update", count), &count, |b, _| {
            b.iter(|| movement::update(black_box(&mut state), &config, config.fixed_step_secs()));
        });
    }

    group.finish();
}

fn bench_collision(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision");
    group.sample_size(50);
    let config = RoomConfig::default();
    let mut rng = ChaCha12Rng::seed_from_u64(2);

    for count in [10, 50, 100, 250] {
        let state = create_state_with_players(count, &config, &mut rng);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("food_pass", count), &count, |b, _| {
            b.iter_batched(
                || state.clone(),
                |mut state| black_box(collision::resolve_food(&mut state, &config, &mut rng)),
                criterion::BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("player_pass", count), &count, |b, _| {
            b.iter_batched(
                || state.clone(),
                |mut state| black_box(collision::resolve_players(&mut state)),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_bot_decisions(c: &mut Criterion) {
    let config = RoomConfig::default();
    let mut rng = ChaCha12Rng::seed_from_u64(3);
    let mut state = create_state_with_players(100, &config, &mut rng);
    let mut now_ms = 0;

    c.bench_function("bot_decisions_100", |b| {
        b.iter(|| {
            // Jump past every reaction timer so all bots decide
            now_ms += 1_000;
            black_box(ai::update_bots(&mut state, now_ms, &mut rng))
        });
    });
}

fn bench_full_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_tick");

    for occupancy in [10, 50, 100] {
        let mut simulation = Simulation::new(RoomConfig {
            target_occupancy: occupancy,
            seed: Some(4),
            ..RoomConfig::default()
        });
        // Fill the room before measuring
        for _ in 0..occupancy {
            simulation.fixed_tick();
        }

        group.bench_with_input(BenchmarkId::new("occupancy", occupancy), &occupancy, |b, _| {
            b.iter(|| black_box(simulation.fixed_tick()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_movement,
    bench_collision,
    bench_bot_decisions,
    bench_full_tick,
);
criterion_main!(benches);
