use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pairup_core::*;

const TIERS: [(&str, Coord2); 3] = [("easy", (4, 3)), ("hard", (6, 5)), ("max", (6, 6))];

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for (name, size) in TIERS {
        group.throughput(Throughput::Elements(u64::from(total_cells(size))));
        group.bench_with_input(BenchmarkId::new("random", name), &size, |b, &size| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(Board::build(size, 18, RandomPairGenerator::new(seed)))
            });
        });
    }

    group.finish();
}

/// Plays a whole board by revealing known pairs, one mismatch per pair.
fn play_out(size: Coord2, seed: u64) -> GameStats {
    let levels = LevelConfig {
        easy: LevelPreset {
            grid_size: size,
            ..LevelPreset::easy().without_preview()
        },
        ..LevelConfig::default()
    };
    let store = MemoryStore::new();
    let mut session = GameSession::new(store, NullPresenter, seed).with_levels(levels);
    session.command(Command::Play);

    let pair_ids = session.board().map(Board::pair_ids).unwrap_or_default();
    let mut by_pair: Vec<Vec<CardIndex>> = Vec::new();
    for (index, id) in pair_ids.iter().enumerate() {
        let id = usize::from(*id);
        if by_pair.len() <= id {
            by_pair.resize(id + 1, Vec::new());
        }
        by_pair[id].push(index);
    }

    for (id, cards) in by_pair.iter().enumerate() {
        if let Some(other) = by_pair.get(id + 1) {
            session.command(Command::Reveal(cards[0]));
            session.command(Command::Reveal(other[0]));
            session.advance(Duration::from_secs(1));
        }
        session.command(Command::Reveal(cards[0]));
        session.command(Command::Reveal(cards[1]));
    }
    session.advance(Duration::from_secs(2));
    session.stats()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for (name, size) in TIERS {
        group.throughput(Throughput::Elements(u64::from(total_cells(size) / 2)));
        group.bench_with_input(BenchmarkId::new("full_game", name), &size, |b, &size| {
            b.iter(|| black_box(play_out(size, 7)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_resolve);
criterion_main!(benches);
