use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use flapgen::{
    breeding::Breeder,
    caching::CachingEvaluator,
    evolution::{EngineOptions, EvolutionLauncher, LogLevel, Population, WorkerCount},
    flappy::{Game, Level, Point2d, Pylon},
    orchestrator::{Orchestrator, PooledOrchestrator, ScopedOrchestrator, SequentialOrchestrator},
    rng::RandomNumberGenerator,
    selection::ElitistSelection,
};

fn course() -> Game {
    let level = Level::new(1.0, 100.0)
        .with_pylon(Pylon::new(Point2d::new(0.3, 45.0), 0.02, 25.0))
        .with_pylon(Pylon::new(Point2d::new(0.7, 55.0), 0.02, 25.0));
    Game::with_level(level)
}

fn options(game: &Game, population_size: usize, workers: usize) -> EngineOptions {
    EngineOptions::builder()
        .population_size(population_size)
        .chromosome_length(game.decision_count())
        .selection_ratio(0.2)
        .workers(WorkerCount::Fixed(workers))
        .log_level(LogLevel::None)
        .max_generations(20)
        .build()
}

fn run<O: Orchestrator>(orchestrator: O, game: &Game, options: &EngineOptions) -> usize {
    let launcher = EvolutionLauncher::new(orchestrator, game.clone());
    let mut rng = RandomNumberGenerator::from_seed(7);
    match launcher.evolve(options, &mut rng) {
        Ok(result) => result.fitness,
        Err(_) => 0,
    }
}

fn bench_orchestrators(c: &mut Criterion) {
    let mut group = c.benchmark_group("orchestrators");
    group.sample_size(10);
    let game = course();

    for size in [200, 1000, 4000].iter() {
        let sequential = options(&game, *size, 1);
        let parallel = options(&game, *size, 4);

        group.bench_with_input(BenchmarkId::new("sequential", size), &sequential, |b, options| {
            b.iter(|| run(SequentialOrchestrator::new(), black_box(&game), options))
        });

        group.bench_with_input(BenchmarkId::new("pooled", size), &parallel, |b, options| {
            b.iter(|| run(PooledOrchestrator::new(), black_box(&game), options))
        });

        group.bench_with_input(BenchmarkId::new("scoped", size), &parallel, |b, options| {
            b.iter(|| run(ScopedOrchestrator::new(), black_box(&game), options))
        });
    }

    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    let game = course();
    let length = game.decision_count();
    let cached = game.with_global_cache();

    for size in [100, 1000].iter() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mut population = Population::random(*size, length, &mut rng).unwrap();
        population.score(&game).unwrap();

        let elite_count = *size / 5;
        let selection = ElitistSelection::new(elite_count);
        let breeder = Breeder::default();

        group.bench_with_input(BenchmarkId::new("plain", size), &population, |b, population| {
            b.iter(|| {
                let mut population = population.clone();
                let mut next = selection.select(&mut population).unwrap();
                breeder
                    .breed_into(
                        population.chromosomes(),
                        elite_count,
                        *size - elite_count,
                        &mut rng,
                        &game,
                        &mut next,
                    )
                    .unwrap();
                next
            })
        });

        group.bench_with_input(BenchmarkId::new("cached", size), &population, |b, population| {
            b.iter(|| {
                let mut population = population.clone();
                let mut next = selection.select(&mut population).unwrap();
                breeder
                    .breed_into(
                        population.chromosomes(),
                        elite_count,
                        *size - elite_count,
                        &mut rng,
                        &cached,
                        &mut next,
                    )
                    .unwrap();
                next
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_orchestrators, bench_generation);
criterion_main!(benches);
