use flapgen::{
    caching::CachingEvaluator,
    evolution::{EngineOptions, Evaluator, EvolutionLauncher, LogLevel, WorkerCount},
    flappy::{Game, Level, Point2d, Pylon},
    orchestrator::{PooledOrchestrator, SequentialOrchestrator},
    rng::RandomNumberGenerator,
};

fn course() -> Game {
    let level = Level::new(0.4, 100.0)
        .with_pylon(Pylon::new(Point2d::new(0.2, 50.0), 0.02, 20.0));
    Game::with_level(level)
}

fn options(game: &Game) -> EngineOptions {
    EngineOptions::builder()
        .population_size(200)
        .chromosome_length(game.decision_count())
        .selection_ratio(0.2)
        .workers(WorkerCount::Fixed(4))
        .log_level(LogLevel::Minimal)
        .build()
}

#[test]
fn test_course_has_a_solution() {
    let game = course();
    let length = game.decision_count();
    let alternating: Vec<bool> = (0..length).map(|i| i % 2 == 0).collect();

    assert!(game.validate().is_ok());
    assert_eq!(game.evaluate(&alternating), length);
}

#[test]
fn test_pooled_search_crosses_the_course() {
    let game = course();
    let options = options(&game);

    let result = EvolutionLauncher::new(PooledOrchestrator::new(), game.clone())
        .evolve(&options, &mut RandomNumberGenerator::from_seed(60))
        .unwrap();

    assert!(result.solved);
    assert_eq!(game.evaluate(result.chromosome.genes()), game.decision_count());
    assert_eq!(game.trajectory(result.chromosome.genes()).len(), game.decision_count());
}

#[test]
fn test_cached_search_matches_plain_evaluation() {
    let game = course();
    let options = options(&game);
    let cached = game.with_thread_local_cache();

    let result = EvolutionLauncher::new(SequentialOrchestrator::new(), cached)
        .evolve(&options, &mut RandomNumberGenerator::from_seed(61))
        .unwrap();

    assert!(result.solved);
    assert_eq!(game.evaluate(result.chromosome.genes()), result.fitness);
}
