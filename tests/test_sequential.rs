use flapgen::{
    chromosome::{Fitness, Gene},
    evolution::{EngineOptions, EvolutionLauncher, LogLevel},
    orchestrator::SequentialOrchestrator,
    rng::RandomNumberGenerator,
    GeneticError,
};

fn leading_true(genes: &[Gene]) -> Fitness {
    genes.iter().take_while(|g| **g).count()
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn test_all_true_target_is_found() {
    init_logging();

    let options = EngineOptions::builder()
        .population_size(100)
        .chromosome_length(10)
        .selection_ratio(0.2)
        .log_level(LogLevel::Verbose)
        .build();
    let launcher = EvolutionLauncher::new(SequentialOrchestrator::new(), leading_true);
    let mut rng = RandomNumberGenerator::from_seed(2024);

    let result = launcher.evolve(&options, &mut rng).unwrap();

    assert!(result.solved);
    assert_eq!(result.fitness, 10);
    assert_eq!(result.chromosome.genes(), &[true; 10]);
    assert_eq!(result.chromosome.to_string(), "1111111111");
}

#[test]
fn test_generation_cap_returns_best_so_far() {
    // a target that can never be reached
    let impossible = |genes: &[Gene]| leading_true(genes).min(genes.len() - 1);
    let options = EngineOptions::builder()
        .population_size(30)
        .chromosome_length(12)
        .selection_ratio(0.2)
        .max_generations(10)
        .build();
    let launcher = EvolutionLauncher::new(SequentialOrchestrator::new(), impossible);
    let mut rng = RandomNumberGenerator::from_seed(3);

    let result = launcher.evolve(&options, &mut rng).unwrap();

    assert!(!result.solved);
    assert_eq!(result.generations, 10);
    assert!(result.fitness <= 11);
    assert_eq!(result.chromosome.fitness(), Some(result.fitness));
}

#[test]
fn test_zero_elites_is_a_configuration_error() {
    let launcher = EvolutionLauncher::new(SequentialOrchestrator::new(), leading_true);
    let mut rng = RandomNumberGenerator::from_seed(1);

    // floor(4 * 0.2) == 0
    let result = launcher.evolve(&EngineOptions::new(4, 10, 0.2), &mut rng);

    assert!(matches!(result, Err(GeneticError::Configuration(_))));
}

#[test]
fn test_same_seed_same_result() {
    let options = EngineOptions::builder()
        .population_size(50)
        .chromosome_length(40)
        .selection_ratio(0.2)
        .max_generations(15)
        .log_level(LogLevel::None)
        .build();
    let launcher = EvolutionLauncher::new(SequentialOrchestrator::new(), leading_true);

    let first = launcher
        .evolve(&options, &mut RandomNumberGenerator::from_seed(11))
        .unwrap();
    let second = launcher
        .evolve(&options, &mut RandomNumberGenerator::from_seed(11))
        .unwrap();

    assert_eq!(first.chromosome, second.chromosome);
    assert_eq!(first.generations, second.generations);
}
