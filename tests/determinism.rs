use forage_lib::model::config::{PopulationGroup, SimConfig};
use forage_lib::model::simulation::Simulation;

fn config(seed: u64) -> SimConfig {
    let mut config = SimConfig::default();
    config.world.seed = Some(seed);
    config.population = vec![
        PopulationGroup::new(12, 1.0, 1.0, 3.0),
        PopulationGroup::new(4, 2.0, 1.5, 5.0),
    ];
    config
}

#[test]
fn test_same_seed_same_run() {
    let mut a = Simulation::new(config(42)).unwrap();
    let mut b = Simulation::new(config(42)).unwrap();

    for _ in 0..250 {
        a.tick();
        b.tick();
        assert_eq!(a.snapshot(), b.snapshot());
    }
    assert_eq!(a.stats(), b.stats());
    assert_eq!(a.metrics.counter("meals"), b.metrics.counter("meals"));
}

#[test]
fn test_run_resumes_to_absolute_day() {
    let mut split = Simulation::new(config(7)).unwrap();
    split.run(Some(2));
    let resumed = split.run(Some(4));

    let mut whole = Simulation::new(config(7)).unwrap();
    let full = whole.run(Some(4));
    assert_eq!(resumed, full);
}

#[test]
fn test_run_without_limit_uses_config() {
    let mut c = config(9);
    c.world.max_days = Some(2);
    let mut sim = Simulation::new(c).unwrap();
    let stats = sim.run(None);
    assert!(sim.day() <= 2);
    assert_eq!(stats.len(), sim.day() as usize + 1);
    if !sim.is_extinct() {
        assert_eq!(sim.day(), 2);
    }
}

#[test]
fn test_drawn_seed_reproduces_run() {
    let mut c = config(0);
    c.world.seed = None;
    let mut first = Simulation::new(c.clone()).unwrap();
    let stats = first.run(Some(2));

    c.world.seed = Some(first.seed());
    let mut replay = Simulation::new(c).unwrap();
    assert_eq!(replay.run(Some(2)), stats);
}
