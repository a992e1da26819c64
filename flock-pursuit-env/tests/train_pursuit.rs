use anyhow::Result;
use flock_core::{record::BufferedRecorder, Env, Trainer, TrainerConfig, UpdateMode};
use flock_pursuit_env::{
    sector_codec, sector_observers, PursuitEnv, PursuitEnvConfig, SectorObserverConfig,
};
use test_log::test;

fn trainer_config() -> TrainerConfig {
    TrainerConfig::default()
        .n_episodes(20)
        .episode_length(50)
        .value_learning_rate(0.1)
        .policy_learning_rate(0.01)
        .learner_thresholds(vec![10])
        .snapshot_interval(5)
        .trajectory_interval(10)
}

#[test]
fn test_train_small_flock() -> Result<()> {
    let env_config = PursuitEnvConfig::default().n_birds(4).arena_size(2.0);
    let obs_config = SectorObserverConfig::default().n_sectors(3);
    let codec = sector_codec(&obs_config)?;
    assert_eq!(codec.n_states(), 27);

    let mut env = PursuitEnv::build(&env_config, 0)?;
    let mut trainer = Trainer::<PursuitEnv>::build(
        trainer_config(),
        codec,
        sector_observers(&env_config, &obs_config),
    )?;
    let mut recorder = BufferedRecorder::new();
    trainer.train(&mut env, &mut recorder)?;

    assert_eq!(recorder.episodes().len(), 20);
    assert_eq!(recorder.snapshots().len(), 4);
    for summary in recorder.episodes() {
        assert!(summary.steps <= 50);
        // Only a capture ends an episode early.
        if summary.steps < 50 {
            assert!(summary.terminated);
        }
    }
    for (_, state) in recorder.trajectories() {
        assert_eq!(state.len(), 4);
    }

    // Every table entry stays finite.
    let snapshot = trainer.snapshot(20)?;
    for agent in snapshot.agents.iter() {
        assert!(agent.values.iter().all(|v| v.is_finite()));
        assert!(agent.weights.iter().flatten().all(|w| w.is_finite()));
    }
    Ok(())
}

#[test]
fn test_parallel_training_is_deterministic() -> Result<()> {
    let env_config = PursuitEnvConfig::default().n_birds(5).arena_size(3.0);
    let obs_config = SectorObserverConfig::default();
    let run = |parallel: bool| -> Result<_> {
        let mut env = PursuitEnv::build(&env_config, 1)?;
        let config = trainer_config()
            .update_mode(UpdateMode::AllAgents)
            .parallel(parallel);
        let mut trainer = Trainer::<PursuitEnv>::build(
            config,
            sector_codec(&obs_config)?,
            sector_observers(&env_config, &obs_config),
        )?;
        let mut recorder = BufferedRecorder::new();
        trainer.train(&mut env, &mut recorder)?;
        Ok((trainer.snapshot(20)?, recorder.trajectories().to_vec()))
    };
    assert_eq!(run(false)?, run(true)?);
    Ok(())
}
