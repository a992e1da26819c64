use anyhow::Result;
use clap::Parser;
use flock::{CsvRecorder, RunInfo};
use flock_core::{Env, Trainer, TrainerConfig};
use flock_pursuit_env::{
    sector_codec, sector_observers, PursuitEnv, PursuitEnvConfig, SectorObserverConfig,
};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
struct PursuitEvasionConfig {
    trainer: TrainerConfig,
    env: PursuitEnvConfig,
    observer: SectorObserverConfig,
}

impl PursuitEvasionConfig {
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let rdr = BufReader::new(File::open(path)?);
        Ok(serde_yaml::from_reader(rdr)?)
    }

    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Train a pursuer and a flock of evaders with tabular actor-critic
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML configuration, defaults are used if omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Directory of the CSV outputs
    #[arg(short, long, default_value = "data")]
    out_dir: String,

    /// Number of episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Number of birds, the pursuer included
    #[arg(long)]
    birds: Option<usize>,

    /// Act and observe on all cores
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn config(args: &Args) -> Result<PursuitEvasionConfig> {
    let mut config = match &args.config {
        Some(path) => PursuitEvasionConfig::load(path)?,
        None => PursuitEvasionConfig::default(),
    };
    if let Some(n) = args.episodes {
        config.trainer = config.trainer.n_episodes(n);
    }
    if let Some(n) = args.birds {
        config.env = config.env.n_birds(n);
    }
    if args.parallel {
        config.trainer = config.trainer.parallel(true);
    }
    Ok(config)
}

fn train(config: &PursuitEvasionConfig, out_dir: &str) -> Result<()> {
    let codec = sector_codec(&config.observer)?;
    let observers = sector_observers(&config.env, &config.observer);
    let mut env = PursuitEnv::build(&config.env, config.trainer.seed as i64)?;
    let mut trainer = Trainer::<PursuitEnv>::build(config.trainer.clone(), codec, observers)?;

    let info = RunInfo::new(&config.trainer, config.env.n_birds, codec.n_states());
    let mut recorder = CsvRecorder::create(out_dir, &info)?;
    config.save(Path::new(out_dir).join("config.yaml"))?;

    trainer.train(&mut env, &mut recorder)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = config(&args)?;
    train(&config, &args.out_dir)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{config, train, Args, PursuitEvasionConfig};
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_pursuit_evasion() -> Result<()> {
        let tmp_dir = TempDir::new("pursuit_evasion")?;
        let out_dir = match tmp_dir.as_ref().to_str() {
            Some(s) => s,
            None => panic!("Failed to get string of temporary directory"),
        };
        let args = Args {
            config: None,
            out_dir: out_dir.to_string(),
            episodes: Some(4),
            birds: Some(5),
            parallel: false,
        };
        let mut config = config(&args)?;
        config.trainer = config
            .trainer
            .episode_length(20)
            .snapshot_interval(2)
            .trajectory_interval(2);
        train(&config, out_dir)?;

        for name in [
            "env_info.csv",
            "pursuer_trajectory.csv",
            "episode.csv",
            "value_policy.csv",
            "config.yaml",
        ] {
            assert!(tmp_dir.path().join(name).exists(), "{} is missing", name);
        }
        assert_eq!(
            PursuitEvasionConfig::load(tmp_dir.path().join("config.yaml"))?,
            config
        );
        Ok(())
    }
}
