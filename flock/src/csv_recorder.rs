//! Writes training records of the pursuit-evasion flock into CSV files.
use anyhow::Result;
use chrono::Local;
use csv::{Writer, WriterBuilder};
use flock_core::{
    record::{EpisodeSummary, Recorder, TableSnapshot},
    Action, ActiveLearner, TrainerConfig,
};
use flock_pursuit_env::State;
use log::info;
use serde::Serialize;
use std::{
    fs::{create_dir_all, File},
    iter,
    path::{Path, PathBuf},
};

/// Description of a training run, written once into `env_info.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunInfo {
    /// Number of episodes.
    pub episodes_num: usize,

    /// Maximum length of an episode.
    pub episodes_length: usize,

    /// Number of birds.
    pub num_of_birds: usize,

    /// Number of rows of the value and policy tables.
    pub state_space_dim: usize,

    /// Interval of trajectory recording in episodes.
    pub episode_write_step: usize,
}

impl RunInfo {
    /// Describes a run of `config` over a flock of `n_birds` with `n_states` states.
    pub fn new(config: &TrainerConfig, n_birds: usize, n_states: usize) -> Self {
        Self {
            episodes_num: config.n_episodes,
            episodes_length: config.episode_length,
            num_of_birds: n_birds,
            state_space_dim: n_states,
            episode_write_step: config.trajectory_interval,
        }
    }
}

#[derive(Serialize)]
struct EnvInfoRow {
    episodes_num: usize,
    episodes_length: usize,
    num_of_birds: usize,
    state_space_dim: usize,
    episode_write_step: usize,
    started_at: String,
}

#[derive(Serialize)]
struct EpisodeRow {
    #[serde(rename = "Episode")]
    episode: usize,
    #[serde(rename = "EndTime")]
    end_time: usize,
    #[serde(rename = "PredatorTraining")]
    predator_training: u8,
}

/// Writes records into four CSV files in a directory.
///
/// * `env_info.csv` - the [`RunInfo`] with the local start time.
/// * `pursuer_trajectory.csv` - `Episode,x0,y0,x1,y1,...`, one row per recorded step.
/// * `episode.csv` - `Episode,EndTime,PredatorTraining`, one row per episode.
///   `EndTime` is the number of steps and `PredatorTraining` is `1` if the
///   pursuer was learning.
/// * `value_policy.csv` - for every bird `i`, the columns
///   `value_i,left_i,straight_i,right_i`. Each snapshot appends one row per
///   state, in state index order.
pub struct CsvRecorder {
    dir: PathBuf,
    n_birds: usize,
    trajectory: Writer<File>,
    episode: Writer<File>,
    value_policy: Writer<File>,
}

impl CsvRecorder {
    /// Creates the output directory and the files, writing their headers.
    pub fn create(dir: impl AsRef<Path>, info: &RunInfo) -> Result<Self> {
        let dir = dir.as_ref().to_owned();
        create_dir_all(&dir)?;

        {
            let mut wtr = Writer::from_path(dir.join("env_info.csv"))?;
            wtr.serialize(EnvInfoRow {
                episodes_num: info.episodes_num,
                episodes_length: info.episodes_length,
                num_of_birds: info.num_of_birds,
                state_space_dim: info.state_space_dim,
                episode_write_step: info.episode_write_step,
                started_at: Local::now().to_rfc3339(),
            })?;
            wtr.flush()?;
        }

        let n_birds = info.num_of_birds;
        let headerless = |name: &str| -> Result<Writer<File>> {
            Ok(WriterBuilder::new()
                .has_headers(false)
                .from_path(dir.join(name))?)
        };

        let mut trajectory = headerless("pursuer_trajectory.csv")?;
        trajectory.write_record(
            iter::once("Episode".to_string())
                .chain((0..n_birds).flat_map(|i| [format!("x{}", i), format!("y{}", i)])),
        )?;

        let episode = Writer::from_path(dir.join("episode.csv"))?;

        let mut value_policy = headerless("value_policy.csv")?;
        value_policy.write_record((0..n_birds).flat_map(|i| {
            iter::once(format!("value_{}", i))
                .chain(Action::ALL.into_iter().map(move |a| format!("{}_{}", a.name(), i)))
        }))?;

        info!("Writes records into {}", dir.display());
        Ok(Self {
            dir,
            n_birds,
            trajectory,
            episode,
            value_policy,
        })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Recorder<State> for CsvRecorder {
    fn record_trajectory(&mut self, episode: usize, state: &State) -> Result<()> {
        debug_assert_eq!(state.len(), self.n_birds);
        self.trajectory.write_record(
            iter::once(episode.to_string()).chain(
                state
                    .birds
                    .iter()
                    .flat_map(|b| [b.x.to_string(), b.y.to_string()]),
            ),
        )?;
        Ok(())
    }

    fn record_episode(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episode.serialize(EpisodeRow {
            episode: summary.episode,
            end_time: summary.steps,
            predator_training: (summary.active_learner == ActiveLearner::Pursuer) as u8,
        })?;
        Ok(())
    }

    fn record_snapshot(&mut self, snapshot: &TableSnapshot) -> Result<()> {
        for state in 0..snapshot.n_states() {
            self.value_policy
                .write_record(snapshot.row(state).iter().map(|v| v.to_string()))?;
        }
        self.value_policy.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.trajectory.flush()?;
        self.episode.flush()?;
        self.value_policy.flush()?;
        Ok(())
    }
}
