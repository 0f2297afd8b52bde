//! Command-line configuration.
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::history::DB_PATH;
use crate::session::DEFAULT_TIME_LIMIT_SECS;

/// Terminal quiz on any topic, with a countdown and a local results history.
#[derive(Debug, Parser)]
#[command(name = "topic_quiz", version, about)]
pub struct Cli {
    /// SQLite file for the results history (`:memory:` keeps nothing)
    #[arg(long, default_value = DB_PATH)]
    pub db: String,

    /// Seed for question shuffling, for repeatable quizzes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Seconds allowed per quiz
    #[arg(long, default_value_t = DEFAULT_TIME_LIMIT_SECS, value_parser = clap::value_parser!(u32).range(1..))]
    pub time_limit: u32,
}

impl Cli {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
