mod app;
mod bank;
mod config;
mod console;
mod error;
mod forms;
mod history;
mod session;
mod timer;

use anyhow::Context;
use clap::Parser;

use crate::app::App;
use crate::config::Cli;
use crate::history::HistoryStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let store = HistoryStore::open(&cli.db)
        .with_context(|| format!("could not open history database '{}'", cli.db))?;
    log::debug!("history database at {}", cli.db);

    let mut app = App::new(&cli, store, console::spawn_input_reader());
    app.run().await
}
